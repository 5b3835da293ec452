use thiserror::Error;

/// Failure of a single chat exchange. No partial answer accompanies any variant.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("completion request failed: {0:#}")]
    Api(#[source] anyhow::Error),

    #[error("completion response contained no choices")]
    EmptyResponse,

    #[error("invalid arguments for tool '{tool}': {source}")]
    InvalidToolArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model asked for tools but sent no tool calls")]
    MissingToolCalls,

    #[error("model kept requesting tools after {0} rounds")]
    RoundLimitExceeded(usize),
}

impl ChatError {
    /// Stable code for JSON error bodies
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::Api(_) => "api_error",
            ChatError::EmptyResponse => "empty_response",
            ChatError::InvalidToolArguments { .. } => "invalid_tool_arguments",
            ChatError::MissingToolCalls => "missing_tool_calls",
            ChatError::RoundLimitExceeded(_) => "round_limit_exceeded",
        }
    }
}
