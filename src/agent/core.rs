//! Core conversation loop.
//!
//! One exchange: send [system] + history + [user] to the model; while the
//! model answers with `finish_reason == "tool_calls"`, run the requested
//! tools, append the assistant turn and one tool reply per request, and ask
//! again. The first response that does not request tools ends the exchange.
//!
//! The working sequence is local to the exchange. Callers get the final
//! answer only and decide what to keep in their own history.

use crate::agent::tool_executor;
use crate::config::DEFAULT_MAX_ROUNDS;
use crate::error::ChatError;
use crate::llm::{ChatRequest, LlmClient, Message};
use crate::tools::ToolRegistry;
use tracing::{debug, info, info_span};

/// Configuration for the conversation loop
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub model: String,
    /// Maximum completion requests per exchange
    pub max_rounds: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl LoopConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }
}

/// Token and tool usage for one exchange
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TurnStats {
    pub rounds: usize,
    pub tool_uses: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Result of a completed exchange
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// Final assistant text
    pub answer: String,
    pub stats: TurnStats,
    /// Full working sequence including tool rounds, ending before the answer
    pub transcript: Vec<Message>,
}

/// Run one exchange to completion.
pub fn run_loop(
    client: &dyn LlmClient,
    tools: &ToolRegistry,
    config: &LoopConfig,
    system_prompt: &str,
    history: &[Message],
    user_input: &str,
) -> Result<TurnResult, ChatError> {
    let exchange_id = uuid::Uuid::new_v4();
    let span = info_span!("exchange", id = %exchange_id);
    let _guard = span.enter();

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend_from_slice(history);
    messages.push(Message::user(user_input));

    let tool_schemas = tools.describe();
    let mut stats = TurnStats::default();

    info!(history_len = history.len(), "exchange started");

    for round in 1..=config.max_rounds {
        stats.rounds = round;
        debug!(round, messages = messages.len(), "awaiting model");

        let request = ChatRequest {
            model: config.model.clone(),
            messages: messages.clone(),
            tools: Some(tool_schemas.clone()),
        };
        let response = client.chat(&request).map_err(ChatError::Api)?;

        if let Some(usage) = &response.usage {
            stats.input_tokens += usage.prompt_tokens;
            stats.output_tokens += usage.completion_tokens;
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ChatError::EmptyResponse)?;

        if !choice.wants_tools() {
            let answer = choice.message.content.unwrap_or_default();
            info!(
                rounds = stats.rounds,
                tool_uses = stats.tool_uses,
                input_tokens = stats.input_tokens,
                output_tokens = stats.output_tokens,
                "exchange done"
            );
            return Ok(TurnResult {
                answer,
                stats,
                transcript: messages,
            });
        }

        let tool_calls = match &choice.message.tool_calls {
            Some(calls) if !calls.is_empty() => calls.clone(),
            _ => return Err(ChatError::MissingToolCalls),
        };
        debug!(round, tool_calls = tool_calls.len(), "model requested tools");

        let replies = tool_executor::execute_all(tools, &tool_calls)?;
        stats.tool_uses += tool_calls.len();

        messages.push(choice.message);
        messages.extend(replies);
    }

    Err(ChatError::RoundLimitExceeded(config.max_rounds))
}
