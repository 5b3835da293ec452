//! Tools the model may call during a chat exchange.
//!
//! The registry is closed: every tool is a `ToolKind` variant with a typed
//! argument struct, and dispatch is a `match` rather than a name lookup.

pub mod record_unknown_question;
pub mod record_user_details;

use crate::error::ChatError;
use crate::notifier::Notifier;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Status returned to the model after a tool call.
///
/// Unknown tools produce the empty result, which serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded: Option<String>,
}

impl ToolResult {
    pub fn ok() -> Self {
        Self {
            recorded: Some("ok".to_string()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    RecordUserDetails,
    RecordUnknownQuestion,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::RecordUserDetails, ToolKind::RecordUnknownQuestion];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::RecordUserDetails => record_user_details::NAME,
            ToolKind::RecordUnknownQuestion => record_unknown_question::NAME,
        }
    }

    pub fn schema(self) -> Value {
        match self {
            ToolKind::RecordUserDetails => record_user_details::schema(),
            ToolKind::RecordUnknownQuestion => record_unknown_question::schema(),
        }
    }
}

/// Fixed set of tools bound to the notifier they report through.
#[derive(Clone)]
pub struct ToolRegistry {
    notifier: Arc<dyn Notifier>,
}

impl ToolRegistry {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Schemas sent with every completion request
    pub fn describe(&self) -> Vec<Value> {
        ToolKind::ALL.iter().map(|kind| kind.schema()).collect()
    }

    /// Run a tool by exact name. Unknown names are a no-op.
    pub fn invoke(&self, name: &str, args: Value) -> Result<ToolResult, ChatError> {
        let Some(kind) = ToolKind::from_name(name) else {
            tracing::debug!(tool = name, "ignoring unknown tool");
            return Ok(ToolResult::empty());
        };

        let result = match kind {
            ToolKind::RecordUserDetails => {
                record_user_details::execute(parse_args(name, args)?, self.notifier.as_ref())
            }
            ToolKind::RecordUnknownQuestion => {
                record_unknown_question::execute(parse_args(name, args)?, self.notifier.as_ref())
            }
        };
        Ok(result)
    }

    /// Record a lead from outside the model, e.g. the website contact form
    pub fn record_user_details(&self, args: record_user_details::Args) -> ToolResult {
        record_user_details::execute(args, self.notifier.as_ref())
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ChatError> {
    serde_json::from_value(args).map_err(|source| ChatError::InvalidToolArguments {
        tool: tool.to_string(),
        source,
    })
}
