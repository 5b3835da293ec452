//! Tool execution for one assistant turn.
//!
//! Every request yields exactly one tool-role message, in request order,
//! carrying the request id. Malformed argument JSON aborts the exchange.

use crate::error::ChatError;
use crate::llm::{Message, ToolCall};
use crate::tools::{ToolRegistry, ToolResult};
use serde_json::Value;
use std::time::Instant;
use tracing::debug;

/// Decode the JSON-encoded argument string of a tool call
pub fn parse_arguments(call: &ToolCall) -> Result<Value, ChatError> {
    serde_json::from_str(&call.function.arguments).map_err(|source| {
        ChatError::InvalidToolArguments {
            tool: call.function.name.clone(),
            source,
        }
    })
}

/// Wire form of a tool result as placed in the tool message content
pub fn encode_result(result: &ToolResult) -> String {
    serde_json::to_string(result).unwrap_or_else(|_| "{}".to_string())
}

/// Execute a single tool call and build its tool-role reply
pub fn execute_tool_call(tools: &ToolRegistry, call: &ToolCall) -> Result<Message, ChatError> {
    let name = &call.function.name;
    let args = parse_arguments(call)?;

    debug!(tool = %name, tool_call_id = %call.id, args = %args, "tool call");

    let started = Instant::now();
    let result = tools.invoke(name, args)?;
    let duration_ms = started.elapsed().as_millis() as u64;

    debug!(
        tool = %name,
        recorded = result.recorded.as_deref().unwrap_or("-"),
        duration_ms,
        "tool result"
    );

    Ok(Message::tool(call.id.clone(), encode_result(&result)))
}

/// Execute all calls of one assistant turn, preserving order
pub fn execute_all(tools: &ToolRegistry, calls: &[ToolCall]) -> Result<Vec<Message>, ChatError> {
    calls
        .iter()
        .map(|call| execute_tool_call(tools, call))
        .collect()
}
