use super::ToolResult;
use crate::notifier::Notifier;
use serde::Deserialize;
use serde_json::{json, Value};

pub const NAME: &str = "record_unknown_question";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Args {
    pub question: String,
}

pub fn schema() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": NAME,
            "description": "Always use this tool to record any question that couldn't be answered as you didn't know the answer",
            "parameters": {
                "type": "object",
                "properties": {
                    "question": { "type": "string", "description": "The question that couldn't be answered" }
                },
                "required": ["question"],
                "additionalProperties": false
            }
        }
    })
}

pub fn execute(args: Args, notifier: &dyn Notifier) -> ToolResult {
    notifier.push(&format!("Recording {}", args.question));
    ToolResult::ok()
}
