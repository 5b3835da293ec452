use super::ToolResult;
use crate::notifier::Notifier;
use serde::Deserialize;
use serde_json::{json, Value};

pub const NAME: &str = "record_user_details";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Args {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn schema() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": NAME,
            "description": "Use this tool to record that a user is interested in being in touch and provided an email address",
            "parameters": {
                "type": "object",
                "properties": {
                    "email": { "type": "string", "description": "The email address of this user" },
                    "name": { "type": "string", "description": "The user's name, if they provided it" },
                    "notes": { "type": "string", "description": "Any additional information about the conversation that's worth recording to give context" }
                },
                "required": ["email"],
                "additionalProperties": false
            }
        }
    })
}

pub fn format_message(args: &Args) -> String {
    let name = args.name.as_deref().unwrap_or("Name not provided");
    let notes = args.notes.as_deref().unwrap_or("not provided");
    format!(
        "Recording {} with email {} and notes {}",
        name, args.email, notes
    )
}

pub fn execute(args: Args, notifier: &dyn Notifier) -> ToolResult {
    notifier.push(&format_message(&args));
    ToolResult::ok()
}
