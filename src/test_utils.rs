use crate::llm::{
    ChatRequest, ChatResponse, Choice, FunctionCall, LlmClient, Message, Role, ToolCall, Usage,
    FINISH_TOOL_CALLS,
};
use crate::notifier::Notifier;
use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct MockLlmClient {
    responses: Arc<Mutex<Vec<ChatResponse>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    error: Option<String>,
}

impl MockLlmClient {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    /// Client whose every call fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn response_with_content(content: &str) -> ChatResponse {
        ChatResponse {
            choices: vec![Choice {
                message: Message::assistant(content),
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
            }),
        }
    }

    /// Assistant turn with no text asking for `(id, name, arguments)` calls
    pub fn response_with_tool_calls(calls: &[(&str, &str, &str)]) -> ChatResponse {
        let tool_calls = calls
            .iter()
            .map(|(id, name, arguments)| ToolCall {
                id: id.to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            })
            .collect();

        ChatResponse {
            choices: vec![Choice {
                message: Message {
                    role: Role::Assistant,
                    content: None,
                    tool_calls: Some(tool_calls),
                    tool_call_id: None,
                },
                finish_reason: Some(FINISH_TOOL_CALLS.to_string()),
            }],
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
            }),
        }
    }

    pub fn empty_response() -> ChatResponse {
        ChatResponse {
            choices: Vec::new(),
            usage: None,
        }
    }
}

impl LlmClient for MockLlmClient {
    fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        if let Some(message) = &self.error {
            return Err(anyhow!("{}", message));
        }
        let mut responses = self.responses.lock().expect("responses lock");
        if responses.is_empty() {
            return Ok(MockLlmClient::response_with_content(""));
        }
        Ok(responses.remove(0))
    }
}

/// Notifier that keeps every pushed message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pushed: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn pushed(&self) -> Vec<String> {
        self.pushed.lock().expect("pushed lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn push(&self, text: &str) {
        self.pushed
            .lock()
            .expect("pushed lock")
            .push(text.to_string());
    }
}
