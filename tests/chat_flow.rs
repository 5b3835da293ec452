//! End-to-end exchange through the public API with a scripted model.

use anyhow::Result;
use persona_chat::agent::{Chatbot, LoopConfig};
use persona_chat::cli::record_exchange;
use persona_chat::error::ChatError;
use persona_chat::llm::{
    ChatRequest, ChatResponse, Choice, FunctionCall, LlmClient, Message, Role, ToolCall,
};
use persona_chat::notifier::Notifier;
use persona_chat::persona::PersonaContext;
use persona_chat::tools::ToolRegistry;
use std::sync::{Arc, Mutex};

struct ScriptedModel {
    replies: Mutex<Vec<ChatResponse>>,
    seen: Arc<Mutex<Vec<ChatRequest>>>,
}

impl LlmClient for ScriptedModel {
    fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(self.replies.lock().unwrap().remove(0))
    }
}

#[derive(Default)]
struct Inbox(Mutex<Vec<String>>);

impl Notifier for Inbox {
    fn push(&self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

fn tool_round(id: &str, name: &str, arguments: &str) -> ChatResponse {
    ChatResponse {
        choices: vec![Choice {
            message: Message {
                role: Role::Assistant,
                content: None,
                tool_calls: Some(vec![ToolCall {
                    id: id.to_string(),
                    call_type: "function".to_string(),
                    function: FunctionCall {
                        name: name.to_string(),
                        arguments: arguments.to_string(),
                    },
                }]),
                tool_call_id: None,
            },
            finish_reason: Some("tool_calls".to_string()),
        }],
        usage: None,
    }
}

fn final_round(text: &str) -> ChatResponse {
    ChatResponse {
        choices: vec![Choice {
            message: Message::assistant(text),
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}

fn bot(replies: Vec<ChatResponse>) -> (Chatbot, Arc<Inbox>, Arc<Mutex<Vec<ChatRequest>>>) {
    let inbox = Arc::new(Inbox::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let model = ScriptedModel {
        replies: Mutex::new(replies),
        seen: seen.clone(),
    };
    let bot = Chatbot::new(
        PersonaContext::new("Jane Doe", "Compiler engineer.", "Worked on LLVM."),
        Box::new(model),
        ToolRegistry::new(inbox.clone()),
        LoopConfig::new("test-model"),
    );
    (bot, inbox, seen)
}

#[test]
fn unknown_question_is_recorded_and_only_the_answer_reaches_history() {
    let (bot, inbox, seen) = bot(vec![
        tool_round(
            "call_1",
            "record_unknown_question",
            r#"{"question":"What is your favourite colour?"}"#,
        ),
        final_round("I'm not sure, but I've noted the question."),
    ]);

    let mut history: Vec<Message> = Vec::new();
    let message = "What is your favourite colour?";
    let answer = bot.chat(message, &history).unwrap();

    assert_eq!(answer, "I'm not sure, but I've noted the question.");
    assert_eq!(
        *inbox.0.lock().unwrap(),
        vec!["Recording What is your favourite colour?".to_string()]
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    let second = &seen[1].messages;
    assert_eq!(second.len(), 4);
    assert_eq!(second[2].role, Role::Assistant);
    assert_eq!(second[3], Message::tool("call_1", r#"{"recorded":"ok"}"#));

    record_exchange(&mut history, message, &answer);
    assert_eq!(
        history,
        vec![Message::user(message), Message::assistant(answer)]
    );
}

#[test]
fn lead_capture_then_follow_up_turn() {
    let (bot, inbox, seen) = bot(vec![
        tool_round(
            "call_7",
            "record_user_details",
            r#"{"email":"sam@example.com","name":"Sam"}"#,
        ),
        final_round("Thanks Sam, I'll be in touch."),
        final_round("Anything else?"),
    ]);

    let mut history = Vec::new();
    let answer = bot.chat("Reach me at sam@example.com", &history).unwrap();
    record_exchange(&mut history, "Reach me at sam@example.com", &answer);
    bot.chat("Thanks!", &history).unwrap();

    assert_eq!(
        *inbox.0.lock().unwrap(),
        vec!["Recording Sam with email sam@example.com and notes not provided".to_string()]
    );
    // The follow-up carries only system, prior user/assistant and the new message
    let last = &seen.lock().unwrap()[2].messages;
    assert_eq!(last.len(), 4);
    assert!(last.iter().all(|m| m.role != Role::Tool));
}

#[test]
fn malformed_arguments_fail_the_exchange() {
    let (bot, inbox, _) = bot(vec![tool_round(
        "call_1",
        "record_user_details",
        "{not json",
    )]);

    let err = bot.chat("hello", &[]).unwrap_err();

    assert!(matches!(err, ChatError::InvalidToolArguments { .. }));
    assert!(inbox.0.lock().unwrap().is_empty());
}
