//! The chatbot context and its conversation loop.

pub mod core;
pub mod tool_executor;

pub use self::core::{run_loop, LoopConfig, TurnResult, TurnStats};

use crate::error::ChatError;
use crate::llm::{LlmClient, Message};
use crate::persona::PersonaContext;
use crate::tools::ToolRegistry;

/// Everything one exchange needs, built once and shared read-only.
pub struct Chatbot {
    persona: PersonaContext,
    system_prompt: String,
    client: Box<dyn LlmClient>,
    tools: ToolRegistry,
    config: LoopConfig,
}

impl Chatbot {
    pub fn new(
        persona: PersonaContext,
        client: Box<dyn LlmClient>,
        tools: ToolRegistry,
        config: LoopConfig,
    ) -> Self {
        let system_prompt = persona.system_prompt();
        Self {
            persona,
            system_prompt,
            client,
            tools,
            config,
        }
    }

    /// Answer `message` given prior `history`. Only the final text is returned.
    pub fn chat(&self, message: &str, history: &[Message]) -> Result<String, ChatError> {
        self.chat_turn(message, history).map(|turn| turn.answer)
    }

    /// Like `chat`, with usage statistics and the exchange's working transcript
    pub fn chat_turn(&self, message: &str, history: &[Message]) -> Result<TurnResult, ChatError> {
        run_loop(
            self.client.as_ref(),
            &self.tools,
            &self.config,
            &self.system_prompt,
            history,
            message,
        )
    }

    pub fn persona(&self) -> &PersonaContext {
        &self.persona
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockLlmClient, RecordingNotifier};
    use std::sync::Arc;

    fn chatbot(client: MockLlmClient) -> Chatbot {
        let persona = PersonaContext::new("Test Person", "Summary", "Profile");
        let tools = ToolRegistry::new(Arc::new(RecordingNotifier::default()));
        Chatbot::new(persona, Box::new(client), tools, LoopConfig::default())
    }

    #[test]
    fn test_chat_returns_answer_only() {
        let client = MockLlmClient::new(vec![
            MockLlmClient::response_with_tool_calls(&[(
                "c1",
                "record_unknown_question",
                r#"{"question":"favourite colour"}"#,
            )]),
            MockLlmClient::response_with_content("I'm not sure, sorry!"),
        ]);
        let bot = chatbot(client.clone());

        let answer = bot.chat("Favourite colour?", &[]).unwrap();

        assert_eq!(answer, "I'm not sure, sorry!");
        assert_eq!(client.requests().len(), 2);
    }

    #[test]
    fn test_system_prompt_sent_first() {
        let client = MockLlmClient::new(vec![MockLlmClient::response_with_content("ok")]);
        let bot = chatbot(client.clone());

        bot.chat("hi", &[]).unwrap();

        let first = &client.requests()[0].messages[0];
        assert_eq!(first.content.as_deref(), Some(bot.system_prompt()));
        assert!(bot.system_prompt().contains("Test Person"));
    }

    #[test]
    fn test_history_not_mutated() {
        let client = MockLlmClient::new(vec![MockLlmClient::response_with_content("ok")]);
        let bot = chatbot(client);
        let history = vec![Message::user("earlier"), Message::assistant("reply")];
        let before = history.clone();

        bot.chat("now", &history).unwrap();

        assert_eq!(history, before);
    }
}
