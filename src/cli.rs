//! Terminal front end: one-shot prompts and the interactive REPL.

use crate::agent::{Chatbot, TurnStats};
use crate::config::Config;
use crate::llm::Message;
use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug, Default)]
#[command(
    name = "persona-chat",
    about = "Chat with a website persona from the terminal"
)]
pub struct Args {
    #[arg(short, long, help = "One-shot prompt mode")]
    pub prompt: Option<String>,

    #[arg(short, long, env = "PERSONA_CHAT_CONFIG", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "PERSONA_CHAT_MODEL", help = "Override the model name")]
    pub model: Option<String>,

    #[arg(long, env = "PERSONA_CHAT_BASE_URL", help = "Override the API base URL")]
    pub base_url: Option<String>,

    #[arg(
        long = "max-rounds",
        value_name = "N",
        help = "Maximum model round trips per exchange"
    )]
    pub max_rounds: Option<usize>,

    #[arg(long, help = "Verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Dump assembled system prompt at startup")]
    pub dump_prompt: bool,
}

impl Args {
    /// Load the config file (if any) and apply command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply_overrides(&mut cfg);
        Ok(cfg)
    }

    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(model) = &self.model {
            cfg.llm.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            cfg.llm.base_url = base_url.clone();
        }
        if let Some(n) = self.max_rounds {
            cfg.llm.max_rounds = n;
        }
    }
}

/// Get the path to the history file
fn history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".persona-chat")
        .join("history")
}

/// Print exchange stats to stderr
fn print_stats(duration: Duration, stats: &TurnStats) {
    let tokens = stats.input_tokens + stats.output_tokens;
    let token_display = if tokens >= 1000 {
        format!("{:.1}k", tokens as f64 / 1000.0)
    } else {
        tokens.to_string()
    };
    eprintln!(
        "[Duration: {:.1}s | Tokens: {} | Rounds: {} | Tools: {}]",
        duration.as_secs_f64(),
        token_display,
        stats.rounds,
        stats.tool_uses
    );
}

/// Record a finished exchange the way the web UI does: user message and answer only
pub fn record_exchange(history: &mut Vec<Message>, message: &str, answer: &str) {
    history.push(Message::user(message));
    history.push(Message::assistant(answer));
}

pub fn run_once(bot: &Chatbot, prompt: &str) -> Result<()> {
    let start = Instant::now();
    let turn = bot
        .chat_turn(prompt, &[])
        .context("Chat exchange failed")?;
    println!("{}", turn.answer);
    print_stats(start.elapsed(), &turn.stats);
    Ok(())
}

enum Command {
    Quit,
    Reset,
    Help,
    Prompt,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    match line.split_whitespace().next().unwrap_or("") {
        "/quit" | "/exit" => Command::Quit,
        "/reset" | "/clear" => Command::Reset,
        "/help" => Command::Help,
        "/prompt" => Command::Prompt,
        _ => Command::Unknown,
    }
}

pub fn run_repl(bot: &Chatbot) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut history: Vec<Message> = Vec::new();

    let history_file = history_path();
    let _ = rl.load_history(&history_file);

    println!(
        "Chatting with {} - type /help for commands, /quit to leave",
        bot.persona().name()
    );

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if line.starts_with('/') {
                    match parse_command(line) {
                        Command::Quit => break,
                        Command::Reset => {
                            history.clear();
                            println!("[conversation cleared]");
                        }
                        Command::Help => {
                            println!("/reset   start a new conversation");
                            println!("/prompt  show the system prompt");
                            println!("/quit    leave");
                        }
                        Command::Prompt => println!("{}", bot.system_prompt()),
                        Command::Unknown => eprintln!("Unknown command: {}", line),
                    }
                    continue;
                }

                let start = Instant::now();
                match bot.chat_turn(line, &history) {
                    Ok(turn) => {
                        println!("{}> {}", bot.persona().name(), turn.answer);
                        print_stats(start.elapsed(), &turn.stats);
                        record_exchange(&mut history, line, &turn.answer);
                    }
                    Err(e) => {
                        eprintln!("Error: {}", e);
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    if let Some(parent) = history_file.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = rl.save_history(&history_file);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let args = Args::parse_from([
            "persona-chat",
            "--model",
            "gpt-4.1",
            "--max-rounds",
            "5",
        ]);
        let mut cfg = Config::default();
        args.apply_overrides(&mut cfg);

        assert_eq!(cfg.llm.model, "gpt-4.1");
        assert_eq!(cfg.llm.max_rounds, 5);
        assert_eq!(cfg.llm.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_record_exchange_keeps_only_user_and_answer() {
        let mut history = Vec::new();
        record_exchange(&mut history, "What's your email?", "Leave yours and I'll reply!");

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].content.as_deref(), Some("Leave yours and I'll reply!"));
    }

    #[test]
    fn test_parse_command() {
        assert!(matches!(parse_command("/quit"), Command::Quit));
        assert!(matches!(parse_command("/exit"), Command::Quit));
        assert!(matches!(parse_command("/reset now"), Command::Reset));
        assert!(matches!(parse_command("/nope"), Command::Unknown));
    }
}
