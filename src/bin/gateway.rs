//! persona-chat-gateway: the website chat server.
//!
//! Usage:
//!   persona-chat-gateway [--config persona-chat.toml] [--host 0.0.0.0] [--port 7860]
//!
//! Environment variables:
//!   PERSONA_CHAT_CONFIG - Config file path
//!   PERSONA_CHAT_HOST / PERSONA_CHAT_PORT - Listen address overrides
//!   OPENAI_API_KEY - Completion API key (name configurable)
//!   PUSHOVER_TOKEN / PUSHOVER_USER - Notification credentials

use anyhow::{Context, Result};
use clap::Parser;
use persona_chat::cli::Args;
use persona_chat::context_factory;
use persona_chat::gateway::server;
use persona_chat::logging;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "persona-chat-gateway", about = "Serve the persona chat website")]
struct GatewayArgs {
    #[arg(long, env = "PERSONA_CHAT_HOST", help = "Address to bind")]
    host: Option<String>,

    #[arg(long, env = "PERSONA_CHAT_PORT", help = "Port to listen on")]
    port: Option<u16>,

    #[arg(short, long, env = "PERSONA_CHAT_CONFIG", help = "Path to config file")]
    config: Option<PathBuf>,

    #[arg(long, env = "PERSONA_CHAT_MODEL", help = "Override the model name")]
    model: Option<String>,

    #[arg(long, env = "PERSONA_CHAT_BASE_URL", help = "Override the API base URL")]
    base_url: Option<String>,

    #[arg(
        long = "max-rounds",
        value_name = "N",
        help = "Maximum model round trips per exchange"
    )]
    max_rounds: Option<usize>,

    #[arg(long, help = "Verbose output")]
    verbose: bool,

    #[arg(long, help = "Dump assembled system prompt at startup")]
    dump_prompt: bool,
}

impl GatewayArgs {
    fn common(&self) -> Args {
        Args {
            config: self.config.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            max_rounds: self.max_rounds,
            verbose: self.verbose,
            dump_prompt: self.dump_prompt,
            ..Args::default()
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = GatewayArgs::parse();
    logging::init_logging(args.verbose);

    let mut cfg = args.common().load_config()?;
    if let Some(host) = &args.host {
        cfg.gateway.host = host.clone();
    }
    if let Some(port) = args.port {
        cfg.gateway.port = port;
    }

    // Built outside the async runtime: the blocking HTTP clients inside must
    // not be created or dropped on a runtime thread.
    let bot = Arc::new(context_factory::build_chatbot(&cfg)?);

    if args.dump_prompt {
        eprintln!(
            "=== SYSTEM PROMPT ===\n{}\n=== END SYSTEM PROMPT ===",
            bot.system_prompt()
        );
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(server::run(cfg.gateway.clone(), bot.clone()))?;

    drop(runtime);
    drop(bot);
    Ok(())
}
