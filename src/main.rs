use anyhow::Result;
use clap::Parser;
use persona_chat::cli::{self, Args};
use persona_chat::context_factory;
use persona_chat::logging;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let cfg = args.load_config()?;
    let bot = context_factory::build_chatbot(&cfg)?;

    if args.dump_prompt {
        eprintln!(
            "=== SYSTEM PROMPT ===\n{}\n=== END SYSTEM PROMPT ===",
            bot.system_prompt()
        );
    }

    match &args.prompt {
        Some(prompt) => cli::run_once(&bot, prompt),
        None => cli::run_repl(&bot),
    }
}
