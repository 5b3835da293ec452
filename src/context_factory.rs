//! Builds the shared `Chatbot` from configuration.
//!
//! Used by both the REPL and the gateway binaries.

use crate::agent::{Chatbot, LoopConfig};
use crate::config::{Config, NotifierSettings};
use crate::llm::Client;
use crate::notifier::{LogNotifier, Notifier, PushoverNotifier};
use crate::persona::PersonaContext;
use crate::tools::ToolRegistry;
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Pick the notification sink. Without Pushover credentials, notifications are only logged.
pub fn build_notifier(settings: &NotifierSettings) -> Result<Arc<dyn Notifier>> {
    if !settings.enabled {
        tracing::info!("notifications disabled; recorded leads are only logged");
        return Ok(Arc::new(LogNotifier));
    }

    match settings.resolve_credentials() {
        Some((token, user)) => {
            let notifier = PushoverNotifier::new(&settings.api_url, token, user)?;
            Ok(Arc::new(notifier))
        }
        None => {
            tracing::warn!(
                "no Pushover credentials ({} / {}); recorded leads are only logged",
                settings.token_env,
                settings.user_env
            );
            Ok(Arc::new(LogNotifier))
        }
    }
}

/// Validate the config, load the persona, and wire up client and tools.
pub fn build_chatbot(cfg: &Config) -> Result<Chatbot> {
    if let Err(errors) = cfg.validate() {
        for err in &errors {
            tracing::error!("config error: {}", err);
        }
        return Err(anyhow!(
            "Configuration has {} validation error(s): {}",
            errors.len(),
            errors.join("; ")
        ));
    }

    let persona = PersonaContext::load(&cfg.persona)?;

    let api_key = cfg.llm.resolve_api_key()?;
    let client = Client::new(
        &cfg.llm.base_url,
        api_key,
        Duration::from_secs(cfg.llm.timeout_secs),
    )
    .context("Failed to create LLM client")?;

    let tools = ToolRegistry::new(build_notifier(&cfg.notifier)?);
    let loop_config = LoopConfig::new(cfg.llm.model.clone()).with_max_rounds(cfg.llm.max_rounds);

    tracing::info!(
        model = %cfg.llm.model,
        base_url = %cfg.llm.base_url,
        max_rounds = cfg.llm.max_rounds,
        "chatbot ready"
    );

    Ok(Chatbot::new(persona, Box::new(client), tools, loop_config))
}
