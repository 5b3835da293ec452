//! Operator notifications for recorded leads and unanswered questions.
//!
//! Delivery is best-effort: failures are logged and never reach the caller.

use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{info, warn};

pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Sink for operator notifications
pub trait Notifier: Send + Sync {
    fn push(&self, text: &str);
}

/// Pushover delivery over HTTPS.
pub struct PushoverNotifier {
    api_url: String,
    token: SecretString,
    user: SecretString,
    http: reqwest::blocking::Client,
}

impl PushoverNotifier {
    pub fn new(api_url: &str, token: SecretString, user: SecretString) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build notifier HTTP client")?;
        Ok(Self {
            api_url: api_url.to_string(),
            token,
            user,
            http,
        })
    }

    fn deliver(&self, text: &str) -> Result<()> {
        let resp = self
            .http
            .post(&self.api_url)
            .form(&[
                ("token", self.token.expose_secret()),
                ("user", self.user.expose_secret()),
                ("message", text),
            ])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("Pushover returned {}: {}", status.as_u16(), body));
        }
        Ok(())
    }
}

impl Notifier for PushoverNotifier {
    fn push(&self, text: &str) {
        if let Err(e) = self.deliver(text) {
            warn!(error = %e, "notification delivery failed");
        }
    }
}

/// Used when no push credentials are configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn push(&self, text: &str) {
        info!(target: "persona_chat::notify", "{}", text);
    }
}
