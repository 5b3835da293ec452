//! Configuration loading.
//!
//! Settings come from an optional TOML file, with `${VAR}` references
//! resolved from the environment (after `.env` is loaded by the binaries).
//! Command-line flags are applied on top by the callers.

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default cap on model/tool round trips per exchange
pub const DEFAULT_MAX_ROUNDS: usize = 12;

pub const CONFIG_ENV: &str = "PERSONA_CHAT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "persona-chat.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub persona: PersonaSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub notifier: NotifierSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersonaSettings {
    pub name: String,
    #[serde(default = "default_summary_path")]
    pub summary_path: PathBuf,
    #[serde(default = "default_profile_path")]
    pub profile_path: PathBuf,
}

impl Default for PersonaSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            summary_path: default_summary_path(),
            profile_path: default_profile_path(),
        }
    }
}

fn default_summary_path() -> PathBuf {
    PathBuf::from("me/summary.txt")
}

fn default_profile_path() -> PathBuf {
    PathBuf::from("me/profile.txt")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Direct key or `${VAR}` reference
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            api_key_env: default_api_key_env(),
            max_rounds: default_max_rounds(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_rounds() -> usize {
    DEFAULT_MAX_ROUNDS
}

fn default_timeout_secs() -> u64 {
    120
}

impl LlmSettings {
    /// Resolve the API key, preferring the configured value over the env var
    pub fn resolve_api_key(&self) -> Result<SecretString> {
        if let Some(key) = self.api_key.as_deref().and_then(resolve_env_ref) {
            return Ok(SecretString::from(key));
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured. Set {} or llm.api_key in the config file.",
                    self.api_key_env
                )
            })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_pushover_url")]
    pub api_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default = "default_user_env")]
    pub user_env: String,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_pushover_url(),
            token: None,
            token_env: default_token_env(),
            user: None,
            user_env: default_user_env(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_pushover_url() -> String {
    crate::notifier::PUSHOVER_API_URL.to_string()
}

fn default_token_env() -> String {
    "PUSHOVER_TOKEN".to_string()
}

fn default_user_env() -> String {
    "PUSHOVER_USER".to_string()
}

impl NotifierSettings {
    /// Pushover token and user key, if both are available
    pub fn resolve_credentials(&self) -> Option<(SecretString, SecretString)> {
        let token = resolve_setting(self.token.as_deref(), &self.token_env)?;
        let user = resolve_setting(self.user.as_deref(), &self.user_env)?;
        Some((SecretString::from(token), SecretString::from(user)))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewaySettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    /// Photo path relative to `assets_dir`
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tagline: None,
            links: Vec::new(),
            photo: None,
            assets_dir: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7860
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Expand a `${VAR}` reference; plain values pass through
fn resolve_env_ref(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let env_var = &value[2..value.len() - 1];
        std::env::var(env_var).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn resolve_setting(value: Option<&str>, env_var: &str) -> Option<String> {
    value
        .and_then(resolve_env_ref)
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.is_empty()))
}

impl Config {
    /// Load from an explicit path; the file must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from `$PERSONA_CHAT_CONFIG` or `./persona-chat.toml`, falling back to defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load_from(local);
        }
        Ok(Self::default())
    }

    /// Check the configuration, returning every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.persona.name.trim().is_empty() {
            errors.push("[persona] name must be set".to_string());
        }
        if self.llm.model.trim().is_empty() {
            errors.push("[llm] model must not be empty".to_string());
        }
        if self.llm.base_url.trim().is_empty() {
            errors.push("[llm] base_url must not be empty".to_string());
        }
        if self.llm.max_rounds == 0 {
            errors.push("[llm] max_rounds must be at least 1".to_string());
        }
        if self.llm.timeout_secs == 0 {
            errors.push("[llm] timeout_secs must be at least 1".to_string());
        }
        for link in &self.gateway.links {
            if link.url.trim().is_empty() {
                errors.push(format!("[gateway] link '{}' has an empty url", link.label));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
