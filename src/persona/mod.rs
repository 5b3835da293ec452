//! The persona the assistant speaks as.
//!
//! A `PersonaContext` is built once at startup from a short summary and a
//! long-form profile, then shared read-only by every exchange.

pub mod loader;

use crate::config::PersonaSettings;
use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaContext {
    name: String,
    summary: String,
    profile: String,
}

impl PersonaContext {
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            profile: profile.into(),
        }
    }

    /// Read both source documents. Any failure is fatal; there is no partial persona.
    pub fn load(settings: &PersonaSettings) -> Result<Self> {
        let summary = loader::load_document(&settings.summary_path)
            .context("Failed to load persona summary")?;
        let profile = loader::load_document(&settings.profile_path)
            .context("Failed to load persona profile")?;

        tracing::info!(
            persona = %settings.name,
            summary_bytes = summary.len(),
            profile_bytes = profile.len(),
            "persona loaded"
        );

        Ok(Self::new(settings.name.clone(), summary, profile))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// System instruction prepended to every completion request
    pub fn system_prompt(&self) -> String {
        let name = &self.name;
        format!(
            "You are acting as {name}. You are answering questions on {name}'s website, \
particularly questions related to {name}'s career, background, skills and experience. \
Your responsibility is to represent {name} for interactions on the website as faithfully as possible. \
If you don't know the answer to any question, use your record_unknown_question tool to record it. \
If the user is engaging in discussion, try to steer them toward getting in touch via email and record it.

## Summary:
{summary}

## Profile:
{profile}

Stay in character as {name}.
",
            name = name,
            summary = self.summary,
            profile = self.profile,
        )
    }
}
