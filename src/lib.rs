//! Persona chat - a website chatbot that speaks as its owner
//!
//! This library provides the core functionality for the persona-chat CLI
//! and the web gateway.

pub mod agent;
pub mod cli;
pub mod config;
pub mod context_factory;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod logging;
pub mod notifier;
pub mod persona;
pub mod tools;

#[cfg(test)]
mod test_utils;

// Re-export Args for the binaries
pub use cli::Args;
