//! Advisory model access
//!
//! Sends the rendered triage prompt to a chat-completion model and returns its
//! free-text recommendation. One request per ticket: no streaming, no tools,
//! no retries.

pub mod client;
pub mod types;

pub use client::AdvisoryClient;

use crate::error::AppResult;
use async_trait::async_trait;

/// Produces an owner/escalation recommendation for a prompt
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, prompt: &str) -> AppResult<String>;
}
