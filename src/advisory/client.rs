//! HTTP client for an OpenAI-compatible chat-completion endpoint

use super::Advisor;
use super::types::{ChatCompletion, ChatCompletionRequest, ChatMessage};
use crate::config::{AdvisoryConfig, Credentials};
use crate::error::{AppError, AppResult, TriageStep};
use async_trait::async_trait;
use std::time::Duration;

/// Chat-completion client with a fixed model and system instruction
#[derive(Clone)]
pub struct AdvisoryClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    system_prompt: String,
    api_key: String,
}

impl AdvisoryClient {
    /// Build a client from validated configuration and credentials
    pub fn new(config: &AdvisoryConfig, credentials: &Credentials) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build advisory HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            api_key: credentials.advisory_api_key().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request body for `prompt`: system instruction first, then the prompt
    pub fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::user(prompt),
            ],
        }
    }
}

#[async_trait]
impl Advisor for AdvisoryClient {
    async fn advise(&self, prompt: &str) -> AppResult<String> {
        let request = self.build_request(prompt);

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "Sending advisory request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AdvisoryService(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| AppError::AdvisoryService(format!("failed to read error body: {}", e)))?;
            tracing::warn!(status = status.as_u16(), "Advisory endpoint returned non-success status");
            return Err(AppError::RemoteResource {
                step: TriageStep::Advisory,
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AppError::AdvisoryService(format!("invalid completion response: {}", e)))?;

        completion
            .first_content()
            .ok_or_else(|| AppError::AdvisoryService("response contained no choices".to_string()))
    }
}
