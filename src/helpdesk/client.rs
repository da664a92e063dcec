//! HTTP client for the helpdesk REST API
//!
//! Uses basic authentication (account email + password/API token) on every
//! request. Any non-2xx response becomes `AppError::RemoteResource` carrying
//! the status and body. No retries.

use super::HelpdeskApi;
use super::models::{Article, ArticleEnvelope, GroupEnvelope, TicketEnvelope, TicketPayload, UserEnvelope};
use crate::config::{Credentials, HelpdeskConfig};
use crate::error::{AppError, AppResult, TriageStep};
use crate::forms::ArticleReference;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Placeholder substituted in `help_center_url_template`
const SUBDOMAIN_PLACEHOLDER: &str = "{subdomain}";

/// Helpdesk REST client
#[derive(Clone)]
pub struct HelpdeskClient {
    http: reqwest::Client,
    base_url: String,
    help_center_url_template: String,
    email: String,
    password: String,
}

impl HelpdeskClient {
    /// Build a client from validated configuration and credentials
    pub fn new(config: &HelpdeskConfig, credentials: &Credentials) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build helpdesk HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            help_center_url_template: config
                .help_center_url_template
                .trim_end_matches('/')
                .to_string(),
            email: credentials.helpdesk_email().to_string(),
            password: credentials.helpdesk_password().to_string(),
        })
    }

    /// Base URL of the help-center site serving `subdomain`
    pub fn help_center_base(&self, subdomain: &str) -> String {
        self.help_center_url_template
            .replace(SUBDOMAIN_PLACEHOLDER, subdomain)
    }

    pub fn ticket_url(&self, ticket_id: &str) -> AppResult<Url> {
        resource_url(&self.base_url, &["api", "v2", "tickets"], ticket_id)
    }

    pub fn user_url(&self, user_id: &str) -> AppResult<Url> {
        resource_url(&self.base_url, &["api", "v2", "users"], user_id)
    }

    pub fn group_url(&self, group_id: &str) -> AppResult<Url> {
        resource_url(&self.base_url, &["api", "v2", "groups"], group_id)
    }

    pub fn article_url(&self, article: &ArticleReference) -> AppResult<Url> {
        resource_url(
            &self.help_center_base(&article.subdomain),
            &["api", "v2", "help_center", "articles"],
            &article.article_id,
        )
    }

    /// Issue one authenticated GET and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, step: TriageStep, url: Url) -> AppResult<T> {
        tracing::debug!(step = step.as_str(), url = %url, "Helpdesk request");

        let response = self
            .http
            .get(url)
            .basic_auth(&self.email, Some(&self.password))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| AppError::Transport { step, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| AppError::Transport { step, source })?;

        if !status.is_success() {
            tracing::warn!(
                step = step.as_str(),
                status = status.as_u16(),
                "Helpdesk returned non-success status"
            );
            return Err(AppError::RemoteResource {
                step,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| AppError::MalformedResponse {
            step,
            reason: e.to_string(),
        })
    }
}

/// Append `segments` and `<id>.json` to `base`
///
/// The id is pushed as one percent-encoded path segment; `/`, `?` and `..`
/// inside it stay part of the id.
fn resource_url(base: &str, segments: &[&str], id: &str) -> AppResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| AppError::Config(format!("Invalid helpdesk URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Config(format!("Helpdesk URL '{}' cannot carry a path", base)))?
        .pop_if_empty()
        .extend(segments)
        .push(&format!("{}.json", id));
    Ok(url)
}

#[async_trait]
impl HelpdeskApi for HelpdeskClient {
    async fn fetch_ticket(&self, ticket_id: &str) -> AppResult<TicketPayload> {
        let envelope: TicketEnvelope = self
            .get_json(TriageStep::FetchTicket, self.ticket_url(ticket_id)?)
            .await?;
        Ok(envelope.ticket)
    }

    async fn fetch_user_name(&self, user_id: &str) -> AppResult<String> {
        let envelope: UserEnvelope = self
            .get_json(TriageStep::FetchRequester, self.user_url(user_id)?)
            .await?;
        envelope.user.name.ok_or_else(|| AppError::MalformedResponse {
            step: TriageStep::FetchRequester,
            reason: format!("user {} has no name", user_id),
        })
    }

    async fn fetch_group_name(&self, group_id: &str) -> AppResult<String> {
        let envelope: GroupEnvelope = self
            .get_json(TriageStep::FetchGroup, self.group_url(group_id)?)
            .await?;
        envelope.group.name.ok_or_else(|| AppError::MalformedResponse {
            step: TriageStep::FetchGroup,
            reason: format!("group {} has no name", group_id),
        })
    }

    async fn fetch_article(&self, article: &ArticleReference) -> AppResult<Article> {
        let envelope: ArticleEnvelope = self
            .get_json(TriageStep::FetchArticle, self.article_url(article)?)
            .await?;
        let payload = envelope.article;
        let body = payload.body.ok_or_else(|| AppError::MalformedResponse {
            step: TriageStep::FetchArticle,
            reason: format!(
                "article {} on {} has no body",
                article.article_id, article.subdomain
            ),
        })?;

        Ok(Article {
            id: payload.id.unwrap_or_else(|| article.article_id.clone()),
            title: payload.title,
            body,
        })
    }
}
