//! Helpdesk API access
//!
//! Read-only access to tickets, users, groups and help-center articles.
//! [`HelpdeskApi`] is the seam the triage pipeline depends on; [`HelpdeskClient`]
//! is the HTTP implementation.

pub mod client;
pub mod models;

pub use client::HelpdeskClient;
pub use models::{Article, TicketPayload};

use crate::error::AppResult;
use crate::forms::ArticleReference;
use async_trait::async_trait;

/// Resource reads needed to triage a ticket
///
/// Every method is a single authenticated read. Implementations must not
/// retry; a failure aborts the current ticket.
#[async_trait]
pub trait HelpdeskApi: Send + Sync {
    async fn fetch_ticket(&self, ticket_id: &str) -> AppResult<TicketPayload>;

    async fn fetch_user_name(&self, user_id: &str) -> AppResult<String>;

    async fn fetch_group_name(&self, group_id: &str) -> AppResult<String>;

    async fn fetch_article(&self, article: &ArticleReference) -> AppResult<Article>;
}
