//! Error types for ticket triage
//!
//! Every failure aborts processing of the current ticket. Variants carry enough
//! context that the rendered message names the step that failed.

use std::fmt;
use thiserror::Error;

/// A single external step of the triage pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriageStep {
    FetchTicket,
    FetchRequester,
    FetchGroup,
    FetchArticle,
    Advisory,
}

impl TriageStep {
    /// Convert to string representation for logging and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchTicket => "fetch_ticket",
            Self::FetchRequester => "fetch_requester",
            Self::FetchGroup => "fetch_group",
            Self::FetchArticle => "fetch_article",
            Self::Advisory => "advisory",
        }
    }

    /// Human-readable description used in error messages
    fn describe(&self) -> &'static str {
        match self {
            Self::FetchTicket => "fetching ticket details",
            Self::FetchRequester => "fetching requester details",
            Self::FetchGroup => "fetching group details",
            Self::FetchArticle => "fetching help center article",
            Self::Advisory => "querying advisory service",
        }
    }
}

impl fmt::Display for TriageStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Configuration error: required environment variable {var} is not set")]
    MissingCredential { var: &'static str },

    #[error("Error {step}: {status} {body}")]
    RemoteResource {
        step: TriageStep,
        status: u16,
        body: String,
    },

    #[error("Error {step}: request failed: {source}")]
    Transport {
        step: TriageStep,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error {step}: malformed response: {reason}")]
    MalformedResponse { step: TriageStep, reason: String },

    #[error("No relevant article found for the ticket's form ID ({form_id})")]
    ArticleNotResolved { form_id: String },

    #[error("No routing information found in the article")]
    NoRoutingInfoFound,

    #[error("Advisory service error: {0}")]
    AdvisoryService(String),
}

impl AppError {
    /// Stable snake_case label identifying the error kind
    ///
    /// Used as a metrics label and structured log field, so the set of values
    /// must stay bounded.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::MissingCredential { .. } => "configuration",
            Self::RemoteResource { .. } => "remote_resource",
            Self::Transport { .. } => "transport",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::ArticleNotResolved { .. } => "article_not_resolved",
            Self::NoRoutingInfoFound => "no_routing_info",
            Self::AdvisoryService(_) => "advisory_service",
        }
    }

    /// The pipeline step this error originated from, if it came from an external call
    pub fn step(&self) -> Option<TriageStep> {
        match self {
            Self::RemoteResource { step, .. }
            | Self::Transport { step, .. }
            | Self::MalformedResponse { step, .. } => Some(*step),
            Self::AdvisoryService(_) => Some(TriageStep::Advisory),
            _ => None,
        }
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
