//! Configuration management for ticket triage
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Credentials are never read from the file; they come from the environment
//! via [`Credentials::from_env`].

use crate::error::{AppError, AppResult};
use crate::forms::{FormArticle, builtin_form_articles};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Upper bound for any per-call timeout, in seconds
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
///
/// Every section is optional. An empty file yields a usable configuration
/// with the built-in form table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub helpdesk: HelpdeskConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default = "builtin_form_articles")]
    pub forms: Vec<FormArticle>,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            helpdesk: HelpdeskConfig::default(),
            advisory: AdvisoryConfig::default(),
            forms: builtin_form_articles(),
            batch: BatchConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Helpdesk API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HelpdeskConfig {
    /// Base URL of the helpdesk account (tickets, users, groups)
    #[serde(default = "default_helpdesk_base_url")]
    pub base_url: String,
    /// URL template for help-center sites; `{subdomain}` is substituted
    /// with the article reference's subdomain
    #[serde(default = "default_help_center_url_template")]
    pub help_center_url_template: String,
    #[serde(default = "default_helpdesk_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for HelpdeskConfig {
    fn default() -> Self {
        Self {
            base_url: default_helpdesk_base_url(),
            help_center_url_template: default_help_center_url_template(),
            request_timeout_seconds: default_helpdesk_timeout(),
        }
    }
}

fn default_helpdesk_base_url() -> String {
    "https://central-supportdesk.zendesk.com".to_string()
}

fn default_help_center_url_template() -> String {
    "https://{subdomain}".to_string()
}

fn default_helpdesk_timeout() -> u64 {
    30
}

/// Advisory (chat-completion) API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdvisoryConfig {
    /// OpenAI-compatible API base URL (the client appends `/chat/completions`)
    #[serde(default = "default_advisory_base_url")]
    pub base_url: String,
    #[serde(default = "default_advisory_model")]
    pub model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_advisory_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_advisory_base_url(),
            model: default_advisory_model(),
            system_prompt: default_system_prompt(),
            request_timeout_seconds: default_advisory_timeout(),
        }
    }
}

fn default_advisory_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_advisory_model() -> String {
    "gpt-4o".to_string()
}

fn default_system_prompt() -> String {
    "You are an expert in customer support ticket management.".to_string()
}

fn default_advisory_timeout() -> u64 {
    60
}

/// Batch processing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Maximum number of tickets processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load the configuration for a run
    ///
    /// An explicit path must exist and parse. Without one, `fallback` is read
    /// if it exists and the built-in defaults are used otherwise.
    pub fn load<P: AsRef<Path>>(explicit: Option<P>, fallback: &Path) -> AppResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if fallback.exists() => Self::from_file(fallback),
            None => {
                tracing::debug!(
                    path = %fallback.display(),
                    "No configuration file found, using built-in defaults"
                );
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`; call it explicitly when
    /// constructing a Config by hand.
    pub fn validate(&self) -> AppResult<()> {
        for (field, url) in [
            ("helpdesk.base_url", &self.helpdesk.base_url),
            (
                "helpdesk.help_center_url_template",
                &self.helpdesk.help_center_url_template,
            ),
            ("advisory.base_url", &self.advisory.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppError::Config(format!(
                    "{} '{}' must start with 'http://' or 'https://'",
                    field, url
                )));
            }
        }

        for (field, timeout) in [
            (
                "helpdesk.request_timeout_seconds",
                self.helpdesk.request_timeout_seconds,
            ),
            (
                "advisory.request_timeout_seconds",
                self.advisory.request_timeout_seconds,
            ),
        ] {
            if timeout == 0 {
                return Err(AppError::Config(format!(
                    "{} must be greater than 0",
                    field
                )));
            }
            if timeout > MAX_TIMEOUT_SECONDS {
                return Err(AppError::Config(format!(
                    "{} cannot exceed {} seconds, got {}",
                    field, MAX_TIMEOUT_SECONDS, timeout
                )));
            }
        }

        if self.advisory.model.trim().is_empty() {
            return Err(AppError::Config(
                "advisory.model cannot be empty".to_string(),
            ));
        }

        if self.advisory.system_prompt.trim().is_empty() {
            return Err(AppError::Config(
                "advisory.system_prompt cannot be empty".to_string(),
            ));
        }

        if self.batch.concurrency == 0 {
            return Err(AppError::Config(
                "batch.concurrency must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for form in &self.forms {
            if form.form_id().trim().is_empty()
                || form.subdomain().trim().is_empty()
                || form.article_id().trim().is_empty()
            {
                return Err(AppError::Config(format!(
                    "forms entry {:?} has an empty field; form_id, subdomain and article_id are required",
                    form
                )));
            }
            if !seen.insert(form.form_id()) {
                return Err(AppError::Config(format!(
                    "form_id '{}' is mapped more than once",
                    form.form_id()
                )));
            }
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}

/// Credentials for the helpdesk and advisory APIs
///
/// Read once at process start. Secrets are redacted from `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    helpdesk_email: String,
    helpdesk_password: String,
    advisory_api_key: String,
}

impl Credentials {
    pub const HELPDESK_EMAIL_VAR: &'static str = "ZENDESK_EMAIL";
    pub const HELPDESK_PASSWORD_VAR: &'static str = "ZENDESK_PASSWORD";
    pub const ADVISORY_API_KEY_VAR: &'static str = "OPENAI_API_KEY";

    pub fn new(
        helpdesk_email: impl Into<String>,
        helpdesk_password: impl Into<String>,
        advisory_api_key: impl Into<String>,
    ) -> Self {
        Self {
            helpdesk_email: helpdesk_email.into(),
            helpdesk_password: helpdesk_password.into(),
            advisory_api_key: advisory_api_key.into(),
        }
    }

    /// Read all credentials from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read all credentials through `lookup`
    ///
    /// An unset or blank variable is a `MissingCredential` error naming it.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &'static str| -> AppResult<String> {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or(AppError::MissingCredential { var })
        };

        Ok(Self {
            helpdesk_email: read(Self::HELPDESK_EMAIL_VAR)?,
            helpdesk_password: read(Self::HELPDESK_PASSWORD_VAR)?,
            advisory_api_key: read(Self::ADVISORY_API_KEY_VAR)?,
        })
    }

    pub fn helpdesk_email(&self) -> &str {
        &self.helpdesk_email
    }

    pub fn helpdesk_password(&self) -> &str {
        &self.helpdesk_password
    }

    pub fn advisory_api_key(&self) -> &str {
        &self.advisory_api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("helpdesk_email", &self.helpdesk_email)
            .field("helpdesk_password", &"<redacted>")
            .field("advisory_api_key", &"<redacted>")
            .finish()
    }
}
