//! Ticket triage pipeline
//!
//! Runs the fixed sequence for one ticket:
//! ticket → fields → requester → group → form article → routing rules →
//! prompt → advisory recommendation.
//!
//! Every step depends on the previous one, so a single ticket is processed
//! strictly sequentially. The first failure aborts that ticket; nothing is
//! retried and no partial result is returned. Independent tickets may run
//! concurrently through [`TriagePipeline::process_many`].

use crate::advisory::{Advisor, AdvisoryClient};
use crate::config::{Config, Credentials};
use crate::error::{AppError, AppResult, TriageStep};
use crate::forms::FormArticleMap;
use crate::helpdesk::{HelpdeskApi, HelpdeskClient};
use crate::metrics::{Metrics, Outcome};
use crate::prompt::formulate_prompt;
use crate::routing::{ExtractionStrategy, parse_routing_information};
use crate::ticket::TicketInfo;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Successful triage of one ticket
#[derive(Debug, Clone)]
pub struct TriageOutcome {
    pub ticket_id: String,
    pub recommendation: String,
    pub prompt: String,
    pub strategy: ExtractionStrategy,
}

/// Triage pipeline over a helpdesk and an advisor
#[derive(Clone)]
pub struct TriagePipeline {
    helpdesk: Arc<dyn HelpdeskApi>,
    advisor: Arc<dyn Advisor>,
    forms: Arc<FormArticleMap>,
    metrics: Option<Arc<Metrics>>,
}

impl TriagePipeline {
    pub fn new(
        helpdesk: Arc<dyn HelpdeskApi>,
        advisor: Arc<dyn Advisor>,
        forms: Arc<FormArticleMap>,
    ) -> Self {
        Self {
            helpdesk,
            advisor,
            forms,
            metrics: None,
        }
    }

    /// Build the pipeline over the real helpdesk and advisory clients
    pub fn from_config(config: &Config, credentials: &Credentials) -> AppResult<Self> {
        Ok(Self::new(
            Arc::new(HelpdeskClient::new(&config.helpdesk, credentials)?),
            Arc::new(AdvisoryClient::new(&config.advisory, credentials)?),
            Arc::new(FormArticleMap::new(&config.forms)),
        ))
    }

    /// Record call counts, latencies and outcomes into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Triage a single ticket
    pub async fn process(&self, ticket_id: &str) -> AppResult<TriageOutcome> {
        let result = self.run(ticket_id).await;

        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(outcome) => {
                    metrics.record_extraction(outcome.strategy);
                    metrics.record_ticket("success");
                }
                Err(e) => metrics.record_ticket(e.kind()),
            }
        }

        match &result {
            Ok(outcome) => tracing::info!(
                ticket_id = %ticket_id,
                strategy = outcome.strategy.as_str(),
                "Ticket triaged"
            ),
            Err(e) => tracing::error!(
                ticket_id = %ticket_id,
                error_kind = e.kind(),
                step = e.step().map(|s| s.as_str()).unwrap_or("local"),
                error = %e,
                "Ticket triage failed"
            ),
        }

        result
    }

    /// Triage several tickets, at most `concurrency` at a time
    ///
    /// Results are returned in input order. A failing ticket does not affect
    /// the others.
    pub async fn process_many(
        &self,
        ticket_ids: &[String],
        concurrency: usize,
    ) -> Vec<(String, AppResult<TriageOutcome>)> {
        stream::iter(ticket_ids.iter().cloned())
            .map(|ticket_id| async move {
                let result = self.process(&ticket_id).await;
                (ticket_id, result)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    async fn run(&self, ticket_id: &str) -> AppResult<TriageOutcome> {
        let ticket = self
            .timed(TriageStep::FetchTicket, self.helpdesk.fetch_ticket(ticket_id))
            .await?;
        let info = TicketInfo::extract(&ticket);
        tracing::debug!(
            ticket_id = %ticket_id,
            issue_type = %info.issue_type,
            tags = info.tags.len(),
            "Extracted ticket fields"
        );

        let requester_id = required_id(
            info.requester_id.as_deref(),
            TriageStep::FetchRequester,
            "requester_id",
        )?;
        let requester_name = self
            .timed(
                TriageStep::FetchRequester,
                self.helpdesk.fetch_user_name(requester_id),
            )
            .await?;

        let group_id =
            required_id(info.group_id.as_deref(), TriageStep::FetchGroup, "group_id")?;
        let group_name = self
            .timed(
                TriageStep::FetchGroup,
                self.helpdesk.fetch_group_name(group_id),
            )
            .await?;

        let form_id = info.form_id.clone().unwrap_or_default();
        let article_ref = self
            .forms
            .resolve(&form_id)
            .ok_or_else(|| AppError::ArticleNotResolved {
                form_id: if form_id.is_empty() {
                    "none".to_string()
                } else {
                    form_id.clone()
                },
            })?;
        tracing::debug!(
            ticket_id = %ticket_id,
            form_id = %form_id,
            subdomain = %article_ref.subdomain,
            article_id = %article_ref.article_id,
            "Resolved routing article"
        );

        let article = self
            .timed(
                TriageStep::FetchArticle,
                self.helpdesk.fetch_article(article_ref),
            )
            .await?;

        let routing = parse_routing_information(&article.body)?;
        tracing::info!(
            ticket_id = %ticket_id,
            article_id = %article.id,
            strategy = routing.strategy().as_str(),
            entries = routing.len(),
            "Extracted routing rules"
        );

        let prompt = formulate_prompt(&info, &routing, &requester_name, &group_name);
        let recommendation = self
            .timed(TriageStep::Advisory, self.advisor.advise(&prompt))
            .await?;

        Ok(TriageOutcome {
            ticket_id: ticket_id.to_string(),
            recommendation,
            prompt,
            strategy: routing.strategy(),
        })
    }

    /// Await an external call, recording its latency and outcome
    async fn timed<T, F>(&self, step: TriageStep, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let started = Instant::now();
        let result = call.await;

        if let Some(metrics) = &self.metrics {
            let outcome = if result.is_ok() {
                Outcome::Success
            } else {
                Outcome::Failure
            };
            metrics.record_call(step, outcome, started.elapsed().as_secs_f64() * 1000.0);
        }

        result
    }
}

/// Triage `ticket_ids` with credentials read through `lookup`
///
/// Credentials are resolved before any client exists; a missing variable
/// fails the whole run with `MissingCredential` and nothing is sent.
pub async fn run_triage<F>(
    config: &Config,
    lookup: F,
    ticket_ids: &[String],
    metrics: Option<Arc<Metrics>>,
) -> AppResult<Vec<(String, AppResult<TriageOutcome>)>>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = Credentials::from_lookup(lookup)?;

    let mut pipeline = TriagePipeline::from_config(config, &credentials)?;
    if let Some(metrics) = metrics {
        pipeline = pipeline.with_metrics(metrics);
    }

    Ok(pipeline
        .process_many(ticket_ids, config.batch.concurrency)
        .await)
}

/// An id the next request needs; absence fails before any request is sent
fn required_id<'a>(id: Option<&'a str>, step: TriageStep, field: &str) -> AppResult<&'a str> {
    id.ok_or_else(|| AppError::MalformedResponse {
        step,
        reason: format!("ticket has no {}", field),
    })
}
