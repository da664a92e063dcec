//! Prometheus metrics collection for ticket triage
//!
//! Tracks:
//! - External calls by pipeline step and outcome
//! - Per-step latency
//! - Which extraction strategy produced each routing table
//! - Ticket outcomes (success or error kind)
//!
//! The CLI writes the registry in Prometheus text format when `--metrics-out`
//! is given.

use crate::error::TriageStep;
use crate::routing::ExtractionStrategy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Outcome label for ticket-level and call-level counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Convert outcome to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

/// Metrics collector for ticket triage
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    remote_calls_total: IntCounterVec,
    step_duration: HistogramVec,
    extractions_total: IntCounterVec,
    tickets_total: IntCounterVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 5 steps × 2 outcomes
        let remote_calls_total = IntCounterVec::new(
            Opts::new(
                "triage_remote_calls_total",
                "Total external calls by pipeline step and outcome",
            ),
            &["step", "outcome"],
        )?;

        let step_duration = HistogramVec::new(
            HistogramOpts::new(
                "triage_step_duration_ms",
                "External call latency in milliseconds by pipeline step",
            )
            .buckets(vec![
                10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
            ]),
            &["step"],
        )?;

        let extractions_total = IntCounterVec::new(
            Opts::new(
                "triage_extractions_total",
                "Routing tables extracted by strategy",
            ),
            &["strategy"],
        )?;

        // outcome is "success" or an AppError::kind() label (bounded set)
        let tickets_total = IntCounterVec::new(
            Opts::new("triage_tickets_total", "Tickets processed by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(remote_calls_total.clone()))?;
        registry.register(Box::new(step_duration.clone()))?;
        registry.register(Box::new(extractions_total.clone()))?;
        registry.register(Box::new(tickets_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            remote_calls_total,
            step_duration,
            extractions_total,
            tickets_total,
        })
    }

    /// Record one external call and its latency
    pub fn record_call(&self, step: TriageStep, outcome: Outcome, duration_ms: f64) {
        self.remote_calls_total
            .with_label_values(&[step.as_str(), outcome.as_str()])
            .inc();
        self.step_duration
            .with_label_values(&[step.as_str()])
            .observe(duration_ms);
    }

    pub fn record_extraction(&self, strategy: ExtractionStrategy) {
        self.extractions_total
            .with_label_values(&[strategy.as_str()])
            .inc();
    }

    /// Record a finished ticket; `outcome` is "success" or an error kind label
    pub fn record_ticket(&self, outcome: &str) {
        self.tickets_total.with_label_values(&[outcome]).inc();
    }

    /// Gather all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    #[cfg(test)]
    fn ticket_count(&self, outcome: &str) -> u64 {
        self.tickets_total.with_label_values(&[outcome]).get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new_registers() {
        let metrics = Metrics::new().expect("should create metrics");
        metrics.record_call(TriageStep::FetchTicket, Outcome::Success, 12.0);
        let output = metrics.gather().expect("should gather");
        assert!(output.contains("triage_remote_calls_total"));
        assert!(output.contains("step=\"fetch_ticket\""));
        assert!(output.contains("triage_step_duration_ms"));
    }

    #[test]
    fn test_extraction_strategy_label() {
        let metrics = Metrics::new().expect("should create metrics");
        metrics.record_extraction(ExtractionStrategy::Keyword);
        let output = metrics.gather().expect("should gather");
        assert!(output.contains("triage_extractions_total{strategy=\"keyword\"} 1"));
    }

    #[test]
    fn test_ticket_outcomes_accumulate() {
        let metrics = Metrics::new().expect("should create metrics");
        metrics.record_ticket("success");
        metrics.record_ticket("success");
        metrics.record_ticket("no_routing_info");
        assert_eq!(metrics.ticket_count("success"), 2);
        assert_eq!(metrics.ticket_count("no_routing_info"), 1);
    }
}
