//! Ticket triage - routing-rule driven owner recommendations for helpdesk tickets
//!
//! Fetches a ticket and its context from the helpdesk, extracts routing rules
//! from the help-center article mapped to the ticket's form, and asks a
//! chat-completion model who should own the ticket and where to escalate it.

pub mod advisory;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod helpdesk;
pub mod metrics;
pub mod pipeline;
pub mod prompt;
pub mod routing;
pub mod telemetry;
pub mod ticket;
