//! Command-line interface for ticket triage
//!
//! Provides argument parsing and subcommand handling for the binary.

use clap::{Parser, Subcommand};

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Routing-rule driven triage advisor for helpdesk tickets
#[derive(Parser)]
#[command(name = "ticket-triage")]
#[command(version)]
#[command(about = "Recommend an owner and escalation path for helpdesk tickets")]
#[command(
    long_about = "Fetches a ticket with its requester and group, reads the routing rules \
    from the help-center article mapped to the ticket's form, and asks a language model \
    who should own the ticket and where to escalate it.\n\n\
    Credentials are read from ZENDESK_EMAIL, ZENDESK_PASSWORD and OPENAI_API_KEY."
)]
pub struct Cli {
    /// Path to configuration file [default: config.toml, built-in settings
    /// when that file does not exist]
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Triage one or more tickets by id
    Triage {
        /// Ticket ids to process
        #[arg(required = true)]
        ticket_ids: Vec<String>,

        /// Also print the rendered prompt for each ticket
        #[arg(long)]
        show_prompt: bool,

        /// Write Prometheus metrics to this file after the run
        #[arg(long)]
        metrics_out: Option<String>,
    },
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Ticket Triage Configuration
# ===========================
#
# Every section is optional. Credentials are NOT read from this file; set
# ZENDESK_EMAIL, ZENDESK_PASSWORD and OPENAI_API_KEY in the environment.

# ─────────────────────────────────────────────────────────────────────────────
# HELPDESK
# ─────────────────────────────────────────────────────────────────────────────

[helpdesk]
# Account holding tickets, users and groups
base_url = "https://central-supportdesk.zendesk.com"

# Help-center sites are addressed by the subdomain mapped to each form.
# {subdomain} is replaced with that value.
help_center_url_template = "https://{subdomain}"

# Per-request timeout in seconds (1-300)
request_timeout_seconds = 30

# ─────────────────────────────────────────────────────────────────────────────
# ADVISORY MODEL
# ─────────────────────────────────────────────────────────────────────────────

[advisory]
# OpenAI-compatible API base URL; /chat/completions is appended
base_url = "https://api.openai.com/v1"
model = "gpt-4o"
system_prompt = "You are an expert in customer support ticket management."

# Per-request timeout in seconds (1-300)
request_timeout_seconds = 60

# ─────────────────────────────────────────────────────────────────────────────
# FORM → ROUTING ARTICLE MAP
# ─────────────────────────────────────────────────────────────────────────────
#
# When no [[forms]] entries are present, the built-in table is used.
# Declaring any entry replaces the built-in table entirely.

# ACRM
[[forms]]
form_id = "360001529340"
subdomain = "support.acrm.aurea.com"
article_id = "360020118499"

# Influitive
[[forms]]
form_id = "15690572875666"
subdomain = "support.influitive.com"
article_id = "15883286599058"

# Alpha
[[forms]]
form_id = "10746755231378"
subdomain = "alpha-school-support.zendesk.com"
article_id = "11998839408786"

# CFIN
[[forms]]
form_id = "8982987496978"
subdomain = "central-finance.zendesk.com"
article_id = "9081827578130"

# Crossover
[[forms]]
form_id = "360000071353"
subdomain = "support.crossover.com"
article_id = "360008529373"

# FogBugz
[[forms]]
form_id = "360000337594"
subdomain = "support.fogbugz.com"
article_id = "360013086800"

# Kandy
[[forms]]
form_id = "10791313891474"
subdomain = "supportportal.kandy.io"
article_id = "11713628235922"

# Skyvera Monetization and CxM
[[forms]]
form_id = "10855255360274"
subdomain = "skyvera-monetization.zendesk.com"
article_id = "16268337936914"

# PeerApp
[[forms]]
form_id = "17348612826386"
subdomain = "support.skyvera.com"
article_id = "360013199420"

# ─────────────────────────────────────────────────────────────────────────────
# BATCH
# ─────────────────────────────────────────────────────────────────────────────

[batch]
# Tickets processed at the same time when several ids are given
concurrency = 4

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG overrides)
log_level = "info"
"#
}
