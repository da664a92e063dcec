//! ticket-triage binary
//!
//! Triages the given tickets and prints one decision per ticket. Failures are
//! reported per ticket on stderr and make the process exit non-zero.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use ticket_triage::{
    cli::{Cli, Command, DEFAULT_CONFIG_PATH, generate_config_template},
    config::Config,
    error::{AppError, AppResult},
    metrics::Metrics,
    pipeline::run_triage,
    telemetry,
};
use tracing::Instrument;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<ExitCode> {
    match cli.command {
        Command::Config { output } => {
            write_config_template(output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Triage {
            ticket_ids,
            show_prompt,
            metrics_out,
        } => {
            let config = Config::load(cli.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH))?;
            telemetry::init(&config.observability.log_level);

            let run_id = uuid::Uuid::new_v4();
            tracing::info!(
                run_id = %run_id,
                tickets = ticket_ids.len(),
                forms = config.forms.len(),
                concurrency = config.batch.concurrency,
                "Starting triage run"
            );

            let metrics = Arc::new(
                Metrics::new()
                    .map_err(|e| AppError::Config(format!("Failed to create metrics: {}", e)))?,
            );

            let results = run_triage(
                &config,
                |var| std::env::var(var).ok(),
                &ticket_ids,
                Some(metrics.clone()),
            )
            .instrument(tracing::info_span!("triage_run", run_id = %run_id))
            .await?;

            let mut failures = 0usize;
            for (ticket_id, result) in results {
                match result {
                    Ok(outcome) => {
                        if show_prompt {
                            println!("Prompt for Ticket {}:", ticket_id);
                            println!("{}", outcome.prompt);
                            println!();
                        }
                        println!("Decision for Ticket {}:", ticket_id);
                        println!("{}", outcome.recommendation);
                        println!();
                    }
                    Err(e) => {
                        failures += 1;
                        eprintln!("Error processing ticket {}: {}", ticket_id, e);
                    }
                }
            }

            if let Some(path) = metrics_out {
                let exposition = metrics
                    .gather()
                    .map_err(|e| AppError::Config(format!("Failed to encode metrics: {}", e)))?;
                std::fs::write(&path, exposition).map_err(|e| {
                    AppError::Config(format!("Failed to write metrics to '{}': {}", path, e))
                })?;
            }

            tracing::info!(
                run_id = %run_id,
                tickets = ticket_ids.len(),
                failures,
                "Triage run finished"
            );

            Ok(if failures == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn write_config_template(output: Option<&str>) -> AppResult<()> {
    let template = generate_config_template();
    match output {
        Some(path) => {
            std::fs::write(path, template).map_err(|e| {
                AppError::Config(format!("Failed to write template to '{}': {}", path, e))
            })?;
            eprintln!("Configuration template written to {}", path);
        }
        None => print!("{}", template),
    }
    Ok(())
}
