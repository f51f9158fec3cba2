//! Launch command handler
//!
//! Validates the arguments, loads the connection settings, runs the launch
//! pipeline and reports the verdict.

use anyhow::{Context, Result};
use atomrun_client::{ControlPlaneClient, Launcher};
use atomrun_core::domain::execution::RunVerdict;
use atomrun_core::domain::run::RunRequest;
use colored::*;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Arguments for a single launch
#[derive(Debug, Clone)]
pub struct LaunchArgs {
    pub atom_name: String,
    pub process_name: String,
    pub wait: bool,
    /// Raw `key:value;key:value` string
    pub dynamic_properties: String,
    /// Overrides the default configuration file location
    pub config: Option<PathBuf>,
}

/// Handle a launch
///
/// The request is validated and the configuration loaded before anything is
/// sent to the API.
pub async fn handle_launch(args: LaunchArgs) -> Result<RunVerdict> {
    let request = RunRequest::parse(
        &args.atom_name,
        &args.process_name,
        args.wait,
        &args.dynamic_properties,
    )?;

    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;
    info!("Loaded configuration from {}", config_path.display());

    let client = ControlPlaneClient::new(config.credentials())
        .context("Failed to initialize API client")?;

    let verdict = Launcher::new(client)
        .run(&request)
        .await
        .context("Executing API process steps")?;

    print_verdict(&request, &verdict);

    Ok(verdict)
}

/// Process exit code for a verdict
pub fn exit_status(verdict: &RunVerdict) -> u8 {
    if verdict.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

fn print_verdict(request: &RunRequest, verdict: &RunVerdict) {
    match verdict {
        RunVerdict::Submitted => println!(
            "{} Process {} successfully sent to Atom {}",
            "✓".green().bold(),
            request.process_name.bold(),
            request.atom_name.bold()
        ),
        RunVerdict::Completed { completed_at } => {
            let when = completed_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S %Z").to_string())
                .unwrap_or_else(|| "an unknown time".to_string());
            println!(
                "{} Process {} completed successfully at {}",
                "✓".green().bold(),
                request.process_name.bold(),
                when
            );
        }
        RunVerdict::Failed { status, message } => {
            println!(
                "{} Process {} ended with status {}",
                "✗".red().bold(),
                request.process_name.bold(),
                status.to_string().red()
            );
            if let Some(message) = message {
                println!("  {}", message.dimmed());
            }
        }
        RunVerdict::Unresolved { status } => println!(
            "{} Unable to determine status of process {} execution ({})",
            "⚠".yellow().bold(),
            request.process_name.bold(),
            status.to_string().yellow()
        ),
    }
}
