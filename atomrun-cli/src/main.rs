//! Atomrun CLI
//!
//! Launches an integration process on an atom and optionally waits for it to
//! finish. Exits with 0 when the run was submitted (or completed, with
//! `--wait`) and 1 otherwise.

mod config;
mod launch;

use clap::Parser;
use launch::{EXIT_FAILURE, LaunchArgs, exit_status, handle_launch};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP_EPILOG: &str = "\
Dynamic process properties are key:value pairs separated by semicolons.
If a value contains spaces, quote the whole sequence:

    atomrun myatom myprocess -d \"DPP_1:abc123;DPP_2:xyz 321\" --wait";

#[derive(Parser)]
#[command(name = "atomrun", version)]
#[command(about = "Execute an integration process on an atom", after_help = HELP_EPILOG)]
struct Cli {
    /// Atom name where the process will run
    atom_name: String,

    /// Process name that will execute on the atom
    process_name: String,

    /// Wait for the execution to complete
    #[arg(short, long)]
    wait: bool,

    /// key:value dynamic process properties separated by ';'
    #[arg(short = 'd', long = "dynamicprops", default_value = "")]
    dynamic_properties: String,

    /// Configuration file (default: atomrun.toml next to the executable)
    #[arg(short, long, env = "ATOMRUN_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "atomrun=debug,atomrun_client=debug"
    } else {
        "atomrun=info,atomrun_client=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = LaunchArgs {
        atom_name: cli.atom_name,
        process_name: cli.process_name,
        wait: cli.wait,
        dynamic_properties: cli.dynamic_properties,
        config: cli.config,
    };

    match handle_launch(args).await {
        Ok(verdict) => ExitCode::from(exit_status(&verdict)),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "atomrun",
            "myatom",
            "myprocess",
            "-w",
            "-d",
            "key1:value1;key2:value2",
        ])
        .unwrap();
        assert_eq!(cli.atom_name, "myatom");
        assert_eq!(cli.process_name, "myprocess");
        assert!(cli.wait);
        assert_eq!(cli.dynamic_properties, "key1:value1;key2:value2");
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["atomrun", "myatom", "myprocess"]).unwrap();
        assert!(!cli.wait);
        assert!(!cli.verbose);
        assert_eq!(cli.dynamic_properties, "");
    }

    #[test]
    fn test_requires_both_names() {
        assert!(Cli::try_parse_from(["atomrun", "myatom"]).is_err());
    }
}
