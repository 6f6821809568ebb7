mod commands;
mod input;
mod lead;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::lead::LeadArgs;
use commands::projection::ProjectArgs;
use commands::sensitivity::SensitivityArgs;

/// Keep-or-replace total cost of ownership for industrial assets
#[derive(Parser)]
#[command(
    name = "tco",
    version,
    about = "Keep-or-replace total cost of ownership for industrial assets",
    long_about = "Projects the discounted Life Cycle Cost of keeping an aging asset \
                  versus replacing it, with decimal precision. Reports the break-even \
                  year, cumulative savings, downtime and production-loss risk."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project cumulative discounted costs of keeping vs replacing the asset
    Project(ProjectArgs),
    /// Tier the aging asset's production-loss risk against the replacement price
    Risk(ProjectArgs),
    /// 2-way sensitivity of a projection metric to two parameters
    Sensitivity(SensitivityArgs),
    /// Request the audit report by email
    Lead(LeadArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Risk(args) => commands::projection::run_risk(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Lead(args) => commands::lead::run_lead(args),
        Commands::Version => {
            println!("tco {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
