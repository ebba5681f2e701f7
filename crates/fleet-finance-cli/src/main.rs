mod commands;
mod input;
mod output;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::assets::{AssetAgeArgs, DepreciationArgs};
use commands::loans::{ApplyPaymentArgs, PaymentArgs, RecordPaymentArgs};
use commands::reports::{
    AmortizationArgs, DashboardArgs, DebtScheduleArgs, DepreciationScheduleArgs,
};

/// Fleet loan and asset finance calculations
#[derive(Parser)]
#[command(
    name = "ffa",
    version,
    about = "Fleet loan and asset finance calculations",
    long_about = "A CLI for trucking fleet finance with decimal precision. Quotes level \
                  loan payments, projects amortization tables, applies payments, and \
                  reports straight-line depreciation, per-company debt and portfolio \
                  dashboard figures."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter for diagnostics on stderr (e.g. "debug", "fleet_finance_core=info")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Valuation instant for age-dependent figures (RFC 3339 or YYYY-MM-DD; defaults to now)
    #[arg(long, global = true, value_parser = commands::parse_instant)]
    as_of: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote the level monthly payment of a loan
    Payment(PaymentArgs),
    /// Split one payment into interest and principal
    ApplyPayment(ApplyPaymentArgs),
    /// Straight-line depreciation of a single asset
    Depreciation(DepreciationArgs),
    /// Age of an asset in years
    AssetAge(AssetAgeArgs),
    /// Project the amortization table of one or all active loans
    Amortization(AmortizationArgs),
    /// Outstanding debt and payments per company
    DebtSchedule(DebtScheduleArgs),
    /// Book value of every vehicle
    DepreciationSchedule(DepreciationScheduleArgs),
    /// Portfolio headline figures
    Dashboard(DashboardArgs),
    /// Record a payment against a loan and print the updated loan
    RecordPayment(RecordPaymentArgs),
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

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let as_of = cli.as_of;
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::loans::run_payment(args),
        Commands::ApplyPayment(args) => commands::loans::run_apply_payment(args),
        Commands::Depreciation(args) => commands::assets::run_depreciation(args),
        Commands::AssetAge(args) => commands::assets::run_asset_age(args, as_of),
        Commands::Amortization(args) => commands::reports::run_amortization(args),
        Commands::DebtSchedule(args) => commands::reports::run_debt_schedule(args),
        Commands::DepreciationSchedule(args) => {
            commands::reports::run_depreciation_schedule(args, as_of)
        }
        Commands::Dashboard(args) => commands::reports::run_dashboard(args, as_of),
        Commands::RecordPayment(args) => commands::loans::run_record_payment(args, as_of),
        Commands::Version => {
            println!("ffa {}", env!("CARGO_PKG_VERSION"));
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ffa",
            "dashboard",
            "--input",
            "fleet.yaml",
            "--as-of",
            "2024-06-01",
            "--output",
            "table",
        ])
        .unwrap();
        assert!(matches!(cli.output, OutputFormat::Table));
        assert_eq!(cli.as_of.unwrap().to_rfc3339(), "2024-06-01T00:00:00+00:00");
        assert!(matches!(cli.command, Commands::Dashboard(_)));
    }
}
