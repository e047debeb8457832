//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pennyplan_shared::types::{Currency, Money};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(
    name = "pennyplan",
    version,
    about = "Savings plans, progress tracking and budget roll-ups",
    long_about = "PennyPlan turns a savings goal into a month-by-month schedule, \
                  tracks logged progress against it and splits a project's \
                  unspent budget into buckets."
)]
pub struct Cli {
    /// Directory holding default.toml and {RUN_MODE}.toml
    #[arg(long, global = true, default_value = "config", env = "PENNYPLAN_CONFIG_DIR")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a schedule, optionally reconciled against logged months
    Plan(PlanArgs),

    /// Summarize projects from a snapshot file
    Report(ReportArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    /// Goal in minor units (cents)
    #[arg(long, allow_negative_numbers = true, required_unless_present = "goal_major")]
    pub goal: Option<i64>,

    /// Goal in major units (e.g. 1250.50), converted with --currency
    #[arg(long, conflicts_with = "goal", allow_negative_numbers = true)]
    pub goal_major: Option<Decimal>,

    /// Number of months
    #[arg(short, long)]
    pub months: u32,

    /// savings, investment or hybrid
    #[arg(short = 't', long, default_value = "savings")]
    pub plan_type: String,

    /// Assumed annual growth rate, e.g. 0.06
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Percent of a hybrid plan that stays flat
    #[arg(long)]
    pub savings_share: Option<u8>,

    /// Logged amount for a month, MONTH=AMOUNT in minor units (repeatable)
    #[arg(short, long = "actual", value_parser = parse_actual)]
    pub actuals: Vec<(u32, Money)>,

    /// Re-spread what is still missing over the months not yet logged
    #[arg(long)]
    pub rebalance: bool,

    /// Currency for --goal-major and text output
    #[arg(long, default_value = "USD")]
    pub currency: Currency,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Snapshot JSON file with projects, categories and expenses
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Only report the project with this name
    #[arg(short, long)]
    pub project: Option<String>,

    /// Currency for text output
    #[arg(long, default_value = "USD")]
    pub currency: Currency,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable lines
    Text,
}

/// Parses `MONTH=AMOUNT`.
fn parse_actual(s: &str) -> Result<(u32, Money), String> {
    let (month, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MONTH=AMOUNT, got '{s}'"))?;
    let month = month
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid month '{month}': {e}"))?;
    let amount = amount
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
    Ok((month, Money::from_minor(amount)))
}
