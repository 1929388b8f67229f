use std::path::PathBuf;

use clap::{Parser, Subcommand};

use share_schedule::events::WeekFormat;

/// Week rotation for a co-owned vacation property.
#[derive(Parser)]
#[command(
    name = "share-schedule",
    version,
    about = "Week rotation for a co-owned vacation property"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file. Built-in 2025 tables when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print one year grouped by season block.
    Show(ShowArgs),
    /// Build a horizon of years and write it as JSON.
    Generate(GenerateArgs),
    /// Print per-owner fairness figures for a horizon.
    Stats(StatsArgs),
    /// Write one year's calendar events as JSON.
    Events(EventsArgs),
    /// Build and validate a range of years.
    Check(CheckArgs),
}

/// Which years to build and whether to rebalance them.
#[derive(clap::Args)]
pub struct HorizonArgs {
    /// First year of the horizon.
    #[arg(long, default_value_t = 2025)]
    pub from: i32,

    /// Number of years in the horizon.
    #[arg(long, default_value_t = 20)]
    pub years: usize,

    /// Skip multi-year rebalancing.
    #[arg(long)]
    pub no_rebalance: bool,
}

/// Arguments for the `show` subcommand.
#[derive(clap::Args)]
pub struct ShowArgs {
    /// Year to print.
    pub year: i32,

    #[command(flatten)]
    pub horizon: HorizonArgs,
}

/// Arguments for the `generate` subcommand.
#[derive(clap::Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub horizon: HorizonArgs,

    /// Output JSON path. Stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `stats` subcommand.
#[derive(clap::Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub horizon: HorizonArgs,
}

/// Arguments for the `events` subcommand.
#[derive(clap::Args)]
pub struct EventsArgs {
    /// Year to export.
    pub year: i32,

    /// Week layout: monday-sunday or sunday-saturday.
    #[arg(long, default_value = "monday-sunday")]
    pub format: WeekFormat,

    #[command(flatten)]
    pub horizon: HorizonArgs,

    /// Output JSON path. Stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub horizon: HorizonArgs,
}
