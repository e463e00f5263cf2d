//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Rolling 24-hour budget tracker.
///
/// Reads an intake log and reports how much budget is left in the trailing
/// 24 hours, what to have next, and when budget frees up.
#[derive(Debug, Parser)]
#[command(name = "rb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Event log to read (JSON array or JSON Lines). Use "-" for stdin.
    #[arg(short, long, global = true)]
    pub events: Option<PathBuf>,

    /// Evaluate as of this time (ISO 8601 or e.g. "2 hours ago").
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show remaining budget and the next recommendation.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Project available budget over the coming hours.
    Forecast {
        /// How far ahead to project, at most one week.
        #[arg(
            long,
            default_value_t = rb_core::forecast::DEFAULT_HORIZON_HOURS,
            value_parser = clap::value_parser!(u32)
                .range(1..=i64::from(rb_core::forecast::MAX_HORIZON_HOURS))
        )]
        hours: u32,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List events about to leave the 24h window.
    Expiring {
        /// Lookahead in hours.
        #[arg(long, default_value_t = rb_core::forecast::DEFAULT_EXPIRY_HOURS)]
        within: f64,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show long-run average daily consumption.
    Average {
        /// Lookback in days.
        #[arg(long, default_value_t = rb_core::forecast::DEFAULT_AVERAGE_DAYS)]
        days: u32,
    },

    /// Show the per-period deviation behind the compensated target.
    Compensation {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show history grouped by day.
    Days {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration.
    Config,
}
