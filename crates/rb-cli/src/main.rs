use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rb_cli::commands::{average, compensation, config, days, expiring, forecast, status, util};
use rb_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so command output stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?settings, "loaded configuration");
    let budget = settings
        .budget_config()
        .context("invalid budget configuration")?;

    let events_path = cli.events.as_deref().unwrap_or(&settings.events_path);
    let now = match cli.now.as_deref() {
        Some(s) => util::parse_datetime(s, Utc::now())?,
        None => Utc::now(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let load = || util::load_events(events_path);

    match cli.command.unwrap_or(Commands::Status { json: false }) {
        Commands::Status { json } => status::run(&mut out, &load()?, now, &budget, json)?,
        Commands::Forecast { hours, json } => {
            forecast::run(&mut out, &load()?, now, &budget, hours, json)?;
        }
        Commands::Expiring { within, json } => {
            expiring::run(&mut out, &load()?, now, within, json)?;
        }
        Commands::Average { days } => average::run(&mut out, &load()?, now, &budget, days)?,
        Commands::Compensation { json } => {
            compensation::run(&mut out, &load()?, now, &budget, json)?;
        }
        Commands::Days { json } => days::run(&mut out, &load()?, &budget, json)?,
        Commands::Config => config::run(&mut out, events_path, &budget)?,
    }

    out.flush()?;
    Ok(())
}
