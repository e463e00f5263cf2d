//! Forecast command: available budget over the coming hours.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rb_core::{BudgetConfig, IntakeEvent};

pub fn run<W: Write>(
    writer: &mut W,
    events: &[IntakeEvent],
    now: DateTime<Utc>,
    config: &BudgetConfig,
    hours: u32,
    json: bool,
) -> Result<()> {
    let points = rb_core::forecast(events, now, config, hours);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&points)?)?;
        return Ok(());
    }

    writeln!(writer, "Available budget over the next {hours}h")?;
    for point in &points {
        let offset = (point.time - now).num_hours();
        writeln!(
            writer,
            "{:>5}  {}  {:>6.0}",
            format!("+{offset}h"),
            point.time.format("%Y-%m-%d %H:%M"),
            point.available_budget
        )?;
    }
    Ok(())
}
