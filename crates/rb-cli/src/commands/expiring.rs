//! Expiring command: events about to leave the trailing 24h window.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rb_core::{IntakeEvent, format_time_until};

pub fn run<W: Write>(
    writer: &mut W,
    events: &[IntakeEvent],
    now: DateTime<Utc>,
    within_hours: f64,
    json: bool,
) -> Result<()> {
    let expiring = rb_core::upcoming_expirations(events, now, within_hours);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&expiring)?)?;
        return Ok(());
    }

    if expiring.is_empty() {
        writeln!(writer, "Nothing expires within the next {within_hours}h.")?;
        return Ok(());
    }

    writeln!(writer, "Expiring within the next {within_hours}h:")?;
    for item in &expiring {
        writeln!(
            writer,
            "  {:>6.0}  frees at {}  ({})",
            item.event.value,
            item.expires_at.format("%Y-%m-%d %H:%M"),
            format_time_until(item.expires_at, now)
        )?;
    }
    let total: f64 = expiring.iter().map(|e| e.event.value).sum();
    writeln!(writer, "Total freeing up: {total:.0}")?;
    Ok(())
}
