//! Days command: history grouped by calendar date.

use std::io::Write;

use anyhow::Result;
use rb_core::{BudgetConfig, IntakeEvent, group_by_day};

use super::util::progress_bar;

pub fn run<W: Write>(
    writer: &mut W,
    events: &[IntakeEvent],
    config: &BudgetConfig,
    json: bool,
) -> Result<()> {
    let days = group_by_day(events);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&days)?)?;
        return Ok(());
    }

    if days.is_empty() {
        writeln!(writer, "No events recorded.")?;
        return Ok(());
    }

    let target = config.target_daily_amount();
    for (idx, day) in days.iter().enumerate() {
        if idx > 0 {
            writeln!(writer)?;
        }
        let percent = day.total / target * 100.0;
        writeln!(
            writer,
            "{}  {:>6.0}  {}",
            day.date.format("%a %Y-%m-%d"),
            day.total,
            progress_bar(percent)
        )?;
        for event in &day.events {
            writeln!(
                writer,
                "  {}  {:>6.0}",
                event.occurred_at.format("%H:%M"),
                event.value
            )?;
        }
    }
    Ok(())
}
