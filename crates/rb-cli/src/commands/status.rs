//! Status command: remaining budget and next recommendation.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rb_core::{BudgetConfig, IntakeEvent, Recommendation, format_duration, format_time_until};

use super::util::progress_bar;

pub fn run<W: Write>(
    writer: &mut W,
    events: &[IntakeEvent],
    now: DateTime<Utc>,
    config: &BudgetConfig,
    json: bool,
) -> Result<()> {
    let rec = rb_core::recommend(events, now, config);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&rec)?)?;
        return Ok(());
    }

    render(writer, &rec, now)
}

fn render<W: Write>(writer: &mut W, rec: &Recommendation, now: DateTime<Utc>) -> Result<()> {
    writeln!(writer, "Rolling 24h budget")?;
    writeln!(
        writer,
        "Consumed:     {:.0} of {:.0} ({:.0}%) {}",
        rec.consumed_last_24h,
        rec.effective_target,
        rec.percent_used,
        progress_bar(rec.percent_used)
    )?;
    writeln!(writer, "Remaining:    {:.0}", rec.remaining_last_24h)?;
    writeln!(
        writer,
        "Target:       {:.0} (base {:.0})",
        rec.effective_target, rec.base_target
    )?;
    writeln!(writer, "Compensation: {}", rec.compensation.reason)?;

    if rec.recommended_max > 0.0 {
        writeln!(
            writer,
            "Next event:   {:.0}-{:.0}",
            rec.recommended_min, rec.recommended_max
        )?;
    } else {
        writeln!(writer, "Next event:   none")?;
    }

    let when = rec
        .wait_until
        .map_or_else(|| "Now".to_string(), |t| format_time_until(t, now));
    writeln!(writer, "When:         {when}")?;

    match rec.hours_since_last_event {
        Some(hours) => writeln!(writer, "Last event:   {} ago", format_duration(hours))?,
        None => writeln!(writer, "Last event:   none")?,
    }

    writeln!(writer)?;
    writeln!(writer, "{}", rec.reasoning)?;
    Ok(())
}
