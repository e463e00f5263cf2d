//! Average command: long-run daily consumption.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rb_core::{BudgetConfig, IntakeEvent};

pub fn run<W: Write>(
    writer: &mut W,
    events: &[IntakeEvent],
    now: DateTime<Utc>,
    config: &BudgetConfig,
    days: u32,
) -> Result<()> {
    let average = rb_core::average_daily(events, now, days);
    let target = config.target_daily_amount();
    let percent = average / target * 100.0;

    writeln!(
        writer,
        "Average over the last {days} day(s): {average:.0} per day ({percent:.0}% of {target:.0})"
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn prints_average_against_target() {
        let now = Utc.with_ymd_and_hms(2025, 1, 8, 12, 0, 0).unwrap();
        let events = [
            IntakeEvent::new(now - TimeDelta::hours(3), 2100.0),
            IntakeEvent::new(now - TimeDelta::hours(30), 1900.0),
        ];
        let mut out = Vec::new();
        run(&mut out, &events, now, &BudgetConfig::default(), 2).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Average over the last 2 day(s): 2000 per day (100% of 2000)\n"
        );
    }

    #[test]
    fn zero_days_prints_zero() {
        let now = Utc.with_ymd_and_hms(2025, 1, 8, 12, 0, 0).unwrap();
        let mut out = Vec::new();
        run(&mut out, &[], now, &BudgetConfig::default(), 0).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Average over the last 0 day(s): 0 per day (0% of 2000)\n"
        );
    }
}
