//! Compensation command: per-period deviation behind the adjusted target.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rb_core::{BudgetConfig, IntakeEvent, analyze_deviation, compensated_target};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    analysis: &'a rb_core::DeviationAnalysis,
    normalized_deviation: f64,
    result: &'a rb_core::CompensationResult,
}

pub fn run<W: Write>(
    writer: &mut W,
    events: &[IntakeEvent],
    now: DateTime<Utc>,
    config: &BudgetConfig,
    json: bool,
) -> Result<()> {
    let analysis = analyze_deviation(events, now, config);
    let result = compensated_target(events, now, config);

    if json {
        let report = Report {
            analysis: &analysis,
            normalized_deviation: analysis.normalized_deviation(),
            result: &result,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(
        writer,
        "Compensation window: {}h, decay {}, strength {}",
        config.compensation().window_hours(),
        config.compensation().decay_factor(),
        config.compensation().strength()
    )?;
    writeln!(
        writer,
        "{:>9}  {:>8}  {:>8}  {:>9}  {:>6}",
        "hours ago", "consumed", "expected", "deviation", "weight"
    )?;
    for period in &analysis.periods {
        writeln!(
            writer,
            "{:>9}  {:>8.0}  {:>8.0}  {:>+9.0}  {:>6.3}",
            period.hours_ago, period.consumed, period.expected, period.deviation, period.weight
        )?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "Weighted deviation: {:+.0} (normalized {:+.0})",
        analysis.weighted_deviation,
        analysis.normalized_deviation()
    )?;
    writeln!(writer, "Raw deviation:      {:+.0}", result.raw_deviation)?;
    writeln!(
        writer,
        "Adjusted target:    {:.0} (base {:.0})",
        result.adjusted_target,
        config.target_daily_amount()
    )?;
    writeln!(writer, "{}", result.reason)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeDelta, TimeZone};
    use insta::assert_snapshot;
    use rb_core::{CompensationOverride, ConfigOverride};

    #[test]
    fn breakdown_for_short_window() {
        let now = Utc.with_ymd_and_hms(2025, 1, 3, 20, 0, 0).unwrap();
        let config = BudgetConfig::from_override(&ConfigOverride {
            compensation: Some(CompensationOverride {
                window_hours: Some(12.0),
                decay_factor: Some(0.5),
                strength: Some(0.5),
            }),
            ..ConfigOverride::default()
        })
        .unwrap();
        let events = [
            IntakeEvent::new(now - TimeDelta::hours(2), 1100.0),
            IntakeEvent::new(now - TimeDelta::hours(8), 200.0),
        ];

        let mut out = Vec::new();
        run(&mut out, &events, now, &config, false).unwrap();
        assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        Compensation window: 12h, decay 0.5, strength 0.5
        hours ago  consumed  expected  deviation  weight
                0      1100       500       +600   1.000
                6       200       500       -300   0.500

        Weighted deviation: +450 (normalized +300)
        Raw deviation:      +300
        Adjusted target:    1850 (base 2000)
        Compensating for recent over-consumption. Target reduced by 150.
        ");
    }
}
