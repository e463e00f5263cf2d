//! Config command: prints the effective configuration.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use rb_core::BudgetConfig;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Effective<'a> {
    events_path: &'a Path,
    budget: &'a BudgetConfig,
}

pub fn run<W: Write>(writer: &mut W, events_path: &Path, budget: &BudgetConfig) -> Result<()> {
    let effective = Effective {
        events_path,
        budget,
    };
    writeln!(writer, "{}", serde_json::to_string_pretty(&effective)?)?;
    Ok(())
}
