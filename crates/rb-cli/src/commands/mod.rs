//! CLI subcommand implementations.

pub mod average;
pub mod compensation;
pub mod config;
pub mod days;
pub mod expiring;
pub mod forecast;
pub mod status;
pub mod util;
