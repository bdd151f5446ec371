//! CLI subcommand implementations.

pub mod categories;
pub mod classify;
pub mod report;
pub mod util;
