//! Classify command: shows which categories a title falls into.

use anyhow::Result;
use tc_core::{CategoryTable, matcher};

/// `(code, label)` of every category `title` matches, in table order.
pub fn matching_categories<'a>(table: &'a CategoryTable, title: &str) -> Vec<(&'a str, &'a str)> {
    matcher::classify(table, title)
        .into_iter()
        .filter_map(|code| table.get(code.as_str()))
        .map(|c| (c.code.as_str(), c.label.as_str()))
        .collect()
}

/// Runs the classify command.
pub fn run(table: &CategoryTable, title: &str) -> Result<()> {
    let matches = matching_categories(table, title);
    if matches.is_empty() {
        println!("{title:?}: no category (counted in total only)");
        return Ok(());
    }

    for (code, label) in matches {
        println!("{code}\t{label}");
    }
    Ok(())
}
