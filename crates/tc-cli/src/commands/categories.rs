//! Categories command: prints the configured category table.

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use tc_core::CategoryTable;

#[derive(Debug, Serialize)]
struct JsonCategory<'a> {
    code: &'a str,
    label: &'a str,
    expected_hours: f64,
    coursework: bool,
}

/// Formats the table with coursework categories marked `*`.
pub fn format_categories(table: &CategoryTable) -> String {
    let mut output = String::new();
    writeln!(output, "{:<9}{:<32}{:>8}", "CODE", "LABEL", "EXPECTED").unwrap();
    for category in table.categories() {
        let marker = if table.coursework().contains(&category.code) {
            "*"
        } else {
            ""
        };
        writeln!(
            output,
            "{:<9}{:<32}{:>7}h{marker}",
            category.code, category.label, category.expected_hours
        )
        .unwrap();
    }

    let expected: f64 = table.categories().iter().map(|c| c.expected_hours).sum();
    writeln!(output).unwrap();
    writeln!(output, "Expected per week: {expected}h (* = coursework)").unwrap();
    output
}

pub fn format_categories_json(table: &CategoryTable) -> Result<String> {
    let categories: Vec<_> = table
        .categories()
        .iter()
        .map(|c| JsonCategory {
            code: c.code.as_str(),
            label: &c.label,
            expected_hours: c.expected_hours,
            coursework: table.coursework().contains(&c.code),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&categories)?)
}

/// Runs the categories command.
pub fn run(table: &CategoryTable, json: bool) -> Result<()> {
    if json {
        println!("{}", format_categories_json(table)?);
    } else {
        print!("{}", format_categories(table));
    }
    Ok(())
}
