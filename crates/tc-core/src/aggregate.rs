//! Per-category hour aggregation.
//!
//! # Algorithm Summary
//!
//! 1. Start every configured category at zero
//! 2. Drop all-day events, and events whose end precedes their start
//! 3. Round each remaining event per the [`Rounding`] policy
//! 4. Add it to the overall total once, and to every category it matches
//!
//! An event matching two categories counts in full toward both, so category
//! totals may add up to more than the overall total.

use crate::category::{CategoryCode, CategoryTable};
use crate::event::{CalendarEvent, EventError};
use crate::hours::{Hours, Rounding};
use crate::matcher;

/// Accumulated time for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub code: CategoryCode,
    pub label: String,
    pub expected_hours: f64,
    pub hours: Hours,
    /// Titles of the events counted here, in input order.
    pub events: Vec<String>,
}

/// Result of aggregating one batch of events.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// One entry per configured category, in table order.
    pub categories: Vec<CategoryTotal>,

    /// Sum over the coursework categories.
    pub coursework: Hours,

    /// Sum over every counted event, matched or not.
    pub total: Hours,

    /// Events that contributed to `total`.
    pub counted_events: usize,

    /// Events without a time of day.
    pub all_day_skipped: usize,

    /// Events left out because their duration could not be computed.
    pub rejected: Vec<EventError>,
}

impl Aggregation {
    pub fn get(&self, code: &str) -> Option<&CategoryTotal> {
        self.categories.iter().find(|c| c.code.as_str() == code)
    }

    /// Hours for `code`, or `None` if the code is not configured.
    pub fn hours(&self, code: &str) -> Option<Hours> {
        self.get(code).map(|c| c.hours)
    }
}

/// Classifies events against a fixed category table.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    table: &'a CategoryTable,
    rounding: Rounding,
}

impl<'a> Aggregator<'a> {
    pub const fn new(table: &'a CategoryTable, rounding: Rounding) -> Self {
        Self { table, rounding }
    }

    /// Aggregates `events`. Never fails; unusable events end up in
    /// [`Aggregation::rejected`] and leave the other totals untouched.
    pub fn aggregate(&self, events: &[CalendarEvent]) -> Aggregation {
        let mut categories: Vec<CategoryTotal> = self
            .table
            .categories()
            .iter()
            .map(|c| CategoryTotal {
                code: c.code.clone(),
                label: c.label.clone(),
                expected_hours: c.expected_hours,
                hours: Hours::ZERO,
                events: Vec::new(),
            })
            .collect();

        let mut total = Hours::ZERO;
        let mut counted_events = 0;
        let mut all_day_skipped = 0;
        let mut rejected = Vec::new();

        for event in events {
            let duration = match event.duration(self.rounding) {
                Ok(Some(duration)) => duration,
                Ok(None) => {
                    tracing::debug!(title = %event.title, "skipping all-day event");
                    all_day_skipped += 1;
                    continue;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping event");
                    rejected.push(err);
                    continue;
                }
            };

            let matched = matcher::classify(self.table, &event.title);
            tracing::debug!(
                title = %event.title,
                %duration,
                categories = ?matched,
                "classified event"
            );

            for code in matched {
                if let Some(bucket) = categories.iter_mut().find(|c| &c.code == code) {
                    bucket.hours += duration;
                    bucket.events.push(event.title.clone());
                }
            }

            total += duration;
            counted_events += 1;
        }

        let coursework = self
            .table
            .coursework()
            .iter()
            .filter_map(|code| categories.iter().find(|c| &c.code == code))
            .map(|c| c.hours)
            .sum();

        Aggregation {
            categories,
            coursework,
            total,
            counted_events,
            all_day_skipped,
            rejected,
        }
    }
}
