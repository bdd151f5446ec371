//! Core domain logic for weekly calendar reports.
//!
//! This crate contains the fundamental types and logic for:
//! - Categories: the validated table of codes, labels and weekly targets
//! - Matching: assigning event titles to categories by keyword
//! - Aggregation: summing event durations per category
//! - Sources: decoding calendar event lists

mod aggregate;
pub mod category;
pub mod event;
pub mod hours;
pub mod matcher;
pub mod source;

pub use aggregate::{Aggregation, Aggregator, CategoryTotal};
pub use category::{Category, CategoryCode, CategoryTable, ConfigError};
pub use event::{CalendarEvent, EventError, EventTime};
pub use hours::{Hours, Rounding};
pub use source::{EventBatch, SourceError, parse_event_list};
