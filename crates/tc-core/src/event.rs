//! Calendar events and per-event duration.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use thiserror::Error;

use crate::hours::{Hours, Rounding};

/// Why a single event could not be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// A start or end value could not be parsed.
    #[error("event {title:?}: invalid {field} time {value:?}")]
    InvalidEvent {
        title: String,
        field: &'static str,
        value: String,
    },

    /// The event ends before it starts.
    #[error("event {title:?} ends {minutes} minutes before it starts")]
    InvalidDuration { title: String, minutes: i64 },
}

impl EventError {
    pub fn title(&self) -> &str {
        match self {
            Self::InvalidEvent { title, .. } | Self::InvalidDuration { title, .. } => title,
        }
    }
}

/// One bound of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// A timestamp with its UTC offset.
    DateTime(DateTime<FixedOffset>),
    /// A date without time of day (all-day events).
    Date(NaiveDate),
}

impl EventTime {
    pub const fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    pub const fn date_time(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            Self::Date(_) => None,
        }
    }
}

/// Error for strings that are neither RFC 3339 timestamps nor `YYYY-MM-DD` dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsableTime(String);

impl fmt::Display for UnparsableTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unparsable event time: {}", self.0)
    }
}

impl std::error::Error for UnparsableTime {}

impl FromStr for EventTime {
    type Err = UnparsableTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::DateTime(dt));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::Date)
            .map_err(|_| UnparsableTime(s.to_string()))
    }
}

/// A calendar entry as handed over by an event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        Self {
            title: title.into(),
            start,
            end,
        }
    }

    /// Builds an event from textual bounds.
    pub fn parse(title: impl Into<String>, start: &str, end: &str) -> Result<Self, EventError> {
        let title = title.into();
        let parse_field = |field: &'static str, value: &str| {
            value.parse::<EventTime>().map_err(|_| EventError::InvalidEvent {
                title: title.clone(),
                field,
                value: value.to_string(),
            })
        };
        let start = parse_field("start", start)?;
        let end = parse_field("end", end)?;
        Ok(Self { title, start, end })
    }

    /// True when either bound lacks a time of day.
    pub const fn is_all_day(&self) -> bool {
        self.start.is_all_day() || self.end.is_all_day()
    }

    /// Elapsed whole minutes, seconds discarded. `None` for all-day events.
    pub fn elapsed_minutes(&self) -> Result<Option<i64>, EventError> {
        let (Some(start), Some(end)) = (self.start.date_time(), self.end.date_time()) else {
            return Ok(None);
        };

        let seconds = (end - start).num_seconds();
        let minutes = seconds.div_euclid(60);
        if minutes < 0 {
            return Err(EventError::InvalidDuration {
                title: self.title.clone(),
                minutes: -minutes,
            });
        }
        Ok(Some(minutes))
    }

    /// The event's duration under the given rounding policy.
    pub fn duration(&self, rounding: Rounding) -> Result<Option<Hours>, EventError> {
        Ok(self.elapsed_minutes()?.map(|m| rounding.apply(m)))
    }
}
