//! Decoding of calendar `events.list` response bodies.
//!
//! Each body holds the events of one calendar. Items with a bad or missing
//! start/end are set aside individually so one broken entry does not hide the
//! rest of the week.

use serde::Deserialize;
use thiserror::Error;

use crate::event::{CalendarEvent, EventError};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("malformed event list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    summary: Option<String>,
    status: Option<String>,
    #[serde(default)]
    start: ApiEventTime,
    #[serde(default)]
    end: ApiEventTime,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
}

impl ApiEventTime {
    /// The timestamp if present, otherwise the all-day date.
    fn value(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

/// Events decoded from one or more calendars.
#[derive(Debug, Default)]
pub struct EventBatch {
    pub events: Vec<CalendarEvent>,
    pub rejected: Vec<EventError>,
}

impl EventBatch {
    /// Appends another calendar's events.
    pub fn extend(&mut self, other: Self) {
        self.events.extend(other.events);
        self.rejected.extend(other.rejected);
    }
}

impl ApiEvent {
    fn into_event(self) -> Result<CalendarEvent, EventError> {
        let title = self.summary.unwrap_or_default();
        let missing = |field: &'static str| EventError::InvalidEvent {
            title: title.clone(),
            field,
            value: String::new(),
        };
        let start = self.start.value().ok_or_else(|| missing("start"))?;
        let end = self.end.value().ok_or_else(|| missing("end"))?;
        CalendarEvent::parse(title, start, end)
    }
}

/// Decodes one `events.list` body.
pub fn parse_event_list(json: &str) -> Result<EventBatch, SourceError> {
    let response: EventListResponse = serde_json::from_str(json)?;
    let mut batch = EventBatch::default();

    for item in response.items {
        if item.status.as_deref() == Some("cancelled") {
            continue;
        }
        match item.into_event() {
            Ok(event) => batch.events.push(event),
            Err(err) => {
                tracing::warn!(error = %err, "rejecting calendar item");
                batch.rejected.push(err);
            }
        }
    }

    Ok(batch)
}
