//! Report command for weekly category hours.
//!
//! This module implements `tc report`: it loads the week's events, aggregates
//! them per category and prints actual against expected hours, either
//! human-readable or as JSON.

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use tc_core::{
    Aggregation, Aggregator, CalendarEvent, CategoryTable, EventBatch, EventTime, Hours, Rounding,
};

use crate::Config;
use crate::commands::util::load_events;

/// A reporting week starting on Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    pub monday: NaiveDate,
}

// ========== Period Date Calculation ==========

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::MIN);
    // DST spring-forward gap at midnight is rare but possible; 1am is guaranteed to exist
    let one_am = midnight + chrono::Duration::hours(1);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| Local.from_local_datetime(&one_am).earliest())
        .map_or_else(|| midnight.and_utc(), |dt| dt.with_timezone(&Utc))
}

/// An event bound as an instant; dates count from local midnight.
fn bound_to_utc(time: EventTime) -> DateTime<Utc> {
    match time {
        EventTime::DateTime(dt) => dt.with_timezone(&Utc),
        EventTime::Date(date) => local_midnight_to_utc(date),
    }
}

impl Week {
    /// The week (Mon-Sun) that contains `today`.
    pub fn containing(today: NaiveDate) -> Self {
        let days_since_monday = today.weekday().num_days_from_monday();
        Self {
            monday: today - chrono::Duration::days(i64::from(days_since_monday)),
        }
    }

    /// The Monday after this week.
    pub fn next_monday(self) -> NaiveDate {
        self.monday + chrono::Duration::days(7)
    }

    /// Mon 00:00 to next Mon 00:00 local time, as a half-open interval.
    pub fn bounds(self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            local_midnight_to_utc(self.monday),
            local_midnight_to_utc(self.next_monday()),
        )
    }

    /// Whether any part of the event falls within this week. An event that
    /// ends exactly at Monday 00:00 belongs to the week before.
    pub fn contains(self, event: &CalendarEvent) -> bool {
        let (week_start, week_end) = self.bounds();
        bound_to_utc(event.end) > week_start && bound_to_utc(event.start) < week_end
    }
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    /// `None` when events were not restricted to a week.
    pub week: Option<Week>,
    pub timezone: String,
    pub rounding: Rounding,
    pub aggregation: Aggregation,
    /// Events that could not be read or measured.
    pub rejected: usize,
}

// ========== Progress Bar ==========

/// Generates a 10-character progress bar of actual against expected time.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: i64, max: i64) -> String {
    if max <= 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        // Over-target categories show a full bar
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Expected hours as whole minutes, for bar scaling.
#[allow(clippy::cast_possible_truncation)]
fn expected_minutes(expected_hours: f64) -> i64 {
    (expected_hours * 60.0).round() as i64
}

// ========== Report Generation ==========

/// Aggregates a loaded batch, restricted to `week` when given.
pub fn generate_report_data(
    table: &CategoryTable,
    rounding: Rounding,
    batch: EventBatch,
    week: Option<Week>,
    generated_at: DateTime<Utc>,
) -> ReportData {
    let events: Vec<CalendarEvent> = match week {
        Some(week) => batch
            .events
            .into_iter()
            .filter(|e| week.contains(e))
            .collect(),
        None => batch.events,
    };
    tracing::debug!(events = events.len(), "aggregating events");

    let aggregation = Aggregator::new(table, rounding).aggregate(&events);
    let rejected = batch.rejected.len() + aggregation.rejected.len();
    let timezone = iana_time_zone::get_timezone()
        .unwrap_or_else(|_| "UTC".to_string());

    ReportData {
        generated_at,
        week,
        timezone,
        rounding,
        aggregation,
        rejected,
    }
}

/// Formats the period description for the report header.
fn format_period_description(report_data: &ReportData) -> String {
    match report_data.week {
        // "Week of Jan 27, 2025"
        Some(week) => format!("Week of {}", week.monday.format("%b %-d, %Y")),
        None => "All events".to_string(),
    }
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData, show_events: bool) -> String {
    let mut output = String::new();
    let agg = &data.aggregation;

    // Header
    let period_desc = format_period_description(data);
    writeln!(output, "TIME REPORT: {period_desc}").unwrap();

    if agg.counted_events == 0 && agg.all_day_skipped == 0 && data.rejected == 0 {
        let period_word = if data.week.is_some() {
            "this week"
        } else {
            "in the input"
        };
        writeln!(output).unwrap();
        writeln!(output, "No events found {period_word}.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Pass --all to include events outside the current week."
        )
        .unwrap();
        return output;
    }

    // BY CATEGORY section
    writeln!(output).unwrap();
    writeln!(output, "BY CATEGORY").unwrap();
    writeln!(output, "───────────").unwrap();

    for category in &agg.categories {
        let bar = progress_bar(
            category.hours.minutes(),
            expected_minutes(category.expected_hours),
        );
        writeln!(
            output,
            "{:<32}{:>5}h / {:>3}h  {bar}",
            category.label, category.hours, category.expected_hours
        )
        .unwrap();

        if show_events {
            for title in &category.events {
                writeln!(output, "    {title}").unwrap();
            }
        }
    }

    // SUMMARY section
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Coursework total:  {}h", agg.coursework).unwrap();
    writeln!(output, "Total tracked:     {}h", agg.total).unwrap();
    writeln!(output, "Events counted:    {}", agg.counted_events).unwrap();
    if agg.all_day_skipped > 0 {
        writeln!(output, "All-day skipped:   {}", agg.all_day_skipped).unwrap();
    }
    if data.rejected > 0 {
        writeln!(output, "Rejected:          {}", data.rejected).unwrap();
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub timezone: String,
    pub period: Option<JsonPeriod>,
    pub rounding: Rounding,
    pub categories: Vec<JsonCategory>,
    pub totals: JsonTotals,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct JsonCategory {
    pub code: String,
    pub label: String,
    pub hours: Hours,
    pub expected_hours: f64,
    pub events: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonTotals {
    pub coursework_hours: Hours,
    pub total_hours: Hours,
    pub counted_events: usize,
    pub all_day_skipped: usize,
    pub rejected: usize,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let agg = &data.aggregation;

    // The period end is inclusive: the Sunday of the week
    let period = data.week.map(|week| JsonPeriod {
        start: week.monday.format("%Y-%m-%d").to_string(),
        end: (week.next_monday() - chrono::Duration::days(1))
            .format("%Y-%m-%d")
            .to_string(),
    });

    let report = JsonReport {
        generated_at: data.generated_at.to_rfc3339(),
        timezone: data.timezone.clone(),
        period,
        rounding: data.rounding,
        categories: agg
            .categories
            .iter()
            .map(|c| JsonCategory {
                code: c.code.to_string(),
                label: c.label.clone(),
                hours: c.hours,
                expected_hours: c.expected_hours,
                events: c.events.clone(),
            })
            .collect(),
        totals: JsonTotals {
            coursework_hours: agg.coursework,
            total_hours: agg.total,
            counted_events: agg.counted_events,
            all_day_skipped: agg.all_day_skipped,
            rejected: data.rejected,
        },
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run(
    config: &Config,
    table: &CategoryTable,
    files: &[PathBuf],
    all: bool,
    show_events: bool,
    json: bool,
) -> Result<()> {
    let files = if files.is_empty() {
        config.event_files.as_slice()
    } else {
        files
    };
    let batch = load_events(files, std::io::stdin().lock())?;

    let week = (!all).then(|| Week::containing(Local::now().date_naive()));
    let data = generate_report_data(table, config.rounding, batch, week, Utc::now());

    if json {
        let output = format_report_json(&data)?;
        println!("{output}");
    } else {
        let output = format_report(&data, show_events);
        print!("{output}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use tc_core::{Category, CategoryCode, EventError, parse_event_list};

    // ========== Period Date Calculation Tests ==========

    #[test]
    fn test_week_containing_known_date() {
        // Jan 29, 2025 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let week = Week::containing(wednesday);
        assert_eq!(week.monday, NaiveDate::from_ymd_opt(2025, 1, 27).unwrap());
        assert_eq!(week.next_monday(), NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
    }

    #[test]
    fn test_week_containing_monday_and_sunday() {
        let monday = NaiveDate::from_ymd_opt(2025, 1, 27).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
        assert_eq!(Week::containing(monday), Week::containing(sunday));
        assert_eq!(Week::containing(sunday).monday, monday);
    }

    #[test]
    fn test_week_bounds_in_local_time() {
        let week = Week::containing(NaiveDate::from_ymd_opt(2025, 1, 29).unwrap());
        let (start, end) = week.bounds();

        let start_local = start.with_timezone(&Local).date_naive();
        let end_local = end.with_timezone(&Local).date_naive();

        assert_eq!(start_local, NaiveDate::from_ymd_opt(2025, 1, 27).unwrap());
        assert_eq!(end_local, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
    }

    #[test]
    fn test_week_contains_all_day_by_date() {
        let week = Week::containing(NaiveDate::from_ymd_opt(2025, 1, 29).unwrap());
        let inside = CalendarEvent::parse("Lunch", "2025-02-02", "2025-02-03").unwrap();
        let outside = CalendarEvent::parse("Lunch", "2025-02-03", "2025-02-04").unwrap();
        assert!(week.contains(&inside));
        assert!(!week.contains(&outside));
    }

    #[test]
    fn test_week_contains_timed_event_midweek() {
        let week = Week::containing(NaiveDate::from_ymd_opt(2025, 1, 29).unwrap());
        let midweek =
            CalendarEvent::parse("CV", "2025-01-29T12:00:00Z", "2025-01-29T13:00:00Z").unwrap();
        let month_later =
            CalendarEvent::parse("CV", "2025-02-28T12:00:00Z", "2025-02-28T13:00:00Z").unwrap();
        assert!(week.contains(&midweek));
        assert!(!week.contains(&month_later));
    }

    fn local_event(title: &str, start: (u32, u32), end: (u32, u32)) -> CalendarEvent {
        let at = |(day, hour): (u32, u32)| {
            let time = Local.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap();
            EventTime::DateTime(time.fixed_offset())
        };
        CalendarEvent::new(title, at(start), at(end))
    }

    #[test]
    fn test_week_contains_event_crossing_monday_midnight() {
        let week = Week::containing(NaiveDate::from_ymd_opt(2025, 1, 29).unwrap());
        // Sunday 23:00 to Monday 01:00, local time
        let crossing = local_event("Hackathon", (26, 23), (27, 1));
        let ends_at_midnight = local_event("Hackathon", (26, 22), (27, 0));
        let starts_at_midnight = local_event("Hackathon", (27, 0), (27, 2));
        assert!(week.contains(&crossing));
        assert!(!week.contains(&ends_at_midnight));
        assert!(week.contains(&starts_at_midnight));
    }

    #[test]
    fn test_week_contains_multi_day_all_day_event() {
        let week = Week::containing(NaiveDate::from_ymd_opt(2025, 1, 29).unwrap());
        let retreat = CalendarEvent::parse("Retreat", "2025-01-25", "2025-01-28").unwrap();
        let before = CalendarEvent::parse("Retreat", "2025-01-24", "2025-01-27").unwrap();
        assert!(week.contains(&retreat));
        assert!(!week.contains(&before));
    }

    // ========== Progress Bar Tests ==========

    #[test]
    fn test_progress_bar_full() {
        assert_eq!(progress_bar(100, 100), "██████████");
    }

    #[test]
    fn test_progress_bar_partial() {
        assert_eq!(progress_bar(50, 100), "█████░░░░░");
        assert_eq!(progress_bar(80, 100), "████████░░");
        assert_eq!(progress_bar(20, 100), "██░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_minimum() {
        assert_eq!(progress_bar(4, 100), "█░░░░░░░░░");
        assert_eq!(progress_bar(1, 100), "█░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_over_target_is_full() {
        assert_eq!(progress_bar(250, 100), "██████████");
    }

    #[test]
    fn test_progress_bar_zero_target() {
        assert_eq!(progress_bar(0, 0), "░░░░░░░░░░");
        assert_eq!(progress_bar(60, 0), "░░░░░░░░░░");
    }

    // ========== Integration Tests (Snapshot) ==========

    fn test_table() -> CategoryTable {
        CategoryTable::new(
            vec![
                Category::new("CV", "Computer Vision", 20.0).unwrap(),
                Category::new("BCI", "Brain Computer Interface", 15.0).unwrap(),
                Category::new("Coding", "Coding", 12.0).unwrap(),
                Category::new("***", "Chill Time", 2.5).unwrap(),
            ],
            vec![
                CategoryCode::new("CV").unwrap(),
                CategoryCode::new("BCI").unwrap(),
            ],
        )
        .unwrap()
    }

    const WEEK_BODY: &str = r#"{"items": [
        {"summary": "CV Lecture", "start": {"dateTime": "2025-01-27T09:00:00-08:00"}, "end": {"dateTime": "2025-01-27T11:00:00-08:00"}},
        {"summary": "Deep Coding session", "start": {"dateTime": "2025-01-27T13:00:00-08:00"}, "end": {"dateTime": "2025-01-27T13:30:00-08:00"}},
        {"summary": "cv office hours", "start": {"dateTime": "2025-01-28T14:00:00-08:00"}, "end": {"dateTime": "2025-01-28T14:15:00-08:00"}},
        {"summary": "*** board games", "start": {"dateTime": "2025-01-29T19:00:00-08:00"}, "end": {"dateTime": "2025-01-29T22:00:00-08:00"}},
        {"summary": "Groceries", "start": {"dateTime": "2025-01-30T18:00:00-08:00"}, "end": {"dateTime": "2025-01-30T18:45:00-08:00"}},
        {"summary": "Lunch", "start": {"date": "2025-01-31"}, "end": {"date": "2025-02-01"}}
    ]}"#;

    fn week_report() -> ReportData {
        let batch = parse_event_list(WEEK_BODY).unwrap();
        let mut data = generate_report_data(
            &test_table(),
            Rounding::PerEvent,
            batch,
            None,
            Utc.with_ymd_and_hms(2025, 2, 1, 16, 0, 0).unwrap(),
        );
        data.week = Some(Week::containing(NaiveDate::from_ymd_opt(2025, 1, 29).unwrap()));
        data.timezone = "America/Los_Angeles".to_string();
        data
    }

    #[test]
    fn test_report_data_totals() {
        let data = week_report();
        let agg = &data.aggregation;
        // 15 and 45 minutes are exact halves: 0.2h and 0.8h
        assert_eq!(agg.hours("CV"), Some(Hours::from_tenths(22)));
        assert_eq!(agg.hours("Coding"), Some(Hours::from_tenths(5)));
        assert_eq!(agg.hours("***"), Some(Hours::from_tenths(30)));
        assert_eq!(agg.coursework, Hours::from_tenths(22));
        assert_eq!(agg.total, Hours::from_tenths(65));
        assert_eq!(agg.all_day_skipped, 1);
    }

    #[test]
    fn test_week_filter_drops_other_weeks() {
        let batch = parse_event_list(WEEK_BODY).unwrap();
        let week = Week::containing(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
        let data = generate_report_data(
            &test_table(),
            Rounding::PerEvent,
            batch,
            Some(week),
            Utc::now(),
        );
        assert_eq!(data.aggregation.counted_events, 0);
        assert_eq!(data.aggregation.all_day_skipped, 0);
    }

    #[test]
    fn test_rejected_counts_source_and_duration_errors() {
        let batch = EventBatch {
            events: vec![
                CalendarEvent::parse("CV late", "2025-01-27T10:00:00Z", "2025-01-27T09:00:00Z")
                    .unwrap(),
            ],
            rejected: vec![EventError::InvalidEvent {
                title: "Broken".to_string(),
                field: "start",
                value: "soon".to_string(),
            }],
        };
        let data =
            generate_report_data(&test_table(), Rounding::PerEvent, batch, None, Utc::now());
        assert_eq!(data.rejected, 2);
        assert_eq!(data.aggregation.total, Hours::ZERO);

        let output = format_report(&data, false);
        assert!(output.contains("Rejected:          2"));
    }

    #[test]
    fn test_report_empty_week() {
        let data = ReportData {
            generated_at: Utc.with_ymd_and_hms(2025, 1, 29, 16, 0, 0).unwrap(),
            week: Some(Week::containing(NaiveDate::from_ymd_opt(2025, 1, 29).unwrap())),
            timezone: "America/Los_Angeles".to_string(),
            rounding: Rounding::PerEvent,
            aggregation: Aggregator::new(&test_table(), Rounding::PerEvent).aggregate(&[]),
            rejected: 0,
        };

        let output = format_report(&data, false);
        assert_snapshot!(output);
    }

    #[test]
    fn test_report_week() {
        let output = format_report(&week_report(), false);
        assert_snapshot!(output);
    }

    #[test]
    fn test_report_week_with_events() {
        let output = format_report(&week_report(), true);
        assert_snapshot!(output);
    }

    #[test]
    fn test_report_json_output() {
        let output = format_report_json(&week_report()).unwrap();
        assert_snapshot!(output);
    }
}
