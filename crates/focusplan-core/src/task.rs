//! Task model and due-date resolution.
//!
//! Relative due dates ("today", "tomorrow", "yesterday") resolve to that
//! calendar day at the end of the working day. Resolution happens here,
//! upstream of the scheduling core; the core only ever sees a concrete
//! instant.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::hours::WorkingHours;

/// Days ahead used when no due date is supplied or it cannot be parsed.
pub const DEFAULT_DUE_DAYS: i64 = 7;

/// A task to be auto-scheduled onto the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Total work required, in minutes. Must be positive.
    pub duration_minutes: i64,
    pub due_date: DateTime<Utc>,
    /// Manual chunking override: number of chunks.
    pub chunk_count: Option<usize>,
    /// Manual chunking override: minutes per chunk.
    pub chunk_minutes: Option<i64>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        duration_minutes: i64,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_minutes,
            due_date,
            chunk_count: None,
            chunk_minutes: None,
        }
    }

    /// Split this task into `count` chunks of `minutes` each instead of
    /// the automatic policy.
    pub fn with_manual_chunks(mut self, count: usize, minutes: Option<i64>) -> Self {
        self.chunk_count = Some(count);
        self.chunk_minutes = minutes;
        self
    }
}

/// Resolve a raw due-date string to a concrete instant.
///
/// Accepts "today"/"tomorrow"/"yesterday" (end of working day), RFC 3339
/// timestamps, and `YYYY-MM-DD` dates (end of working day). Missing or
/// unparseable input falls back to `now` plus [`DEFAULT_DUE_DAYS`].
pub fn parse_due_date(raw: Option<&str>, now: DateTime<Utc>, hours: &WorkingHours) -> DateTime<Utc> {
    let fallback = now + Duration::days(DEFAULT_DUE_DAYS);
    let Some(raw) = raw else {
        return fallback;
    };

    match raw.to_lowercase().as_str() {
        "today" => return hours.end_of_day(now),
        "tomorrow" => return hours.end_of_day(now + Duration::days(1)),
        "yesterday" => return hours.end_of_day(now - Duration::days(1)),
        _ => {}
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return instant.with_timezone(&Utc);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        // The raw date names a local calendar day, never a UTC one.
        return hours.end_of_date(date);
    }

    fallback
}
