//! Working-hours policy and per-day window computation.
//!
//! All instants in the core are UTC. The policy carries a caller-supplied
//! fixed UTC offset and converts wall-clock working hours to UTC at the
//! day-window boundary only; the core never consults the host timezone.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::ValidationError;
use crate::interval::Interval;

/// Daily working-hours window, e.g. 09:00 to 18:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    start: NaiveTime,
    end: NaiveTime,
    /// Seconds east of UTC for the wall-clock interpretation of the bounds.
    offset_seconds: i32,
}

impl WorkingHours {
    /// Parse a policy from `"HH:MM"` bounds, interpreted in UTC.
    /// Fails if either bound is malformed or start is not before end.
    pub fn new(start: &str, end: &str) -> Result<Self, ValidationError> {
        let start = parse_hhmm("working_hours_start", start)?;
        let end = parse_hhmm("working_hours_end", end)?;
        if start >= end {
            return Err(ValidationError::InvalidValue {
                field: "working_hours".to_string(),
                message: format!("start ({start}) must be before end ({end})"),
            });
        }
        Ok(Self {
            start,
            end,
            offset_seconds: 0,
        })
    }

    /// Interpret the wall-clock bounds in the given UTC offset instead of UTC.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset_seconds = offset.local_minus_utc();
        self
    }

    /// Working-hours window of the local day containing `at`.
    pub fn day_window(&self, at: DateTime<Utc>) -> Interval {
        let date = self.to_local(at).date();
        Interval {
            start: self.to_utc(date.and_time(self.start)),
            end: self.to_utc(date.and_time(self.end)),
        }
    }

    /// Start of working hours on the local day after the one containing `at`.
    pub fn next_day_start(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let next = self.to_local(at).date() + Duration::days(1);
        self.to_utc(next.and_time(self.start))
    }

    /// End of working hours on the local day containing `at`.
    pub fn end_of_day(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        self.end_of_date(self.to_local(at).date())
    }

    /// End of working hours on the given local calendar date.
    pub fn end_of_date(&self, date: NaiveDate) -> DateTime<Utc> {
        self.to_utc(date.and_time(self.end))
    }

    /// Whether `interval` lies entirely inside its own day's window.
    pub fn contains(&self, interval: &Interval) -> bool {
        interval.within(&self.day_window(interval.start))
    }

    fn to_local(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.naive_utc() + Duration::seconds(i64::from(self.offset_seconds))
    }

    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(
            local - Duration::seconds(i64::from(self.offset_seconds)),
            Utc,
        )
    }
}

fn parse_hhmm(field: &str, value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ValidationError::InvalidValue {
        field: field.to_string(),
        message: format!("expected HH:MM, got '{value}'"),
    })
}
