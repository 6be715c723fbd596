//! Half-open time intervals and overlap tests.
//!
//! Foundation for slot search and conflict detection. An interval covers
//! `[start, end)`, so two intervals that merely touch do not overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create a new interval. Fails if `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Interval starting at `start` and lasting `minutes`.
    pub fn from_start(start: DateTime<Utc>, minutes: i64) -> Self {
        Self {
            start,
            end: start + Duration::minutes(minutes),
        }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check whether two intervals overlap. Shared endpoints do not count
    /// as overlap under half-open semantics.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check whether this interval lies entirely inside `outer`.
    pub fn within(&self, outer: &Interval) -> bool {
        outer.start <= self.start && self.end <= outer.end
    }
}
