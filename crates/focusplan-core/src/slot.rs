//! Free-slot search inside working hours.
//!
//! Earliest-fit, day-by-day fixed-step scan: the cursor walks forward in
//! 15-minute steps, rolling to the next day's window start whenever it
//! (or the candidate's end) exits the working-hours window. Pure
//! computation, no I/O; callers clamp the search start so it is never in
//! the past.

use chrono::{DateTime, Duration, Utc};

use crate::hours::WorkingHours;
use crate::interval::Interval;

/// Cursor advance between rejected candidates, in minutes.
pub const SCAN_STEP_MINUTES: i64 = 15;

/// Days scanned before giving up, guaranteeing termination.
pub const MAX_SCAN_DAYS: i64 = 7;

/// Finder for the earliest free slot satisfying working-hours, due-date,
/// and non-overlap constraints.
#[derive(Debug, Clone)]
pub struct SlotFinder {
    step_minutes: i64,
    max_days: i64,
}

impl SlotFinder {
    /// Create a finder with the default scan step and day cap.
    pub fn new() -> Self {
        Self {
            step_minutes: SCAN_STEP_MINUTES,
            max_days: MAX_SCAN_DAYS,
        }
    }

    /// Set the cursor step between rejected candidates.
    pub fn with_step(mut self, minutes: i64) -> Self {
        self.step_minutes = minutes;
        self
    }

    /// Set the number of days scanned before reporting no slot.
    pub fn with_max_days(mut self, days: i64) -> Self {
        self.max_days = days;
        self
    }

    /// Find the earliest interval of `duration_minutes` starting at or
    /// after `search_from`, ending no later than `search_until`, inside
    /// working hours, and disjoint from every interval in `busy`.
    ///
    /// Earliest-fit: no attempt is made to minimize fragmentation.
    /// Deterministic for identical inputs; the ordering of `busy` does
    /// not matter because every element is checked.
    pub fn find(
        &self,
        busy: &[Interval],
        search_from: DateTime<Utc>,
        search_until: DateTime<Utc>,
        hours: &WorkingHours,
        duration_minutes: i64,
    ) -> Option<Interval> {
        let mut cursor = search_from;
        let mut days_checked = 0i64;

        while days_checked < self.max_days {
            let window = hours.day_window(cursor);

            if cursor < window.start {
                cursor = window.start;
            }
            if cursor >= window.end {
                cursor = hours.next_day_start(cursor);
                days_checked += 1;
                continue;
            }

            let candidate = Interval::from_start(cursor, duration_minutes);

            // Duration no longer fits the remaining working hours today.
            if candidate.end > window.end {
                cursor = hours.next_day_start(cursor);
                days_checked += 1;
                continue;
            }

            // Due-date bound: a hard stop, not a day rollover.
            if candidate.end > search_until {
                return None;
            }

            if busy.iter().any(|b| b.overlaps(&candidate)) {
                cursor += Duration::minutes(self.step_minutes);
                continue;
            }

            return Some(candidate);
        }

        None
    }
}

impl Default for SlotFinder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hours() -> WorkingHours {
        WorkingHours::new("09:00", "18:00").unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, day, hour, minute, 0).unwrap()
    }

    fn far_bound() -> DateTime<Utc> {
        at(30, 18, 0)
    }

    #[test]
    fn test_empty_calendar_starts_at_window_start() {
        let slot = SlotFinder::new()
            .find(&[], at(25, 6, 0), far_bound(), &hours(), 60)
            .unwrap();
        assert_eq!(slot, Interval::from_start(at(25, 9, 0), 60));
    }

    #[test]
    fn test_skips_past_busy_interval() {
        let busy = vec![Interval::from_start(at(25, 9, 0), 90)];
        let slot = SlotFinder::new()
            .find(&busy, at(25, 9, 0), far_bound(), &hours(), 60)
            .unwrap();
        // 09:00-10:30 is busy; next 15-min-aligned free start is 10:30.
        assert_eq!(slot, Interval::from_start(at(25, 10, 30), 60));
    }

    #[test]
    fn test_adjacent_busy_interval_is_not_a_conflict() {
        // busy.end == candidate.start: half-open, no overlap.
        let busy = vec![Interval::from_start(at(25, 10, 0), 60)];
        let slot = SlotFinder::new()
            .find(&busy, at(25, 11, 0), far_bound(), &hours(), 60)
            .unwrap();
        assert_eq!(slot, Interval::from_start(at(25, 11, 0), 60));
    }

    #[test]
    fn test_bracketing_busy_interval_rejects() {
        // Busy fully covers any candidate until 17:30; a 60-min slot no
        // longer fits today and rolls to the next morning.
        let busy = vec![Interval::from_start(at(25, 9, 0), 510)];
        let slot = SlotFinder::new()
            .find(&busy, at(25, 9, 0), far_bound(), &hours(), 60)
            .unwrap();
        assert_eq!(slot, Interval::from_start(at(26, 9, 0), 60));
    }

    #[test]
    fn test_due_date_bound_is_a_hard_failure() {
        let busy = vec![Interval::from_start(at(25, 9, 0), 510)];
        // Due at end of the same day: the rollover lands past the bound.
        let found = SlotFinder::new().find(&busy, at(25, 9, 0), at(25, 18, 0), &hours(), 60);
        assert!(found.is_none());
    }

    #[test]
    fn test_duration_exceeding_remaining_day_rolls_over() {
        let slot = SlotFinder::new()
            .find(&[], at(25, 17, 30), far_bound(), &hours(), 60)
            .unwrap();
        assert_eq!(slot, Interval::from_start(at(26, 9, 0), 60));
    }

    #[test]
    fn test_cursor_after_hours_rolls_to_next_day() {
        let slot = SlotFinder::new()
            .find(&[], at(25, 18, 0), far_bound(), &hours(), 30)
            .unwrap();
        assert_eq!(slot, Interval::from_start(at(26, 9, 0), 30));
    }

    #[test]
    fn test_day_cap_terminates_search() {
        // Every day fully booked; the scan gives up after MAX_SCAN_DAYS.
        let busy: Vec<Interval> = (0..10)
            .map(|d| Interval::from_start(at(20 + d, 9, 0), 540))
            .collect();
        let found = SlotFinder::new().find(&busy, at(20, 9, 0), far_bound(), &hours(), 60);
        assert!(found.is_none());
    }

    #[test]
    fn test_deterministic_and_order_independent() {
        let busy = vec![
            Interval::from_start(at(25, 9, 0), 60),
            Interval::from_start(at(25, 11, 0), 120),
        ];
        let mut reversed = busy.clone();
        reversed.reverse();

        let finder = SlotFinder::new();
        let a = finder.find(&busy, at(25, 9, 0), far_bound(), &hours(), 45);
        let b = finder.find(&busy, at(25, 9, 0), far_bound(), &hours(), 45);
        let c = finder.find(&reversed, at(25, 9, 0), far_bound(), &hours(), 45);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, Some(Interval::from_start(at(25, 10, 0), 45)));
    }
}
