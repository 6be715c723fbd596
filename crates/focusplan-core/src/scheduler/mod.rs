//! Scheduling orchestrator.
//!
//! Drives one scheduling run: plan the chunks, place each one with the
//! slot finder against a growing occupied set, create a calendar event
//! per placed chunk, and summarize the outcome.
//!
//! Placement is strictly sequential: every chunk's search depends on the
//! slots committed by all previous chunks. The `occupied` list is owned
//! exclusively by the running invocation; concurrent runs against the
//! same calendar must be serialized by the caller, since the busy
//! snapshot is taken once at the start of the run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::chunk::{plan_chunks, Chunk};
use crate::error::{GatewayError, Result, ValidationError};
use crate::gateway::CalendarGateway;
use crate::hours::WorkingHours;
use crate::interval::Interval;
use crate::slot::SlotFinder;
use crate::task::Task;

/// Deliberate break between consecutive chunks, in minutes.
pub const CHUNK_GAP_MINUTES: i64 = 60;

/// A chunk committed to a concrete interval during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedSlot {
    pub chunk: Chunk,
    pub interval: Interval,
}

/// Terminal artifact of one scheduling invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub success: bool,
    /// Events actually created on the calendar. May be less than
    /// `total_chunks` when individual creations fail.
    pub chunks_placed: usize,
    pub total_chunks: usize,
    pub created_event_ids: Vec<String>,
    /// Slots reserved during the run, including any whose event creation
    /// failed afterwards.
    pub placed_slots: Vec<PlacedSlot>,
    pub message: String,
}

impl ScheduleResult {
    fn completed(ids: Vec<String>, placed: Vec<PlacedSlot>, total: usize) -> Self {
        let created = ids.len();
        let (success, message) = if created == 0 {
            (false, "Failed to create any calendar events".to_string())
        } else if created < total {
            (
                true,
                format!(
                    "Partially scheduled {created} of {total} chunk(s); some events could not be created"
                ),
            )
        } else {
            (true, format!("Successfully scheduled {created} of {total} chunk(s)"))
        };

        Self {
            success,
            chunks_placed: created,
            total_chunks: total,
            created_event_ids: ids,
            placed_slots: placed,
            message,
        }
    }

    fn insufficient_time(ids: Vec<String>, placed: Vec<PlacedSlot>, total: usize) -> Self {
        Self {
            success: false,
            chunks_placed: ids.len(),
            total_chunks: total,
            created_event_ids: ids,
            placed_slots: placed,
            message: "Not enough time available before due date".to_string(),
        }
    }
}

/// Orchestrator for chunked scheduling runs.
pub struct Scheduler {
    finder: SlotFinder,
    gap_minutes: i64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            finder: SlotFinder::new(),
            gap_minutes: CHUNK_GAP_MINUTES,
        }
    }

    /// Replace the slot finder configuration.
    pub fn with_finder(mut self, finder: SlotFinder) -> Self {
        self.finder = finder;
        self
    }

    /// Set the minimum gap between consecutive chunks.
    pub fn with_gap(mut self, minutes: i64) -> Self {
        self.gap_minutes = minutes;
        self
    }

    /// Full scheduling pipeline: validate the task, snapshot busy
    /// intervals over `[now, due_date]` through the gateway, then place
    /// and create events starting from now.
    ///
    /// Invalid configurations (past due date, unplannable chunking) are
    /// rejected before any gateway call.
    pub fn schedule_task(
        &self,
        task: &Task,
        hours: &WorkingHours,
        gateway: &dyn CalendarGateway,
    ) -> Result<ScheduleResult> {
        let now = Utc::now();
        if task.due_date <= now {
            return Err(ValidationError::InvalidValue {
                field: "due_date".to_string(),
                message: format!("due date {} is in the past", task.due_date),
            }
            .into());
        }
        let chunks = plan_chunks(task.duration_minutes, task.chunk_count, task.chunk_minutes)?;

        let busy = gateway.list_busy(now, task.due_date)?;
        self.place(task, &chunks, now, &busy, hours, gateway)
    }

    /// Place every chunk of `task` and create one calendar event per
    /// placed chunk.
    ///
    /// `window_start` is where the search begins; callers must not pass
    /// an instant in the past ([`Scheduler::schedule_task`] passes now).
    /// A chunk with no feasible slot before the due date stops the run.
    /// Per-event API failures are soft: the chunk's slot stays reserved,
    /// a warning is printed, and the run continues with the next chunk.
    pub fn schedule(
        &self,
        task: &Task,
        window_start: DateTime<Utc>,
        busy: &[Interval],
        hours: &WorkingHours,
        gateway: &dyn CalendarGateway,
    ) -> Result<ScheduleResult> {
        let chunks = plan_chunks(task.duration_minutes, task.chunk_count, task.chunk_minutes)?;
        self.place(task, &chunks, window_start, busy, hours, gateway)
    }

    fn place(
        &self,
        task: &Task,
        chunks: &[Chunk],
        window_start: DateTime<Utc>,
        busy: &[Interval],
        hours: &WorkingHours,
        gateway: &dyn CalendarGateway,
    ) -> Result<ScheduleResult> {
        let total = chunks.len();

        let mut occupied = busy.to_vec();
        let mut cursor = window_start;
        let mut created_ids: Vec<String> = Vec::new();
        let mut placed: Vec<PlacedSlot> = Vec::new();

        for chunk in chunks {
            let Some(slot) =
                self.finder
                    .find(&occupied, cursor, task.due_date, hours, chunk.duration_minutes)
            else {
                return Ok(ScheduleResult::insufficient_time(created_ids, placed, total));
            };

            // Later chunks must not collide with this one.
            occupied.push(slot);
            placed.push(PlacedSlot {
                chunk: *chunk,
                interval: slot,
            });

            cursor = slot.end + Duration::minutes(self.gap_minutes);
            if cursor >= hours.day_window(cursor).end {
                cursor = hours.next_day_start(cursor);
            }

            match gateway.create_event(&chunk.label(&task.title), &slot) {
                Ok(id) => created_ids.push(id),
                Err(GatewayError::Api(err)) => {
                    eprintln!(
                        "Warning: failed to create event for chunk {}/{}: {}",
                        chunk.ordinal, total, err
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(ScheduleResult::completed(created_ids, placed, total))
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(created: usize, total: usize) -> ScheduleResult {
        let ids = (0..created).map(|i| format!("evt-{i}")).collect();
        ScheduleResult::completed(ids, Vec::new(), total)
    }

    #[test]
    fn test_full_success_message() {
        let result = result_with(3, 3);
        assert!(result.success);
        assert_eq!(result.chunks_placed, 3);
        assert_eq!(result.message, "Successfully scheduled 3 of 3 chunk(s)");
    }

    #[test]
    fn test_partial_success_message() {
        let result = result_with(2, 3);
        assert!(result.success);
        assert_eq!(result.chunks_placed, 2);
        assert!(result.message.contains("Partially scheduled 2 of 3"));
    }

    #[test]
    fn test_no_events_created_is_failure() {
        let result = result_with(0, 2);
        assert!(!result.success);
        assert_eq!(result.message, "Failed to create any calendar events");
    }

    #[test]
    fn test_insufficient_time_message() {
        let result = ScheduleResult::insufficient_time(vec!["evt-0".to_string()], Vec::new(), 3);
        assert!(!result.success);
        assert_eq!(result.chunks_placed, 1);
        assert_eq!(result.message, "Not enough time available before due date");
    }
}
