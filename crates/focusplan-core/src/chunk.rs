//! Chunk planning: splitting a task's total duration into bounded pieces.
//!
//! Two policies:
//! - Automatic: greedy `DEFAULT_CHUNK_MINUTES` pieces until the total is
//!   consumed.
//! - Manual: an explicit chunk count (and optionally a per-chunk duration);
//!   the last entry absorbs the signed difference so the plan always sums
//!   to the task's total.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Automatic chunking policy: at most one hour per chunk.
pub const DEFAULT_CHUNK_MINUTES: i64 = 60;

/// Upper bound on a task's total duration: one week of minutes. The slot
/// search never looks further ahead than that anyway.
pub const MAX_TOTAL_MINUTES: i64 = 7 * 24 * 60;

/// Prefix applied to every event created by the scheduler.
pub const FOCUS_PREFIX: &str = "[Focus]";

/// One bounded sub-portion of a task, scheduled as a single calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub duration_minutes: i64,
    /// 1-based position in the plan, for labeling.
    pub ordinal: usize,
    pub total: usize,
}

impl Chunk {
    /// Event label for this chunk: `"[Focus] Title"`, with a
    /// `(Part x/y)` suffix when the plan has more than one chunk.
    pub fn label(&self, title: &str) -> String {
        if self.total > 1 {
            format!("{FOCUS_PREFIX} {title} (Part {}/{})", self.ordinal, self.total)
        } else {
            format!("{FOCUS_PREFIX} {title}")
        }
    }
}

/// Compute the ordered chunk plan for a task.
///
/// Manual mode applies when `manual_count > 1`; otherwise the automatic
/// greedy policy is used. The returned durations always sum to
/// `total_minutes`.
pub fn plan_chunks(
    total_minutes: i64,
    manual_count: Option<usize>,
    manual_minutes: Option<i64>,
) -> Result<Vec<Chunk>, ValidationError> {
    if total_minutes <= 0 {
        return Err(ValidationError::InvalidValue {
            field: "duration_minutes".to_string(),
            message: format!("must be positive, got {total_minutes}"),
        });
    }
    if total_minutes > MAX_TOTAL_MINUTES {
        return Err(ValidationError::InvalidValue {
            field: "duration_minutes".to_string(),
            message: format!("must be at most {MAX_TOTAL_MINUTES}, got {total_minutes}"),
        });
    }

    let durations = match manual_count {
        Some(count) if count > 1 => manual_plan(total_minutes, count, manual_minutes)?,
        _ => automatic_plan(total_minutes),
    };

    let total = durations.len();
    Ok(durations
        .into_iter()
        .enumerate()
        .map(|(i, duration_minutes)| Chunk {
            duration_minutes,
            ordinal: i + 1,
            total,
        })
        .collect())
}

fn automatic_plan(total_minutes: i64) -> Vec<i64> {
    let mut durations = Vec::new();
    let mut remaining = total_minutes;
    while remaining > 0 {
        let piece = remaining.min(DEFAULT_CHUNK_MINUTES);
        durations.push(piece);
        remaining -= piece;
    }
    durations
}

fn manual_plan(
    total_minutes: i64,
    count: usize,
    per_chunk: Option<i64>,
) -> Result<Vec<i64>, ValidationError> {
    let count_i64 = count as i64;
    if count_i64 <= 0 || count_i64 > total_minutes {
        return Err(ValidationError::InvalidValue {
            field: "chunk_count".to_string(),
            message: format!("cannot split {total_minutes} min into {count} chunk(s)"),
        });
    }
    let per = match per_chunk {
        Some(minutes) => minutes,
        // Even split, rounded up; the correction below settles the remainder.
        None => (total_minutes + count_i64 - 1) / count_i64,
    };

    let mut durations = vec![per; count];
    let correction = total_minutes - per * count_i64;
    if let Some(last) = durations.last_mut() {
        *last += correction;
    }

    if durations.iter().any(|&d| d <= 0) {
        return Err(ValidationError::InvalidValue {
            field: "chunk_count".to_string(),
            message: format!(
                "{count} chunks of {per} min cannot cover {total_minutes} min without an empty chunk"
            ),
        });
    }

    Ok(durations)
}
