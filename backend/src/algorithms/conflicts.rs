//! Schedule conflict detection.
//!
//! Given a candidate slot on one or more days, find the existing programs of
//! the grid that overlap it, grouped per day.
//!
//! # Semantics
//!
//! * Slots are half-open `[start, end)`: a program ending at 10:00 does not
//!   conflict with one starting at 10:00.
//! * Containment in either direction is a conflict.
//! * Output follows the order of the selected days (repeats dropped); days
//!   with no overlap produce no entry, so an empty result means the
//!   candidate can be created directly.

use crate::models::{overlaps, DayOfWeek, Program, ProgramConflict, ProgramId, TimeOfDay};

/// Find overlapping programs for each selected day.
///
/// # Arguments
/// * `existing` - The tenant's current programs
/// * `days` - Days selected for the candidate
/// * `start` / `end` - Candidate slot
///
/// # Returns
/// One [`ProgramConflict`] per day that has at least one overlap.
pub fn detect_conflicts(
    existing: &[Program],
    days: &[DayOfWeek],
    start: TimeOfDay,
    end: TimeOfDay,
) -> Vec<ProgramConflict> {
    detect_conflicts_excluding(existing, days, start, end, None)
}

/// Same as [`detect_conflicts`], ignoring one program (the one being edited).
pub fn detect_conflicts_excluding(
    existing: &[Program],
    days: &[DayOfWeek],
    start: TimeOfDay,
    end: TimeOfDay,
    exclude: Option<ProgramId>,
) -> Vec<ProgramConflict> {
    let mut seen_days: Vec<DayOfWeek> = Vec::with_capacity(days.len());
    let mut conflicts = Vec::new();

    for &day in days {
        if seen_days.contains(&day) {
            continue;
        }
        seen_days.push(day);

        let overlapping: Vec<Program> = existing
            .iter()
            .filter(|p| p.day == day)
            .filter(|p| exclude.is_none() || p.id != exclude)
            .filter(|p| overlaps(start, end, p.start_time, p.end_time))
            .cloned()
            .collect();

        if !overlapping.is_empty() {
            conflicts.push(ProgramConflict {
                day,
                start_time: start,
                end_time: end,
                existing: overlapping,
            });
        }
    }

    conflicts
}

/// Ids of every conflicting program, deduplicated across days in first-seen order.
///
/// Programs without an id (never persisted) are skipped.
pub fn conflicting_program_ids(conflicts: &[ProgramConflict]) -> Vec<ProgramId> {
    let mut ids = Vec::new();
    for id in conflicts
        .iter()
        .flat_map(|c| c.existing.iter())
        .filter_map(|p| p.id)
    {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
