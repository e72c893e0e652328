//! Free-slot computation over one day of the grid.
//!
//! Sorts a resource's bookings by start, merges overlapping busy windows,
//! then walks the gaps across the teaching day. Callers filter the
//! occurrence list to one teacher or one room (and one scope) first.
//!
//! Week parity is ignored here: a slot booked only on even weeks still
//! counts as busy, so a reported gap is free on every week of the semester.

use serde::Serialize;

use crate::grid::{Day, Hour, TimeWindow};
use crate::occurrence::Occurrence;

/// A gap in a day's bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeRange {
    pub start: Hour,
    pub end: Hour,
    /// Gap length in whole hours.
    pub duration: u8,
}

fn span(start: Hour, end: Hour) -> u8 {
    (end.slot_index() - start.slot_index()) as u8
}

/// Merge overlapping or adjacent busy windows on the given day.
///
/// Returns a sorted, non-overlapping list of windows.
fn merge_busy_windows(occurrences: &[Occurrence], day: Day) -> Vec<TimeWindow> {
    let mut windows: Vec<TimeWindow> = occurrences
        .iter()
        .filter(|o| o.day == day)
        .map(Occurrence::window)
        .collect();

    if windows.is_empty() {
        return Vec::new();
    }

    windows.sort_by_key(|w| (w.start, w.end));

    let mut merged: Vec<TimeWindow> = Vec::new();
    for window in windows {
        if let Some(last) = merged.last_mut() {
            if window.start <= last.end {
                // Overlapping or adjacent -- extend the current window.
                last.end = last.end.max(window.end);
                continue;
            }
        }
        merged.push(window);
    }

    merged
}

/// Free ranges across the teaching day, sorted by start.
///
/// `occurrences` should already be filtered to one resource's bookings in
/// one (academic year, semester) scope; only entries on `day` are read.
pub fn free_ranges(occurrences: &[Occurrence], day: Day) -> Vec<FreeRange> {
    let merged = merge_busy_windows(occurrences, day);

    let mut free = Vec::new();
    let mut cursor = Hour::FIRST;

    for busy in &merged {
        if cursor < busy.start {
            free.push(FreeRange {
                start: cursor,
                end: busy.start,
                duration: span(cursor, busy.start),
            });
        }
        cursor = cursor.max(busy.end);
    }

    // Trailing gap after the last booking.
    if cursor < Hour::LAST {
        free.push(FreeRange {
            start: cursor,
            end: Hour::LAST,
            duration: span(cursor, Hour::LAST),
        });
    }

    free
}

/// The first gap of at least `min_duration` hours on the given day, if any.
pub fn first_free_range(
    occurrences: &[Occurrence],
    day: Day,
    min_duration: u8,
) -> Option<FreeRange> {
    free_ranges(occurrences, day)
        .into_iter()
        .find(|range| range.duration >= min_duration)
}
