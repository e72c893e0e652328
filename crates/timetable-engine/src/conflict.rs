//! Double-booking detection for candidate placements.
//!
//! Compares a candidate against the stored occurrences of its scope and
//! reports every teacher or room collision. Windows are half-open, so
//! back-to-back bookings never conflict, and two bookings on disjoint week
//! parities never conflict.

use std::fmt;

use serde::Serialize;

use crate::grid::{Day, TimeWindow};
use crate::occurrence::{Occurrence, OccurrenceId, Placement};
use crate::recurrence::Recurrence;

/// Which scarce resource a conflict is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConflictAxis {
    Teacher,
    Room,
}

/// One detected collision between a candidate placement and a stored
/// occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub axis: ConflictAxis,
    /// The stored occurrence that already books the resource.
    pub occurrence_id: OccurrenceId,
    pub day: Day,
    /// The colliding interval, as the existing booking holds it.
    pub window: TimeWindow,
    pub recurrence: Recurrence,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resource = match self.axis {
            ConflictAxis::Teacher => "teacher",
            ConflictAxis::Room => "room",
        };
        write!(
            f,
            "{} already booked on {} {} ({})",
            resource, self.day, self.window, self.recurrence
        )
    }
}

/// Find every stored occurrence that double-books the candidate's teacher or
/// room.
///
/// Only occurrences sharing the candidate's academic year, semester, and day
/// are compared; everything else coexists by definition. `exclude` removes
/// one id from comparison so an occurrence being updated in place is not
/// reported as conflicting with its own stored copy.
///
/// Teacher conflicts are listed before room conflicts; an occurrence
/// colliding on both axes yields one entry per axis. An empty result means
/// the placement was safe at the moment `existing` was read -- the caller
/// owns the read-to-write gap.
pub fn find_conflicts(
    candidate: &Placement,
    existing: &[Occurrence],
    exclude: Option<OccurrenceId>,
) -> Vec<Conflict> {
    let mut teacher = Vec::new();
    let mut room = Vec::new();

    for other in existing {
        if exclude == Some(other.id) {
            continue;
        }
        if other.academic_year_id != candidate.academic_year_id
            || other.semester != candidate.semester
            || other.day != candidate.day
        {
            continue;
        }
        if !candidate.window.overlaps(&other.window()) {
            continue;
        }
        if !candidate.recurrence.conflicts_with(other.recurrence) {
            continue;
        }

        if other.teacher_id == candidate.teacher_id {
            teacher.push(Conflict {
                axis: ConflictAxis::Teacher,
                occurrence_id: other.id,
                day: other.day,
                window: other.window(),
                recurrence: other.recurrence,
            });
        }
        if other.classroom_id == candidate.classroom_id {
            room.push(Conflict {
                axis: ConflictAxis::Room,
                occurrence_id: other.id,
                day: other.day,
                window: other.window(),
                recurrence: other.recurrence,
            });
        }
    }

    teacher.append(&mut room);
    teacher
}
