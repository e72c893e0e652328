//! The occurrence record -- one scheduled timetable entry -- and the typed
//! identifiers it references.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::{Day, Hour, TimeWindow};
use crate::recurrence::Recurrence;

/// Identifier of a stored occurrence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OccurrenceId(pub u64);

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(pub u64);

/// Identifier of a classroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassroomId(pub u64);

/// Identifier of a discipline (the subject being taught).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisciplineId(pub u64);

/// Identifier of a student group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

/// Identifier of an academic year range (e.g. "2025-2026").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcademicYearId(pub u64);

/// Identifier of an education cycle (undergraduate, graduate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearningId(pub u64);

/// Identifier of an application user, for audit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// What kind of teaching session an occurrence is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Course,
    Seminar,
    Lab,
    Project,
}

/// Semester within the academic year, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Semester(u8);

impl Semester {
    pub const ONE: Semester = Semester(1);
    pub const TWO: Semester = Semester(2);

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Semester {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Semester, String> {
        match value {
            1 | 2 => Ok(Semester(value)),
            other => Err(format!("semester must be 1 or 2, got {other}")),
        }
    }
}

impl From<Semester> for u8 {
    fn from(semester: Semester) -> u8 {
        semester.0
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One scheduled timetable entry: a session of a discipline held by one
/// teacher in one classroom at a fixed weekly position, serving one or more
/// student groups for one semester of one academic year.
///
/// Mutations are destructive overwrites; there is no soft delete and no
/// version history. The audit fields record who touched the entry last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: OccurrenceId,
    pub day: Day,
    pub start_hour: Hour,
    pub end_hour: Hour,
    pub semester: Semester,
    pub academic_year_id: AcademicYearId,
    pub learning_id: LearningId,
    pub event_type: EventType,
    pub recurrence: Recurrence,
    pub teacher_id: TeacherId,
    pub classroom_id: ClassroomId,
    pub discipline_id: DisciplineId,
    /// Groups attending this session. One session can serve several groups
    /// at once (a shared lecture); never empty once persisted.
    pub group_ids: Vec<GroupId>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Occurrence {
    /// The `[start, end)` window this occurrence books.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_hour,
            end: self.end_hour,
        }
    }

    /// Length in whole hours, re-derived from the stored marks.
    pub fn duration(&self) -> u8 {
        self.window().duration()
    }

    /// The slot-booking view of this occurrence, as conflict detection
    /// compares it.
    pub fn placement(&self) -> Placement {
        Placement {
            day: self.day,
            window: self.window(),
            recurrence: self.recurrence,
            teacher_id: self.teacher_id,
            classroom_id: self.classroom_id,
            academic_year_id: self.academic_year_id,
            semester: self.semester,
        }
    }
}

/// A candidate slot booking -- exactly the fields conflict detection reads.
///
/// Commands build one for a candidate before it has an id; a stored
/// occurrence projects into one via [`Occurrence::placement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub day: Day,
    pub window: TimeWindow,
    pub recurrence: Recurrence,
    pub teacher_id: TeacherId,
    pub classroom_id: ClassroomId,
    pub academic_year_id: AcademicYearId,
    pub semester: Semester,
}
