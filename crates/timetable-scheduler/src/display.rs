//! Reference resolution and the calendar projection.
//!
//! The directory resolves ids into the human-readable records the calendar
//! shows. It is consulted for existence validation at the command boundary
//! and for display; conflict detection never reads it.

use std::collections::HashMap;

use serde::Serialize;

use timetable_engine::grid::{Day, Hour};
use timetable_engine::occurrence::{
    AcademicYearId, ClassroomId, DisciplineId, EventType, GroupId, LearningId, Occurrence,
    OccurrenceId, TeacherId,
};
use timetable_engine::recurrence::Recurrence;

/// Display record for a teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherRecord {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
}

impl TeacherRecord {
    /// Title, first name, last name -- "Prof. Ada Lovelace".
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.title, self.first_name, self.last_name)
    }
}

/// Lookups for the human-readable side of an occurrence.
pub trait ReferenceDirectory {
    fn teacher(&self, id: TeacherId) -> Option<TeacherRecord>;
    fn classroom(&self, id: ClassroomId) -> Option<String>;
    fn discipline(&self, id: DisciplineId) -> Option<String>;
    fn group(&self, id: GroupId) -> Option<String>;
    fn academic_year(&self, id: AcademicYearId) -> Option<String>;
    fn learning(&self, id: LearningId) -> Option<String>;
}

/// Map-backed directory, filled up front.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    teachers: HashMap<TeacherId, TeacherRecord>,
    classrooms: HashMap<ClassroomId, String>,
    disciplines: HashMap<DisciplineId, String>,
    groups: HashMap<GroupId, String>,
    academic_years: HashMap<AcademicYearId, String>,
    learnings: HashMap<LearningId, String>,
}

impl StaticDirectory {
    pub fn new() -> StaticDirectory {
        StaticDirectory::default()
    }

    pub fn add_teacher(&mut self, id: TeacherId, title: &str, first_name: &str, last_name: &str) {
        self.teachers.insert(
            id,
            TeacherRecord {
                title: title.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            },
        );
    }

    pub fn add_classroom(&mut self, id: ClassroomId, name: &str) {
        self.classrooms.insert(id, name.to_string());
    }

    pub fn add_discipline(&mut self, id: DisciplineId, name: &str) {
        self.disciplines.insert(id, name.to_string());
    }

    pub fn add_group(&mut self, id: GroupId, name: &str) {
        self.groups.insert(id, name.to_string());
    }

    pub fn add_academic_year(&mut self, id: AcademicYearId, range: &str) {
        self.academic_years.insert(id, range.to_string());
    }

    pub fn add_learning(&mut self, id: LearningId, name: &str) {
        self.learnings.insert(id, name.to_string());
    }
}

impl ReferenceDirectory for StaticDirectory {
    fn teacher(&self, id: TeacherId) -> Option<TeacherRecord> {
        self.teachers.get(&id).cloned()
    }

    fn classroom(&self, id: ClassroomId) -> Option<String> {
        self.classrooms.get(&id).cloned()
    }

    fn discipline(&self, id: DisciplineId) -> Option<String> {
        self.disciplines.get(&id).cloned()
    }

    fn group(&self, id: GroupId) -> Option<String> {
        self.groups.get(&id).cloned()
    }

    fn academic_year(&self, id: AcademicYearId) -> Option<String> {
        self.academic_years.get(&id).cloned()
    }

    fn learning(&self, id: LearningId) -> Option<String> {
        self.learnings.get(&id).cloned()
    }
}

/// One row of the weekly calendar, as the UI consumes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: OccurrenceId,
    pub day: Day,
    pub start_hour: Hour,
    pub end_hour: Hour,
    pub duration: u8,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub week_type: Recurrence,
    pub subject: String,
    pub teacher: String,
    pub room: String,
    pub groups: Vec<String>,
    pub group_ids: Vec<GroupId>,
}

/// Flatten an occurrence and its resolved names into a calendar row.
///
/// Purely a projection, no business rule. A reference the directory no
/// longer knows falls back to a `#id` placeholder rather than failing; the
/// row may outlive the records it points at.
pub fn calendar_entry(occurrence: &Occurrence, directory: &impl ReferenceDirectory) -> CalendarEntry {
    let teacher = directory
        .teacher(occurrence.teacher_id)
        .map(|t| t.full_name())
        .unwrap_or_else(|| format!("teacher #{}", occurrence.teacher_id.0));
    let room = directory
        .classroom(occurrence.classroom_id)
        .unwrap_or_else(|| format!("room #{}", occurrence.classroom_id.0));
    let subject = directory
        .discipline(occurrence.discipline_id)
        .unwrap_or_else(|| format!("discipline #{}", occurrence.discipline_id.0));
    let groups = occurrence
        .group_ids
        .iter()
        .map(|&id| {
            directory
                .group(id)
                .unwrap_or_else(|| format!("group #{}", id.0))
        })
        .collect();

    CalendarEntry {
        id: occurrence.id,
        day: occurrence.day,
        start_hour: occurrence.start_hour,
        end_hour: occurrence.end_hour,
        duration: occurrence.duration(),
        event_type: occurrence.event_type,
        week_type: occurrence.recurrence,
        subject,
        teacher,
        room,
        groups,
        group_ids: occurrence.group_ids.clone(),
    }
}
