//! The occurrence storage seam.
//!
//! The command handlers talk to storage through [`OccurrenceStore`]; the
//! in-memory [`MemoryStore`] is the reference implementation and the test
//! double.
//!
//! The handlers run a read-check-write pipeline and hold no lock across the
//! gap, so an implementation backed by a shared or remote store must
//! serialize scheduling writes per (academic year, semester) scope itself --
//! otherwise two concurrent writers can both pass the conflict check and
//! double-book a teacher or room.

use std::collections::HashMap;

use thiserror::Error;

use timetable_engine::grid::{Day, TimeWindow};
use timetable_engine::occurrence::{
    AcademicYearId, ClassroomId, DisciplineId, LearningId, Occurrence, OccurrenceId, Semester,
    TeacherId,
};

/// Storage failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("occurrence {0} not found")]
    NotFound(OccurrenceId),

    /// Transient backend failure. The caller retries the whole command;
    /// commands are not decomposed into resumable steps.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Equality filter over stored occurrences. `None` fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OccurrenceFilter {
    pub academic_year_id: Option<AcademicYearId>,
    pub semester: Option<Semester>,
    pub day: Option<Day>,
    pub teacher_id: Option<TeacherId>,
    pub classroom_id: Option<ClassroomId>,
    pub discipline_id: Option<DisciplineId>,
    pub learning_id: Option<LearningId>,
    /// Keep only occurrences whose window overlaps this one.
    pub overlapping: Option<TimeWindow>,
    /// Id to leave out of the result, for update-in-place reads.
    pub exclude_id: Option<OccurrenceId>,
}

impl OccurrenceFilter {
    /// Everything in one (academic year, semester) scope.
    pub fn scope(academic_year_id: AcademicYearId, semester: Semester) -> OccurrenceFilter {
        OccurrenceFilter {
            academic_year_id: Some(academic_year_id),
            semester: Some(semester),
            ..OccurrenceFilter::default()
        }
    }

    /// Narrow the filter to a single day.
    pub fn on_day(mut self, day: Day) -> OccurrenceFilter {
        self.day = Some(day);
        self
    }

    /// Narrow the filter to occurrences overlapping a time window.
    pub fn overlapping(mut self, window: TimeWindow) -> OccurrenceFilter {
        self.overlapping = Some(window);
        self
    }

    /// Narrow the filter to a single teacher.
    pub fn for_teacher(mut self, teacher_id: TeacherId) -> OccurrenceFilter {
        self.teacher_id = Some(teacher_id);
        self
    }

    /// Narrow the filter to a single classroom.
    pub fn for_classroom(mut self, classroom_id: ClassroomId) -> OccurrenceFilter {
        self.classroom_id = Some(classroom_id);
        self
    }

    /// Whether a stored occurrence passes every set field.
    pub fn matches(&self, occurrence: &Occurrence) -> bool {
        if self.exclude_id == Some(occurrence.id) {
            return false;
        }
        self.academic_year_id
            .is_none_or(|id| id == occurrence.academic_year_id)
            && self.semester.is_none_or(|s| s == occurrence.semester)
            && self.day.is_none_or(|d| d == occurrence.day)
            && self.teacher_id.is_none_or(|id| id == occurrence.teacher_id)
            && self
                .classroom_id
                .is_none_or(|id| id == occurrence.classroom_id)
            && self
                .discipline_id
                .is_none_or(|id| id == occurrence.discipline_id)
            && self.learning_id.is_none_or(|id| id == occurrence.learning_id)
            && self
                .overlapping
                .is_none_or(|window| window.overlaps(&occurrence.window()))
    }
}

/// The storage operations the scheduling commands need.
pub trait OccurrenceStore {
    /// Look up one occurrence. `Ok(None)` means the id is unknown.
    fn find_by_id(&self, id: OccurrenceId) -> Result<Option<Occurrence>>;

    /// All occurrences passing the filter, ordered by id.
    fn find_many(&self, filter: &OccurrenceFilter) -> Result<Vec<Occurrence>>;

    /// How many occurrences pass the filter.
    fn count(&self, filter: &OccurrenceFilter) -> Result<usize>;

    /// Persist a new occurrence, assigning and returning its id. The id on
    /// the passed value is ignored.
    fn insert(&mut self, occurrence: Occurrence) -> Result<OccurrenceId>;

    /// Overwrite the stored occurrence carrying the same id.
    fn update(&mut self, occurrence: Occurrence) -> Result<()>;

    /// Remove an occurrence and its group memberships with it.
    fn delete(&mut self, id: OccurrenceId) -> Result<()>;
}

/// In-memory store: a map of occurrences plus a monotonic id counter.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    occurrences: HashMap<OccurrenceId, Occurrence>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

impl OccurrenceStore for MemoryStore {
    fn find_by_id(&self, id: OccurrenceId) -> Result<Option<Occurrence>> {
        Ok(self.occurrences.get(&id).cloned())
    }

    fn find_many(&self, filter: &OccurrenceFilter) -> Result<Vec<Occurrence>> {
        let mut found: Vec<Occurrence> = self
            .occurrences
            .values()
            .filter(|occurrence| filter.matches(occurrence))
            .cloned()
            .collect();
        found.sort_by_key(|occurrence| occurrence.id);
        Ok(found)
    }

    fn count(&self, filter: &OccurrenceFilter) -> Result<usize> {
        Ok(self
            .occurrences
            .values()
            .filter(|occurrence| filter.matches(occurrence))
            .count())
    }

    fn insert(&mut self, mut occurrence: Occurrence) -> Result<OccurrenceId> {
        self.next_id += 1;
        let id = OccurrenceId(self.next_id);
        occurrence.id = id;
        self.occurrences.insert(id, occurrence);
        Ok(id)
    }

    fn update(&mut self, occurrence: Occurrence) -> Result<()> {
        match self.occurrences.get_mut(&occurrence.id) {
            Some(stored) => {
                *stored = occurrence;
                Ok(())
            }
            None => Err(StoreError::NotFound(occurrence.id)),
        }
    }

    fn delete(&mut self, id: OccurrenceId) -> Result<()> {
        self.occurrences
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
