//! The scheduling command surface: create / update / move / delete.
//!
//! Each handler is a sequential pipeline -- validate the request, read the
//! scope's stored occurrences, run the conflict check, then write or reject.
//! Every failure folds into the uniform [`CommandResponse`] shape; a write
//! only happens after the conflict check passes, so a failed command never
//! leaves a partial mutation behind.

use chrono::Utc;
use serde::Deserialize;

use timetable_engine::conflict::find_conflicts;
use timetable_engine::error::GridError;
use timetable_engine::grid::{Day, Hour, TimeWindow};
use timetable_engine::occurrence::{
    AcademicYearId, ClassroomId, DisciplineId, EventType, GroupId, LearningId, Occurrence,
    OccurrenceId, Placement, Semester, TeacherId, UserId,
};
use timetable_engine::recurrence::Recurrence;

use crate::display::{calendar_entry, CalendarEntry, ReferenceDirectory};
use crate::error::{CommandResponse, FieldErrors, SchedulerError};
use crate::store::{OccurrenceFilter, OccurrenceStore};

/// Request to place a new occurrence.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOccurrence {
    pub day: Day,
    pub start_hour: Hour,
    pub end_hour: Hour,
    pub event_type: EventType,
    pub event_recurrence: Recurrence,
    pub semester: Semester,
    pub academic_year_id: AcademicYearId,
    pub learning_id: LearningId,
    pub teacher_id: TeacherId,
    pub discipline_id: DisciplineId,
    pub classroom_id: ClassroomId,
    pub group_ids: Vec<GroupId>,
}

/// Request to rewrite an existing occurrence.
///
/// Omitted fields keep their stored value; a supplied group set replaces the
/// stored one wholesale rather than being diffed against it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOccurrence {
    pub id: OccurrenceId,
    #[serde(default)]
    pub day: Option<Day>,
    #[serde(default)]
    pub start_hour: Option<Hour>,
    #[serde(default)]
    pub end_hour: Option<Hour>,
    #[serde(default)]
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub event_recurrence: Option<Recurrence>,
    #[serde(default)]
    pub semester: Option<Semester>,
    #[serde(default)]
    pub academic_year_id: Option<AcademicYearId>,
    #[serde(default)]
    pub learning_id: Option<LearningId>,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub discipline_id: Option<DisciplineId>,
    #[serde(default)]
    pub classroom_id: Option<ClassroomId>,
    #[serde(default)]
    pub group_ids: Option<Vec<GroupId>>,
}

/// Drag-to-move request: a new day and start hour. The end hour is
/// re-derived from the stored duration; a client-supplied duration is never
/// trusted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOccurrence {
    pub id: OccurrenceId,
    pub day: Day,
    pub start_hour: Hour,
    /// Scope hint for the caller's cache invalidation; unused here.
    pub academic_year_id: AcademicYearId,
}

/// Request to remove an occurrence outright.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOccurrence {
    pub id: OccurrenceId,
    /// Scope hint for the caller's cache invalidation; unused here.
    pub academic_year_id: AcademicYearId,
}

fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.entry(field.to_string()).or_default().push(message.into());
}

/// A fully resolved candidate, after create-shape defaults or update-merge.
struct Draft {
    day: Day,
    start_hour: Hour,
    end_hour: Hour,
    event_type: EventType,
    recurrence: Recurrence,
    semester: Semester,
    academic_year_id: AcademicYearId,
    learning_id: LearningId,
    teacher_id: TeacherId,
    discipline_id: DisciplineId,
    classroom_id: ClassroomId,
    group_ids: Vec<GroupId>,
}

impl Draft {
    fn from_create(request: CreateOccurrence) -> Draft {
        Draft {
            day: request.day,
            start_hour: request.start_hour,
            end_hour: request.end_hour,
            event_type: request.event_type,
            recurrence: request.event_recurrence,
            semester: request.semester,
            academic_year_id: request.academic_year_id,
            learning_id: request.learning_id,
            teacher_id: request.teacher_id,
            discipline_id: request.discipline_id,
            classroom_id: request.classroom_id,
            group_ids: request.group_ids,
        }
    }

    /// Supplied fields over stored values.
    fn merge(stored: &Occurrence, request: UpdateOccurrence) -> Draft {
        Draft {
            day: request.day.unwrap_or(stored.day),
            start_hour: request.start_hour.unwrap_or(stored.start_hour),
            end_hour: request.end_hour.unwrap_or(stored.end_hour),
            event_type: request.event_type.unwrap_or(stored.event_type),
            recurrence: request.event_recurrence.unwrap_or(stored.recurrence),
            semester: request.semester.unwrap_or(stored.semester),
            academic_year_id: request.academic_year_id.unwrap_or(stored.academic_year_id),
            learning_id: request.learning_id.unwrap_or(stored.learning_id),
            teacher_id: request.teacher_id.unwrap_or(stored.teacher_id),
            discipline_id: request.discipline_id.unwrap_or(stored.discipline_id),
            classroom_id: request.classroom_id.unwrap_or(stored.classroom_id),
            group_ids: request
                .group_ids
                .unwrap_or_else(|| stored.group_ids.clone()),
        }
    }

    /// Structural and reference validation, accumulating field problems
    /// instead of failing on the first one.
    fn validate(&self, directory: &impl ReferenceDirectory) -> Result<TimeWindow, SchedulerError> {
        let mut errors = FieldErrors::new();

        let window = match TimeWindow::new(self.start_hour, self.end_hour) {
            Ok(window) => Some(window),
            Err(GridError::EmptyWindow { .. }) => {
                push_error(&mut errors, "startHour", "must be before endHour");
                None
            }
            Err(err @ GridError::DurationOutOfRange(_)) => {
                push_error(&mut errors, "duration", err.to_string());
                None
            }
            Err(other) => {
                push_error(&mut errors, "startHour", other.to_string());
                None
            }
        };

        if self.group_ids.is_empty() {
            push_error(&mut errors, "groupIds", "at least one group is required");
        }
        if directory.teacher(self.teacher_id).is_none() {
            push_error(
                &mut errors,
                "teacherId",
                format!("unknown teacher #{}", self.teacher_id.0),
            );
        }
        if directory.classroom(self.classroom_id).is_none() {
            push_error(
                &mut errors,
                "classroomId",
                format!("unknown classroom #{}", self.classroom_id.0),
            );
        }
        if directory.discipline(self.discipline_id).is_none() {
            push_error(
                &mut errors,
                "disciplineId",
                format!("unknown discipline #{}", self.discipline_id.0),
            );
        }
        if directory.academic_year(self.academic_year_id).is_none() {
            push_error(
                &mut errors,
                "academicYearId",
                format!("unknown academic year #{}", self.academic_year_id.0),
            );
        }
        if directory.learning(self.learning_id).is_none() {
            push_error(
                &mut errors,
                "learningId",
                format!("unknown education cycle #{}", self.learning_id.0),
            );
        }
        for &group_id in &self.group_ids {
            if directory.group(group_id).is_none() {
                push_error(&mut errors, "groupIds", format!("unknown group #{}", group_id.0));
            }
        }

        match window {
            Some(window) if errors.is_empty() => Ok(window),
            _ => Err(SchedulerError::Validation(errors)),
        }
    }

    fn placement(&self, window: TimeWindow) -> Placement {
        Placement {
            day: self.day,
            window,
            recurrence: self.recurrence,
            teacher_id: self.teacher_id,
            classroom_id: self.classroom_id,
            academic_year_id: self.academic_year_id,
            semester: self.semester,
        }
    }

    fn into_occurrence(
        self,
        id: OccurrenceId,
        created_by: UserId,
        created_at: chrono::DateTime<Utc>,
        updated_by: UserId,
        updated_at: chrono::DateTime<Utc>,
    ) -> Occurrence {
        Occurrence {
            id,
            day: self.day,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            semester: self.semester,
            academic_year_id: self.academic_year_id,
            learning_id: self.learning_id,
            event_type: self.event_type,
            recurrence: self.recurrence,
            teacher_id: self.teacher_id,
            classroom_id: self.classroom_id,
            discipline_id: self.discipline_id,
            group_ids: self.group_ids,
            created_by,
            updated_by,
            created_at,
            updated_at,
        }
    }
}

/// The scheduling command surface.
///
/// Owns the store and the reference directory; every mutating command runs
/// its whole validate → read → check → write pipeline under one `&mut self`
/// borrow, so commands on a given scheduler never interleave between check
/// and write. Sharing a store between schedulers re-opens that window --
/// see the [`crate::store`] docs.
pub struct Scheduler<S, D> {
    store: S,
    directory: D,
}

impl<S: OccurrenceStore, D: ReferenceDirectory> Scheduler<S, D> {
    pub fn new(store: S, directory: D) -> Scheduler<S, D> {
        Scheduler { store, directory }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Place a new occurrence, rejecting double-bookings.
    pub fn create(&mut self, request: CreateOccurrence, actor: UserId) -> CommandResponse {
        tracing::debug!(
            teacher = request.teacher_id.0,
            room = request.classroom_id.0,
            day = %request.day,
            "create requested"
        );
        match self.try_create(request, actor) {
            Ok(id) => {
                tracing::info!(occurrence = id.0, "occurrence created");
                CommandResponse::ok(id)
            }
            Err(err) => {
                tracing::debug!(error = %err, "create rejected");
                err.into()
            }
        }
    }

    /// Rewrite an existing occurrence, merging supplied fields over the
    /// stored ones.
    pub fn update(&mut self, request: UpdateOccurrence, actor: UserId) -> CommandResponse {
        tracing::debug!(occurrence = request.id.0, "update requested");
        match self.try_update(request, actor) {
            Ok(id) => {
                tracing::info!(occurrence = id.0, "occurrence updated");
                CommandResponse::ok(id)
            }
            Err(err) => {
                tracing::debug!(error = %err, "update rejected");
                err.into()
            }
        }
    }

    /// Move an occurrence to a new day/start, keeping its duration.
    pub fn move_occurrence(&mut self, request: MoveOccurrence, actor: UserId) -> CommandResponse {
        tracing::debug!(
            occurrence = request.id.0,
            day = %request.day,
            start = %request.start_hour,
            "move requested"
        );
        match self.try_move(request, actor) {
            Ok(id) => {
                tracing::info!(occurrence = id.0, "occurrence moved");
                CommandResponse::ok(id)
            }
            Err(err) => {
                tracing::debug!(error = %err, "move rejected");
                err.into()
            }
        }
    }

    /// Remove an occurrence and its group memberships.
    pub fn delete(&mut self, request: DeleteOccurrence) -> CommandResponse {
        match self.try_delete(request) {
            Ok(id) => {
                tracing::info!(occurrence = id.0, "occurrence deleted");
                CommandResponse::ok(id)
            }
            Err(err) => {
                tracing::debug!(error = %err, "delete rejected");
                err.into()
            }
        }
    }

    /// Calendar rows for one (academic year, semester) scope, sorted by day
    /// then start hour.
    pub fn calendar(
        &self,
        academic_year_id: AcademicYearId,
        semester: Semester,
    ) -> Result<Vec<CalendarEntry>, SchedulerError> {
        let filter = OccurrenceFilter::scope(academic_year_id, semester);
        let mut occurrences = self.store.find_many(&filter)?;
        occurrences.sort_by_key(|o| (o.day, o.start_hour, o.id));
        Ok(occurrences
            .iter()
            .map(|o| calendar_entry(o, &self.directory))
            .collect())
    }

    fn try_create(
        &mut self,
        request: CreateOccurrence,
        actor: UserId,
    ) -> Result<OccurrenceId, SchedulerError> {
        let draft = Draft::from_create(request);
        let window = draft.validate(&self.directory)?;
        self.check_conflicts(&draft.placement(window), None)?;

        let now = Utc::now();
        let id = self
            .store
            .insert(draft.into_occurrence(OccurrenceId(0), actor, now, actor, now))?;
        Ok(id)
    }

    fn try_update(
        &mut self,
        request: UpdateOccurrence,
        actor: UserId,
    ) -> Result<OccurrenceId, SchedulerError> {
        let stored = self
            .store
            .find_by_id(request.id)?
            .ok_or(SchedulerError::NotFound(request.id))?;

        let draft = Draft::merge(&stored, request);
        let window = draft.validate(&self.directory)?;
        self.check_conflicts(&draft.placement(window), Some(stored.id))?;

        let updated = draft.into_occurrence(
            stored.id,
            stored.created_by,
            stored.created_at,
            actor,
            Utc::now(),
        );
        self.store.update(updated)?;
        Ok(stored.id)
    }

    fn try_move(
        &mut self,
        request: MoveOccurrence,
        actor: UserId,
    ) -> Result<OccurrenceId, SchedulerError> {
        let stored = self
            .store
            .find_by_id(request.id)?
            .ok_or(SchedulerError::NotFound(request.id))?;

        // Duration comes from the stored marks, never the client.
        let window =
            TimeWindow::from_duration(request.start_hour, stored.duration()).map_err(|err| {
                let mut errors = FieldErrors::new();
                push_error(&mut errors, "startHour", err.to_string());
                SchedulerError::Validation(errors)
            })?;

        let mut placement = stored.placement();
        placement.day = request.day;
        placement.window = window;
        self.check_conflicts(&placement, Some(stored.id))?;

        let mut moved = stored;
        moved.day = request.day;
        moved.start_hour = window.start;
        moved.end_hour = window.end;
        moved.updated_by = actor;
        moved.updated_at = Utc::now();
        self.store.update(moved)?;
        Ok(request.id)
    }

    fn try_delete(&mut self, request: DeleteOccurrence) -> Result<OccurrenceId, SchedulerError> {
        self.store.delete(request.id)?;
        Ok(request.id)
    }

    fn check_conflicts(
        &self,
        placement: &Placement,
        exclude: Option<OccurrenceId>,
    ) -> Result<(), SchedulerError> {
        let filter = OccurrenceFilter::scope(placement.academic_year_id, placement.semester)
            .on_day(placement.day)
            .overlapping(placement.window);
        let scope = self.store.find_many(&filter)?;

        let conflicts = find_conflicts(placement, &scope, exclude);
        if conflicts.is_empty() {
            Ok(())
        } else {
            tracing::warn!(
                count = conflicts.len(),
                day = %placement.day,
                window = %placement.window,
                "placement rejected: double booking"
            );
            Err(SchedulerError::Conflict(conflicts))
        }
    }
}
