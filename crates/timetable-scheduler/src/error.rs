//! Command error taxonomy and the uniform response shape.
//!
//! Every failure a scheduling command can hit is recovered at the handler
//! boundary and folded into [`CommandResponse`] -- nothing escapes to the
//! caller as a panic or an unhandled fault.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use timetable_engine::conflict::Conflict;
use timetable_engine::occurrence::OccurrenceId;

use crate::store::StoreError;

/// Field name → list of problems with the submitted value.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// One human-readable line per colliding resource/interval.
fn conflict_message(conflicts: &[Conflict]) -> String {
    let lines: Vec<String> = conflicts.iter().map(Conflict::to_string).collect();
    lines.join("; ")
}

/// Everything a scheduling command can fail with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// Malformed or missing input fields. No store access was attempted.
    #[error("invalid input")]
    Validation(FieldErrors),

    /// The teacher or room is already booked for an overlapping,
    /// recurrence-compatible window. Nothing was written.
    #[error("{}", conflict_message(.0))]
    Conflict(Vec<Conflict>),

    /// The command referenced an occurrence that does not exist.
    #[error("occurrence {0} not found")]
    NotFound(OccurrenceId),

    /// The underlying store failed; retry the whole command.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for SchedulerError {
    fn from(err: StoreError) -> SchedulerError {
        match err {
            // A missing id is a command-level outcome, not a backend fault.
            StoreError::NotFound(id) => SchedulerError::NotFound(id),
            other => SchedulerError::Store(other),
        }
    }
}

/// Uniform command outcome handed back to the UI layer.
///
/// On success `id` carries the created or touched occurrence. On failure
/// exactly one carrier is set: `errors` for field-level validation problems,
/// `message` for conflicts, missing occurrences, and store failures. The
/// message for a conflict enumerates each colliding resource and interval so
/// an optimistic client can explain the revert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<OccurrenceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl CommandResponse {
    /// A successful outcome for the given occurrence.
    pub fn ok(id: OccurrenceId) -> CommandResponse {
        CommandResponse {
            success: true,
            id: Some(id),
            message: None,
            errors: None,
        }
    }
}

impl From<SchedulerError> for CommandResponse {
    fn from(err: SchedulerError) -> CommandResponse {
        match err {
            SchedulerError::Validation(errors) => CommandResponse {
                success: false,
                id: None,
                message: None,
                errors: Some(errors),
            },
            other => CommandResponse {
                success: false,
                id: None,
                message: Some(other.to_string()),
                errors: None,
            },
        }
    }
}
