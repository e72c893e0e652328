//! # timetable-scheduler
//!
//! Scheduling commands over the timetable engine: create / update / move /
//! delete an occurrence against an occurrence store, with validation,
//! conflict rejection, and the calendar projection the UI consumes.
//!
//! A command either completes or fails outright with a uniform response;
//! writes happen only after the conflict check passes, so there is never a
//! partial mutation to clean up.
//!
//! ## Modules
//!
//! - [`commands`] — the [`Scheduler`] and its four command handlers
//! - [`store`] — the [`OccurrenceStore`] seam and in-memory implementation
//! - [`display`] — reference resolution and the calendar projection
//! - [`error`] — command error taxonomy and the uniform response shape

pub mod commands;
pub mod display;
pub mod error;
pub mod store;

pub use commands::{
    CreateOccurrence, DeleteOccurrence, MoveOccurrence, Scheduler, UpdateOccurrence,
};
pub use display::{calendar_entry, CalendarEntry, ReferenceDirectory, StaticDirectory, TeacherRecord};
pub use error::{CommandResponse, FieldErrors, SchedulerError};
pub use store::{MemoryStore, OccurrenceFilter, OccurrenceStore, StoreError};
