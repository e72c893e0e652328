//! # timetable-engine
//!
//! The scheduling core of a university timetable: the fixed weekly teaching
//! grid, week-parity recurrence, the occurrence data model, and
//! double-booking detection for teachers and classrooms.
//!
//! Everything here is pure -- no clock reads, no storage, no logging. The
//! companion `timetable-scheduler` crate wires these pieces to an occurrence
//! store and exposes the scheduling commands.
//!
//! ## Modules
//!
//! - [`grid`] — weekdays, hour marks, half-open time windows
//! - [`recurrence`] — every-week / even-weeks / odd-weeks compatibility
//! - [`occurrence`] — the occurrence record and typed identifiers
//! - [`conflict`] — teacher/room double-booking detection
//! - [`availability`] — free-slot computation over a day's bookings
//! - [`error`] — grid validation errors

pub mod availability;
pub mod conflict;
pub mod error;
pub mod grid;
pub mod occurrence;
pub mod recurrence;

pub use availability::{first_free_range, free_ranges, FreeRange};
pub use conflict::{find_conflicts, Conflict, ConflictAxis};
pub use error::GridError;
pub use grid::{Day, Hour, TimeWindow, MAX_DURATION};
pub use occurrence::{Occurrence, OccurrenceId, Placement};
pub use recurrence::Recurrence;
