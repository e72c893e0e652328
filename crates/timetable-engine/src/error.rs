//! Error types for grid validation.

use thiserror::Error;

use crate::grid::Hour;

/// Errors raised when a day/hour value falls off the teaching grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The text is not an hour mark the grid knows about.
    #[error("not an hour mark: {0:?} (expected \"08:00\" through \"20:00\")")]
    InvalidHour(String),

    /// The numeric hour is outside the teaching day.
    #[error("hour {0} is outside the teaching day (08..=20)")]
    HourOffGrid(u8),

    /// A window whose start does not precede its end.
    #[error("window start {start} is not before its end {end}")]
    EmptyWindow { start: Hour, end: Hour },

    /// A booking longer or shorter than the grid allows.
    #[error("duration {0}h is outside the bookable range (1..=6 hours)")]
    DurationOutOfRange(u8),

    /// A start-plus-duration that runs past the last hour mark.
    #[error("a {duration}h slot starting at {start} runs past the end of the teaching day")]
    EndBeyondGrid { start: Hour, duration: u8 },
}

pub type Result<T> = std::result::Result<T, GridError>;
