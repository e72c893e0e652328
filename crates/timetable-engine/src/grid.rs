//! The weekly teaching grid -- the canonical representation of "when".
//!
//! A timetable position is a weekday plus a half-open window of hourly marks.
//! The grid is fixed: Monday through Friday, hour marks 08:00 through 20:00.
//! Every day/hour value used anywhere in the engine is a member of these two
//! sequences, and ordering and arithmetic are defined on grid position, never
//! on raw strings.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// First hour mark of the teaching day.
pub const FIRST_HOUR: u8 = 8;
/// Last hour mark of the teaching day. Bookings may end here but not start.
pub const LAST_HOUR: u8 = 20;
/// Number of hour marks on the grid (08:00 through 20:00 inclusive).
pub const SLOT_COUNT: usize = (LAST_HOUR - FIRST_HOUR + 1) as usize;
/// Longest bookable window, in hours.
pub const MAX_DURATION: u8 = 6;

/// A teaching weekday. The timetable has no weekend columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All teaching days in grid order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        };
        f.write_str(label)
    }
}

/// An hourly mark on the teaching grid, 08:00 through 20:00.
///
/// Stored as the 24h hour number; serializes as the zero-padded `"HH:00"`
/// string that calendar clients exchange. Construction validates against the
/// grid, so a held `Hour` is always a real mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hour(u8);

impl Hour {
    /// 08:00, the first mark of the teaching day.
    pub const FIRST: Hour = Hour(FIRST_HOUR);
    /// 20:00, the last mark of the teaching day.
    pub const LAST: Hour = Hour(LAST_HOUR);

    /// Wrap a 24h hour number, rejecting anything off the grid.
    pub fn new(hour: u8) -> Result<Hour> {
        if (FIRST_HOUR..=LAST_HOUR).contains(&hour) {
            Ok(Hour(hour))
        } else {
            Err(GridError::HourOffGrid(hour))
        }
    }

    /// The raw 24h hour number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Position of this mark on the grid (08:00 is slot 0).
    pub fn slot_index(self) -> usize {
        (self.0 - FIRST_HOUR) as usize
    }

    /// The mark at a given grid position, if the position exists.
    pub fn at_slot(index: usize) -> Option<Hour> {
        if index < SLOT_COUNT {
            Some(Hour(FIRST_HOUR + index as u8))
        } else {
            None
        }
    }

    /// The end mark reached by starting here and teaching for `duration`
    /// hours. An end past the last mark is an error, never a silent clamp.
    pub fn advance(self, duration: u8) -> Result<Hour> {
        let end = u16::from(self.0) + u16::from(duration);
        if end > u16::from(LAST_HOUR) {
            return Err(GridError::EndBeyondGrid {
                start: self,
                duration,
            });
        }
        Ok(Hour(end as u8))
    }

    /// Wall-clock time of this mark.
    pub fn wall_clock(self) -> NaiveTime {
        // A validated mark is always within 00..24.
        NaiveTime::from_hms_opt(u32::from(self.0), 0, 0).expect("hour mark within 0..24")
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for Hour {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Hour> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| GridError::InvalidHour(s.to_string()))?;
        if minute != "00" {
            return Err(GridError::InvalidHour(s.to_string()));
        }
        let hour: u8 = hour
            .parse()
            .map_err(|_| GridError::InvalidHour(s.to_string()))?;
        Hour::new(hour).map_err(|_| GridError::InvalidHour(s.to_string()))
    }
}

impl Serialize for Hour {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hour {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Hour, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A half-open `[start, end)` window of hour marks within one day.
///
/// Half-open means back-to-back bookings share a mark without colliding: a
/// window ending at 10:00 never overlaps one starting at 10:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: Hour,
    pub end: Hour,
}

impl TimeWindow {
    /// Build a window, enforcing `start < end` and a 1..=6 hour duration.
    pub fn new(start: Hour, end: Hour) -> Result<TimeWindow> {
        if start >= end {
            return Err(GridError::EmptyWindow { start, end });
        }
        let duration = (end.slot_index() - start.slot_index()) as u8;
        if duration > MAX_DURATION {
            return Err(GridError::DurationOutOfRange(duration));
        }
        Ok(TimeWindow { start, end })
    }

    /// The window starting at `start` and running for `duration` hours.
    pub fn from_duration(start: Hour, duration: u8) -> Result<TimeWindow> {
        if duration == 0 || duration > MAX_DURATION {
            return Err(GridError::DurationOutOfRange(duration));
        }
        let end = start.advance(duration)?;
        Ok(TimeWindow { start, end })
    }

    /// Length in whole hours, always re-derived from the marks themselves.
    pub fn duration(&self) -> u8 {
        (self.end.slot_index() - self.start.slot_index()) as u8
    }

    /// Half-open overlap test: `s1 < e2 && s2 < e1`.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
