//! Week-parity recurrence -- every week, even weeks only, or odd weeks only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How often a scheduled occurrence repeats within its semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Recurrence {
    /// Runs every week of the semester.
    #[default]
    All,
    /// Runs only on even-numbered weeks.
    Even,
    /// Runs only on odd-numbered weeks.
    Odd,
}

impl Recurrence {
    /// Whether two occurrences already sharing a day and an overlapping
    /// window actually collide, or legitimately coexist on disjoint weeks.
    ///
    /// Symmetric: true iff at least one side runs every week, or both run on
    /// the same parity. `Even` and `Odd` occupy disjoint weeks and never
    /// conflict with each other.
    pub fn conflicts_with(self, other: Recurrence) -> bool {
        match (self, other) {
            (Recurrence::All, _) | (_, Recurrence::All) => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recurrence::All => "every week",
            Recurrence::Even => "even weeks",
            Recurrence::Odd => "odd weeks",
        };
        f.write_str(label)
    }
}
