//! Simulation horizon: the fixed date range bounding every generated date.

use crate::types::Day;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Horizon {
    pub start: Day,
    pub end:   Day,
}

impl Horizon {
    pub fn new(start: Day, end: Day) -> Self {
        assert!(start <= end, "horizon start {start} is after end {end}");
        Self { start, end }
    }

    pub fn contains(&self, day: Day) -> bool {
        self.start <= day && day <= self.end
    }

    /// Pull a date back inside the horizon.
    pub fn clamp(&self, day: Day) -> Day {
        day.clamp(self.start, self.end)
    }

    /// Number of calendar days covered, both ends inclusive.
    pub fn days(&self) -> u64 {
        inclusive_days(self.start, self.end)
    }
}

/// Calendar days from `start` to `end`, both ends inclusive.
/// Zero when `end` precedes `start`.
pub fn inclusive_days(start: Day, end: Day) -> u64 {
    let span = (end - start).num_days();
    if span < 0 {
        0
    } else {
        span as u64 + 1
    }
}

/// Every calendar day from `start` to `end` inclusive.
pub fn each_day(start: Day, end: Day) -> impl Iterator<Item = Day> {
    start.iter_days().take_while(move |d| *d <= end)
}
