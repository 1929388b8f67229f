//! Year schedule model.
//!
//! A year schedule is the 40-week season of one year with an occupant on
//! every week, plus the reserved annual meeting week. Season weeks are
//! addressed by their index 0..39; the meeting week is held beside them and
//! spliced back in by [`YearSchedule::calendar`].
//!
//! The season is treated as a ring: distances between week indices wrap
//! around, so the last cold week of one year neighbours the first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{AllocatedWeek, Holiday, WeekKind};

/// Circular distance between two indices on a ring of `len` positions.
#[inline]
pub fn circular_distance(a: usize, b: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let d = a.abs_diff(b) % len;
    d.min(len - d)
}

/// One year's allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSchedule {
    /// Calendar year.
    pub year: i32,
    /// Season weeks in calendar order.
    pub weeks: Vec<AllocatedWeek>,
    /// The annual meeting week.
    pub meeting: AllocatedWeek,
    /// Number of season weeks before the meeting week.
    pub meeting_position: usize,
}

impl YearSchedule {
    /// Creates a year schedule.
    pub fn new(
        year: i32,
        weeks: Vec<AllocatedWeek>,
        meeting: AllocatedWeek,
        meeting_position: usize,
    ) -> Self {
        Self {
            year,
            weeks,
            meeting,
            meeting_position,
        }
    }

    /// Number of season weeks.
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    /// Whether the season is empty.
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Every week of the year in calendar order, meeting week included.
    pub fn calendar(&self) -> impl Iterator<Item = &AllocatedWeek> {
        let split = self.meeting_position.min(self.weeks.len());
        self.weeks[..split]
            .iter()
            .chain(std::iter::once(&self.meeting))
            .chain(self.weeks[split..].iter())
    }

    /// Season index of the week pinned to `holiday`.
    pub fn holiday_index(&self, holiday: Holiday) -> Option<usize> {
        self.weeks.iter().position(|w| w.holiday == Some(holiday))
    }

    /// Season indices held by `owner`, ascending.
    pub fn indices_of(&self, owner: &str) -> Vec<usize> {
        self.weeks
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_owned_by(owner))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of weeks held by `owner`.
    pub fn count_of(&self, owner: &str) -> usize {
        self.weeks.iter().filter(|w| w.is_owned_by(owner)).count()
    }

    /// Kinds of the weeks held by `owner`, sorted.
    pub fn kinds_of(&self, owner: &str) -> Vec<WeekKind> {
        let mut kinds: Vec<WeekKind> = self
            .weeks
            .iter()
            .filter(|w| w.is_owned_by(owner))
            .map(|w| w.kind)
            .collect();
        kinds.sort();
        kinds
    }

    /// Distinct owners holding at least one week.
    pub fn owners(&self) -> BTreeSet<&str> {
        self.weeks.iter().filter_map(|w| w.owner()).collect()
    }

    /// Exchanges the occupants of two season weeks.
    pub fn swap_occupants(&mut self, a: usize, b: usize) {
        if a != b {
            let held = self.weeks[a].occupant.clone();
            self.weeks[a].occupant = std::mem::replace(&mut self.weeks[b].occupant, held);
        }
    }

    /// First pair of `owner`'s weeks closer than `min_gap` on the season ring.
    pub fn spacing_violation(&self, owner: &str, min_gap: usize) -> Option<(usize, usize)> {
        let indices = self.indices_of(owner);
        let len = self.weeks.len();
        for (n, &a) in indices.iter().enumerate() {
            for &b in &indices[n + 1..] {
                if circular_distance(a, b, len) < min_gap {
                    return Some((a, b));
                }
            }
        }
        None
    }
}
