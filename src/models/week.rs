//! Season-typed weeks and their occupants.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Holiday;

/// Seasonal category of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekKind {
    /// Early spring and late autumn.
    Cold,
    /// Spring and autumn shoulder weeks.
    Cool,
    /// Late spring and early autumn.
    Warm,
    /// Summer.
    Hot,
}

impl WeekKind {
    /// All kinds.
    pub const ALL: [WeekKind; 4] = [WeekKind::Cold, WeekKind::Cool, WeekKind::Warm, WeekKind::Hot];

    /// The kind a 5% owner's second week must have: cool↔warm, hot↔cold.
    pub fn opposite(self) -> Self {
        match self {
            WeekKind::Cool => WeekKind::Warm,
            WeekKind::Warm => WeekKind::Cool,
            WeekKind::Hot => WeekKind::Cold,
            WeekKind::Cold => WeekKind::Hot,
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            WeekKind::Cold => "cold",
            WeekKind::Cool => "cool",
            WeekKind::Warm => "warm",
            WeekKind::Hot => "hot",
        }
    }
}

impl fmt::Display for WeekKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who holds a week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupant {
    /// Nobody yet.
    #[default]
    Unassigned,
    /// Shared by all owners (annual meeting week).
    Everyone,
    /// A single owner, by identifier.
    Owner(String),
}

impl Occupant {
    /// Owner identifier, if held by a single owner.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Occupant::Owner(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the week is still free.
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Occupant::Unassigned)
    }
}

/// One calendar week of the season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedWeek {
    /// First day (always a Sunday).
    pub start: NaiveDate,
    /// Day after the last day.
    pub end: NaiveDate,
    /// Seasonal category.
    pub kind: WeekKind,
    /// Holiday pinned to this week, if any.
    pub holiday: Option<Holiday>,
    /// Current holder.
    pub occupant: Occupant,
}

impl AllocatedWeek {
    /// Creates an unassigned seven-day week.
    pub fn new(start: NaiveDate, kind: WeekKind) -> Self {
        Self {
            start,
            end: start + Duration::days(7),
            kind,
            holiday: None,
            occupant: Occupant::Unassigned,
        }
    }

    /// Tags the week with a holiday.
    ///
    /// Monday-anchored holiday weeks run one extra day.
    pub fn with_holiday(mut self, holiday: Holiday) -> Self {
        self.holiday = Some(holiday);
        if holiday.is_monday_anchored() {
            self.end = self.start + Duration::days(8);
        }
        self
    }

    /// Sets the occupant.
    pub fn with_occupant(mut self, occupant: Occupant) -> Self {
        self.occupant = occupant;
        self
    }

    /// Owner identifier, if held by a single owner.
    pub fn owner(&self) -> Option<&str> {
        self.occupant.owner()
    }

    /// Whether the week is held by the given owner.
    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner() == Some(owner)
    }

    /// Whether the rebalancer may move this week between owners.
    pub fn is_swappable(&self) -> bool {
        self.holiday.is_none() && self.owner().is_some()
    }

    /// Length in days.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
