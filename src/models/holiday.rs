//! Recognized holidays.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named holiday that pins a specific week of the season.
///
/// The five rotating holidays are handed out through the yearly roster.
/// `AnnualMeeting` marks the reserved week that belongs to everyone and
/// never rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Holiday {
    /// Last Monday of May.
    MemorialDay,
    /// July 4.
    IndependenceDay,
    /// First Monday of September.
    LaborDay,
    /// Fourth Thursday of November.
    Thanksgiving,
    /// December 25.
    Christmas,
    /// Owners' annual meeting, first Saturday of August.
    AnnualMeeting,
}

impl Holiday {
    /// Holidays distributed to owners through the roster, in calendar order.
    pub const ROTATING: [Holiday; 5] = [
        Holiday::MemorialDay,
        Holiday::IndependenceDay,
        Holiday::LaborDay,
        Holiday::Thanksgiving,
        Holiday::Christmas,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Holiday::MemorialDay => "Memorial Day",
            Holiday::IndependenceDay => "Independence Day",
            Holiday::LaborDay => "Labor Day",
            Holiday::Thanksgiving => "Thanksgiving",
            Holiday::Christmas => "Christmas",
            Holiday::AnnualMeeting => "Annual Meeting",
        }
    }

    /// Whether the holiday falls on a Monday.
    ///
    /// Weeks for these holidays run Sunday to the following Monday, one day
    /// longer than a regular week.
    pub fn is_monday_anchored(self) -> bool {
        matches!(self, Holiday::MemorialDay | Holiday::LaborDay)
    }

    /// Whether the holiday is handed out through the roster.
    pub fn is_rotating(self) -> bool {
        self != Holiday::AnnualMeeting
    }
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monday_anchored() {
        assert!(Holiday::MemorialDay.is_monday_anchored());
        assert!(Holiday::LaborDay.is_monday_anchored());
        assert!(!Holiday::Thanksgiving.is_monday_anchored());
        assert!(!Holiday::AnnualMeeting.is_monday_anchored());
    }

    #[test]
    fn test_rotating_excludes_meeting() {
        assert!(Holiday::ROTATING.iter().all(|h| h.is_rotating()));
        assert!(!Holiday::AnnualMeeting.is_rotating());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Holiday::IndependenceDay).unwrap();
        assert_eq!(json, "\"independence_day\"");
        let back: Holiday = serde_json::from_str("\"labor_day\"").unwrap();
        assert_eq!(back, Holiday::LaborDay);
    }
}
