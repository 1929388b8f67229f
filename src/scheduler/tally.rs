//! Per-owner, per-index occupancy counts over a horizon of years.
//!
//! An owner with share `p` should hold each season index `horizon × p / 100`
//! times. Deviations are kept as whole hundredths of a week
//! (`count × 100 − horizon × p`) so every comparison stays exact.

use std::collections::HashMap;

use crate::config::ScheduleConfig;
use crate::models::{SharePercent, YearSchedule, SEASON_WEEKS};

/// Occupancy counts for every configured owner and season index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyTally {
    owners: Vec<(String, SharePercent)>,
    slots: HashMap<String, usize>,
    counts: Vec<[i64; SEASON_WEEKS]>,
    horizon: i64,
}

impl OccupancyTally {
    /// Counts occupancy across `years`. Weeks held by identifiers missing
    /// from the configuration are ignored.
    pub fn new(config: &ScheduleConfig, years: &[YearSchedule]) -> Self {
        let owners: Vec<(String, SharePercent)> = config
            .owners
            .iter()
            .map(|o| (o.id.clone(), o.share))
            .collect();
        let slots = owners
            .iter()
            .enumerate()
            .map(|(n, (id, _))| (id.clone(), n))
            .collect();
        let mut tally = Self {
            counts: vec![[0; SEASON_WEEKS]; owners.len()],
            owners,
            slots,
            horizon: years.len() as i64,
        };
        for year in years {
            for (index, week) in year.weeks.iter().enumerate().take(SEASON_WEEKS) {
                if let Some(slot) = week.owner().and_then(|id| tally.slot(id)) {
                    tally.counts[slot][index] += 1;
                }
            }
        }
        tally
    }

    /// Number of years counted.
    pub fn horizon(&self) -> usize {
        self.horizon as usize
    }

    /// Owners in configuration order.
    pub fn owners(&self) -> &[(String, SharePercent)] {
        &self.owners
    }

    pub(crate) fn slot(&self, owner: &str) -> Option<usize> {
        self.slots.get(owner).copied()
    }

    pub(crate) fn share(&self, slot: usize) -> SharePercent {
        self.owners[slot].1
    }

    /// Times `owner` held season index `index`.
    pub fn count(&self, owner: &str, index: usize) -> usize {
        self.slot(owner)
            .map(|s| self.counts[s][index] as usize)
            .unwrap_or(0)
    }

    /// Ideal count per index, in hundredths.
    pub fn ideal(&self, share: SharePercent) -> i64 {
        self.horizon * i64::from(share.percent())
    }

    pub(crate) fn deviation_at(&self, slot: usize, index: usize) -> i64 {
        self.counts[slot][index] * 100 - self.ideal(self.share(slot))
    }

    /// Signed deviation from the ideal at one index, in hundredths.
    pub fn deviation(&self, owner: &str, index: usize) -> Option<i64> {
        self.slot(owner).map(|s| self.deviation_at(s, index))
    }

    pub(crate) fn owner_deviation_at(&self, slot: usize) -> i64 {
        (0..SEASON_WEEKS)
            .map(|i| self.deviation_at(slot, i).abs())
            .sum()
    }

    /// Sum of absolute deviations over all indices, in hundredths.
    pub fn owner_deviation(&self, owner: &str) -> Option<i64> {
        self.slot(owner).map(|s| self.owner_deviation_at(s))
    }

    /// Sum of absolute deviations over all owners and indices, in hundredths.
    pub fn objective(&self) -> i64 {
        (0..self.owners.len())
            .map(|s| self.owner_deviation_at(s))
            .sum()
    }

    /// Records that `a` moved from `i` to `j` and `b` from `j` to `i`.
    pub(crate) fn record_swap(&mut self, a: usize, b: usize, i: usize, j: usize) {
        self.counts[a][i] -= 1;
        self.counts[a][j] += 1;
        self.counts[b][j] -= 1;
        self.counts[b][i] += 1;
    }
}
