//! Placement rules used while a year is being built.
//!
//! A [`Draft`] wraps the season skeleton and enforces, on every single
//! assignment, that the week is free, the owner is known and the owner stays
//! within quota. The two share-specific rules are deterministic searches;
//! the first legal slot wins.
//!
//! # Ten-percent rule
//!
//! From a seed index `s` the candidate is `c = (s + 10) mod 40`. The slots
//! `c, c+1, c−1, c+2, c−2` are tried in order and the first free one that
//! keeps the owner's minimum ring spacing is taken. Three rounds are run,
//! each seeded from the previous round's candidate `c` (not from the slot
//! actually taken), which spreads the four weeks a quarter-season apart.
//!
//! # Five-percent rule
//!
//! From the owner's week at `i` with kind `K`, scan forward from
//! `(i + 10) mod 40`, wrapping, for the first free week of kind
//! `opposite(K)`. At most 41 probes.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::config::ScheduleConfig;
use crate::error::{Result, ScheduleError};
use crate::models::{circular_distance, Occupant, SharePercent, YearSchedule};

/// Season-index step between an owner's weeks.
pub(crate) const STRIDE: usize = 10;

/// Offsets tried around a ten-percent candidate.
const PERTURBATIONS: [isize; 5] = [0, 1, -1, 2, -2];

/// Rounds of the ten-percent rule (weeks beyond the seed).
const TEN_PERCENT_ROUNDS: usize = 3;

/// A year under construction.
#[derive(Debug)]
pub(crate) struct Draft<'a> {
    schedule: YearSchedule,
    shares: HashMap<&'a str, SharePercent>,
    min_spacing: usize,
}

impl<'a> Draft<'a> {
    /// Starts a draft from an unassigned skeleton.
    pub fn new(schedule: YearSchedule, config: &'a ScheduleConfig) -> Self {
        let shares = config
            .owners
            .iter()
            .map(|o| (o.id.as_str(), o.share))
            .collect();
        Self {
            schedule,
            shares,
            min_spacing: config.season.min_spacing,
        }
    }

    pub fn schedule(&self) -> &YearSchedule {
        &self.schedule
    }

    pub fn into_schedule(self) -> YearSchedule {
        self.schedule
    }

    fn year(&self) -> i32 {
        self.schedule.year
    }

    fn len(&self) -> usize {
        self.schedule.len()
    }

    /// Share of a known owner.
    pub fn share_of(&self, owner: &str, index: usize) -> Result<SharePercent> {
        self.shares
            .get(owner)
            .copied()
            .ok_or_else(|| ScheduleError::UnknownOwner {
                year: self.year(),
                owner: owner.to_string(),
                index,
            })
    }

    pub fn is_free(&self, index: usize) -> bool {
        self.schedule.weeks[index].occupant.is_unassigned()
    }

    /// Whether `owner` taking `index` keeps every pair of their weeks apart.
    fn keeps_spacing(&self, owner: &str, index: usize) -> bool {
        let len = self.len();
        self.schedule
            .weeks
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_owned_by(owner))
            .all(|(i, _)| circular_distance(i, index, len) >= self.min_spacing)
    }

    /// First free index at or after `from`, without wrapping.
    pub fn first_free_from(&self, from: usize) -> Option<usize> {
        (from..self.len()).find(|&i| self.is_free(i))
    }

    /// Assigns week `index` to `owner`.
    ///
    /// # Errors
    /// `SlotTaken` if the week already has an occupant, `UnknownOwner` for an
    /// identifier missing from the configuration, `QuotaExceeded` if the owner
    /// already holds all their weeks.
    pub fn assign(&mut self, index: usize, owner: &str) -> Result<()> {
        let year = self.year();
        match &self.schedule.weeks[index].occupant {
            Occupant::Unassigned => {}
            Occupant::Owner(holder) => {
                return Err(ScheduleError::SlotTaken {
                    year,
                    index,
                    holder: holder.clone(),
                    owner: owner.to_string(),
                })
            }
            Occupant::Everyone => {
                return Err(ScheduleError::SlotTaken {
                    year,
                    index,
                    holder: "everyone".to_string(),
                    owner: owner.to_string(),
                })
            }
        }

        let quota = self.share_of(owner, index)?.weeks_per_year();
        if self.schedule.count_of(owner) >= quota {
            return Err(ScheduleError::QuotaExceeded {
                year,
                owner: owner.to_string(),
                index,
                quota,
            });
        }

        debug!(year, index, owner, kind = %self.schedule.weeks[index].kind, "assigned week");
        self.schedule.weeks[index].occupant = Occupant::Owner(owner.to_string());
        Ok(())
    }

    /// Places the remaining weeks of the owner holding `seed` under their share's rule.
    pub fn place_by_share(&mut self, seed: usize) -> Result<()> {
        let owner = self.holder(seed, "by-share")?;
        match self.share_of(&owner, seed)? {
            SharePercent::Ten => self.place_ten_percent(seed),
            SharePercent::Five => self.place_five_percent(seed),
        }
    }

    /// Owner of the seed week for `rule`.
    fn holder(&self, index: usize, rule: &'static str) -> Result<String> {
        self.schedule.weeks[index]
            .owner()
            .map(str::to_string)
            .ok_or(ScheduleError::UnownedSeed {
                year: self.year(),
                index,
                rule,
            })
    }

    /// Gives the 10% owner holding `seed` their three remaining weeks.
    pub fn place_ten_percent(&mut self, seed: usize) -> Result<()> {
        let owner = self.holder(seed, "ten-percent")?;
        let len = self.len() as isize;
        let mut from = seed;

        for _ in 0..TEN_PERCENT_ROUNDS {
            let candidate = (from + STRIDE) % self.len();
            let slot = PERTURBATIONS
                .iter()
                .map(|&d| (candidate as isize + d).rem_euclid(len) as usize)
                .find(|&i| {
                    let ok = self.is_free(i) && self.keeps_spacing(&owner, i);
                    if !ok {
                        trace!(year = self.year(), index = i, owner = %owner, "ten-percent slot rejected");
                    }
                    ok
                })
                .ok_or_else(|| ScheduleError::PlacementExhausted {
                    year: self.year(),
                    owner: owner.clone(),
                    index: candidate,
                    rule: "ten-percent",
                })?;
            self.assign(slot, &owner)?;
            from = candidate;
        }
        Ok(())
    }

    /// Gives the 5% owner holding `index` their opposite-kind week.
    pub fn place_five_percent(&mut self, index: usize) -> Result<()> {
        let owner = self.holder(index, "five-percent")?;
        let len = self.len();
        let wanted = self.schedule.weeks[index].kind.opposite();

        let slot = (0..=len)
            .map(|n| (index + STRIDE + n) % len)
            .find(|&i| self.is_free(i) && self.schedule.weeks[i].kind == wanted)
            .ok_or_else(|| ScheduleError::PlacementExhausted {
                year: self.year(),
                owner: owner.clone(),
                index,
                rule: "five-percent",
            })?;
        self.assign(slot, &owner)
    }
}
