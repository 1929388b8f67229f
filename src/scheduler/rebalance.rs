//! Multi-year rebalancer.
//!
//! Swaps non-holiday weeks of the same kind between two owners inside a
//! single year so that, over the whole horizon, every owner holds each
//! season index as close to their ideal count as possible.
//!
//! # Algorithm
//!
//! 1. Tally `(owner, index)` occurrences over all years.
//! 2. Rank owners by total absolute deviation, largest first (ties keep
//!    configuration order).
//! 3. For each owner `A` and each index `i` where `A` is in surplus
//!    (largest surplus first), try the indices `j` where `A` is in deficit,
//!    nearest first on the season ring, at most 10 away.
//! 4. Walk the years in order for one where `A` holds `i`, another owner
//!    `B` holds `j`, neither week is a holiday, both have the same kind,
//!    `|i − j|` is within the pair's limit (1 if either is a 10% owner,
//!    else 10), the pair was never swapped in that year before, and the
//!    swap strictly lowers the total absolute deviation.
//! 5. Swap, then undo if either 10% party now breaks the minimum spacing.
//!    Otherwise commit and update the tally.
//! 6. Repeat passes until one commits nothing or the pass ceiling is hit.
//!
//! Each committed swap strictly lowers a non-negative integer objective, so
//! the loop terminates even without the ceiling. A schedule that the
//! rebalancer has already converged is left untouched by a second run.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

use super::tally::OccupancyTally;
use crate::config::ScheduleConfig;
use crate::models::{circular_distance, SharePercent, YearSchedule, SEASON_WEEKS};

/// Farthest a deficit index is looked for from a surplus index.
const SEARCH_RADIUS: usize = 10;

/// A committed exchange of two weeks within one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    /// Calendar year.
    pub year: i32,
    /// Position of the year in the rebalanced slice.
    pub year_index: usize,
    /// Index `owner` gave up.
    pub from: usize,
    /// Index `owner` received.
    pub to: usize,
    /// Owner in surplus at `from`.
    pub owner: String,
    /// Owner that held `to`.
    pub counterpart: String,
}

/// Outcome of a rebalancing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceReport {
    /// Passes run.
    pub passes: usize,
    /// Whether the last pass committed nothing.
    pub converged: bool,
    /// Every committed swap, in order.
    pub swaps: Vec<Swap>,
    /// Total absolute deviation before the run, in hundredths.
    pub objective_before: i64,
    /// Total absolute deviation after the run, in hundredths.
    pub objective_after: i64,
}

/// Drives per-index occupancy toward the ideal.
///
/// # Example
///
/// ```
/// use share_schedule::config::ScheduleConfig;
/// use share_schedule::scheduler::{Rebalancer, YearBuilder};
///
/// let config = ScheduleConfig::default();
/// let mut years = YearBuilder::new(&config).build_range(2025, 20).unwrap();
///
/// let report = Rebalancer::new(&config).rebalance(&mut years);
/// assert!(report.converged);
/// assert!(report.objective_after < report.objective_before);
/// ```
#[derive(Debug, Clone)]
pub struct Rebalancer<'a> {
    config: &'a ScheduleConfig,
    max_passes: usize,
}

impl<'a> Rebalancer<'a> {
    /// Creates a rebalancer with the configured pass ceiling.
    pub fn new(config: &'a ScheduleConfig) -> Self {
        Self {
            config,
            max_passes: config.rebalance.max_passes,
        }
    }

    /// Overrides the pass ceiling.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Rebalances `years` in place. Only occupants of non-holiday season
    /// weeks change.
    pub fn rebalance(&self, years: &mut [YearSchedule]) -> RebalanceReport {
        let mut tally = OccupancyTally::new(self.config, years);
        let objective_before = tally.objective();
        let mut touched: HashSet<(usize, usize, usize)> = HashSet::new();
        let mut swaps = Vec::new();
        let mut passes = 0;
        let mut converged = false;

        while passes < self.max_passes {
            passes += 1;
            let committed = self.pass(years, &mut tally, &mut touched, &mut swaps);
            debug!(pass = passes, committed, objective = tally.objective(), "rebalance pass");
            if committed == 0 {
                converged = true;
                break;
            }
        }

        let objective_after = tally.objective();
        if converged {
            info!(
                passes,
                swaps = swaps.len(),
                objective_before,
                objective_after,
                "rebalance converged"
            );
        } else {
            warn!(
                passes,
                swaps = swaps.len(),
                objective_after,
                "rebalance stopped at the pass ceiling"
            );
        }

        RebalanceReport {
            passes,
            converged,
            swaps,
            objective_before,
            objective_after,
        }
    }

    /// One pass over all owners. Returns the number of committed swaps.
    fn pass(
        &self,
        years: &mut [YearSchedule],
        tally: &mut OccupancyTally,
        touched: &mut HashSet<(usize, usize, usize)>,
        swaps: &mut Vec<Swap>,
    ) -> usize {
        let mut ranked: Vec<usize> = (0..tally.owners().len()).collect();
        // Stable sort keeps configuration order on ties.
        ranked.sort_by_key(|&a| std::cmp::Reverse(tally.owner_deviation_at(a)));

        let mut committed = 0;
        for a in ranked {
            let mut surplus: Vec<usize> = (0..SEASON_WEEKS)
                .filter(|&i| tally.deviation_at(a, i) > 0)
                .collect();
            surplus.sort_by_key(|&i| (std::cmp::Reverse(tally.deviation_at(a, i)), i));

            for i in surplus {
                if tally.deviation_at(a, i) <= 0 {
                    continue;
                }
                let mut deficit: Vec<usize> = (0..SEASON_WEEKS)
                    .filter(|&j| {
                        j != i
                            && circular_distance(i, j, SEASON_WEEKS) <= SEARCH_RADIUS
                            && tally.deviation_at(a, j) < 0
                    })
                    .collect();
                deficit.sort_by_key(|&j| (circular_distance(i, j, SEASON_WEEKS), j));

                for j in deficit {
                    if let Some(swap) = self.try_swap(years, tally, touched, a, i, j) {
                        swaps.push(swap);
                        committed += 1;
                        break;
                    }
                }
            }
        }
        committed
    }

    /// Looks for the first year where `a` can trade index `i` for `j`.
    fn try_swap(
        &self,
        years: &mut [YearSchedule],
        tally: &mut OccupancyTally,
        touched: &mut HashSet<(usize, usize, usize)>,
        a: usize,
        i: usize,
        j: usize,
    ) -> Option<Swap> {
        let distance = circular_distance(i, j, SEASON_WEEKS);
        let share_a = tally.share(a);
        let owner_a = tally.owners()[a].0.clone();

        for (y, schedule) in years.iter_mut().enumerate() {
            let (wa, wb) = (&schedule.weeks[i], &schedule.weeks[j]);
            if !wa.is_owned_by(&owner_a) || !wa.is_swappable() {
                continue;
            }
            if !wb.is_swappable() || wb.kind != wa.kind {
                continue;
            }
            let Some(b) = wb.owner().and_then(|id| tally.slot(id)) else {
                continue;
            };
            if b == a {
                continue;
            }
            let share_b = tally.share(b);
            if distance > self.config.rebalance.max_distance(share_a, share_b) {
                continue;
            }
            let key = (y, i.min(j), i.max(j));
            if touched.contains(&key) {
                continue;
            }

            let old = tally.deviation_at(a, i).abs()
                + tally.deviation_at(a, j).abs()
                + tally.deviation_at(b, j).abs()
                + tally.deviation_at(b, i).abs();
            let new = (tally.deviation_at(a, i) - 100).abs()
                + (tally.deviation_at(a, j) + 100).abs()
                + (tally.deviation_at(b, j) - 100).abs()
                + (tally.deviation_at(b, i) + 100).abs();
            if new >= old {
                continue;
            }

            let owner_b = tally.owners()[b].0.clone();
            schedule.swap_occupants(i, j);
            let min_spacing = self.config.season.min_spacing;
            let breaks_spacing = [(&owner_a, share_a), (&owner_b, share_b)]
                .iter()
                .any(|(id, share)| {
                    *share == SharePercent::Ten
                        && schedule.spacing_violation(id, min_spacing).is_some()
                });
            if breaks_spacing {
                schedule.swap_occupants(i, j);
                trace!(year = schedule.year, i, j, a = %owner_a, b = %owner_b, "swap breaks spacing");
                continue;
            }

            tally.record_swap(a, b, i, j);
            touched.insert(key);
            debug!(year = schedule.year, from = i, to = j, owner = %owner_a, counterpart = %owner_b, "swap");
            return Some(Swap {
                year: schedule.year,
                year_index: y,
                from: i,
                to: j,
                owner: owner_a,
                counterpart: owner_b,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocatedWeek, Occupant, Owner, WeekKind};
    use crate::scheduler::YearBuilder;
    use crate::validation::validate_schedule;
    use chrono::{Duration, NaiveDate};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn built(config: &ScheduleConfig) -> Vec<YearSchedule> {
        YearBuilder::new(config).build_range(2025, 20).unwrap()
    }

    fn blank_year(year: i32) -> YearSchedule {
        let start = NaiveDate::from_ymd_opt(year, 3, 16).unwrap();
        let weeks = (0..SEASON_WEEKS)
            .map(|i| AllocatedWeek::new(start + Duration::weeks(i as i64), WeekKind::Cool))
            .collect();
        let meeting = AllocatedWeek::new(start + Duration::weeks(SEASON_WEEKS as i64), WeekKind::Hot)
            .with_occupant(Occupant::Everyone);
        YearSchedule::new(year, weeks, meeting, SEASON_WEEKS)
    }

    #[test]
    fn test_moves_surplus_to_deficit() {
        let config = ScheduleConfig {
            owners: vec![Owner::five_percent("a"), Owner::five_percent("b")],
            ..ScheduleConfig::default()
        };
        let mut years: Vec<YearSchedule> = (0..20).map(|n| blank_year(2000 + n)).collect();
        for y in 0..3 {
            years[y].weeks[7].occupant = Occupant::Owner("a".into());
        }
        for y in 0..2 {
            years[y].weeks[12].occupant = Occupant::Owner("b".into());
        }

        let report = Rebalancer::new(&config).rebalance(&mut years);
        assert!(report.converged);
        assert_eq!(report.swaps.len(), 1);
        assert_eq!(report.swaps[0].year_index, 0);
        assert_eq!((report.swaps[0].from, report.swaps[0].to), (7, 12));

        let tally = OccupancyTally::new(&config, &years);
        assert!(tally.count("a", 7) <= 2);
        assert!(tally.count("a", 12) >= 1);
        assert_eq!(tally.count("b", 12), 1);
        assert!(report.objective_after < report.objective_before);
    }

    #[test]
    fn test_never_moves_into_unassigned_weeks() {
        let config = ScheduleConfig {
            owners: vec![Owner::five_percent("a"), Owner::five_percent("b")],
            ..ScheduleConfig::default()
        };
        let mut years: Vec<YearSchedule> = (0..20).map(|n| blank_year(2000 + n)).collect();
        for year in years.iter_mut().take(3) {
            year.weeks[7].occupant = Occupant::Owner("a".into());
        }

        let report = Rebalancer::new(&config).rebalance(&mut years);
        assert!(report.converged);
        assert!(report.swaps.is_empty());
        assert_eq!(report.objective_after, report.objective_before);
        for year in &years[..3] {
            assert_eq!(year.indices_of("a"), vec![7]);
            assert_eq!(year.owners().len(), 1);
        }
    }

    #[test]
    fn test_holiday_weeks_never_move() {
        let config = ScheduleConfig::default();
        let mut years = built(&config);
        let before: Vec<Vec<Occupant>> = years
            .iter()
            .map(|y| {
                y.weeks
                    .iter()
                    .filter(|w| w.holiday.is_some())
                    .map(|w| w.occupant.clone())
                    .collect()
            })
            .collect();

        let report = Rebalancer::new(&config).rebalance(&mut years);
        assert!(!report.swaps.is_empty());

        for (y, held) in years.iter().zip(before) {
            let after: Vec<Occupant> = y
                .weeks
                .iter()
                .filter(|w| w.holiday.is_some())
                .map(|w| w.occupant.clone())
                .collect();
            assert_eq!(after, held);
        }
    }

    #[test]
    fn test_preserves_invariants() {
        let config = ScheduleConfig::default();
        let mut years = built(&config);
        let report = Rebalancer::new(&config).rebalance(&mut years);
        assert!(report.converged);
        assert!(report.objective_after < report.objective_before);
        assert_eq!(report.objective_after, OccupancyTally::new(&config, &years).objective());
        assert!(validate_schedule(&years, &config).is_ok());
    }

    #[test]
    fn test_idempotent() {
        let config = ScheduleConfig::default();
        let mut years = built(&config);
        let rebalancer = Rebalancer::new(&config);
        rebalancer.rebalance(&mut years);
        let settled = years.clone();

        let again = rebalancer.rebalance(&mut years);
        assert!(again.converged);
        assert_eq!(again.passes, 1);
        assert!(again.swaps.is_empty());
        assert_eq!(years, settled);
    }

    #[test]
    fn test_replayed_swaps_keep_spacing() {
        let config = ScheduleConfig::default();
        let original = built(&config);
        let mut years = original.clone();
        let report = Rebalancer::new(&config).rebalance(&mut years);

        let mut replay = original;
        for swap in &report.swaps {
            let schedule = &mut replay[swap.year_index];
            assert!(schedule.weeks[swap.from].is_owned_by(&swap.owner));
            assert!(schedule.weeks[swap.to].is_owned_by(&swap.counterpart));
            assert_eq!(schedule.weeks[swap.from].kind, schedule.weeks[swap.to].kind);
            schedule.swap_occupants(swap.from, swap.to);
            for owner in config.owners_with(SharePercent::Ten) {
                assert_eq!(schedule.spacing_violation(&owner.id, 8), None, "{swap:?}");
            }
        }
        assert_eq!(replay, years);
    }

    #[test]
    fn test_distance_limits() {
        let config = ScheduleConfig::default();
        let mut years = built(&config);
        let report = Rebalancer::new(&config).rebalance(&mut years);
        for swap in &report.swaps {
            let limit = config.rebalance.max_distance(
                config.share_of(&swap.owner).unwrap(),
                config.share_of(&swap.counterpart).unwrap(),
            );
            assert!(circular_distance(swap.from, swap.to, SEASON_WEEKS) <= limit);
        }
    }

    #[test]
    fn test_pass_ceiling() {
        let config = ScheduleConfig::default();
        let mut years = built(&config);
        let report = Rebalancer::new(&config)
            .with_max_passes(1)
            .rebalance(&mut years);
        assert_eq!(report.passes, 1);
        assert!(!report.converged);
        assert!(!report.swaps.is_empty());
    }

    #[test]
    fn test_random_perturbation_rebalances() {
        let config = ScheduleConfig::default();
        let mut years = built(&config);
        let mut rng = StdRng::seed_from_u64(0x5eed);

        // Shuffle 5% owners between same-kind weeks; quotas and kinds stay intact.
        let five: HashSet<&str> = config
            .owners_with(SharePercent::Five)
            .map(|o| o.id.as_str())
            .collect();
        for _ in 0..200 {
            let y = rng.random_range(0..years.len());
            let i = rng.random_range(0..SEASON_WEEKS);
            let j = rng.random_range(0..SEASON_WEEKS);
            let schedule = &mut years[y];
            let (wi, wj) = (&schedule.weeks[i], &schedule.weeks[j]);
            let movable = |w: &AllocatedWeek| {
                w.holiday.is_none() && w.owner().is_some_and(|id| five.contains(id))
            };
            if movable(wi) && movable(wj) && wi.kind == wj.kind {
                schedule.swap_occupants(i, j);
            }
        }
        assert!(validate_schedule(&years, &config).is_ok());

        let rebalancer = Rebalancer::new(&config);
        let report = rebalancer.rebalance(&mut years);
        assert!(report.converged);
        assert!(report.objective_after <= report.objective_before);
        assert!(validate_schedule(&years, &config).is_ok());
        assert!(rebalancer.rebalance(&mut years).swaps.is_empty());
    }
}
