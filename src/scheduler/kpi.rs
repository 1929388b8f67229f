//! Fairness metrics over a horizon of years.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Weeks | Weeks held over the horizon |
//! | Kinds | Weeks held per week kind |
//! | Holidays | Holiday weeks held per rotating holiday |
//! | Deviation | Σ over indices of \|count × 100 − horizon × share\| |
//! | Objective | Σ of all owners' deviations |
//!
//! Deviation and objective are in hundredths of a week, the same unit the
//! rebalancer minimizes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::tally::OccupancyTally;
use crate::config::ScheduleConfig;
use crate::models::{Holiday, SharePercent, WeekKind, YearSchedule};

/// Per-owner fairness figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerFairness {
    /// Owner identifier.
    pub id: String,
    /// Name shown to people.
    pub display_name: String,
    /// Ownership share.
    pub share: SharePercent,
    /// Weeks held over the horizon.
    pub weeks: usize,
    /// Weeks held per kind.
    pub kinds: BTreeMap<WeekKind, usize>,
    /// Holiday weeks held per holiday.
    pub holidays: BTreeMap<Holiday, usize>,
    /// Total absolute deviation from the ideal, in hundredths.
    pub deviation: i64,
}

impl OwnerFairness {
    /// Holiday weeks held over the horizon.
    pub fn holiday_total(&self) -> usize {
        self.holidays.values().sum()
    }
}

/// Fairness of a multi-year schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessReport {
    /// First year covered.
    pub first_year: Option<i32>,
    /// Years covered.
    pub horizon: usize,
    /// Per-owner figures, in configuration order.
    pub owners: Vec<OwnerFairness>,
    /// Sum of all owners' deviations, in hundredths.
    pub objective: i64,
}

impl FairnessReport {
    /// Computes the report for `years`.
    pub fn calculate(config: &ScheduleConfig, years: &[YearSchedule]) -> Self {
        let tally = OccupancyTally::new(config, years);

        let owners = config
            .owners
            .iter()
            .map(|owner| {
                let mut kinds: BTreeMap<WeekKind, usize> =
                    WeekKind::ALL.iter().map(|&k| (k, 0)).collect();
                let mut holidays: BTreeMap<Holiday, usize> = BTreeMap::new();
                let mut weeks = 0;

                for week in years.iter().flat_map(|y| &y.weeks) {
                    if !week.is_owned_by(&owner.id) {
                        continue;
                    }
                    weeks += 1;
                    *kinds.entry(week.kind).or_default() += 1;
                    if let Some(holiday) = week.holiday {
                        *holidays.entry(holiday).or_default() += 1;
                    }
                }

                OwnerFairness {
                    id: owner.id.clone(),
                    display_name: owner.display_name(),
                    share: owner.share,
                    weeks,
                    kinds,
                    holidays,
                    deviation: tally.owner_deviation(&owner.id).unwrap_or(0),
                }
            })
            .collect();

        Self {
            first_year: years.first().map(|y| y.year),
            horizon: years.len(),
            owners,
            objective: tally.objective(),
        }
    }

    /// Figures for one owner.
    pub fn owner(&self, id: &str) -> Option<&OwnerFairness> {
        self.owners.iter().find(|o| o.id == id)
    }

    /// Owner furthest from the ideal.
    pub fn worst_owner(&self) -> Option<&OwnerFairness> {
        self.owners.iter().max_by_key(|o| o.deviation)
    }

    /// Fewest and most holiday weeks held by any owner.
    pub fn holiday_spread(&self) -> Option<(usize, usize)> {
        let totals = self.owners.iter().map(OwnerFairness::holiday_total);
        Some((totals.clone().min()?, totals.max()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{Rebalancer, YearBuilder};

    fn horizon() -> (ScheduleConfig, Vec<YearSchedule>) {
        let config = ScheduleConfig::default();
        let years = YearBuilder::new(&config).build_range(2025, 20).unwrap();
        (config, years)
    }

    #[test]
    fn test_weeks_and_kinds() {
        let (config, years) = horizon();
        let report = FairnessReport::calculate(&config, &years);
        assert_eq!(report.first_year, Some(2025));
        assert_eq!(report.horizon, 20);
        assert_eq!(report.owners.len(), 15);

        let frank = report.owner("frank_may").unwrap();
        assert_eq!(frank.weeks, 80);
        assert!(frank.kinds.values().all(|&n| n == 20));

        let joe = report.owner("joe").unwrap();
        assert_eq!(joe.weeks, 40);
        assert_eq!(joe.kinds.values().sum::<usize>(), 40);
        assert_eq!(report.owner("hankey").unwrap().display_name, "Charlie");
    }

    #[test]
    fn test_holiday_totals() {
        let (config, years) = horizon();
        let report = FairnessReport::calculate(&config, &years);
        let total: usize = report.owners.iter().map(OwnerFairness::holiday_total).sum();
        assert_eq!(total, 100);
        let (least, most) = report.holiday_spread().unwrap();
        assert!(least >= 1);
        assert!(most >= least);
    }

    #[test]
    fn test_objective_drops_after_rebalance() {
        let (config, mut years) = horizon();
        let before = FairnessReport::calculate(&config, &years);
        Rebalancer::new(&config).rebalance(&mut years);
        let after = FairnessReport::calculate(&config, &years);
        assert!(after.objective < before.objective);
        assert_eq!(
            after.objective,
            after.owners.iter().map(|o| o.deviation).sum::<i64>()
        );
        // Swaps keep kind counts.
        for (b, a) in before.owners.iter().zip(&after.owners) {
            assert_eq!(b.kinds, a.kinds);
            assert_eq!(b.holidays, a.holidays);
        }
    }

    #[test]
    fn test_empty_horizon() {
        let config = ScheduleConfig::default();
        let report = FairnessReport::calculate(&config, &[]);
        assert_eq!(report.first_year, None);
        assert_eq!(report.objective, 0);
        assert!(report.owners.iter().all(|o| o.weeks == 0));
    }
}
