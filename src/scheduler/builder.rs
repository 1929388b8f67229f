//! Year schedule builder.
//!
//! # Algorithm
//!
//! 1. Lay out the season skeleton and tag the rotating holiday weeks.
//! 2. Rotate the holiday roster for the year and hand each holiday week to
//!    the entry at the holiday's configured position.
//! 3. Every holiday held by a 10% owner seeds the ten-percent rule.
//! 4. Every holiday at or past the skip index held by a 5% owner seeds the
//!    five-percent rule.
//! 5. Every roster owner still without a week, in rotated-roster order,
//!    takes the first free week from index 1 on and is then placed under
//!    their share's rule.
//! 6. Every 5% owner left with a single week gets the opposite-kind week.
//!
//! The finished year is checked against every share invariant; a year that
//! fails is an error, never a silently degraded schedule.
//!
//! Building is deterministic: the same year and configuration always give
//! the same schedule.

use tracing::{debug, info};

use super::placement::Draft;
use crate::config::ScheduleConfig;
use crate::error::{Result, ScheduleError};
use crate::models::{Holiday, SeasonCalendar, SharePercent, YearSchedule};
use crate::validation::{validate_year, ValidationError, ValidationErrorKind};

/// Builds one year at a time from a fixed configuration.
///
/// # Example
///
/// ```
/// use share_schedule::config::ScheduleConfig;
/// use share_schedule::models::Holiday;
/// use share_schedule::scheduler::YearBuilder;
///
/// let config = ScheduleConfig::default();
/// let year = YearBuilder::new(&config).build(2025).unwrap();
///
/// let memorial = year.holiday_index(Holiday::MemorialDay).unwrap();
/// assert_eq!(year.weeks[memorial].owner(), Some("frank_may"));
/// assert_eq!(year.count_of("frank_may"), 4);
/// ```
#[derive(Debug, Clone)]
pub struct YearBuilder<'a> {
    config: &'a ScheduleConfig,
    calendar: SeasonCalendar<'a>,
}

impl<'a> YearBuilder<'a> {
    /// Creates a builder over a validated configuration.
    pub fn new(config: &'a ScheduleConfig) -> Self {
        Self {
            config,
            calendar: SeasonCalendar::new(&config.season),
        }
    }

    /// Builds the schedule for `year`.
    ///
    /// # Errors
    /// Any placement that cannot be made, a holiday week outside the season,
    /// or a finished year that breaks an invariant.
    pub fn build(&self, year: i32) -> Result<YearSchedule> {
        let skeleton = self.calendar.skeleton(year)?;
        let mut draft = Draft::new(skeleton, self.config);
        let rotated = self.config.roster.rotated(year);

        let holidays: Vec<(usize, Holiday)> = draft
            .schedule()
            .weeks
            .iter()
            .enumerate()
            .filter_map(|(i, w)| w.holiday.map(|h| (i, h)))
            .collect();

        for &(index, holiday) in &holidays {
            let owner = self.holiday_holder(&rotated, holiday)?;
            debug!(year, index, owner, %holiday, "holiday week");
            draft.assign(index, owner)?;
        }

        for &(index, _) in &holidays {
            if self.share_at(&draft, index)? == SharePercent::Ten {
                draft.place_ten_percent(index)?;
            }
        }

        let skip = self.config.season.five_percent_skip_index;
        for &(index, _) in holidays.iter().filter(|(i, _)| *i >= skip) {
            if self.share_at(&draft, index)? == SharePercent::Five {
                draft.place_five_percent(index)?;
            }
        }

        let mut pending: Vec<&str> = Vec::new();
        for &owner in &rotated {
            if draft.schedule().count_of(owner) == 0 && !pending.contains(&owner) {
                pending.push(owner);
            }
        }
        for owner in pending {
            let index = draft
                .first_free_from(1)
                .ok_or_else(|| ScheduleError::PlacementExhausted {
                    year,
                    owner: owner.to_string(),
                    index: 1,
                    rule: "first-free",
                })?;
            draft.assign(index, owner)?;
            draft.place_by_share(index)?;
        }

        for owner in self.config.owners_with(SharePercent::Five) {
            let held = draft.schedule().indices_of(&owner.id);
            if let [index] = held[..] {
                draft.place_five_percent(index)?;
            }
        }

        let schedule = draft.into_schedule();
        validate_year(&schedule, self.config)
            .map_err(|errors| ScheduleError::InvariantViolated { year, errors })?;

        info!(
            year,
            owners = schedule.owners().len(),
            meeting = %schedule.meeting.start,
            "built year"
        );
        Ok(schedule)
    }

    /// Builds `count` consecutive years starting at `first`.
    pub fn build_range(&self, first: i32, count: usize) -> Result<Vec<YearSchedule>> {
        (0..count as i32).map(|n| self.build(first + n)).collect()
    }

    fn holiday_holder<'r>(&self, rotated: &[&'r str], holiday: Holiday) -> Result<&'r str> {
        self.config
            .roster
            .position_of(holiday)
            .and_then(|p| rotated.get(p).copied())
            .ok_or_else(|| {
                ScheduleError::InvalidConfig(vec![ValidationError::new(
                    ValidationErrorKind::HolidayPosition,
                    None,
                    format!("{holiday} has no usable roster position"),
                )])
            })
    }

    fn share_at(&self, draft: &Draft<'_>, index: usize) -> Result<SharePercent> {
        let week = &draft.schedule().weeks[index];
        let owner = week.owner().unwrap_or_default();
        draft.share_of(owner, index)
    }
}
