//! Calendar arithmetic for holiday weeks and season blocks.
//!
//! Pure functions of a year. Every week starts on a Sunday.
//!
//! # Season layout
//!
//! All blocks hang off the annual meeting week (the week ending on the
//! first Saturday of August):
//!
//! | Block | Weeks | Kind |
//! |-------|-------|------|
//! | Early cold | 1 | cold |
//! | Early cool | 5 | cool |
//! | Early warm | 5 | warm |
//! | Hot, before meeting | 8 (table exceptions) | hot |
//! | Annual meeting | 1 | reserved |
//! | Hot, after meeting | 10 − before | hot |
//! | Late warm | 5 | warm |
//! | Late cool | 5 | cool |
//! | Late cold | 9 | cold |
//!
//! The 40 non-meeting weeks form the season; the meeting week sits between
//! the two hot blocks.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{AllocatedWeek, Holiday, Occupant, WeekKind, YearSchedule};
use crate::config::SeasonLayout;
use crate::error::{Result, ScheduleError};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Number of ownable weeks in a season.
pub const SEASON_WEEKS: usize = 40;

/// Hot weeks in a season, split around the meeting week.
pub const HOT_WEEKS: usize = 10;

const SHOULDER_WEEKS: usize = 5;
const EARLY_COLD_WEEKS: usize = 1;
const LATE_COLD_WEEKS: usize = 9;

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ScheduleError::DateOutOfRange { year })
}

fn weeks(n: usize) -> Duration {
    Duration::weeks(n as i64)
}

/// Days from `date` forward to the next day with the given Monday-based weekday number.
fn days_until(date: NaiveDate, weekday_from_monday: u32) -> i64 {
    ((7 + weekday_from_monday - date.weekday().num_days_from_monday()) % 7) as i64
}

/// Last Monday of May.
pub fn memorial_day(year: i32) -> Result<NaiveDate> {
    let end_of_may = ymd(year, 5, 31)?;
    Ok(end_of_may - Duration::days(end_of_may.weekday().num_days_from_monday() as i64))
}

/// First Monday of September.
pub fn labor_day(year: i32) -> Result<NaiveDate> {
    let first = ymd(year, 9, 1)?;
    Ok(first + Duration::days(days_until(first, 0)))
}

/// Fourth Thursday of November.
pub fn thanksgiving(year: i32) -> Result<NaiveDate> {
    let first = ymd(year, 11, 1)?;
    Ok(first + Duration::days(days_until(first, 3)) + Duration::weeks(3))
}

/// First Saturday of August.
pub fn annual_meeting(year: i32) -> Result<NaiveDate> {
    let first = ymd(year, 8, 1)?;
    Ok(first + Duration::days(days_until(first, 5)))
}

/// The Sunday strictly before `date` (a Sunday maps to the previous Sunday).
pub fn sunday_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64 + 1)
}

/// Start of the week pinned to `holiday` in `year`.
pub fn holiday_week_start(holiday: Holiday, year: i32) -> Result<NaiveDate> {
    Ok(match holiday {
        Holiday::MemorialDay => memorial_day(year)? - Duration::days(8),
        Holiday::IndependenceDay => sunday_before(ymd(year, 7, 4)?),
        Holiday::LaborDay => labor_day(year)? - Duration::days(8),
        Holiday::Thanksgiving => thanksgiving(year)? - Duration::days(4),
        Holiday::Christmas => sunday_before(ymd(year, 12, 25)?),
        Holiday::AnnualMeeting => annual_meeting(year)? - Duration::days(6),
    })
}

/// Named block of the season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonBlock {
    /// Single cold week opening the season.
    EarlyCold,
    /// Spring cool weeks.
    EarlyCool,
    /// Spring warm weeks.
    EarlyWarm,
    /// Hot weeks before the meeting.
    HotBeforeMeeting,
    /// The reserved annual meeting week.
    AnnualMeeting,
    /// Hot weeks after the meeting.
    HotAfterMeeting,
    /// Autumn warm weeks.
    LateWarm,
    /// Autumn cool weeks.
    LateCool,
    /// Closing cold weeks.
    LateCold,
}

impl SeasonBlock {
    /// Kind of the weeks in this block.
    pub fn kind(self) -> WeekKind {
        match self {
            SeasonBlock::EarlyCold | SeasonBlock::LateCold => WeekKind::Cold,
            SeasonBlock::EarlyCool | SeasonBlock::LateCool => WeekKind::Cool,
            SeasonBlock::EarlyWarm | SeasonBlock::LateWarm => WeekKind::Warm,
            SeasonBlock::HotBeforeMeeting
            | SeasonBlock::AnnualMeeting
            | SeasonBlock::HotAfterMeeting => WeekKind::Hot,
        }
    }

    /// Heading used by printouts.
    pub fn label(self) -> &'static str {
        match self {
            SeasonBlock::EarlyCold => "Early Cold Weeks",
            SeasonBlock::EarlyCool => "Early Cool Weeks",
            SeasonBlock::EarlyWarm => "Early Warm Weeks",
            SeasonBlock::HotBeforeMeeting => "Hot Weeks",
            SeasonBlock::AnnualMeeting => "Annual Meeting Week",
            SeasonBlock::HotAfterMeeting => "Hot Weeks (continued)",
            SeasonBlock::LateWarm => "Late Warm Weeks",
            SeasonBlock::LateCool => "Late Cool Weeks",
            SeasonBlock::LateCold => "Late Cold Weeks",
        }
    }
}

/// A block of consecutive weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpan {
    /// Which block.
    pub block: SeasonBlock,
    /// Start of the first week.
    pub start: NaiveDate,
    /// Number of weeks.
    pub weeks: usize,
}

/// Season calendar for a given layout.
#[derive(Debug, Clone)]
pub struct SeasonCalendar<'a> {
    layout: &'a SeasonLayout,
}

impl<'a> SeasonCalendar<'a> {
    /// Creates a calendar over a layout.
    pub fn new(layout: &'a SeasonLayout) -> Self {
        Self { layout }
    }

    /// Hot weeks before the meeting week in `year`.
    pub fn hot_weeks_before_meeting(&self, year: i32) -> usize {
        self.layout.hot_weeks_before_meeting_in(year)
    }

    /// Blocks of `year` in calendar order, meeting week included.
    ///
    /// # Errors
    /// `InvalidConfig` if the layout puts more than [`HOT_WEEKS`] hot weeks
    /// before the meeting, `DateOutOfRange` if the season (which may run into
    /// January of the next year) cannot be represented.
    pub fn blocks(&self, year: i32) -> Result<Vec<BlockSpan>> {
        let before = self.hot_weeks_before_meeting(year);
        let after = HOT_WEEKS.checked_sub(before).ok_or_else(|| {
            ScheduleError::InvalidConfig(vec![ValidationError::new(
                ValidationErrorKind::InvalidSetting,
                Some(year),
                format!("{before} hot weeks before the meeting exceeds {HOT_WEEKS}"),
            )])
        })?;
        year.checked_add(1)
            .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 31))
            .ok_or(ScheduleError::DateOutOfRange { year })?;

        let meeting = holiday_week_start(Holiday::AnnualMeeting, year)?;
        let hot = meeting - weeks(before);
        let early_warm = hot - weeks(SHOULDER_WEEKS);
        let early_cool = early_warm - weeks(SHOULDER_WEEKS);
        let early_cold = early_cool - weeks(EARLY_COLD_WEEKS);
        let late_warm = meeting + weeks(after + 1);
        let late_cool = late_warm + weeks(SHOULDER_WEEKS);
        let late_cold = late_cool + weeks(SHOULDER_WEEKS);

        let span = |block, start, count| BlockSpan {
            block,
            start,
            weeks: count,
        };
        Ok(vec![
            span(SeasonBlock::EarlyCold, early_cold, EARLY_COLD_WEEKS),
            span(SeasonBlock::EarlyCool, early_cool, SHOULDER_WEEKS),
            span(SeasonBlock::EarlyWarm, early_warm, SHOULDER_WEEKS),
            span(SeasonBlock::HotBeforeMeeting, hot, before),
            span(SeasonBlock::AnnualMeeting, meeting, 1),
            span(SeasonBlock::HotAfterMeeting, meeting + weeks(1), after),
            span(SeasonBlock::LateWarm, late_warm, SHOULDER_WEEKS),
            span(SeasonBlock::LateCool, late_cool, SHOULDER_WEEKS),
            span(SeasonBlock::LateCold, late_cold, LATE_COLD_WEEKS),
        ])
    }

    /// Unassigned season for `year`, holiday weeks tagged.
    ///
    /// Fails if a rotating holiday week is not one of the season weeks.
    pub fn skeleton(&self, year: i32) -> Result<YearSchedule> {
        let mut season = Vec::with_capacity(SEASON_WEEKS);
        let mut meeting_position = 0;

        for span in self.blocks(year)? {
            if span.block == SeasonBlock::AnnualMeeting {
                meeting_position = season.len();
                continue;
            }
            for i in 0..span.weeks {
                season.push(AllocatedWeek::new(span.start + weeks(i), span.block.kind()));
            }
        }

        for holiday in Holiday::ROTATING {
            let start = holiday_week_start(holiday, year)?;
            let week = season
                .iter_mut()
                .find(|w| w.start == start)
                .ok_or(ScheduleError::HolidayOutsideSeason {
                    year,
                    holiday,
                    start,
                })?;
            *week = week.clone().with_holiday(holiday);
        }

        let meeting = AllocatedWeek::new(
            holiday_week_start(Holiday::AnnualMeeting, year)?,
            SeasonBlock::AnnualMeeting.kind(),
        )
        .with_holiday(Holiday::AnnualMeeting)
        .with_occupant(Occupant::Everyone);

        Ok(YearSchedule::new(year, season, meeting, meeting_position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HotWeeksException;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_holiday_dates() {
        assert_eq!(memorial_day(2025).unwrap(), date(2025, 5, 26));
        assert_eq!(labor_day(2020).unwrap(), date(2020, 9, 7));
        assert_eq!(labor_day(2025).unwrap(), date(2025, 9, 1));
        assert_eq!(thanksgiving(2025).unwrap(), date(2025, 11, 27));
        assert_eq!(annual_meeting(2021).unwrap(), date(2021, 8, 7));
        assert_eq!(annual_meeting(2025).unwrap(), date(2025, 8, 2));
    }

    #[test]
    fn test_holiday_week_starts() {
        assert_eq!(holiday_week_start(Holiday::MemorialDay, 2020).unwrap(), date(2020, 5, 17));
        assert_eq!(holiday_week_start(Holiday::LaborDay, 2020).unwrap(), date(2020, 8, 30));
        assert_eq!(
            holiday_week_start(Holiday::IndependenceDay, 2020).unwrap(),
            date(2020, 6, 28)
        );
        assert_eq!(holiday_week_start(Holiday::Thanksgiving, 2020).unwrap(), date(2020, 11, 22));
        assert_eq!(holiday_week_start(Holiday::Christmas, 2020).unwrap(), date(2020, 12, 20));
        assert_eq!(holiday_week_start(Holiday::AnnualMeeting, 2021).unwrap(), date(2021, 8, 1));
    }

    #[test]
    fn test_week_starts_are_sundays() {
        for year in 2000..2060 {
            for holiday in Holiday::ROTATING {
                let start = holiday_week_start(holiday, year).unwrap();
                assert_eq!(start.weekday(), Weekday::Sun, "{holiday} {year}");
            }
        }
    }

    #[test]
    fn test_sunday_before_sunday_goes_back_a_week() {
        // July 4, 2027 is a Sunday.
        assert_eq!(sunday_before(date(2027, 7, 4)), date(2027, 6, 27));
        assert_eq!(sunday_before(date(2025, 7, 4)), date(2025, 6, 29));
    }

    #[test]
    fn test_blocks_default_split() {
        let layout = SeasonLayout::default();
        let cal = SeasonCalendar::new(&layout);
        let blocks = cal.blocks(2025).unwrap();
        assert_eq!(blocks.len(), 9);
        assert_eq!(blocks[0].start, date(2025, 3, 16));
        assert_eq!(blocks[3].weeks, 8);
        assert_eq!(blocks[5].weeks, 2);
        assert_eq!(blocks[4].start, date(2025, 7, 27));
        let total: usize = blocks
            .iter()
            .filter(|b| b.block != SeasonBlock::AnnualMeeting)
            .map(|b| b.weeks)
            .sum();
        assert_eq!(total, SEASON_WEEKS);
    }

    #[test]
    fn test_blocks_are_back_to_back() {
        let layout = SeasonLayout::default();
        let cal = SeasonCalendar::new(&layout);
        for year in [2021, 2025, 2030] {
            let blocks = cal.blocks(year).unwrap();
            for pair in blocks.windows(2) {
                assert_eq!(pair[0].start + weeks(pair[0].weeks), pair[1].start, "{year}");
            }
        }
    }

    #[test]
    fn test_skeleton_2025() {
        let layout = SeasonLayout::default();
        let schedule = SeasonCalendar::new(&layout).skeleton(2025).unwrap();
        assert_eq!(schedule.weeks.len(), SEASON_WEEKS);
        assert_eq!(schedule.meeting_position, 19);
        assert_eq!(schedule.meeting.start, date(2025, 7, 27));
        assert_eq!(schedule.meeting.occupant, Occupant::Everyone);
        assert_eq!(schedule.holiday_index(Holiday::MemorialDay), Some(9));
        assert_eq!(schedule.holiday_index(Holiday::IndependenceDay), Some(15));
        assert_eq!(schedule.holiday_index(Holiday::LaborDay), Some(22));
        assert_eq!(schedule.holiday_index(Holiday::Thanksgiving), Some(35));
        assert_eq!(schedule.holiday_index(Holiday::Christmas), Some(39));
        assert!(schedule.weeks.iter().all(|w| w.occupant.is_unassigned()));
    }

    #[test]
    fn test_blocks_reject_oversized_hot_split() {
        let mut layout = SeasonLayout::default();
        layout.exceptions.push(HotWeeksException {
            year: 2030,
            hot_weeks_before_meeting: 11,
        });
        let cal = SeasonCalendar::new(&layout);
        assert!(matches!(cal.blocks(2030), Err(ScheduleError::InvalidConfig(_))));
        assert!(matches!(cal.skeleton(2030), Err(ScheduleError::InvalidConfig(_))));
        assert!(cal.blocks(2031).is_ok());
    }

    #[test]
    fn test_blocks_out_of_date_range() {
        let layout = SeasonLayout::default();
        let cal = SeasonCalendar::new(&layout);
        // The last season of the calendar would end past its final day.
        assert!(matches!(
            cal.blocks(262_143),
            Err(ScheduleError::DateOutOfRange { year: 262_143 })
        ));
        assert!(matches!(
            cal.skeleton(-300_000),
            Err(ScheduleError::DateOutOfRange { year: -300_000 })
        ));
    }

    #[test]
    fn test_christmas_outside_season() {
        // With every hot week before the meeting the late cold block ends too early.
        let layout = SeasonLayout {
            hot_weeks_before_meeting: 10,
            exceptions: Vec::new(),
            ..SeasonLayout::default()
        };
        let err = SeasonCalendar::new(&layout).skeleton(2026).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::HolidayOutsideSeason { year: 2026, holiday: Holiday::Christmas, start }
                if start == date(2026, 12, 20)
        ));
    }

    #[test]
    fn test_skeleton_2021_exception() {
        let layout = SeasonLayout::default();
        let schedule = SeasonCalendar::new(&layout).skeleton(2021).unwrap();
        assert_eq!(schedule.meeting_position, 20);
        let hot: Vec<usize> = (0..SEASON_WEEKS)
            .filter(|&i| schedule.weeks[i].kind == WeekKind::Hot)
            .collect();
        assert_eq!(hot.iter().filter(|&&i| i < schedule.meeting_position).count(), 9);
        assert_eq!(hot.iter().filter(|&&i| i >= schedule.meeting_position).count(), 1);
    }
}
