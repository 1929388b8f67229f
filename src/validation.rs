//! Structural checks for configurations and built years.
//!
//! Both checkers collect every problem they find instead of stopping at the
//! first one. Detects:
//! - Duplicate owners and roster entries naming unknown owners
//! - Holiday positions that are missing, duplicated or off the roster
//! - Quotas that do not fit in the season
//! - Hot-week splits that push a holiday week out of the season
//! - Years breaking the share invariants (quota, kinds, spacing)
//! - Broken calendar walks and a meeting week not held by everyone

use chrono::Duration;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::config::{ScheduleConfig, SeasonLayout};
use crate::models::calendar::HOT_WEEKS;
use crate::models::{
    circular_distance, Holiday, Occupant, SeasonCalendar, SharePercent, WeekKind, YearSchedule,
    SEASON_WEEKS,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Year the problem was found in, for year checks.
    pub year: Option<i32>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two owners share the same identifier.
    DuplicateOwner,
    /// A roster entry or week occupant is not a configured owner.
    UnknownOwner,
    /// A configured owner never appears on the roster.
    MissingFromRoster,
    /// A holiday position is missing, duplicated or outside the roster.
    HolidayPosition,
    /// A numeric setting is out of range.
    InvalidSetting,
    /// An owner holds the wrong number of weeks.
    Quota,
    /// An owner's weeks have the wrong mix of kinds.
    KindMix,
    /// Two weeks of a 10% owner are too close together.
    Spacing,
    /// The calendar walk has a gap or an overlap.
    Contiguity,
    /// The meeting week is not held by everyone.
    MeetingOccupant,
    /// A rotating holiday is not tagged exactly once.
    HolidayTag,
    /// The season does not have the expected number of weeks.
    SeasonLength,
}

impl ValidationError {
    /// Creates an error.
    pub fn new(kind: ValidationErrorKind, year: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            kind,
            year,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{year}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the static tables.
///
/// Checks:
/// 1. No duplicate owner identifiers
/// 2. Every roster entry is a configured owner
/// 3. Every owner appears on the roster
/// 4. Each rotating holiday has exactly one position, inside the roster
/// 5. The yearly quotas fit in the season
/// 6. Hot-week splits, skip index and spacing are within the season
/// 7. The regular hot-week split and every exception year put each rotating
///    holiday on a season week
pub fn validate_config(config: &ScheduleConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let config_error = |kind, message: String| ValidationError::new(kind, None, message);

    let mut ids = HashSet::new();
    for owner in &config.owners {
        if !ids.insert(owner.id.as_str()) {
            errors.push(config_error(
                ValidationErrorKind::DuplicateOwner,
                format!("duplicate owner `{}`", owner.id),
            ));
        }
    }

    let roster = &config.roster;
    if roster.entries.is_empty() {
        errors.push(config_error(
            ValidationErrorKind::InvalidSetting,
            "holiday roster is empty".to_string(),
        ));
    }
    for entry in &roster.entries {
        if !ids.contains(entry.as_str()) {
            errors.push(config_error(
                ValidationErrorKind::UnknownOwner,
                format!("roster entry `{entry}` is not an owner"),
            ));
        }
    }
    let listed: HashSet<&str> = roster.entries.iter().map(String::as_str).collect();
    for owner in &config.owners {
        if !listed.contains(owner.id.as_str()) {
            errors.push(config_error(
                ValidationErrorKind::MissingFromRoster,
                format!("owner `{}` never appears on the holiday roster", owner.id),
            ));
        }
    }

    let mut seen = HashSet::new();
    for p in &roster.positions {
        if !p.holiday.is_rotating() {
            errors.push(config_error(
                ValidationErrorKind::HolidayPosition,
                format!("{} does not rotate", p.holiday),
            ));
        }
        if !seen.insert(p.holiday) {
            errors.push(config_error(
                ValidationErrorKind::HolidayPosition,
                format!("{} has more than one roster position", p.holiday),
            ));
        }
        if p.position >= roster.entries.len() {
            errors.push(config_error(
                ValidationErrorKind::HolidayPosition,
                format!(
                    "{} position {} is outside the {}-entry roster",
                    p.holiday,
                    p.position,
                    roster.entries.len()
                ),
            ));
        }
    }
    for holiday in Holiday::ROTATING {
        if !seen.contains(&holiday) {
            errors.push(config_error(
                ValidationErrorKind::HolidayPosition,
                format!("{holiday} has no roster position"),
            ));
        }
    }

    let demand: usize = config.owners.iter().map(|o| o.share.weeks_per_year()).sum();
    if demand > SEASON_WEEKS {
        errors.push(config_error(
            ValidationErrorKind::InvalidSetting,
            format!("owners need {demand} weeks but the season has {SEASON_WEEKS}"),
        ));
    }

    let season = &config.season;
    if season.hot_weeks_before_meeting > HOT_WEEKS {
        errors.push(config_error(
            ValidationErrorKind::InvalidSetting,
            format!(
                "hot_weeks_before_meeting {} exceeds {HOT_WEEKS}",
                season.hot_weeks_before_meeting
            ),
        ));
    }
    for e in &season.exceptions {
        if e.hot_weeks_before_meeting > HOT_WEEKS {
            errors.push(config_error(
                ValidationErrorKind::InvalidSetting,
                format!(
                    "{} exception of {} hot weeks exceeds {HOT_WEEKS}",
                    e.year, e.hot_weeks_before_meeting
                ),
            ));
        }
    }
    // Only the weekday of August 1 moves the holidays against the season
    // blocks; 28 consecutive years cover all seven.
    if season.hot_weeks_before_meeting <= HOT_WEEKS {
        let regular = SeasonLayout {
            exceptions: Vec::new(),
            ..season.clone()
        };
        let calendar = SeasonCalendar::new(&regular);
        if let Some(e) = (2001..2029).find_map(|y| calendar.skeleton(y).err()) {
            errors.push(config_error(
                ValidationErrorKind::InvalidSetting,
                format!(
                    "hot_weeks_before_meeting {} leaves holidays outside the season: {e}",
                    season.hot_weeks_before_meeting
                ),
            ));
        }
    }
    let calendar = SeasonCalendar::new(season);
    for exception in season
        .exceptions
        .iter()
        .filter(|e| e.hot_weeks_before_meeting <= HOT_WEEKS)
    {
        if let Err(e) = calendar.skeleton(exception.year) {
            errors.push(config_error(
                ValidationErrorKind::InvalidSetting,
                format!(
                    "{} exception of {} hot weeks cannot be laid out: {e}",
                    exception.year, exception.hot_weeks_before_meeting
                ),
            ));
        }
    }
    if season.five_percent_skip_index >= SEASON_WEEKS {
        errors.push(config_error(
            ValidationErrorKind::InvalidSetting,
            format!(
                "five_percent_skip_index {} is outside the season",
                season.five_percent_skip_index
            ),
        ));
    }
    if season.min_spacing > SEASON_WEEKS / 4 {
        errors.push(config_error(
            ValidationErrorKind::InvalidSetting,
            format!(
                "min_spacing {} cannot fit four weeks on a {SEASON_WEEKS}-week ring",
                season.min_spacing
            ),
        ));
    }

    finish(errors)
}

/// Validates one built year against the share invariants.
///
/// Checks:
/// 1. The season has 40 weeks and each rotating holiday is tagged once
/// 2. The meeting week is held by everyone
/// 3. Every occupant is a configured owner
/// 4. Every owner holds exactly their quota
/// 5. 10% owners hold one week of each kind, 5% owners two opposite kinds
/// 6. 10% owners' weeks respect the minimum ring spacing
/// 7. The calendar walk is contiguous (Monday holiday weeks overlap by a day)
pub fn validate_year(schedule: &YearSchedule, config: &ScheduleConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let year = schedule.year;
    let mut push = |kind, message: String| {
        errors.push(ValidationError::new(kind, Some(year), message));
    };

    if schedule.len() != SEASON_WEEKS {
        push(
            ValidationErrorKind::SeasonLength,
            format!("season has {} weeks, expected {SEASON_WEEKS}", schedule.len()),
        );
    }
    for holiday in Holiday::ROTATING {
        let tagged = schedule
            .weeks
            .iter()
            .filter(|w| w.holiday == Some(holiday))
            .count();
        if tagged != 1 {
            push(
                ValidationErrorKind::HolidayTag,
                format!("{holiday} is tagged on {tagged} weeks"),
            );
        }
    }

    if schedule.meeting.occupant != Occupant::Everyone {
        push(
            ValidationErrorKind::MeetingOccupant,
            "annual meeting week is not held by everyone".to_string(),
        );
    }

    let shares: HashMap<&str, SharePercent> = config
        .owners
        .iter()
        .map(|o| (o.id.as_str(), o.share))
        .collect();
    for (index, week) in schedule.weeks.iter().enumerate() {
        match &week.occupant {
            Occupant::Owner(id) if !shares.contains_key(id.as_str()) => push(
                ValidationErrorKind::UnknownOwner,
                format!("week {index} is held by unknown owner `{id}`"),
            ),
            Occupant::Everyone => push(
                ValidationErrorKind::UnknownOwner,
                format!("season week {index} is held by everyone"),
            ),
            _ => {}
        }
    }

    for owner in &config.owners {
        let id = owner.id.as_str();
        let kinds = schedule.kinds_of(id);
        let quota = owner.share.weeks_per_year();
        if kinds.len() != quota {
            push(
                ValidationErrorKind::Quota,
                format!("{id} holds {} weeks, expected {quota}", kinds.len()),
            );
            continue;
        }
        match owner.share {
            SharePercent::Ten => {
                if kinds != WeekKind::ALL {
                    push(
                        ValidationErrorKind::KindMix,
                        format!("{id} does not hold one week of each kind: {kinds:?}"),
                    );
                }
                if let Some((a, b)) = schedule.spacing_violation(id, config.season.min_spacing) {
                    push(
                        ValidationErrorKind::Spacing,
                        format!(
                            "{id} weeks {a} and {b} are {} apart, minimum {}",
                            circular_distance(a, b, schedule.len()),
                            config.season.min_spacing
                        ),
                    );
                }
            }
            SharePercent::Five => {
                if kinds[0].opposite() != kinds[1] {
                    push(
                        ValidationErrorKind::KindMix,
                        format!("{id} holds {} and {}, not opposite kinds", kinds[0], kinds[1]),
                    );
                }
            }
        }
    }

    let walk: Vec<_> = schedule.calendar().collect();
    for pair in walk.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let overlap = prev.holiday.is_some_and(Holiday::is_monday_anchored);
        let expected = if overlap {
            next.start + Duration::days(1)
        } else {
            next.start
        };
        if prev.end != expected {
            push(
                ValidationErrorKind::Contiguity,
                format!("week ending {} is followed by week starting {}", prev.end, next.start),
            );
        }
    }

    finish(errors)
}

/// Validates every year, collecting all problems.
pub fn validate_schedule(years: &[YearSchedule], config: &ScheduleConfig) -> ValidationResult {
    let errors: Vec<ValidationError> = years
        .iter()
        .filter_map(|y| validate_year(y, config).err())
        .flatten()
        .collect();
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HolidayPosition, HotWeeksException};
    use crate::models::Owner;
    use crate::scheduler::YearBuilder;

    fn built(year: i32) -> (ScheduleConfig, YearSchedule) {
        let config = ScheduleConfig::default();
        let schedule = YearBuilder::new(&config).build(year).unwrap();
        (config, schedule)
    }

    fn has_kind(result: ValidationResult, kind: ValidationErrorKind) -> bool {
        result.unwrap_err().iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_default_config_passes() {
        assert!(validate_config(&ScheduleConfig::default()).is_ok());
    }

    #[test]
    fn test_duplicate_owner() {
        let mut config = ScheduleConfig::default();
        config.owners.push(Owner::five_percent("joe"));
        assert!(has_kind(validate_config(&config), ValidationErrorKind::DuplicateOwner));
    }

    #[test]
    fn test_owner_missing_from_roster() {
        let mut config = ScheduleConfig::default();
        config.roster.entries.retain(|e| e != "will");
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MissingFromRoster && e.message.contains("will")));
    }

    #[test]
    fn test_holiday_positions() {
        let mut config = ScheduleConfig::default();
        config.roster.positions.pop();
        config.roster.positions.push(HolidayPosition {
            holiday: Holiday::MemorialDay,
            position: 25,
        });
        let errors = validate_config(&config).unwrap_err();
        let positions: Vec<_> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::HolidayPosition)
            .collect();
        // duplicate Memorial Day, out of range, Christmas missing
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn test_settings_out_of_range() {
        let mut config = ScheduleConfig::default();
        config.season.exceptions.push(HotWeeksException {
            year: 2030,
            hot_weeks_before_meeting: 11,
        });
        config.season.min_spacing = 11;
        config.owners.push(Owner::ten_percent("extra"));
        config.roster.entries.push("extra".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidSetting)
                .count(),
            3
        );
    }

    #[test]
    fn test_hot_split_that_drops_christmas() {
        let mut config = ScheduleConfig::default();
        config.season.hot_weeks_before_meeting = 10;
        config.season.exceptions.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidSetting && e.message.contains("Christmas")));
        assert!(matches!(
            config.validated(),
            Err(crate::ScheduleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_exception_that_drops_christmas() {
        let mut config = ScheduleConfig::default();
        config.season.exceptions.push(HotWeeksException {
            year: 2026,
            hot_weeks_before_meeting: 10,
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("2026 exception"));
    }

    #[test]
    fn test_built_years_pass() {
        let config = ScheduleConfig::default();
        let years = YearBuilder::new(&config).build_range(2020, 12).unwrap();
        assert!(validate_schedule(&years, &config).is_ok());
    }

    #[test]
    fn test_meeting_occupant() {
        let (config, mut schedule) = built(2025);
        schedule.meeting.occupant = Occupant::Unassigned;
        assert!(has_kind(
            validate_year(&schedule, &config),
            ValidationErrorKind::MeetingOccupant
        ));
    }

    #[test]
    fn test_unknown_occupant() {
        let (config, mut schedule) = built(2025);
        schedule.weeks[3].occupant = Occupant::Owner("mallory".into());
        let errors = validate_year(&schedule, &config).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::UnknownOwner));
        // richard lost week 3
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::Quota && e.message.contains("richard")));
        assert!(errors.iter().all(|e| e.year == Some(2025)));
    }

    #[test]
    fn test_kind_mix_after_cross_kind_swap() {
        let (config, mut schedule) = built(2025);
        // frank_may's cold week 0 against hayley's cool week 1
        assert!(schedule.weeks[1].is_owned_by("hayley"));
        assert!(schedule.weeks[0].is_owned_by("frank_may"));
        schedule.swap_occupants(0, 1);
        assert!(has_kind(validate_year(&schedule, &config), ValidationErrorKind::KindMix));
    }

    #[test]
    fn test_spacing() {
        let (config, mut schedule) = built(2025);
        // frank_may holds 0, 9, 19, 29; move the week at 19 next to 9
        let neighbour = 10;
        assert!(schedule.weeks[neighbour].is_owned_by("eddie"));
        schedule.swap_occupants(19, neighbour);
        assert!(has_kind(validate_year(&schedule, &config), ValidationErrorKind::Spacing));
    }

    #[test]
    fn test_contiguity() {
        let (config, mut schedule) = built(2025);
        schedule.weeks[5].end = schedule.weeks[5].end + Duration::days(2);
        let errors = validate_year(&schedule, &config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::Contiguity);
    }

    #[test]
    fn test_display_includes_year() {
        let e = ValidationError::new(ValidationErrorKind::Quota, Some(2030), "joe holds 3 weeks");
        assert_eq!(e.to_string(), "2030: joe holds 3 weeks");
    }
}
