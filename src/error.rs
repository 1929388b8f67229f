//! Error types for schedule construction and configuration.
//!
//! Every variant here is fatal: it means the static tables (owners, holiday
//! roster, season exceptions) are inconsistent for the year being built, or
//! the configuration itself is malformed. The rebalancer never returns an
//! error; a swap it cannot make is simply skipped.

use chrono::NaiveDate;

use crate::models::Holiday;
use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Error type for all fallible operations in this crate.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// A share percentage other than 5 or 10 was supplied.
    #[error("unsupported share percentage {percent}%, expected 5 or 10")]
    UnsupportedShare {
        /// The rejected percentage.
        percent: u8,
    },

    /// A calendar date could not be represented for the given year.
    #[error("year {year} is outside the supported calendar range")]
    DateOutOfRange {
        /// The offending year.
        year: i32,
    },

    /// A rotating holiday week does not start on any week of the season.
    #[error("{year}: {holiday} week starting {start} is outside the season")]
    HolidayOutsideSeason {
        /// Year being built.
        year: i32,
        /// The holiday whose week could not be located.
        holiday: Holiday,
        /// Computed start of the holiday week.
        start: NaiveDate,
    },

    /// A week was assigned twice.
    #[error("{year}: week {index} is already held by {holder}, cannot assign to {owner}")]
    SlotTaken {
        /// Year being built.
        year: i32,
        /// Season week index.
        index: usize,
        /// Current holder of the week.
        holder: String,
        /// Owner that was being placed.
        owner: String,
    },

    /// An owner would receive more weeks than their share allows.
    #[error("{year}: {owner} would exceed the yearly quota of {quota} weeks at week {index}")]
    QuotaExceeded {
        /// Year being built.
        year: i32,
        /// Owner being placed.
        owner: String,
        /// Season week index of the rejected placement.
        index: usize,
        /// Allowed weeks per year.
        quota: usize,
    },

    /// A placement rule ran out of candidate weeks.
    #[error("{year}: no legal {rule} placement for {owner} seeded from week {index}")]
    PlacementExhausted {
        /// Year being built.
        year: i32,
        /// Owner being placed.
        owner: String,
        /// Season week index the search started from.
        index: usize,
        /// Which placement rule failed.
        rule: &'static str,
    },

    /// A placement rule was seeded from a week nobody holds.
    #[error("{year}: {rule} placement seeded from week {index}, which has no owner")]
    UnownedSeed {
        /// Year being built.
        year: i32,
        /// Season week index of the seed.
        index: usize,
        /// Which placement rule was asked to run.
        rule: &'static str,
    },

    /// A week was referenced by an owner identifier not present in the configuration.
    #[error("{year}: unknown owner `{owner}` at week {index}")]
    UnknownOwner {
        /// Year being built.
        year: i32,
        /// The unknown identifier.
        owner: String,
        /// Season week index.
        index: usize,
    },

    /// The finished year breaks one or more schedule invariants.
    #[error("{year}: schedule invariants violated: {}", join_messages(.errors))]
    InvariantViolated {
        /// Year that was built.
        year: i32,
        /// Every violation found.
        errors: Vec<ValidationError>,
    },

    /// The configuration tables are inconsistent.
    #[error("invalid configuration: {}", join_messages(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
