//! Schedule domain models.
//!
//! Provides the data types for one year's allocation of a co-owned
//! property and the calendar arithmetic that lays out its season.
//!
//! # Domain Mappings
//!
//! | share-schedule | Meaning |
//! |----------------|---------|
//! | Owner | Co-owner holding a 5% or 10% share |
//! | WeekKind | Seasonal category (cold, cool, warm, hot) |
//! | AllocatedWeek | One Sunday-start week and its occupant |
//! | YearSchedule | The 40-week season of one year plus the meeting week |

pub mod calendar;
mod holiday;
mod owner;
mod schedule;
mod week;

pub use calendar::{BlockSpan, SeasonBlock, SeasonCalendar, SEASON_WEEKS};
pub use holiday::Holiday;
pub use owner::{title_case, Owner, SharePercent};
pub use schedule::{circular_distance, YearSchedule};
pub use week::{AllocatedWeek, Occupant, WeekKind};
