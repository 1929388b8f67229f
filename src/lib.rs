//! Week rotation for a co-owned vacation property.
//!
//! Allocates the 40 ownable weeks of each season among owners holding 10%
//! or 5% shares, rotates the holiday weeks through a yearly roster, and
//! rebalances a multi-year horizon so every owner holds each week of the
//! season about as often as their share entitles them to.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Owner`, `WeekKind`, `AllocatedWeek`,
//!   `YearSchedule`) and the holiday/season calendar arithmetic
//! - **`config`**: Owner, roster, season and rebalance tables (TOML)
//! - **`scheduler`**: `YearBuilder`, `Rebalancer`, `FairnessReport`
//! - **`validation`**: Configuration and year invariant checks
//! - **`events`**: All-day calendar event shaping
//!
//! # Example
//!
//! ```
//! use share_schedule::config::ScheduleConfig;
//! use share_schedule::scheduler::{FairnessReport, Rebalancer, YearBuilder};
//!
//! let config = ScheduleConfig::default();
//! let mut years = YearBuilder::new(&config).build_range(2025, 20).unwrap();
//! let report = Rebalancer::new(&config).rebalance(&mut years);
//!
//! let fairness = FairnessReport::calculate(&config, &years);
//! assert_eq!(fairness.objective, report.objective_after);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::ScheduleConfig;
pub use error::{Result, ScheduleError};
