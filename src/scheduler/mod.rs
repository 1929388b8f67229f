//! Year building, multi-year rebalancing and fairness evaluation.
//!
//! # Builder
//!
//! `YearBuilder` turns one calendar year into a fully assigned season:
//! holiday weeks go to the rotated roster, every other week is placed by
//! deterministic share rules (see `placement`).
//!
//! # Rebalancer
//!
//! `Rebalancer` takes a horizon of built years (typically 20) and swaps
//! same-kind, non-holiday weeks inside single years until every owner's
//! per-index occupancy is as close to the ideal as the constraints allow.
//!
//! # KPI
//!
//! `FairnessReport` summarizes weeks, kinds, holidays and deviation per owner.

mod builder;
mod kpi;
mod placement;
mod rebalance;
mod tally;

pub use builder::YearBuilder;
pub use kpi::{FairnessReport, OwnerFairness};
pub use rebalance::{RebalanceReport, Rebalancer, Swap};
pub use tally::OccupancyTally;
