//! Owner model.
//!
//! Owners hold either a 10% or a 5% share of the property. The share fixes
//! how many weeks an owner receives each year and how the placement rules
//! and the rebalancer treat them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScheduleError;

/// Ownership share. Exhaustive: no other percentages exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SharePercent {
    /// 5% share: two weeks per year, in opposite kinds.
    Five,
    /// 10% share: four weeks per year, one of each kind.
    Ten,
}

impl SharePercent {
    /// Share as a whole percentage.
    pub fn percent(self) -> u8 {
        match self {
            SharePercent::Five => 5,
            SharePercent::Ten => 10,
        }
    }

    /// Weeks owned per year.
    pub fn weeks_per_year(self) -> usize {
        match self {
            SharePercent::Five => 2,
            SharePercent::Ten => 4,
        }
    }
}

impl TryFrom<u8> for SharePercent {
    type Error = ScheduleError;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        match percent {
            5 => Ok(SharePercent::Five),
            10 => Ok(SharePercent::Ten),
            _ => Err(ScheduleError::UnsupportedShare { percent }),
        }
    }
}

impl From<SharePercent> for u8 {
    fn from(share: SharePercent) -> Self {
        share.percent()
    }
}

impl fmt::Display for SharePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// A co-owner of the property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Owner {
    /// Unique owner identifier (e.g. `frank_may`).
    pub id: String,
    /// Ownership share.
    pub share: SharePercent,
    /// Name shown to people. Derived from `id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Owner {
    /// Creates an owner.
    pub fn new(id: impl Into<String>, share: SharePercent) -> Self {
        Self {
            id: id.into(),
            share,
            display_name: None,
        }
    }

    /// Creates a 10% owner.
    pub fn ten_percent(id: impl Into<String>) -> Self {
        Self::new(id, SharePercent::Ten)
    }

    /// Creates a 5% owner.
    pub fn five_percent(id: impl Into<String>) -> Self {
        Self::new(id, SharePercent::Five)
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name shown to people.
    pub fn display_name(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => title_case(&self.id),
        }
    }
}

/// Turns an identifier like `frank_may` into `Frank May`.
pub fn title_case(id: &str) -> String {
    id.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
