//! All-day calendar events for allocated weeks.
//!
//! Shapes each week into the record a calendar client needs: a summary
//! naming the occupant, an exclusive date range in the requested week
//! format, the property location and a short description. Talking to any
//! calendar service is left to the caller.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ScheduleConfig;
use crate::models::{AllocatedWeek, Occupant, YearSchedule};

/// How a Sunday-start week is laid out on a calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekFormat {
    /// Sunday through Saturday. Monday-holiday weeks run through Monday.
    SundaySaturday,
    /// Monday through Sunday, always seven days.
    #[default]
    MondaySunday,
}

impl WeekFormat {
    /// Event dates for a week, end exclusive.
    pub fn dates(self, week: &AllocatedWeek) -> (NaiveDate, NaiveDate) {
        match self {
            WeekFormat::SundaySaturday => (week.start, week.end),
            WeekFormat::MondaySunday => {
                let start = week.start + Duration::days(1);
                (start, start + Duration::days(7))
            }
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            WeekFormat::SundaySaturday => "sunday-saturday",
            WeekFormat::MondaySunday => "monday-sunday",
        }
    }
}

impl fmt::Display for WeekFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sunday-saturday" => Ok(WeekFormat::SundaySaturday),
            "monday-sunday" => Ok(WeekFormat::MondaySunday),
            other => Err(format!(
                "unknown week format `{other}`, expected sunday-saturday or monday-sunday"
            )),
        }
    }
}

/// One all-day event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Occupant as shown to people.
    pub summary: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Day after the last day.
    pub end_date: NaiveDate,
    /// Property location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Holiday and week kind.
    pub description: String,
}

/// Turns weeks into calendar events.
#[derive(Debug, Clone)]
pub struct EventExporter<'a> {
    config: &'a ScheduleConfig,
    format: WeekFormat,
}

impl<'a> EventExporter<'a> {
    /// Creates an exporter with the default week format.
    pub fn new(config: &'a ScheduleConfig) -> Self {
        Self {
            config,
            format: WeekFormat::default(),
        }
    }

    /// Sets the week format.
    pub fn with_format(mut self, format: WeekFormat) -> Self {
        self.format = format;
        self
    }

    /// Summary line for an occupant.
    pub fn summary(&self, occupant: &Occupant) -> String {
        match occupant {
            Occupant::Unassigned => "No Owner".to_string(),
            Occupant::Everyone => "Everyone".to_string(),
            Occupant::Owner(id) => self.config.display_name(id),
        }
    }

    /// Event for one week.
    pub fn event(&self, week: &AllocatedWeek) -> CalendarEvent {
        let (start_date, end_date) = self.format.dates(week);
        let description = match week.holiday {
            Some(holiday) => format!("Holiday: {holiday}\nWeek type: {}", week.kind),
            None => format!("Week type: {}", week.kind),
        };
        CalendarEvent {
            summary: self.summary(&week.occupant),
            start_date,
            end_date,
            location: self.config.location.clone(),
            description,
        }
    }

    /// Events for every week of a year, meeting week included, in date order.
    pub fn year(&self, schedule: &YearSchedule) -> Vec<CalendarEvent> {
        schedule.calendar().map(|w| self.event(w)).collect()
    }
}
