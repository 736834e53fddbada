//! Calendar events produced by the classification engine.
//!
//! These are plain data: the engine builds them, the emitter serializes them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::category::{EventCategory, Milestone, ReminderTier};
use crate::record::Market;

/// One consolidated calendar entry for a (date, category) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub category: EventCategory,
    pub title: String,
    /// Human-readable description, one block per entry
    pub body: String,
    /// Contributing companies, ordered by stock code
    pub entries: Vec<EventEntry>,
    pub tier: Option<ReminderTier>,
    pub reminders: Vec<Reminder>,
    pub start: EventTime,
    pub end: EventTime,
}

impl CalendarEvent {
    pub fn is_consolidated(&self) -> bool {
        self.entries.len() > 1
    }

    /// Deterministic identifier, stable across runs for the same day and category.
    pub fn uid(&self) -> String {
        format!("{}-{}@hkipo", self.date.format("%Y%m%d"), self.category)
    }
}

/// A single company's contribution to a [`CalendarEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    /// Index of the source record in the classified input
    pub record: usize,
    pub stock_code: String,
    pub name: String,
    pub market: Option<Market>,
    pub milestones: Vec<Milestone>,
    pub price_range: Option<String>,
}

impl std::fmt::Display for EventEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.stock_code)?;
        if let Some(market) = &self.market {
            write!(f, " [{market}]")?;
        }
        Ok(())
    }
}

/// A reminder/alarm for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Minutes before the event start to trigger (negative: after start)
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    Date(NaiveDate),
    /// Wall-clock time in an IANA zone
    DateTimeZoned {
        datetime: NaiveDateTime,
        tzid: String,
    },
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTimeZoned { datetime, tzid } => {
                write!(f, "{} ({})", datetime.format("%Y-%m-%d %H:%M"), tzid)
            }
        }
    }
}
