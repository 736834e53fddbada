//! Event categories and reminder tiers.
//!
//! A category is a closed pair of [`DateKind`] and [`Timing`]; adding a new
//! kind of date means adding a variant here and handling it in every match.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which IPO date an event is about.
///
/// Variant order is the tie-break order for events on the same day:
/// listings sort before applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DateKind {
    Listing,
    Application,
}

impl DateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateKind::Listing => "LISTING",
            DateKind::Application => "APPLICATION",
        }
    }
}

/// Position of a date relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timing {
    Past,
    Today,
    Upcoming,
}

impl Timing {
    pub fn of(date: NaiveDate, today: NaiveDate) -> Self {
        match date.cmp(&today) {
            std::cmp::Ordering::Less => Timing::Past,
            std::cmp::Ordering::Equal => Timing::Today,
            std::cmp::Ordering::Greater => Timing::Upcoming,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timing::Past => "PAST",
            Timing::Today => "TODAY",
            Timing::Upcoming => "UPCOMING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventCategory {
    pub kind: DateKind,
    pub timing: Timing,
}

impl EventCategory {
    pub fn new(kind: DateKind, timing: Timing) -> Self {
        EventCategory { kind, timing }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.timing.as_str(), self.kind.as_str())
    }
}

/// The date field of a record that produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Milestone {
    ApplyStart,
    ApplyEnd,
    Listing,
}

impl Milestone {
    pub fn kind(&self) -> DateKind {
        match self {
            Milestone::ApplyStart | Milestone::ApplyEnd => DateKind::Application,
            Milestone::Listing => DateKind::Listing,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Milestone::ApplyStart => "Application opens",
            Milestone::ApplyEnd => "Application closes",
            Milestone::Listing => "Listing",
        }
    }
}

/// How far ahead of an event its reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderTier {
    OneDayBefore,
    LeadTime { minutes: u32 },
    /// The lead-time moment had already passed when the calendar was generated.
    Immediate,
}

impl fmt::Display for ReminderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderTier::OneDayBefore => write!(f, "1 day before"),
            ReminderTier::LeadTime { minutes } => write!(f, "{minutes} min before"),
            ReminderTier::Immediate => write!(f, "immediately"),
        }
    }
}
