//! Core of hkipo: fetch the Hong Kong IPO snapshot, classify each company's
//! dates against today and emit a consolidated calendar.
//!
//! - `client` fetches raw rows from the upstream, with retries
//! - `record` turns raw rows into typed [`IpoRecord`]s
//! - `engine` derives categories, reminder tiers and consolidated [`CalendarEvent`]s
//! - `emit` renders the events to ICS and a plain-text summary

pub mod category;
pub mod client;
pub mod config;
pub mod emit;
pub mod engine;
pub mod error;
pub mod event;
pub mod ics;
pub mod record;
pub mod summary;

pub use category::{DateKind, EventCategory, Milestone, ReminderTier, Timing};
pub use event::{CalendarEvent, EventEntry, EventTime, Reminder};
pub use record::{IpoRecord, Market, RawIpoRecord};
