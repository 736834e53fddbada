//! Classification and output settings.

use std::path::PathBuf;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{HkIpoError, HkIpoResult};

fn default_lookahead_days() -> u32 {
    30
}
fn default_alarm_minutes_before() -> u32 {
    30
}
fn default_listing_time() -> String {
    "09:30".to_string()
}
fn default_application_time() -> String {
    "09:00".to_string()
}
fn default_window_minutes() -> u32 {
    60
}
fn default_timezone() -> String {
    "Asia/Hong_Kong".to_string()
}
fn default_output_file() -> PathBuf {
    PathBuf::from("hkipo.ics")
}
fn default_summary_file() -> PathBuf {
    PathBuf::from("hkipo_summary.txt")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CalendarConfig {
    /// Upcoming events further out than this are dropped
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,

    /// Lead time for reminders on same-day events
    #[serde(default = "default_alarm_minutes_before")]
    pub alarm_minutes_before: u32,

    /// Local start time (HH:MM) of a same-day listing event
    #[serde(default = "default_listing_time")]
    pub listing_time: String,

    /// Local start time (HH:MM) of a same-day application event
    #[serde(default = "default_application_time")]
    pub application_time: String,

    /// Length of same-day (timed) events
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,

    /// IANA zone the upstream dates are expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    #[serde(default = "default_summary_file")]
    pub summary_file: PathBuf,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            lookahead_days: default_lookahead_days(),
            alarm_minutes_before: default_alarm_minutes_before(),
            listing_time: default_listing_time(),
            application_time: default_application_time(),
            window_minutes: default_window_minutes(),
            timezone: default_timezone(),
            output_file: default_output_file(),
            summary_file: default_summary_file(),
        }
    }
}

impl CalendarConfig {
    pub fn tz(&self) -> HkIpoResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| HkIpoError::Config(format!("Invalid timezone '{}': {e}", self.timezone)))
    }

    pub fn listing_start(&self) -> HkIpoResult<NaiveTime> {
        parse_clock("listing_time", &self.listing_time)
    }

    pub fn application_start(&self) -> HkIpoResult<NaiveTime> {
        parse_clock("application_time", &self.application_time)
    }
}

fn parse_clock(field: &str, value: &str) -> HkIpoResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        HkIpoError::Config(format!("Invalid {field} '{value}'. Expected HH:MM"))
    })
}
