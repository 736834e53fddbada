//! ICS file generation.

use chrono::{DateTime, Utc};
use icalendar::{Alarm, Calendar, Component, EventLike, Property, Trigger, ValueType};

use crate::category::ReminderTier;
use crate::error::{HkIpoError, HkIpoResult};
use crate::event::{CalendarEvent, EventTime};

const CALENDAR_NAME: &str = "Hong Kong IPO";

/// Generate one VCALENDAR holding every event.
///
/// `stamp` becomes every DTSTAMP, so identical input yields identical output.
pub fn generate_ics(events: &[CalendarEvent], stamp: DateTime<Utc>) -> HkIpoResult<String> {
    let mut cal = Calendar::new();
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();

    for event in events {
        cal.push(to_ics_event(event, &dtstamp)?);
    }

    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn to_ics_event(event: &CalendarEvent, dtstamp: &str) -> HkIpoResult<icalendar::Event> {
    if event.entries.is_empty() {
        return Err(HkIpoError::IcsGenerate(format!(
            "Event {} has no companies",
            event.uid()
        )));
    }

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid());
    ics_event.summary(&event.title);
    ics_event.add_property("DTSTAMP", dtstamp);

    add_datetime_property(&mut ics_event, "DTSTART", &event.start);
    add_datetime_property(&mut ics_event, "DTEND", &event.end);

    ics_event.description(&event.body);
    ics_event.append_multi_property(Property::new("CATEGORIES", event.category.to_string()));
    ics_event.append_multi_property(Property::new("CATEGORIES", CALENDAR_NAME));

    // All-day entries are informational and should not block the day
    if event.start.is_all_day() {
        ics_event.add_property("TRANSP", "TRANSPARENT");
    }

    let alarm_text = match event.tier {
        Some(ReminderTier::OneDayBefore) => format!("Tomorrow: {}", event.title),
        _ => format!("Today: {}", event.title),
    };

    for reminder in &event.reminders {
        let trigger = if reminder.minutes >= 0 {
            Trigger::before_start(chrono::Duration::minutes(reminder.minutes))
        } else {
            Trigger::after_start(chrono::Duration::minutes(-reminder.minutes))
        };
        ics_event.alarm(Alarm::display(&alarm_text, trigger));
    }

    Ok(ics_event.done())
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with HKIPO and name the calendar
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove DTSTAMP and UID inside VALARM sections (not required by RFC 5545)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:HKIPO\r\n");
            result.push_str(&format!("X-WR-CALNAME:{CALENDAR_NAME}\r\n"));
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Add a datetime property with proper formatting based on EventTime variant
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::DateTimeZoned { datetime, tzid } => {
            let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", tzid);
            ics_event.append_property(prop);
        }
    }
}
