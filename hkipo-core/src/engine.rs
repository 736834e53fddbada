//! Classification and consolidation of IPO dates into calendar events.
//!
//! Every present date of every record becomes a (date, category) candidate.
//! Upcoming candidates past the lookahead horizon are dropped, past ones are
//! always kept. Candidates sharing a key collapse into one [`CalendarEvent`].

use std::collections::BTreeMap;

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::category::{DateKind, EventCategory, ReminderTier, Timing};
use crate::config::CalendarConfig;
use crate::error::HkIpoResult;
use crate::event::{CalendarEvent, EventEntry, EventTime, Reminder};
use crate::record::IpoRecord;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parameters of a classification run.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub lookahead_days: u32,
    pub alarm_minutes_before: u32,
    pub listing_time: NaiveTime,
    pub application_time: NaiveTime,
    /// Length of same-day events, which are timed rather than all-day
    pub window_minutes: u32,
    pub tzid: String,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        ClassifyOptions {
            lookahead_days: 30,
            alarm_minutes_before: 30,
            listing_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN),
            application_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            window_minutes: 60,
            tzid: "Asia/Hong_Kong".to_string(),
        }
    }
}

impl ClassifyOptions {
    pub fn from_config(config: &CalendarConfig) -> HkIpoResult<Self> {
        Ok(ClassifyOptions {
            lookahead_days: config.lookahead_days,
            alarm_minutes_before: config.alarm_minutes_before,
            listing_time: config.listing_start()?,
            application_time: config.application_start()?,
            window_minutes: config.window_minutes,
            tzid: config.tz()?.name().to_string(),
        })
    }

    fn start_time(&self, kind: DateKind) -> NaiveTime {
        match kind {
            DateKind::Listing => self.listing_time,
            DateKind::Application => self.application_time,
        }
    }
}

/// Classify `records` as seen at local wall-clock time `now`.
///
/// Output is ordered by date, then listings before applications, and holds
/// at most one event per (date, category).
pub fn classify(
    records: &[IpoRecord],
    now: NaiveDateTime,
    opts: &ClassifyOptions,
) -> Vec<CalendarEvent> {
    let today = now.date();
    // Saturates, so any lookahead covers everything still upcoming
    let horizon = today
        .checked_add_days(Days::new(u64::from(opts.lookahead_days)))
        .unwrap_or(NaiveDate::MAX);

    let mut groups: BTreeMap<(NaiveDate, EventCategory), Vec<EventEntry>> = BTreeMap::new();

    for (index, record) in records.iter().enumerate() {
        // Milestones of one record that land on the same key share an entry
        let mut own: BTreeMap<(NaiveDate, EventCategory), EventEntry> = BTreeMap::new();

        for (milestone, date) in record.milestones() {
            let timing = Timing::of(date, today);
            if timing == Timing::Upcoming && date > horizon {
                log::debug!("{record}: {} on {date} is beyond the window", milestone.label());
                continue;
            }

            let category = EventCategory::new(milestone.kind(), timing);
            own.entry((date, category))
                .or_insert_with(|| entry_for(index, record, category.kind))
                .milestones
                .push(milestone);
        }

        for (key, entry) in own {
            groups.entry(key).or_default().push(entry);
        }
    }

    groups
        .into_iter()
        .map(|((date, category), mut entries)| {
            // Stable, so duplicate codes keep their input order
            entries.sort_by(|a, b| a.stock_code.cmp(&b.stock_code));
            if entries.len() > 1 {
                log::info!(
                    "Consolidated {} companies into one {category} event on {date}",
                    entries.len()
                );
            }
            build_event(date, category, entries, now, opts)
        })
        .collect()
}

/// Classify with default options as of the start of `today`.
pub fn classify_on(records: &[IpoRecord], today: NaiveDate, lookahead_days: u32) -> Vec<CalendarEvent> {
    let opts = ClassifyOptions {
        lookahead_days,
        ..Default::default()
    };
    classify(records, today.and_time(NaiveTime::MIN), &opts)
}

fn entry_for(index: usize, record: &IpoRecord, kind: DateKind) -> EventEntry {
    EventEntry {
        record: index,
        stock_code: record.stock_code.clone(),
        name: record.name.clone(),
        market: record.market.clone(),
        milestones: Vec::new(),
        price_range: match kind {
            DateKind::Application => record.price_range.clone(),
            DateKind::Listing => None,
        },
    }
}

fn build_event(
    date: NaiveDate,
    category: EventCategory,
    entries: Vec<EventEntry>,
    now: NaiveDateTime,
    opts: &ClassifyOptions,
) -> CalendarEvent {
    let (start, end) = span(date, category, opts);
    let (tier, reminders) = reminders_for(date, category, now, opts);

    CalendarEvent {
        date,
        category,
        title: title_for(category.kind, &entries),
        body: body_for(category.kind, &entries),
        entries,
        tier,
        reminders,
        start,
        end,
    }
}

/// Same-day events get a short timed window so a minutes-before reminder
/// has something to anchor to. Everything else is all-day.
fn span(date: NaiveDate, category: EventCategory, opts: &ClassifyOptions) -> (EventTime, EventTime) {
    match category.timing {
        Timing::Today => {
            let start = date.and_time(opts.start_time(category.kind));
            let end = start + Duration::minutes(i64::from(opts.window_minutes));
            (
                EventTime::DateTimeZoned {
                    datetime: start,
                    tzid: opts.tzid.clone(),
                },
                EventTime::DateTimeZoned {
                    datetime: end,
                    tzid: opts.tzid.clone(),
                },
            )
        }
        Timing::Past | Timing::Upcoming => {
            (EventTime::Date(date), EventTime::Date(date + Duration::days(1)))
        }
    }
}

fn reminders_for(
    date: NaiveDate,
    category: EventCategory,
    now: NaiveDateTime,
    opts: &ClassifyOptions,
) -> (Option<ReminderTier>, Vec<Reminder>) {
    match category.timing {
        Timing::Past => (None, Vec::new()),
        Timing::Upcoming => (
            Some(ReminderTier::OneDayBefore),
            vec![Reminder {
                minutes: MINUTES_PER_DAY,
            }],
        ),
        Timing::Today => {
            let start = date.and_time(opts.start_time(category.kind));
            let lead = i64::from(opts.alarm_minutes_before);

            if now < start - Duration::minutes(lead) {
                (
                    Some(ReminderTier::LeadTime {
                        minutes: opts.alarm_minutes_before,
                    }),
                    vec![Reminder { minutes: lead }],
                )
            } else {
                // Trigger at generation time; negative once the start itself has passed.
                // Floored so a partial minute never moves the trigger before `now`.
                (
                    Some(ReminderTier::Immediate),
                    vec![Reminder {
                        minutes: (start - now).num_seconds().div_euclid(60),
                    }],
                )
            }
        }
    }
}

fn title_for(kind: DateKind, entries: &[EventEntry]) -> String {
    match (kind, entries) {
        (DateKind::Listing, [entry]) => format!("HK IPO Listing: {}", entry),
        (DateKind::Application, [entry]) => format!("HK IPO Application: {}", entry),
        (DateKind::Listing, _) => format!("HK IPO Day: {} Companies Listing", entries.len()),
        (DateKind::Application, _) => format!("HK IPO Day: {} Companies Applying", entries.len()),
    }
}

fn body_for(kind: DateKind, entries: &[EventEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut block = format!("{}. {}", i + 1, entry);
            if kind == DateKind::Application {
                let labels: Vec<&str> = entry.milestones.iter().map(|m| m.label()).collect();
                block.push_str(&format!("\n   {}", labels.join(" / ")));
                if let Some(price_range) = &entry.price_range {
                    block.push_str(&format!("\n   Price range: {price_range}"));
                }
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}
