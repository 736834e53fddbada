use anyhow::Result;
use chrono::NaiveDate;
use hkipo_core::config::AppConfig;
use hkipo_core::engine::{ClassifyOptions, classify};
use hkipo_core::event::{EventEntry, EventTime};
use hkipo_core::record::IpoRecord;
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(config: AppConfig, today: Option<&str>, verbose: bool) -> Result<()> {
    let options = ClassifyOptions::from_config(&config.calendar)?;
    let (now, _) = super::run_clock(&config, today)?;

    let records = super::fetch_records(&config, None).await?;
    let events = classify(&records, now, &options);

    if events.is_empty() {
        println!("{}", "No IPO events found".dimmed());
        return Ok(());
    }

    let mut current_date: Option<NaiveDate> = None;

    for event in &events {
        if current_date != Some(event.date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(event.date, now.date()).bold());
            current_date = Some(event.date);
        }

        println!("  {} {}", format_time(&event.start), event.render());

        for entry in &event.entries {
            if event.is_consolidated() {
                println!("          • {}", entry);
            }
            if verbose {
                for line in details(entry, &records) {
                    println!("            {}", line.dimmed());
                }
            }
        }
    }

    Ok(())
}

/// Offering details of the record behind an entry.
fn details(entry: &EventEntry, records: &[IpoRecord]) -> Vec<String> {
    let Some(record) = records.get(entry.record) else {
        return Vec::new();
    };

    let fields = [
        ("Price range", &record.price_range),
        ("Issue price", &record.issue_price),
        ("Shares (100M)", &record.total_shares),
        ("Sponsor", &record.underwriter),
        ("Reference", &record.ref_company),
        ("Green shoe", &record.green_shoe),
    ];

    fields
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
        .collect()
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d, %Y").to_string(),
    }
}

/// Format the time portion of an event (e.g. "09:30" or "all-day")
fn format_time(time: &EventTime) -> String {
    match time {
        EventTime::Date(_) => "all-day".to_string(),
        EventTime::DateTimeZoned { datetime, .. } => format!("{:>7}", datetime.format("%H:%M")),
    }
}
