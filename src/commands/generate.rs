use std::path::PathBuf;

use anyhow::Result;
use hkipo_core::config::{AppConfig, CalendarConfig};
use hkipo_core::emit::{SerializedCalendar, emit};
use hkipo_core::engine::{ClassifyOptions, classify};
use owo_colors::OwoColorize;

pub struct Options {
    pub today: Option<String>,
    pub dump_response: Option<PathBuf>,
    pub dry_run: bool,
}

pub async fn run(config: AppConfig, options: Options) -> Result<()> {
    let classify_options = ClassifyOptions::from_config(&config.calendar)?;
    let (now, stamp) = super::run_clock(&config, options.today.as_deref())?;

    log::info!("Starting Hong Kong IPO calendar generation for {}", now.date());

    let records = super::fetch_records(&config, options.dump_response.as_deref()).await?;
    let events = classify(&records, now, &classify_options);
    log::info!(
        "Classified {} records into {} calendar events",
        records.len(),
        events.len()
    );

    let rendered = emit(&events, stamp)?;
    let written = deliver(&rendered, &config.calendar, options.dry_run)?;

    print!("{}", rendered.summary);
    if !written {
        log::info!("Dry run, no files written");
        return Ok(());
    }

    println!();
    println!("{}", "Files".bold());
    println!("  Calendar:  {}", config.calendar.output_file.display());
    println!("  Summary:   {}", config.calendar.summary_file.display());

    Ok(())
}

/// Write both output files unless this is a dry run. Returns whether anything was written.
fn deliver(rendered: &SerializedCalendar, calendar: &CalendarConfig, dry_run: bool) -> Result<bool> {
    if dry_run {
        return Ok(false);
    }
    rendered.write(&calendar.output_file, &calendar.summary_file)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn calendar_in(dir: &std::path::Path) -> CalendarConfig {
        CalendarConfig {
            output_file: dir.join("hkipo.ics"),
            summary_file: dir.join("hkipo_summary.txt"),
            ..Default::default()
        }
    }

    fn rendered() -> SerializedCalendar {
        emit(&[], Utc.with_ymd_and_hms(2024, 12, 10, 0, 0, 0).unwrap()).unwrap()
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let calendar = calendar_in(dir.path());

        assert!(!deliver(&rendered(), &calendar, true).unwrap());
        assert!(!calendar.output_file.exists());
        assert!(!calendar.summary_file.exists());
    }

    #[test]
    fn test_generate_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let calendar = calendar_in(dir.path());
        let rendered = rendered();

        assert!(deliver(&rendered, &calendar, false).unwrap());
        assert_eq!(std::fs::read_to_string(&calendar.output_file).unwrap(), rendered.ics);
        assert_eq!(std::fs::read_to_string(&calendar.summary_file).unwrap(), rendered.summary);
    }
}
