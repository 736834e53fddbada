//! Serialization of classified events into output files.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::HkIpoResult;
use crate::event::CalendarEvent;
use crate::ics::generate_ics;
use crate::summary::render_summary;

/// Rendered calendar and summary, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedCalendar {
    pub ics: String,
    pub summary: String,
}

/// Render `events`. Pure: the same events and stamp always give the same bytes.
pub fn emit(events: &[CalendarEvent], stamp: DateTime<Utc>) -> HkIpoResult<SerializedCalendar> {
    Ok(SerializedCalendar {
        ics: generate_ics(events, stamp)?,
        summary: render_summary(events),
    })
}

impl SerializedCalendar {
    pub fn write(&self, ics_path: &Path, summary_path: &Path) -> HkIpoResult<()> {
        write_file(ics_path, &self.ics)?;
        log::info!("Calendar saved to {}", ics_path.display());

        write_file(summary_path, &self.summary)?;
        log::info!("Event summary saved to {}", summary_path.display());

        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> HkIpoResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify_on;
    use crate::error::HkIpoError;
    use crate::record::IpoRecord;
    use chrono::{NaiveDate, TimeZone};

    fn records() -> Vec<IpoRecord> {
        let d = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
        ["07001", "07002"]
            .into_iter()
            .map(|code| IpoRecord {
                stock_code: code.into(),
                name: format!("Company {code}"),
                market: None,
                apply_start: None,
                apply_end: None,
                listing: Some(d),
                price_range: None,
                issue_price: None,
                total_shares: None,
                underwriter: None,
                ref_company: None,
                green_shoe: None,
            })
            .collect()
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_emit_is_byte_identical_across_runs() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();

        let first = emit(&classify_on(&records(), today, 30), stamp()).unwrap();
        let second = emit(&classify_on(&records(), today, 30), stamp()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.ics.matches("BEGIN:VEVENT").count(), 1);
    }

    #[test]
    fn test_write_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let ics_path = dir.path().join("out").join("hkipo.ics");
        let summary_path = dir.path().join("out").join("hkipo_summary.txt");
        let today = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();

        let rendered = emit(&classify_on(&records(), today, 30), stamp()).unwrap();
        rendered.write(&ics_path, &summary_path).unwrap();

        assert_eq!(std::fs::read_to_string(&ics_path).unwrap(), rendered.ics);
        assert_eq!(std::fs::read_to_string(&summary_path).unwrap(), rendered.summary);
    }

    #[test]
    fn test_write_surfaces_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let rendered = emit(&[], stamp()).unwrap();
        let err = rendered
            .write(&blocker.join("hkipo.ics"), &dir.path().join("summary.txt"))
            .unwrap_err();

        assert!(matches!(err, HkIpoError::Io(_)), "got {err:?}");
    }
}
