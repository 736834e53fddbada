pub mod config;
pub mod events;
pub mod generate;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use hkipo_core::client::{IpoClient, parse_response};
use hkipo_core::config::AppConfig;
use hkipo_core::record::{IpoRecord, normalize};

use crate::utils::tui;

/// Load config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

/// Wall-clock "now" in the calendar's zone, plus the UTC stamp for DTSTAMP.
///
/// With `--today`, classification runs as of the start of that day.
pub fn run_clock(config: &AppConfig, today: Option<&str>) -> Result<(NaiveDateTime, DateTime<Utc>)> {
    let stamp = Utc::now();

    let now = match today {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{s}'. Expected YYYY-MM-DD"))?
            .and_time(NaiveTime::MIN),
        None => stamp.with_timezone(&config.calendar.tz()?).naive_local(),
    };

    Ok((now, stamp))
}

/// Fetch and normalize the IPO snapshot, optionally saving the raw body.
pub async fn fetch_records(config: &AppConfig, dump_response: Option<&Path>) -> Result<Vec<IpoRecord>> {
    let client = IpoClient::new(&config.source)?;

    let spinner = tui::create_spinner("Fetching Hong Kong IPO data".to_string());
    let body = client.fetch_body().await;
    spinner.finish_and_clear();
    let body = body?;

    if let Some(path) = dump_response {
        std::fs::write(path, &body)
            .with_context(|| format!("Could not save response to {}", path.display()))?;
        log::info!("Response saved to {}", path.display());
    }

    let raw = parse_response(&body)?;
    Ok(normalize(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_clock_today_is_midnight() {
        let (now, _) = run_clock(&AppConfig::default(), Some("2024-12-10")).unwrap();
        assert_eq!(now, NaiveDate::from_ymd_opt(2024, 12, 10).unwrap().and_time(NaiveTime::MIN));
    }

    #[test]
    fn test_run_clock_rejects_malformed_date() {
        let err = run_clock(&AppConfig::default(), Some("2024/12/10")).unwrap_err();
        assert!(err.to_string().contains("2024/12/10"), "got {err}");
    }

    #[test]
    fn test_run_clock_defaults_to_now_in_calendar_zone() {
        let config = AppConfig::default();
        let (now, stamp) = run_clock(&config, None).unwrap();
        let expected = stamp.with_timezone(&config.calendar.tz().unwrap()).naive_local();
        assert_eq!(now, expected);
    }
}
