//! Top-level hkipo configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{CalendarConfig, SourceConfig};
use crate::error::{HkIpoError, HkIpoResult};

/// Configuration at ~/.config/hkipo/config.toml
///
/// Every field has a default, so a missing file or a partial file is fine.
/// The loaded value is passed explicitly to the client and the engine.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl AppConfig {
    pub fn config_path() -> HkIpoResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| HkIpoError::Config("Could not determine config directory".into()))?
            .join("hkipo");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> HkIpoResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load_from(path: &Path) -> HkIpoResult<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| HkIpoError::Config(format!("{}: {e}", path.display())))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> HkIpoResult<()> {
        let defaults = AppConfig::default();
        let contents = format!(
            "\
# hkipo configuration

[source]
# base_url = \"{base_url}\"
# endpoint = \"{endpoint}\"
# page_size = {page_size}
# timeout_secs = {timeout_secs}
# max_retries = {max_retries}
# retry_base_delay_ms = {retry_base_delay_ms}
# cookie = \"kbzw__Session=...\"

[calendar]
# lookahead_days = {lookahead_days}
# alarm_minutes_before = {alarm_minutes_before}
# listing_time = \"{listing_time}\"
# application_time = \"{application_time}\"
# window_minutes = {window_minutes}
# timezone = \"{timezone}\"
# output_file = \"{output_file}\"
# summary_file = \"{summary_file}\"
",
            base_url = defaults.source.base_url,
            endpoint = defaults.source.endpoint,
            page_size = defaults.source.page_size,
            timeout_secs = defaults.source.timeout_secs,
            max_retries = defaults.source.max_retries,
            retry_base_delay_ms = defaults.source.retry_base_delay_ms,
            lookahead_days = defaults.calendar.lookahead_days,
            alarm_minutes_before = defaults.calendar.alarm_minutes_before,
            listing_time = defaults.calendar.listing_time,
            application_time = defaults.calendar.application_time,
            window_minutes = defaults.calendar.window_minutes,
            timezone = defaults.calendar.timezone,
            output_file = defaults.calendar.output_file.display(),
            summary_file = defaults.calendar.summary_file.display(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HkIpoError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| HkIpoError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
