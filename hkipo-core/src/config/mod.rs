//! Configuration types for hkipo.

mod app_config;
mod calendar_config;
mod source_config;

pub use app_config::AppConfig;
pub use calendar_config::CalendarConfig;
pub use source_config::SourceConfig;
