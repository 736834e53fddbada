use std::path::Path;

use anyhow::Result;
use hkipo_core::config::AppConfig;
use owo_colors::OwoColorize;

pub fn run(path: Option<&Path>) -> Result<()> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::config_path()?,
    };

    if !config_path.exists() {
        AppConfig::create_default_config(&config_path)?;
        println!("{}", "Created default config".green());
    }

    let config = AppConfig::load_from(&config_path)?;

    println!("{}", "Paths".bold());
    println!("  Config:    {}", config_path.display());
    println!("  Calendar:  {}", config.calendar.output_file.display());
    println!("  Summary:   {}", config.calendar.summary_file.display());
    println!();
    println!("{}", "Settings".bold());
    println!("  Lookahead:     {} days", config.calendar.lookahead_days);
    println!("  Same-day lead: {} min", config.calendar.alarm_minutes_before);
    println!("  Timezone:      {}", config.calendar.timezone);
    println!(
        "  Retries:       {} x {}s",
        config.source.max_retries, config.source.timeout_secs
    );

    Ok(())
}
