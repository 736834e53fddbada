//! TUI rendering traits for hkipo types.
//!
//! Extension traits that add colored terminal rendering to hkipo-core types
//! using owo_colors.

use hkipo_core::category::{EventCategory, Timing};
use hkipo_core::event::CalendarEvent;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventCategory {
    fn render(&self) -> String {
        let label = format!("[{}]", self);
        match self.timing {
            Timing::Upcoming => label.green().to_string(),
            Timing::Today => label.yellow().bold().to_string(),
            Timing::Past => label.dimmed().to_string(),
        }
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let reminder = match self.tier {
            Some(tier) => format!("⏰ {tier}"),
            None => String::new(),
        };
        format!("{} {} {}", self.category.render(), self.title, reminder.dimmed())
    }
}
