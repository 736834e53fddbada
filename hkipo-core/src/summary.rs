//! Plain-text summary of the generated calendar.

use crate::event::CalendarEvent;

const HEADER: &str = "=== Hong Kong IPO Calendar Summary ===";

/// One line per event; consolidated events list their companies underneath.
pub fn render_summary(events: &[CalendarEvent]) -> String {
    let mut lines = vec![HEADER.to_string(), format!("Total events: {}", events.len())];

    if !events.is_empty() {
        lines.push(String::new());
    }

    for event in events {
        lines.push(summary_line(event));
        if event.is_consolidated() {
            lines.extend(event.entries.iter().map(|entry| format!("   • {entry}")));
        }
    }

    lines.push(String::new());
    lines.push("=".repeat(40));
    lines.join("\n") + "\n"
}

pub fn summary_line(event: &CalendarEvent) -> String {
    let reminder = event
        .tier
        .map(|tier| tier.to_string())
        .unwrap_or_else(|| "none".to_string());

    format!(
        "{} [{}] {} | reminder: {}",
        event.date.format("%Y-%m-%d"),
        event.category,
        event.title,
        reminder
    )
}
