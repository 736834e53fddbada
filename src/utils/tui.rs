use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner on stderr while the upstream request (and its retries) runs.
pub fn create_spinner(message: String) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]);
    let style = style
        .clone()
        .template("{spinner} {msg} ({elapsed})")
        .unwrap_or(style);

    let spinner = ProgressBar::new_spinner().with_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
