//! Formatting helpers shared across the CLI reports.

/// Format a 0..=1 ratio as a percentage with one decimal (e.g., "87.5%").
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format a duration in minutes, rounded to whole minutes (e.g., "42 min").
pub fn format_minutes(minutes: f64) -> String {
    format!("{:.0} min", minutes)
}

/// Render a horizontal bar of `width` cells for a 0..=1 value.
pub fn format_bar(value: f64, width: usize) -> String {
    let filled = (value.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}
