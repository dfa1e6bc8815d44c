//! Format - Formatting Utilities

use chrono::{DateTime, Local, Utc};

/// Format a UTC datetime for display in local time
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = dt.with_timezone(&Local);
    local.format("%Y-%m-%d %H:%M").to_string()
}

/// Format an optional timestamp, with a placeholder when missing
pub fn format_optional_datetime(dt: Option<&DateTime<Utc>>, missing: &str) -> String {
    dt.map(format_datetime)
        .unwrap_or_else(|| missing.to_string())
}

/// Truncate a string to `max_chars` characters with an ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let head: String = s.chars().take(max_chars).collect();
    format!("{head}...")
}

/// Render a rating as filled/empty stars, e.g. `★★★☆☆`
pub fn star_rating(rating: f64, max: u8) -> String {
    (1..=max)
        .map(|i| if f64::from(i) <= rating { '★' } else { '☆' })
        .collect()
}

/// Average rating text, `-` when nothing has been rated yet
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{avg:.1}"),
        None => "-".to_string(),
    }
}
