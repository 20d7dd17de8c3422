use chrono::prelude::*;
use std::time::{Duration, Instant};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::ValidationError;

/// Utility functions shared by the CLI and the interactive dashboard

// ===== STRING UTILITIES =====

/// Truncates a string to a display width, adding "…" if truncated
pub fn truncate_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Pads a string with spaces to a display width, truncating first if needed
pub fn pad_width(s: &str, width: usize) -> String {
    let truncated = truncate_width(s, width);
    let fill = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(fill))
}

/// Checks if a string is empty or contains only whitespace
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// ===== DATE/TIME UTILITIES =====

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

/// Parses a date in YYYY-MM-DD, YYYY.MM.DD or YYYY/MM/DD format
pub fn parse_date(date_str: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = date_str.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ValidationError::InvalidDateFormat(date_str.to_string()))
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a duration for human-readable output
pub fn format_duration(duration: Duration) -> String {
    if duration.as_secs() > 0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if duration.as_millis() > 0 {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{}μs", duration.as_micros())
    }
}

/// Formats an inclusive range like "Feb 12 – Feb 16, 2024"
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} – {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
}

// ===== PERFORMANCE UTILITIES =====

/// A simple timer for performance measurement
pub struct Timer {
    start: Instant,
    message: String,
}

impl Timer {
    pub fn new(message: &str) -> Self {
        Timer {
            start: Instant::now(),
            message: message.to_string(),
        }
    }

    /// Stops the timer and returns the duration
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }

    /// Stops the timer and logs the elapsed time at debug level
    pub fn stop_and_log(self) -> Duration {
        let message = self.message.clone();
        let duration = self.stop();
        tracing::debug!("{} took {}", message, format_duration(duration));
        duration
    }
}

// ===== FORMATTING UTILITIES =====

/// Formats hours per day, e.g. "8h/day"
pub fn format_hours_per_day(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{:.0}h/day", hours)
    } else {
        format!("{:.1}h/day", hours)
    }
}

/// Formats a load ratio as a whole percentage, e.g. 0.5 -> "50%"
pub fn format_percentage(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
