//! Relative "N units ago" formatting for creation timestamps.

use chrono::{DateTime, Local, Utc};

/// Coarsest non-trivial unit, each step derived from the previous one by
/// integer division. Years are 365 days with no leap correction; future
/// timestamps clamp to zero seconds.
pub fn time_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_milliseconds().max(0) / 1000;
    if seconds < 60 {
        return format!("{} seconds ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} minutes ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hours ago", hours);
    }
    let days = hours / 24;
    if days < 365 {
        return format!("{} days ago", days);
    }
    format!("{} years ago", days / 365)
}

/// Absolute timestamp in the local time zone.
pub fn absolute_time(created_at: DateTime<Utc>) -> String {
    created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
