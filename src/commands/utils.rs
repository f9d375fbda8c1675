//! Shared utility functions for command implementations

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use kettle::HomebrewManager;
use serde::Serialize;
use std::time::Duration;

/// The manager every command drives
pub(crate) type Manager = HomebrewManager;

/// Spinner on a terminal, hidden otherwise
pub(super) fn spinner(message: impl Into<String>) -> ProgressBar {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stdout());
    if !is_tty {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// "3 minutes ago" style rendering of a refresh time
pub(super) fn format_age(updated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = updated_at else {
        return "never".to_string();
    };

    let secs = (now - at).num_seconds().max(0);
    let (value, unit) = match secs {
        0..=59 => return "just now".to_string(),
        60..=3599 => (secs / 60, "minute"),
        3600..=86_399 => (secs / 3600, "hour"),
        _ => (secs / 86_400, "day"),
    };
    let plural = if value == 1 { "" } else { "s" };
    format!("{} {}{} ago", value, unit, plural)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        assert_eq!(format_age(None, now), "never");
        assert_eq!(format_age(Some(now), now), "just now");
        assert_eq!(
            format_age(Some(now - TimeDelta::minutes(1)), now),
            "1 minute ago"
        );
        assert_eq!(
            format_age(Some(now - TimeDelta::hours(5)), now),
            "5 hours ago"
        );
        assert_eq!(format_age(Some(now - TimeDelta::days(2)), now), "2 days ago");
    }
}
