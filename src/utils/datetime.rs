use jiff::Timestamp;
use jiff::tz::TimeZone;
use std::time::{SystemTime, UNIX_EPOCH};

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

/// Fixed "now" and zone used when a whole view is rendered at once.
#[derive(Debug, Clone)]
pub struct Clock {
    pub now_secs: i64,
    pub tz: TimeZone,
}

impl Clock {
    pub fn system() -> Self {
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self {
            now_secs,
            tz: TimeZone::system(),
        }
    }

    /// A UTC clock frozen at `now_secs`.
    pub fn fixed(now_secs: i64) -> Self {
        Self {
            now_secs,
            tz: TimeZone::UTC,
        }
    }

    pub fn format(&self, timestamp: i64) -> String {
        format_timestamp_at(timestamp, self.now_secs, &self.tz)
    }
}

/// Format a unix timestamp (seconds) relative to `now_secs`: "5 mins ago",
/// "1 hour ago", "3 days ago", or an absolute "Mar 4, 2024" in `tz` once it
/// is a week old.
pub fn format_timestamp_at(timestamp: i64, now_secs: i64, tz: &TimeZone) -> String {
    // Timestamps from the future read as "0 mins ago".
    let delta = now_secs.saturating_sub(timestamp).max(0);

    let minutes = delta / MINUTE;
    if minutes < 60 {
        return with_unit(minutes, "min");
    }

    let hours = delta / HOUR;
    if hours < 24 {
        return with_unit(hours, "hour");
    }

    let days = delta / DAY;
    if days < 7 {
        return with_unit(days, "day");
    }

    absolute_date(timestamp, tz)
}

fn with_unit(n: i64, unit: &str) -> String {
    match n {
        1 => format!("1 {} ago", unit),
        n => format!("{} {}s ago", n, unit),
    }
}

fn absolute_date(timestamp: i64, tz: &TimeZone) -> String {
    match Timestamp::from_second(timestamp) {
        Ok(ts) => {
            let zoned = ts.to_zoned(tz.clone());
            format!("{} {}, {}", zoned.strftime("%b"), zoned.day(), zoned.year())
        }
        Err(e) => {
            tracing::warn!("Timestamp {} out of range: {}", timestamp, e);
            "unknown".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000; // Nov 14, 2023 22:13:20 UTC

    fn fmt(age_secs: i64) -> String {
        format_timestamp_at(NOW - age_secs, NOW, &TimeZone::UTC)
    }

    #[test]
    fn minutes_pluralize_at_one_and_two() {
        assert_eq!(fmt(0), "0 mins ago");
        assert_eq!(fmt(59), "0 mins ago");
        assert_eq!(fmt(60), "1 min ago");
        assert_eq!(fmt(2 * 60), "2 mins ago");
        assert_eq!(fmt(59 * 60 + 59), "59 mins ago");
    }

    #[test]
    fn hours_pluralize_at_one_and_two() {
        assert_eq!(fmt(HOUR), "1 hour ago");
        assert_eq!(fmt(2 * HOUR), "2 hours ago");
        assert_eq!(fmt(23 * HOUR + 59 * 60), "23 hours ago");
    }

    #[test]
    fn days_pluralize_at_one_and_two() {
        assert_eq!(fmt(DAY), "1 day ago");
        assert_eq!(fmt(2 * DAY), "2 days ago");
        assert_eq!(fmt(7 * DAY - 1), "6 days ago");
    }

    #[test]
    fn week_old_stories_show_absolute_date() {
        assert_eq!(fmt(7 * DAY), "Nov 7, 2023");
        assert_eq!(
            format_timestamp_at(1_577_836_800, NOW, &TimeZone::UTC),
            "Jan 1, 2020"
        );
    }

    #[test]
    fn future_timestamps_clamp_to_zero_minutes() {
        assert_eq!(format_timestamp_at(NOW + 600, NOW, &TimeZone::UTC), "0 mins ago");
    }

    #[test]
    fn fixed_clock_formats_in_utc() {
        let clock = Clock::fixed(NOW);
        assert_eq!(clock.format(NOW - 3 * HOUR), "3 hours ago");
        assert_eq!(clock.format(NOW - 30 * DAY), "Oct 15, 2023");
    }

    #[test]
    fn wall_clock_variant_handles_recent_times() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_secs() as i64;
        assert_eq!(Clock::system().format(now - 5 * 60), "5 mins ago");
    }
}
