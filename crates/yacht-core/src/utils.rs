//! Display helpers shared by the views

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Categorical palette for chart series
pub const PALETTE: [&str; 8] = [
    "#06b6d4", "#0ea5e9", "#3b82f6", "#6366f1", "#8b5cf6", "#ec4899", "#f59e0b", "#10b981",
];

/// Stable color for the category at `index`
#[must_use]
pub const fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Round a percentage to the nearest whole number for display
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_percent(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}

/// `m:ss` form used on the call detail header
#[must_use]
pub fn format_duration_clock(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{}:{:02}", total / 60, total % 60)
}

/// `12m 34s` form used in lists
#[must_use]
pub fn format_duration_long(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{}m {}s", total / 60, total % 60)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}

/// Short chart-axis date, e.g. `Jan 9`
#[must_use]
pub fn short_date(date: NaiveDate) -> String {
    format!("{} {}", date.format("%b"), date.day())
}

/// Long date, e.g. `Jan 9, 2024`
#[must_use]
pub fn long_date(timestamp: &DateTime<Utc>) -> String {
    format!(
        "{} {}, {}",
        timestamp.format("%b"),
        timestamp.day(),
        timestamp.year()
    )
}

/// Twelve-hour clock time, e.g. `02:32 PM`
#[must_use]
pub fn clock_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%I:%M %p").to_string()
}

/// Coarse relative time: `5m ago`, `3h ago`, `2d ago`
#[must_use]
pub fn relative_time(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*then);
    let minutes = elapsed.num_minutes().max(0);
    let hours = elapsed.num_hours().max(0);

    if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

/// Normalise a weekday spelling (`monday`, `Mon`, `1`) to its short name.
///
/// Numeric input follows the ISO convention (1 = Monday); 0 and 7 both
/// mean Sunday since backends disagree on which one they use.
#[must_use]
pub fn short_weekday(raw: &str) -> Option<&'static str> {
    const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    let trimmed = raw.trim();
    if let Ok(number) = trimmed.parse::<usize>() {
        return match number {
            0 | 7 => Some("Sun"),
            1..=6 => DAYS.get(number - 1).copied(),
            _ => None,
        };
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    DAYS.iter()
        .copied()
        .find(|day| lower.starts_with(&day.to_ascii_lowercase()))
}

/// Position of a short weekday name, Monday first
#[must_use]
pub fn weekday_order(day: &str) -> usize {
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        .iter()
        .position(|d| *d == day)
        .unwrap_or(usize::MAX)
}

/// Badge classes for a sentiment label
#[must_use]
pub fn sentiment_badge_class(sentiment: &str) -> &'static str {
    match sentiment.to_ascii_lowercase().as_str() {
        "positive" => "bg-green-500/20 text-green-400 border-green-500/50",
        "negative" => "bg-red-500/20 text-red-400 border-red-500/50",
        "neutral" => "bg-slate-500/20 text-slate-400 border-slate-500/50",
        _ => "bg-cyan-500/20 text-cyan-400 border-cyan-500/50",
    }
}

/// Text class for an answer confidence level
#[must_use]
pub fn confidence_class(confidence: &str) -> &'static str {
    match confidence {
        "high" => "text-green-300",
        "medium" => "text-cyan-300",
        "low" => "text-orange-300",
        _ => "text-slate-300",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_palette_wraps_stably() {
        assert_eq!(palette_color(0), "#06b6d4");
        assert_eq!(palette_color(PALETTE.len()), palette_color(0));
        assert_eq!(palette_color(3), palette_color(3 + PALETTE.len() * 5));
    }

    #[rstest]
    #[case(32.4, 32)]
    #[case(32.5, 33)]
    #[case(-0.4, 0)]
    #[case(f64::NAN, 0)]
    fn test_round_percent(#[case] value: f64, #[case] expected: i64) {
        assert_eq!(round_percent(value), expected);
    }

    #[rstest]
    #[case(754.0, "12:34", "12m 34s")]
    #[case(59.9, "0:59", "0m 59s")]
    #[case(0.0, "0:00", "0m 0s")]
    #[case(-5.0, "0:00", "0m 0s")]
    fn test_duration_formats(#[case] secs: f64, #[case] clock: &str, #[case] long: &str) {
        assert_eq!(format_duration_clock(secs), clock);
        assert_eq!(format_duration_long(secs), long);
    }

    #[test]
    fn test_date_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(short_date(date), "Jan 9");

        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 32, 0).unwrap();
        assert_eq!(long_date(&ts), "Jan 15, 2024");
        assert_eq!(clock_time(&ts), "02:32 PM");
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let thirty_min = now - chrono::Duration::minutes(30);
        let two_hours = now - chrono::Duration::hours(2);
        let one_day = now - chrono::Duration::hours(25);

        assert_eq!(relative_time(&thirty_min, &now), "30m ago");
        assert_eq!(relative_time(&two_hours, &now), "2h ago");
        assert_eq!(relative_time(&one_day, &now), "1d ago");
    }

    #[rstest]
    #[case("Monday", Some("Mon"))]
    #[case("tue", Some("Tue"))]
    #[case(" SUNDAY ", Some("Sun"))]
    #[case("0", Some("Sun"))]
    #[case("3", Some("Wed"))]
    #[case("7", Some("Sun"))]
    #[case("9", None)]
    #[case("xx", None)]
    fn test_short_weekday(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(short_weekday(raw), expected);
    }

    #[test]
    fn test_weekday_order() {
        assert!(weekday_order("Mon") < weekday_order("Sun"));
        assert_eq!(weekday_order("Funday"), usize::MAX);
    }

    #[test]
    fn test_badge_classes_default() {
        assert!(sentiment_badge_class("Positive").contains("green"));
        assert!(sentiment_badge_class("unknown").contains("cyan"));
        assert_eq!(confidence_class("bogus"), "text-slate-300");
    }
}
