//! Display helpers shared by the presentation layer.

use chrono::{DateTime, NaiveDateTime};

/// Sentiment above this is reported as positive, below its negation as negative.
pub const SENTIMENT_THRESHOLD: f64 = 0.3;

/// `"42.5%"`, or `"-"` when absent.
#[must_use]
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}%"))
}

/// Coarse sentiment label for a score in `[-1.0, 1.0]`.
#[must_use]
pub fn sentiment_label(value: Option<f64>) -> &'static str {
    match value {
        None => "-",
        Some(v) if v > SENTIMENT_THRESHOLD => "positive",
        Some(v) if v < -SENTIMENT_THRESHOLD => "negative",
        Some(_) => "neutral",
    }
}

/// `"45s"` below a minute, `"3m 7s"` above.
#[must_use]
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return "-".to_string();
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.max(0.0).round() as u64;
    if total < 60 {
        format!("{total}s")
    } else {
        format!("{}m {}s", total / 60, total % 60)
    }
}

/// Renders a backend timestamp as `"Jan 5, 2025 14:03"`.
///
/// Accepts RFC 3339 and the naive ISO form the backend emits without an
/// offset; anything else is returned unchanged.
#[must_use]
pub fn format_timestamp(raw: Option<&str>) -> String {
    const DISPLAY: &str = "%b %-d, %Y %H:%M";
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format(DISPLAY).to_string();
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return ts.format(DISPLAY).to_string();
    }
    raw.to_string()
}

/// Truncates to at most `max_chars` characters, ending in `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(Some(42.456)), "42.5%");
        assert_eq!(format_percent(None), "-");
    }

    #[test]
    fn sentiment_labels() {
        assert_eq!(sentiment_label(Some(0.8)), "positive");
        assert_eq!(sentiment_label(Some(-0.5)), "negative");
        assert_eq!(sentiment_label(Some(0.3)), "neutral");
        assert_eq!(sentiment_label(None), "-");
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Some(45.0)), "45s");
        assert_eq!(format_duration(Some(187.0)), "3m 7s");
        assert_eq!(format_duration(None), "-");
    }

    #[test]
    fn timestamp_formatting() {
        assert_eq!(
            format_timestamp(Some("2025-01-05T14:03:00Z")),
            "Jan 5, 2025 14:03"
        );
        assert_eq!(
            format_timestamp(Some("2025-01-05T14:03:09.123456")),
            "Jan 5, 2025 14:03"
        );
        assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
        assert_eq!(format_timestamp(None), "-");
    }

    #[test]
    fn truncation_is_char_aware() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("Nahrungsergänzungsmittel", 10), "Nahrung...");
    }
}
