use crate::data::classify::{FreshnessStatus, Thresholds};

/// Format an hour delta for display: "3h ago", or "2d 5h ago" past a day.
pub fn format_hours_ago(hours: f64) -> String {
    let whole = hours.floor() as u64;
    if whole <= 24 {
        format!("{}h ago", whole)
    } else {
        format!("{}d {}h ago", whole / 24, whole % 24)
    }
}

/// Format an hour delta without the suffix, for axis-style labels.
pub fn format_hours(hours: f64) -> String {
    if hours < 10.0 {
        format!("{:.1}h", hours)
    } else {
        format!("{}h", hours.round() as u64)
    }
}

/// One-line freshness description for a source, e.g. "FRESH (18h ago)".
pub fn describe_freshness(hours: f64, thresholds: &Thresholds) -> String {
    let status = thresholds.classify_freshness(hours);
    match status {
        FreshnessStatus::Fresh => format!("FRESH ({})", format_hours_ago(hours)),
        FreshnessStatus::Stale => format!("STALE ({})", format_hours_ago(hours)),
        FreshnessStatus::Critical => format!("CRIT ({})", format_hours_ago(hours)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_under_a_day() {
        assert_eq!(format_hours_ago(0.0), "0h ago");
        assert_eq!(format_hours_ago(3.7), "3h ago");
        assert_eq!(format_hours_ago(24.0), "24h ago");
    }

    #[test]
    fn test_format_over_a_day() {
        assert_eq!(format_hours_ago(26.0), "1d 2h ago");
        assert_eq!(format_hours_ago(49.5), "2d 1h ago");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(2.35), "2.4h");
        assert_eq!(format_hours(36.2), "36h");
    }

    #[test]
    fn test_describe_freshness() {
        let thresholds = Thresholds::default();
        assert_eq!(describe_freshness(5.0, &thresholds), "FRESH (5h ago)");
        assert_eq!(describe_freshness(30.0, &thresholds), "STALE (1d 6h ago)");
        assert_eq!(describe_freshness(72.0, &thresholds), "CRIT (3d 0h ago)");
    }
}
