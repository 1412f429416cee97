//! Status classification against fixed threshold pairs.
//!
//! Every metric on the dashboard is labelled by comparing its value against a
//! pair of thresholds. The comparison is uniform; only the threshold values
//! vary per metric (documented at each call site).

use serde::Deserialize;

/// Severity label for a classified metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusLabel {
    /// Informational metric with no thresholds attached.
    Neutral,
    Healthy,
    Warning,
    Critical,
}

impl StatusLabel {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            StatusLabel::Neutral => "-",
            StatusLabel::Healthy => "OK",
            StatusLabel::Warning => "WARN",
            StatusLabel::Critical => "CRIT",
        }
    }
}

/// Threshold pair for metrics where higher is better (percentages, scores).
///
/// Invariant: `healthy_min > warning_min`, so exactly one label applies to any
/// value. [`crate::config::DashboardConfig::validate`] rejects configs that
/// break it.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Band {
    pub healthy_min: f64,
    pub warning_min: f64,
}

impl Band {
    pub const fn new(healthy_min: f64, warning_min: f64) -> Self {
        Self {
            healthy_min,
            warning_min,
        }
    }

    /// Classify a value. Boundaries are inclusive: a value exactly at
    /// `healthy_min` is Healthy, exactly at `warning_min` is Warning.
    pub fn classify(&self, value: f64) -> StatusLabel {
        if value >= self.healthy_min {
            StatusLabel::Healthy
        } else if value >= self.warning_min {
            StatusLabel::Warning
        } else {
            StatusLabel::Critical
        }
    }
}

/// Threshold pair for metrics where lower is better (duplicate counts).
///
/// Invariant: `healthy_max < warning_max`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InvertedBand {
    pub healthy_max: f64,
    pub warning_max: f64,
}

impl InvertedBand {
    pub const fn new(healthy_max: f64, warning_max: f64) -> Self {
        Self {
            healthy_max,
            warning_max,
        }
    }

    /// Classify a count-like value: below `healthy_max` is Healthy, below
    /// `warning_max` is Warning, anything else Critical.
    pub fn classify(&self, value: f64) -> StatusLabel {
        if value < self.healthy_max {
            StatusLabel::Healthy
        } else if value < self.warning_max {
            StatusLabel::Warning
        } else {
            StatusLabel::Critical
        }
    }
}

/// Freshness classification for a source, based on hours since its last sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FreshnessStatus {
    Fresh,
    Stale,
    Critical,
}

impl FreshnessStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            FreshnessStatus::Fresh => "FRESH",
            FreshnessStatus::Stale => "STALE",
            FreshnessStatus::Critical => "CRIT",
        }
    }

    /// Map to the generic severity scale for styling.
    pub fn as_label(&self) -> StatusLabel {
        match self {
            FreshnessStatus::Fresh => StatusLabel::Healthy,
            FreshnessStatus::Stale => StatusLabel::Warning,
            FreshnessStatus::Critical => StatusLabel::Critical,
        }
    }
}

/// Thresholds for all classified metrics on the dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Hours since last sync at or below which a source is Fresh.
    pub fresh_max_hours: f64,
    /// Hours since last sync at or below which a source is Stale (not yet Critical).
    pub stale_max_hours: f64,
    /// Overall health score bands.
    pub score: Band,
    /// Fraction of fresh sources, as a percentage.
    pub fresh_ratio: Band,
    /// CRM match rate percentage.
    pub match_rate: Band,
    /// Chain HQ coverage percentage.
    pub chain_coverage: Band,
    /// Distributor match rate percentage.
    pub distributor_rate: Band,
    /// External-id link coverage percentage.
    pub link_coverage: Band,
    /// Duplicate account-name count (lower is better).
    pub duplicates: InvertedBand,
    /// Active-rate percentage below which the metric warns.
    pub active_rate_warn_below: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fresh_max_hours: 24.0,
            stale_max_hours: 48.0,
            score: Band::new(80.0, 60.0),
            fresh_ratio: Band::new(100.0, 70.0),
            match_rate: Band::new(90.0, 75.0),
            chain_coverage: Band::new(70.0, 50.0),
            distributor_rate: Band::new(90.0, 70.0),
            link_coverage: Band::new(70.0, 50.0),
            duplicates: InvertedBand::new(1000.0, 5000.0),
            active_rate_warn_below: 5.0,
        }
    }
}

impl Thresholds {
    /// Classify a source by hours since its last sync. The 24h/48h boundaries
    /// are inclusive on the fresh side: exactly 24h is still Fresh.
    pub fn classify_freshness(&self, hours_since_sync: f64) -> FreshnessStatus {
        if hours_since_sync <= self.fresh_max_hours {
            FreshnessStatus::Fresh
        } else if hours_since_sync <= self.stale_max_hours {
            FreshnessStatus::Stale
        } else {
            FreshnessStatus::Critical
        }
    }

    /// Classify the active-rate metric: low activity warns, anything else is
    /// informational only.
    pub fn classify_active_rate(&self, rate_pct: f64) -> StatusLabel {
        if rate_pct < self.active_rate_warn_below {
            StatusLabel::Warning
        } else {
            StatusLabel::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_classification() {
        let band = Band::new(90.0, 75.0);
        assert_eq!(band.classify(95.0), StatusLabel::Healthy);
        assert_eq!(band.classify(80.0), StatusLabel::Warning);
        assert_eq!(band.classify(50.0), StatusLabel::Critical);
    }

    #[test]
    fn test_band_boundaries_inclusive() {
        let band = Band::new(90.0, 75.0);
        assert_eq!(band.classify(90.0), StatusLabel::Healthy);
        assert_eq!(band.classify(75.0), StatusLabel::Warning);
    }

    #[test]
    fn test_inverted_band() {
        let band = InvertedBand::new(1000.0, 5000.0);
        assert_eq!(band.classify(0.0), StatusLabel::Healthy);
        assert_eq!(band.classify(999.0), StatusLabel::Healthy);
        assert_eq!(band.classify(1000.0), StatusLabel::Warning);
        assert_eq!(band.classify(5000.0), StatusLabel::Critical);
    }

    #[test]
    fn test_freshness_boundaries() {
        let thresholds = Thresholds::default();
        assert_eq!(
            thresholds.classify_freshness(24.0),
            FreshnessStatus::Fresh
        );
        assert_eq!(
            thresholds.classify_freshness(25.0),
            FreshnessStatus::Stale
        );
        assert_eq!(
            thresholds.classify_freshness(49.0),
            FreshnessStatus::Critical
        );
    }

    #[test]
    fn test_freshness_maps_to_label() {
        assert_eq!(FreshnessStatus::Fresh.as_label(), StatusLabel::Healthy);
        assert_eq!(FreshnessStatus::Stale.as_label(), StatusLabel::Warning);
        assert_eq!(FreshnessStatus::Critical.as_label(), StatusLabel::Critical);
    }

    #[test]
    fn test_active_rate() {
        let thresholds = Thresholds::default();
        assert_eq!(
            thresholds.classify_active_rate(3.2),
            StatusLabel::Warning
        );
        assert_eq!(
            thresholds.classify_active_rate(8.0),
            StatusLabel::Neutral
        );
    }

    #[test]
    fn test_status_ordering_worst_last() {
        assert!(StatusLabel::Critical > StatusLabel::Warning);
        assert!(StatusLabel::Warning > StatusLabel::Healthy);
        assert!(StatusLabel::Healthy > StatusLabel::Neutral);
    }
}
