//! Dashboard configuration.
//!
//! Settings come from an optional TOML file plus `DQDOCTOR_`-prefixed
//! environment variables (e.g. `DQDOCTOR_WORKFLOW_API__API_KEY`). Everything
//! has a default except the API credential sections, whose absence simply
//! hides the automation feature.
//!
//! ```toml
//! [thresholds]
//! fresh_max_hours = 24.0
//! stale_max_hours = 48.0
//!
//! [score.weights]
//! freshness = 40.0
//! match_rate = 30.0
//! completeness = 30.0
//! alignment = 0.0
//!
//! [score.penalty]
//! cap = 20.0
//! divisor = 500.0
//!
//! [sync_api]
//! base_url = "https://api.sync.example.com"
//! workspace_id = "..."
//! api_token = "..."
//!
//! [workflow_api]
//! api_url = "https://workflows.example.com"
//! api_key = "..."
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::{Band, DuplicatePenalty, InvertedBand, ScoreWeights, Thresholds};
use crate::source::{SyncApiConfig, WorkflowApiConfig};

/// Score configuration: the weight variant and the duplicate penalty rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub weights: ScoreWeights,
    pub penalty: DuplicatePenalty,
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub thresholds: Thresholds,
    pub score: ScoreConfig,
    /// Sync-service API credentials; absent means the feature is hidden.
    pub sync_api: Option<SyncApiConfig>,
    /// Workflow-service API credentials; absent means the feature is hidden.
    pub workflow_api: Option<WorkflowApiConfig>,
    /// Seconds to cache automation API results before re-fetching.
    pub cache_ttl_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            score: ScoreConfig::default(),
            sync_api: None,
            workflow_api: None,
            cache_ttl_secs: 300,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix("DQDOCTOR").separator("__"))
            .build()
            .context("failed to load configuration")?;

        let config: DashboardConfig = config
            .try_deserialize()
            .context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Reject configurations that break the classification invariants:
    /// weights must sum to 100 and every threshold pair must be totally
    /// ordered so exactly one label applies per value.
    pub fn validate(&self) -> Result<()> {
        self.score.weights.validate()?;

        if self.score.penalty.divisor <= 0.0 {
            bail!("penalty divisor must be positive");
        }

        let t = &self.thresholds;
        if t.fresh_max_hours >= t.stale_max_hours {
            bail!(
                "fresh_max_hours ({}) must be below stale_max_hours ({})",
                t.fresh_max_hours,
                t.stale_max_hours
            );
        }

        for (name, band) in [
            ("score", &t.score),
            ("fresh_ratio", &t.fresh_ratio),
            ("match_rate", &t.match_rate),
            ("chain_coverage", &t.chain_coverage),
            ("distributor_rate", &t.distributor_rate),
            ("link_coverage", &t.link_coverage),
        ] {
            check_band(name, band)?;
        }
        check_inverted_band("duplicates", &t.duplicates)?;

        Ok(())
    }
}

fn check_band(name: &str, band: &Band) -> Result<()> {
    if band.healthy_min <= band.warning_min {
        bail!(
            "{} thresholds out of order: healthy_min ({}) must be above warning_min ({})",
            name,
            band.healthy_min,
            band.warning_min
        );
    }
    Ok(())
}

fn check_inverted_band(name: &str, band: &InvertedBand) -> Result<()> {
    if band.healthy_max >= band.warning_max {
        bail!(
            "{} thresholds out of order: healthy_max ({}) must be below warning_max ({})",
            name,
            band.healthy_max,
            band.warning_max
        );
    }
    Ok(())
}
