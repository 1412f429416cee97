//! Data models and processing for quality snapshots.
//!
//! This module handles the transformation of raw quality snapshots into
//! structured, status-annotated data suitable for display.
//!
//! ## Submodules
//!
//! - [`classify`]: Status classification against threshold pairs
//! - [`score`]: Weighted health score aggregation
//! - [`quality`]: Core data models ([`QualityData`], [`SourceData`])
//! - [`history`]: Historical tracking for sparklines and rate calculations
//! - [`hours`]: Formatting of hour deltas (e.g., "3h ago", "2d 5h ago")
//!
//! ## Data Flow
//!
//! ```text
//! QualitySnapshot (raw JSON)
//!        │
//!        ▼
//! QualityData::from_snapshot()
//!        │
//!        ├──▶ SourceData (freshness status from Thresholds)
//!        ├──▶ classified Metric values (match, completeness, coverage)
//!        ├──▶ health_score (weighted blend from ScoreWeights)
//!        │
//!        └──▶ History::record() (for sparklines)
//! ```

pub mod classify;
pub mod history;
pub mod hours;
pub mod quality;
pub mod score;

pub use classify::{Band, FreshnessStatus, InvertedBand, StatusLabel, Thresholds};
pub use history::History;
pub use quality::{
    AccountData, AutomationData, ConnectionData, ExecutionTotals, MatchData, Metric, QualityData,
    SourceData, WorkflowData,
};
pub use score::{compute_health_score, DuplicatePenalty, ScoreInputs, ScoreWeights};
