//! Quality data parsing and health computation.
//!
//! This module transforms raw quality snapshots into processed data with
//! freshness statuses, classified metrics, and the overall health score,
//! computed fresh on every refresh from configurable thresholds.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use super::classify::{FreshnessStatus, StatusLabel, Thresholds};
use super::score::{compute_health_score, DuplicatePenalty, ScoreInputs, ScoreWeights};
use crate::source::{
    AccountStats, ConnectionInfo, ExecutionInfo, MatchStats, QualitySnapshot, WorkflowInfo,
};

/// A metric value together with its classification.
#[derive(Debug, Clone, Copy)]
pub struct Metric {
    pub value: f64,
    pub status: StatusLabel,
}

impl Metric {
    fn classified(value: Option<f64>, status: impl FnOnce(f64) -> StatusLabel) -> Option<Self> {
        value.map(|v| Metric {
            value: v,
            status: status(v),
        })
    }
}

/// One monitored source with its computed freshness status.
#[derive(Debug, Clone)]
pub struct SourceData {
    pub system: String,
    pub table: String,
    pub row_count: u64,
    pub last_sync_at: Option<String>,
    pub hours_since_sync: f64,
    pub status: FreshnessStatus,
}

impl SourceData {
    /// Display label combining system and table.
    pub fn label(&self) -> String {
        format!("{} - {}", self.system, self.table)
    }
}

/// Processed CRM match metrics.
#[derive(Debug, Clone)]
pub struct MatchData {
    pub raw: MatchStats,
    pub match_rate: Option<Metric>,
    pub chain_coverage: Option<Metric>,
    pub distributor_rate: Option<Metric>,
}

/// Processed CRM account metrics.
#[derive(Debug, Clone)]
pub struct AccountData {
    pub raw: AccountStats,
    pub link_coverage: Option<Metric>,
    pub active_rate: Option<Metric>,
    pub duplicates: Option<Metric>,
    /// Completeness bars for display: (field label, percentage).
    pub completeness: Vec<(&'static str, f64)>,
}

/// One sync-service connection with a derived health flag.
#[derive(Debug, Clone)]
pub struct ConnectionData {
    pub name: String,
    pub status: String,
    pub healthy: bool,
}

/// One workflow with its activation state.
#[derive(Debug, Clone)]
pub struct WorkflowData {
    pub name: String,
    pub active: bool,
}

/// Totals over the recent execution list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionTotals {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl ExecutionTotals {
    /// Succeeded = finished and never stopped; a set `stoppedAt` is a failure.
    pub fn from_executions(executions: &[ExecutionInfo]) -> Self {
        let succeeded = executions
            .iter()
            .filter(|e| e.finished && e.stopped_at.is_none())
            .count();
        let failed = executions.iter().filter(|e| e.stopped_at.is_some()).count();
        Self {
            total: executions.len(),
            succeeded,
            failed,
        }
    }
}

/// Workflow-automation state, from the APIs or an embedded snapshot section.
#[derive(Debug, Clone, Default)]
pub struct AutomationData {
    pub connections: Vec<ConnectionData>,
    pub workflows: Vec<WorkflowData>,
    pub executions: Option<ExecutionTotals>,
}

impl AutomationData {
    pub fn from_parts(
        connections: Option<&[ConnectionInfo]>,
        workflows: Option<&[WorkflowInfo]>,
        executions: Option<&[ExecutionInfo]>,
    ) -> Option<Self> {
        if connections.is_none() && workflows.is_none() && executions.is_none() {
            return None;
        }

        let connections = connections
            .unwrap_or_default()
            .iter()
            .map(|c| ConnectionData {
                name: c.name.clone(),
                healthy: c.status.eq_ignore_ascii_case("active"),
                status: c.status.clone(),
            })
            .collect();

        let workflows = workflows
            .unwrap_or_default()
            .iter()
            .map(|w| WorkflowData {
                name: w.name.clone(),
                active: w.active,
            })
            .collect();

        Some(Self {
            connections,
            workflows,
            executions: executions.map(ExecutionTotals::from_executions),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty() && self.workflows.is_empty() && self.executions.is_none()
    }
}

/// Complete processed quality data ready for display.
#[derive(Debug, Clone)]
pub struct QualityData {
    pub sources: Vec<SourceData>,
    pub match_data: Option<MatchData>,
    pub account_data: Option<AccountData>,
    pub automation: Option<AutomationData>,
    pub health_score: u8,
    pub health_status: StatusLabel,
    pub last_updated: Instant,
}

impl QualityData {
    /// Load and parse quality data from a JSON export file.
    pub fn load(
        path: &Path,
        thresholds: &Thresholds,
        weights: &ScoreWeights,
        penalty: &DuplicatePenalty,
    ) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, thresholds, weights, penalty)
    }

    /// Parse quality data from a JSON string.
    pub fn parse(
        content: &str,
        thresholds: &Thresholds,
        weights: &ScoreWeights,
        penalty: &DuplicatePenalty,
    ) -> Result<Self> {
        let snapshot: QualitySnapshot = serde_json::from_str(content)?;
        Ok(Self::from_snapshot(snapshot, thresholds, weights, penalty))
    }

    /// Convert a QualitySnapshot into processed QualityData.
    ///
    /// This is the primary conversion method used by all data sources.
    pub fn from_snapshot(
        snapshot: QualitySnapshot,
        thresholds: &Thresholds,
        weights: &ScoreWeights,
        penalty: &DuplicatePenalty,
    ) -> Self {
        let mut sources: Vec<SourceData> = snapshot
            .pipelines
            .into_iter()
            .map(|row| SourceData {
                status: thresholds.classify_freshness(row.hours_since_sync),
                system: row.source_system,
                table: row.table_id,
                row_count: row.row_count,
                last_sync_at: row.last_sync_at,
                hours_since_sync: row.hours_since_sync,
            })
            .collect();

        // Sort by freshness (critical first), then by name
        sources.sort_by(|a, b| {
            b.status
                .cmp(&a.status)
                .then_with(|| a.system.cmp(&b.system))
                .then_with(|| a.table.cmp(&b.table))
        });

        let match_data = snapshot.crm_match.map(|raw| MatchData {
            match_rate: Metric::classified(raw.match_rate_pct, |v| {
                thresholds.match_rate.classify(v)
            }),
            chain_coverage: Metric::classified(raw.chain_hq_coverage_pct, |v| {
                thresholds.chain_coverage.classify(v)
            }),
            distributor_rate: Metric::classified(raw.distributor_match_rate_pct, |v| {
                thresholds.distributor_rate.classify(v)
            }),
            raw,
        });

        let account_data = snapshot.crm_accounts.map(|raw| {
            let completeness = [
                ("Name", raw.name_completeness),
                ("Address", raw.address_completeness),
                ("Phone", raw.phone_completeness),
                ("Email", raw.email_completeness),
            ]
            .into_iter()
            .filter_map(|(label, v)| v.map(|v| (label, v)))
            .collect();

            AccountData {
                link_coverage: Metric::classified(raw.link_coverage_pct, |v| {
                    thresholds.link_coverage.classify(v)
                }),
                active_rate: Metric::classified(raw.active_rate_pct, |v| {
                    thresholds.classify_active_rate(v)
                }),
                duplicates: Metric::classified(raw.duplicate_names.map(|n| n as f64), |v| {
                    thresholds.duplicates.classify(v)
                }),
                completeness,
                raw,
            }
        });

        let automation = AutomationData::from_parts(
            snapshot.connections.as_deref(),
            snapshot.workflows.as_deref(),
            snapshot.executions.as_deref(),
        );

        let inputs = ScoreInputs {
            fresh_ratio: fresh_ratio(&sources),
            match_rate_pct: match_data
                .as_ref()
                .and_then(|m| m.raw.match_rate_pct),
            completeness_pcts: account_data
                .as_ref()
                .map(|a| a.raw.scored_completeness())
                .unwrap_or_default(),
            duplicate_count: account_data.as_ref().and_then(|a| a.raw.duplicate_names),
            alignment_pcts: match_data
                .as_ref()
                .map(|m| m.raw.alignment_rates())
                .unwrap_or_default(),
        };
        let health_score = compute_health_score(&inputs, weights, penalty);

        Self {
            sources,
            match_data,
            account_data,
            automation,
            health_status: thresholds.score.classify(health_score as f64),
            health_score,
            last_updated: Instant::now(),
        }
    }

    /// Number of sources synced within the freshness window.
    pub fn fresh_count(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| s.status == FreshnessStatus::Fresh)
            .count()
    }

    /// Total rows across all monitored sources.
    pub fn total_rows(&self) -> u64 {
        self.sources.iter().map(|s| s.row_count).sum()
    }

    /// Classify the fresh-source ratio for the metric card. All sources fresh
    /// is healthy; at or above the warning threshold is a warning; below it,
    /// critical. Empty source list is neutral.
    pub fn fresh_ratio_status(&self, thresholds: &Thresholds) -> StatusLabel {
        if self.sources.is_empty() {
            return StatusLabel::Neutral;
        }
        let pct = self.fresh_count() as f64 / self.sources.len() as f64 * 100.0;
        thresholds.fresh_ratio.classify(pct)
    }

    /// All sources that are not fresh, worst first.
    pub fn stale_sources(&self) -> Vec<&SourceData> {
        let mut stale: Vec<&SourceData> = self
            .sources
            .iter()
            .filter(|s| s.status != FreshnessStatus::Fresh)
            .collect();
        stale.sort_by(|a, b| {
            b.status.cmp(&a.status).then_with(|| {
                b.hours_since_sync
                    .partial_cmp(&a.hours_since_sync)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });
        stale
    }
}

fn fresh_ratio(sources: &[SourceData]) -> Option<f64> {
    if sources.is_empty() {
        return None;
    }
    let fresh = sources
        .iter()
        .filter(|s| s.status == FreshnessStatus::Fresh)
        .count();
    Some(fresh as f64 / sources.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PipelineRow;

    fn defaults() -> (Thresholds, ScoreWeights, DuplicatePenalty) {
        (
            Thresholds::default(),
            ScoreWeights::default(),
            DuplicatePenalty::default(),
        )
    }

    fn pipeline(system: &str, table: &str, hours: f64, rows: u64) -> PipelineRow {
        PipelineRow {
            source_system: system.to_string(),
            table_id: table.to_string(),
            row_count: rows,
            last_sync_at: None,
            hours_since_sync: hours,
        }
    }

    #[test]
    fn test_sources_sorted_critical_first() {
        let (thresholds, weights, penalty) = defaults();
        let snapshot = QualitySnapshot {
            pipelines: vec![
                pipeline("CRM", "accounts", 3.0, 100),
                pipeline("Store", "events", 90.0, 200),
                pipeline("Sync", "contacts", 30.0, 50),
            ],
            ..Default::default()
        };

        let data = QualityData::from_snapshot(snapshot, &thresholds, &weights, &penalty);
        assert_eq!(data.sources[0].table, "events");
        assert_eq!(data.sources[0].status, FreshnessStatus::Critical);
        assert_eq!(data.sources[1].table, "contacts");
        assert_eq!(data.sources[2].table, "accounts");

        assert_eq!(data.fresh_count(), 1);
        assert_eq!(data.total_rows(), 350);
    }

    #[test]
    fn test_stale_sources_worst_first() {
        let (thresholds, weights, penalty) = defaults();
        let snapshot = QualitySnapshot {
            pipelines: vec![
                pipeline("A", "t1", 30.0, 0),
                pipeline("B", "t2", 100.0, 0),
                pipeline("C", "t3", 40.0, 0),
                pipeline("D", "t4", 5.0, 0),
            ],
            ..Default::default()
        };

        let data = QualityData::from_snapshot(snapshot, &thresholds, &weights, &penalty);
        let stale = data.stale_sources();
        assert_eq!(stale.len(), 3);
        assert_eq!(stale[0].system, "B");
        assert_eq!(stale[1].system, "C");
        assert_eq!(stale[2].system, "A");
    }

    #[test]
    fn test_empty_snapshot_scores_zero() {
        let (thresholds, weights, penalty) = defaults();
        let data = QualityData::from_snapshot(
            QualitySnapshot::default(),
            &thresholds,
            &weights,
            &penalty,
        );
        assert_eq!(data.health_score, 0);
        assert_eq!(data.health_status, StatusLabel::Critical);
        assert_eq!(data.fresh_ratio_status(&thresholds), StatusLabel::Neutral);
        assert!(data.automation.is_none());
    }

    #[test]
    fn test_metric_classification() {
        let (thresholds, weights, penalty) = defaults();
        let snapshot = QualitySnapshot {
            crm_match: Some(MatchStats {
                match_rate_pct: Some(92.0),
                chain_hq_coverage_pct: Some(55.0),
                ..Default::default()
            }),
            crm_accounts: Some(AccountStats {
                duplicate_names: Some(2400),
                name_completeness: Some(99.0),
                address_completeness: Some(65.0),
                active_rate_pct: Some(2.0),
                ..Default::default()
            }),
            ..Default::default()
        };

        let data = QualityData::from_snapshot(snapshot, &thresholds, &weights, &penalty);

        let match_data = data.match_data.unwrap();
        assert_eq!(match_data.match_rate.unwrap().status, StatusLabel::Healthy);
        assert_eq!(
            match_data.chain_coverage.unwrap().status,
            StatusLabel::Warning
        );
        assert!(match_data.distributor_rate.is_none());

        let accounts = data.account_data.unwrap();
        assert_eq!(accounts.duplicates.unwrap().status, StatusLabel::Warning);
        assert_eq!(accounts.active_rate.unwrap().status, StatusLabel::Warning);
        assert_eq!(accounts.completeness.len(), 2);
    }

    #[test]
    fn test_full_snapshot_scoring() {
        // All sources fresh, 92% match, completeness {99, 80, 61} with 2500
        // duplicates: 40 + 27.6 + (24 - 5) = 86.6 -> 87, healthy.
        let (thresholds, weights, penalty) = defaults();
        let snapshot = QualitySnapshot {
            pipelines: vec![pipeline("CRM", "accounts", 2.0, 1000)],
            crm_match: Some(MatchStats {
                match_rate_pct: Some(92.0),
                ..Default::default()
            }),
            crm_accounts: Some(AccountStats {
                name_completeness: Some(99.0),
                address_completeness: Some(80.0),
                phone_completeness: Some(61.0),
                duplicate_names: Some(2500),
                ..Default::default()
            }),
            ..Default::default()
        };

        let data = QualityData::from_snapshot(snapshot, &thresholds, &weights, &penalty);
        assert_eq!(data.health_score, 87);
        assert_eq!(data.health_status, StatusLabel::Healthy);
    }

    #[test]
    fn test_execution_totals() {
        let executions = vec![
            ExecutionInfo {
                finished: true,
                stopped_at: None,
            },
            ExecutionInfo {
                finished: true,
                stopped_at: Some("2026-08-25T03:12:00Z".to_string()),
            },
            ExecutionInfo {
                finished: false,
                stopped_at: None,
            },
        ];
        let totals = ExecutionTotals::from_executions(&executions);
        assert_eq!(totals.total, 3);
        assert_eq!(totals.succeeded, 1);
        assert_eq!(totals.failed, 1);
    }

    #[test]
    fn test_automation_connection_health() {
        let connections = vec![
            ConnectionInfo {
                name: "CRM -> warehouse".to_string(),
                status: "active".to_string(),
            },
            ConnectionInfo {
                name: "Store -> warehouse".to_string(),
                status: "inactive".to_string(),
            },
        ];
        let automation =
            AutomationData::from_parts(Some(&connections), None, None).unwrap();
        assert!(automation.connections[0].healthy);
        assert!(!automation.connections[1].healthy);
    }
}
