//! Shared types for quality snapshots.
//!
//! These types match the JSON export produced by the warehouse's data-quality
//! views, plus the optional payloads of the two workflow-automation APIs.
//! They are the common format between the exporter and this viewer; everything
//! beyond the pipeline table is optional and missing fields default to absent.

use serde::{Deserialize, Serialize};

/// A complete snapshot of data-quality state at one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualitySnapshot {
    /// One row per monitored warehouse table.
    #[serde(default)]
    pub pipelines: Vec<PipelineRow>,

    /// Single-row scalar set with CRM match and alignment metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crm_match: Option<MatchStats>,

    /// Single-row scalar set with CRM account completeness metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crm_accounts: Option<AccountStats>,

    /// Sync-service connections, when the export embeds them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ConnectionInfo>>,

    /// Workflow-service workflows, when the export embeds them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Vec<WorkflowInfo>>,

    /// Recent workflow executions, when the export embeds them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executions: Option<Vec<ExecutionInfo>>,
}

/// Freshness row for one monitored table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRow {
    /// Originating system ("CRM", "Object Store", ...).
    pub source_system: String,
    /// Warehouse table identifier.
    pub table_id: String,
    #[serde(default)]
    pub row_count: u64,
    /// Timestamp of the last recorded sync, as exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<String>,
    /// Elapsed hours since that sync.
    pub hours_since_sync: f64,
}

/// CRM match quality scalars. Field absence means the metric was not computed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_accounts: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unmatched: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_rate_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_hq_coverage_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains_with_hq: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_chains: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_match_rate_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributors_matched: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_distributors: Option<u64>,
}

impl MatchStats {
    /// The alignment-rate percentages that were reported (chain HQ coverage
    /// and distributor match rate).
    pub fn alignment_rates(&self) -> Vec<f64> {
        [self.chain_hq_coverage_pct, self.distributor_match_rate_pct]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// CRM account quality scalars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_accounts: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_accounts: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_coverage_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_last_90d: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_rate_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_completeness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_completeness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_completeness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_completeness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_names: Option<u64>,
}

impl AccountStats {
    /// The completeness percentages that were actually reported, in a fixed
    /// order (name, address, phone). Email completeness is display-only and
    /// excluded from scoring, matching the dashboard's blend.
    pub fn scored_completeness(&self) -> Vec<f64> {
        [
            self.name_completeness,
            self.address_completeness,
            self.phone_completeness,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// One sync-service connection, as returned by its API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    #[serde(default)]
    pub name: String,
    /// Connection status string; "active" means healthy.
    #[serde(default)]
    pub status: String,
}

/// One workflow, as returned by the workflow-service API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// One recent workflow execution.
///
/// An execution counts as succeeded when it finished and was not stopped;
/// a set `stoppedAt` marks a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionInfo {
    #[serde(default)]
    pub finished: bool,
    #[serde(default, rename = "stoppedAt", skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "pipelines": [
                {
                    "source_system": "CRM",
                    "table_id": "accounts",
                    "row_count": 120000,
                    "last_sync_at": "2026-08-25T04:00:00Z",
                    "hours_since_sync": 6.5
                }
            ],
            "crm_match": {
                "match_rate_pct": 92.4,
                "matched": 4521,
                "unmatched": 371
            },
            "crm_accounts": {
                "name_completeness": 99.8,
                "address_completeness": 71.0,
                "duplicate_names": 2310
            },
            "workflows": [
                { "name": "Nightly enrichment", "active": true }
            ],
            "executions": [
                { "finished": true },
                { "finished": false, "stoppedAt": "2026-08-25T03:12:00Z" }
            ]
        }"#;

        let snapshot: QualitySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.pipelines.len(), 1);
        assert_eq!(snapshot.pipelines[0].source_system, "CRM");
        assert_eq!(snapshot.pipelines[0].hours_since_sync, 6.5);

        let crm_match = snapshot.crm_match.unwrap();
        assert_eq!(crm_match.match_rate_pct, Some(92.4));
        assert!(crm_match.chain_hq_coverage_pct.is_none());
        assert!(crm_match.alignment_rates().is_empty());

        let accounts = snapshot.crm_accounts.unwrap();
        assert_eq!(accounts.duplicate_names, Some(2310));
        // Phone completeness absent: only two fields are scored.
        assert_eq!(accounts.scored_completeness(), vec![99.8, 71.0]);

        assert!(snapshot.connections.is_none());
        assert_eq!(snapshot.workflows.unwrap().len(), 1);

        let executions = snapshot.executions.unwrap();
        assert!(executions[0].stopped_at.is_none());
        assert_eq!(
            executions[1].stopped_at.as_deref(),
            Some("2026-08-25T03:12:00Z")
        );
    }

    #[test]
    fn test_empty_snapshot_deserializes() {
        let snapshot: QualitySnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.pipelines.is_empty());
        assert!(snapshot.crm_match.is_none());
        assert!(snapshot.crm_accounts.is_none());
    }

    #[test]
    fn test_alignment_rates() {
        let stats = MatchStats {
            chain_hq_coverage_pct: Some(72.0),
            distributor_match_rate_pct: Some(94.0),
            ..Default::default()
        };
        assert_eq!(stats.alignment_rates(), vec![72.0, 94.0]);
    }
}
