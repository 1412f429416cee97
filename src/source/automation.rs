//! Workflow-automation API clients.
//!
//! Two optional HTTP integrations feed the automation view: a sync service
//! listing warehouse ingestion connections, and a workflow service listing
//! workflows and their recent executions. Both are bearer-token GET endpoints
//! returning `{ "data": [...] }` JSON lists.
//!
//! Calls are best-effort and single-attempt with a fixed timeout. Results are
//! cached and only re-fetched once the cache TTL has passed. Any failure
//! degrades to "no data" (the UI falls back to warehouse sync times) and is
//! logged as a warning; it is never fatal.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::snapshot::{ConnectionInfo, ExecutionInfo, QualitySnapshot, WorkflowInfo};

/// Request timeout for both APIs.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How many recent executions to ask the workflow service for.
const EXECUTION_LIMIT: usize = 50;

/// Default cache TTL between fetches.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Configuration for the sync-service API.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncApiConfig {
    pub base_url: String,
    pub workspace_id: String,
    pub api_token: String,
}

/// Configuration for the workflow-service API.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowApiConfig {
    pub api_url: String,
    pub api_key: String,
}

/// The automation sections fetched from the APIs in one pass.
///
/// A `None` section means that API is unconfigured or its last fetch failed.
#[derive(Debug, Clone, Default)]
pub struct AutomationSnapshot {
    pub connections: Option<Vec<ConnectionInfo>>,
    pub workflows: Option<Vec<WorkflowInfo>>,
    pub executions: Option<Vec<ExecutionInfo>>,
}

impl AutomationSnapshot {
    pub fn is_empty(&self) -> bool {
        self.connections.is_none() && self.workflows.is_none() && self.executions.is_none()
    }

    /// Overlay the fetched sections onto a warehouse snapshot. Sections the
    /// APIs provided replace any embedded in the export.
    pub fn merge_into(&self, snapshot: &mut QualitySnapshot) {
        if self.connections.is_some() {
            snapshot.connections = self.connections.clone();
        }
        if self.workflows.is_some() {
            snapshot.workflows = self.workflows.clone();
        }
        if self.executions.is_some() {
            snapshot.executions = self.executions.clone();
        }
    }
}

/// List envelope used by both APIs.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// Fetches and caches automation state from the configured APIs.
///
/// Absence of credentials means absence of the feature: when neither API is
/// configured, [`AutomationFetcher::from_configs`] returns `None` and the
/// dashboard shows its fallback display.
#[derive(Debug)]
pub struct AutomationFetcher {
    client: Client,
    sync_api: Option<SyncApiConfig>,
    workflow_api: Option<WorkflowApiConfig>,
    cache_ttl: Duration,
    fetched_at: Option<Instant>,
    cached: AutomationSnapshot,
}

impl AutomationFetcher {
    /// Build a fetcher from the optional API configurations.
    pub fn from_configs(
        sync_api: Option<SyncApiConfig>,
        workflow_api: Option<WorkflowApiConfig>,
        cache_ttl: Duration,
    ) -> Result<Option<Self>> {
        if sync_api.is_none() && workflow_api.is_none() {
            return Ok(None);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Some(Self {
            client,
            sync_api,
            workflow_api,
            cache_ttl,
            fetched_at: None,
            cached: AutomationSnapshot::default(),
        }))
    }

    /// Return the current automation state, fetching only when the cached
    /// state is older than the TTL. Each endpoint gets a single attempt per
    /// fetch; failures leave its section empty until the next TTL expiry.
    pub fn poll(&mut self) -> &AutomationSnapshot {
        let stale = self
            .fetched_at
            .map_or(true, |at| at.elapsed() >= self.cache_ttl);

        if stale {
            self.cached = self.fetch();
            self.fetched_at = Some(Instant::now());
        }

        &self.cached
    }

    /// When the cache was last refreshed, if ever.
    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    /// The currently cached automation state without triggering a fetch.
    pub fn cached(&self) -> &AutomationSnapshot {
        &self.cached
    }

    fn fetch(&self) -> AutomationSnapshot {
        let mut snapshot = AutomationSnapshot::default();

        if let Some(ref cfg) = self.sync_api {
            match self.fetch_connections(cfg) {
                Ok(connections) => {
                    debug!(count = connections.len(), "fetched sync connections");
                    snapshot.connections = Some(connections);
                }
                Err(e) => warn!("sync API unavailable: {:#}", e),
            }
        }

        if let Some(ref cfg) = self.workflow_api {
            match self.fetch_workflows(cfg) {
                Ok(workflows) => {
                    debug!(count = workflows.len(), "fetched workflows");
                    snapshot.workflows = Some(workflows);
                }
                Err(e) => warn!("workflow API unavailable: {:#}", e),
            }

            // Executions are secondary; skip quietly if unavailable
            if snapshot.workflows.is_some() {
                match self.fetch_executions(cfg) {
                    Ok(executions) => snapshot.executions = Some(executions),
                    Err(e) => debug!("execution list unavailable: {:#}", e),
                }
            }
        }

        snapshot
    }

    fn fetch_connections(&self, cfg: &SyncApiConfig) -> Result<Vec<ConnectionInfo>> {
        let url = format!("{}/v1/connections", cfg.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(&cfg.api_token)
            .query(&[("workspaceId", cfg.workspace_id.as_str())])
            .send()?;

        if !response.status().is_success() {
            bail!("API returned status {}", response.status());
        }

        let list: ListResponse<ConnectionInfo> = response.json()?;
        Ok(list.data)
    }

    fn fetch_workflows(&self, cfg: &WorkflowApiConfig) -> Result<Vec<WorkflowInfo>> {
        let url = format!("{}/api/v1/workflows", cfg.api_url.trim_end_matches('/'));

        let response = self.client.get(&url).bearer_auth(&cfg.api_key).send()?;

        if !response.status().is_success() {
            bail!("API returned status {}", response.status());
        }

        let list: ListResponse<WorkflowInfo> = response.json()?;
        Ok(list.data)
    }

    fn fetch_executions(&self, cfg: &WorkflowApiConfig) -> Result<Vec<ExecutionInfo>> {
        let url = format!("{}/api/v1/executions", cfg.api_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(&cfg.api_key)
            .query(&[("limit", EXECUTION_LIMIT)])
            .send()?;

        if !response.status().is_success() {
            bail!("API returned status {}", response.status());
        }

        let list: ListResponse<ExecutionInfo> = response.json()?;
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_credentials_no_fetcher() {
        let fetcher =
            AutomationFetcher::from_configs(None, None, DEFAULT_CACHE_TTL).unwrap();
        assert!(fetcher.is_none());
    }

    #[test]
    fn test_fetcher_with_credentials() {
        let fetcher = AutomationFetcher::from_configs(
            Some(SyncApiConfig {
                base_url: "https://sync.example.com/api".to_string(),
                workspace_id: "ws-1".to_string(),
                api_token: "token".to_string(),
            }),
            None,
            DEFAULT_CACHE_TTL,
        )
        .unwrap();
        assert!(fetcher.is_some());
    }

    #[test]
    fn test_list_envelope_parsing() {
        let json = r#"{ "data": [
            { "name": "CRM -> warehouse", "status": "active" },
            { "name": "Store -> warehouse", "status": "inactive" }
        ]}"#;
        let list: ListResponse<ConnectionInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].status, "active");
    }

    #[test]
    fn test_list_envelope_missing_data() {
        let list: ListResponse<WorkflowInfo> = serde_json::from_str("{}").unwrap();
        assert!(list.data.is_empty());
    }

    #[test]
    fn test_merge_into_replaces_embedded_sections() {
        let mut snapshot = QualitySnapshot {
            workflows: Some(vec![WorkflowInfo {
                name: "embedded".to_string(),
                active: false,
            }]),
            ..Default::default()
        };

        let fetched = AutomationSnapshot {
            connections: None,
            workflows: Some(vec![WorkflowInfo {
                name: "live".to_string(),
                active: true,
            }]),
            executions: None,
        };

        fetched.merge_into(&mut snapshot);
        let workflows = snapshot.workflows.unwrap();
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].name, "live");
        assert!(snapshot.connections.is_none());
    }
}
