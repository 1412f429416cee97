//! Application state and navigation logic.

use anyhow::Result;

use crate::config::DashboardConfig;
use crate::data::{FreshnessStatus, History, QualityData, SourceData};
use crate::source::{AutomationFetcher, DataSource, QualitySnapshot};
use crate::ui::freshness::FreshnessSortColumn;
use crate::ui::overview::SortColumn;
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Source detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Metric cards and all monitored sources with freshness status.
    Overview,
    /// Sources that have gone stale and need attention.
    Freshness,
    /// Sync connections, workflows, and recent execution totals.
    Automation,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Freshness,
            View::Freshness => View::Automation,
            View::Automation => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Automation,
            View::Freshness => View::Overview,
            View::Automation => View::Freshness,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Freshness => "Freshness",
            View::Automation => "Automation",
        }
    }
}

/// Saved state for returning to a previous view.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub view: View,
    pub selected_source_index: usize,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    last_snapshot: Option<QualitySnapshot>,
    pub automation: Option<AutomationFetcher>,
    pub data: Option<QualityData>,
    pub history: History,
    pub load_error: Option<String>,
    pub config: DashboardConfig,

    // Navigation state
    pub selected_source_index: usize,
    pub view_stack: Vec<ViewState>,

    // Sorting (Overview view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Sorting (Freshness view)
    pub freshness_sort_column: FreshnessSortColumn,
    pub freshness_sort_ascending: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App with the given data source and configuration.
    pub fn new(source: Box<dyn DataSource>, config: DashboardConfig) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_detail_overlay: false,
            source,
            last_snapshot: None,
            automation: None,
            data: None,
            history: History::new(),
            load_error: None,
            config,
            selected_source_index: 0,
            view_stack: Vec::new(),
            sort_column: SortColumn::default(),
            sort_ascending: true,
            freshness_sort_column: FreshnessSortColumn::default(),
            freshness_sort_ascending: false, // Default descending (critical first)
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Attach the workflow-automation fetcher (when credentials exist).
    pub fn with_automation(mut self, fetcher: Option<AutomationFetcher>) -> Self {
        self.automation = fetcher;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Pop the view stack and restore previous state.
    pub fn pop_view(&mut self) -> bool {
        if let Some(state) = self.view_stack.pop() {
            self.current_view = state.view;
            self.selected_source_index = state.selected_source_index;
            true
        } else {
            false
        }
    }

    /// Get breadcrumb trail for current navigation.
    pub fn breadcrumb(&self) -> String {
        let mut parts: Vec<&str> = self.view_stack.iter().map(|s| s.view.label()).collect();
        parts.push(self.current_view.label());
        parts.join(" > ")
    }

    /// Poll the data source (and the automation APIs when due) for new data.
    ///
    /// Returns Ok(true) if the displayed data was recomputed, Ok(false) if
    /// nothing changed, or Err if there was an error.
    pub fn reload_data(&mut self) -> Result<bool> {
        // Check for errors from the source
        if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
            return Ok(false);
        }

        let new_snapshot = self.source.poll();

        // Re-fetch the automation APIs only once their cache TTL expires
        let mut automation_changed = false;
        if let Some(ref mut fetcher) = self.automation {
            let before = fetcher.fetched_at();
            let _ = fetcher.poll();
            automation_changed = fetcher.fetched_at() != before;
        }

        if new_snapshot.is_some() {
            self.last_snapshot = new_snapshot;
        } else if !automation_changed {
            // Surface an error the poll itself just raised
            if let Some(err) = self.source.error() {
                self.load_error = Some(err.to_string());
            }
            return Ok(false);
        }

        let Some(mut snapshot) = self.last_snapshot.clone() else {
            return Ok(false);
        };
        if let Some(ref fetcher) = self.automation {
            fetcher.cached().merge_into(&mut snapshot);
        }

        let data = QualityData::from_snapshot(
            snapshot,
            &self.config.thresholds,
            &self.config.score.weights,
            &self.config.score.penalty,
        );

        // Record history before updating
        self.history.record(&data);
        self.data = Some(data);
        self.load_error = None;

        // Clamp selection indices
        if let Some(ref data) = self.data {
            if self.selected_source_index >= data.sources.len() {
                self.selected_source_index = data.sources.len().saturating_sub(1);
            }
        }
        Ok(true)
    }

    /// Switch to the next view (cycles Overview → Freshness → Automation).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
        self.selected_source_index = 0;
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
        self.selected_source_index = 0;
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_source_index = 0;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let count = self.current_list_len();
        if count > 0 {
            self.selected_source_index = (self.selected_source_index + n).min(count - 1);
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_source_index = self.selected_source_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_source_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let count = self.current_list_len();
        self.selected_source_index = count.saturating_sub(1);
    }

    /// Number of selectable rows in the current view, after filtering.
    pub fn current_list_len(&self) -> usize {
        let Some(ref data) = self.data else {
            return 0;
        };
        match self.current_view {
            View::Overview => data
                .sources
                .iter()
                .filter(|s| self.matches_filter(s))
                .count(),
            View::Freshness => data
                .stale_sources()
                .iter()
                .filter(|s| self.matches_filter(s))
                .count(),
            // Automation view has no row selection
            View::Automation => 0,
        }
    }

    /// The source behind the currently selected visual row, resolving the
    /// active view's sorting and filtering.
    pub fn selected_source(&self) -> Option<SourceData> {
        let data = self.data.as_ref()?;

        match self.current_view {
            View::Overview => {
                let mut sources: Vec<&SourceData> =
                    data.sources.iter().filter(|s| self.matches_filter(s)).collect();
                crate::ui::overview::sort_sources_by(
                    &mut sources,
                    self.sort_column,
                    self.sort_ascending,
                );
                sources.get(self.selected_source_index).map(|s| (*s).clone())
            }
            View::Freshness => {
                let mut stale: Vec<&SourceData> = data
                    .stale_sources()
                    .into_iter()
                    .filter(|s| self.matches_filter(s))
                    .collect();
                crate::ui::freshness::sort_stale_by(
                    &mut stale,
                    self.freshness_sort_column,
                    self.freshness_sort_ascending,
                );
                stale.get(self.selected_source_index).map(|s| (*s).clone())
            }
            View::Automation => None,
        }
    }

    /// Open the detail overlay for the currently selected source.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Overview || self.current_view == View::Freshness {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then pop view stack, then go to Overview.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if !self.pop_view() {
            if self.current_view != View::Overview {
                self.current_view = View::Overview;
            }
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column for the current view.
    pub fn cycle_sort(&mut self) {
        match self.current_view {
            View::Overview => self.sort_column = self.sort_column.next(),
            View::Freshness => {
                self.freshness_sort_column = self.freshness_sort_column.next()
            }
            _ => {}
        }
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        match self.current_view {
            View::Overview => self.sort_ascending = !self.sort_ascending,
            View::Freshness => {
                self.freshness_sort_ascending = !self.freshness_sort_ascending
            }
            _ => {}
        }
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a source matches the current filter (system or table name).
    pub fn matches_filter(&self, source: &SourceData) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let search = self.filter_text.to_lowercase();
        source.system.to_lowercase().contains(&search)
            || source.table.to_lowercase().contains(&search)
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a JSON file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        use std::io::Write;

        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };

        let mut export = serde_json::Map::new();

        // Summary
        let mut summary = serde_json::Map::new();
        summary.insert(
            "health_score".to_string(),
            serde_json::json!(data.health_score),
        );
        summary.insert(
            "health_status".to_string(),
            serde_json::json!(format!("{:?}", data.health_status)),
        );
        summary.insert(
            "total_sources".to_string(),
            serde_json::json!(data.sources.len()),
        );

        let fresh = data.fresh_count();
        let stale = data
            .sources
            .iter()
            .filter(|s| s.status == FreshnessStatus::Stale)
            .count();
        let critical = data
            .sources
            .iter()
            .filter(|s| s.status == FreshnessStatus::Critical)
            .count();

        summary.insert("fresh".to_string(), serde_json::json!(fresh));
        summary.insert("stale".to_string(), serde_json::json!(stale));
        summary.insert("critical".to_string(), serde_json::json!(critical));
        summary.insert(
            "total_rows".to_string(),
            serde_json::json!(data.total_rows()),
        );

        export.insert("summary".to_string(), serde_json::Value::Object(summary));

        // Sources
        let sources: Vec<serde_json::Value> = data
            .sources
            .iter()
            .map(|s| {
                serde_json::json!({
                    "source_system": s.system,
                    "table_id": s.table,
                    "row_count": s.row_count,
                    "hours_since_sync": s.hours_since_sync,
                    "last_sync_at": s.last_sync_at,
                    "status": format!("{:?}", s.status)
                })
            })
            .collect();
        export.insert("sources".to_string(), serde_json::Value::Array(sources));

        // Automation, when present
        if let Some(ref automation) = data.automation {
            let mut auto = serde_json::Map::new();
            auto.insert(
                "connections".to_string(),
                serde_json::Value::Array(
                    automation
                        .connections
                        .iter()
                        .map(|c| {
                            serde_json::json!({
                                "name": c.name,
                                "status": c.status,
                                "healthy": c.healthy
                            })
                        })
                        .collect(),
                ),
            );
            auto.insert(
                "workflows".to_string(),
                serde_json::Value::Array(
                    automation
                        .workflows
                        .iter()
                        .map(|w| serde_json::json!({ "name": w.name, "active": w.active }))
                        .collect(),
                ),
            );
            if let Some(totals) = automation.executions {
                auto.insert(
                    "executions".to_string(),
                    serde_json::json!({
                        "total": totals.total,
                        "succeeded": totals.succeeded,
                        "failed": totals.failed
                    }),
                );
            }
            export.insert("automation".to_string(), serde_json::Value::Object(auto));
        }

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, PipelineRow};

    fn snapshot_with_sources(hours: &[f64]) -> QualitySnapshot {
        QualitySnapshot {
            pipelines: hours
                .iter()
                .enumerate()
                .map(|(i, &h)| PipelineRow {
                    source_system: format!("Sys{}", i),
                    table_id: format!("table_{}", i),
                    row_count: 100,
                    last_sync_at: None,
                    hours_since_sync: h,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn app_with_data(hours: &[f64]) -> App {
        let (tx, source) = ChannelSource::create("test");
        tx.send(snapshot_with_sources(hours)).unwrap();
        let mut app = App::new(Box::new(source), DashboardConfig::default());
        app.reload_data().unwrap();
        app
    }

    #[test]
    fn test_reload_populates_data() {
        let app = app_with_data(&[2.0, 30.0, 60.0]);
        let data = app.data.as_ref().unwrap();
        assert_eq!(data.sources.len(), 3);
        assert_eq!(data.fresh_count(), 1);
    }

    #[test]
    fn test_view_cycle() {
        let mut app = app_with_data(&[2.0]);
        assert_eq!(app.current_view, View::Overview);
        app.next_view();
        assert_eq!(app.current_view, View::Freshness);
        app.next_view();
        assert_eq!(app.current_view, View::Automation);
        app.next_view();
        assert_eq!(app.current_view, View::Overview);
        app.prev_view();
        assert_eq!(app.current_view, View::Automation);
    }

    #[test]
    fn test_selection_clamped_to_filtered_list() {
        let mut app = app_with_data(&[2.0, 3.0, 4.0]);
        app.select_last();
        assert_eq!(app.selected_source_index, 2);
        app.select_next();
        assert_eq!(app.selected_source_index, 2);

        app.filter_text = "table_1".to_string();
        assert_eq!(app.current_list_len(), 1);
    }

    #[test]
    fn test_selected_source_resolves_sorting() {
        let mut app = app_with_data(&[2.0, 90.0]);
        // Overview sorts critical first by default parse order; selection 0
        // must be the critical source after the default name sort is applied.
        app.sort_column = SortColumn::Status;
        app.sort_ascending = false;
        let selected = app.selected_source().unwrap();
        assert_eq!(selected.hours_since_sync, 90.0);
    }

    #[test]
    fn test_freshness_view_selects_stale_only() {
        let mut app = app_with_data(&[2.0, 30.0, 60.0]);
        app.set_view(View::Freshness);
        assert_eq!(app.current_list_len(), 2);
        let selected = app.selected_source().unwrap();
        // Worst first by default
        assert_eq!(selected.hours_since_sync, 60.0);
    }

    #[test]
    fn test_go_back_closes_overlay_first() {
        let mut app = app_with_data(&[2.0]);
        app.enter_detail();
        assert!(app.show_detail_overlay);
        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Overview);
    }

    #[test]
    fn test_export_state() {
        let app = app_with_data(&[2.0, 60.0]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["summary"]["total_sources"], 2);
        assert_eq!(value["summary"]["fresh"], 1);
        assert_eq!(value["sources"].as_array().unwrap().len(), 2);
    }
}
