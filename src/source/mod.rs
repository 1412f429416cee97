//! Data source abstraction for receiving quality snapshots.
//!
//! This module provides a trait-based abstraction for receiving quality data
//! from various sources (warehouse export files, in-process channels) plus the
//! optional workflow-automation API clients.

mod automation;
mod channel;
mod file;
mod snapshot;

pub use automation::{AutomationFetcher, AutomationSnapshot, SyncApiConfig, WorkflowApiConfig};
pub use channel::ChannelSource;
pub use file::FileSource;
pub use snapshot::{
    AccountStats, ConnectionInfo, ExecutionInfo, MatchStats, PipelineRow, QualitySnapshot,
    WorkflowInfo,
};

use std::fmt::Debug;

/// Trait for receiving quality data from various sources.
///
/// Implementations of this trait provide quality snapshots from different
/// backends - warehouse export polling or in-memory channels.
///
/// # Example
///
/// ```
/// use dq_doctor::{FileSource, DataSource};
///
/// let mut source = FileSource::new("quality.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} pipelines", snapshot.pipelines.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<QualitySnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last poll.
    fn error(&self) -> Option<&str>;
}
