//! Channel-based data source.
//!
//! Receives quality snapshots via a tokio watch channel.
//! This is useful for embedding the dashboard in a host process that
//! produces snapshots itself instead of exporting them to a file.

use tokio::sync::watch;

use super::{DataSource, QualitySnapshot};

/// A data source that receives quality snapshots via a channel.
///
/// The producer (e.g., an in-process exporter) sends snapshots through the
/// channel, and this source provides them to the TUI.
///
/// # Example
///
/// ```
/// use dq_doctor::ChannelSource;
///
/// // Create a channel pair
/// let (tx, source) = ChannelSource::create("warehouse-exporter");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<QualitySnapshot>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - A description of where snapshots come from
    pub fn new(receiver: watch::Receiver<QualitySnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    ///
    /// Returns (sender, source) where the sender can be used to push
    /// snapshots and the source can be used with the TUI.
    pub fn create(source_description: &str) -> (watch::Sender<QualitySnapshot>, Self) {
        let (tx, rx) = watch::channel(QualitySnapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<QualitySnapshot> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        // Check if there's a new value without blocking
        if self.receiver.has_changed().unwrap_or(false) {
            let snapshot = self.receiver.borrow_and_update().clone();
            Some(snapshot)
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // Channel sources don't have file-based errors; a dropped sender
        // simply stops producing new snapshots.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PipelineRow;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) snapshot
        let snapshot = source.poll();
        assert!(snapshot.is_some());
        assert!(snapshot.unwrap().pipelines.is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        // Send a new snapshot
        let new_snapshot = QualitySnapshot {
            pipelines: vec![PipelineRow {
                source_system: "CRM".to_string(),
                table_id: "accounts".to_string(),
                row_count: 10,
                last_sync_at: None,
                hours_since_sync: 1.0,
            }],
            ..Default::default()
        };
        tx.send(new_snapshot).unwrap();

        // Now poll returns the new snapshot
        let snapshot = source.poll();
        assert!(snapshot.is_some());
        assert_eq!(snapshot.unwrap().pipelines.len(), 1);
    }
}
