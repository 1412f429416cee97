//! Historical data tracking for sparklines and ingest rates.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use super::quality::QualityData;

/// Maximum number of historical snapshots to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks recent snapshots to enable trend indicators in the UI.
///
/// Records the overall health score and per-source row counts over time for
/// sparklines and row-ingest rate calculations.
#[derive(Debug, Clone)]
pub struct History {
    /// Historical row counts per source (label -> readings).
    pub source_rows: HashMap<String, VecDeque<u64>>,
    /// Historical overall health scores.
    pub scores: VecDeque<u8>,
    /// Timestamps of snapshots for rate calculations.
    pub timestamps: VecDeque<Instant>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            source_rows: HashMap::new(),
            scores: VecDeque::new(),
            timestamps: VecDeque::new(),
        }
    }

    /// Record a new data snapshot
    pub fn record(&mut self, data: &QualityData) {
        for source in &data.sources {
            let rows = self.source_rows.entry(source.label()).or_default();
            rows.push_back(source.row_count);
            if rows.len() > MAX_HISTORY_SIZE {
                rows.pop_front();
            }
        }

        self.scores.push_back(data.health_score);
        if self.scores.len() > MAX_HISTORY_SIZE {
            self.scores.pop_front();
        }

        self.timestamps.push_back(data.last_updated);
        if self.timestamps.len() > MAX_HISTORY_SIZE {
            self.timestamps.pop_front();
        }
    }

    /// Get sparkline data for a source's row counts (normalized to 0-7 for
    /// 8 bar levels). Returns an empty Vec if there's not enough history.
    pub fn get_rows_sparkline(&self, source_label: &str) -> Vec<u8> {
        let Some(values) = self.source_rows.get(source_label) else {
            return Vec::new();
        };

        if values.len() < 2 {
            return Vec::new();
        }

        // Deltas between consecutive readings show ingest activity
        let deltas: Vec<i64> = values
            .iter()
            .zip(values.iter().skip(1))
            .map(|(a, b)| *b as i64 - *a as i64)
            .collect();

        let max = deltas.iter().copied().max().unwrap_or(1).max(1);
        let min = deltas.iter().copied().min().unwrap_or(0).min(0);
        let range = (max - min).max(1) as f64;

        deltas
            .iter()
            .map(|&v| {
                let normalized = ((v - min) as f64 / range * 7.0) as u8;
                normalized.min(7)
            })
            .collect()
    }

    /// Get sparkline data for the health score (normalized to 0-7).
    pub fn get_score_sparkline(&self) -> Vec<u8> {
        if self.scores.len() < 2 {
            return Vec::new();
        }
        // Scores are already on a fixed 0-100 scale
        self.scores.iter().map(|&s| (s / 13).min(7)).collect()
    }

    /// Rate of row growth (rows per second) for a source.
    ///
    /// Returns None if there's not enough history to calculate a rate.
    pub fn get_row_rate(&self, source_label: &str) -> Option<f64> {
        let rows = self.source_rows.get(source_label)?;
        if rows.len() < 2 || self.timestamps.len() < 2 {
            return None;
        }

        let current = *rows.back()?;
        let previous = *rows.get(rows.len() - 2)?;
        let delta = current as i64 - previous as i64;

        let current_time = self.timestamps.back()?;
        let previous_time = self.timestamps.get(self.timestamps.len() - 2)?;
        let elapsed = current_time.duration_since(*previous_time).as_secs_f64();

        if elapsed > 0.0 {
            Some(delta as f64 / elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classify::Thresholds;
    use crate::data::score::{DuplicatePenalty, ScoreWeights};
    use crate::source::{PipelineRow, QualitySnapshot};

    fn data_with_rows(rows: u64) -> QualityData {
        let snapshot = QualitySnapshot {
            pipelines: vec![PipelineRow {
                source_system: "CRM".to_string(),
                table_id: "accounts".to_string(),
                row_count: rows,
                last_sync_at: None,
                hours_since_sync: 1.0,
            }],
            ..Default::default()
        };
        QualityData::from_snapshot(
            snapshot,
            &Thresholds::default(),
            &ScoreWeights::default(),
            &DuplicatePenalty::default(),
        )
    }

    #[test]
    fn test_record_and_sparkline() {
        let mut history = History::new();
        for rows in [100, 150, 150, 400] {
            history.record(&data_with_rows(rows));
        }

        let sparkline = history.get_rows_sparkline("CRM - accounts");
        assert_eq!(sparkline.len(), 3);
        // The largest delta (250) maps to the top bar level
        assert_eq!(*sparkline.last().unwrap(), 7);
    }

    #[test]
    fn test_score_sparkline_scale() {
        let mut history = History::new();
        history.record(&data_with_rows(100));
        history.record(&data_with_rows(100));

        let sparkline = history.get_score_sparkline();
        assert_eq!(sparkline.len(), 2);
        assert!(sparkline.iter().all(|&v| v <= 7));
    }

    #[test]
    fn test_not_enough_history() {
        let mut history = History::new();
        assert!(history.get_rows_sparkline("CRM - accounts").is_empty());
        assert!(history.get_row_rate("CRM - accounts").is_none());

        history.record(&data_with_rows(100));
        assert!(history.get_rows_sparkline("CRM - accounts").is_empty());
        assert!(history.get_score_sparkline().is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new();
        for i in 0..100 {
            history.record(&data_with_rows(i));
        }
        assert_eq!(history.scores.len(), MAX_HISTORY_SIZE);
        assert_eq!(history.timestamps.len(), MAX_HISTORY_SIZE);
        assert_eq!(
            history.source_rows.get("CRM - accounts").unwrap().len(),
            MAX_HISTORY_SIZE
        );
    }

    #[test]
    fn test_row_rate() {
        let mut history = History::new();
        history.record(&data_with_rows(100));
        std::thread::sleep(std::time::Duration::from_millis(20));
        history.record(&data_with_rows(300));

        let rate = history.get_row_rate("CRM - accounts").unwrap();
        assert!(rate > 0.0);
    }
}
