//! Overall health score aggregation.
//!
//! Blends the independently sourced quality dimensions into a single 0-100
//! score: a weighted sum where each dimension contributes
//! `(ratio_or_pct / 100) * weight`. Missing dimensions contribute nothing,
//! and a duplicate-count penalty is charged against the completeness
//! dimension before flooring it at zero.

use anyhow::{bail, Result};
use serde::Deserialize;

/// Weight (in points out of 100) for each quality dimension.
///
/// Weights are fixed per dashboard variant and must sum to 100 so the score
/// stays on a 0-100 scale. A weight of 0 disables a dimension.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub freshness: f64,
    pub match_rate: f64,
    pub completeness: f64,
    pub alignment: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            freshness: 40.0,
            match_rate: 30.0,
            completeness: 30.0,
            alignment: 0.0,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<()> {
        let sum = self.freshness + self.match_rate + self.completeness + self.alignment;
        if (sum - 100.0).abs() > f64::EPSILON * 100.0 {
            bail!("score weights must sum to 100, got {}", sum);
        }
        if [
            self.freshness,
            self.match_rate,
            self.completeness,
            self.alignment,
        ]
        .iter()
        .any(|w| *w < 0.0)
        {
            bail!("score weights must be non-negative");
        }
        Ok(())
    }
}

/// Penalty charged against the completeness sub-score for duplicate records.
///
/// The penalty is `min(cap, duplicate_count / divisor)` points.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DuplicatePenalty {
    pub cap: f64,
    pub divisor: f64,
}

impl Default for DuplicatePenalty {
    fn default() -> Self {
        Self {
            cap: 20.0,
            divisor: 500.0,
        }
    }
}

impl DuplicatePenalty {
    pub fn points(&self, duplicate_count: u64) -> f64 {
        (duplicate_count as f64 / self.divisor).min(self.cap)
    }
}

/// Raw inputs for one score computation, gathered from the latest snapshot.
///
/// Every field is optional: an empty or unavailable metric source simply
/// leaves its dimension at zero.
#[derive(Debug, Clone, Default)]
pub struct ScoreInputs {
    /// Fraction of sources synced within the freshness window, in [0,1].
    pub fresh_ratio: Option<f64>,
    /// CRM match rate percentage.
    pub match_rate_pct: Option<f64>,
    /// Completeness percentages for the fields that were reported.
    pub completeness_pcts: Vec<f64>,
    /// Count of records with duplicate names.
    pub duplicate_count: Option<u64>,
    /// Alignment rate percentages (coverage and match rates) that were reported.
    pub alignment_pcts: Vec<f64>,
}

/// Compute the overall health score.
///
/// Deterministic and side-effect free. The result is rounded and clamped to
/// [0,100]; no dimension can contribute more than its weight or less than 0.
pub fn compute_health_score(
    inputs: &ScoreInputs,
    weights: &ScoreWeights,
    penalty: &DuplicatePenalty,
) -> u8 {
    let freshness = inputs
        .fresh_ratio
        .map(|r| r.clamp(0.0, 1.0) * weights.freshness)
        .unwrap_or(0.0);

    let match_rate = inputs
        .match_rate_pct
        .map(|pct| (pct / 100.0).clamp(0.0, 1.0) * weights.match_rate)
        .unwrap_or(0.0);

    let completeness = if inputs.completeness_pcts.is_empty() {
        0.0
    } else {
        let avg = average(&inputs.completeness_pcts);
        let raw = (avg / 100.0).clamp(0.0, 1.0) * weights.completeness;
        let penalty_points = inputs
            .duplicate_count
            .map(|n| penalty.points(n))
            .unwrap_or(0.0);
        (raw - penalty_points).max(0.0)
    };

    let alignment = if inputs.alignment_pcts.is_empty() {
        0.0
    } else {
        let avg = average(&inputs.alignment_pcts);
        (avg / 100.0).clamp(0.0, 1.0) * weights.alignment
    };

    let total = freshness + match_rate + completeness + alignment;
    total.round().clamp(0.0, 100.0) as u8
}

fn average(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_score_zero() {
        let score = compute_health_score(
            &ScoreInputs::default(),
            &ScoreWeights::default(),
            &DuplicatePenalty::default(),
        );
        assert_eq!(score, 0);
    }

    #[test]
    fn test_perfect_inputs_score_hundred() {
        let inputs = ScoreInputs {
            fresh_ratio: Some(1.0),
            match_rate_pct: Some(100.0),
            completeness_pcts: vec![100.0, 100.0, 100.0],
            duplicate_count: Some(0),
            alignment_pcts: vec![],
        };
        let score = compute_health_score(
            &inputs,
            &ScoreWeights::default(),
            &DuplicatePenalty::default(),
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn test_score_stays_in_range() {
        // Out-of-range inputs are clamped per dimension, so the total can
        // never leave [0,100].
        let inputs = ScoreInputs {
            fresh_ratio: Some(3.0),
            match_rate_pct: Some(250.0),
            completeness_pcts: vec![400.0],
            duplicate_count: None,
            alignment_pcts: vec![900.0],
        };
        let weights = ScoreWeights {
            freshness: 25.0,
            match_rate: 25.0,
            completeness: 25.0,
            alignment: 25.0,
        };
        let score = compute_health_score(&inputs, &weights, &DuplicatePenalty::default());
        assert!(score <= 100);
    }

    #[test]
    fn test_penalty_floors_at_zero() {
        let inputs = ScoreInputs {
            fresh_ratio: Some(1.0),
            match_rate_pct: Some(100.0),
            completeness_pcts: vec![10.0],
            duplicate_count: Some(u64::MAX),
            alignment_pcts: vec![],
        };
        let score = compute_health_score(
            &inputs,
            &ScoreWeights::default(),
            &DuplicatePenalty::default(),
        );
        // Completeness contributes 0 (not negative): 40 + 30 + 0.
        assert_eq!(score, 70);
    }

    #[test]
    fn test_missing_dimension_contributes_zero() {
        let inputs = ScoreInputs {
            fresh_ratio: None,
            match_rate_pct: Some(100.0),
            completeness_pcts: vec![],
            duplicate_count: Some(10_000),
            alignment_pcts: vec![],
        };
        let score = compute_health_score(
            &inputs,
            &ScoreWeights::default(),
            &DuplicatePenalty::default(),
        );
        assert_eq!(score, 30);
    }

    #[test]
    fn test_default_dashboard_blend() {
        // 20/25 fresh sources, 92% match, completeness {90, 80, 70} with
        // 2500 duplicates: 0.8*40 + 0.92*30 + (0.8*30 - 5) = 78.6 -> 79.
        let inputs = ScoreInputs {
            fresh_ratio: Some(0.8),
            match_rate_pct: Some(92.0),
            completeness_pcts: vec![90.0, 80.0, 70.0],
            duplicate_count: Some(2500),
            alignment_pcts: vec![],
        };
        let score = compute_health_score(
            &inputs,
            &ScoreWeights::default(),
            &DuplicatePenalty::default(),
        );
        assert_eq!(score, 79);
    }

    #[test]
    fn test_alignment_variant_blend() {
        // match 92 @ 35, completeness {90, 70} @ 25 with penalty
        // min(10, 300/1000), alignment avg 85 @ 40:
        // 32.2 + (20 - 0.3) + 34 = 85.9 -> 86.
        let inputs = ScoreInputs {
            fresh_ratio: None,
            match_rate_pct: Some(92.0),
            completeness_pcts: vec![90.0, 70.0],
            duplicate_count: Some(300),
            alignment_pcts: vec![90.0, 80.0],
        };
        let weights = ScoreWeights {
            freshness: 0.0,
            match_rate: 35.0,
            completeness: 25.0,
            alignment: 40.0,
        };
        let penalty = DuplicatePenalty {
            cap: 10.0,
            divisor: 1000.0,
        };
        let score = compute_health_score(&inputs, &weights, &penalty);
        assert_eq!(score, 86);
    }

    #[test]
    fn test_weights_validation() {
        assert!(ScoreWeights::default().validate().is_ok());

        let bad = ScoreWeights {
            freshness: 40.0,
            match_rate: 30.0,
            completeness: 40.0,
            alignment: 0.0,
        };
        assert!(bad.validate().is_err());

        let negative = ScoreWeights {
            freshness: 120.0,
            match_rate: -20.0,
            completeness: 0.0,
            alignment: 0.0,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_penalty_points() {
        let penalty = DuplicatePenalty::default();
        assert_eq!(penalty.points(0), 0.0);
        assert_eq!(penalty.points(2500), 5.0);
        assert_eq!(penalty.points(1_000_000), 20.0);
    }
}
