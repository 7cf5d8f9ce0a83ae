//! @ai:module:intent Statistical aggregation of pair outcomes
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait
//! @ai:module:stateless true

use crate::answer::AnswerCategory;
use crate::evaluator::PairOutcome;
use crate::metrics::types::{AggregateStats, CategoryStats, EvaluationResults};
use std::collections::BTreeMap;

/// @ai:intent Trait for metrics aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Aggregate pair outcomes into evaluation results
    fn aggregate(&self, outcomes: Vec<PairOutcome>, judge_model: &str) -> EvaluationResults;
}

/// @ai:intent Aggregates outcomes overall, per reference category and per method
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Calculate aggregate stats for a set of outcomes
    /// @ai:effects pure
    fn calculate_aggregate(outcomes: &[&PairOutcome]) -> AggregateStats {
        if outcomes.is_empty() {
            return AggregateStats::default();
        }

        let total = outcomes.len() as u32;
        let failed = outcomes.iter().filter(|o| o.failed()).count() as u32;
        let equal = outcomes
            .iter()
            .filter(|o| !o.failed() && o.is_equal)
            .count() as u32;
        let compared = total - failed;

        let accuracy = if compared == 0 {
            0.0
        } else {
            (equal as f64 / compared as f64) * 100.0
        };

        AggregateStats {
            total,
            equal,
            not_equal: compared - equal,
            failed,
            accuracy,
            avg_elapsed_ms: average(outcomes.iter().map(|o| o.elapsed_ms as f64)),
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Calculate average of an iterator of f64
/// @ai:effects pure
fn average<I: Iterator<Item = f64>>(iter: I) -> f64 {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Aggregate outcomes into evaluation results
    /// @ai:post by_category follows the category declaration order and skips empty categories
    /// @ai:effects time
    fn aggregate(&self, outcomes: Vec<PairOutcome>, judge_model: &str) -> EvaluationResults {
        let all: Vec<&PairOutcome> = outcomes.iter().collect();
        let overall = Self::calculate_aggregate(&all);

        let mut grouped: BTreeMap<AnswerCategory, Vec<&PairOutcome>> = BTreeMap::new();
        for outcome in &outcomes {
            grouped
                .entry(outcome.reference_category)
                .or_default()
                .push(outcome);
        }

        let by_category = grouped
            .into_iter()
            .map(|(category, members)| CategoryStats {
                category,
                stats: Self::calculate_aggregate(&members),
            })
            .collect();

        let mut by_method = BTreeMap::new();
        for method in outcomes.iter().filter_map(|o| o.method()) {
            *by_method.entry(method.to_string()).or_insert(0) += 1;
        }

        EvaluationResults {
            timestamp: chrono::Utc::now().to_rfc3339(),
            judge_model: judge_model.to_string(),
            overall,
            by_category,
            by_method,
            outcomes,
        }
    }
}
