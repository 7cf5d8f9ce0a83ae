//! @ai:module:intent Metric types for evaluation results
//! @ai:module:layer domain
//! @ai:module:public_api AggregateStats, CategoryStats, EvaluationResults
//! @ai:module:stateless true

use crate::answer::AnswerCategory;
use crate::evaluator::PairOutcome;
use serde::Serialize;
use std::collections::BTreeMap;

/// @ai:intent Verdict counts over a group of pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total: u32,
    pub equal: u32,
    pub not_equal: u32,
    pub failed: u32,
    /// Percentage of compared pairs judged equal; failures excluded
    pub accuracy: f64,
    pub avg_elapsed_ms: f64,
}

impl AggregateStats {
    /// @ai:intent Pairs that produced a verdict
    pub fn compared(&self) -> u32 {
        self.total - self.failed
    }
}

/// @ai:intent Statistics for one reference category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: AnswerCategory,
    pub stats: AggregateStats,
}

/// @ai:intent Complete evaluation results
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResults {
    pub timestamp: String,
    pub judge_model: String,
    pub overall: AggregateStats,
    pub by_category: Vec<CategoryStats>,
    /// Number of pairs decided by each comparison method
    pub by_method: BTreeMap<String, u32>,
    pub outcomes: Vec<PairOutcome>,
}

impl EvaluationResults {
    /// @ai:intent Outcomes that raised an error
    pub fn failures(&self) -> impl Iterator<Item = &PairOutcome> {
        self.outcomes.iter().filter(|o| o.failed())
    }

    /// @ai:intent Compared outcomes judged not equal
    pub fn mismatches(&self) -> impl Iterator<Item = &PairOutcome> {
        self.outcomes.iter().filter(|o| !o.failed() && !o.is_equal)
    }
}
