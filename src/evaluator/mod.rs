//! @ai:module:intent Batch evaluation of answer pairs through the dispatcher
//! @ai:module:layer application
//! @ai:module:public_api Evaluator, PairOutcome

use crate::answer::AnswerCategory;
use crate::comparison::{ComparisonResult, Dispatcher};
use crate::corpus::AnswerPair;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// @ai:intent Result of comparing one pair; failures are recorded, not raised
#[derive(Debug, Clone, Serialize)]
pub struct PairOutcome {
    pub pair_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub candidate: String,
    pub reference: String,
    pub candidate_category: AnswerCategory,
    pub reference_category: AnswerCategory,
    pub is_equal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ComparisonResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl PairOutcome {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// @ai:intent Comparison method, or None for failed pairs
    pub fn method(&self) -> Option<&'static str> {
        self.result.as_ref().map(|r| r.details.method())
    }

    /// @ai:intent Failed outcome for a pair whose comparison never finished
    /// @ai:effects pure
    pub fn aborted(pair: &AnswerPair, reason: impl Into<String>) -> Self {
        Self {
            pair_id: pair.id.clone(),
            source: pair.source.clone(),
            candidate: pair.candidate.clone(),
            reference: pair.reference.clone(),
            candidate_category: pair.candidate_answer().category,
            reference_category: pair.reference_answer().category,
            is_equal: false,
            result: None,
            error: Some(reason.into()),
            elapsed_ms: 0,
        }
    }
}

/// @ai:intent Runs pairs through the dispatcher with bounded concurrency
pub struct Evaluator {
    dispatcher: Arc<Dispatcher>,
    concurrency: usize,
}

impl Evaluator {
    /// @ai:intent Create an evaluator; concurrency below 1 is treated as 1
    /// @ai:effects pure
    pub fn new(dispatcher: Dispatcher, concurrency: usize) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            concurrency: concurrency.max(1),
        }
    }

    /// @ai:intent Build both answers and compare them
    /// @ai:effects network
    pub async fn evaluate_pair(&self, pair: &AnswerPair) -> PairOutcome {
        evaluate_with(&self.dispatcher, pair).await
    }

    /// @ai:intent Evaluate every pair, at most `concurrency` at a time
    /// @ai:post outcomes are returned in input order
    /// @ai:effects network
    pub async fn evaluate_all(&self, pairs: Vec<AnswerPair>) -> Vec<PairOutcome> {
        let total = pairs.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        tracing::info!(
            "Evaluating {} pairs with concurrency {}",
            total,
            self.concurrency
        );

        for (index, pair) in pairs.iter().cloned().enumerate() {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                tracing::warn!("Evaluation semaphore closed; stopping at pair {}", index);
                break;
            };
            let dispatcher = Arc::clone(&self.dispatcher);

            tasks.spawn(async move {
                let outcome = evaluate_with(&dispatcher, &pair).await;
                drop(permit);
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<PairOutcome>> = vec![None; total];
        let mut completed = 0;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    completed += 1;
                    tracing::info!(
                        "[{}/{}] {}: {}",
                        completed,
                        total,
                        outcome.pair_id,
                        describe(&outcome)
                    );
                    slots[index] = Some(outcome);
                }
                Err(e) => tracing::warn!("Evaluation task aborted: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(&pairs)
            .map(|(slot, pair)| {
                slot.unwrap_or_else(|| {
                    tracing::warn!("Pair {} did not finish; recording as failed", pair.id);
                    PairOutcome::aborted(pair, "comparison task did not finish")
                })
            })
            .collect()
    }
}

fn describe(outcome: &PairOutcome) -> &'static str {
    match (&outcome.error, outcome.is_equal) {
        (Some(_), _) => "failed",
        (None, true) => "equal",
        (None, false) => "not equal",
    }
}

async fn evaluate_with(dispatcher: &Dispatcher, pair: &AnswerPair) -> PairOutcome {
    let start = Instant::now();
    let candidate = pair.candidate_answer();
    let reference = pair.reference_answer();

    let compared = dispatcher.compare(&candidate, &reference).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let (is_equal, result, error) = match compared {
        Ok(result) => (result.is_equal, Some(result), None),
        Err(e) => {
            tracing::warn!("Pair {} could not be compared: {}", pair.id, e);
            (false, None, Some(e.to_string()))
        }
    };

    PairOutcome {
        pair_id: pair.id.clone(),
        source: pair.source.clone(),
        candidate: pair.candidate.clone(),
        reference: pair.reference.clone(),
        candidate_category: candidate.category,
        reference_category: reference.category,
        is_equal,
        result,
        error,
        elapsed_ms,
    }
}
