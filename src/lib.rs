//! @ai:module:intent Equivalence checking for free-form scientific answers
//! @ai:module:layer application
//! @ai:module:public_api answer, comparison, config, corpus, error, evaluator, judge, metrics, report

pub mod answer;
pub mod comparison;
pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluator;
pub mod judge;
pub mod metrics;
pub mod report;

pub use answer::{classify, normalize, normalize_fully, Answer, AnswerCategory, AnswerContext};
pub use comparison::{Comparator, ComparisonDetails, ComparisonResult, Dispatcher};
pub use config::EvalConfig;
pub use corpus::{AnswerPair, CorpusLoader};
pub use error::{CompareError, JudgeError};
pub use evaluator::{Evaluator, PairOutcome};
pub use judge::{HttpJudge, MockJudge, SemanticJudge};
pub use metrics::{EvaluationResults, MetricsAggregator};
pub use report::ReportGenerator;
