//! @ai:module:intent Error types for answer comparison and judge calls
//! @ai:module:layer domain
//! @ai:module:public_api CompareError, JudgeError, Result
//! @ai:module:stateless true

use crate::answer::AnswerCategory;
use thiserror::Error;

/// @ai:intent Failure talking to the semantic judge
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Judge API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("API key not set: {0}")]
    MissingApiKey(String),

    #[error("Judge returned an empty reply")]
    EmptyReply,

    #[error("Failed to parse judge response: {0}")]
    Parse(String),
}

/// @ai:intent Unified error type for every comparison operation
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("No comparator can handle {left} vs {right}")]
    NoApplicableComparator {
        left: AnswerCategory,
        right: AnswerCategory,
    },

    #[error("Invalid {category} answer: {reason}")]
    InvalidAnswer {
        category: AnswerCategory,
        reason: String,
    },

    #[error("Semantic judge failed: {0}")]
    Judge(#[from] JudgeError),
}

pub type Result<T> = std::result::Result<T, CompareError>;
