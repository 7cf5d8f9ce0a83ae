//! @ai:module:intent Semantic judge clients, throttling and prompts
//! @ai:module:layer infrastructure
//! @ai:module:public_api SemanticJudge, HttpJudge, MockJudge, RateLimiter, JudgePrompt

pub mod client;
pub mod prompt;
pub mod rate_limiter;

pub use client::{HttpJudge, MockJudge, RecordedPrompt, SemanticJudge};
pub use prompt::{is_affirmative, semantic_comparison_prompt, unit_comparison_prompt, JudgePrompt};
pub use rate_limiter::{RateLimiter, RateLimiterTrait};
