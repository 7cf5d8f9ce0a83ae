//! @ai:module:intent Judge-backed equivalence for symbolic and textual answers
//! @ai:module:layer domain
//! @ai:module:public_api SemanticComparator
//! @ai:module:stateless true

use crate::answer::{Answer, ComparisonFamily};
use crate::comparison::{Comparator, ComparisonDetails, ComparisonResult, SemanticDetails};
use crate::error::Result;
use crate::judge::{is_affirmative, semantic_comparison_prompt, SemanticJudge};
use async_trait::async_trait;
use std::sync::Arc;

/// @ai:intent Comparator for formula/equation pairs and for text pairs
pub struct SemanticComparator {
    judge: Arc<dyn SemanticJudge>,
}

impl SemanticComparator {
    pub fn new(judge: Arc<dyn SemanticJudge>) -> Self {
        Self { judge }
    }
}

#[async_trait]
impl Comparator for SemanticComparator {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn can_compare(&self, left: &Answer, right: &Answer) -> bool {
        let family = left.category.family();

        family == right.category.family()
            && matches!(family, ComparisonFamily::Symbolic | ComparisonFamily::Text)
    }

    /// @ai:intent Ask the judge whether both values, verbatim, are equivalent
    /// @ai:post Err(Judge) when the judge call fails
    /// @ai:effects network
    async fn compare(&self, left: &Answer, right: &Answer) -> Result<ComparisonResult> {
        let left_value = left.display_value();
        let right_value = right.display_value();

        let prompt =
            semantic_comparison_prompt(left.category.family(), &left_value, &right_value);
        let reply = self
            .judge
            .judge(&prompt.prompt, prompt.system.as_deref())
            .await?;

        tracing::debug!("Semantic judge: {:?} vs {:?} -> {:?}", left_value, right_value, reply);

        Ok(ComparisonResult::new(
            is_affirmative(&reply),
            ComparisonDetails::SemanticJudge(SemanticDetails {
                left: left_value,
                right: right_value,
                left_category: left.category,
                right_category: right.category,
                judge_reply: reply,
            }),
        ))
    }
}
