//! @ai:module:intent Equality of unit-bearing quantities, delegating unit conversion to the judge
//! @ai:module:layer domain
//! @ai:module:public_api QuantityComparator
//! @ai:module:stateless true

use crate::answer::{Answer, AnswerCategory};
use crate::comparison::numeric::{compare_significant_figures, compare_special};
use crate::comparison::{
    count_significant_figures, round_to_significant_figures, Comparator, ComparisonDetails,
    ComparisonResult, UnitJudgeDetails,
};
use crate::error::Result;
use crate::judge::{is_affirmative, unit_comparison_prompt, SemanticJudge};
use async_trait::async_trait;
use std::sync::Arc;

/// @ai:intent Comparator for physical quantities, or a quantity against a bare number
pub struct QuantityComparator {
    judge: Arc<dyn SemanticJudge>,
}

impl QuantityComparator {
    pub fn new(judge: Arc<dyn SemanticJudge>) -> Self {
        Self { judge }
    }

    /// @ai:intent Ask the judge whether two rounded quantities in different units agree
    /// @ai:effects network
    async fn compare_across_units(
        &self,
        (left, left_unit): (f64, &str),
        (right, right_unit): (f64, &str),
    ) -> Result<ComparisonResult> {
        let comparison_sig_figs =
            count_significant_figures(left).min(count_significant_figures(right));
        let left_rounded = round_to_significant_figures(left, comparison_sig_figs);
        let right_rounded = round_to_significant_figures(right, comparison_sig_figs);

        let prompt = unit_comparison_prompt(
            &left_rounded.to_string(),
            left_unit,
            &right_rounded.to_string(),
            right_unit,
        );
        let reply = self
            .judge
            .judge(&prompt.prompt, prompt.system.as_deref())
            .await?;

        tracing::debug!(
            "Unit judge: {} {} vs {} {} -> {:?}",
            left_rounded,
            left_unit,
            right_rounded,
            right_unit,
            reply
        );

        Ok(ComparisonResult::new(
            is_affirmative(&reply),
            ComparisonDetails::UnitJudge(UnitJudgeDetails {
                left,
                right,
                left_unit: left_unit.to_string(),
                right_unit: right_unit.to_string(),
                unit_assumed: false,
                comparison_sig_figs,
                left_rounded,
                right_rounded,
                judge_reply: reply,
            }),
        ))
    }
}

fn stated_unit(answer: &Answer) -> Option<&str> {
    answer
        .unit
        .as_deref()
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
}

#[async_trait]
impl Comparator for QuantityComparator {
    fn name(&self) -> &'static str {
        "quantity"
    }

    fn can_compare(&self, left: &Answer, right: &Answer) -> bool {
        left.category.is_numeric()
            && right.category.is_numeric()
            && (left.category == AnswerCategory::PhysicalQuantity
                || right.category == AnswerCategory::PhysicalQuantity)
    }

    /// @ai:intent Same unit: significant figures. Different units: one judge question
    /// @ai:post a missing unit takes the other side's, flagged as unit_assumed
    /// @ai:post Err(Judge) when the judge call fails
    /// @ai:effects network
    async fn compare(&self, left: &Answer, right: &Answer) -> Result<ComparisonResult> {
        let left_value = left.numeric_value()?;
        let right_value = right.numeric_value()?;

        if let Some(special) = compare_special(left_value, right_value) {
            return Ok(special);
        }

        let (left_unit, right_unit, unit_assumed) = match (stated_unit(left), stated_unit(right)) {
            (Some(l), None) => (Some(l), Some(l), true),
            (None, Some(r)) => (Some(r), Some(r), true),
            (l, r) => (l, r, false),
        };

        match (left_unit, right_unit) {
            (Some(l), Some(r)) if l != r => {
                self.compare_across_units((left_value, l), (right_value, r))
                    .await
            }
            _ => Ok(compare_significant_figures(
                left_value,
                right_value,
                left_unit.map(str::to_string),
                unit_assumed,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;
    use crate::judge::MockJudge;

    #[tokio::test]
    async fn test_same_unit_uses_significant_figures() {
        let judge = Arc::new(MockJudge::new("FALSE"));
        let comparator = QuantityComparator::new(judge.clone());

        let result = comparator
            .compare(&Answer::quantity(9.81, "m/s^2"), &Answer::quantity(9.8, "m/s^2"))
            .await
            .unwrap();

        assert!(result.is_equal);
        assert_eq!(result.details.method(), "significant_figures");
        assert_eq!(judge.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_unit_is_assumed() {
        let judge = Arc::new(MockJudge::new("FALSE"));
        let comparator = QuantityComparator::new(judge.clone());

        let result = comparator
            .compare(&Answer::number(12.0), &Answer::quantity(12.0, "N"))
            .await
            .unwrap();

        assert!(result.is_equal);
        let ComparisonDetails::SignificantFigures(details) = result.details else {
            panic!("expected significant figure details");
        };
        assert!(details.unit_assumed);
        assert_eq!(details.unit.as_deref(), Some("N"));
        assert_eq!(judge.call_count(), 0);
    }

    #[tokio::test]
    async fn test_different_units_ask_the_judge() {
        let judge = Arc::new(MockJudge::new("TRUE"));
        let comparator = QuantityComparator::new(judge.clone());

        let result = comparator
            .compare(&Answer::quantity(2.0, "m"), &Answer::quantity(200.0, "cm"))
            .await
            .unwrap();

        assert!(result.is_equal);
        assert_eq!(result.details.method(), "unit_judge");

        let prompts = judge.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].prompt.contains("2 m and 200 cm"));
        assert!(prompts[0].system.is_some());
    }

    #[tokio::test]
    async fn test_judge_reply_must_be_exact() {
        let judge = Arc::new(MockJudge::new("True"));
        let comparator = QuantityComparator::new(judge);

        let result = comparator
            .compare(&Answer::quantity(1.0, "km"), &Answer::quantity(1000.0, "m"))
            .await
            .unwrap();

        assert!(!result.is_equal);
    }

    #[tokio::test]
    async fn test_judge_failure_propagates() {
        let comparator = QuantityComparator::new(Arc::new(MockJudge::failing()));

        let err = comparator
            .compare(&Answer::quantity(1.0, "km"), &Answer::quantity(1000.0, "m"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompareError::Judge(_)));
    }

    #[tokio::test]
    async fn test_special_values_skip_the_judge() {
        let judge = Arc::new(MockJudge::new("FALSE"));
        let comparator = QuantityComparator::new(judge.clone());

        let result = comparator
            .compare(
                &Answer::quantity(f64::NAN, "m"),
                &Answer::quantity(f64::NAN, "cm"),
            )
            .await
            .unwrap();

        assert!(result.is_equal);
        assert_eq!(judge.call_count(), 0);
    }

    #[test]
    fn test_predicate_needs_a_quantity() {
        let comparator = QuantityComparator::new(Arc::new(MockJudge::new("TRUE")));

        assert!(comparator.can_compare(&Answer::quantity(1.0, "m"), &Answer::number(1.0)));
        assert!(!comparator.can_compare(&Answer::number(1.0), &Answer::number(1.0)));
        assert!(!comparator.can_compare(&Answer::quantity(1.0, "m"), &Answer::option("A")));
    }
}
