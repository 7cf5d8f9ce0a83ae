//! @ai:module:intent Route an answer pair to the first comparator that accepts it
//! @ai:module:layer application
//! @ai:module:public_api Dispatcher
//! @ai:module:stateless true

use crate::answer::Answer;
use crate::comparison::{
    Comparator, ComparisonResult, NumericComparator, OptionComparator, QuantityComparator,
    SemanticComparator,
};
use crate::error::{CompareError, Result};
use crate::judge::SemanticJudge;
use std::sync::Arc;

/// @ai:intent Ordered list of comparators; exactly one runs per comparison
pub struct Dispatcher {
    comparators: Vec<Box<dyn Comparator>>,
}

impl Dispatcher {
    /// @ai:intent Standard order: numeric, quantity, option, semantic
    /// @ai:effects pure
    pub fn new(judge: Arc<dyn SemanticJudge>) -> Self {
        Self::with_comparators(vec![
            Box::new(NumericComparator::new()),
            Box::new(QuantityComparator::new(judge.clone())),
            Box::new(OptionComparator::new()),
            Box::new(SemanticComparator::new(judge)),
        ])
    }

    /// @ai:intent Dispatcher over a caller-chosen comparator order
    /// @ai:effects pure
    pub fn with_comparators(comparators: Vec<Box<dyn Comparator>>) -> Self {
        Self { comparators }
    }

    /// @ai:intent First comparator whose predicate accepts the pair
    /// @ai:effects pure
    pub fn select(&self, left: &Answer, right: &Answer) -> Option<&dyn Comparator> {
        self.comparators
            .iter()
            .find(|comparator| comparator.can_compare(left, right))
            .map(|comparator| &**comparator)
    }

    /// @ai:intent Compare two answers with the first accepting comparator
    /// @ai:post when no comparator accepts, equation sides are retried as their right-hand side
    /// @ai:post Err(NoApplicableComparator) naming the original categories when still none accepts
    /// @ai:effects network
    pub async fn compare(&self, left: &Answer, right: &Answer) -> Result<ComparisonResult> {
        if let Some(comparator) = self.select(left, right) {
            return self.run(comparator, left, right).await;
        }

        let left_rhs = left.right_hand_side();
        let right_rhs = right.right_hand_side();

        if left_rhs.is_some() || right_rhs.is_some() {
            let left_retry = left_rhs.as_ref().unwrap_or(left);
            let right_retry = right_rhs.as_ref().unwrap_or(right);

            if let Some(comparator) = self.select(left_retry, right_retry) {
                tracing::debug!(
                    "No comparator for {} vs {}; retrying with equation right-hand side",
                    left.category,
                    right.category
                );
                return self.run(comparator, left_retry, right_retry).await;
            }
        }

        Err(CompareError::NoApplicableComparator {
            left: left.category,
            right: right.category,
        })
    }

    async fn run(
        &self,
        comparator: &dyn Comparator,
        left: &Answer,
        right: &Answer,
    ) -> Result<ComparisonResult> {
        tracing::debug!(
            "Dispatching {} vs {} to {} comparator",
            left.category,
            right.category,
            comparator.name()
        );

        comparator.compare(left, right).await
    }

    /// @ai:intent Normalize, classify and compare two raw strings
    /// @ai:effects network
    pub async fn compare_raw(&self, candidate: &str, reference: &str) -> Result<ComparisonResult> {
        self.compare(&Answer::from_raw(candidate), &Answer::from_raw(reference))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerCategory;
    use crate::comparison::{ComparisonDetails, SpecialCase, SpecialValueDetails};
    use crate::judge::MockJudge;
    use async_trait::async_trait;

    fn dispatcher(reply: &str) -> (Dispatcher, Arc<MockJudge>) {
        let judge = Arc::new(MockJudge::new(reply));
        (Dispatcher::new(judge.clone()), judge)
    }

    struct AcceptEverything;

    #[async_trait]
    impl Comparator for AcceptEverything {
        fn name(&self) -> &'static str {
            "accept_everything"
        }

        fn can_compare(&self, _left: &Answer, _right: &Answer) -> bool {
            true
        }

        async fn compare(&self, _left: &Answer, _right: &Answer) -> Result<ComparisonResult> {
            Ok(ComparisonResult::new(
                true,
                ComparisonDetails::SpecialValue(SpecialValueDetails {
                    case: SpecialCase::BothNan,
                    left: 0.0,
                    right: 0.0,
                }),
            ))
        }
    }

    #[tokio::test]
    async fn test_quantity_against_option_is_a_capability_error() {
        let (dispatcher, judge) = dispatcher("TRUE");

        let err = dispatcher
            .compare(&Answer::quantity(9.8, "m/s^2"), &Answer::option("A"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CompareError::NoApplicableComparator {
                left: AnswerCategory::PhysicalQuantity,
                right: AnswerCategory::Option,
            }
        ));
        assert_eq!(judge.call_count(), 0);
    }

    #[tokio::test]
    async fn test_routes_by_category() {
        let (dispatcher, _judge) = dispatcher("TRUE");

        let cases = [
            (Answer::number(3.14), Answer::number(3.1), "numeric"),
            (Answer::quantity(2.0, "m"), Answer::number(2.0), "quantity"),
            (Answer::option("AB"), Answer::option("BA"), "option"),
            (Answer::formula("x^2"), Answer::equation("y = x^2"), "semantic"),
            (Answer::text("up"), Answer::text("rises"), "semantic"),
        ];

        for (left, right, expected) in cases {
            let comparator = dispatcher.select(&left, &right).unwrap();
            assert_eq!(comparator.name(), expected);
            assert!(dispatcher.compare(&left, &right).await.unwrap().is_equal);
        }
    }

    #[tokio::test]
    async fn test_text_against_formula_has_no_comparator() {
        let (dispatcher, _judge) = dispatcher("TRUE");

        let err = dispatcher
            .compare(&Answer::text("it doubles"), &Answer::formula("2x"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompareError::NoApplicableComparator { .. }));
    }

    #[tokio::test]
    async fn test_first_accepting_comparator_wins() {
        let dispatcher = Dispatcher::with_comparators(vec![
            Box::new(AcceptEverything),
            Box::new(NumericComparator::new()),
        ]);

        let result = dispatcher
            .compare(&Answer::number(1.0), &Answer::number(2.0))
            .await
            .unwrap();

        assert!(result.is_equal);
    }

    #[tokio::test]
    async fn test_equation_falls_back_to_right_hand_side() {
        let (dispatcher, judge) = dispatcher("FALSE");

        let result = dispatcher.compare_raw("v = 3.1", "3.1").await.unwrap();
        assert!(result.is_equal);
        assert_eq!(result.details.method(), "significant_figures");

        let result = dispatcher.compare_raw("3.2", "$v = 3.1$").await.unwrap();
        assert!(!result.is_equal);

        let result = dispatcher
            .compare(&Answer::equation("F = 12"), &Answer::quantity(12.0, "N"))
            .await
            .unwrap();
        assert!(result.is_equal);
        assert_eq!(result.details.method(), "significant_figures");

        assert_eq!(judge.call_count(), 0);
    }

    #[tokio::test]
    async fn test_equation_fallback_keeps_original_categories_in_error() {
        let (dispatcher, judge) = dispatcher("TRUE");

        let err = dispatcher
            .compare(&Answer::equation("x = 2y"), &Answer::option("A"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CompareError::NoApplicableComparator {
                left: AnswerCategory::Equation,
                right: AnswerCategory::Option,
            }
        ));
        assert_eq!(judge.call_count(), 0);
    }

    #[tokio::test]
    async fn test_compare_raw_end_to_end() {
        let (dispatcher, judge) = dispatcher("FALSE");

        let result = dispatcher
            .compare_raw("$\\boxed{3.14}$", "3.1")
            .await
            .unwrap();

        assert!(result.is_equal);
        assert_eq!(judge.call_count(), 0);
    }
}
