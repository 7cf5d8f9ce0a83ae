//! @ai:module:intent Category comparators, their results and the dispatcher
//! @ai:module:layer domain
//! @ai:module:public_api Comparator, ComparisonResult, ComparisonDetails, Dispatcher
//! @ai:module:depends_on answer, judge

pub mod dispatcher;
pub mod numeric;
pub mod option;
pub mod quantity;
pub mod semantic;

pub use dispatcher::Dispatcher;
pub use numeric::{count_significant_figures, round_to_significant_figures, NumericComparator};
pub use option::{OptionComparator, OptionMatch};
pub use quantity::QuantityComparator;
pub use semantic::SemanticComparator;

use crate::answer::{Answer, AnswerCategory};
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// @ai:intent Strategy for one family of answer categories
#[async_trait]
pub trait Comparator: Send + Sync {
    /// @ai:intent Stable identifier used in logs
    fn name(&self) -> &'static str;

    /// @ai:intent Capability predicate over the two categories
    /// @ai:effects pure
    fn can_compare(&self, left: &Answer, right: &Answer) -> bool;

    /// @ai:intent Decide equivalence of two answers this comparator accepts
    /// @ai:pre can_compare(left, right)
    async fn compare(&self, left: &Answer, right: &Answer) -> Result<ComparisonResult>;
}

/// @ai:intent Verdict plus the structured explanation behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub is_equal: bool,
    pub details: ComparisonDetails,
}

impl ComparisonResult {
    pub fn new(is_equal: bool, details: ComparisonDetails) -> Self {
        Self { is_equal, details }
    }

    /// @ai:intent One-line human-readable account of the verdict
    /// @ai:effects pure
    pub fn explain(&self) -> String {
        let verdict = if self.is_equal { "equal" } else { "not equal" };
        format!("{} ({}): {}", verdict, self.details.method(), self.details)
    }
}

/// @ai:intent Method-specific explanation; serialized with a `method` tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ComparisonDetails {
    SignificantFigures(SigFigDetails),
    SpecialValue(SpecialValueDetails),
    UnitJudge(UnitJudgeDetails),
    OptionMatch(OptionDetails),
    SemanticJudge(SemanticDetails),
}

impl ComparisonDetails {
    pub fn method(&self) -> &'static str {
        match self {
            ComparisonDetails::SignificantFigures(_) => "significant_figures",
            ComparisonDetails::SpecialValue(_) => "special_value",
            ComparisonDetails::UnitJudge(_) => "unit_judge",
            ComparisonDetails::OptionMatch(_) => "option_match",
            ComparisonDetails::SemanticJudge(_) => "semantic_judge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SigFigDetails {
    pub left: f64,
    pub right: f64,
    pub left_sig_figs: u32,
    pub right_sig_figs: u32,
    pub comparison_sig_figs: u32,
    pub left_rounded: f64,
    pub right_rounded: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// One side had no unit and took the other's
    pub unit_assumed: bool,
}

/// @ai:intent Which special-value rule decided the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialCase {
    BothNan,
    OneNan,
    SameInfinity,
    OppositeInfinity,
    MixedSpecial,
}

impl SpecialCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialCase::BothNan => "both values are NaN",
            SpecialCase::OneNan => "exactly one value is NaN",
            SpecialCase::SameInfinity => "both values are infinite with the same sign",
            SpecialCase::OppositeInfinity => "infinities of opposite sign",
            SpecialCase::MixedSpecial => "one value is infinite, the other finite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialValueDetails {
    pub case: SpecialCase,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitJudgeDetails {
    pub left: f64,
    pub right: f64,
    pub left_unit: String,
    pub right_unit: String,
    pub unit_assumed: bool,
    pub comparison_sig_figs: u32,
    pub left_rounded: f64,
    pub right_rounded: f64,
    pub judge_reply: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDetails {
    pub left: String,
    pub right: String,
    pub normalized_left: String,
    pub normalized_right: String,
    pub multi_select: bool,
    /// An empty side was compared verbatim, without normalization
    pub empty_comparison: bool,
    pub case_sensitive: bool,
    pub order_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticDetails {
    pub left: String,
    pub right: String,
    pub left_category: AnswerCategory,
    pub right_category: AnswerCategory,
    pub judge_reply: String,
}

impl fmt::Display for ComparisonDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonDetails::SignificantFigures(d) => {
                write!(
                    f,
                    "{} vs {} rounded to {} significant figures gives {} vs {}",
                    d.left, d.right, d.comparison_sig_figs, d.left_rounded, d.right_rounded
                )?;
                if let Some(unit) = &d.unit {
                    write!(f, " [{}]", unit)?;
                }
                if d.unit_assumed {
                    write!(f, " (missing unit assumed)")?;
                }
                Ok(())
            }
            ComparisonDetails::SpecialValue(d) => {
                write!(f, "{} vs {}: {}", d.left, d.right, d.case.as_str())
            }
            ComparisonDetails::UnitJudge(d) => write!(
                f,
                "judge asked about {} {} vs {} {} ({} significant figures) and replied {:?}",
                d.left_rounded,
                d.left_unit,
                d.right_rounded,
                d.right_unit,
                d.comparison_sig_figs,
                d.judge_reply
            ),
            ComparisonDetails::OptionMatch(d) if d.empty_comparison => {
                write!(f, "{:?} vs {:?} compared verbatim", d.left, d.right)
            }
            ComparisonDetails::OptionMatch(d) => write!(
                f,
                "{:?} vs {:?} normalized to {:?} vs {:?}",
                d.left, d.right, d.normalized_left, d.normalized_right
            ),
            ComparisonDetails::SemanticJudge(d) => write!(
                f,
                "judge compared {} {:?} with {} {:?} and replied {:?}",
                d.left_category, d.left, d.right_category, d.right, d.judge_reply
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_serialize_with_method_tag() {
        let details = ComparisonDetails::SpecialValue(SpecialValueDetails {
            case: SpecialCase::OppositeInfinity,
            left: 1.0,
            right: 2.0,
        });

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["method"], "special_value");
        assert_eq!(json["case"], "opposite_infinity");
    }

    #[test]
    fn test_explain_mentions_verdict_and_method() {
        let result = ComparisonResult::new(
            true,
            ComparisonDetails::OptionMatch(OptionDetails {
                left: "ab".to_string(),
                right: "BA".to_string(),
                normalized_left: "AB".to_string(),
                normalized_right: "AB".to_string(),
                multi_select: true,
                empty_comparison: false,
                case_sensitive: false,
                order_sensitive: false,
            }),
        );

        let text = result.explain();
        assert!(text.starts_with("equal (option_match)"));
        assert!(text.contains("\"AB\""));
    }
}
