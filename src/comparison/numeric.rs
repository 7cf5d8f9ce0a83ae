//! @ai:module:intent Significant-figure equality for dimensionless numbers
//! @ai:module:layer domain
//! @ai:module:public_api NumericComparator, count_significant_figures, round_to_significant_figures
//! @ai:module:stateless true

use crate::answer::{Answer, AnswerCategory};
use crate::comparison::{
    Comparator, ComparisonDetails, ComparisonResult, SigFigDetails, SpecialCase,
    SpecialValueDetails,
};
use crate::error::Result;
use async_trait::async_trait;

/// Above this magnitude a float's canonical decimal form has no fractional part.
const WHOLE_FRACTION_LIMIT: f64 = 1e16;

/// Below this exponent `10f64.powi` loses precision and then underflows to zero.
const MIN_SCALE_EXPONENT: i32 = -300;

/// @ai:intent Count significant figures from the canonical decimal form of |value|
/// @ai:post zero and non-finite values count as 1
/// @ai:example (3.14) -> 3
/// @ai:example (0.0012) -> 2
/// @ai:example (3.0) -> 2
/// @ai:example (1e20) -> 1
/// @ai:effects pure
pub fn count_significant_figures(value: f64) -> u32 {
    if value == 0.0 || !value.is_finite() {
        return 1;
    }

    let magnitude = value.abs();
    let mut text = magnitude.to_string();

    // Whole floats keep their ".0" below the limit.
    if !text.contains('.') && magnitude < WHOLE_FRACTION_LIMIT {
        text.push_str(".0");
    }

    let digits = if text.contains('.') {
        text.replace('.', "").trim_start_matches('0').len()
    } else {
        text.trim_end_matches('0').len()
    };

    digits.max(1) as u32
}

/// @ai:intent Round to `sig_figs` significant figures
/// @ai:pre sig_figs >= 1
/// @ai:post round(round(x, k), k) == round(x, k)
/// @ai:example (3.14159, 3) -> 3.14
/// @ai:edge_cases tiny and subnormal values round through scientific notation
/// @ai:effects pure
pub fn round_to_significant_figures(value: f64, sig_figs: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }

    let sig_figs = sig_figs.max(1);
    let exponent = value.abs().log10().floor() as i32 - sig_figs as i32 + 1;

    if exponent < MIN_SCALE_EXPONENT {
        return format!("{:.*e}", (sig_figs - 1) as usize, value)
            .parse()
            .unwrap_or(value);
    }

    let magnitude = 10f64.powi(exponent);

    (value / magnitude).round() * magnitude
}

/// @ai:intent Apply the NaN / infinity policy; None when both values are finite
/// @ai:edge_cases NaN equals NaN here, unlike IEEE comparison
/// @ai:effects pure
pub(crate) fn compare_special(left: f64, right: f64) -> Option<ComparisonResult> {
    if left.is_finite() && right.is_finite() {
        return None;
    }

    let case = match (left.is_nan(), right.is_nan()) {
        (true, true) => SpecialCase::BothNan,
        (true, false) | (false, true) => SpecialCase::OneNan,
        (false, false) if left.is_infinite() && right.is_infinite() => {
            if left.is_sign_positive() == right.is_sign_positive() {
                SpecialCase::SameInfinity
            } else {
                SpecialCase::OppositeInfinity
            }
        }
        (false, false) => SpecialCase::MixedSpecial,
    };

    let is_equal = matches!(case, SpecialCase::BothNan | SpecialCase::SameInfinity);

    Some(ComparisonResult::new(
        is_equal,
        ComparisonDetails::SpecialValue(SpecialValueDetails { case, left, right }),
    ))
}

/// @ai:intent Compare two values at the smaller of their significant-figure counts
/// @ai:effects pure
pub(crate) fn compare_significant_figures(
    left: f64,
    right: f64,
    unit: Option<String>,
    unit_assumed: bool,
) -> ComparisonResult {
    if let Some(special) = compare_special(left, right) {
        return special;
    }

    let left_sig_figs = count_significant_figures(left);
    let right_sig_figs = count_significant_figures(right);
    let comparison_sig_figs = left_sig_figs.min(right_sig_figs);

    let left_rounded = round_to_significant_figures(left, comparison_sig_figs);
    let right_rounded = round_to_significant_figures(right, comparison_sig_figs);

    ComparisonResult::new(
        left_rounded == right_rounded,
        ComparisonDetails::SignificantFigures(SigFigDetails {
            left,
            right,
            left_sig_figs,
            right_sig_figs,
            comparison_sig_figs,
            left_rounded,
            right_rounded,
            unit,
            unit_assumed,
        }),
    )
}

/// @ai:intent Comparator for two `number` answers
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericComparator;

impl NumericComparator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Comparator for NumericComparator {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn can_compare(&self, left: &Answer, right: &Answer) -> bool {
        left.category == AnswerCategory::Number && right.category == AnswerCategory::Number
    }

    /// @ai:intent Significant-figure equality of two numbers
    /// @ai:post Err(InvalidAnswer) when either value is not numeric
    /// @ai:effects pure
    async fn compare(&self, left: &Answer, right: &Answer) -> Result<ComparisonResult> {
        let left_value = left.numeric_value()?;
        let right_value = right.numeric_value()?;

        Ok(compare_significant_figures(left_value, right_value, None, false))
    }
}
