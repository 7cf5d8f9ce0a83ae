//! @ai:module:intent Heuristic classification of normalized answer strings
//! @ai:module:layer domain
//! @ai:module:public_api Classifier, classify, classify_raw, parse_number, split_quantity, is_pure_number
//! @ai:module:stateless true

use crate::answer::category::AnswerCategory;
use crate::answer::normalize::normalize;
use regex::Regex;
use std::sync::OnceLock;

/// Substrings that mark a string as mathematical on their own.
const MATH_MARKERS: &[&str] = &[
    "+", "-", "*", "/", "=", "^", "√", "sqrt", "$", "\\", "π", "∞", "±", "≤", "≥", "≠", "≈",
];

/// @ai:intent Assigns number / symbolic / text categories by ordered rules
/// @ai:effects pure
pub struct Classifier {
    letter_digit: Regex,
    subscript: Regex,
    function_call: Regex,
}

impl Classifier {
    /// @ai:intent Create a classifier with compiled patterns
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            letter_digit: Regex::new(r"[0-9]\s*[a-zA-Z]|[a-zA-Z]\s*[0-9]").expect("Invalid regex"),
            subscript: Regex::new(r"[a-zA-Z]_[a-zA-Z0-9]").expect("Invalid regex"),
            function_call: Regex::new(
                r"(?i)\b(sin|cos|tan|asin|acos|atan|sinh|cosh|tanh|log|ln|exp|sqrt)\s*\(",
            )
            .expect("Invalid regex"),
        }
    }

    /// @ai:intent Classify a normalized string; first matching rule wins
    /// @ai:post never fails; returns Number, Equation, Formula or Text
    /// @ai:example ("42") -> Number
    /// @ai:example ("F = ma") -> Equation
    /// @ai:example ("The force increases with mass") -> Text
    /// @ai:effects pure
    pub fn classify(&self, value: &str) -> AnswerCategory {
        let value = value.trim();

        if is_pure_number(value) {
            return AnswerCategory::Number;
        }

        if self.is_mathematical_expression(value) {
            return if value.contains('=') {
                AnswerCategory::Equation
            } else {
                AnswerCategory::Formula
            };
        }

        AnswerCategory::Text
    }

    /// @ai:intent Detect symbolic content; never true for pure numbers
    /// @ai:effects pure
    pub fn is_mathematical_expression(&self, value: &str) -> bool {
        let value = value.trim();

        if is_pure_number(value) {
            return false;
        }

        let mut chars = value.chars();
        if let (Some(only), None) = (chars.next(), chars.next()) {
            if only.is_alphabetic() {
                return true;
            }
        }

        MATH_MARKERS.iter().any(|marker| value.contains(marker))
            || self.letter_digit.is_match(value)
            || self.subscript.is_match(value)
            || self.function_call.is_match(value)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

fn shared_classifier() -> &'static Classifier {
    static CLASSIFIER: OnceLock<Classifier> = OnceLock::new();
    CLASSIFIER.get_or_init(Classifier::new)
}

/// @ai:intent Classify an already-normalized string with the shared classifier
/// @ai:effects pure
pub fn classify(value: &str) -> AnswerCategory {
    shared_classifier().classify(value)
}

/// @ai:intent Normalize then classify a raw answer string
/// @ai:example ("\\boxed{3.0}") -> Number
/// @ai:effects pure
pub fn classify_raw(raw: &str) -> AnswerCategory {
    classify(&normalize(raw))
}

/// @ai:intent True when the string is a single concrete number or an a/b fraction
/// @ai:effects pure
pub fn is_pure_number(value: &str) -> bool {
    parse_number(value).is_some()
}

/// @ai:intent Parse a number, ignoring thousands separators and spaces
/// @ai:post a/b fractions evaluate to a / b; a zero denominator is not a number
/// @ai:example ("1,234.5") -> Some(1234.5)
/// @ai:example ("3/4") -> Some(0.75)
/// @ai:effects pure
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    match cleaned.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;

            if denominator == 0.0 {
                return None;
            }
            Some(numerator / denominator)
        }
        None => cleaned.parse().ok(),
    }
}

/// @ai:intent Split "number unit" text into its numeric part and optional unit
/// @ai:example ("9.8 m/s^2") -> Some((9.8, Some("m/s^2")))
/// @ai:example ("12") -> Some((12.0, None))
/// @ai:effects pure
pub fn split_quantity(value: &str) -> Option<(f64, Option<String>)> {
    let value = value.trim();
    let (number, unit) = match value.split_once(char::is_whitespace) {
        Some((number, unit)) => (number, unit.trim()),
        None => (value, ""),
    };

    let number = parse_number(number)?;
    let unit = (!unit.is_empty()).then(|| unit.to_string());
    Some((number, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_numbers() {
        for value in ["42", "3.14", "-0.5", "1,234.5", "1 000", "1.5e-3", "-2.5E+6", "3/4"] {
            assert_eq!(classify(value), AnswerCategory::Number, "value: {}", value);
        }
    }

    #[test]
    fn test_fraction_needs_numeric_parts() {
        assert!(is_pure_number("10/4"));
        assert!(!is_pure_number("a/b"));
        assert!(!is_pure_number("1/2/3"));
        assert!(!is_pure_number("1/0"));
        assert_eq!(classify("a/b"), AnswerCategory::Formula);
    }

    #[test]
    fn test_single_letter_is_symbolic() {
        assert_eq!(classify("x"), AnswerCategory::Formula);
    }

    #[test]
    fn test_equations_and_formulas() {
        assert_eq!(classify("F = ma"), AnswerCategory::Equation);
        assert_eq!(classify("x^2 + 1"), AnswerCategory::Formula);
        assert_eq!(classify("sin(theta)"), AnswerCategory::Formula);
        assert_eq!(classify("v_0"), AnswerCategory::Formula);
        assert_eq!(classify("2x"), AnswerCategory::Formula);
        assert_eq!(classify("π"), AnswerCategory::Formula);
        assert_eq!(classify("\\frac{1}{2}"), AnswerCategory::Formula);
        assert_eq!(classify("v ≤ c"), AnswerCategory::Formula);
    }

    #[test]
    fn test_prose_is_text() {
        assert_eq!(
            classify("The force increases with mass"),
            AnswerCategory::Text
        );
        assert_eq!(classify("a descriptive answer"), AnswerCategory::Text);
    }

    #[test]
    fn test_empty_is_text() {
        assert_eq!(classify(""), AnswerCategory::Text);
        assert_eq!(classify("   "), AnswerCategory::Text);
    }

    #[test]
    fn test_boxed_number_after_normalization() {
        assert_eq!(classify(&normalize("\\boxed{3.0}")), AnswerCategory::Number);
        assert_eq!(classify_raw("$\\boxed{3.0}$"), AnswerCategory::Number);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let inputs = ["42", "x", "F = ma", "hello world", "", "\\sqrt{2}", "3/4"];

        for input in inputs {
            let first = classify(input);
            for _ in 0..10 {
                assert_eq!(classify(input), first);
            }
        }
    }

    #[test]
    fn test_number_is_never_an_expression() {
        let classifier = Classifier::new();
        assert!(!classifier.is_mathematical_expression("-5"));
        assert!(!classifier.is_mathematical_expression("1e-3"));
        assert!(classifier.is_mathematical_expression("x - 5"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("3/4"), Some(0.75));
        assert_eq!(parse_number(" 2.5e3 "), Some(2500.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_split_quantity() {
        assert_eq!(
            split_quantity("9.8 m/s^2"),
            Some((9.8, Some("m/s^2".to_string())))
        );
        assert_eq!(split_quantity("12"), Some((12.0, None)));
        assert_eq!(
            split_quantity("-10000  A/s"),
            Some((-10000.0, Some("A/s".to_string())))
        );
        assert_eq!(split_quantity("fast"), None);
    }
}
