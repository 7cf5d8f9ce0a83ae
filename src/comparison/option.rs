//! @ai:module:intent Multiple-choice answer matching
//! @ai:module:layer domain
//! @ai:module:public_api OptionComparator, OptionMatch
//! @ai:module:stateless true

use crate::answer::{Answer, AnswerCategory};
use crate::comparison::{Comparator, ComparisonDetails, ComparisonResult, OptionDetails};
use crate::error::Result;
use async_trait::async_trait;

/// @ai:intent Tolerances applied before matching option strings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionMatch {
    pub case_sensitive: bool,
    pub order_sensitive: bool,
}

impl OptionMatch {
    /// @ai:intent Normalize one option string under these tolerances
    /// @ai:example ("b, a") -> ("AB", true)
    /// @ai:example ("c") -> ("C", false)
    /// @ai:effects pure
    pub fn normalize(&self, value: &str) -> (String, bool) {
        let mut normalized: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, ',' | ';' | '-'))
            .collect();

        if !self.case_sensitive {
            normalized = normalized.to_uppercase();
        }

        let multi_select =
            normalized.chars().count() > 1 && normalized.chars().all(char::is_alphanumeric);

        if multi_select && !self.order_sensitive {
            let mut letters: Vec<char> = normalized.chars().collect();
            letters.sort_unstable();
            normalized = letters.into_iter().collect();
        }

        (normalized, multi_select)
    }
}

/// @ai:intent Comparator for two `option` answers
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionComparator {
    tolerance: OptionMatch,
}

impl OptionComparator {
    /// @ai:intent Case- and order-insensitive matching
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Matching with explicit case and order sensitivity
    pub fn strict(case_sensitive: bool, order_sensitive: bool) -> Self {
        Self {
            tolerance: OptionMatch {
                case_sensitive,
                order_sensitive,
            },
        }
    }
}

#[async_trait]
impl Comparator for OptionComparator {
    fn name(&self) -> &'static str {
        "option"
    }

    fn can_compare(&self, left: &Answer, right: &Answer) -> bool {
        left.category == AnswerCategory::Option && right.category == AnswerCategory::Option
    }

    /// @ai:intent Equality of normalized option strings; empty sides compare verbatim
    /// @ai:effects pure
    async fn compare(&self, left: &Answer, right: &Answer) -> Result<ComparisonResult> {
        let left_raw = left.display_value();
        let right_raw = right.display_value();
        let left_text = left_raw.trim();
        let right_text = right_raw.trim();

        let details = if left_text.is_empty() || right_text.is_empty() {
            OptionDetails {
                left: left_text.to_string(),
                right: right_text.to_string(),
                normalized_left: left_text.to_string(),
                normalized_right: right_text.to_string(),
                multi_select: false,
                empty_comparison: true,
                case_sensitive: self.tolerance.case_sensitive,
                order_sensitive: self.tolerance.order_sensitive,
            }
        } else {
            let (normalized_left, left_multi) = self.tolerance.normalize(left_text);
            let (normalized_right, right_multi) = self.tolerance.normalize(right_text);

            OptionDetails {
                left: left_text.to_string(),
                right: right_text.to_string(),
                normalized_left,
                normalized_right,
                multi_select: left_multi || right_multi,
                empty_comparison: false,
                case_sensitive: self.tolerance.case_sensitive,
                order_sensitive: self.tolerance.order_sensitive,
            }
        };

        Ok(ComparisonResult::new(
            details.normalized_left == details.normalized_right,
            ComparisonDetails::OptionMatch(details),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn options(comparator: &OptionComparator, left: &str, right: &str) -> bool {
        comparator
            .compare(&Answer::option(left), &Answer::option(right))
            .await
            .unwrap()
            .is_equal
    }

    #[tokio::test]
    async fn test_order_independence() {
        let comparator = OptionComparator::new();
        assert!(options(&comparator, "AB", "BA").await);
        assert!(options(&comparator, "A, C, D", "DCA").await);
        assert!(!options(&comparator, "AB", "ABC").await);
    }

    #[tokio::test]
    async fn test_case_insensitivity() {
        let comparator = OptionComparator::new();
        assert!(options(&comparator, "a", "A").await);
        assert!(options(&comparator, "b d", "DB").await);
    }

    #[tokio::test]
    async fn test_option_symmetry() {
        let comparator = OptionComparator::new();
        let pairs = [("AB", "ba"), ("A", "B"), ("", "A"), ("C;D", "D-C"), ("", "")];

        for (a, b) in pairs {
            assert_eq!(
                options(&comparator, a, b).await,
                options(&comparator, b, a).await,
                "{:?} vs {:?}",
                a,
                b
            );
        }
    }

    #[tokio::test]
    async fn test_empty_answers_compare_verbatim() {
        let comparator = OptionComparator::new();

        let result = comparator
            .compare(&Answer::option("  "), &Answer::option("A"))
            .await
            .unwrap();
        assert!(!result.is_equal);
        let ComparisonDetails::OptionMatch(details) = result.details else {
            panic!("expected option details");
        };
        assert!(details.empty_comparison);

        assert!(options(&comparator, "", " ").await);
    }

    #[tokio::test]
    async fn test_strict_variant() {
        let case_sensitive = OptionComparator::strict(true, false);
        assert!(!options(&case_sensitive, "a", "A").await);
        assert!(options(&case_sensitive, "AB", "BA").await);

        let order_sensitive = OptionComparator::strict(false, true);
        assert!(!options(&order_sensitive, "AB", "BA").await);
        assert!(options(&order_sensitive, "ab", "AB").await);
    }

    #[test]
    fn test_normalize_reports_multi_select() {
        let tolerance = OptionMatch::default();
        assert_eq!(tolerance.normalize("b, a"), ("AB".to_string(), true));
        assert_eq!(tolerance.normalize("c"), ("C".to_string(), false));
        assert_eq!(tolerance.normalize("A?"), ("A?".to_string(), false));
    }
}
