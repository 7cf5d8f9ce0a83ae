//! @ai:module:intent Prompt builders for judge-backed comparisons
//! @ai:module:layer domain
//! @ai:module:public_api JudgePrompt, unit_comparison_prompt, semantic_comparison_prompt, is_affirmative
//! @ai:module:stateless true

use crate::answer::ComparisonFamily;

/// The only reply counted as a yes.
pub const AFFIRMATIVE_REPLY: &str = "TRUE";

const UNIT_SYSTEM_PROMPT: &str = "You are a physics expert. You are given two numerical values with units and you need to compare them.";

/// @ai:intent Prompt plus optional system instruction
#[derive(Debug, Clone, PartialEq)]
pub struct JudgePrompt {
    pub system: Option<String>,
    pub prompt: String,
}

/// @ai:intent Ask whether two rounded unit-qualified quantities are equal
/// @ai:example ("2", "m", "200", "cm") -> "...: 2 m and 200 cm. Return TRUE if they are equal, FALSE otherwise."
/// @ai:effects pure
pub fn unit_comparison_prompt(left: &str, left_unit: &str, right: &str, right_unit: &str) -> JudgePrompt {
    JudgePrompt {
        system: Some(UNIT_SYSTEM_PROMPT.to_string()),
        prompt: format!(
            "Compare the following two numerical values with units: {} {} and {} {}. Return TRUE if they are equal, FALSE otherwise.",
            left, left_unit, right, right_unit
        ),
    }
}

/// @ai:intent Ask whether two symbolic or textual answers are equivalent, values verbatim
/// @ai:effects pure
pub fn semantic_comparison_prompt(family: ComparisonFamily, left: &str, right: &str) -> JudgePrompt {
    let kind = match family {
        ComparisonFamily::Symbolic => "symbolic",
        _ => "textual",
    };

    JudgePrompt {
        system: None,
        prompt: format!(
            "You are a physics expert. You are given two {} answers and you need to compare them. Return TRUE if they are equal, FALSE otherwise.\n\nAnswer 1: {}\nAnswer 2: {}",
            kind, left, right
        ),
    }
}

/// @ai:intent Exact, case-sensitive match against `TRUE`
/// @ai:example ("TRUE") -> true
/// @ai:example ("true") -> false
/// @ai:example ("TRUE.") -> false
/// @ai:effects pure
pub fn is_affirmative(reply: &str) -> bool {
    reply == AFFIRMATIVE_REPLY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_prompt_mentions_both_quantities() {
        let prompt = unit_comparison_prompt("2", "m", "200", "cm");

        assert!(prompt.system.unwrap().starts_with("You are a physics expert."));
        assert!(prompt.prompt.contains("2 m and 200 cm"));
    }

    #[test]
    fn test_semantic_prompt_keeps_values_verbatim() {
        let prompt = semantic_comparison_prompt(ComparisonFamily::Symbolic, "F = ma", "a = F/m");

        assert_eq!(prompt.system, None);
        assert!(prompt.prompt.contains("two symbolic answers"));
        assert!(prompt.prompt.ends_with("Answer 1: F = ma\nAnswer 2: a = F/m"));
    }

    #[test]
    fn test_only_exact_true_is_affirmative() {
        assert!(is_affirmative("TRUE"));
        assert!(!is_affirmative("true"));
        assert!(!is_affirmative("TRUE\n"));
        assert!(!is_affirmative("FALSE"));
        assert!(!is_affirmative(""));
    }
}
