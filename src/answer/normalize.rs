//! @ai:module:intent Strip boxed wrappers and math delimiters from raw answers
//! @ai:module:layer domain
//! @ai:module:public_api normalize, normalize_fully
//! @ai:module:stateless true

use regex::Regex;
use std::sync::OnceLock;

const BOXED_PREFIX: &str = "\\boxed{";
const MAX_UNWRAP_PASSES: usize = 20;

/// Display and inline math delimiters, outermost forms first.
fn delimiter_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?s)\$\$(.*?)\$\$").expect("Invalid regex"),
            Regex::new(r"\$([^$]+)\$").expect("Invalid regex"),
            Regex::new(r"(?s)\\\[(.*?)\\\]").expect("Invalid regex"),
            Regex::new(r"(?s)\\\((.*?)\\\)").expect("Invalid regex"),
        ]
    })
}

/// @ai:intent Remove one layer of `\boxed{}` and one layer of math delimiters
/// @ai:post result is trimmed; input without wrappers is returned unchanged (modulo trim)
/// @ai:example ("\\boxed{3.0}") -> "3.0"
/// @ai:example ("$$F = ma$$") -> "F = ma"
/// @ai:effects pure
pub fn normalize(raw: &str) -> String {
    let unboxed = strip_boxed(raw.trim());
    strip_math_delimiters(&unboxed).trim().to_string()
}

/// @ai:intent Repeat single-layer normalization until nothing changes
/// @ai:example ("\\boxed{\\boxed{3}}") -> "3"
/// @ai:idempotent true
/// @ai:effects pure
pub fn normalize_fully(raw: &str) -> String {
    let mut current = raw.trim().to_string();

    for _ in 0..MAX_UNWRAP_PASSES {
        let next = normalize(&current);

        if next == current {
            break;
        }
        current = next;
    }

    current
}

/// @ai:intent Replace every top-level `\boxed{...}` with its content, without rescanning it
/// @ai:effects pure
fn strip_boxed(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(BOXED_PREFIX) {
        let open = start + BOXED_PREFIX.len() - 1;

        let Some(close) = matching_brace(rest, open) else {
            break;
        };

        output.push_str(&rest[..start]);
        output.push_str(&rest[open + 1..close]);
        rest = &rest[close + 1..];
    }

    output.push_str(rest);
    output
}

/// @ai:intent Byte index of the `}` balancing the `{` at `open`
/// @ai:pre text[open..] starts with '{'
/// @ai:effects pure
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;

    for (offset, ch) in text[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);

                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// @ai:intent Apply the first delimiter pattern that matches
/// @ai:effects pure
fn strip_math_delimiters(text: &str) -> String {
    for pattern in delimiter_patterns() {
        if pattern.is_match(text) {
            return pattern.replace_all(text, "${1}").into_owned();
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_boxed() {
        assert_eq!(normalize("\\boxed{3.0}"), "3.0");
    }

    #[test]
    fn test_strips_boxed_with_nested_braces() {
        assert_eq!(normalize("\\boxed{\\frac{1}{2}}"), "\\frac{1}{2}");
    }

    #[test]
    fn test_strips_block_and_inline_math() {
        assert_eq!(normalize("$$E = mc^2$$"), "E = mc^2");
        assert_eq!(normalize("$x$"), "x");
        assert_eq!(normalize("\\[ v_0 t \\]"), "v_0 t");
        assert_eq!(normalize("\\(a+b\\)"), "a+b");
    }

    #[test]
    fn test_boxed_inside_math() {
        assert_eq!(normalize("$\\boxed{9.8}$"), "9.8");
    }

    #[test]
    fn test_only_one_layer_is_removed() {
        assert_eq!(normalize("\\boxed{\\boxed{3}}"), "\\boxed{3}");
        assert_eq!(normalize_fully("\\boxed{\\boxed{3}}"), "3");
    }

    #[test]
    fn test_plain_strings_pass_through() {
        assert_eq!(normalize("  42  "), "42");
        assert_eq!(
            normalize("The force increases with mass"),
            "The force increases with mass"
        );
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_unbalanced_boxed_is_left_alone() {
        assert_eq!(normalize("\\boxed{3"), "\\boxed{3");
    }

    #[test]
    fn test_multiple_boxed_values() {
        assert_eq!(normalize("\\boxed{A} and \\boxed{C}"), "A and C");
    }
}
