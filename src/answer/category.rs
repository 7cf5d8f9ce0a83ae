//! @ai:module:intent Closed taxonomy of answer categories
//! @ai:module:layer domain
//! @ai:module:public_api AnswerCategory, ComparisonFamily
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// @ai:intent Category of an answer; selects which comparator is eligible
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerCategory {
    /// Dimensionless numeric value, e.g. `42`, `3.14`
    Number,
    /// A single equality, e.g. `F = ma`
    Equation,
    /// Number plus unit, e.g. `9.8 m/s^2`
    PhysicalQuantity,
    /// Symbolic expression without units, e.g. `x^2 + 1`
    Formula,
    /// Free-form prose
    Text,
    /// Multiple-choice selection, e.g. `A`, `BD`
    Option,
}

/// @ai:intent Groups of categories compared by the same strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonFamily {
    Numeric,
    Symbolic,
    Text,
    Option,
}

impl AnswerCategory {
    pub const ALL: [AnswerCategory; 6] = [
        AnswerCategory::Number,
        AnswerCategory::Equation,
        AnswerCategory::PhysicalQuantity,
        AnswerCategory::Formula,
        AnswerCategory::Text,
        AnswerCategory::Option,
    ];

    /// @ai:intent Convert category to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerCategory::Number => "number",
            AnswerCategory::Equation => "equation",
            AnswerCategory::PhysicalQuantity => "physical_quantity",
            AnswerCategory::Formula => "formula",
            AnswerCategory::Text => "text",
            AnswerCategory::Option => "option",
        }
    }

    /// @ai:intent Family used by comparators to decide capability
    /// @ai:effects pure
    pub fn family(&self) -> ComparisonFamily {
        match self {
            AnswerCategory::Number | AnswerCategory::PhysicalQuantity => ComparisonFamily::Numeric,
            AnswerCategory::Equation | AnswerCategory::Formula => ComparisonFamily::Symbolic,
            AnswerCategory::Text => ComparisonFamily::Text,
            AnswerCategory::Option => ComparisonFamily::Option,
        }
    }

    /// @ai:intent True when the value of this category must be numeric
    /// @ai:effects pure
    pub fn is_numeric(&self) -> bool {
        self.family() == ComparisonFamily::Numeric
    }
}

impl std::fmt::Display for AnswerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnswerCategory {
    type Err = String;

    /// @ai:intent Parse a category name, accepting the legacy type aliases too
    /// @ai:effects pure
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "number" | "numerical" => Ok(AnswerCategory::Number),
            "equation" => Ok(AnswerCategory::Equation),
            "physical_quantity" | "quantity" => Ok(AnswerCategory::PhysicalQuantity),
            "formula" | "symbolic" | "expression" => Ok(AnswerCategory::Formula),
            "text" | "textual" => Ok(AnswerCategory::Text),
            "option" => Ok(AnswerCategory::Option),
            other => Err(format!("unknown answer category: {}", other)),
        }
    }
}
