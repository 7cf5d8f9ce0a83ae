//! @ai:module:intent Answer value object and its construction from raw text
//! @ai:module:layer domain
//! @ai:module:public_api Answer, AnswerValue, AnswerContext
//! @ai:module:stateless true

use crate::answer::category::AnswerCategory;
use crate::answer::classify::{classify, parse_number, split_quantity};
use crate::answer::normalize::normalize;
use crate::error::{CompareError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// @ai:intent Payload of an answer: numeric for number/quantity, text otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(value) => write!(f, "{}", value),
            AnswerValue::Text(value) => write!(f, "{}", value),
        }
    }
}

/// @ai:intent One side of a comparison
///
/// Number and physical_quantity answers carry a numeric value, and only a
/// physical_quantity carries a unit. Option values are non-empty and
/// alphanumeric once separators are removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub value: AnswerValue,
    pub category: AnswerCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Opaque to comparators
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// @ai:intent Structural hints a dataset loader knows about a raw answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerContext {
    /// Unit declared by the problem, if any
    pub unit: Option<String>,
    /// The problem is a multiple-choice question
    pub multiple_choice: bool,
    /// Category assigned by the dataset, overriding classification when it fits
    pub category: Option<AnswerCategory>,
}

impl Answer {
    fn build(value: AnswerValue, category: AnswerCategory, unit: Option<String>) -> Self {
        Self {
            value,
            category,
            unit,
            metadata: BTreeMap::new(),
        }
    }

    /// @ai:example (42.0) -> Answer { value: 42, category: number }
    pub fn number(value: f64) -> Self {
        Self::build(AnswerValue::Number(value), AnswerCategory::Number, None)
    }

    pub fn quantity(value: f64, unit: impl Into<String>) -> Self {
        Self::build(
            AnswerValue::Number(value),
            AnswerCategory::PhysicalQuantity,
            Some(unit.into()),
        )
    }

    /// @ai:intent Quantity whose unit was not stated
    pub fn unitless_quantity(value: f64) -> Self {
        Self::build(
            AnswerValue::Number(value),
            AnswerCategory::PhysicalQuantity,
            None,
        )
    }

    pub fn option(value: impl Into<String>) -> Self {
        Self::build(
            AnswerValue::Text(value.into()),
            AnswerCategory::Option,
            None,
        )
    }

    pub fn formula(value: impl Into<String>) -> Self {
        Self::build(
            AnswerValue::Text(value.into()),
            AnswerCategory::Formula,
            None,
        )
    }

    pub fn equation(value: impl Into<String>) -> Self {
        Self::build(
            AnswerValue::Text(value.into()),
            AnswerCategory::Equation,
            None,
        )
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::build(AnswerValue::Text(value.into()), AnswerCategory::Text, None)
    }

    /// @ai:intent Attach an opaque metadata entry
    /// @ai:effects pure
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// @ai:intent Normalize, classify and build an answer from raw model output
    /// @ai:post number answers carry a parsed numeric value
    /// @ai:example ("\\boxed{3.0}") -> Answer::number(3.0)
    /// @ai:example ("F = ma") -> Answer::equation("F = ma")
    /// @ai:effects pure
    pub fn from_raw(raw: &str) -> Self {
        Self::classified(normalize(raw))
    }

    /// @ai:intent Build an answer honouring the loader's structural hints
    /// @ai:post multiple-choice wins, then a declared unit, then a declared category, then classification
    /// @ai:effects pure
    pub fn from_context(raw: &str, context: &AnswerContext) -> Self {
        let normalized = normalize(raw);

        if context.multiple_choice {
            return Self::option(normalized);
        }

        if let Some(unit) = context.unit.as_deref().filter(|u| !u.trim().is_empty()) {
            match leading_number(&normalized) {
                Some(value) => return Self::quantity(value, unit.trim()),
                None => tracing::warn!(
                    "Declared unit '{}' but '{}' is not numeric; classifying instead",
                    unit,
                    normalized
                ),
            }
        }

        if let Some(category) = context.category {
            if let Some(answer) = Self::declared(&normalized, category) {
                return answer;
            }
            tracing::warn!(
                "Value '{}' does not fit declared category {}; classifying instead",
                normalized,
                category
            );
        }

        Self::classified(normalized)
    }

    fn declared(normalized: &str, category: AnswerCategory) -> Option<Self> {
        match category {
            AnswerCategory::Number => parse_number(normalized).map(Self::number),
            AnswerCategory::PhysicalQuantity => {
                split_quantity(normalized).map(|(value, unit)| match unit {
                    Some(unit) => Self::quantity(value, unit),
                    None => Self::unitless_quantity(value),
                })
            }
            AnswerCategory::Option => Some(Self::option(normalized)),
            AnswerCategory::Equation | AnswerCategory::Formula | AnswerCategory::Text => Some(
                Self::build(AnswerValue::Text(normalized.to_string()), category, None),
            ),
        }
    }

    fn classified(normalized: String) -> Self {
        let category = classify(&normalized);

        match (category, parse_number(&normalized)) {
            (AnswerCategory::Number, Some(value)) => Self::number(value),
            _ => Self::build(AnswerValue::Text(normalized), category, None),
        }
    }

    /// @ai:intent Numeric view of the value for the numeric comparison path
    /// @ai:post Err(InvalidAnswer) when the value cannot be read as a number
    /// @ai:effects pure
    pub fn numeric_value(&self) -> Result<f64> {
        match &self.value {
            AnswerValue::Number(value) => Ok(*value),
            AnswerValue::Text(text) => {
                parse_number(text).ok_or_else(|| CompareError::InvalidAnswer {
                    category: self.category,
                    reason: format!("'{}' is not a number", text),
                })
            }
        }
    }

    /// @ai:intent Reclassify the right-hand side of an `lhs = rhs` equation
    /// @ai:post None unless this is an equation with a non-empty right-hand side
    /// @ai:example ("v = 3.1") -> Some(Answer::number(3.1))
    /// @ai:effects pure
    pub fn right_hand_side(&self) -> Option<Answer> {
        if self.category != AnswerCategory::Equation {
            return None;
        }

        let text = self.display_value();
        let (_, rhs) = text.split_once('=')?;
        let rhs = rhs.trim();
        if rhs.is_empty() {
            return None;
        }

        let mut answer = Self::from_raw(rhs);
        answer.metadata = self.metadata.clone();
        Some(answer)
    }

    /// @ai:intent Value rendered without unit, as sent to the judge
    /// @ai:effects pure
    pub fn display_value(&self) -> String {
        self.value.to_string()
    }

    /// @ai:intent Check the data-model invariants for this answer
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| CompareError::InvalidAnswer {
            category: self.category,
            reason,
        };

        if self.category.is_numeric() && !matches!(self.value, AnswerValue::Number(_)) {
            return Err(invalid(format!("value '{}' must be numeric", self.value)));
        }

        if self.unit.is_some() && self.category != AnswerCategory::PhysicalQuantity {
            return Err(invalid("only physical quantities carry a unit".to_string()));
        }

        if self.category == AnswerCategory::Option {
            let AnswerValue::Text(text) = &self.value else {
                return Err(invalid("option value must be text".to_string()));
            };

            let letters: String = text
                .chars()
                .filter(|c| !c.is_whitespace() && !matches!(c, ',' | ';' | '-'))
                .collect();

            if letters.is_empty() {
                return Err(invalid("option value is empty".to_string()));
            }
            if !letters.chars().all(char::is_alphanumeric) {
                return Err(invalid(format!("option '{}' is not alphanumeric", text)));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {}", self.value, unit),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Number alone, or the number at the head of "number unit".
fn leading_number(value: &str) -> Option<f64> {
    parse_number(value).or_else(|| split_quantity(value).map(|(number, _)| number))
}
