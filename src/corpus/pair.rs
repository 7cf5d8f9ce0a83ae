//! @ai:module:intent Candidate/reference answer pairs as stored in answer-set files
//! @ai:module:layer domain
//! @ai:module:public_api AnswerPair, AnswerSetFile
//! @ai:module:stateless true

use crate::answer::{Answer, AnswerCategory, AnswerContext};
use serde::{Deserialize, Serialize};

/// @ai:intent One candidate answer to be judged against its reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPair {
    pub id: String,
    pub candidate: String,
    pub reference: String,
    /// Declared category; classified from the text when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<AnswerCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_unit: Option<String>,
    #[serde(default)]
    pub multiple_choice: bool,
    /// Answer set the pair was loaded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// @ai:intent On-disk layout of an answer-set TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerSetFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "pair")]
    pub pairs: Vec<AnswerPair>,
}

impl AnswerPair {
    /// @ai:intent Pair with only the two raw strings
    /// @ai:effects pure
    pub fn new(id: impl Into<String>, candidate: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            candidate: candidate.into(),
            reference: reference.into(),
            category: None,
            candidate_unit: None,
            reference_unit: None,
            multiple_choice: false,
            source: None,
        }
    }

    fn context(&self, unit: &Option<String>) -> AnswerContext {
        AnswerContext {
            unit: unit.clone(),
            multiple_choice: self.multiple_choice,
            category: self.category,
        }
    }

    /// @ai:effects pure
    pub fn candidate_answer(&self) -> Answer {
        Answer::from_context(&self.candidate, &self.context(&self.candidate_unit))
            .with_metadata("pair_id", self.id.as_str())
    }

    /// @ai:effects pure
    pub fn reference_answer(&self) -> Answer {
        Answer::from_context(&self.reference, &self.context(&self.reference_unit))
            .with_metadata("pair_id", self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_answer_set() {
        let file: AnswerSetFile = toml::from_str(
            r#"
            name = "kinematics"

            [[pair]]
            id = "k-1"
            candidate = "\\boxed{9.81}"
            reference = "9.8"
            reference_unit = "m/s^2"

            [[pair]]
            id = "k-2"
            candidate = "b, a"
            reference = "AB"
            multiple_choice = true
            "#,
        )
        .unwrap();

        assert_eq!(file.name.as_deref(), Some("kinematics"));
        assert_eq!(file.pairs.len(), 2);
        assert_eq!(file.pairs[0].reference_unit.as_deref(), Some("m/s^2"));
        assert!(file.pairs[1].multiple_choice);
    }

    #[test]
    fn test_answers_follow_context() {
        let mut pair = AnswerPair::new("k-1", "\\boxed{9.81}", "9.8");
        pair.reference_unit = Some("m/s^2".to_string());

        let candidate = pair.candidate_answer();
        let reference = pair.reference_answer();

        assert_eq!(candidate.category, AnswerCategory::Number);
        assert_eq!(reference.category, AnswerCategory::PhysicalQuantity);
        assert_eq!(reference.unit.as_deref(), Some("m/s^2"));
        assert_eq!(reference.metadata["pair_id"], "k-1");
    }

    #[test]
    fn test_multiple_choice_pair() {
        let mut pair = AnswerPair::new("mc", "b, a", "AB");
        pair.multiple_choice = true;

        assert_eq!(pair.candidate_answer().category, AnswerCategory::Option);
        assert_eq!(pair.reference_answer().category, AnswerCategory::Option);
    }
}
