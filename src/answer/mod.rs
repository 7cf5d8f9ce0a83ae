//! @ai:module:intent Answer model: normalization, classification and value types
//! @ai:module:layer domain
//! @ai:module:public_api Answer, AnswerValue, AnswerContext, AnswerCategory, ComparisonFamily, Classifier, normalize, classify

pub mod category;
pub mod classify;
pub mod normalize;
pub mod value;

pub use category::{AnswerCategory, ComparisonFamily};
pub use classify::{
    classify, classify_raw, is_pure_number, parse_number, split_quantity, Classifier,
};
pub use normalize::{normalize, normalize_fully};
pub use value::{Answer, AnswerContext, AnswerValue};
