//! @ai:module:intent Answer-set corpus definitions and loading
//! @ai:module:layer domain
//! @ai:module:public_api AnswerPair, AnswerSetFile, CorpusLoader

pub mod loader;
pub mod pair;

pub use loader::{CorpusLoader, CorpusLoaderTrait};
pub use pair::{AnswerPair, AnswerSetFile};
