//! @ai:module:intent TOML corpus loader for answer-set files
//! @ai:module:layer infrastructure
//! @ai:module:public_api CorpusLoader, CorpusLoaderTrait
//! @ai:module:stateless true

use crate::config::FilterConfig;
use crate::corpus::pair::{AnswerPair, AnswerSetFile};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Trait for loading answer pairs
pub trait CorpusLoaderTrait: Send + Sync {
    /// @ai:intent Load all pairs from corpus directory
    fn load_all(&self, corpus_dir: &Path) -> Result<Vec<AnswerPair>>;

    /// @ai:intent Load pairs matching filter criteria
    fn load_filtered(&self, corpus_dir: &Path, filter: &FilterConfig) -> Result<Vec<AnswerPair>>;

    /// @ai:intent Load a single pair by ID
    fn load_by_id(&self, corpus_dir: &Path, pair_id: &str) -> Result<Option<AnswerPair>>;
}

/// @ai:intent Loads answer pairs from every `.toml` file under a directory
pub struct CorpusLoader;

impl CorpusLoader {
    /// @ai:intent Create a new corpus loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse one answer-set file, tagging pairs with their source
    /// @ai:effects fs:read
    fn parse_answer_set(path: &Path) -> Result<Vec<AnswerPair>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read answer set: {}", path.display()))?;

        let file: AnswerSetFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse answer set: {}", path.display()))?;

        let source = file.name.unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        Ok(file
            .pairs
            .into_iter()
            .map(|mut pair| {
                pair.source.get_or_insert_with(|| source.clone());
                pair
            })
            .collect())
    }

    /// @ai:effects fs:read
    /// @ai:post paths are in file-name order at every directory level
    fn find_answer_sets(corpus_dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(corpus_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "toml")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect()
    }
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusLoaderTrait for CorpusLoader {
    /// @ai:intent Load all pairs, skipping unreadable files and duplicate ids
    /// @ai:post pairs are sorted by id
    /// @ai:effects fs:read
    fn load_all(&self, corpus_dir: &Path) -> Result<Vec<AnswerPair>> {
        if !corpus_dir.is_dir() {
            anyhow::bail!("Corpus directory not found: {}", corpus_dir.display());
        }

        let mut pairs = Vec::new();
        let mut seen = HashSet::new();

        for path in Self::find_answer_sets(corpus_dir) {
            match Self::parse_answer_set(&path) {
                Ok(loaded) => {
                    for pair in loaded {
                        if seen.insert(pair.id.clone()) {
                            pairs.push(pair);
                        } else {
                            tracing::warn!(
                                "Skipping duplicate pair id {} in {}",
                                pair.id,
                                path.display()
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping invalid answer set {}: {:#}", path.display(), e);
                }
            }
        }

        pairs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(pairs)
    }

    /// @ai:intent Load pairs whose resolved reference category and id pass the filter
    /// @ai:effects fs:read
    fn load_filtered(&self, corpus_dir: &Path, filter: &FilterConfig) -> Result<Vec<AnswerPair>> {
        let all_pairs = self.load_all(corpus_dir)?;

        let filtered: Vec<AnswerPair> = all_pairs
            .into_iter()
            .filter(|pair| filter.matches(Some(pair.reference_answer().category), &pair.id))
            .collect();

        Ok(filtered)
    }

    /// @ai:intent Load a single pair by ID
    /// @ai:effects fs:read
    fn load_by_id(&self, corpus_dir: &Path, pair_id: &str) -> Result<Option<AnswerPair>> {
        let all_pairs = self.load_all(corpus_dir)?;
        Ok(all_pairs.into_iter().find(|p| p.id == pair_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerCategory;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_answer_set(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    const MECHANICS: &str = r#"
name = "mechanics"

[[pair]]
id = "m-2"
candidate = "F = ma"
reference = "F = m a"

[[pair]]
id = "m-1"
candidate = "9.81"
reference = "9.8"
reference_unit = "m/s^2"
"#;

    #[test]
    fn test_load_sorted_and_tagged() {
        let temp = TempDir::new().unwrap();
        create_answer_set(temp.path(), "nested/mechanics.toml", MECHANICS);

        let pairs = CorpusLoader::new().load_all(temp.path()).unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].id, "m-1");
        assert_eq!(pairs[1].source.as_deref(), Some("mechanics"));
    }

    #[test]
    fn test_invalid_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        create_answer_set(temp.path(), "good.toml", MECHANICS);
        create_answer_set(temp.path(), "bad.toml", "[[pair]]\nid = ");
        create_answer_set(temp.path(), "notes.txt", "not an answer set");

        let pairs = CorpusLoader::new().load_all(temp.path()).unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let temp = TempDir::new().unwrap();
        create_answer_set(
            temp.path(),
            "dupes.toml",
            r#"
[[pair]]
id = "x"
candidate = "1"
reference = "1"

[[pair]]
id = "x"
candidate = "2"
reference = "2"
"#,
        );

        let pairs = CorpusLoader::new().load_all(temp.path()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].candidate, "1");
        assert_eq!(pairs[0].source.as_deref(), Some("dupes"));
    }

    #[test]
    fn test_duplicate_ids_across_files_keep_first_file_by_name() {
        let temp = TempDir::new().unwrap();
        let pair = |candidate: &str| {
            format!(
                "[[pair]]\nid = \"shared\"\ncandidate = \"{}\"\nreference = \"1\"\n",
                candidate
            )
        };
        create_answer_set(temp.path(), "zeta.toml", &pair("from zeta"));
        create_answer_set(temp.path(), "alpha.toml", &pair("from alpha"));
        create_answer_set(temp.path(), "mid/beta.toml", &pair("from beta"));

        let loader = CorpusLoader::new();
        let sets = CorpusLoader::find_answer_sets(temp.path());
        let names: Vec<_> = sets
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha.toml", "beta.toml", "zeta.toml"]);

        let pairs = loader.load_all(temp.path()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].candidate, "from alpha");
        assert_eq!(pairs[0].source.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_load_filtered_by_category() {
        let temp = TempDir::new().unwrap();
        create_answer_set(temp.path(), "mechanics.toml", MECHANICS);

        let filter = FilterConfig {
            categories: Some(vec![AnswerCategory::PhysicalQuantity]),
            ..Default::default()
        };

        let pairs = CorpusLoader::new()
            .load_filtered(temp.path(), &filter)
            .unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].id, "m-1");
    }

    #[test]
    fn test_load_by_id() {
        let temp = TempDir::new().unwrap();
        create_answer_set(temp.path(), "mechanics.toml", MECHANICS);

        let loader = CorpusLoader::new();
        assert!(loader.load_by_id(temp.path(), "m-2").unwrap().is_some());
        assert!(loader.load_by_id(temp.path(), "missing").unwrap().is_none());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(CorpusLoader::new()
            .load_all(&temp.path().join("absent"))
            .is_err());
    }
}
