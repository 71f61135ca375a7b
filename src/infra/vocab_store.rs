// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Saves and restores the (word, relation) vocabulary pair that
// the training process reads back later.
//
// File format (pretty-printed JSON):
//   {
//     "words":     { "a": 0, "b": 1, ... },
//     "relations": { "film/film/genre": 0, ... }
//   }
//
// Loading re-validates that both maps use dense ids 0..N-1.
//
// Reference: serde_json crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::data::{open_reader, vocab::VocabPair};
use crate::domain::traits::Persistable;

impl Persistable for VocabPair {
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write vocabulary to '{}'", path.display()))?;

        tracing::info!(
            "Saved {} words and {} relations to '{}'",
            self.words.len(),
            self.relations.len(),
            path.display()
        );
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let reader = open_reader(path)?;
        let pair: VocabPair = serde_json::from_reader(reader)
            .with_context(|| format!("Cannot parse vocabulary '{}'", path.display()))?;

        tracing::debug!(
            "Loaded {} words and {} relations from '{}'",
            pair.words.len(),
            pair.relations.len(),
            path.display()
        );
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocab::Vocabulary;
    use crate::error::DataError;

    #[test]
    fn test_save_and_load() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vocab.json");

        let (words, relations) = Vocabulary::build_with_relations(vec![
            ("r/b", vec!["who", "is"]),
            ("r/a", vec!["what", "is"]),
        ]);
        let pair = VocabPair { words, relations };

        pair.save(&path).unwrap();
        let back = VocabPair::load(&path).unwrap();

        assert_eq!(back, pair);
        assert_eq!(back.relations.id("r/a"), Some(0));
        assert_eq!(back.words.id("who"), Some(2));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = VocabPair::load(&dir.path().join("vocab.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingResource(_))
        ));
    }

    #[test]
    fn test_load_rejects_sparse_ids() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, r#"{"words":{"a":3},"relations":{}}"#).unwrap();
        assert!(VocabPair::load(&path).is_err());
    }
}
