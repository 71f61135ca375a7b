// ============================================================
// Layer 2 — BuildVocabUseCase
// ============================================================
// Builds the word and relation vocabularies for the simple
// relation-question model and writes them to disk:
//
//   Step 1: Find <data_dir>/annotated*.txt     (Layer 4 - data)
//   Step 2: Read relation + question columns   (Layer 4 - data)
//   Step 3: Build both vocabularies            (Layer 4 - data)
//   Step 4: Save the pair as JSON              (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    annotated::{annotated_files, read_annotated},
    vocab::{VocabPair, Vocabulary},
};
use crate::domain::traits::Persistable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildVocabConfig {
    /// Directory holding the annotated question files
    pub data_dir: String,
    /// Where the vocabulary pair is written
    pub output_path: String,
    /// File name prefix of the annotated files
    pub file_prefix: String,
}

impl Default for BuildVocabConfig {
    fn default() -> Self {
        Self {
            data_dir:    "data/SimpleQuestions_v2".to_string(),
            output_path: "data/SimpleQuestions_v2/vocab.json".to_string(),
            file_prefix: "annotated".to_string(),
        }
    }
}

pub struct BuildVocabUseCase {
    config: BuildVocabConfig,
}

impl BuildVocabUseCase {
    pub fn new(config: BuildVocabConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<VocabPair> {
        let cfg = &self.config;

        // ── Step 1: Locate input files ────────────────────────────────────────
        let files = annotated_files(Path::new(&cfg.data_dir), &cfg.file_prefix)
            .with_context(|| format!("Cannot list annotated files in '{}'", cfg.data_dir))?;
        if files.is_empty() {
            tracing::warn!(
                "No '{}*.txt' files in '{}', the vocabularies will be empty",
                cfg.file_prefix,
                cfg.data_dir
            );
        }

        // ── Step 2: Read relation and question columns ────────────────────────
        let mut records = Vec::new();
        for file in &files {
            let mut recs = read_annotated(file)?;
            tracing::debug!("Read {} questions from '{}'", recs.len(), file.display());
            records.append(&mut recs);
        }

        // ── Step 3: Build both vocabularies in one pass ──────────────────────
        let (words, relations) = Vocabulary::build_with_relations(
            records.iter().map(|r| (&r.relation, &r.tokens)),
        );
        tracing::info!(
            "Built {} words and {} relations from {} questions",
            words.len(),
            relations.len(),
            records.len()
        );

        // ── Step 4: Persist ───────────────────────────────────────────────────
        let pair = VocabPair { words, relations };
        pair.save(Path::new(&cfg.output_path))?;
        Ok(pair)
    }
}
