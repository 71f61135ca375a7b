// ============================================================
// Layer 2 — EmbeddingsUseCase
// ============================================================
// Checks a pretrained vector file against a training corpus:
//
//   Step 1: Load the vector table            (Layer 4 - data)
//   Step 2: Tokenise every corpus line       (Layer 4 - data)
//   Step 3: Collect the OOV tokens           (Layer 4 - data)
//   Step 4: Optionally write a JSON report
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, io::BufRead, path::Path};

use crate::data::{embeddings::EmbeddingTable, open_reader, tokenizer::tokenize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Pretrained vector file (`token v1 ... vD` per line)
    pub vectors: String,
    /// Training corpus, one sentence per line
    pub corpus: String,
    /// Optional path for a JSON summary
    pub report: Option<String>,
}

/// What the vector file covers and what it misses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingSummary {
    pub vectors:   usize,
    pub dim:       usize,
    pub oov_count: usize,
    pub oov:       Vec<String>,
}

pub struct EmbeddingsUseCase {
    config: EmbeddingsConfig,
}

impl EmbeddingsUseCase {
    pub fn new(config: EmbeddingsConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<EmbeddingSummary> {
        let cfg = &self.config;

        let corpus_path = Path::new(&cfg.corpus);
        let corpus = open_reader(corpus_path)?
            .lines()
            .map(|line| line.map(|l| tokenize(&l)))
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("Cannot read corpus '{}'", cfg.corpus))?;
        tracing::debug!("Tokenised {} corpus lines", corpus.len());

        let (table, oov) = EmbeddingTable::load_with_oov(&cfg.vectors, corpus)
            .with_context(|| format!("Cannot load vectors from '{}'", cfg.vectors))?;

        let summary = EmbeddingSummary {
            vectors:   table.len(),
            dim:       table.dim(),
            oov_count: oov.len(),
            oov:       oov.into_iter().collect(),
        };

        if let Some(report) = &cfg.report {
            fs::write(report, serde_json::to_string_pretty(&summary)?)
                .with_context(|| format!("Cannot write report '{report}'"))?;
            tracing::info!("OOV report written to '{}'", report);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_and_report() {
        let dir     = tempfile::tempdir().unwrap();
        let vectors = dir.path().join("word2vec.sst-1");
        let corpus  = dir.path().join("stsa.fine.phrases.train");
        let report  = dir.path().join("oov.json");

        fs::write(&vectors, "a 0.1 0.2 0.3\nb 0.4 0.5 0.6\n").unwrap();
        fs::write(&corpus, "a b c\nd -- a .\n").unwrap();

        let summary = EmbeddingsUseCase::new(EmbeddingsConfig {
            vectors: vectors.to_string_lossy().into_owned(),
            corpus:  corpus.to_string_lossy().into_owned(),
            report:  Some(report.to_string_lossy().into_owned()),
        })
        .execute()
        .unwrap();

        assert_eq!(summary.vectors, 2);
        assert_eq!(summary.dim, 3);
        assert_eq!(summary.oov, vec!["c", "d"]);

        let written: EmbeddingSummary =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(written, summary);
    }

    #[test]
    fn test_missing_vectors_is_an_error_not_an_exit() {
        let dir    = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.txt");
        fs::write(&corpus, "a\n").unwrap();

        let result = EmbeddingsUseCase::new(EmbeddingsConfig {
            vectors: dir.path().join("absent.txt").to_string_lossy().into_owned(),
            corpus:  corpus.to_string_lossy().into_owned(),
            report:  None,
        })
        .execute();

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::error::DataError>(),
            Some(crate::error::DataError::MissingResource(_))
        ));
    }
}
