// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Loads the train / validation / test splits of one corpus and
// prepares what a training run would need from them:
//
//   Step 1: Load the three splits            (Layer 4 - data)
//   Step 2: Build the text vocabulary        (Layer 4 - data)
//           from the splits the corpus allows
//   Step 3: Align pretrained vectors         (Layer 4 - data)
//           to that vocabulary, if given, and
//           copy them into a burn tensor
//
// Reference: Burn Book §4 (Datasets)

use anyhow::{Context, Result};
use burn::backend::NdArray;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    corpora::{splits, CorpusKind},
    embeddings::EmbeddingTable,
    vocab::Vocabulary,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectConfig {
    pub kind: CorpusKind,
    /// Corpus root holding the split directories / files
    pub path: String,
    /// Optional pretrained vectors to align with the vocabulary
    pub vectors: Option<String>,
    /// Seed for the uniform OOV initialisation
    pub seed: u64,
}

/// Per-split size and sort-key range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub name:          String,
    pub examples:      usize,
    pub min_sort_key:  usize,
    pub max_sort_key:  usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectReport {
    pub splits:          Vec<SplitSummary>,
    pub vocab_size:      usize,
    /// Vocabulary rows that had no pretrained vector
    pub oov_rows:        Option<usize>,
    pub embedding_dim:   Option<usize>,
    /// Shape of the embedding weight tensor
    pub tensor_shape:    Option<[usize; 2]>,
}

pub struct InspectUseCase {
    config: InspectConfig,
}

impl InspectUseCase {
    pub fn new(config: InspectConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<InspectReport> {
        let cfg = &self.config;

        // ── Step 1: Load splits ───────────────────────────────────────────────
        let sets = splits(Path::new(&cfg.path), cfg.kind)
            .with_context(|| format!("Cannot load {:?} corpus from '{}'", cfg.kind, cfg.path))?;

        let summaries = sets
            .iter()
            .map(|ds| {
                let keys = (0..ds.sample_count()).filter_map(|i| ds.sort_key(i));
                let (min, max) = keys.fold((usize::MAX, 0), |(lo, hi), k| (lo.min(k), hi.max(k)));
                SplitSummary {
                    name:         ds.name().to_string(),
                    examples:     ds.sample_count(),
                    min_sort_key: if ds.sample_count() == 0 { 0 } else { min },
                    max_sort_key: max,
                }
            })
            .collect();

        // ── Step 2: Text vocabulary ───────────────────────────────────────────
        let fields  = cfg.kind.text_fields();
        let sources = sets.in_scope(cfg.kind.vocab_scope());
        let vocab   =
            Vocabulary::build(sources.iter().copied().flat_map(|ds| ds.token_streams(fields)));
        tracing::info!(
            "Text vocabulary: {} tokens from {} split(s)",
            vocab.len(),
            sources.len()
        );

        // ── Step 3: Pretrained vectors ────────────────────────────────────────
        let (oov_rows, embedding_dim, tensor_shape) = match &cfg.vectors {
            Some(path) => {
                let table   = EmbeddingTable::load(path)?;
                let mut rng = rand::rngs::StdRng::seed_from_u64(cfg.seed);
                let init    = cfg.kind.oov_init();
                let matrix  = table.aligned_to(&vocab, init, &mut rng);
                let weights = matrix.to_tensor::<NdArray>(&Default::default());
                tracing::info!(
                    "Embedding weights {:?}, {} OOV rows filled with {:?}",
                    weights.dims(),
                    matrix.oov_rows(),
                    init
                );
                (Some(matrix.oov_rows()), Some(matrix.dim()), Some(weights.dims()))
            }
            None => (None, None, None),
        };

        Ok(InspectReport {
            splits: summaries,
            vocab_size: vocab.len(),
            oov_rows,
            embedding_dim,
            tensor_shape,
        })
    }
}
