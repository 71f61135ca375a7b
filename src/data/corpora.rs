// ============================================================
// Layer 4 — Corpus Schemas
// ============================================================
// Field layouts of the three corpora this crate loads.
//
//   SICK   (sentence similarity)   one directory per split
//     a.txt  b.txt  sim.txt
//
//   TrecQA (answer selection)      one directory per split
//     id.txt  a.toks  b.toks  sim.txt  overlap_feats.txt  ans_id.txt
//
//   SST    (sentiment)             one file per split
//     stsa.fine.<split>, each line "<label> <sentence>"
//
// Reference: Marelli et al. (2014) SICK
//            Wang et al. (2007) TrecQA
//            Socher et al. (2013) Stanford Sentiment Treebank

use serde::{Deserialize, Serialize};
use std::{
    io::BufRead,
    path::{Path, PathBuf},
};

use crate::data::{
    dataset::PairDataset,
    embeddings::OovInit,
    open_reader,
    paired::{Example, FieldKind, FieldSpec, FieldValue, LineTransform, PairedDatasetBuilder},
    tokenizer::Tokenizer,
};
use crate::error::{DataError, Result};

/// Number of lexical-overlap features per TrecQA pair
pub const TRECQA_EXT_FEATS: usize = 4;

/// Prefix of the SST split files
pub const SST_FILE_PREFIX: &str = "stsa.fine.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorpusKind {
    Sick,
    TrecQa,
    Sst,
}

impl CorpusKind {
    /// Train, validation and test split names, in that order.
    pub fn split_names(&self) -> [&'static str; 3] {
        match self {
            CorpusKind::Sick   => ["train", "dev", "test"],
            CorpusKind::TrecQa => ["train-all", "raw-dev", "raw-test"],
            CorpusKind::Sst    => ["phrases.train", "dev", "test"],
        }
    }

    /// Token fields that feed the text vocabulary.
    pub fn text_fields(&self) -> &'static [&'static str] {
        match self {
            CorpusKind::Sick   => &["a", "b"],
            CorpusKind::TrecQa => &["sentence_1", "sentence_2"],
            CorpusKind::Sst    => &["sentence"],
        }
    }

    /// Splits whose tokens enter the text vocabulary.
    pub fn vocab_scope(&self) -> VocabScope {
        match self {
            CorpusKind::TrecQa => VocabScope::AllSplits,
            CorpusKind::Sick | CorpusKind::Sst => VocabScope::TrainOnly,
        }
    }

    /// Fill for vocabulary rows without a pretrained vector.
    pub fn oov_init(&self) -> OovInit {
        match self {
            CorpusKind::Sick => OovInit::Zero,
            CorpusKind::TrecQa | CorpusKind::Sst => OovInit::default(),
        }
    }

    /// Load one split located at `path`.
    pub fn load(&self, path: &Path) -> Result<PairDataset> {
        match self {
            CorpusKind::Sick   => sick(path),
            CorpusKind::TrecQa => trecqa(path),
            CorpusKind::Sst    => sst(path),
        }
    }

    fn split_path(&self, root: &Path, split: &str) -> PathBuf {
        match self {
            CorpusKind::Sst => root.join(format!("{SST_FILE_PREFIX}{split}")),
            _ => root.join(split),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VocabScope {
    TrainOnly,
    AllSplits,
}

fn split_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// SICK split: two sentences and a relatedness score.
pub fn sick(dir: &Path) -> Result<PairDataset> {
    let strip = LineTransform::StripTrailingPeriod;
    let examples = PairedDatasetBuilder::new(dir)
        .field(FieldSpec::new("a", "a.txt", FieldKind::Tokens(Tokenizer::Whitespace)).with_transform(strip))
        .field(FieldSpec::new("b", "b.txt", FieldKind::Tokens(Tokenizer::Whitespace)).with_transform(strip))
        .field(FieldSpec::new("label", "sim.txt", FieldKind::Float).with_transform(strip))
        .build()?;

    Ok(PairDataset::new(split_label(dir), examples, "a"))
}

/// TrecQA split: question id, question/answer tokens, relevance
/// label, overlap features and the answer id.
pub fn trecqa(dir: &Path) -> Result<PairDataset> {
    let examples = PairedDatasetBuilder::new(dir)
        .field(FieldSpec::new("id", "id.txt", FieldKind::Float))
        .field(FieldSpec::new("sentence_1", "a.toks", FieldKind::Tokens(Tokenizer::Whitespace)))
        .field(FieldSpec::new("sentence_2", "b.toks", FieldKind::Tokens(Tokenizer::Whitespace)))
        .field(FieldSpec::new("label", "sim.txt", FieldKind::Int))
        .field(FieldSpec::new(
            "ext_feats",
            "overlap_feats.txt",
            FieldKind::Floats { width: Some(TRECQA_EXT_FEATS) },
        ))
        .field(
            FieldSpec::new("aid", "ans_id.txt", FieldKind::Text)
                .with_transform(LineTransform::StripTrailingPeriod),
        )
        .build()?;

    Ok(PairDataset::new(split_label(dir), examples, "sentence_1"))
}

/// SST split: one file, `<label> <sentence>` per line.
pub fn sst(path: &Path) -> Result<PairDataset> {
    let reader       = open_reader(path)?;
    let mut examples = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DataError::io(path, e))?;
        let (label, sentence) = line
            .split_once(' ')
            .ok_or_else(|| DataError::malformed(path, n + 1, "expected '<label> <sentence>'"))?;
        let label: i64 = label.parse().map_err(|e| {
            DataError::malformed(path, n + 1, format!("bad sentiment label '{label}': {e}"))
        })?;

        examples.push(
            Example::new()
                .with_field("label", FieldValue::Int(label))
                .with_field("sentence", FieldValue::Tokens(Tokenizer::Filtered.tokenize(sentence))),
        );
    }

    Ok(PairDataset::new(split_label(path), examples, "sentence"))
}

/// Train, validation and test sets of one corpus.
#[derive(Debug, Clone)]
pub struct Splits {
    pub train:      PairDataset,
    pub validation: PairDataset,
    pub test:       PairDataset,
}

impl Splits {
    pub fn iter(&self) -> impl Iterator<Item = &PairDataset> {
        [&self.train, &self.validation, &self.test].into_iter()
    }

    /// The splits `scope` selects, train first.
    pub fn in_scope(&self, scope: VocabScope) -> Vec<&PairDataset> {
        match scope {
            VocabScope::TrainOnly => vec![&self.train],
            VocabScope::AllSplits => self.iter().collect(),
        }
    }
}

/// Load all three splits of `kind` under `root`.
pub fn splits(root: &Path, kind: CorpusKind) -> Result<Splits> {
    let [train, validation, test] = kind.split_names();
    let load = |split: &str| {
        let path = kind.split_path(root, split);
        tracing::debug!("Loading {:?} split from '{}'", kind, path.display());
        kind.load(&path)
    };

    let splits = Splits {
        train:      load(train)?,
        validation: load(validation)?,
        test:       load(test)?,
    };

    tracing::info!(
        "{:?}: {} train, {} validation, {} test examples",
        kind,
        splits.train.sample_count(),
        splits.validation.sample_count(),
        splits.test.sample_count()
    );
    Ok(splits)
}
