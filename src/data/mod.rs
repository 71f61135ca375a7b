// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything that turns flat text files into in-memory data.
//
//   raw lines
//       │
//       ▼
//   tokenizer    → whitespace split + denylist filter
//       │
//       ├──────────────► vocab       → token / relation → id
//       │
//       ├──────────────► embeddings  → pretrained rows, OOV set
//       │
//       ▼
//   paired       → parallel files zipped into Examples
//       │
//       ▼
//   corpora      → SICK / TrecQA / SST field schemas
//       │
//       ▼
//   dataset      → Burn Dataset + sort key for batching
//
// `annotated` reads the tab-separated SimpleQuestions files
// that feed the word/relation vocabulary build.
//
// Reference: Burn Book §4 (Datasets)
//            Rust Book §13 (Iterators and Closures)

use std::{
    fs::File,
    io::{BufReader, ErrorKind},
    path::Path,
};

use crate::error::{DataError, Result};

/// Whitespace tokenizer with the treebank-artifact denylist
pub mod tokenizer;

/// Sorted, deterministic token → id mapping
pub mod vocab;

/// Pretrained vector file loader and OOV bookkeeping
pub mod embeddings;

/// Line-synchronous reader over parallel files
pub mod paired;

/// Field schemas for the SICK, TrecQA and SST corpora
pub mod corpora;

/// Burn Dataset implementation for paired examples
pub mod dataset;

/// Tab-delimited relation/question reader
pub mod annotated;

/// Open a file for buffered reading.
/// A file that does not exist becomes `MissingResource`.
pub(crate) fn open_reader(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(f) => Ok(BufReader::new(f)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(DataError::MissingResource(path.to_path_buf()))
        }
        Err(e) => Err(DataError::io(path, e)),
    }
}
