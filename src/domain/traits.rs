// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the workflows and their collaborators.
//
//   PassageRetriever — the external search engine. The only
//                      shipped implementation runs a retrieval
//                      program as a child process; tests use
//                      an in-memory fake.
//
//   Persistable      — anything saved to and restored from a
//                      single file (the vocabulary artifact).
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::path::Path;

use crate::domain::passage::{PassageQuery, ScoredPassage};

// ─── PassageRetriever ─────────────────────────────────────────────────────────
/// A ranked-passage provider.
///
/// Implementations:
///   - CommandRetriever → external retrieval program over stdin/stdout
pub trait PassageRetriever {
    /// Up to `query.k` passages, best first.
    fn ranked_passages(&self, query: &PassageQuery) -> Result<Vec<ScoredPassage>>;

    /// Term → IDF summary of the last lookup, as opaque JSON text.
    fn term_idf_json(&self) -> Result<String>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - VocabPair → word and relation vocabularies as JSON
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path.
    fn load(path: &Path) -> Result<Self>;
}
