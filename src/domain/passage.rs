// ============================================================
// Layer 3 — Scored Passage Domain Type
// ============================================================
// One candidate passage returned by the retrieval engine,
// together with the score the engine gave it.
//
// Passages arrive already ranked: index 0 is the best match.
// This crate never re-ranks them.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPassage {
    /// Passage text as stored in the index
    pub passage: String,

    /// Engine score, higher is better
    pub score: f64,
}

impl ScoredPassage {
    pub fn new(passage: impl Into<String>, score: f64) -> Self {
        Self {
            passage: passage.into(),
            score,
        }
    }
}

/// Arguments of one ranked-passage lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageQuery {
    /// Natural language question
    pub query: String,

    /// Location of the search index
    pub index: String,

    /// How many documents the engine retrieves before splitting
    /// them into passages
    pub hits: usize,

    /// How many passages to return
    pub k: usize,
}

impl PassageQuery {
    pub fn new(query: impl Into<String>, index: impl Into<String>, hits: usize, k: usize) -> Self {
        Self {
            query: query.into(),
            index: index.into(),
            hits,
            k,
        }
    }
}
