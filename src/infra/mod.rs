// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Adapters to things outside the process:
//
//   vocab_store.rs — writes and reads the vocabulary pair
//                    artifact as JSON
//
//   retrieval.rs   — runs the external passage-retrieval
//                    engine as a child process speaking JSON
//                    over stdin/stdout
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Vocabulary artifact persistence
pub mod vocab_store;

/// External passage retrieval adapter
pub mod retrieval;
