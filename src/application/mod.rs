// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case is one workflow the CLI can start. It wires the
// data loaders and infra adapters together and returns a plain
// result struct; printing is left to Layer 1.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Word + relation vocabulary build for relation questions
pub mod build_vocab_use_case;

// Pretrained vector coverage check
pub mod embeddings_use_case;

// Corpus split loading, vocabulary and vector alignment
pub mod inspect_use_case;

// Ranked passage lookup through the external engine
pub mod retrieve_use_case;
