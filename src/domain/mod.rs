// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs and traits shared by the other layers.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O or child processes
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A ranked passage and the query that produced it
pub mod passage;

// Core abstractions (traits) that other layers implement
pub mod traits;
