// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing the training data.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Keeping it pure means the reader and the training loop agree
// on a contract that can be unit tested without any backend.

// Row-major numeric buffer with a shape
pub mod array;

// A label plus feature arrays sharing a batch dimension
pub mod sample;

// The reader abstraction the training loop consumes
pub mod traits;
