//! Content hashing for change detection.

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Hash a document's text. Deterministic within one process; used only to
/// detect "has this text changed since the last compile", never persisted.
pub fn content_hash(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(text.as_bytes());
    hasher.finish()
}
