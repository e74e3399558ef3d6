//! Common types and utilities for the vellum template tooling workspace.
//!
//! This crate provides foundational types used across all vellum crates:
//! - Source spans as byte offsets (`TextSpan`)
//! - Document identity and versioned snapshots (`Uri`, `DocumentSnapshot`)
//! - Content hashing for change detection (`content_hash`)
//! - The template-space diagnostic model shared by the compiler pipeline
//!   and the merged language service

// Span - source location tracking (byte offsets)
pub mod span;
pub use span::TextSpan;

// Document identity
pub mod uri;
pub use uri::Uri;

// Content hashing for change detection
pub mod hash;
pub use hash::content_hash;

// Versioned document snapshots
pub mod documents;
pub use documents::DocumentSnapshot;

// Template-space diagnostics
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticSource, DiagnosticStage, RelatedInformation, Severity, template_codes,
    typecheck_codes,
};
