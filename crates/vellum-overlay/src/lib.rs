//! Overlay materialization for template documents.
//!
//! The compiler pipeline (an external collaborator behind
//! `TemplatePipeline`) turns a template snapshot into a compiled IR, a
//! synthesized overlay source file and the mapping artifact between the
//! two. This crate holds the pieces around that boundary:
//! - `DocumentStore`: versioned template snapshots, upserted by the host
//! - `TemplateQuery`: the position-indexed read API over compiled IR
//! - `TemplatePipeline` / `OverlayArtifact` / `TemplateCompilation`: the
//!   synthesis boundary
//! - `OverlayBuildService`: guarantees the overlay is current before any
//!   projection, caching by template content hash

// Versioned template snapshots
pub mod store;
pub use store::DocumentStore;

// Position-indexed read API over compiled IR
pub mod facade;
pub use facade::{
    BindableInfo, CompletionOrigin, Confidence, ControllerInfo, ExprInfo, ExprTypeInfo,
    ResourceCompletion, TemplateNode, TemplateNodeKind, TemplateQuery,
};

// The synthesis collaborator boundary
pub mod pipeline;
pub use pipeline::{OverlayArtifact, PipelineError, TemplateCompilation, TemplatePipeline};

// The build service
pub mod build;
pub use build::{BuildError, OverlayAccess, OverlayBuildService};
