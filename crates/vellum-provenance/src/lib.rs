//! Provenance between template and overlay coordinate spaces.
//!
//! Per template, an externally produced mapping artifact records where
//! every bound expression (and every addressable sub-member of it) landed
//! in the synthesized overlay. This crate holds:
//! - the mapping artifact model (`MappingEntry`, `MappingSegment`)
//! - the `ProvenanceIndex`, a bidirectional position map over all
//!   templates sharing one type-checking workspace, answering queries
//!   with an explicit evidence level (`Exact` vs `Degraded`)
//! - the `ProvenancePolicy`, pure decision functions applied at every
//!   call site where a projection is ambiguous, missing, or would leak
//!   an internal overlay location to the user

// Mapping artifact model (external input)
pub mod mapping;
pub use mapping::{ExprId, FrameId, MappingEntry, MappingSegment};

// Bidirectional projection index
pub mod index;
pub use index::{Evidence, Location, ProvenanceHit, ProvenanceIndex, TemplateMapping};

// Projection policy decisions
pub mod policy;
pub use policy::{
    EditBatchStats, ProvenancePolicy, ReferenceLocationDecision, RelatedLocationDecision,
};
