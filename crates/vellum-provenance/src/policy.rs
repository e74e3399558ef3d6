//! The provenance policy: pure decision functions over explicit state.
//!
//! Every place the language service consumes a projection result faces
//! the same small set of questions: what to do when a mapping is
//! missing, when a location would leak an internal overlay URI, when an
//! edit batch is only partially mappable. Those decisions live here as
//! standalone functions over immutable inputs plus a fixed named
//! configuration, so the whole decision table is unit-testable without
//! exercising the service.

use vellum_common::{TextSpan, Uri};

use crate::index::{Evidence, Location, ProvenanceHit, ProvenanceIndex};

/// Fixed configuration consumed by every projection call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvenancePolicy {
    pub name: &'static str,
    /// Reject a whole edit batch when any overlay edit in it is
    /// unmappable. Rename and code-fix edits are all-or-nothing.
    pub require_overlay_mapping: bool,
    /// Allow an unmappable reference hit inside the very overlay that
    /// was queried to surface as a raw overlay span, for navigation
    /// only. Diagnostics never use this escape hatch.
    pub expose_raw_overlay_navigation: bool,
}

impl ProvenancePolicy {
    /// The policy the language service ships with.
    pub const STANDARD: Self = Self {
        name: "standard",
        require_overlay_mapping: true,
        expose_raw_overlay_navigation: true,
    };

    /// Where a diagnostic anchored in an overlay surfaces to the user.
    /// The mapped template location when the projection succeeded;
    /// otherwise a deterministic fallback anchor at offset 0 of the
    /// owning template. The overlay URI never appears in a user-visible
    /// diagnostic location.
    pub fn resolve_overlay_diagnostic_location(
        &self,
        template_uri: &Uri,
        hit: Option<&ProvenanceHit>,
    ) -> Location {
        match hit {
            Some(hit) => hit.template.clone(),
            None => Location::new(template_uri.clone(), TextSpan::empty(0)),
        }
    }

    /// What to do with one related-information location attached to a
    /// diagnostic whose primary location sits in `primary_overlay_uri`.
    pub fn resolve_related_diagnostic_location(
        &self,
        index: &ProvenanceIndex,
        primary_overlay_uri: &Uri,
        related: &Location,
    ) -> RelatedLocationDecision {
        if related.uri == *primary_overlay_uri {
            // Pointing back into the diagnostic's own overlay tells the
            // user nothing they can see.
            return RelatedLocationDecision::Suppress;
        }
        if index.is_overlay_uri(&related.uri) {
            // A nearest-match fallback would anchor the related entry at
            // an unrelated expression; only a containing match survives.
            return match index.project_generated_span(&related.uri, related.span) {
                Some(hit) if covers(hit.overlay.span, related.span) => {
                    RelatedLocationDecision::MappedToTemplate(hit.template)
                }
                _ => RelatedLocationDecision::Suppress,
            };
        }
        RelatedLocationDecision::PassThrough
    }

    /// What to do with one reference/definition location returned by the
    /// external service for a query that originated in
    /// `queried_overlay_uri`.
    pub fn resolve_generated_reference_location(
        &self,
        index: &ProvenanceIndex,
        queried_overlay_uri: &Uri,
        location: &Location,
    ) -> ReferenceLocationDecision {
        if !index.is_overlay_uri(&location.uri) {
            return ReferenceLocationDecision::External(location.clone());
        }
        if let Some(hit) = index.project_generated_span(&location.uri, location.span) {
            return ReferenceLocationDecision::Template(hit.template, hit.evidence);
        }
        if location.uri == *queried_overlay_uri && self.expose_raw_overlay_navigation {
            return ReferenceLocationDecision::RawOverlay(location.clone());
        }
        ReferenceLocationDecision::Discard
    }

    /// Whether an edit batch with the given composition must be rejected
    /// wholesale rather than partially applied.
    pub fn should_reject_overlay_edit_batch(&self, stats: &EditBatchStats) -> bool {
        self.require_overlay_mapping && stats.unmapped_overlay_edits > 0
    }
}

impl Default for ProvenancePolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Whether the matched span actually holds the queried span (cursor
/// semantics for empty queries).
fn covers(matched: TextSpan, query: TextSpan) -> bool {
    if query.is_empty() {
        matched.touches(query.start)
    } else {
        matched.contains_span(&query)
    }
}

/// Decision for a related-information location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedLocationDecision {
    /// Internal leak; drop the related entry.
    Suppress,
    /// The related span belongs to another template's overlay and mapped
    /// cleanly to that template.
    MappedToTemplate(Location),
    /// A genuine external file; keep the location unchanged.
    PassThrough,
}

/// Decision for a reference/definition location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceLocationDecision {
    /// Mapped into a template, with the evidence of the mapping.
    Template(Location, Evidence),
    /// Unmappable, but inside the overlay originally queried; surfaced
    /// raw for navigation only.
    RawOverlay(Location),
    /// A genuine external file; passed through unchanged.
    External(Location),
    /// Unmappable and not navigable; dropped.
    Discard,
}

/// Composition of one edit batch, counted while edits are projected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditBatchStats {
    pub mapped_overlay_edits: u32,
    pub unmapped_overlay_edits: u32,
    pub external_edits: u32,
}

impl EditBatchStats {
    pub fn record_mapped_overlay(&mut self) {
        self.mapped_overlay_edits += 1;
    }

    pub fn record_unmapped_overlay(&mut self) {
        self.unmapped_overlay_edits += 1;
    }

    pub fn record_external(&mut self) {
        self.external_edits += 1;
    }
}

#[cfg(test)]
#[path = "tests/policy_tests.rs"]
mod policy_tests;
