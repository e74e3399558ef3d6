//! Exhaustive tests for the policy decision table: diagnostic anchoring,
//! related-information leak suppression, reference classification, raw
//! overlay gating, and the edit-batch rejection matrix.

use std::sync::Arc;

use super::*;
use crate::index::{ProvenanceIndex, TemplateMapping};
use crate::mapping::{ExprId, MappingEntry};

fn page_html() -> Uri {
    Uri::from("/app/page.html")
}

fn page_ts() -> Uri {
    Uri::from("/app/page.html.__overlay.ts")
}

fn card_html() -> Uri {
    Uri::from("/app/card.html")
}

fn card_ts() -> Uri {
    Uri::from("/app/card.html.__overlay.ts")
}

/// Two templates in one workspace: `page` with a mapped expression and
/// `card` with one of its own.
fn index() -> ProvenanceIndex {
    let mut index = ProvenanceIndex::new();
    index.replace_template(Arc::new(TemplateMapping::new(
        page_html(),
        page_ts(),
        vec![MappingEntry::new(ExprId(1), TextSpan::new(10, 5), TextSpan::new(100, 5))],
    )));
    index.replace_template(Arc::new(TemplateMapping::new(
        card_html(),
        card_ts(),
        vec![MappingEntry::new(ExprId(1), TextSpan::new(4, 6), TextSpan::new(50, 6))],
    )));
    index
}

fn policy() -> ProvenancePolicy {
    ProvenancePolicy::STANDARD
}

// ---------------------------------------------------------------------------
// resolve_overlay_diagnostic_location
// ---------------------------------------------------------------------------

#[test]
fn mapped_diagnostic_uses_the_template_location() {
    let index = index();
    let hit = index.project_generated_span(&page_ts(), TextSpan::new(101, 2)).expect("mapped");
    let location = policy().resolve_overlay_diagnostic_location(&page_html(), Some(&hit));
    assert_eq!(location.uri, page_html());
    assert_eq!(location.span, TextSpan::new(10, 5));
}

#[test]
fn unmapped_diagnostic_anchors_at_template_start_never_the_overlay() {
    let location = policy().resolve_overlay_diagnostic_location(&page_html(), None);
    assert_eq!(location.uri, page_html());
    assert_eq!(location.span, TextSpan::empty(0));
}

// ---------------------------------------------------------------------------
// resolve_related_diagnostic_location
// ---------------------------------------------------------------------------

#[test]
fn related_span_in_the_same_overlay_is_suppressed() {
    let index = index();
    let related = Location::new(page_ts(), TextSpan::new(100, 2));
    let decision = policy().resolve_related_diagnostic_location(&index, &page_ts(), &related);
    assert_eq!(decision, RelatedLocationDecision::Suppress);
}

#[test]
fn related_span_in_another_templates_overlay_maps_to_that_template() {
    let index = index();
    let related = Location::new(card_ts(), TextSpan::new(51, 2));
    let decision = policy().resolve_related_diagnostic_location(&index, &page_ts(), &related);
    assert_eq!(
        decision,
        RelatedLocationDecision::MappedToTemplate(Location::new(card_html(), TextSpan::new(4, 6)))
    );
}

#[test]
fn related_span_in_another_overlay_outside_any_entry_is_suppressed() {
    let index = index();
    // Far from card's only entry: the index would answer with a
    // nearest-match hit that does not contain the span.
    let related = Location::new(card_ts(), TextSpan::new(900, 2));
    let decision = policy().resolve_related_diagnostic_location(&index, &page_ts(), &related);
    assert_eq!(decision, RelatedLocationDecision::Suppress);
}

#[test]
fn related_span_in_a_genuine_external_file_passes_through() {
    let index = index();
    let related = Location::new(Uri::from("/app/vm.ts"), TextSpan::new(12, 4));
    let decision = policy().resolve_related_diagnostic_location(&index, &page_ts(), &related);
    assert_eq!(decision, RelatedLocationDecision::PassThrough);
}

// ---------------------------------------------------------------------------
// resolve_generated_reference_location
// ---------------------------------------------------------------------------

#[test]
fn mappable_reference_becomes_a_template_location() {
    let index = index();
    let location = Location::new(card_ts(), TextSpan::new(51, 2));
    let decision = policy().resolve_generated_reference_location(&index, &page_ts(), &location);
    assert_eq!(
        decision,
        ReferenceLocationDecision::Template(
            Location::new(card_html(), TextSpan::new(4, 6)),
            Evidence::Exact
        )
    );
}

#[test]
fn external_file_reference_passes_through() {
    let index = index();
    let location = Location::new(Uri::from("/app/vm.ts"), TextSpan::new(30, 4));
    let decision = policy().resolve_generated_reference_location(&index, &page_ts(), &location);
    assert_eq!(decision, ReferenceLocationDecision::External(location));
}

#[test]
fn unmappable_reference_in_the_queried_overlay_surfaces_raw() {
    let mut index = ProvenanceIndex::new();
    // An overlay with no mapped expressions at all.
    index.replace_template(Arc::new(TemplateMapping::new(page_html(), page_ts(), Vec::new())));
    let location = Location::new(page_ts(), TextSpan::new(5, 3));
    let decision = policy().resolve_generated_reference_location(&index, &page_ts(), &location);
    assert_eq!(decision, ReferenceLocationDecision::RawOverlay(location));
}

#[test]
fn raw_overlay_navigation_is_gated_by_the_policy_flag() {
    let mut index = ProvenanceIndex::new();
    index.replace_template(Arc::new(TemplateMapping::new(page_html(), page_ts(), Vec::new())));
    let location = Location::new(page_ts(), TextSpan::new(5, 3));
    let gated = ProvenancePolicy {
        expose_raw_overlay_navigation: false,
        ..ProvenancePolicy::STANDARD
    };
    let decision = gated.resolve_generated_reference_location(&index, &page_ts(), &location);
    assert_eq!(decision, ReferenceLocationDecision::Discard);
}

#[test]
fn unmappable_reference_in_a_different_overlay_is_discarded() {
    let mut index = index();
    index.replace_template(Arc::new(TemplateMapping::new(card_html(), card_ts(), Vec::new())));
    let location = Location::new(card_ts(), TextSpan::new(5, 3));
    let decision = policy().resolve_generated_reference_location(&index, &page_ts(), &location);
    assert_eq!(decision, ReferenceLocationDecision::Discard);
}

// ---------------------------------------------------------------------------
// should_reject_overlay_edit_batch
// ---------------------------------------------------------------------------

#[test]
fn batch_rejection_matrix() {
    let policy = policy();
    let cases = [
        // (mapped, unmapped, external) -> reject?
        ((0, 0, 0), false),
        ((3, 0, 2), false),
        ((0, 1, 0), true),
        ((5, 1, 5), true),
        ((0, 0, 4), false),
    ];
    for ((mapped, unmapped, external), expected) in cases {
        let stats = EditBatchStats {
            mapped_overlay_edits: mapped,
            unmapped_overlay_edits: unmapped,
            external_edits: external,
        };
        assert_eq!(
            policy.should_reject_overlay_edit_batch(&stats),
            expected,
            "stats {stats:?}"
        );
    }
}

#[test]
fn batch_rejection_is_disabled_without_require_overlay_mapping() {
    let lenient = ProvenancePolicy {
        require_overlay_mapping: false,
        ..ProvenancePolicy::STANDARD
    };
    let mut stats = EditBatchStats::default();
    stats.record_unmapped_overlay();
    assert!(!lenient.should_reject_overlay_edit_batch(&stats));
}
