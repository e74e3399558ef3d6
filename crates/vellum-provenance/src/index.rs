//! The provenance index: a bidirectional position map over every
//! template/overlay pair in one type-checking workspace.
//!
//! Each template owns exactly one overlay; the index is an arena of
//! immutable per-template mapping tables keyed by template URI plus a
//! reverse overlay-to-template table. Tables are replaced wholesale when
//! a template's overlay is rematerialized; a published table is never
//! mutated, so concurrent reads against one snapshot are safe.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use vellum_common::{TextSpan, Uri};

use crate::mapping::{ExprId, FrameId, MappingEntry};

/// How a projection result was obtained.
///
/// `Exact` means a literal mapping entry or segment matched the queried
/// position. `Degraded` means the index fell back to whole-expression
/// granularity or to the nearest entry by offset distance. Degraded hits
/// are still usable; callers surface them as reduced precision, never
/// as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evidence {
    Exact,
    Degraded,
}

/// One end of a provenance edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub uri: Uri,
    pub span: TextSpan,
}

impl Location {
    pub fn new(uri: Uri, span: TextSpan) -> Self {
        Self { uri, span }
    }
}

/// A provenance edge resolved at a queried position: the matched
/// granularity on both sides, the owning expression, and the evidence
/// level of the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceHit {
    /// Template-space location at the matched granularity (segment span
    /// when a segment matched, whole-expression span otherwise).
    pub template: Location,
    /// Overlay-space location at the same granularity.
    pub overlay: Location,
    /// Template-space span of the whole bound expression, regardless of
    /// the matched granularity.
    pub expr_span: TextSpan,
    pub expr_id: ExprId,
    pub frame_id: Option<FrameId>,
    /// Dotted member path of the matched segment, when one matched and
    /// recorded a path.
    pub member_path: Option<String>,
    pub evidence: Evidence,
}

impl ProvenanceHit {
    /// Translate a template offset into the overlay, linearly within the
    /// matched granularity, clamped to the matched spans.
    pub fn overlay_offset_for(&self, template_offset: u32) -> u32 {
        translate(template_offset, self.template.span, self.overlay.span)
    }

    /// Translate an overlay offset into the template, linearly within
    /// the matched granularity, clamped to the matched spans.
    pub fn template_offset_for(&self, overlay_offset: u32) -> u32 {
        translate(overlay_offset, self.overlay.span, self.template.span)
    }
}

fn translate(offset: u32, from: TextSpan, to: TextSpan) -> u32 {
    let delta = offset.saturating_sub(from.start).min(from.length);
    to.start + delta.min(to.length)
}

/// The query space of one lookup. The selection algorithm is symmetric;
/// only which side of each entry it reads differs.
#[derive(Clone, Copy)]
enum Space {
    Template,
    Overlay,
}

impl Space {
    fn of_entry(self, entry: &MappingEntry) -> TextSpan {
        match self {
            Space::Template => entry.html_span,
            Space::Overlay => entry.overlay_span,
        }
    }

    fn of_segment(self, segment: &crate::mapping::MappingSegment) -> TextSpan {
        match self {
            Space::Template => segment.html_span,
            Space::Overlay => segment.overlay_span,
        }
    }
}

/// Span containment for queries: an empty query span is a cursor and may
/// sit on the end boundary of the candidate.
fn holds(candidate: TextSpan, query: TextSpan) -> bool {
    if query.is_empty() {
        candidate.touches(query.start)
    } else {
        candidate.contains_span(&query)
    }
}

/// The immutable mapping table for one template/overlay pair. Entries are
/// ordered by template-span start; within one entry, segments are ordered
/// the same way and pairwise disjoint in template space (first-wins when
/// an artifact violates that).
#[derive(Debug)]
pub struct TemplateMapping {
    pub template_uri: Uri,
    pub overlay_uri: Uri,
    entries: Vec<MappingEntry>,
}

impl TemplateMapping {
    pub fn new(template_uri: Uri, overlay_uri: Uri, mut entries: Vec<MappingEntry>) -> Self {
        entries.sort_by_key(|e| (e.html_span.start, e.html_span.length));
        for entry in &mut entries {
            entry
                .segments
                .sort_by_key(|s| (s.html_span.start, s.html_span.length));
            debug_assert!(
                entry
                    .segments
                    .windows(2)
                    .all(|w| !w[0].html_span.intersects(&w[1].html_span)),
                "segments of expression {:?} overlap in template space",
                entry.expr_id
            );
        }
        Self {
            template_uri,
            overlay_uri,
            entries,
        }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Resolve `query` in `space` to a provenance hit. Narrowest
    /// containing entry wins (ties by earlier start); inside it, the
    /// narrowest containing segment. With no containing entry, the
    /// nearest entry by distance answers with degraded evidence. Returns
    /// `None` only when the table has no entries at all.
    fn resolve(&self, space: Space, query: TextSpan) -> Option<ProvenanceHit> {
        let containing = self
            .entries
            .iter()
            .filter(|e| holds(space.of_entry(e), query))
            .min_by_key(|e| (space.of_entry(e).length, space.of_entry(e).start));

        let (entry, evidence) = match containing {
            Some(entry) => (entry, Evidence::Exact),
            None => {
                let nearest = self
                    .entries
                    .iter()
                    .min_by_key(|e| (space.of_entry(e).distance_to(query.start), space.of_entry(e).start))?;
                (nearest, Evidence::Degraded)
            }
        };

        let segment = match evidence {
            Evidence::Exact => entry
                .segments
                .iter()
                .filter(|s| holds(space.of_segment(s), query))
                .min_by_key(|s| (space.of_segment(s).length, space.of_segment(s).start)),
            Evidence::Degraded => None,
        };

        let (template_span, overlay_span, member_path, evidence) = match segment {
            Some(segment) => (
                segment.html_span,
                segment.overlay_span,
                segment.path.clone(),
                Evidence::Exact,
            ),
            None => {
                // Whole-expression granularity. For a compound entry this
                // is a fallback unless the query covers the entry exactly.
                let evidence = if evidence == Evidence::Degraded {
                    Evidence::Degraded
                } else if entry.segments.is_empty() || query == space.of_entry(entry) {
                    Evidence::Exact
                } else {
                    Evidence::Degraded
                };
                (entry.html_span, entry.overlay_span, None, evidence)
            }
        };

        Some(ProvenanceHit {
            template: Location::new(self.template_uri.clone(), template_span),
            overlay: Location::new(self.overlay_uri.clone(), overlay_span),
            expr_span: entry.html_span,
            expr_id: entry.expr_id,
            frame_id: entry.frame_id,
            member_path,
            evidence,
        })
    }
}

/// The workspace-wide provenance index.
#[derive(Debug, Default)]
pub struct ProvenanceIndex {
    tables: FxHashMap<Uri, Arc<TemplateMapping>>,
    overlay_to_template: FxHashMap<Uri, Uri>,
}

impl ProvenanceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a freshly built table for its template, superseding any
    /// previous one wholesale.
    pub fn replace_template(&mut self, mapping: Arc<TemplateMapping>) {
        if let Some(previous) = self.tables.get(&mapping.template_uri) {
            self.overlay_to_template.remove(&previous.overlay_uri);
        }
        self.overlay_to_template
            .insert(mapping.overlay_uri.clone(), mapping.template_uri.clone());
        self.tables.insert(mapping.template_uri.clone(), mapping);
    }

    /// Drop a template's table and its reverse lookup entry.
    pub fn remove_template(&mut self, template_uri: &Uri) {
        if let Some(mapping) = self.tables.remove(template_uri) {
            self.overlay_to_template.remove(&mapping.overlay_uri);
        }
    }

    /// Project an overlay-space span back to template space.
    pub fn project_generated_span(
        &self,
        overlay_uri: &Uri,
        span: TextSpan,
    ) -> Option<ProvenanceHit> {
        let template_uri = self.overlay_to_template.get(overlay_uri)?;
        let hit = self.tables.get(template_uri)?.resolve(Space::Overlay, span);
        tracing::trace!(
            overlay = %overlay_uri,
            start = span.start,
            found = hit.is_some(),
            "project_generated_span"
        );
        hit
    }

    /// Project a template-space cursor offset into the overlay.
    pub fn lookup_source(&self, template_uri: &Uri, offset: u32) -> Option<ProvenanceHit> {
        self.lookup_source_span(template_uri, TextSpan::empty(offset))
    }

    /// Project a template-space span into the overlay.
    pub fn lookup_source_span(&self, template_uri: &Uri, span: TextSpan) -> Option<ProvenanceHit> {
        let hit = self.tables.get(template_uri)?.resolve(Space::Template, span);
        tracing::trace!(
            template = %template_uri,
            start = span.start,
            found = hit.is_some(),
            "lookup_source_span"
        );
        hit
    }

    pub fn template_uri_for_generated(&self, overlay_uri: &Uri) -> Option<&Uri> {
        self.overlay_to_template.get(overlay_uri)
    }

    pub fn overlay_uri_for_template(&self, template_uri: &Uri) -> Option<&Uri> {
        self.tables.get(template_uri).map(|m| &m.overlay_uri)
    }

    /// Whether `uri` names an overlay document. Load-bearing for leak
    /// policy: it decides whether a location returned by the external
    /// service is an internal artifact or a genuine external file.
    pub fn is_overlay_uri(&self, uri: &Uri) -> bool {
        self.overlay_to_template.contains_key(uri)
    }

    pub fn has_template(&self, uri: &Uri) -> bool {
        self.tables.contains_key(uri)
    }

    pub fn mapping_for(&self, template_uri: &Uri) -> Option<&Arc<TemplateMapping>> {
        self.tables.get(template_uri)
    }
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod index_tests;
