//! The mapping artifact model.
//!
//! The overlay printer (an external collaborator) emits, alongside the
//! overlay text, one `MappingEntry` per bound expression. A compound
//! expression (a member chain, or an attribute value holding several
//! interpolations) additionally carries one `MappingSegment` per
//! addressable sub-position, so a cursor on `name` in `${person.name}`
//! can be projected to the `name` token in the overlay rather than to
//! the whole expression. Artifacts may cross a process boundary as JSON.

use serde::{Deserialize, Serialize};
use vellum_common::TextSpan;

/// Identifies one bound expression within a template's compiled IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExprId(pub u32);

/// Identifies the scope frame an expression is evaluated in (repeaters
/// and other template controllers introduce nested frames).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(pub u32);

/// One addressable sub-position inside a compound expression: a member
/// chain link or one interpolation part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSegment {
    pub html_span: TextSpan,
    pub overlay_span: TextSpan,
    /// Dotted member path up to and including this segment, e.g.
    /// `person.name` for the `name` link. Absent for non-member segments
    /// such as interpolation parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// The recorded correspondence for one bound expression.
///
/// Invariant: the segments of one entry are pairwise disjoint in template
/// space. The entry's own spans are the fallback granularity when no
/// segment matches a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    pub expr_id: ExprId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
    pub html_span: TextSpan,
    pub overlay_span: TextSpan,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<MappingSegment>,
}

impl MappingEntry {
    pub fn new(expr_id: ExprId, html_span: TextSpan, overlay_span: TextSpan) -> Self {
        Self {
            expr_id,
            frame_id: None,
            html_span,
            overlay_span,
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_frame(mut self, frame_id: FrameId) -> Self {
        self.frame_id = Some(frame_id);
        self
    }

    #[must_use]
    pub fn with_segment(
        mut self,
        html_span: TextSpan,
        overlay_span: TextSpan,
        path: Option<&str>,
    ) -> Self {
        self.segments.push(MappingSegment {
            html_span,
            overlay_span,
            path: path.map(str::to_string),
        });
        self
    }
}
