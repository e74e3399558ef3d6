//! Byte-offset spans.
//!
//! Every position exchanged between the template compiler, the overlay
//! printer and the external type-checking service is a `(start, length)`
//! pair of UTF-8 byte offsets into one document. `TextSpan` is that pair
//! plus the containment and distance queries the provenance index is
//! built on.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, start + length)` within a single document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

impl TextSpan {
    pub const fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// A zero-length span at `start`. Used for cursor positions and for
    /// the fallback anchor of diagnostics whose origin could not be mapped.
    pub const fn empty(start: u32) -> Self {
        Self { start, length: 0 }
    }

    /// Build a span from `[start, end)` bounds.
    pub fn from_bounds(start: u32, end: u32) -> Self {
        debug_assert!(end >= start, "span end {end} precedes start {start}");
        Self {
            start,
            length: end.saturating_sub(start),
        }
    }

    pub const fn end(&self) -> u32 {
        self.start + self.length
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Strict containment: `start <= offset < end`. Empty spans contain nothing.
    pub const fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// Cursor-style containment: `start <= offset <= end`. A caret sitting at
    /// the end boundary of an expression still belongs to it.
    pub const fn touches(&self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end()
    }

    /// Whether `other` lies entirely within this span. An empty `other` at
    /// either boundary counts as contained.
    pub const fn contains_span(&self, other: &TextSpan) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    pub const fn intersects(&self, other: &TextSpan) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Distance from `offset` to the nearest point of this span; zero when
    /// the span touches the offset.
    pub const fn distance_to(&self, offset: u32) -> u32 {
        if offset < self.start {
            self.start - offset
        } else if offset > self.end() {
            offset - self.end()
        } else {
            0
        }
    }
}

#[cfg(test)]
#[path = "tests/span_tests.rs"]
mod span_tests;
