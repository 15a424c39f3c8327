//! Segment emission
//!
//! Walks a sorted [`IntervalTree`] next to the source and cuts the source into plain text
//! slices and annotated wrappers. Concatenating the text of every segment, recursively and in
//! order, gives back exactly the range that was emitted: nothing is duplicated, dropped or
//! reordered.
//!
//! ```text
//! Source: "import x from 'm'"
//!          0         1
//!          01234567890123456
//!
//! Tree:   [0, 17) import-statement
//!           [15, 16) import-module-specifier
//!
//! Segments:
//!   Annotated [0, 17) import-statement
//!     Text [0, 15)          "import x from '"
//!     Annotated [15, 16) import-module-specifier
//!       Text [15, 16)       "m"
//!     Text [16, 17)         "'"
//! ```
//!
//! The gaps before, between and after nodes are emitted even when empty, unless the emitter
//! is told to elide them. A node without children always gets one text segment for its
//! whole span, so a point marker wraps an empty slice.

use crate::modview::tag::Tag;
use crate::modview::tree::{IntervalTree, Node};
use serde::Serialize;
use std::ops::Range as ByteRange;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    /// A slice of the source with no annotation of its own.
    Text { span: ByteRange<usize> },
    /// A tree node, with the segments covering its span.
    Annotated {
        span: ByteRange<usize>,
        tags: Vec<Tag>,
        children: Vec<Segment>,
    },
}

impl Segment {
    pub fn span(&self) -> &ByteRange<usize> {
        match self {
            Segment::Text { span } | Segment::Annotated { span, .. } => span,
        }
    }

    /// The source text this segment covers, or `None` when the span does not fit `source`
    /// (a different text than the one the segments were emitted for).
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.span().clone())
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Segment::Text { span } if span.is_empty())
    }
}

/// Concatenate the text of `segments`, descending into annotated ones. Slices that do not
/// fit `source` are skipped.
pub fn concat(segments: &[Segment], source: &str) -> String {
    fn push(out: &mut String, segments: &[Segment], source: &str) {
        for segment in segments {
            match segment {
                Segment::Text { .. } => out.push_str(segment.text(source).unwrap_or_default()),
                Segment::Annotated { children, .. } => push(out, children, source),
            }
        }
    }
    let mut out = String::new();
    push(&mut out, segments, source);
    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentEmitter {
    /// Skip zero-length gap slices around nodes.
    pub elide_empty: bool,
}

impl SegmentEmitter {
    pub fn new(elide_empty: bool) -> Self {
        Self { elide_empty }
    }

    /// Segments for a whole source of `len` bytes.
    pub fn emit_tree(&self, tree: &IntervalTree, len: usize) -> Vec<Segment> {
        self.emit(tree.roots(), 0..len)
    }

    /// Segments covering exactly `range`. `nodes` must lie inside `range` without
    /// overlapping each other, as the siblings of an [`IntervalTree`] do. They are walked in
    /// start order whatever order they are stored in.
    pub fn emit(&self, nodes: &[Node], range: ByteRange<usize>) -> Vec<Segment> {
        if nodes.is_empty() {
            return vec![Segment::Text { span: range }];
        }

        let mut ordered: Vec<&Node> = nodes.iter().collect();
        ordered.sort_by_key(|n| n.span.start);

        let mut segments = Vec::with_capacity(nodes.len() * 2 + 1);
        let mut cursor = range.start;
        for node in ordered {
            debug_assert!(
                cursor <= node.span.start && node.span.end <= range.end,
                "node {:?} overlaps its siblings or leaves {:?}",
                node.span,
                range
            );
            self.push_gap(&mut segments, cursor..node.span.start);
            segments.push(Segment::Annotated {
                span: node.span.clone(),
                tags: node.tags.clone(),
                children: self.emit(&node.children, node.span.clone()),
            });
            cursor = node.span.end;
        }
        self.push_gap(&mut segments, cursor..range.end);
        segments
    }

    fn push_gap(&self, segments: &mut Vec<Segment>, span: ByteRange<usize>) {
        if !(self.elide_empty && span.is_empty()) {
            segments.push(Segment::Text { span });
        }
    }
}
