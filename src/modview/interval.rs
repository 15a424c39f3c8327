//! Tagged intervals and the containment relation
//!
//! An interval is a half-open byte range `[start, end)` into the source. `start == end` is a
//! point marker: it covers no text and only records a position.
//!
//! ## Containment
//!
//! For two ranges with text, `outer` contains `inner` when
//! `outer.start <= inner.start && inner.end <= outer.end`, so identical ranges contain each
//! other and are merged by the tree builder instead of nested.
//!
//! A point marker at `p` is contained by a range with text only when `start <= p < end`.
//! A marker sitting exactly where one range ends and the next begins therefore always lands
//! in the range that starts there, whatever order the two ranges were inserted in. Two
//! markers contain each other only when they are at the same point.

use crate::modview::tag::Tag;
use std::ops::Range as ByteRange;

/// One annotation, before structuring.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedInterval {
    pub span: ByteRange<usize>,
    pub tag: Tag,
}

impl TaggedInterval {
    pub fn new(span: ByteRange<usize>, tag: Tag) -> Self {
        Self { span, tag }
    }

    pub fn marker(at: usize, tag: Tag) -> Self {
        Self { span: at..at, tag }
    }

    pub fn is_marker(&self) -> bool {
        is_point(&self.span)
    }
}

pub fn is_point(span: &ByteRange<usize>) -> bool {
    span.start == span.end
}

/// Whether `outer` contains `inner`, following the rules in the module docs.
pub fn contains(outer: &ByteRange<usize>, inner: &ByteRange<usize>) -> bool {
    match (is_point(outer), is_point(inner)) {
        (true, true) => outer.start == inner.start,
        (true, false) => false,
        (false, true) => outer.start <= inner.start && inner.start < outer.end,
        (false, false) => outer.start <= inner.start && inner.end <= outer.end,
    }
}

/// Two ranges with text that share some bytes while neither contains the other.
///
/// Lexer output never does this; the tree builder reports it instead of guessing.
pub fn crosses(a: &ByteRange<usize>, b: &ByteRange<usize>) -> bool {
    if is_point(a) || is_point(b) {
        return false;
    }
    a.start < b.end && b.start < a.end && !contains(a, b) && !contains(b, a)
}
