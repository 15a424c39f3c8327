//! Interval tree
//!
//! Builds a tree of non-overlapping, properly nested intervals out of tagged intervals that
//! arrive in any order, then sorts it into the shape the segment emitter walks.
//!
//! ## Building
//!
//! Inserting `[start, end)` into a sibling list:
//!
//! 1. If a sibling contains the new interval, and has exactly the same span, the tag is
//!    appended to that sibling's tags. Coinciding intervals become one node.
//! 2. If a sibling contains it with a wider span, insertion continues in that sibling's
//!    children.
//! 3. Otherwise a new node is appended to the list, and every sibling the new interval
//!    contains is moved under it.
//!
//! Containment follows [`interval::contains`], including the rule that keeps point markers
//! on the boundary between two siblings in the sibling that starts there.
//!
//! Each insertion is linear in the size of the levels it walks through, so a whole build is
//! quadratic in the worst case. Lexer output for one source holds few enough intervals that
//! this is not a concern.
//!
//! Intervals that cross (overlap without nesting) are rejected with
//! [`ReconcileError::CrossingIntervals`]; the lexer never reports them.
//!
//! ## Sorting
//!
//! Siblings end up in insertion order, with wrapping nodes appended after the nodes that
//! were there first. [`IntervalTree::sorted`] returns a copy where every sibling list is
//! ordered by start offset.

use crate::modview::error::ReconcileError;
use crate::modview::interval::{self, contains, crosses, TaggedInterval};
use crate::modview::tag::Tag;
use serde::Serialize;
use std::ops::Range as ByteRange;

/// A span with the tags that share it, and the nodes nested inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub span: ByteRange<usize>,
    /// Never empty; in insertion order.
    pub tags: Vec<Tag>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(span: ByteRange<usize>, tag: Tag) -> Self {
        Self {
            span,
            tags: vec![tag],
            children: Vec::new(),
        }
    }

    pub fn is_marker(&self) -> bool {
        interval::is_point(&self.span)
    }
}

/// Top-level sibling list of the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IntervalTree {
    roots: Vec<Node>,
}

impl IntervalTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every interval, in the order given.
    pub fn build<I>(intervals: I) -> Result<Self, ReconcileError>
    where
        I: IntoIterator<Item = TaggedInterval>,
    {
        let mut tree = Self::new();
        for interval in intervals {
            tree.insert(interval)?;
        }
        Ok(tree)
    }

    pub fn insert(&mut self, interval: TaggedInterval) -> Result<(), ReconcileError> {
        log::trace!("insert {:?} {}", interval.span, interval.tag);
        insert_into(&mut self.roots, interval.span, interval.tag)
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<Node> {
        self.roots
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_, _| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// A copy with every sibling list ordered by start offset.
    pub fn sorted(&self) -> IntervalTree {
        IntervalTree {
            roots: sort_nodes(&self.roots),
        }
    }

    /// Pre-order walk; the callback receives each node with its depth (roots are 0).
    pub fn visit<F>(&self, f: &mut F)
    where
        F: FnMut(&Node, usize),
    {
        fn walk<F: FnMut(&Node, usize)>(nodes: &[Node], depth: usize, f: &mut F) {
            for node in nodes {
                f(node, depth);
                walk(&node.children, depth + 1, f);
            }
        }
        walk(&self.roots, 0, f);
    }

    /// Nodes covering `offset`, outermost first. This is what a viewer shows when the
    /// pointer rests on that byte.
    pub fn path_at(&self, offset: usize) -> Vec<&Node> {
        let point = offset..offset;
        let mut path = Vec::new();
        let mut level = self.roots.as_slice();
        while let Some(node) = level.iter().find(|n| contains(&n.span, &point)) {
            path.push(node);
            level = node.children.as_slice();
        }
        path
    }
}

fn insert_into(
    nodes: &mut Vec<Node>,
    span: ByteRange<usize>,
    tag: Tag,
) -> Result<(), ReconcileError> {
    let mut level = nodes;
    loop {
        match level.iter().position(|n| contains(&n.span, &span)) {
            Some(i) if level[i].span == span => {
                level[i].tags.push(tag);
                return Ok(());
            }
            Some(i) => level = &mut level[i].children,
            None => break,
        }
    }

    if let Some(existing) = level.iter().find(|n| crosses(&n.span, &span)) {
        return Err(ReconcileError::CrossingIntervals {
            existing: existing.span.clone(),
            inserted: span,
        });
    }

    let (children, rest): (Vec<Node>, Vec<Node>) = std::mem::take(level)
        .into_iter()
        .partition(|n| contains(&span, &n.span));
    *level = rest;
    level.push(Node {
        span,
        tags: vec![tag],
        children,
    });
    Ok(())
}

fn sort_nodes(nodes: &[Node]) -> Vec<Node> {
    let mut sorted: Vec<Node> = nodes
        .iter()
        .map(|node| Node {
            span: node.span.clone(),
            tags: node.tags.clone(),
            children: sort_nodes(&node.children),
        })
        .collect();
    sorted.sort_by_key(|node| node.span.start);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modview::tag::ImportKind;

    fn statement() -> Tag {
        Tag::ImportStatement {
            kind: ImportKind::Static,
        }
    }

    fn specifier(value: &str) -> Tag {
        Tag::ImportModuleSpecifier {
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn test_insert_nested() {
        let tree = IntervalTree::build(vec![
            TaggedInterval::new(15..16, specifier("m")),
            TaggedInterval::new(0..18, statement()),
        ])
        .unwrap();

        assert_eq!(tree.roots().len(), 1);
        let root = &tree.roots()[0];
        assert_eq!(root.span, 0..18);
        assert_eq!(root.tags, vec![statement()]);
        assert_eq!(root.children, vec![Node::new(15..16, specifier("m"))]);
    }

    #[test]
    fn test_insert_inner_after_outer() {
        let tree = IntervalTree::build(vec![
            TaggedInterval::new(0..18, statement()),
            TaggedInterval::new(15..16, specifier("m")),
        ])
        .unwrap();
        assert_eq!(tree.roots()[0].children[0].span, 15..16);
    }

    #[test]
    fn test_same_span_merges_in_insertion_order() {
        let tree = IntervalTree::build(vec![
            TaggedInterval::new(4..4, specifier("")),
            TaggedInterval::new(4..4, statement()),
        ])
        .unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.roots()[0].tags, vec![specifier(""), statement()]);
        assert!(tree.roots()[0].children.is_empty());
    }

    #[test]
    fn test_wrapping_node_collects_only_contained_siblings() {
        let tree = IntervalTree::build(vec![
            TaggedInterval::new(2..3, specifier("a")),
            TaggedInterval::new(20..21, specifier("c")),
            TaggedInterval::new(6..7, specifier("b")),
            TaggedInterval::new(0..10, statement()),
        ])
        .unwrap();

        let spans: Vec<_> = tree.roots().iter().map(|n| n.span.clone()).collect();
        assert_eq!(spans, vec![20..21, 0..10]);
        let children: Vec<_> = tree.roots()[1]
            .children
            .iter()
            .map(|n| n.span.clone())
            .collect();
        assert_eq!(children, vec![2..3, 6..7]);
    }

    #[test]
    fn test_marker_lands_in_node_starting_at_it() {
        for order in [[0, 1, 2], [2, 1, 0], [1, 0, 2], [0, 2, 1]] {
            let intervals = [
                TaggedInterval::new(0..5, statement()),
                TaggedInterval::new(5..9, statement()),
                TaggedInterval::marker(5, Tag::DynamicImport),
            ];
            let tree =
                IntervalTree::build(order.iter().map(|&i| intervals[i].clone())).unwrap();
            let sorted = tree.sorted();
            assert!(sorted.roots()[0].children.is_empty(), "order {order:?}");
            assert_eq!(
                sorted.roots()[1].children,
                vec![Node::new(5..5, Tag::DynamicImport)],
                "order {order:?}"
            );
        }
    }

    #[test]
    fn test_marker_at_end_stays_sibling() {
        let tree = IntervalTree::build(vec![
            TaggedInterval::new(0..5, statement()),
            TaggedInterval::marker(5, Tag::ImportAssertion),
        ])
        .unwrap();
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn test_marker_never_gets_children() {
        let tree = IntervalTree::build(vec![
            TaggedInterval::marker(3, Tag::DynamicImport),
            TaggedInterval::new(3..4, specifier("x")),
        ])
        .unwrap();
        let root = &tree.roots()[0];
        assert_eq!(root.span, 3..4);
        assert!(root.children[0].is_marker());
    }

    #[test]
    fn test_crossing_intervals_rejected() {
        let mut tree = IntervalTree::build(vec![TaggedInterval::new(0..10, statement())]).unwrap();
        assert_eq!(
            tree.insert(TaggedInterval::new(5..15, statement())),
            Err(ReconcileError::CrossingIntervals {
                existing: 0..10,
                inserted: 5..15,
            })
        );
    }

    #[test]
    fn test_crossing_detected_below_root() {
        let mut tree = IntervalTree::build(vec![
            TaggedInterval::new(0..20, statement()),
            TaggedInterval::new(2..6, specifier("a")),
        ])
        .unwrap();
        assert!(matches!(
            tree.insert(TaggedInterval::new(4..8, specifier("b"))),
            Err(ReconcileError::CrossingIntervals { .. })
        ));
    }

    #[test]
    fn test_sorted_orders_every_level() {
        let tree = IntervalTree::build(vec![
            TaggedInterval::new(30..40, statement()),
            TaggedInterval::new(35..36, specifier("z")),
            TaggedInterval::new(31..32, specifier("y")),
            TaggedInterval::new(0..10, statement()),
        ])
        .unwrap();
        let sorted = tree.sorted();

        assert_eq!(sorted.roots()[0].span, 0..10);
        assert_eq!(sorted.roots()[1].span, 30..40);
        let inner: Vec<_> = sorted.roots()[1]
            .children
            .iter()
            .map(|n| n.span.start)
            .collect();
        assert_eq!(inner, vec![31, 35]);
        // Pure: the original keeps its insertion order.
        assert_eq!(tree.roots()[0].span, 30..40);
    }

    #[test]
    fn test_path_at() {
        let tree = IntervalTree::build(vec![
            TaggedInterval::new(0..18, statement()),
            TaggedInterval::new(15..16, specifier("m")),
        ])
        .unwrap();

        let spans = |offset| {
            tree.path_at(offset)
                .iter()
                .map(|n| n.span.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(spans(15), vec![0..18, 15..16]);
        assert_eq!(spans(3), vec![0..18]);
        assert!(spans(18).is_empty());
    }

    #[test]
    fn test_empty_tree() {
        let tree = IntervalTree::build(Vec::<TaggedInterval>::new()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.sorted(), tree);
    }
}
