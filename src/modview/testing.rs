//! Testing utilities
//!
//! Three pieces, used by the unit tests and by the suites under `tests/`:
//!
//!   - [`assert_tree`]: a fluent assertion API over [`IntervalTree`], so tests state the
//!     shape they expect (spans, tag kinds, children) instead of walking nodes by hand.
//!   - [`assert_well_formed`]: checks the structural guarantees every reconciled source
//!     must meet, whatever the records were.
//!   - [`Fixtures`]: loads recorded lexer output from `tests/fixtures/`. Each fixture is a
//!     `<name>.js` source next to a `<name>.json` parse result, with offsets checked against
//!     the source once, so tests don't each carry hand-counted offsets.
//!
//! ```rust,ignore
//! let annotated = Fixtures::load("static_import").reconcile(&Pipeline::new()).unwrap();
//! assert_well_formed(&annotated);
//! assert_tree(&annotated.tree)
//!     .root_count(1)
//!     .root(0, |node| {
//!         node.span(0..17)
//!             .kinds(&["import-statement"])
//!             .child(0, |spec| spec.span(15..16).kinds(&["import-module-specifier"]))
//!     });
//! ```

use crate::modview::error::ReconcileError;
use crate::modview::interval::{contains, crosses};
use crate::modview::lexer::{LexerError, ParseResult, RecordedLexer};
use crate::modview::pipeline::{Annotated, Pipeline};
use crate::modview::segment::{concat, Segment};
use crate::modview::tag::Tag;
use crate::modview::tree::{IntervalTree, Node};
use std::ops::Range;
use std::path::PathBuf;

// ============================================================================
// Tree Assertions
// ============================================================================

/// Create an assertion builder for a tree
pub fn assert_tree(tree: &IntervalTree) -> TreeAssertion<'_> {
    TreeAssertion {
        roots: tree.roots(),
    }
}

pub struct TreeAssertion<'a> {
    roots: &'a [Node],
}

impl<'a> TreeAssertion<'a> {
    pub fn root_count(self, expected: usize) -> Self {
        assert_eq!(
            self.roots.len(),
            expected,
            "tree: expected {} roots, found {}: {:?}",
            expected,
            self.roots.len(),
            spans(self.roots)
        );
        self
    }

    pub fn root<F, R>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        let node = self.roots.get(index).unwrap_or_else(|| {
            panic!(
                "tree: no root at index {}, have {}",
                index,
                self.roots.len()
            )
        });
        check(NodeAssertion {
            node,
            context: format!("root[{index}]"),
        });
        self
    }
}

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn span(self, expected: Range<usize>) -> Self {
        assert_eq!(self.node.span, expected, "{}: span mismatch", self.context);
        self
    }

    /// Tag kinds on the node, in insertion order.
    pub fn kinds(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.node.tags.iter().map(Tag::kind_name).collect();
        assert_eq!(actual, expected, "{}: tag kinds mismatch", self.context);
        self
    }

    pub fn has_tag(self, expected: &Tag) -> Self {
        assert!(
            self.node.tags.contains(expected),
            "{}: expected tag {:?}, found {:?}",
            self.context,
            expected,
            self.node.tags
        );
        self
    }

    pub fn is_marker(self) -> Self {
        assert!(
            self.node.is_marker(),
            "{}: expected a zero-width node, found {:?}",
            self.context,
            self.node.span
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        assert_eq!(
            self.node.children.len(),
            expected,
            "{}: expected {} children, found {:?}",
            self.context,
            expected,
            spans(&self.node.children)
        );
        self
    }

    pub fn child<F, R>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        let node = self.node.children.get(index).unwrap_or_else(|| {
            panic!(
                "{}: no child at index {}, have {}",
                self.context,
                index,
                self.node.children.len()
            )
        });
        check(NodeAssertion {
            node,
            context: format!("{}.child[{index}]", self.context),
        });
        self
    }
}

fn spans(nodes: &[Node]) -> Vec<Range<usize>> {
    nodes.iter().map(|n| n.span.clone()).collect()
}

// ============================================================================
// Structural Invariants
// ============================================================================

/// Panic unless `annotated` meets the guarantees every reconciliation provides:
///
///   - the segments concatenate back to the source
///   - spans stay inside the source and on character boundaries
///   - every node carries at least one tag
///   - children sit inside their parent
///   - siblings are ordered by start and neither contain nor cross each other
pub fn assert_well_formed(annotated: &Annotated) {
    let source = annotated.source.as_str();
    assert_eq!(
        concat(&annotated.segments, source),
        source,
        "segments do not reproduce the source"
    );
    assert_segments_cover(&annotated.segments, 0..source.len());
    assert_siblings(annotated.tree.roots(), None, source);
}

fn assert_siblings(nodes: &[Node], parent: Option<&Node>, source: &str) {
    for (i, node) in nodes.iter().enumerate() {
        assert!(
            node.span.start <= node.span.end && node.span.end <= source.len(),
            "span {:?} outside source of length {}",
            node.span,
            source.len()
        );
        assert!(
            source.is_char_boundary(node.span.start) && source.is_char_boundary(node.span.end),
            "span {:?} splits a character",
            node.span
        );
        assert!(!node.tags.is_empty(), "node {:?} has no tags", node.span);
        if let Some(parent) = parent {
            assert!(
                contains(&parent.span, &node.span),
                "child {:?} escapes parent {:?}",
                node.span,
                parent.span
            );
        }
        if let Some(next) = nodes.get(i + 1) {
            assert!(
                node.span.start <= next.span.start,
                "siblings out of order: {:?} before {:?}",
                node.span,
                next.span
            );
        }
        for other in &nodes[i + 1..] {
            assert!(
                !contains(&node.span, &other.span) && !contains(&other.span, &node.span),
                "sibling {:?} should be nested with {:?}",
                node.span,
                other.span
            );
            assert!(
                !crosses(&node.span, &other.span),
                "siblings {:?} and {:?} cross",
                node.span,
                other.span
            );
        }
        assert_siblings(&node.children, Some(node), source);
    }
}

fn assert_segments_cover(segments: &[Segment], range: Range<usize>) {
    let mut cursor = range.start;
    for segment in segments {
        let span = segment.span();
        assert_eq!(
            span.start, cursor,
            "segment {:?} leaves a gap or overlaps at {}",
            span, cursor
        );
        if let Segment::Annotated { children, .. } = segment {
            assert_segments_cover(children, span.clone());
        }
        cursor = span.end;
    }
    assert_eq!(cursor, range.end, "segments stop short of {:?}", range);
}

/// Every (span, tag) pair in the tree, sorted, for comparing trees built in different
/// insertion orders.
pub fn tagged_spans(tree: &IntervalTree) -> Vec<(usize, usize, String)> {
    let mut pairs = Vec::new();
    tree.visit(&mut |node, _| {
        for tag in &node.tags {
            pairs.push((node.span.start, node.span.end, format!("{tag:?}")));
        }
    });
    pairs.sort();
    pairs
}

// ============================================================================
// Fixtures
// ============================================================================

/// Get the path to a file relative to the crate root.
pub fn workspace_path(relative_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative_path)
}

/// Recorded sources and lexer output under `tests/fixtures/`.
pub struct Fixtures;

impl Fixtures {
    pub fn dir() -> PathBuf {
        workspace_path("tests/fixtures")
    }

    /// Names of every fixture that has both a source and a recording, sorted.
    pub fn names() -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(Self::dir())
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| path.extension().is_some_and(|ext| ext == "js"))
                    .filter(|path| path.with_extension("json").exists())
                    .filter_map(|path| {
                        path.file_stem()
                            .and_then(|stem| stem.to_str())
                            .map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Load a fixture by name. Panics if either file is missing or the recording is invalid.
    pub fn load(name: &str) -> Fixture {
        let dir = Self::dir();
        let source_path = dir.join(format!("{name}.js"));
        let records_path = dir.join(format!("{name}.json"));
        let source = std::fs::read_to_string(&source_path)
            .unwrap_or_else(|e| panic!("cannot read {}: {}", source_path.display(), e));
        let records = std::fs::read_to_string(&records_path)
            .unwrap_or_else(|e| panic!("cannot read {}: {}", records_path.display(), e));
        let result = ParseResult::from_json(&records)
            .unwrap_or_else(|e| panic!("bad recording {}: {}", records_path.display(), e));
        Fixture {
            name: name.to_string(),
            source,
            result,
            records_path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fixture {
    pub name: String,
    pub source: String,
    pub result: ParseResult,
    pub records_path: PathBuf,
}

impl Fixture {
    pub fn reconcile(&self, pipeline: &Pipeline) -> Result<Annotated, ReconcileError> {
        pipeline.reconcile(&self.source, &self.result)
    }

    /// A lexer replaying this fixture's recording as the given release.
    pub fn lexer(&self, version: Option<&str>) -> Result<RecordedLexer, LexerError> {
        RecordedLexer::from_path(&self.records_path, version.map(str::to_string))
    }
}
