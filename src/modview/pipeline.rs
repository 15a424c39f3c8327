//! End-to-end reconciliation
//!
//! ```text
//! lexer records ──collect──▶ tagged intervals ──validate──▶ interval tree ──sort──▶ segments
//! ```
//!
//! [`Pipeline`] holds what the stages need to know about their input (lexer capabilities,
//! offset encoding, whether to elide empty gaps) and produces an [`Annotated`] source:
//! the sorted tree, the segments, and the flags the lexer reported alongside its records.
//!
//! The whole thing is a pure function of source, records and capabilities, cheap enough to
//! rerun on every edit. Callers that want to avoid recomputation memoize on their side.

use crate::modview::collector::collect_intervals;
use crate::modview::error::{ReconcileError, ViewError};
use crate::modview::interval::TaggedInterval;
use crate::modview::lexer::{ModuleLexer, ParseResult};
use crate::modview::location::{OffsetEncoding, SourceLocation};
use crate::modview::segment::{Segment, SegmentEmitter};
use crate::modview::tree::IntervalTree;
use crate::modview::version::{Capabilities, VersionError};

/// A source with its lexer output reconciled into a renderable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated {
    pub source: String,
    /// Sorted tree of the record ranges, in byte offsets.
    pub tree: IntervalTree,
    pub segments: Vec<Segment>,
    pub facade: bool,
    /// `None` when the lexer release does not report the flag.
    pub has_module_syntax: Option<bool>,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    capabilities: Capabilities,
    encoding: OffsetEncoding,
    emitter: SegmentEmitter,
}

impl Pipeline {
    /// A pipeline assuming the latest lexer release and UTF-8 offsets.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_version(version: &str) -> Result<Self, VersionError> {
        Ok(Self::new().with_capabilities(Capabilities::for_version(version)?))
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_offsets(mut self, encoding: OffsetEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn elide_empty_text(mut self, elide: bool) -> Self {
        self.emitter = SegmentEmitter::new(elide);
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Run the lexer on `source` and reconcile its output.
    ///
    /// When the lexer knows its own version, that version decides the capabilities.
    pub fn run(&self, source: &str, lexer: &dyn ModuleLexer) -> Result<Annotated, ViewError> {
        let pipeline = match lexer.version() {
            Some(version) => self.with_capabilities(Capabilities::for_version(version)?),
            None => *self,
        };
        let result = lexer.parse(source)?;
        Ok(pipeline.reconcile(source, &result)?)
    }

    pub fn reconcile(
        &self,
        source: &str,
        result: &ParseResult,
    ) -> Result<Annotated, ReconcileError> {
        let exports = if self.capabilities.export_records {
            Some(result.export_records()?)
        } else {
            if result.exports.as_array().is_some_and(|list| !list.is_empty()) {
                log::warn!("lexer release does not report export records; ignoring exports");
            }
            None
        };

        let mut intervals = collect_intervals(&result.imports, exports.as_deref())?;
        if self.encoding == OffsetEncoding::Utf16 {
            to_byte_offsets(source, &mut intervals)?;
        }
        for interval in &intervals {
            validate(source, interval)?;
        }

        let tree = IntervalTree::build(intervals)?.sorted();
        let segments = self.emitter.emit_tree(&tree, source.len());
        log::debug!(
            "reconciled {} nodes into {} top-level segments",
            tree.len(),
            segments.len()
        );

        Ok(Annotated {
            source: source.to_string(),
            tree,
            segments,
            facade: result.facade,
            has_module_syntax: if self.capabilities.module_syntax_flag {
                result.has_module_syntax
            } else {
                None
            },
            capabilities: self.capabilities,
        })
    }
}

/// Reconcile `source` with whatever `lexer` reports, using the default pipeline.
pub fn annotate(source: &str, lexer: &dyn ModuleLexer) -> Result<Annotated, ViewError> {
    Pipeline::new().run(source, lexer)
}

fn to_byte_offsets(
    source: &str,
    intervals: &mut [TaggedInterval],
) -> Result<(), ReconcileError> {
    let location = SourceLocation::new(source);
    let convert = |offset: usize, span: &std::ops::Range<usize>| {
        if offset > location.utf16_len() {
            return Err(ReconcileError::OutOfBounds {
                span: span.clone(),
                len: location.utf16_len(),
            });
        }
        location
            .utf16_to_byte(offset)
            .ok_or(ReconcileError::NotCharBoundary { offset })
    };
    for interval in intervals.iter_mut() {
        let start = convert(interval.span.start, &interval.span)?;
        let end = convert(interval.span.end, &interval.span)?;
        interval.span = start..end;
    }
    Ok(())
}

fn validate(source: &str, interval: &TaggedInterval) -> Result<(), ReconcileError> {
    let span = &interval.span;
    if span.start > span.end {
        return Err(ReconcileError::InvertedSpan {
            start: span.start,
            end: span.end,
        });
    }
    if span.end > source.len() {
        return Err(ReconcileError::OutOfBounds {
            span: span.clone(),
            len: source.len(),
        });
    }
    for offset in [span.start, span.end] {
        if !source.is_char_boundary(offset) {
            return Err(ReconcileError::NotCharBoundary { offset });
        }
    }
    Ok(())
}
