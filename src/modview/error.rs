//! Error taxonomy for the reconciliation pipeline.
//!
//! Three kinds of failure are fatal and surface to the caller untouched:
//!
//! - the lexer itself failed ([`ViewError::Lexer`]), which is not the same as an empty parse,
//! - a version string could not be parsed ([`VersionError`]),
//! - the records broke a contract the tree builder relies on ([`ReconcileError`]).
//!
//! Empty sources, zero intervals and all-marker inputs are not errors.

use crate::modview::formats::FormatError;
use crate::modview::lexer::LexerError;
use crate::modview::version::VersionError;
use std::ops::Range as ByteRange;
use thiserror::Error;

/// The records violate an invariant the tree builder depends on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Dynamic import discriminant outside `{-2, -1} ∪ [0, ∞)`.
    #[error("invalid dynamic import discriminant {0}")]
    InvalidDiscriminant(i64),

    /// A record field that must be an offset was negative.
    #[error("negative offset {value} in field `{field}`")]
    NegativeOffset { field: &'static str, value: i64 },

    #[error("span {start}..{end} ends before it starts")]
    InvertedSpan { start: usize, end: usize },

    #[error("span {span:?} exceeds source length {len}")]
    OutOfBounds { span: ByteRange<usize>, len: usize },

    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },

    /// Two intervals overlap without one containing the other.
    #[error("intervals {existing:?} and {inserted:?} cross")]
    CrossingIntervals {
        existing: ByteRange<usize>,
        inserted: ByteRange<usize>,
    },

    /// The export list could not be decoded for a version that emits export records.
    #[error("malformed records: {0}")]
    MalformedRecords(String),
}

/// Anything that can stop a source from being annotated.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("lexer failed: {0}")]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Format(#[from] FormatError),
}
