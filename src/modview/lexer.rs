//! Module lexer output
//!
//! The lexer itself is an external capability: it takes source text and returns
//! `[imports, exports, facade, hasModuleSyntax]`. This module defines that result, the
//! records inside it, and the [`ModuleLexer`] trait the pipeline calls.
//!
//! Offsets are signed because the lexer uses `-1` for "absent" (`a` when there is no
//! assertion, `ls`/`le` when an export has no local name) and `-1`/`-2` as discriminants in `d`.
//!
//! The export list is decoded lazily. Its element shape changed across lexer releases, so it
//! stays an untyped value until [`ParseResult::export_records`] is asked for it, which the
//! pipeline only does when the version reports export records.

use crate::modview::error::ReconcileError;
use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

fn absent() -> i64 {
    -1
}

/// One import as reported by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportRecord {
    /// Resolved specifier, when the lexer could compute it.
    #[serde(default)]
    pub n: Option<String>,
    /// Specifier start.
    pub s: i64,
    /// Specifier end.
    pub e: i64,
    /// Statement start.
    pub ss: i64,
    /// Statement end.
    pub se: i64,
    /// `-1` static, `-2` import.meta, otherwise the offset of the dynamic `import` keyword.
    pub d: i64,
    /// Assertion start, `-1` when there is none.
    #[serde(default = "absent")]
    pub a: i64,
}

/// One export as reported by lexers from 1.0.0 on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportRecord {
    /// Exported name.
    #[serde(default)]
    pub n: Option<String>,
    /// Local name, when it differs from nothing (`export { a as b }`, `export function f`).
    #[serde(default)]
    pub ln: Option<String>,
    pub s: i64,
    pub e: i64,
    #[serde(default = "absent")]
    pub ls: i64,
    #[serde(default = "absent")]
    pub le: i64,
}

/// The lexer's full answer for one source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub imports: Vec<ImportRecord>,
    /// Raw export list; see [`ParseResult::export_records`].
    pub exports: serde_json::Value,
    /// No imports or exports were found other than re-exports.
    pub facade: bool,
    /// `None` when the lexer release predates the flag.
    pub has_module_syntax: Option<bool>,
}

impl ParseResult {
    pub fn new(imports: Vec<ImportRecord>) -> Self {
        Self {
            imports,
            exports: serde_json::Value::Array(Vec::new()),
            facade: false,
            has_module_syntax: None,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, LexerError> {
        serde_json::from_str(text).map_err(|e| LexerError::Decode(e.to_string()))
    }

    pub fn from_yaml(text: &str) -> Result<Self, LexerError> {
        serde_yaml::from_str(text).map_err(|e| LexerError::Decode(e.to_string()))
    }

    /// Decode the export list as `{s, e, ls, le, n, ln}` records.
    pub fn export_records(&self) -> Result<Vec<ExportRecord>, ReconcileError> {
        Vec::<ExportRecord>::deserialize(&self.exports)
            .map_err(|e| ReconcileError::MalformedRecords(format!("exports: {e}")))
    }
}

impl<'de> Deserialize<'de> for ParseResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ParseResultVisitor)
    }
}

struct ParseResultVisitor;

impl<'de> Visitor<'de> for ParseResultVisitor {
    type Value = ParseResult;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array [imports, exports, facade, hasModuleSyntax?]")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<ParseResult, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let imports: Vec<ImportRecord> = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let exports = seq
            .next_element::<serde_json::Value>()?
            .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
        let facade = seq.next_element::<Option<bool>>()?.flatten().unwrap_or(false);
        let has_module_syntax = seq.next_element::<Option<bool>>()?.flatten();
        // Later releases may append more fields.
        while seq.next_element::<IgnoredAny>()?.is_some() {}

        Ok(ParseResult {
            imports,
            exports,
            facade,
            has_module_syntax,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerError {
    /// The lexer rejected the source.
    #[error("{0}")]
    Failed(String),

    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("cannot decode lexer output: {0}")]
    Decode(String),

    #[error("unsupported record file format: {0:?} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

/// A module lexer, as seen by the pipeline.
pub trait ModuleLexer {
    /// Release of the lexer, when known. Drives [`Capabilities`](crate::modview::version::Capabilities).
    fn version(&self) -> Option<&str>;

    fn parse(&self, source: &str) -> Result<ParseResult, LexerError>;
}

/// Replays a parse result recorded ahead of time.
#[derive(Debug, Clone)]
pub struct RecordedLexer {
    version: Option<String>,
    result: ParseResult,
}

impl RecordedLexer {
    pub fn new(result: ParseResult, version: Option<String>) -> Self {
        Self { version, result }
    }

    /// Load a recording; `.json` files are read as JSON, `.yaml`/`.yml` as YAML.
    pub fn from_path(path: impl AsRef<Path>, version: Option<String>) -> Result<Self, LexerError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LexerError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let result = match extension {
            "json" => ParseResult::from_json(&text)?,
            "yaml" | "yml" => ParseResult::from_yaml(&text)?,
            other => return Err(LexerError::UnsupportedFormat(other.to_string())),
        };
        Ok(Self::new(result, version))
    }
}

impl ModuleLexer for RecordedLexer {
    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn parse(&self, _source: &str) -> Result<ParseResult, LexerError> {
        Ok(self.result.clone())
    }
}
