//! Semantic tags attached to source ranges
//!
//! Every range the lexer reports means exactly one thing, so the set of tags is closed and
//! each variant carries a fixed payload. Several tags may end up on one tree node when their
//! ranges coincide; the node keeps them in the order they were inserted.

use crate::modview::error::ReconcileError;
use serde::Serialize;
use std::fmt;

/// How an import statement was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// `import x from 'm'`, `export * from 'm'`
    Static,
    /// `import('m')`
    Dynamic,
    /// `import.meta`
    Meta,
}

impl ImportKind {
    /// Decode the lexer's `d` field: `-1` static, `-2` import.meta, `>= 0` dynamic
    /// (the value is then the offset of the `import` keyword).
    pub fn from_discriminant(d: i64) -> Result<Self, ReconcileError> {
        match d {
            -2 => Ok(ImportKind::Meta),
            -1 => Ok(ImportKind::Static),
            d if d >= 0 => Ok(ImportKind::Dynamic),
            d => Err(ReconcileError::InvalidDiscriminant(d)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Static => "static",
            ImportKind::Dynamic => "dynamic",
            ImportKind::Meta => "meta",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Tag {
    /// The specifier string of an import, with the resolved value when the lexer could
    /// compute one (it can't for `import(expr)` with a non-literal argument).
    ImportModuleSpecifier { value: Option<String> },
    ImportStatement { kind: ImportKind },
    /// Point marker at the start of an import assertion.
    ImportAssertion,
    /// Point marker at the `import` keyword of a dynamic import.
    DynamicImport,
    ExportExportedName { value: Option<String> },
    ExportLocalName { value: Option<String> },
}

impl Tag {
    /// Stable kebab-case name, used as the tag name in renderers.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Tag::ImportModuleSpecifier { .. } => "import-module-specifier",
            Tag::ImportStatement { .. } => "import-statement",
            Tag::ImportAssertion => "import-assertion",
            Tag::DynamicImport => "dynamic-import",
            Tag::ExportExportedName { .. } => "export-exported-name",
            Tag::ExportLocalName { .. } => "export-local-name",
        }
    }

    /// Human readable description, as shown when hovering a node.
    pub fn describe(&self) -> String {
        match self {
            Tag::ImportStatement { kind } => format!("Import Statement (type: {kind})"),
            Tag::ImportModuleSpecifier { value } => {
                format!("Import Module Specifier: {}", quoted(value))
            }
            Tag::DynamicImport => "Dynamic Import Start Position".to_string(),
            Tag::ImportAssertion => "Import Assertion Start Position".to_string(),
            Tag::ExportExportedName { value } => {
                format!("Export Exported Name: {}", quoted(value))
            }
            Tag::ExportLocalName { value } => format!("Export Local Name: {}", quoted(value)),
        }
    }

    /// Point markers never cover text.
    pub fn is_marker(&self) -> bool {
        matches!(self, Tag::ImportAssertion | Tag::DynamicImport)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// Space separated kind names, e.g. `"import-statement import-module-specifier"`.
pub fn kind_names(tags: &[Tag]) -> String {
    tags.iter()
        .map(Tag::kind_name)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quoted(value: &Option<String>) -> String {
    match value {
        Some(v) => serde_json::Value::String(v.clone()).to_string(),
        None => "null".to_string(),
    }
}
