//! Source positions and offset conversion
//!
//! Tree nodes carry byte spans. Renderers want line:column positions for display, and
//! lexers running on JavaScript strings report UTF-16 code unit offsets rather than bytes.
//! [`SourceLocation`] converts between the three.
//!
//! - Byte to position is a binary search over line starts.
//! - UTF-16 to byte is a binary search over the UTF-16 offset of every character.
//!
//! Both are built once per source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line:column position, both zero-based. Columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Unit the lexer used for its offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetEncoding {
    #[default]
    Utf8,
    Utf16,
}

/// Offset lookup tables for one source.
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
    /// `(utf16 offset, byte offset)` of every character, plus the end of the source
    utf16_starts: Vec<(usize, usize)>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let mut utf16_starts = Vec::with_capacity(source.len() + 1);
        let mut utf16 = 0;

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
            utf16_starts.push((utf16, byte_pos));
            utf16 += ch.len_utf16();
        }
        utf16_starts.push((utf16, source.len()));

        Self {
            line_starts,
            utf16_starts,
        }
    }

    /// Convert a byte offset to a line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        Position::new(line, column)
    }

    /// Byte offset of a UTF-16 offset, or `None` when it points inside a surrogate pair or
    /// past the end of the source.
    pub fn utf16_to_byte(&self, utf16_offset: usize) -> Option<usize> {
        self.utf16_starts
            .binary_search_by_key(&utf16_offset, |&(utf16, _)| utf16)
            .ok()
            .map(|i| self.utf16_starts[i].1)
    }

    /// Length of the source in UTF-16 code units.
    pub fn utf16_len(&self) -> usize {
        self.utf16_starts.last().map_or(0, |&(utf16, _)| utf16)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
