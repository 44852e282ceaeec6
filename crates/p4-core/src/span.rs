//! Line/column positions and half-open spans.
//!
//! Columns are counted in UTF-16 code units, the unit LSP clients use by
//! default, so every [`Span`] converts to an LSP `Range` without
//! re-measuring the line text.

use tower_lsp_server::ls_types as lsp;

/// A zero-based (line, column) position inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open `[start, end)` range covering a slice of one line.
///
/// A zero-width span (`start == end`) marks the place where an absent
/// element would have started.
///
/// # Examples
///
/// ```
/// use p4_core::span::{Position, Span};
///
/// let span = Span::on_line(3, 4, 7);
/// assert!(span.contains(Position::new(3, 4)));
/// assert!(span.contains(Position::new(3, 6)));
/// assert!(!span.contains(Position::new(3, 7)));
/// assert_eq!(span.width(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Builds a span on `line` from `start` (inclusive) to `end` (exclusive).
    pub const fn on_line(line: u32, start: u32, end: u32) -> Self {
        Self {
            start: Position::new(line, start),
            end: Position::new(line, end),
        }
    }

    /// Zero-width span anchored at `column`.
    pub const fn empty(line: u32, column: u32) -> Self {
        Self::on_line(line, column, column)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of columns covered when the span stays on one line.
    pub fn width(&self) -> u32 {
        if self.start.line == self.end.line {
            self.end.character.saturating_sub(self.start.character)
        } else {
            0
        }
    }

    /// Half-open containment test: the end position itself is outside.
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// Like [`Span::contains`] but also accepts the end position, where an
    /// editor cursor sits right after the last character.
    pub fn touches(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// The part of `text` covered by this span's columns.
    ///
    /// `text` is the line the span was measured on.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        let start = byte_offset(text, self.start.character);
        let end = byte_offset(text, self.end.character).max(start);
        &text[start..end]
    }
}

impl From<Position> for lsp::Position {
    fn from(position: Position) -> Self {
        Self::new(position.line, position.character)
    }
}

impl From<lsp::Position> for Position {
    fn from(position: lsp::Position) -> Self {
        Self::new(position.line, position.character)
    }
}

impl From<Span> for lsp::Range {
    fn from(span: Span) -> Self {
        Self::new(span.start.into(), span.end.into())
    }
}

/// A piece of line text together with the span it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    /// Builds a token for `text[start..end]` (byte offsets) on `line`.
    pub(crate) fn from_bytes(text: &str, line: u32, start: usize, end: usize) -> Self {
        Self::new(
            &text[start..end],
            Span::on_line(line, utf16_column(text, start), utf16_column(text, end)),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Converts a byte offset inside `text` to a UTF-16 column.
///
/// Offsets past the end or inside a multi-byte character are clamped to the
/// closest preceding character boundary.
pub(crate) fn utf16_column(text: &str, byte_offset: usize) -> u32 {
    let mut offset = byte_offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    text[..offset].encode_utf16().count() as u32
}

/// Converts a UTF-16 column to a byte offset inside `text`, clamped to the
/// end of the text.
pub(crate) fn byte_offset(text: &str, column: u32) -> usize {
    let mut current = 0u32;
    for (offset, c) in text.char_indices() {
        if current >= column {
            return offset;
        }
        current += c.len_utf16() as u32;
    }
    text.len()
}
