//! Span-aware scanning helpers shared by the classifier and editor features.
//!
//! Character literals in P4 source are delimited by `'`. Every helper here
//! tracks the same quote state: each `'` toggles it, and nothing inside an
//! open literal counts as a comment marker, word separator, or keyword.

use crate::span::{Position, Span, Token, utf16_column};
use once_cell::sync::Lazy;
use regex::Regex;

/// Marker that starts a comment.
pub const COMMENT_MARKER: char = ';';

/// Character-literal delimiter.
pub const QUOTE: char = '\'';

// Separators used when picking the word under the cursor; `-` and `_` stay
// inside words so `-12` and `END_LOOP` are single words.
const WORD_SEPARATORS: &str = "`~!@#$%^&*()=+[{]}\\|;:'\",.<>/?";

static REGISTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:PC|SP|RE|R1[1-5]|R[0-7])\b").unwrap());

/// Returns the byte offset of the first `;` outside a character literal.
///
/// # Examples
///
/// ```
/// use p4_core::scan::comment_start;
///
/// assert_eq!(comment_start("MOV R1, R2 ; copy"), Some(11));
/// assert_eq!(comment_start("MVI R1, ';'"), None);
/// ```
pub fn comment_start(raw: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (offset, c) in raw.char_indices() {
        if c == QUOTE {
            in_quotes = !in_quotes;
        } else if c == COMMENT_MARKER && !in_quotes {
            return Some(offset);
        }
    }
    None
}

/// Returns the column of the opening quote when `character` lies inside an
/// open character literal, or `None` when it is outside any literal.
///
/// Only the text before `character` is scanned, so the quote character
/// sitting at `character` itself does not count.
///
/// # Examples
///
/// ```
/// use p4_core::scan::find_opening_quote;
///
/// let line = "MVI R1, 'A'";
/// assert_eq!(find_opening_quote(line, 9), Some(8));
/// assert_eq!(find_opening_quote(line, 4), None);
/// ```
pub fn find_opening_quote(raw: &str, character: u32) -> Option<u32> {
    let mut in_quotes = false;
    let mut open_quote = 0;
    let mut column = 0u32;

    for c in raw.chars() {
        if column >= character {
            break;
        }
        if c == QUOTE {
            in_quotes = !in_quotes;
            open_quote = column;
        }
        column += c.len_utf16() as u32;
    }

    in_quotes.then_some(open_quote)
}

/// Extracts register names (`PC`, `SP`, `RE`, `R0`-`R7`, `R11`-`R15`) from
/// operand text.
///
/// Matching is case-insensitive and whole-word. Returned spans are absolute:
/// they are offset by `anchor`, the position where `text` starts in the line.
///
/// # Examples
///
/// ```
/// use p4_core::scan::registers_in;
/// use p4_core::span::Position;
///
/// let regs = registers_in("R1, M[SP+1]", Position::new(0, 6));
/// let names: Vec<_> = regs.iter().map(|r| r.text.as_str()).collect();
/// assert_eq!(names, ["R1", "SP"]);
/// assert_eq!(regs[1].span.start.character, 12);
/// ```
pub fn registers_in(text: &str, anchor: Position) -> Vec<Token> {
    REGISTER_PATTERN
        .find_iter(text)
        .map(|m| {
            let start = anchor.character + utf16_column(text, m.start());
            let end = anchor.character + utf16_column(text, m.end());
            Token::new(m.as_str(), Span::on_line(anchor.line, start, end))
        })
        .collect()
}

/// Returns the word touching `character`, using editor word separators.
///
/// A cursor placed right after the last character of a word still selects
/// that word.
pub fn word_at(raw: &str, line: u32, character: u32) -> Option<Token> {
    let mut word_start: Option<(usize, u32)> = None;
    let mut column = 0u32;

    for (offset, c) in raw.char_indices() {
        let is_word_char = !c.is_whitespace() && !WORD_SEPARATORS.contains(c);
        match (is_word_char, word_start) {
            (true, None) => word_start = Some((offset, column)),
            (false, Some((start, start_column))) => {
                if start_column <= character && character <= column {
                    return Some(Token::new(
                        &raw[start..offset],
                        Span::on_line(line, start_column, column),
                    ));
                }
                word_start = None;
            }
            _ => {}
        }
        column += c.len_utf16() as u32;
    }

    let (start, start_column) = word_start?;
    (start_column <= character && character <= column)
        .then(|| Token::new(&raw[start..], Span::on_line(line, start_column, column)))
}
