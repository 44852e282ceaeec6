//! Numeric and character constant evaluation for hover text.
//!
//! P4 literals use a radix suffix: `1010b`, `17o`, `0FFh`. Decimal values
//! have no suffix and may be negative. The machine word is 16 bits wide, so a
//! non-negative value with bit 15 set reads as its two's complement.

use crate::scan;
use crate::span::byte_offset;
use once_cell::sync::Lazy;
use regex::Regex;

static BINARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[01]+b$").unwrap());
static OCTAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[0-7]+o$").unwrap());
static HEXADECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^0*[0-9A-F]{1,4}h$").unwrap());
static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+$").unwrap());

const SIGN_BIT: i64 = 0x8000;
const WORD_RANGE: i64 = 0x1_0000;

/// Parses a numeric literal.
///
/// # Examples
///
/// ```
/// use p4_core::constants::parse_numeric;
///
/// assert_eq!(parse_numeric("1010b"), Some(10));
/// assert_eq!(parse_numeric("17o"), Some(15));
/// assert_eq!(parse_numeric("0FFh"), Some(255));
/// assert_eq!(parse_numeric("FFFFh"), Some(-1));
/// assert_eq!(parse_numeric("-12"), Some(-12));
/// assert_eq!(parse_numeric("LOOP"), None);
/// ```
pub fn parse_numeric(word: &str) -> Option<i64> {
    let suffixed = |radix| i64::from_str_radix(&word[..word.len() - 1], radix).ok();

    let value = if BINARY.is_match(word) {
        suffixed(2)?
    } else if OCTAL.is_match(word) {
        suffixed(8)?
    } else if HEXADECIMAL.is_match(word) {
        suffixed(16)?
    } else if DECIMAL.is_match(word) {
        word.parse().ok()?
    } else {
        return None;
    };

    Some(to_signed_word(value))
}

fn to_signed_word(value: i64) -> i64 {
    if value >= 0 && value & SIGN_BIT != 0 {
        value - WORD_RANGE
    } else {
        value
    }
}

/// Values of the constant at `character` in `raw`.
///
/// Inside a closed character literal every character of the literal is
/// returned as its code point. Elsewhere the word at the cursor is parsed with
/// [`parse_numeric`]. An unterminated literal yields nothing.
///
/// # Examples
///
/// ```
/// use p4_core::constants::constant_values;
///
/// assert_eq!(constant_values("MVI R1, 'AB'", 9), vec![65, 66]);
/// assert_eq!(constant_values("MVI R1, 20h", 9), vec![32]);
/// ```
pub fn constant_values(raw: &str, character: u32) -> Vec<i64> {
    if let Some(open) = scan::find_opening_quote(raw, character) {
        let after = byte_offset(raw, open) + scan::QUOTE.len_utf8();
        return raw[after..]
            .split_once(scan::QUOTE)
            .map(|(literal, _)| literal.chars().map(|c| i64::from(u32::from(c))).collect())
            .unwrap_or_default();
    }

    scan::word_at(raw, 0, character)
        .and_then(|word| parse_numeric(&word.text))
        .into_iter()
        .collect()
}
