//! The fixed P4 mnemonic set and its compiled whole-token matchers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Known instruction and directive keywords, in lookup order.
pub const MNEMONICS: &[&str] = &[
    "ORIG", "OPT", "ADD", "ADDC", "AND", "BR", "CALL", "CLC", "CMC", "CMP", "COM", "DEC", "DSI",
    "ENI", "INC", "INT", "JAL", "JMP", "LOAD", "MOV", "MVI", "MVIH", "MVIL", "NEG", "NOP", "OR",
    "ROL", "ROLC", "ROR", "RORC", "RTI", "SHL", "SHLA", "SHR", "SHRA", "STC", "STOR", "SUB",
    "SUBB", "TEST", "XOR",
];

/// Mnemonics that redirect control flow.
pub const JUMP_MNEMONICS: &[&str] = &["CALL", "JMP", "BR"];

struct Matcher {
    mnemonic: &'static str,
    pattern: Regex,
}

// A mnemonic is a whole whitespace-delimited token, optionally followed by a
// condition suffix such as `.Z` or `.NC`.
static MATCHERS: Lazy<Vec<Matcher>> = Lazy::new(|| {
    MNEMONICS
        .iter()
        .map(|&mnemonic| Matcher {
            mnemonic,
            pattern: Regex::new(&format!(
                r"(?:^|\s)({}(?:\.[A-Za-z]+)?)(?:\s|$)",
                regex::escape(mnemonic)
            ))
            .unwrap(),
        })
        .collect()
});

/// A mnemonic occurrence inside a searched string.
///
/// `start` and `end` are byte offsets relative to the searched string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MnemonicMatch<'a> {
    /// Mnemonic from [`MNEMONICS`] without any condition suffix.
    pub base: &'static str,
    /// Matched text, including the condition suffix when present.
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl MnemonicMatch<'_> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_jump(&self) -> bool {
        is_jump(self.base)
    }
}

/// Finds the mnemonic that starts first in `text`.
///
/// Every matcher is tried; the match with the smallest start offset wins and
/// ties on the start offset go to the longer match.
///
/// # Examples
///
/// ```
/// use p4_core::mnemonics::find_mnemonic;
///
/// let found = find_mnemonic(" MVIH R1, 12h").unwrap();
/// assert_eq!(found.text, "MVIH");
/// assert_eq!(found.start, 1);
///
/// assert!(find_mnemonic("ADDRESS R1").is_none());
/// ```
pub fn find_mnemonic(text: &str) -> Option<MnemonicMatch<'_>> {
    let mut best: Option<MnemonicMatch<'_>> = None;

    for matcher in MATCHERS.iter() {
        let Some(group) = matcher.pattern.captures(text).and_then(|caps| caps.get(1)) else {
            continue;
        };

        let candidate = MnemonicMatch {
            base: matcher.mnemonic,
            text: group.as_str(),
            start: group.start(),
            end: group.end(),
        };

        best = match best {
            Some(current)
                if current.start < candidate.start
                    || (current.start == candidate.start && current.len() >= candidate.len()) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        };
    }

    best
}

/// Strips a condition suffix: `BR.Z` becomes `BR`.
pub fn base_mnemonic(text: &str) -> &str {
    text.split_once('.').map_or(text, |(base, _)| base)
}

/// Returns true for `CALL`, `JMP` and `BR`, with or without a condition.
pub fn is_jump(mnemonic: &str) -> bool {
    JUMP_MNEMONICS.contains(&base_mnemonic(mnemonic))
}
