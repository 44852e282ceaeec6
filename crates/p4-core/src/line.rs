//! Single-line classifier with column-exact spans.
//!
//! Every physical line of a P4 source file has the shape
//!
//! ```text
//! [label[:]] [mnemonic [operands]] [; comment]
//! name EQU|WORD|STR|TAB value      [; comment]
//! ```
//!
//! [`classify`] turns one line into a [`ClassifiedLine`]. It accepts any input
//! and never fails: text it cannot make sense of degrades to
//! [`LineKind::Other`], which keeps editor features responsive while the user
//! is still typing.
//!
//! # Examples
//!
//! ```
//! use p4_core::line::{LineType, classify};
//!
//! let line = classify("LOOP: ADD R1, R2 ; add", 0);
//! assert_eq!(line.line_type(), LineType::Label);
//! assert_eq!(line.label().unwrap().text, "LOOP");
//! assert_eq!(line.mnemonic().unwrap().text, "ADD");
//! assert_eq!(line.data().unwrap().text, "R1, R2");
//! assert_eq!(line.comment().unwrap().text, "; add");
//! ```

use crate::error::P4Error;
use crate::mnemonics;
use crate::scan;
use crate::span::{Span, Token, utf16_column};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static ASSIGNMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\S.*?)\s+(EQU|WORD|STR|TAB)\s+(.*)$").unwrap());

/// Plain tag of a [`LineKind`], convenient for comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    Assignment,
    Instruction,
    Comment,
    Label,
    Other,
}

/// Keyword that introduces a symbolic assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    /// Named constant.
    Equ,
    /// Initialized memory word.
    Word,
    /// String stored one character per word.
    Str,
    /// Reserved table of words.
    Tab,
}

impl AssignmentOperator {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Equ => "EQU",
            Self::Word => "WORD",
            Self::Str => "STR",
            Self::Tab => "TAB",
        }
    }
}

impl FromStr for AssignmentOperator {
    type Err = P4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Equ, Self::Word, Self::Str, Self::Tab]
            .into_iter()
            .find(|op| op.keyword().eq_ignore_ascii_case(s))
            .ok_or_else(|| P4Error::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for AssignmentOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// `name OP value` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub variable: Token,
    /// Operator as written in the source (case preserved).
    pub operator: Token,
    pub kind: AssignmentOperator,
    pub value: Token,
}

/// Mnemonic with its operand text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Mnemonic as written, including a condition suffix such as `.Z`.
    pub mnemonic: Token,
    /// Operands with surrounding whitespace removed.
    pub data: Option<Token>,
    /// True for `CALL`, `JMP` and `BR`.
    pub jump: bool,
}

impl Instruction {
    /// Mnemonic without its condition suffix.
    pub fn base_mnemonic(&self) -> &str {
        mnemonics::base_mnemonic(&self.mnemonic.text)
    }
}

/// What a line contains. Each case only carries the fields that make sense
/// for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Blank lines and text that matches nothing else.
    Other,
    /// Nothing but a comment; the comment itself lives on the line.
    Comment,
    Assignment(Assignment),
    /// A mnemonic, possibly preceded by a colon-less label.
    Instruction {
        label: Option<Token>,
        instruction: Instruction,
    },
    /// A `name:` definition, possibly followed by an instruction.
    Label {
        label: Token,
        instruction: Option<Instruction>,
    },
}

impl LineKind {
    pub const fn line_type(&self) -> LineType {
        match self {
            Self::Other => LineType::Other,
            Self::Comment => LineType::Comment,
            Self::Assignment(_) => LineType::Assignment,
            Self::Instruction { .. } => LineType::Instruction,
            Self::Label { .. } => LineType::Label,
        }
    }
}

/// The eight positional regions of a line, left to right.
///
/// Regions that are absent are zero-width and sit where they would have
/// started, so the spans never overlap and never go backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    pub leading: Span,
    pub label: Span,
    pub label_gap: Span,
    pub instruction: Span,
    pub data_gap: Span,
    pub data: Span,
    pub comment_gap: Span,
    pub comment: Span,
}

impl LineLayout {
    pub const fn spans(&self) -> [Span; 8] {
        [
            self.leading,
            self.label,
            self.label_gap,
            self.instruction,
            self.data_gap,
            self.data,
            self.comment_gap,
            self.comment,
        ]
    }

    fn compute(
        raw: &str,
        line: u32,
        leading_end: u32,
        kind: &LineKind,
        comment: Option<&Token>,
    ) -> Self {
        let (label, instruction) = match kind {
            LineKind::Instruction { label, instruction } => (label.as_ref(), Some(instruction)),
            LineKind::Label { label, instruction } => (Some(label), instruction.as_ref()),
            _ => (None, None),
        };

        let mut cursor = leading_end;
        let label = label.map_or(Span::empty(line, cursor), |t| t.span);
        cursor = label.end.character;

        let (label_gap, instruction, data_gap, data) = match instruction {
            Some(instruction) => {
                let span = instruction.mnemonic.span;
                let gap_start = whitespace_run_start(raw, span.start.character, cursor);
                let label_gap = Span::on_line(line, gap_start, span.start.character);
                cursor = span.end.character;
                match &instruction.data {
                    Some(data) => {
                        let data_gap = Span::on_line(line, cursor, data.span.start.character);
                        cursor = data.span.end.character;
                        (label_gap, span, data_gap, data.span)
                    }
                    None => (
                        label_gap,
                        span,
                        Span::empty(line, cursor),
                        Span::empty(line, cursor),
                    ),
                }
            }
            None => (
                Span::empty(line, cursor),
                Span::empty(line, cursor),
                Span::empty(line, cursor),
                Span::empty(line, cursor),
            ),
        };

        let (comment_gap, comment) = match comment {
            Some(token) => {
                let start = token.span.start.character;
                let gap_start = whitespace_run_start(raw, start, cursor);
                (Span::on_line(line, gap_start, start), token.span)
            }
            None => (Span::empty(line, cursor), Span::empty(line, cursor)),
        };

        Self {
            leading: Span::on_line(line, 0, leading_end),
            label,
            label_gap,
            instruction,
            data_gap,
            data,
            comment_gap,
            comment,
        }
    }
}

/// One classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    raw: String,
    line: u32,
    span: Span,
    kind: LineKind,
    comment: Option<Token>,
    layout: LineLayout,
}

impl ClassifiedLine {
    fn assemble(
        raw: &str,
        line: u32,
        leading_end: usize,
        kind: LineKind,
        comment: Option<Token>,
    ) -> Self {
        let leading_end = utf16_column(raw, leading_end);
        let layout = LineLayout::compute(raw, line, leading_end, &kind, comment.as_ref());
        Self {
            raw: raw.to_string(),
            line,
            span: Span::on_line(line, 0, utf16_column(raw, raw.len())),
            kind,
            comment,
            layout,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn line_number(&self) -> u32 {
        self.line
    }

    /// Span of the whole line, `[0, length)`.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn kind(&self) -> &LineKind {
        &self.kind
    }

    pub fn line_type(&self) -> LineType {
        self.kind.line_type()
    }

    pub fn layout(&self) -> &LineLayout {
        &self.layout
    }

    pub fn leading_whitespace(&self) -> Span {
        self.layout.leading
    }

    /// True when the line has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub fn comment(&self) -> Option<&Token> {
        self.comment.as_ref()
    }

    /// Label text: the `name:` definition of a label line, or the colon-less
    /// word in front of a mnemonic.
    pub fn label(&self) -> Option<&Token> {
        match &self.kind {
            LineKind::Label { label, .. } => Some(label),
            LineKind::Instruction { label, .. } => label.as_ref(),
            _ => None,
        }
    }

    pub fn instruction(&self) -> Option<&Instruction> {
        match &self.kind {
            LineKind::Instruction { instruction, .. } => Some(instruction),
            LineKind::Label { instruction, .. } => instruction.as_ref(),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> Option<&Token> {
        self.instruction().map(|i| &i.mnemonic)
    }

    pub fn data(&self) -> Option<&Token> {
        self.instruction().and_then(|i| i.data.as_ref())
    }

    pub fn is_jump(&self) -> bool {
        self.instruction().is_some_and(|i| i.jump)
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match &self.kind {
            LineKind::Assignment(assignment) => Some(assignment),
            _ => None,
        }
    }

    pub fn variable(&self) -> Option<&Token> {
        self.assignment().map(|a| &a.variable)
    }

    pub fn operator(&self) -> Option<&Token> {
        self.assignment().map(|a| &a.operator)
    }

    pub fn value(&self) -> Option<&Token> {
        self.assignment().map(|a| &a.value)
    }

    /// Column of the opening `'` when `character` is inside a character
    /// literal; `None` otherwise.
    pub fn find_opening_quote(&self, character: u32) -> Option<u32> {
        scan::find_opening_quote(&self.raw, character)
    }

    /// Register names found in the operand text, with absolute spans.
    pub fn registers(&self) -> Vec<Token> {
        self.data()
            .map(|data| scan::registers_in(&data.text, data.span.start))
            .unwrap_or_default()
    }
}

/// Classifies one raw source line.
///
/// `line` is the zero-based line number used for every span.
pub fn classify(raw: &str, line: u32) -> ClassifiedLine {
    let Some(lead) = raw.find(|c: char| !c.is_whitespace()) else {
        return ClassifiedLine::assemble(raw, line, 0, LineKind::Other, None);
    };

    let trimmed = raw.trim();
    if trimmed.starts_with(scan::COMMENT_MARKER) {
        let comment = Token::from_bytes(raw, line, lead, lead + trimmed.len());
        return ClassifiedLine::assemble(raw, line, lead, LineKind::Comment, Some(comment));
    }

    let comment_at = scan::comment_start(raw);
    let code = comment_at.map_or(raw, |at| &raw[..at]);
    let comment = comment_at
        .map(|at| Token::from_bytes(raw, line, at, at + raw[at..].trim_end().len()));

    if let Some(assignment) = parse_assignment(code, line) {
        return ClassifiedLine::assemble(
            raw,
            line,
            lead,
            LineKind::Assignment(assignment),
            comment,
        );
    }

    // `statement` starts at byte `lead` of `raw`.
    let statement = code.trim();
    let found = find_instruction(raw, statement, lead, line);
    let mnemonic_at = found.as_ref().map(|(_, _, at)| *at);
    let colon_label = find_colon_label(raw, lead, line, comment_at, mnemonic_at);

    let kind = match (colon_label, found) {
        (Some(label), found) => LineKind::Label {
            label,
            instruction: found.map(|(_, instruction, _)| instruction),
        },
        (None, Some((label, instruction, _))) => LineKind::Instruction { label, instruction },
        (None, None) => LineKind::Other,
    };

    ClassifiedLine::assemble(raw, line, lead, kind, comment)
}

fn parse_assignment(code: &str, line: u32) -> Option<Assignment> {
    let caps = ASSIGNMENT_PATTERN.captures(code)?;
    let variable = caps.get(1)?.as_str().trim();
    let operator = caps.get(2)?.as_str();
    let value = caps.get(3)?.as_str().trim();
    let kind = operator.parse().ok()?;

    // Spans come from literal searches in the line so that they stay exact
    // whatever whitespace surrounds each part.
    let variable_start = code.find(variable)?;
    let variable_end = variable_start + variable.len();
    let operator_start = variable_end + code[variable_end..].find(operator)?;
    let operator_end = operator_start + operator.len();
    let value_start = operator_end + code[operator_end..].find(value)?;

    Some(Assignment {
        variable: Token::from_bytes(code, line, variable_start, variable_end),
        operator: Token::from_bytes(code, line, operator_start, operator_end),
        kind,
        value: Token::from_bytes(code, line, value_start, value_start + value.len()),
    })
}

/// Searches the comment-free statement for a mnemonic.
///
/// Returns the colon-less label in front of it, the instruction, and the
/// mnemonic's byte offset in `raw`.
fn find_instruction(
    raw: &str,
    statement: &str,
    lead: usize,
    line: u32,
) -> Option<(Option<Token>, Instruction, usize)> {
    let mut search = statement;
    let mut search_offset = 0;

    // A token at the left margin is a label, never a mnemonic.
    if lead == 0
        && let Some(first_space) = raw.find(char::is_whitespace)
    {
        search = statement.get(first_space..).unwrap_or("");
        search_offset = first_space;
    }

    if let Some(quote) = search.find([scan::QUOTE, '"']) {
        search = &search[..quote];
    }

    let found = mnemonics::find_mnemonic(search)?;
    let keyword_at = search_offset + found.start;
    let start = lead + keyword_at;
    let end = start + found.len();

    let label = (keyword_at > 0).then(|| {
        let text = statement[..keyword_at].trim_end();
        Token::from_bytes(raw, line, lead, lead + text.len())
    });

    let rest = &statement[keyword_at + found.len()..];
    let operands = rest.trim();
    let data = (!operands.is_empty()).then(|| {
        let data_start = end + rest.find(operands).unwrap_or(0);
        Token::from_bytes(raw, line, data_start, data_start + operands.len())
    });

    let instruction = Instruction {
        mnemonic: Token::from_bytes(raw, line, start, end),
        data,
        jump: found.is_jump(),
    };

    Some((label, instruction, start))
}

/// Finds a `name:` label: a colon after the leading whitespace, outside any
/// character literal, before the comment and before the mnemonic.
fn find_colon_label(
    raw: &str,
    lead: usize,
    line: u32,
    comment_at: Option<usize>,
    mnemonic_at: Option<usize>,
) -> Option<Token> {
    let colon = colon_outside_quotes(raw)?;
    if colon <= lead
        || comment_at.is_some_and(|at| colon >= at)
        || mnemonic_at.is_some_and(|at| colon >= at)
    {
        return None;
    }

    let text = raw[lead..colon].trim_end();
    Some(Token::from_bytes(raw, line, lead, lead + text.len()))
}

fn colon_outside_quotes(raw: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (offset, c) in raw.char_indices() {
        match c {
            scan::QUOTE => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(offset),
            _ => {}
        }
    }
    None
}

/// Column just after the last non-whitespace character before `column`,
/// never smaller than `floor`.
fn whitespace_run_start(raw: &str, column: u32, floor: u32) -> u32 {
    let mut start = floor;
    let mut current = 0u32;
    for c in raw.chars() {
        if current >= column {
            break;
        }
        current += c.len_utf16() as u32;
        if !c.is_whitespace() {
            start = start.max(current);
        }
    }
    start.min(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    fn assert_layout_ordered(line: &ClassifiedLine) {
        let spans = line.layout().spans();
        for span in spans {
            assert!(
                span.start <= span.end,
                "inverted span {span:?} in {:?}",
                line.raw()
            );
        }
        for pair in spans.windows(2) {
            assert!(
                pair[0].end <= pair[1].start,
                "overlapping spans {:?} / {:?} in {:?}",
                pair[0],
                pair[1],
                line.raw()
            );
        }
    }

    #[test]
    fn test_empty_line() {
        let line = classify("", 3);
        assert_eq!(line.line_type(), LineType::Other);
        assert!(line.is_blank());
        assert!(line.comment().is_none());
        assert!(line.layout().spans().iter().all(Span::is_empty));
        assert_eq!(line.span(), Span::empty(3, 0));
    }

    #[test]
    fn test_whitespace_only_line() {
        for raw in ["   ", "\t\t", " \t  "] {
            let line = classify(raw, 0);
            assert_eq!(line.line_type(), LineType::Other);
            assert!(line.is_blank());
            assert!(line.layout().spans().iter().all(Span::is_empty));
            assert_eq!(line.span().width(), raw.len() as u32);
        }
    }

    #[test]
    fn test_comment_only_line() {
        let line = classify("   ; hello world  ", 1);
        assert_eq!(line.line_type(), LineType::Comment);
        let comment = line.comment().unwrap();
        assert_eq!(comment.text, "; hello world");
        assert_eq!(comment.span, Span::on_line(1, 3, 16));
        assert_eq!(line.leading_whitespace(), Span::on_line(1, 0, 3));
        assert!(line.label().is_none());
        assert_layout_ordered(&line);
    }

    #[test]
    fn test_comment_at_margin() {
        let line = classify(";;;; banner", 0);
        assert_eq!(line.line_type(), LineType::Comment);
        assert_eq!(line.comment().unwrap().span, Span::on_line(0, 0, 11));
    }

    #[test]
    fn test_assignment_basic() {
        let line = classify("NAME EQU 5", 0);
        assert_eq!(line.line_type(), LineType::Assignment);
        let assignment = line.assignment().unwrap();
        assert_eq!(assignment.kind, AssignmentOperator::Equ);
        assert_eq!(assignment.variable.text, "NAME");
        assert_eq!(assignment.variable.span, Span::on_line(0, 0, 4));
        assert_eq!(assignment.operator.text, "EQU");
        assert_eq!(assignment.operator.span, Span::on_line(0, 5, 8));
        assert_eq!(assignment.value.text, "5");
        assert_eq!(assignment.value.span, Span::on_line(0, 9, 10));
        assert!(line.instruction().is_none());
    }

    #[test]
    fn test_assignment_irregular_whitespace() {
        let line = classify("  NAME   EQU\t 5", 2);
        let assignment = line.assignment().unwrap();
        assert_eq!(assignment.variable.span, Span::on_line(2, 2, 6));
        assert_eq!(assignment.operator.span, Span::on_line(2, 9, 12));
        assert_eq!(assignment.value.span, Span::on_line(2, 14, 15));
    }

    #[test]
    fn test_assignment_case_insensitive_operator() {
        let line = classify("count word 10", 0);
        let assignment = line.assignment().unwrap();
        assert_eq!(assignment.kind, AssignmentOperator::Word);
        assert_eq!(assignment.operator.text, "word");
        assert_eq!(line.value().unwrap().text, "10");
    }

    #[test]
    fn test_assignment_with_comment() {
        let line = classify("SIZE EQU 10 ; words", 0);
        assert_eq!(line.value().unwrap().span, Span::on_line(0, 9, 11));
        assert_eq!(line.comment().unwrap().text, "; words");
        assert_eq!(line.comment().unwrap().span, Span::on_line(0, 12, 19));
        assert_eq!(line.layout().comment_gap, Span::on_line(0, 11, 12));
    }

    #[test]
    fn test_assignment_string_with_semicolon() {
        let line = classify("MSG STR 'a;b', 0 ; text", 0);
        let assignment = line.assignment().unwrap();
        assert_eq!(assignment.kind, AssignmentOperator::Str);
        assert_eq!(assignment.value.text, "'a;b', 0");
        assert_eq!(line.comment().unwrap().text, "; text");
    }

    #[test]
    fn test_assignment_requires_whole_keyword() {
        // STRING is not the STR keyword.
        let line = classify("    MOV R1, STRING", 0);
        assert_eq!(line.line_type(), LineType::Instruction);
        // No whitespace after the keyword means no value part.
        assert_eq!(classify("X EQU", 0).line_type(), LineType::Other);
    }

    #[test]
    fn test_assignment_operators() {
        for (raw, kind) in [
            ("A EQU 1", AssignmentOperator::Equ),
            ("B WORD 2", AssignmentOperator::Word),
            ("C STR 'x'", AssignmentOperator::Str),
            ("D TAB 8", AssignmentOperator::Tab),
        ] {
            assert_eq!(classify(raw, 0).assignment().unwrap().kind, kind, "{raw}");
        }
    }

    #[test]
    fn test_label_instruction_comment() {
        let line = classify("LOOP: ADD R1, R2 ; add", 0);
        assert_eq!(line.line_type(), LineType::Label);
        assert_eq!(line.label().unwrap().text, "LOOP");
        assert_eq!(line.label().unwrap().span, Span::on_line(0, 0, 4));
        assert_eq!(line.mnemonic().unwrap().text, "ADD");
        assert_eq!(line.mnemonic().unwrap().span, Span::on_line(0, 6, 9));
        assert_eq!(line.data().unwrap().text, "R1, R2");
        assert_eq!(line.data().unwrap().span, Span::on_line(0, 10, 16));
        assert_eq!(line.comment().unwrap().text, "; add");
        assert_eq!(line.comment().unwrap().span, Span::on_line(0, 17, 22));
        assert!(!line.is_jump());

        let layout = line.layout();
        assert_eq!(layout.label_gap, Span::on_line(0, 5, 6));
        assert_eq!(layout.data_gap, Span::on_line(0, 9, 10));
        assert_eq!(layout.comment_gap, Span::on_line(0, 16, 17));
        assert_layout_ordered(&line);
    }

    #[test]
    fn test_label_with_jump() {
        let line = classify("START: JMP LOOP", 4);
        assert_eq!(line.line_type(), LineType::Label);
        assert_eq!(line.label().unwrap().text, "START");
        assert_eq!(line.mnemonic().unwrap().text, "JMP");
        assert_eq!(line.mnemonic().unwrap().span, Span::on_line(4, 7, 10));
        assert_eq!(line.data().unwrap().text, "LOOP");
        assert!(line.is_jump());
    }

    #[test]
    fn test_label_only_line() {
        let line = classify("END:", 0);
        assert_eq!(line.line_type(), LineType::Label);
        assert_eq!(line.label().unwrap().span, Span::on_line(0, 0, 3));
        assert!(line.instruction().is_none());

        let line = classify("  END:  ; done", 0);
        assert_eq!(line.label().unwrap().text, "END");
        assert_eq!(line.label().unwrap().span, Span::on_line(0, 2, 5));
        assert_eq!(line.layout().comment_gap, Span::on_line(0, 6, 8));
        assert_layout_ordered(&line);
    }

    #[test]
    fn test_label_trailing_space_before_colon() {
        let line = classify("LOOP : NOP", 0);
        assert_eq!(line.label().unwrap().text, "LOOP");
        assert_eq!(line.label().unwrap().span, Span::on_line(0, 0, 4));
    }

    #[test]
    fn test_indented_instruction() {
        let line = classify("    NOP", 0);
        assert_eq!(line.line_type(), LineType::Instruction);
        assert!(line.label().is_none());
        assert!(line.data().is_none());
        assert_eq!(line.mnemonic().unwrap().span, Span::on_line(0, 4, 7));
        assert_layout_ordered(&line);
    }

    #[test]
    fn test_colonless_label_at_margin() {
        let line = classify("LOOP ADD R1, R2", 0);
        assert_eq!(line.line_type(), LineType::Instruction);
        assert_eq!(line.label().unwrap().text, "LOOP");
        assert_eq!(line.mnemonic().unwrap().span, Span::on_line(0, 5, 8));
    }

    #[test]
    fn test_margin_token_is_never_a_mnemonic() {
        // The first token at column 0 is taken as a label, so a mnemonic
        // written there is not recognized.
        assert_eq!(classify("ADD R1, R2", 0).line_type(), LineType::Other);
        assert_eq!(classify("ORIG 8000h", 0).line_type(), LineType::Other);
        assert_eq!(classify(" ADD R1, R2", 0).line_type(), LineType::Instruction);
        // A lone mnemonic has no following token to search, so it matches.
        assert_eq!(classify("NOP", 0).line_type(), LineType::Instruction);
    }

    #[test]
    fn test_mnemonic_shaped_label_ambiguity() {
        // At the margin the label is skipped and the second NOP is the
        // mnemonic.
        let line = classify("NOP: NOP", 0);
        assert_eq!(line.label().unwrap().text, "NOP");
        assert_eq!(line.mnemonic().unwrap().span, Span::on_line(0, 5, 8));

        // One column to the right nothing is skipped: the first NOP becomes
        // the mnemonic and the second one its operand.
        let line = classify(" NOP NOP", 0);
        assert_eq!(line.line_type(), LineType::Instruction);
        assert!(line.label().is_none());
        assert_eq!(line.mnemonic().unwrap().span, Span::on_line(0, 1, 4));
        assert_eq!(line.data().unwrap().text, "NOP");
    }

    #[test]
    fn test_condition_suffix_is_part_of_mnemonic() {
        let line = classify("    BR.Z LOOP", 0);
        let instruction = line.instruction().unwrap();
        assert_eq!(instruction.mnemonic.text, "BR.Z");
        assert_eq!(instruction.base_mnemonic(), "BR");
        assert!(instruction.jump);
    }

    #[test]
    fn test_quoted_literal() {
        let line = classify("    MVI R1, 'A'", 0);
        assert_eq!(line.mnemonic().unwrap().text, "MVI");
        assert_eq!(line.data().unwrap().text, "R1, 'A'");
        assert_eq!(line.find_opening_quote(13), Some(12));
        assert_eq!(line.find_opening_quote(8), None);
    }

    #[test]
    fn test_quoted_semicolon_is_not_a_comment() {
        let line = classify("    MVI R1, ';' ; semicolon", 0);
        assert_eq!(line.data().unwrap().text, "R1, ';'");
        assert_eq!(line.comment().unwrap().text, "; semicolon");
        assert_eq!(line.comment().unwrap().span.start.character, 16);
    }

    #[test]
    fn test_mnemonic_inside_quotes_is_ignored() {
        assert_eq!(classify("    DB ' ADD '", 0).line_type(), LineType::Other);
        let line = classify("    MOV R1, ' JMP '", 0);
        assert_eq!(line.mnemonic().unwrap().text, "MOV");
        assert!(!line.is_jump());
    }

    #[test]
    fn test_colon_inside_quotes_is_not_a_label() {
        let line = classify("    MVI R1, ':'", 0);
        assert_eq!(line.line_type(), LineType::Instruction);
        assert_layout_ordered(&line);
    }

    #[test]
    fn test_colon_after_mnemonic_is_not_a_label() {
        let line = classify("    JMP X:Y", 0);
        assert_eq!(line.line_type(), LineType::Instruction);
        assert_layout_ordered(&line);
    }

    #[test]
    fn test_colon_inside_comment_is_not_a_label() {
        let line = classify("    NOP ; see: above", 0);
        assert_eq!(line.line_type(), LineType::Instruction);
    }

    #[test]
    fn test_registers_from_data() {
        let line = classify("    ADD R1, SP, R11", 5);
        let regs = line.registers();
        let names: Vec<_> = regs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(names, ["R1", "SP", "R11"]);
        assert_eq!(regs[0].span, Span::on_line(5, 8, 10));
        assert_eq!(regs[1].span, Span::on_line(5, 12, 14));
        assert_eq!(regs[2].span, Span::on_line(5, 16, 19));
    }

    #[test]
    fn test_registers_without_data() {
        assert!(classify("    NOP", 0).registers().is_empty());
        assert!(classify("R1 EQU 3", 0).registers().is_empty());
    }

    #[test]
    fn test_utf16_columns() {
        let line = classify("    MVI R1, 'é' ; ünïcode", 0);
        assert_eq!(line.data().unwrap().span, Span::on_line(0, 8, 15));
        assert_eq!(line.comment().unwrap().span.start.character, 16);
        assert_eq!(line.comment().unwrap().text, "; ünïcode");
    }

    #[test]
    fn test_malformed_input_degrades() {
        for raw in ["''''';;;", "'", ":", "::::", "  'unterminated ; x", "\"\"\"", "a:b:c"] {
            let line = classify(raw, 0);
            assert_layout_ordered(&line);
        }
        assert_eq!(classify("''''';;;", 0).line_type(), LineType::Other);
        assert_eq!(classify(":", 0).line_type(), LineType::Other);
    }

    #[test]
    fn test_layout_ordered_for_samples() {
        for raw in [
            "LOOP: ADD R1, R2 ; add",
            "  X EQU 5 ; five",
            "FOO BAR BAZ",
            "        MOV R1, M[SP+1]",
            "L1:MOV R1, R2",
            "VERY_LONG_LABEL_NAME:    CALL   SUBROUTINE   ;  call it",
            "\tRTI\t; return",
        ] {
            assert_layout_ordered(&classify(raw, 9));
        }
    }

    #[test]
    fn test_idempotent() {
        for raw in ["LOOP: ADD R1, R2 ; add", "X EQU 1", "", "; c", "    MVI R1, 'A'"] {
            assert_eq!(classify(raw, 7), classify(raw, 7));
        }
    }

    #[test]
    fn test_whole_line_span() {
        let line = classify("  NOP  ", 2);
        assert_eq!(line.span(), Span::on_line(2, 0, 7));
        assert_eq!(line.line_number(), 2);
        assert_eq!(line.raw(), "  NOP  ");
        assert!(line.span().contains(Position::new(2, 6)));
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("equ".parse::<AssignmentOperator>().unwrap(), AssignmentOperator::Equ);
        assert_eq!("Tab".parse::<AssignmentOperator>().unwrap(), AssignmentOperator::Tab);
        assert!("DEFW".parse::<AssignmentOperator>().is_err());
        assert_eq!(AssignmentOperator::Str.to_string(), "STR");
    }
}
