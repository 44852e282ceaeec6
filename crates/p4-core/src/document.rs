//! Document-level index: classified lines plus label and assignment tables.

use crate::cancel::CancellationSignal;
use crate::line::{ClassifiedLine, LineKind, classify};
use std::collections::BTreeMap;
use std::ops::{Range, RangeInclusive};

/// Random access to the lines of a document.
pub trait LineSource {
    fn line_count(&self) -> usize;

    /// Text of line `index` without its line terminator.
    fn line(&self, index: usize) -> Option<&str>;
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

impl<S: AsRef<str>> LineSource for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

/// Owned document text with pre-computed line starts.
///
/// Lines end at `\n`, `\r\n` or a bare `\r`; the terminator is not part of
/// the line. A document ending with a line break has a final empty line, the
/// way editors count lines.
///
/// # Examples
///
/// ```
/// use p4_core::document::{LineSource, SourceText};
///
/// let text = SourceText::new("NOP\r\nRTI\n");
/// assert_eq!(text.line_count(), 3);
/// assert_eq!(text.line(1), Some("RTI"));
/// assert_eq!(text.line(2), Some(""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    lines: Vec<Range<usize>>,
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let bytes = text.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    lines.push(start..i);
                    start = i + 1;
                }
                b'\r' => {
                    lines.push(start..i);
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }
        lines.push(start..bytes.len());
        Self { text, lines }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl LineSource for SourceText {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|range| &self.text[range.clone()])
    }
}

/// Classified lines of a document with name lookup tables.
///
/// When a name is defined more than once, the tables point at the last
/// definition in scan order.
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    lines: Vec<ClassifiedLine>,
    labels: BTreeMap<String, usize>,
    assignments: BTreeMap<String, usize>,
    cancelled: bool,
}

impl DocumentIndex {
    /// Classifies the lines of `source` in `range` (inclusive, default: the
    /// whole document) and records label and assignment definitions.
    ///
    /// The range end is clamped to the last line. `cancel` is polled before
    /// each line; once it fires the scan stops and the lines processed so far
    /// are returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use p4_core::document::DocumentIndex;
    ///
    /// let source = ["COUNT EQU 3", "LOOP: DEC R1", "      BR.NZ LOOP"];
    /// let index = DocumentIndex::build(&source[..], None, None);
    /// assert_eq!(index.lines().len(), 3);
    /// assert_eq!(index.label("LOOP").unwrap().line_number(), 1);
    /// assert_eq!(index.assignment("COUNT").unwrap().line_number(), 0);
    /// ```
    pub fn build<S>(
        source: &S,
        range: Option<RangeInclusive<u32>>,
        cancel: Option<&dyn CancellationSignal>,
    ) -> Self
    where
        S: LineSource + ?Sized,
    {
        let mut index = Self::default();
        let count = source.line_count();
        if count == 0 {
            return index;
        }

        let last = u32::try_from(count - 1).unwrap_or(u32::MAX);
        let (start, end) = range.map_or((0, last), |r| (*r.start(), (*r.end()).min(last)));

        for line_number in start..=end {
            if cancel.is_some_and(|signal| signal.is_cancelled()) {
                index.cancelled = true;
                break;
            }
            let Some(raw) = source.line(line_number as usize) else {
                break;
            };
            index.push(classify(raw, line_number));
        }

        tracing::debug!(
            "indexed {} lines ({} labels, {} assignments, cancelled: {})",
            index.lines.len(),
            index.labels.len(),
            index.assignments.len(),
            index.cancelled
        );

        index
    }

    fn push(&mut self, line: ClassifiedLine) {
        let position = self.lines.len();
        match line.kind() {
            LineKind::Label { label, .. } => {
                self.labels.insert(label.text.clone(), position);
            }
            LineKind::Assignment(assignment) => {
                self.assignments
                    .insert(assignment.variable.text.clone(), position);
            }
            _ => {}
        }
        self.lines.push(line);
    }

    /// Classified lines in document order.
    pub fn lines(&self) -> &[ClassifiedLine] {
        &self.lines
    }

    /// Looks up a classified line by its line number.
    pub fn line(&self, line_number: u32) -> Option<&ClassifiedLine> {
        let first = self.lines.first()?.line_number();
        let offset = line_number.checked_sub(first)?;
        self.lines.get(offset as usize)
    }

    /// Line defining the label `name`.
    pub fn label(&self, name: &str) -> Option<&ClassifiedLine> {
        self.labels.get(name).map(|&i| &self.lines[i])
    }

    /// Line assigning the variable `name`.
    pub fn assignment(&self, name: &str) -> Option<&ClassifiedLine> {
        self.assignments.get(name).map(|&i| &self.lines[i])
    }

    /// Label definitions ordered by name.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &ClassifiedLine)> {
        self.labels
            .iter()
            .map(|(name, &i)| (name.as_str(), &self.lines[i]))
    }

    /// Assignment definitions ordered by name.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &ClassifiedLine)> {
        self.assignments
            .iter()
            .map(|(name, &i)| (name.as_str(), &self.lines[i]))
    }

    /// True when the scan stopped early because of cancellation.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Free-function form of [`DocumentIndex::build`].
pub fn build_index<S>(
    source: &S,
    range: Option<RangeInclusive<u32>>,
    cancel: Option<&dyn CancellationSignal>,
) -> DocumentIndex
where
    S: LineSource + ?Sized,
{
    DocumentIndex::build(source, range, cancel)
}
