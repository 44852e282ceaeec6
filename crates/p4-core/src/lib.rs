//! Core analysis for P4 assembly tooling.
//!
//! Editor features for P4 source (hover, go-to-definition, outline,
//! formatting) all start from the same two steps:
//!
//! - [`line::classify`] turns one physical line into a [`ClassifiedLine`]
//!   with column-exact spans for its label, mnemonic, operands, assignment
//!   parts and comment.
//! - [`DocumentIndex::build`] classifies a range of lines and records where
//!   each label and assignment is defined. The scan can be cancelled between
//!   lines.
//!
//! Neither step fails: text that does not parse degrades to
//! [`LineKind::Other`]. Columns are UTF-16 code units, matching LSP.
//!
//! # Examples
//!
//! ```
//! use p4_core::{DocumentIndex, SourceText};
//!
//! let text = SourceText::new("COUNT EQU 3\nLOOP:   DEC R1\n        BR.NZ LOOP\n");
//! let index = DocumentIndex::build(&text, None, None);
//!
//! let looping = index.label("LOOP").unwrap();
//! assert_eq!(looping.mnemonic().unwrap().text, "DEC");
//! assert!(index.line(2).unwrap().is_jump());
//! ```

pub mod cancel;
pub mod catalog;
pub mod constants;
pub mod document;
pub mod error;
pub mod line;
pub mod mnemonics;
pub mod scan;
pub mod span;

pub use cancel::{CancellationSignal, CancellationToken};
pub use catalog::{Catalog, InstructionDoc, RegisterDoc};
pub use document::{DocumentIndex, LineSource, SourceText, build_index};
pub use error::{P4Error, Result};
pub use line::{
    Assignment, AssignmentOperator, ClassifiedLine, Instruction, LineKind, LineLayout, LineType,
    classify,
};
pub use span::{Position, Span, Token};
