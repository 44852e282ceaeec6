//! LSP protocol handlers.
//!
//! Each handler clones the document state out of [`ServerState`], builds a
//! fresh index, and computes its answer from that index alone:
//!
//! - [`hover`]: definitions, instruction/register documentation, constants
//! - [`definition`]: go-to-definition for labels and assigned names
//! - [`document_symbols`]: outline of assignments and labels
//! - [`formatting`]: alignment to the configured left margin
//!
//! Handlers never fail a request. A missing document or a superseded scan
//! yields an empty answer and a log entry.
//!
//! [`ServerState`]: crate::document::ServerState

pub mod definition;
pub mod document_symbols;
pub mod formatting;
pub mod hover;
