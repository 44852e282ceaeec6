//! Whole-document formatting to a fixed instruction column.
//!
//! Labels start at column 0 and everything else starts at the left margin:
//!
//! ```text
//! LOOP:           DEC     R1
//!                 BR.NZ   LOOP
//! ```

use crate::config::P4Config;
use crate::document::ServerState;
use p4_core::{ClassifiedLine, DocumentIndex, Span};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp_server::ls_types::{DocumentFormattingParams, TextEdit};

/// Edits that align `index` to `margin`.
///
/// Empty lines are left alone and whitespace-only lines are cleared. A line
/// with a label loses its indentation; when an instruction follows, the gap
/// before the mnemonic is resized so the mnemonic starts at `margin`, or
/// becomes a line break plus `margin` spaces when the label reaches the
/// margin. Any other line is indented by exactly `margin` spaces. Edits that
/// would not change the text are omitted.
pub fn format_edits(index: &DocumentIndex, margin: u32) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    for line in index.lines() {
        format_line(line, margin, &mut edits);
    }
    edits
}

fn format_line(line: &ClassifiedLine, margin: u32, edits: &mut Vec<TextEdit>) {
    let raw = line.raw();
    if raw.is_empty() {
        return;
    }
    if line.is_blank() {
        edits.push(TextEdit::new(line.span().into(), String::new()));
        return;
    }

    let indent = " ".repeat(margin as usize);
    let layout = line.layout();

    if line.label().is_none() {
        replace(raw, layout.leading, indent, edits);
        return;
    }

    if line.instruction().is_some() {
        let gap = layout.label_gap;
        let column = gap.start.character - layout.leading.width();
        let spacing = if column < margin {
            " ".repeat((margin - column) as usize)
        } else {
            format!("\n{}", indent)
        };
        replace(raw, gap, spacing, edits);
    }

    replace(raw, layout.leading, String::new(), edits);
}

fn replace(raw: &str, span: Span, text: String, edits: &mut Vec<TextEdit>) {
    if span.slice(raw) != text {
        edits.push(TextEdit::new(span.into(), text));
    }
}

/// Handles `textDocument/formatting` requests.
///
/// Returns `None` when formatting is disabled in the configuration.
pub async fn handle_formatting(
    state: Arc<ServerState>,
    params: DocumentFormattingParams,
    config: Arc<RwLock<P4Config>>,
) -> Option<Vec<TextEdit>> {
    let uri = &params.text_document.uri;

    let formatting = config.read().await.formatting.clone();
    if !formatting.enabled {
        tracing::debug!("formatting disabled, ignoring request for {:?}", uri);
        return None;
    }

    let Some(doc) = state.get_document_clone(uri) else {
        tracing::warn!("Document not found for formatting: {:?}", uri);
        return None;
    };

    let index = doc.index();
    if index.was_cancelled() {
        tracing::debug!("formatting skipped, document superseded: {:?}", uri);
        return None;
    }

    let edits = format_edits(&index, formatting.left_margin);
    tracing::debug!("{} formatting edits for {:?}", edits.len(), uri);
    Some(edits)
}
