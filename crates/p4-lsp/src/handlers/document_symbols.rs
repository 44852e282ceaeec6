//! Document outline: assigned names and labels.

use crate::document::ServerState;
use p4_core::{AssignmentOperator, ClassifiedLine, DocumentIndex};
use std::sync::Arc;
use tower_lsp_server::ls_types::{
    DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse, Range, SymbolKind,
};

/// Symbols for every assignment and label, ordered by line.
///
/// `EQU` names are constants, `WORD` names variables, and `STR`/`TAB` names
/// arrays; each selects its value. Labels are functions and select their
/// name. Every symbol spans its whole line.
pub fn document_symbols(index: &DocumentIndex) -> Vec<DocumentSymbol> {
    let assignments = index.assignments().filter_map(|(name, line)| {
        let assignment = line.assignment()?;
        let kind = match assignment.kind {
            AssignmentOperator::Equ => SymbolKind::CONSTANT,
            AssignmentOperator::Word => SymbolKind::VARIABLE,
            AssignmentOperator::Str | AssignmentOperator::Tab => SymbolKind::ARRAY,
        };
        Some(symbol(
            name,
            Some(assignment.kind.keyword()),
            kind,
            line,
            assignment.value.span.into(),
        ))
    });

    let labels = index.labels().filter_map(|(name, line)| {
        let label = line.label()?;
        Some(symbol(
            name,
            None,
            SymbolKind::FUNCTION,
            line,
            label.span.into(),
        ))
    });

    let mut symbols: Vec<_> = assignments.chain(labels).collect();
    symbols.sort_by_key(|symbol| symbol.range.start.line);
    symbols
}

#[allow(deprecated)]
fn symbol(
    name: &str,
    detail: Option<&str>,
    kind: SymbolKind,
    line: &ClassifiedLine,
    selection_range: Range,
) -> DocumentSymbol {
    DocumentSymbol {
        name: name.to_string(),
        detail: detail.map(str::to_string),
        kind,
        tags: None,
        deprecated: None,
        range: line.span().into(),
        selection_range,
        children: None,
    }
}

/// Handles `textDocument/documentSymbol` requests.
pub async fn handle_document_symbols(
    state: Arc<ServerState>,
    params: DocumentSymbolParams,
) -> Option<DocumentSymbolResponse> {
    let uri = &params.text_document.uri;

    let Some(doc) = state.get_document_clone(uri) else {
        tracing::warn!("Document not found for symbols: {:?}", uri);
        return None;
    };

    let index = doc.index();
    if index.was_cancelled() {
        tracing::debug!("symbols skipped, document superseded: {:?}", uri);
        return None;
    }

    Some(DocumentSymbolResponse::Nested(document_symbols(&index)))
}
