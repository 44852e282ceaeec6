//! Go-to-definition for labels and assigned names.

use crate::document::ServerState;
use p4_core::line::LineType;
use p4_core::{DocumentIndex, Position, scan};
use std::sync::Arc;
use tower_lsp_server::ls_types::{GotoDefinitionParams, GotoDefinitionResponse, Location, Range};

/// Finds where the word under `position` is defined.
///
/// Labels resolve to the first mnemonic on the label's line, or to the end
/// of the label when the line has no instruction. Assigned names resolve to
/// the start of their value. Words inside a character literal, and a
/// definition under the cursor itself, resolve to nothing.
///
/// # Examples
///
/// ```
/// use p4_core::{DocumentIndex, Position};
/// use p4_lsp::handlers::definition::find_definition;
///
/// let source = ["LOOP: DEC R1", "      BR.NZ LOOP"];
/// let index = DocumentIndex::build(&source[..], None, None);
/// assert_eq!(
///     find_definition(&index, Position::new(1, 14)),
///     Some(Position::new(0, 6))
/// );
/// ```
pub fn find_definition(index: &DocumentIndex, position: Position) -> Option<Position> {
    let line = index.line(position.line)?;
    if line.find_opening_quote(position.character).is_some() {
        return None;
    }

    let word = scan::word_at(line.raw(), position.line, position.character)?;
    let name = word.text.trim();

    let on_own_label = line.line_type() == LineType::Label
        && line.label().is_some_and(|label| label.span.touches(position));
    if !on_own_label && let Some(definition) = index.label(name) {
        return definition
            .mnemonic()
            .map(|mnemonic| mnemonic.span.start)
            .or_else(|| definition.label().map(|label| label.span.end));
    }

    let on_own_variable = line.line_type() == LineType::Assignment
        && line.variable().is_some_and(|variable| variable.span.touches(position));
    if !on_own_variable && let Some(definition) = index.assignment(name) {
        return definition.value().map(|value| value.span.start);
    }

    None
}

/// Handles `textDocument/definition` requests.
pub async fn handle_definition(
    state: Arc<ServerState>,
    params: GotoDefinitionParams,
) -> Option<GotoDefinitionResponse> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let Some(doc) = state.get_document_clone(&uri) else {
        tracing::warn!("Document not found for definition: {:?}", uri);
        return None;
    };

    let index = doc.index();
    if index.was_cancelled() {
        tracing::debug!("definition skipped, document superseded: {:?}", uri);
        return None;
    }

    let target: tower_lsp_server::ls_types::Position =
        find_definition(&index, position.into())?.into();
    Some(GotoDefinitionResponse::Scalar(Location::new(
        uri,
        Range::new(target, target),
    )))
}
