//! Hover content: definitions, instruction and register documentation, and
//! constant values.

use super::definition::find_definition;
use crate::config::{HoverConfig, P4Config};
use crate::document::ServerState;
use p4_core::constants::constant_values;
use p4_core::{
    Catalog, ClassifiedLine, DocumentIndex, InstructionDoc, Position, RegisterDoc, Span,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp_server::ls_types::{Hover, HoverContents, HoverParams, MarkupContent, MarkupKind};

const WORD_RANGE: i64 = 0x1_0000;

/// Computes hover content for `position`.
///
/// Tried in order: the definition of the word under the cursor, the
/// instruction or directive under the cursor, a register in the operands,
/// and finally the value of a numeric or character constant.
pub fn hover_at(
    index: &DocumentIndex,
    position: Position,
    catalog: &Catalog,
    config: &HoverConfig,
) -> Option<Hover> {
    if config.show_definitions
        && let Some(target) = find_definition(index, position)
        && let Some(definition) = index.line(target.line)
    {
        return Some(markdown_hover(
            render_definition(definition.raw(), &config.jump_hint_text),
            None,
        ));
    }

    let line = index.line(position.line)?;

    if let Some((keyword, span)) = keyword_at(line, position)
        && let Some(doc) = catalog.instruction(keyword)
    {
        return Some(markdown_hover(render_instruction(doc), Some(span)));
    }

    if let Some(data) = line.data()
        && data.span.touches(position)
    {
        let register = line
            .registers()
            .into_iter()
            .filter(|token| token.span.touches(position))
            .find_map(|token| catalog.register(&token.text).map(|doc| (doc, token.span)));
        if let Some((doc, span)) = register {
            return Some(markdown_hover(render_register(doc), Some(span)));
        }
        return constant_hover(line, position);
    }

    if line.value().is_some_and(|value| value.span.touches(position)) {
        return constant_hover(line, position);
    }

    None
}

/// Mnemonic (condition suffix stripped) or assignment operator under the
/// cursor.
fn keyword_at(line: &ClassifiedLine, position: Position) -> Option<(&str, Span)> {
    if let Some(instruction) = line.instruction()
        && instruction.mnemonic.span.touches(position)
    {
        return Some((instruction.base_mnemonic(), instruction.mnemonic.span));
    }

    line.operator()
        .filter(|operator| operator.span.touches(position))
        .map(|operator| (operator.text.as_str(), operator.span))
}

fn constant_hover(line: &ClassifiedLine, position: Position) -> Option<Hover> {
    let values = constant_values(line.raw(), position.character);
    if values.is_empty() {
        return None;
    }
    Some(markdown_hover(render_constants(&values), None))
}

fn markdown_hover(value: String, span: Option<Span>) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: span.map(Into::into),
    }
}

/// Code block with the defining line, followed by the jump hint.
pub fn render_definition(line: &str, jump_hint: &str) -> String {
    let mut markdown = format!("```p4\n{}\n```", line);
    if !jump_hint.is_empty() {
        markdown.push_str("\n\n");
        markdown.push_str(jump_hint);
    }
    markdown
}

pub fn render_instruction(doc: &InstructionDoc) -> String {
    let mut markdown = format!("**{}**", doc.name);
    if doc.pseudo {
        markdown.push_str(" (pseudo-instruction)");
    }
    markdown.push_str(&format!(": *{}*", doc.format));

    if !doc.flags.is_empty() {
        markdown.push_str(&format!("\n\n**Flags**: {}", doc.flags));
    }

    markdown.push_str("\n\n");
    markdown.push_str(&doc.description);
    markdown
}

pub fn render_register(doc: &RegisterDoc) -> String {
    let mut markdown = format!("Register **{}**", doc.name);
    if !doc.aliases.is_empty() {
        markdown.push_str(&format!(" ({})", doc.aliases.join(", ")));
    }
    markdown.push_str("\n\n");
    markdown.push_str(&doc.description);
    markdown
}

/// One paragraph per value: decimal, 16-bit hexadecimal, printable
/// character, and binary.
///
/// # Examples
///
/// ```
/// use p4_lsp::handlers::hover::render_constants;
///
/// assert_eq!(
///     render_constants(&[65]),
///     "**Dec**: 65 | **Hex**: 0041h | **Char**: A | **Bin**: 1000001b"
/// );
/// ```
pub fn render_constants(values: &[i64]) -> String {
    values
        .iter()
        .map(|&value| {
            let unsigned = value.rem_euclid(WORD_RANGE);
            let mut line = format!("**Dec**: {} | **Hex**: {:04X}h", value, unsigned);
            if let Some(c) = printable_char(value) {
                line.push_str(&format!(" | **Char**: {}", c));
            }
            line.push_str(&format!(" | **Bin**: {:b}b", unsigned));
            line
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn printable_char(value: i64) -> Option<char> {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .filter(|c| !c.is_control())
}

/// Handles `textDocument/hover` requests.
pub async fn handle_hover(
    state: Arc<ServerState>,
    params: HoverParams,
    config: Arc<RwLock<P4Config>>,
) -> Option<Hover> {
    let uri = &params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let Some(doc) = state.get_document_clone(uri) else {
        tracing::warn!("Document not found for hover: {:?}", uri);
        return None;
    };

    let catalog = state.catalog().await;
    let hover_config = config.read().await.hover.clone();

    let index = doc.index();
    if index.was_cancelled() {
        tracing::debug!("hover skipped, document superseded: {:?}", uri);
        return None;
    }

    hover_at(&index, position.into(), &catalog, &hover_config)
}
