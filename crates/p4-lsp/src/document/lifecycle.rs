//! Document open/change/close handling and documentation loading.

use super::state::{DocumentState, ServerState};
use crate::config::DocumentationConfig;
use crate::error::{LspError, Result};
use p4_core::Catalog;
use p4_core::catalog::{INSTRUCTIONS_FILE, REGISTERS_FILE};
use tower_lsp_server::ls_types::Uri;

/// Language identifier clients send for P4 assembly.
pub const LANGUAGE_ID: &str = "p4";

/// File extension of P4 assembly sources.
pub const FILE_EXTENSION: &str = "as";

/// True when the URI names a `.as` file.
///
/// # Examples
///
/// ```
/// use p4_lsp::document::is_p4_document;
/// use tower_lsp_server::ls_types::Uri;
///
/// let uri = Uri::from_file_path("/src/main.as").unwrap();
/// assert!(is_p4_document(&uri));
/// ```
pub fn is_p4_document(uri: &Uri) -> bool {
    let path = uri.path();
    path.as_str()
        .split('/')
        .next_back()
        .and_then(|filename| filename.rsplit_once('.'))
        .is_some_and(|(_, extension)| extension.eq_ignore_ascii_case(FILE_EXTENSION))
}

/// Accepts documents opened as `p4` or stored in a `.as` file.
pub fn ensure_supported(uri: &Uri, language_id: &str) -> Result<()> {
    if language_id == LANGUAGE_ID || is_p4_document(uri) {
        Ok(())
    } else {
        Err(LspError::UnsupportedDocument(uri.as_str().to_string()))
    }
}

/// Stores a newly opened document.
pub fn handle_document_open(
    state: &ServerState,
    uri: Uri,
    language_id: &str,
    text: String,
    version: i32,
) -> Result<()> {
    ensure_supported(&uri, language_id)?;

    tracing::info!("document opened: {:?} (version {})", uri, version);
    state.update_document(uri, DocumentState::new(text, version));
    Ok(())
}

/// Replaces the text of an open document.
///
/// Changes older than the stored version are dropped. Changes for documents
/// that were never opened, or were opened in another language, are ignored.
pub fn handle_document_change(state: &ServerState, uri: Uri, text: String, version: i32) {
    let stored = match state.get_document(&uri) {
        Some(doc) => doc.version,
        None => {
            tracing::debug!("change for unknown document: {:?}", uri);
            return;
        }
    };

    if version < stored {
        tracing::warn!(
            "ignoring stale change for {:?}: version {} < {}",
            uri,
            version,
            stored
        );
        return;
    }

    tracing::debug!("document changed: {:?} (version {})", uri, version);
    state.update_document(uri, DocumentState::new(text, version));
}

/// Forgets a closed document.
pub fn handle_document_close(state: &ServerState, uri: &Uri) {
    if state.remove_document(uri).is_some() {
        tracing::info!("document closed: {:?}", uri);
    }
}

/// Loads the documentation catalog selected by the configuration.
///
/// # Errors
///
/// Fails when the configured directory lacks a table or a table is
/// malformed. Without a configured path the bundled tables are used and this
/// never fails.
pub async fn load_catalog(config: &DocumentationConfig) -> Result<Catalog> {
    let Some(dir) = &config.path else {
        return Ok(Catalog::builtin());
    };

    let instructions = tokio::fs::read_to_string(dir.join(INSTRUCTIONS_FILE)).await?;
    let registers = tokio::fs::read_to_string(dir.join(REGISTERS_FILE)).await?;
    let catalog = Catalog::parse(&instructions, &registers)?;

    tracing::info!(
        "loaded documentation from {}: {} instructions, {} registers",
        dir.display(),
        catalog.instruction_count(),
        catalog.register_count()
    );
    Ok(catalog)
}
