use p4_core::P4Error;
use thiserror::Error;

/// Error types for the p4-lsp server.
///
/// Request handlers never surface these to the client; they log the error
/// and answer with an empty result. Errors matter on the setup paths:
/// loading documentation tables and reading configuration.
///
/// # Examples
///
/// ```
/// use p4_lsp::error::{LspError, Result};
///
/// fn require_assembly(path: &str) -> Result<()> {
///     if !path.ends_with(".as") {
///         return Err(LspError::UnsupportedDocument(path.into()));
///     }
///     Ok(())
/// }
///
/// assert!(require_assembly("main.as").is_ok());
/// assert!(require_assembly("notes.txt").is_err());
/// ```
#[derive(Error, Debug)]
pub enum LspError {
    #[error(transparent)]
    Core(#[from] P4Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported document: {0}")]
    UnsupportedDocument(String),
}

/// Convenience type alias for `Result<T, LspError>`.
pub type Result<T> = std::result::Result<T, LspError>;
