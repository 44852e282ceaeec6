//! Document management module.
//!
//! - `state`: document and server state
//! - `lifecycle`: open/change/close handling and documentation loading

mod lifecycle;
mod state;

pub use lifecycle::{
    FILE_EXTENSION, LANGUAGE_ID, ensure_supported, handle_document_change, handle_document_close,
    handle_document_open, is_p4_document, load_catalog,
};
pub use state::{DocumentState, ServerState};
