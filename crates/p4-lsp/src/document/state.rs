use dashmap::DashMap;
use p4_core::{CancellationSignal, CancellationToken, Catalog, DocumentIndex, SourceText};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp_server::ls_types::Uri;

/// State for a single open document.
///
/// Holds the latest full text sent by the client. Each state owns a
/// cancellation token; replacing or closing the document cancels it, which
/// stops any index scan still running over the old text.
///
/// # Examples
///
/// ```
/// use p4_lsp::document::DocumentState;
///
/// let doc = DocumentState::new("LOOP: JMP LOOP\n", 1);
/// let index = doc.index();
/// assert!(index.label("LOOP").is_some());
/// assert_eq!(doc.version, 1);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Document text split into lines
    pub text: Arc<SourceText>,
    /// Client-side document version
    pub version: i32,
    cancel: CancellationToken,
}

impl DocumentState {
    pub fn new(text: impl Into<String>, version: i32) -> Self {
        Self {
            text: Arc::new(SourceText::new(text)),
            version,
            cancel: CancellationToken::new(),
        }
    }

    /// Builds the index of the whole document.
    ///
    /// The scan stops early once this state has been superseded.
    pub fn index(&self) -> DocumentIndex {
        DocumentIndex::build(self.text.as_ref(), None, Some(&self.cancel))
    }

    /// Signals that this text is stale.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Global LSP server state.
///
/// Shared across handlers through `Arc`. Documents live in a `DashMap` so
/// handlers clone what they need and release the entry before indexing.
///
/// # Examples
///
/// ```
/// use p4_lsp::document::ServerState;
///
/// let state = ServerState::new();
/// assert_eq!(state.document_count(), 0);
/// ```
pub struct ServerState {
    /// Open documents by URI
    pub documents: DashMap<Uri, DocumentState>,
    /// Instruction and register documentation
    catalog: RwLock<Arc<Catalog>>,
}

impl ServerState {
    /// Creates a server state backed by the bundled documentation.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            catalog: RwLock::new(Arc::new(Catalog::builtin())),
        }
    }

    /// Retrieves document state by URI.
    ///
    /// The returned reference holds a lock on the map entry; drop it quickly.
    pub fn get_document(
        &self,
        uri: &Uri,
    ) -> Option<dashmap::mapref::one::Ref<'_, Uri, DocumentState>> {
        self.documents.get(uri)
    }

    /// Retrieves a copy of the document state, releasing the map lock
    /// immediately. The text itself is shared, not copied.
    pub fn get_document_clone(&self, uri: &Uri) -> Option<DocumentState> {
        self.documents.get(uri).map(|doc| doc.clone())
    }

    /// Inserts or replaces document state, cancelling the replaced one.
    pub fn update_document(&self, uri: Uri, state: DocumentState) {
        if let Some(previous) = self.documents.insert(uri, state) {
            previous.cancel();
        }
    }

    /// Removes document state and cancels it.
    pub fn remove_document(&self, uri: &Uri) -> Option<(Uri, DocumentState)> {
        let removed = self.documents.remove(uri);
        if let Some((_, doc)) = &removed {
            doc.cancel();
        }
        removed
    }

    /// Returns the number of open documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Current documentation catalog.
    pub async fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&*self.catalog.read().await)
    }

    /// Replaces the documentation catalog.
    pub async fn set_catalog(&self, catalog: Catalog) {
        *self.catalog.write().await = Arc::new(catalog);
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
