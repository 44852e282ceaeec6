use crate::config::P4Config;
use crate::document::{
    ServerState, handle_document_change, handle_document_close, handle_document_open,
    load_catalog,
};
use crate::handlers::{definition, document_symbols, formatting, hover};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp_server::ls_types::{
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DocumentFormattingParams, DocumentSymbolParams, DocumentSymbolResponse, GotoDefinitionParams,
    GotoDefinitionResponse, Hover, HoverParams, HoverProviderCapability, InitializeParams,
    InitializeResult, InitializedParams, MessageType, OneOf, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind, TextEdit,
};
use tower_lsp_server::{Client, LanguageServer, jsonrpc::Result};

pub struct Backend {
    pub(crate) client: Client,
    state: Arc<ServerState>,
    config: Arc<RwLock<P4Config>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(ServerState::new()),
            config: Arc::new(RwLock::new(P4Config::default())),
        }
    }

    /// Get a reference to the LSP client (primarily for testing/benchmarking).
    #[doc(hidden)]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Shared server state (primarily for testing/benchmarking).
    #[doc(hidden)]
    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Reloads instruction and register documentation from the configured
    /// location, keeping the current catalog when that fails.
    async fn reload_catalog(&self) {
        let documentation = self.config.read().await.documentation.clone();
        if documentation.path.is_none() {
            return;
        }

        match load_catalog(&documentation).await {
            Ok(catalog) => self.state.set_catalog(catalog).await,
            Err(e) => {
                tracing::warn!("failed to load documentation: {}", e);
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("Using built-in documentation: {}", e),
                    )
                    .await;
            }
        }
    }

    fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            definition_provider: Some(OneOf::Left(true)),
            document_symbol_provider: Some(OneOf::Left(true)),
            document_formatting_provider: Some(OneOf::Left(true)),
            ..Default::default()
        }
    }
}

impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("initializing p4-lsp server");

        match P4Config::from_init_options(params.initialization_options) {
            Ok(config) => {
                tracing::debug!("loaded configuration: {:?}", config);
                *self.config.write().await = config;
            }
            Err(e) => tracing::warn!("invalid initialization options, using defaults: {}", e),
        }

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "p4-lsp".into(),
                version: Some(env!("CARGO_PKG_VERSION").into()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.reload_catalog().await;

        tracing::info!("p4-lsp server initialized");
        self.client
            .log_message(MessageType::INFO, "p4-lsp ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down p4-lsp server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        if let Err(e) = handle_document_open(
            &self.state,
            document.uri,
            &document.language_id,
            document.text,
            document.version,
        ) {
            tracing::debug!("not tracking document: {}", e);
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // Full sync: the last change carries the whole text.
        if let Some(change) = params.content_changes.into_iter().next_back() {
            handle_document_change(&self.state, uri, change.text, version);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        handle_document_close(&self.state, &params.text_document.uri);
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        Ok(hover::handle_hover(Arc::clone(&self.state), params, Arc::clone(&self.config)).await)
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        Ok(definition::handle_definition(Arc::clone(&self.state), params).await)
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        Ok(document_symbols::handle_document_symbols(Arc::clone(&self.state), params).await)
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        Ok(
            formatting::handle_formatting(Arc::clone(&self.state), params, Arc::clone(&self.config))
                .await,
        )
    }
}
