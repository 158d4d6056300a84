use std::path::PathBuf;
use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::{debug, info};

use crate::analyzer::{legend, DIAGNOSTIC_SOURCE};

use super::{
    semantic::compute_delta_edits,
    state::{AblLanguageServer, Document},
    text::apply_incremental_change_rope,
};

#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())
        .and_then(|uri| uri.to_file_path().ok())
}

impl AblLanguageServer {
    fn clamped_tokens(&self, uri: &Url) -> Option<Vec<SemanticToken>> {
        if !self.server_config().semantic_tokens_enabled {
            return None;
        }
        let analysis = self.get_or_compute_analysis(uri)?;
        Some(analysis.semantic_tokens.clone())
    }

    /// Record `tokens` as the baseline for the next delta request and return its id.
    fn remember_sent_tokens(&self, uri: &Url, tokens: &[SemanticToken]) -> Option<String> {
        let mut doc = self.documents.get_mut(uri)?;
        let id = doc.next_result_id();
        doc.last_sent_semantic_tokens = Some(Arc::new(tokens.to_vec()));
        doc.last_sent_result_id = Some(id.clone());
        Some(id)
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for AblLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root = workspace_root(&params);
        info!("ABL Language Server initializing, workspace root: {:?}", root);
        if let Ok(mut guard) = self.workspace_root.write() {
            *guard = root;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec!["@".to_string(), "^".to_string(), ".".to_string(), "(".to_string()]),
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                references_provider: Some(OneOf::Left(true)),
                definition_provider: Some(OneOf::Left(true)),
                document_highlight_provider: Some(OneOf::Left(true)),
                folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
                diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
                    identifier: Some(DIAGNOSTIC_SOURCE.to_string()),
                    inter_file_dependencies: false,
                    workspace_diagnostics: false,
                    work_done_progress_options: Default::default(),
                })),
                semantic_tokens_provider: Some(SemanticTokensServerCapabilities::SemanticTokensOptions(
                    SemanticTokensOptions {
                        work_done_progress_options: Default::default(),
                        legend: legend(),
                        range: Some(true),
                        full: Some(SemanticTokensFullOptions::Delta { delta: Some(true) }),
                    },
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "ABL Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("ABL Language Server initialized");
        self.client
            .log_message(MessageType::INFO, "ABL Language Server started")
            .await;
        self.load_config().await;
        self.revalidate_all().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("ABL Language Server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, _params: DidChangeConfigurationParams) {
        self.load_config().await;
        self.revalidate_all().await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let document = Document::new(&params.text_document.text, params.text_document.version);
        self.documents.insert(uri.clone(), document);
        self.publish_analysis(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        {
            let mut entry = self.documents.entry(uri.clone()).or_default();
            entry.version = params.text_document.version;
            for change in &params.content_changes {
                apply_incremental_change_rope(&mut entry.content, change);
            }
            entry.refresh_hash();
        }
        self.publish_analysis(uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn diagnostic(&self, params: DocumentDiagnosticParams) -> Result<DocumentDiagnosticReportResult> {
        let items = self.validate_document(&params.text_document.uri);
        Ok(DocumentDiagnosticReportResult::Report(DocumentDiagnosticReport::Full(
            RelatedFullDocumentDiagnosticReport {
                related_documents: None,
                full_document_diagnostic_report: FullDocumentDiagnosticReport { result_id: None, items },
            },
        )))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(analysis) = self.get_or_compute_analysis(uri) else {
            return Ok(None);
        };
        Ok(self.current_analyzer().hover(&analysis, position))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(analysis) = self.get_or_compute_analysis(uri) else {
            return Ok(None);
        };
        let items = self.current_analyzer().completions(&analysis, position);
        debug!(count = items.len(), "completion");
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn document_symbol(&self, params: DocumentSymbolParams) -> Result<Option<DocumentSymbolResponse>> {
        Ok(self
            .get_or_compute_analysis(&params.text_document.uri)
            .map(|analysis| DocumentSymbolResponse::Nested(analysis.symbols.clone())))
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        Ok(self
            .get_or_compute_analysis(&params.text_document.uri)
            .map(|analysis| analysis.folding_ranges.clone()))
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(analysis) = self.get_or_compute_analysis(&uri) else {
            return Ok(None);
        };
        Ok(analysis
            .definition(position)
            .map(|range| GotoDefinitionResponse::Scalar(Location::new(uri, range))))
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(analysis) = self.get_or_compute_analysis(&uri) else {
            return Ok(None);
        };
        let locations: Vec<Location> = analysis
            .references(position, params.context.include_declaration)
            .into_iter()
            .map(|range| Location::new(uri.clone(), range))
            .collect();
        Ok((!locations.is_empty()).then_some(locations))
    }

    async fn document_highlight(&self, params: DocumentHighlightParams) -> Result<Option<Vec<DocumentHighlight>>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(analysis) = self.get_or_compute_analysis(uri) else {
            return Ok(None);
        };
        let highlights = analysis.highlights(position);
        Ok((!highlights.is_empty()).then_some(highlights))
    }

    async fn semantic_tokens_full(&self, params: SemanticTokensParams) -> Result<Option<SemanticTokensResult>> {
        let uri = &params.text_document.uri;
        let Some(tokens) = self.clamped_tokens(uri) else {
            return Ok(None);
        };
        let result_id = self.remember_sent_tokens(uri, &tokens);
        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens { result_id, data: tokens })))
    }

    async fn semantic_tokens_range(
        &self,
        params: SemanticTokensRangeParams,
    ) -> Result<Option<SemanticTokensRangeResult>> {
        if !self.server_config().semantic_tokens_enabled {
            return Ok(None);
        }
        let Some(analysis) = self.get_or_compute_analysis(&params.text_document.uri) else {
            return Ok(None);
        };
        let data = analysis.semantic_tokens_in_range(params.range);
        Ok(Some(SemanticTokensRangeResult::Tokens(SemanticTokens { result_id: None, data })))
    }

    async fn semantic_tokens_full_delta(
        &self,
        params: SemanticTokensDeltaParams,
    ) -> Result<Option<SemanticTokensFullDeltaResult>> {
        let uri = &params.text_document.uri;
        let Some(new_tokens) = self.clamped_tokens(uri) else {
            return Ok(None);
        };

        let baseline = self.documents.get(uri).and_then(|doc| {
            let matches = doc.last_sent_result_id.as_deref() == Some(params.previous_result_id.as_str());
            if matches {
                doc.last_sent_semantic_tokens.clone()
            } else {
                None
            }
        });
        let result_id = self.remember_sent_tokens(uri, &new_tokens);

        match baseline {
            Some(previous) => Ok(Some(SemanticTokensFullDeltaResult::TokensDelta(SemanticTokensDelta {
                result_id,
                edits: compute_delta_edits(&previous, &new_tokens),
            }))),
            None => Ok(Some(SemanticTokensFullDeltaResult::Tokens(SemanticTokens {
                result_id,
                data: new_tokens,
            }))),
        }
    }
}
