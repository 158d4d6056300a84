use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use ropey::Rope;
use tower_lsp::lsp_types::{SemanticToken, Url};
use tower_lsp::Client;

use crate::analyzer::{AblLspAnalyzer, AnalysisResult};

use super::config::ServerConfig;
use super::utils::compute_content_hash;

/// In-memory representation of an open ABL document and its cached LSP artifacts.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
    pub(crate) cached_analysis: Option<Arc<AnalysisResult>>,
    pub(crate) last_sent_semantic_tokens: Option<Arc<Vec<SemanticToken>>>,
    pub(crate) last_sent_result_id: Option<String>,
    pub(crate) tokens_result_counter: u64,
    pub(crate) content_hash: u64,
}

impl Document {
    pub(crate) fn new(text: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(text),
            version,
            content_hash: compute_content_hash(text),
            ..Default::default()
        }
    }

    /// Re-hash after an edit; the cached analysis survives only if the text is unchanged.
    pub(crate) fn refresh_hash(&mut self) {
        let hash = compute_content_hash(&self.content.to_string());
        if hash != self.content_hash {
            self.cached_analysis = None;
            self.content_hash = hash;
        }
    }

    /// Fresh result id for a semantic tokens response.
    pub(crate) fn next_result_id(&mut self) -> String {
        self.tokens_result_counter = self.tokens_result_counter.wrapping_add(1);
        format!("v{}-g{}", self.version, self.tokens_result_counter)
    }
}

/// Primary LSP server state shared across handlers.
pub(crate) struct AblLanguageServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    pub(crate) analyzer: RwLock<Arc<AblLspAnalyzer>>,
    pub(crate) config: RwLock<ServerConfig>,
    pub(crate) workspace_root: RwLock<Option<PathBuf>>,
}

impl AblLanguageServer {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            analyzer: RwLock::new(Arc::new(AblLspAnalyzer::default())),
            config: RwLock::new(ServerConfig::default()),
            workspace_root: RwLock::new(None),
        }
    }

    pub(crate) fn current_analyzer(&self) -> Arc<AblLspAnalyzer> {
        match self.analyzer.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn server_config(&self) -> ServerConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
