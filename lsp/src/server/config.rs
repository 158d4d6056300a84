use std::path::Path;
use std::sync::Arc;

use abl_core::AnalyzerConfig;
use serde::Deserialize;
use tower_lsp::lsp_types::ConfigurationItem;
use tracing::{debug, info, warn};

use crate::analyzer::AblLspAnalyzer;

use super::state::AblLanguageServer;

pub(crate) const CONFIG_SECTION: &str = "abl.lsp";
pub(crate) const PROJECT_FILE: &str = "abl.toml";

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) semantic_tokens_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            semantic_tokens_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AblLspConfigSection {
    #[serde(default)]
    pub(crate) then_lookahead: Option<usize>,
    #[serde(default)]
    pub(crate) max_diagnostics: Option<usize>,
    #[serde(default)]
    pub(crate) extra_builtins: Vec<String>,
    #[serde(default)]
    pub(crate) extra_writers: Vec<String>,
    #[serde(default)]
    pub(crate) semantic_tokens: SemanticTokensConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SemanticTokensConfig {
    #[serde(default)]
    pub(crate) enabled: Option<bool>,
}

impl AblLspConfigSection {
    /// Client settings layered over the project file's configuration.
    pub(crate) fn apply(&self, base: AnalyzerConfig) -> AnalyzerConfig {
        let mut config = base.extend_keywords(self.extra_builtins.iter().cloned(), self.extra_writers.iter().cloned());
        if let Some(lines) = self.then_lookahead {
            config = config.with_then_lookahead(lines);
        }
        if let Some(max) = self.max_diagnostics {
            config = config.with_max_diagnostics(max);
        }
        config
    }

    pub(crate) fn server_config(&self) -> ServerConfig {
        ServerConfig {
            semantic_tokens_enabled: self.semantic_tokens.enabled.unwrap_or(true),
        }
    }
}

/// `abl.toml` at the workspace root, or the defaults when absent or invalid.
pub(crate) fn project_config(root: Option<&Path>) -> AnalyzerConfig {
    let Some(path) = root.map(|r| r.join(PROJECT_FILE)) else {
        return AnalyzerConfig::default();
    };
    if !path.is_file() {
        return AnalyzerConfig::default();
    }
    match AnalyzerConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("ignoring {}: {e:#}", path.display());
            AnalyzerConfig::default()
        }
    }
}

impl AblLanguageServer {
    pub(crate) async fn load_config(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];

        let section = match self.client.configuration(items).await {
            Ok(values) => values
                .into_iter()
                .next()
                .filter(|v| !v.is_null())
                .and_then(|v| match serde_json::from_value::<AblLspConfigSection>(v) {
                    Ok(cfg) => Some(cfg),
                    Err(e) => {
                        warn!("invalid {CONFIG_SECTION} settings: {e}");
                        None
                    }
                })
                .unwrap_or_default(),
            Err(e) => {
                debug!("client configuration unavailable: {e}");
                AblLspConfigSection::default()
            }
        };

        let root = match self.workspace_root.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        let analyzer_config = section.apply(project_config(root.as_deref()));
        info!(
            then_lookahead = analyzer_config.then_lookahead,
            max_diagnostics = analyzer_config.max_diagnostics,
            "configuration loaded"
        );

        if let Ok(mut guard) = self.analyzer.write() {
            *guard = Arc::new(AblLspAnalyzer::new(analyzer_config));
        }
        if let Ok(mut guard) = self.config.write() {
            *guard = section.server_config();
        }
    }
}
