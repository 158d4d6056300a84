use std::sync::Arc;

use tower_lsp::lsp_types::{Diagnostic, Url};
use tracing::debug;

use crate::analyzer::AnalysisResult;

use super::state::AblLanguageServer;

impl AblLanguageServer {
    /// Cached analysis of an open document, recomputed when its text changed.
    pub(crate) fn get_or_compute_analysis(&self, uri: &Url) -> Option<Arc<AnalysisResult>> {
        let (content, version) = {
            let doc = self.documents.get(uri)?;
            if let Some(cached) = doc.cached_analysis.clone() {
                return Some(cached);
            }
            (doc.content.to_string(), doc.version)
        };

        let computed = Arc::new(self.current_analyzer().analyze(&content));
        debug!(%uri, version, diagnostics = computed.diagnostics.len(), "analyzed document");

        if let Some(mut doc) = self.documents.get_mut(uri) {
            if doc.version == version {
                doc.cached_analysis = Some(computed.clone());
            }
        }
        Some(computed)
    }

    pub(crate) fn validate_document(&self, uri: &Url) -> Vec<Diagnostic> {
        self.get_or_compute_analysis(uri)
            .map(|analysis| analysis.diagnostics.clone())
            .unwrap_or_default()
    }

    /// Re-analyze and replace the client's diagnostics for `uri`.
    pub(crate) async fn publish_analysis(&self, uri: Url) {
        let Some(version) = self.documents.get(&uri).map(|doc| doc.version) else {
            return;
        };
        let diagnostics = self.validate_document(&uri);
        self.client.publish_diagnostics(uri, diagnostics, Some(version)).await;
    }

    /// Drop every cached analysis and republish diagnostics for all open documents.
    pub(crate) async fn revalidate_all(&self) {
        let uris: Vec<Url> = self
            .documents
            .iter_mut()
            .map(|mut entry| {
                entry.cached_analysis = None;
                entry.key().clone()
            })
            .collect();
        debug!(documents = uris.len(), "revalidating open documents");
        for uri in uris {
            self.publish_analysis(uri).await;
        }
    }
}
