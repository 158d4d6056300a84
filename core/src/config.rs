use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::registry::KeywordRegistry;

pub const DEFAULT_THEN_LOOKAHEAD: usize = 2;
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 500;

/// Tunables and name tables handed to the analyzer at construction.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Significant lines searched for a `@Then` after an `@If` line.
    pub then_lookahead: usize,
    pub max_diagnostics: usize,
    pub registry: KeywordRegistry,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            then_lookahead: DEFAULT_THEN_LOOKAHEAD,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
            registry: KeywordRegistry::standard(),
        }
    }
}

/// On-disk shape of `abl.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectFile {
    #[serde(default)]
    diagnostics: DiagnosticsSection,
    #[serde(default)]
    keywords: KeywordsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DiagnosticsSection {
    then_lookahead: Option<usize>,
    max_diagnostics: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct KeywordsSection {
    #[serde(default)]
    builtins: Vec<String>,
    #[serde(default)]
    writers: Vec<String>,
}

impl AnalyzerConfig {
    pub fn with_then_lookahead(mut self, lines: usize) -> Self {
        self.then_lookahead = lines;
        self
    }

    /// Zero is ignored.
    pub fn with_max_diagnostics(mut self, max: usize) -> Self {
        if max > 0 {
            self.max_diagnostics = max;
        }
        self
    }

    pub fn extend_keywords<B, W>(mut self, builtins: B, writers: W) -> Self
    where
        B: IntoIterator<Item = String>,
        W: IntoIterator<Item = String>,
    {
        self.registry = self.registry.with_builtins(builtins).with_writers(writers);
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ProjectFile = toml::from_str(text).context("invalid abl.toml")?;
        let mut config = Self::default().extend_keywords(file.keywords.builtins, file.keywords.writers);
        if let Some(lines) = file.diagnostics.then_lookahead {
            config = config.with_then_lookahead(lines);
        }
        if let Some(max) = file.diagnostics.max_diagnostics {
            config = config.with_max_diagnostics(max);
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_toml_str(&text).with_context(|| format!("failed to load {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded analyzer config");
        Ok(config)
    }
}
