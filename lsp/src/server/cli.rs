use anyhow::{anyhow, Context};
use std::path::{Component, Path};

use abl_core::{AblAnalyzer, AnalyzerConfig};

const USAGE: &str = "Usage: abl-lsp --analyze [--errors-only] [--config <abl.toml>] <relative-file-path>\n  --analyze <file>     : Full analysis with JSON output\n  --errors-only        : Show only errors in simple format\n  --config <file>      : Load settings from an abl.toml";

/// Options of a one-shot `--analyze` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnalyzeArgs {
    pub(crate) path: String,
    pub(crate) errors_only: bool,
    pub(crate) config: Option<String>,
}

/// `None` when the arguments do not ask for a one-shot analysis.
pub(crate) fn parse_analyze_args(args: &[String]) -> anyhow::Result<Option<AnalyzeArgs>> {
    let Some(i) = args.iter().position(|a| a == "--analyze") else {
        return Ok(None);
    };

    let mut errors_only = false;
    let mut config = None;
    let mut path = None;
    let mut rest = args[i + 1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--errors-only" => errors_only = true,
            "--config" => config = Some(rest.next().cloned().ok_or_else(|| anyhow!(USAGE))?),
            flag if flag.starts_with("--") => {}
            file => {
                path.get_or_insert_with(|| file.to_string());
            }
        }
    }
    // flags may also precede --analyze
    errors_only |= args[..i].iter().any(|a| a == "--errors-only");

    let path = path.ok_or_else(|| anyhow!(USAGE))?;
    Ok(Some(AnalyzeArgs {
        path,
        errors_only,
        config,
    }))
}

pub(crate) fn try_cli_analyze() -> anyhow::Result<Option<String>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(options) = parse_analyze_args(&args)? else {
        return Ok(None);
    };

    let config = match &options.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    let content = read_file_content(&options.path)?;
    render_analysis(&content, config, options.errors_only).map(Some)
}

/// JSON `{ diagnostics, tokens }`, or one `Line L:C: message` per error.
pub(crate) fn render_analysis(content: &str, config: AnalyzerConfig, errors_only: bool) -> anyhow::Result<String> {
    let analyzer = AblAnalyzer::new(config);
    if errors_only {
        let diagnostics = analyzer.validate(content);
        if diagnostics.is_empty() {
            return Ok("No errors found".to_string());
        }
        let lines: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
        return Ok(lines.join("\n"));
    }

    let analysis = analyzer.analyze(content);
    let output = serde_json::json!({
        "diagnostics": analysis.diagnostics,
        "tokens": analysis.tokens,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

pub(crate) fn is_safe_path(path: &str) -> bool {
    let path = Path::new(path);

    if path.as_os_str().is_empty() {
        return false;
    }
    if path.is_absolute() {
        return false;
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return false;
    }

    let s = path.to_string_lossy();
    let suspicious = ['\0', '\n', '\r', '\t'];
    if s.chars().any(|c| suspicious.contains(&c)) {
        return false;
    }
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if bytes[1] == b':' {
            return false;
        }
    }
    true
}

pub(crate) fn read_file_content(path: &str) -> anyhow::Result<String> {
    if !is_safe_path(path) {
        return Err(anyhow!("Unsafe file path: {}", path));
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path))
}
