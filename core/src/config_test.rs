#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::{AnalyzerConfig, DEFAULT_MAX_DIAGNOSTICS, DEFAULT_THEN_LOOKAHEAD};
    use crate::registry::KeywordClass;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.then_lookahead, DEFAULT_THEN_LOOKAHEAD);
        assert_eq!(config.max_diagnostics, DEFAULT_MAX_DIAGNOSTICS);
        assert_eq!(config.registry.classify("Length"), KeywordClass::Builtin);
    }

    #[test]
    fn test_from_toml_str() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
[diagnostics]
then_lookahead = 4
max_diagnostics = 10

[keywords]
builtins = ["Lookup"]
writers = ["Emit"]
"#,
        )
        .unwrap();
        assert_eq!(config.then_lookahead, 4);
        assert_eq!(config.max_diagnostics, 10);
        assert_eq!(config.registry.classify("Lookup"), KeywordClass::Builtin);
        assert_eq!(config.registry.classify("Emit"), KeywordClass::Writer);
        assert_eq!(config.registry.classify("Length"), KeywordClass::Builtin);
    }

    #[test]
    fn test_empty_and_partial_files() {
        let config = AnalyzerConfig::from_toml_str("").unwrap();
        assert_eq!(config.then_lookahead, DEFAULT_THEN_LOOKAHEAD);
        let config = AnalyzerConfig::from_toml_str("[diagnostics]\nmax_diagnostics = 0").unwrap();
        assert_eq!(config.max_diagnostics, DEFAULT_MAX_DIAGNOSTICS);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(AnalyzerConfig::from_toml_str("[diagnostics]\nthen_lookahead = 'two'").is_err());
        assert!(AnalyzerConfig::from_toml_str("[unknown]\nx = 1").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[diagnostics]\nthen_lookahead = 1").unwrap();
        let config = AnalyzerConfig::load(file.path()).unwrap();
        assert_eq!(config.then_lookahead, 1);

        let err = AnalyzerConfig::load("/definitely/not/here/abl.toml").unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }
}
