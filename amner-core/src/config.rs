//! Configuração do pipeline de anotação.
//!
//! Um arquivo TOML descreve as listas de palavras-chave e as opções de cada estágio:
//!
//! ```toml
//! parallel = false
//!
//! [classifier]
//! matching = "exact"        # ou "substring"
//! price_spans = "literal"   # ou "tracked"
//!
//! [normalizer]
//! strip_latin = false
//!
//! [keywords]
//! location_terms = ["ቦሌ", "ፒያሳ"]
//! product_terms = ["ጫማ"]
//! price_markers = ["ዋጋ", "ብር"]
//! currency_markers = ["ብር"]
//! ```
//!
//! Só a seção `[keywords]` é obrigatória. Listas vazias são rejeitadas na carga.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{NerError, Result};
use crate::keywords::KeywordTable;
use crate::normalizer::NormalizerConfig;
use crate::rule_based::ClassifierConfig;

/// Configuração completa de uma execução do anotador.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationConfig {
    pub keywords: KeywordTable,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    /// Processa as mensagens em paralelo (rayon). A ordem da saída não muda.
    #[serde(default)]
    pub parallel: bool,
}

impl AnnotationConfig {
    /// Carrega de um arquivo TOML
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| NerError::ConfigFile {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| NerError::ConfigParse {
            path,
            message: e.to_string(),
        })
    }

    /// Carrega de uma string TOML (útil em testes e configurações embutidas)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| NerError::ConfigParse {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::MatchingMode;
    use crate::rule_based::PriceSpanPolicy;

    const FULL: &str = r#"
        parallel = true

        [classifier]
        matching = "substring"
        price_spans = "tracked"

        [normalizer]
        strip_latin = true

        [keywords]
        location_terms = ["ቦሌ"]
        product_terms = ["ጫማ"]
        price_markers = ["ዋጋ"]
        currency_markers = ["ብር", "ETB"]
    "#;

    #[test]
    fn test_full_config() {
        let config = AnnotationConfig::from_toml_str(FULL).unwrap();
        assert!(config.parallel);
        assert_eq!(config.classifier.matching, MatchingMode::Substring);
        assert_eq!(config.classifier.price_spans, PriceSpanPolicy::Tracked);
        assert!(config.normalizer.strip_latin);
        assert!(config.keywords.is_currency("ETB"));
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let config = AnnotationConfig::from_toml_str(
            r#"
            [keywords]
            location_terms = ["ቦሌ"]
            product_terms = ["ጫማ"]
            price_markers = ["ዋጋ"]
            "#,
        )
        .unwrap();
        assert!(!config.parallel);
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert_eq!(config.normalizer, NormalizerConfig::default());
    }

    #[test]
    fn test_missing_or_empty_keywords_are_fatal() {
        let err = AnnotationConfig::from_toml_str("parallel = true").unwrap_err();
        assert!(matches!(err, NerError::ConfigParse { .. }));

        let err = AnnotationConfig::from_toml_str(
            r#"
            [keywords]
            location_terms = ["ቦሌ"]
            product_terms = []
            price_markers = ["ዋጋ"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("product_terms"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amner.toml");
        std::fs::write(&path, FULL).unwrap();
        let config = AnnotationConfig::from_file(&path).unwrap();
        assert_eq!(config.keywords.location_count(), 1);

        let missing = AnnotationConfig::from_file(dir.path().join("nao-existe.toml")).unwrap_err();
        assert!(matches!(missing, NerError::ConfigFile { .. }));
    }

    #[test]
    fn test_shipped_config_parses() {
        let shipped = include_str!("../../config/amner.toml");
        let config = AnnotationConfig::from_toml_str(shipped).unwrap();
        assert_eq!(config.keywords, KeywordTable::amharic_default());
    }
}
