//! # Pipeline de Anotação — Rotulador de Corpus
//!
//! Orquestra os estágios para cada mensagem, na ordem de entrada:
//!
//! 1. Normalização ([`normalizer`](crate::normalizer)): remove emojis (e latim, se configurado).
//! 2. Tokenização ([`tokenizer`](crate::tokenizer)).
//! 3. Classificação por regras ([`rule_based`](crate::rule_based)).
//! 4. União de tokens e rótulos numa [`LabeledSequence`].
//!
//! Toda mensagem de entrada gera exatamente uma sequência de saída, mesmo quando
//! o texto fica vazio após a normalização. Isso mantém o alinhamento com os
//! metadados da tabela original (canal, data, mídia).
//!
//! Mensagens sem texto são um erro de entrada recuperável: viram sequência vazia
//! e entram no [`LabelingReport`] como puladas, sem abortar o lote.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::AnnotationConfig;
use crate::error::{NerError, Result};
use crate::normalizer::{normalize_with, NormalizerConfig};
use crate::rule_based::EntityClassifier;
use crate::tagger::{LabeledSequence, LabeledToken};
use crate::tokenizer::{tokenize_with, TokenizerConfig};

/// Uma mensagem coletada de um canal. Somente leitura para o pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identificador usado para alinhar a saída com a tabela de entrada.
    pub id: String,
    /// Texto da mensagem. `None` quando o coletor não obteve texto (ex: só mídia).
    pub text: Option<String>,
    /// Canal de origem.
    pub source: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            source: String::new(),
            timestamp: None,
        }
    }
}

/// Mensagem que precisou ser recuperada como texto vazio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipReason {
    pub message_id: String,
    pub reason: String,
}

/// Resumo de uma execução do rotulador.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelingReport {
    /// Mensagens rotuladas a partir de texto presente.
    pub processed: usize,
    /// Mensagens com erro de entrada, tratadas como vazias.
    pub skipped: usize,
    /// Sequências sem nenhum token (inclui as puladas).
    pub empty_sequences: usize,
    pub total_tokens: usize,
    /// Entidades encontradas por categoria (ex: `"PRICE" → 12`).
    pub entities: BTreeMap<String, usize>,
    /// Posições com `I-*` sem abertura válida (esperado na política literal de preço).
    pub bio_violations: usize,
    pub skip_reasons: Vec<SkipReason>,
}

impl LabelingReport {
    /// Resumo de sequências já rotuladas (ex: lidas de um arquivo CoNLL).
    pub fn from_sequences(sequences: &[LabeledSequence]) -> Self {
        let mut report = Self::default();
        for sequence in sequences {
            report.record(sequence, None);
        }
        report
    }

    fn record(&mut self, sequence: &LabeledSequence, input_error: Option<NerError>) {
        match input_error {
            Some(err) => {
                self.skipped += 1;
                self.skip_reasons.push(SkipReason {
                    message_id: sequence.message_id.clone(),
                    reason: err.to_string(),
                });
            }
            None => self.processed += 1,
        }
        if sequence.is_empty() {
            self.empty_sequences += 1;
        }
        self.total_tokens += sequence.len();
        for span in sequence.spans() {
            *self.entities.entry(span.category.name().to_string()).or_default() += 1;
        }
        self.bio_violations += sequence.violations().len();
    }
}

/// Saída de [`CorpusLabeler::label_with_report`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelingOutput {
    /// Uma sequência por mensagem, na ordem de entrada.
    pub sequences: Vec<LabeledSequence>,
    pub report: LabelingReport,
}

/// Rotulador de corpus: normaliza, tokeniza e classifica um lote de mensagens.
///
/// Não guarda estado entre chamadas; a tabela de palavras-chave é somente leitura.
#[derive(Debug, Clone)]
pub struct CorpusLabeler {
    classifier: EntityClassifier,
    normalizer: NormalizerConfig,
    tokenizer: TokenizerConfig,
    parallel: bool,
}

impl CorpusLabeler {
    pub fn new(config: AnnotationConfig) -> Result<Self> {
        let tokenizer = TokenizerConfig::from_keywords(&config.keywords);
        let classifier = EntityClassifier::new(config.keywords, config.classifier)?;
        Ok(Self {
            classifier,
            normalizer: config.normalizer,
            tokenizer,
            parallel: config.parallel,
        })
    }

    /// Uma sequência rotulada por mensagem, preservando a ordem de entrada.
    pub fn label(&self, messages: &[Message]) -> Vec<LabeledSequence> {
        self.label_with_report(messages).sequences
    }

    /// Como [`label`](Self::label), com o resumo da execução.
    pub fn label_with_report(&self, messages: &[Message]) -> LabelingOutput {
        let results: Vec<(LabeledSequence, Option<NerError>)> = if self.parallel {
            messages.par_iter().map(|m| self.label_message(m)).collect()
        } else {
            messages.iter().map(|m| self.label_message(m)).collect()
        };

        let mut report = LabelingReport::default();
        let mut sequences = Vec::with_capacity(results.len());
        for (sequence, input_error) in results {
            if let Some(err) = &input_error {
                tracing::warn!("{err}; tratada como texto vazio");
            }
            report.record(&sequence, input_error);
            sequences.push(sequence);
        }

        tracing::info!(
            processed = report.processed,
            skipped = report.skipped,
            tokens = report.total_tokens,
            violations = report.bio_violations,
            "lote rotulado"
        );

        LabelingOutput { sequences, report }
    }

    /// Normaliza, tokeniza e classifica um único texto.
    pub fn label_text(&self, text: &str) -> Vec<LabeledToken> {
        let normalized = normalize_with(text, &self.normalizer);
        let tokens = tokenize_with(&normalized, &self.tokenizer);
        let labels = self.classifier.classify(&tokens);

        tokens
            .into_iter()
            .zip(labels)
            .map(|(token, label)| LabeledToken { token, label })
            .collect()
    }

    fn label_message(&self, message: &Message) -> (LabeledSequence, Option<NerError>) {
        let (text, input_error) = match &message.text {
            Some(text) => (text.as_str(), None),
            None => (
                "",
                Some(NerError::Input {
                    id: message.id.clone(),
                    reason: "campo de texto ausente".to_string(),
                }),
            ),
        };

        let tokens = self.label_text(text);
        tracing::debug!(id = %message.id, tokens = tokens.len(), "mensagem rotulada");
        (LabeledSequence::new(message.id.clone(), tokens), input_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{KeywordTable, MatchingMode};
    use crate::rule_based::{ClassifierConfig, PriceSpanPolicy};
    use crate::tagger::{EntityCategory, Label};

    fn labeler(parallel: bool) -> CorpusLabeler {
        CorpusLabeler::new(AnnotationConfig {
            keywords: KeywordTable::amharic_default(),
            parallel,
            ..Default::default()
        })
        .unwrap()
    }

    fn sample_messages() -> Vec<Message> {
        vec![
            Message::new("1", "🔥 የጫማ ምርቶች ዋጋ 1,500 ብር 📍 ቦሌ"),
            Message::new("2", "😀😀"),
            Message {
                id: "3".into(),
                text: None,
                source: "@shageronlinestore".into(),
                timestamp: None,
            },
            Message::new("4", "ሶፋ 100 ብር ፒያሳ"),
            Message::new("5", ""),
        ]
    }

    #[test]
    fn test_one_sequence_per_message_in_order() {
        let messages = sample_messages();
        let sequences = labeler(false).label(&messages);
        assert_eq!(sequences.len(), messages.len());
        for (seq, msg) in sequences.iter().zip(&messages) {
            assert_eq!(seq.message_id, msg.id);
        }
        assert!(sequences[1].is_empty());
        assert!(sequences[2].is_empty());
        assert!(sequences[4].is_empty());
    }

    #[test]
    fn test_end_to_end_labels() {
        let sequences = labeler(false).label(&sample_messages());
        let first: Vec<(&str, String)> = sequences[0]
            .tokens
            .iter()
            .map(|t| (t.token.text.as_str(), t.label.label()))
            .collect();
        assert_eq!(
            first,
            vec![
                ("የጫማ", "B-PRODUCT".to_string()),
                ("ምርቶች", "B-PRODUCT".to_string()),
                ("ዋጋ", "I-PRICE".to_string()),
                ("1,500", "I-PRICE".to_string()),
                ("ብር", "I-PRICE".to_string()),
                ("ቦሌ", "B-LOC".to_string()),
            ]
        );
    }

    #[test]
    fn test_report_counts() {
        let output = labeler(false).label_with_report(&sample_messages());
        let report = &output.report;
        assert_eq!(report.processed, 4);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.skip_reasons[0].message_id, "3");
        assert_eq!(report.empty_sequences, 3);
        assert_eq!(report.total_tokens, 10);
        assert_eq!(report.entities.get("LOC"), Some(&2));
        assert_eq!(report.entities.get("PRODUCT"), Some(&3));
        assert_eq!(report.entities.get("PRICE"), Some(&2));
        // "ዋጋ" após B-PRODUCT e "100" após B-PRODUCT
        assert_eq!(report.bio_violations, 2);
    }

    #[test]
    fn test_report_from_sequences() {
        let sequences = labeler(false).label(&sample_messages());
        let report = LabelingReport::from_sequences(&sequences);
        assert_eq!(report.processed, 5);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.total_tokens, 10);
        assert_eq!(report.bio_violations, 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let messages: Vec<Message> = (0..200)
            .map(|i| Message::new(i.to_string(), format!("ጫማ {i} ብር መገናኛ ህ{i}")))
            .collect();
        assert_eq!(labeler(true).label(&messages), labeler(false).label(&messages));
    }

    #[test]
    fn test_tracked_config_produces_valid_bio() {
        let labeler = CorpusLabeler::new(AnnotationConfig {
            keywords: KeywordTable::amharic_default(),
            classifier: ClassifierConfig {
                matching: MatchingMode::Exact,
                price_spans: PriceSpanPolicy::Tracked,
            },
            ..Default::default()
        })
        .unwrap();
        let output = labeler.label_with_report(&sample_messages());
        assert_eq!(output.report.bio_violations, 0);
        assert_eq!(output.sequences[3].tokens[1].label, Label::Begin(EntityCategory::Price));
    }

    #[test]
    fn test_strip_latin_option() {
        let mut config = AnnotationConfig::default();
        config.normalizer.strip_latin = true;
        let labeler = CorpusLabeler::new(config).unwrap();
        let tokens = labeler.label_text("New arrival ሶፋ");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].label, Label::Begin(EntityCategory::Product));

        let tokens = labeler.label_text("Price: ሶፋ, Call now! ቦሌ");
        let texts: Vec<&str> = tokens.iter().map(|t| t.token.text.as_str()).collect();
        assert_eq!(texts, vec!["ሶፋ", "ቦሌ"]);
    }
}
