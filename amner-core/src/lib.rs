//! # amner-core — Anotação NER por Regras para Mensagens em Amárico
//!
//! Este crate transforma mensagens de canais de comércio (Telegram) em dados de
//! treino para um modelo NER de amárico, rotulando **preço**, **local** e **produto**
//! no esquema BIO e exportando no formato CoNLL.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui em uma única direção, estágio a estágio:
//!
//! 1.  **Entrada**: [`Message`] vinda do coletor (texto pode estar ausente).
//! 2.  **Normalização** ([`normalizer`]): remove emojis e, opcionalmente, palavras latinas.
//! 3.  **Tokenização** ([`tokenizer`]): separa por espaço, descartando pontuação que não
//!     é de preço.
//! 4.  **Classificação** ([`rule_based`]): regras ordenadas sobre a [`KeywordTable`]
//!     (sufixo de preço, lookahead de moeda, local, produto, padrão).
//! 5.  **Orquestração** ([`pipeline`]): aplica 2–4 a cada mensagem, em ordem, e gera o relatório.
//! 6.  **Saída** ([`conll`]): uma linha `token rótulo` por token, linha em branco entre mensagens.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use amner_core::{AnnotationConfig, CorpusLabeler, Message};
//!
//! // 1. Configuração com as listas embutidas (ou AnnotationConfig::from_file)
//! let labeler = CorpusLabeler::new(AnnotationConfig::default()).unwrap();
//!
//! // 2. Rotula um lote
//! let messages = vec![Message::new("1", "ሶፋ 100 ብር ቦሌ 🔥")];
//! let sequences = labeler.label(&messages);
//!
//! // 3. Exporta em CoNLL
//! let mut out = Vec::new();
//! amner_core::conll::export(&sequences, &mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "ሶፋ B-PRODUCT\n100 I-PRICE\nብር I-PRICE\nቦሌ B-LOC\n\n"
//! );
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: rotulador de corpus, mensagens e relatório.
//! - [`rule_based`]: classificador e políticas de casamento/span.
//! - [`keywords`]: tabela de palavras-chave validada.
//! - [`tagger`]: rótulos BIO, spans e checagem de validade.
//! - [`conll`]: escrita e leitura CoNLL.

pub mod config;
pub mod conll;
pub mod error;
pub mod keywords;
pub mod normalizer;
pub mod pipeline;
pub mod rule_based;
pub mod tagger;
pub mod tokenizer;

pub use config::AnnotationConfig;
pub use error::{NerError, Result};
pub use keywords::{KeywordTable, MatchingMode};
pub use pipeline::{CorpusLabeler, LabelingOutput, LabelingReport, Message};
pub use rule_based::{ClassifierConfig, EntityClassifier, PriceSpanPolicy};
pub use tagger::{EntityCategory, Label, LabeledSequence, LabeledToken};
pub use tokenizer::Token;
