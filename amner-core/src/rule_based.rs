//! # Classificador por Regras — Preço, Local e Produto
//!
//! Atribui um rótulo BIO a cada token usando a tabela de palavras-chave e
//! contexto local. As regras não são mutuamente exclusivas, então a **ordem**
//! define o desempate (a primeira que casar vence):
//!
//! 1. **Sufixo de preço**: o token é um marcador de preço, termina com um marcador
//!    de moeda ("100ብር") ou casa o padrão número+moeda ("$20", "ብር500").
//! 2. **Lookahead de preço**: token numérico seguido exatamente por um marcador de
//!    moeda ("100 ብር") → `I-PRICE`.
//! 3. **Local**: casa `location_terms` → `B-LOC`.
//! 4. **Produto**: casa `product_terms` → `B-PRODUCT`.
//! 5. **Padrão**: pontuação pura ou qualquer outro token → `O`.
//!
//! ## Fronteira de spans de preço
//!
//! Na política [`PriceSpanPolicy::Literal`] o primeiro token da *mensagem* recebe
//! `B-PRICE` se casar a regra 1; qualquer outro token de preço recebe `I-PRICE`, mesmo
//! quando uma nova menção de preço começa. Isso produz sequências BIO inválidas
//! (limitação conhecida). A política [`PriceSpanPolicy::Tracked`] acompanha se o
//! token anterior já é preço e abre um novo span com `B-PRICE` quando não é.
//!
//! Locais e produtos são sempre spans de um token (`B-` apenas).
//!
//! A classificação nunca falha: tokens desconhecidos viram `O`.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keywords::{is_word_char, KeywordTable, MatchingMode};
use crate::tagger::{EntityCategory, Label};
use crate::tokenizer::Token;

/// Como decidir entre `B-PRICE` e `I-PRICE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSpanPolicy {
    /// `B-PRICE` só na posição 0 da mensagem; o resto é `I-PRICE`.
    #[default]
    Literal,
    /// Estado explícito "dentro de um preço": `B-PRICE` ao abrir, `I-PRICE` ao continuar.
    Tracked,
}

/// Opções do classificador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub matching: MatchingMode,
    #[serde(default)]
    pub price_spans: PriceSpanPolicy,
}

/// Regra que decidiu o rótulo de um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    PriceSuffix,
    PriceLookahead,
    Location,
    Product,
    Punctuation,
    Default,
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::PriceSuffix => "price_suffix",
            RuleKind::PriceLookahead => "price_lookahead",
            RuleKind::Location => "location",
            RuleKind::Product => "product",
            RuleKind::Punctuation => "punctuation",
            RuleKind::Default => "default",
        }
    }
}

/// Uma decisão do classificador: o rótulo de um token e a regra que o decidiu.
/// A posição no vetor devolvido por `explain` é a posição do token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub label: Label,
    pub rule: RuleKind,
}

/// Classificador por regras.
///
/// Recebe a tabela de palavras-chave na construção e nunca a altera; pode ser
/// compartilhado entre threads (`&self` em todas as operações).
#[derive(Debug, Clone)]
pub struct EntityClassifier {
    keywords: KeywordTable,
    config: ClassifierConfig,
    /// Número com moeda antes ou depois ("$20", "500ብር"). `None` sem marcadores de moeda.
    price_pattern: Option<Regex>,
}

impl EntityClassifier {
    pub fn new(keywords: KeywordTable, config: ClassifierConfig) -> Result<Self> {
        let markers: Vec<String> = keywords.currency_markers().map(regex::escape).collect();
        let price_pattern = if markers.is_empty() {
            None
        } else {
            let currency = markers.join("|");
            Some(Regex::new(&format!(
                r"^(?:(?:{currency})\d[\d.,]*|\d[\d.,]*(?:{currency}))$"
            ))?)
        };

        Ok(Self {
            keywords,
            config,
            price_pattern,
        })
    }

    /// Um rótulo por token, mesmo tamanho e mesma ordem da entrada.
    pub fn classify(&self, tokens: &[Token]) -> Vec<Label> {
        self.explain(tokens).into_iter().map(|m| m.label).collect()
    }

    /// Como [`classify`](Self::classify), mas informa a regra que decidiu cada token.
    pub fn explain(&self, tokens: &[Token]) -> Vec<RuleMatch> {
        let mut matches: Vec<RuleMatch> = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            let text = token.text.trim();
            let prev = matches.last().map(|m| m.label);

            let (rule, label) = if self.is_price(text) {
                (RuleKind::PriceSuffix, self.price_label(i, prev))
            } else if self.is_price_lookahead(text, tokens.get(i + 1)) {
                let label = match self.config.price_spans {
                    PriceSpanPolicy::Literal => Label::Inside(EntityCategory::Price),
                    PriceSpanPolicy::Tracked => self.price_label(i, prev),
                };
                (RuleKind::PriceLookahead, label)
            } else if self.keywords.is_location(text, self.config.matching) {
                (RuleKind::Location, Label::Begin(EntityCategory::Loc))
            } else if self.keywords.is_product(text, self.config.matching) {
                (RuleKind::Product, Label::Begin(EntityCategory::Product))
            } else if is_punctuation(text) {
                (RuleKind::Punctuation, Label::Outside)
            } else {
                (RuleKind::Default, Label::Outside)
            };

            tracing::debug!(token = %token.text, index = i, rule = rule.name(), label = %label);
            matches.push(RuleMatch { label, rule });
        }

        matches
    }

    /// Regra 1: marcador de preço, sufixo de moeda ou padrão número+moeda.
    fn is_price(&self, text: &str) -> bool {
        self.keywords.is_price_marker(text)
            || self.keywords.ends_with_currency(text)
            || self
                .price_pattern
                .as_ref()
                .is_some_and(|re| re.is_match(text))
    }

    /// Regra 2: número seguido exatamente por um marcador de moeda.
    fn is_price_lookahead(&self, text: &str, next: Option<&Token>) -> bool {
        is_numeric(text) && next.is_some_and(|n| self.keywords.is_currency(&n.text))
    }

    fn price_label(&self, i: usize, prev: Option<Label>) -> Label {
        let price = EntityCategory::Price;
        match self.config.price_spans {
            PriceSpanPolicy::Literal if i == 0 => Label::Begin(price),
            PriceSpanPolicy::Literal => Label::Inside(price),
            PriceSpanPolicy::Tracked => match prev.and_then(|l| l.category()) {
                Some(EntityCategory::Price) => Label::Inside(price),
                _ => Label::Begin(price),
            },
        }
    }
}

/// Dígitos, com separadores `.`/`,` apenas entre dígitos (ex: "500", "1,500").
fn is_numeric(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let (Some(first), Some(last)) = (chars.first(), chars.last()) else {
        return false;
    };
    first.is_numeric()
        && last.is_numeric()
        && chars.iter().all(|c| c.is_numeric() || *c == '.' || *c == ',')
        && !chars.windows(2).any(|w| !w[0].is_numeric() && !w[1].is_numeric())
}

/// Token não vazio sem nenhum caractere de palavra (ex: "$", "…").
fn is_punctuation(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(is_word_char)
}
