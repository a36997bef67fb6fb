//! # Esquema de Rótulos BIO e Tipos de Entidade
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) usado para
//! rotular tokens das mensagens de comércio em amárico.
//!
//! ## Categorias de Entidades
//!
//! | Prefixo  | Significado | Exemplos             |
//! |----------|-------------|----------------------|
//! | PRICE    | Preço       | ዋጋ, 500, ብር          |
//! | LOC      | Local       | ቦሌ, መገናኛ, አዳማ      |
//! | PRODUCT  | Produto     | ጫማ, ሶፋ, መጥበሻ       |
//! | O        | Fora        | (qualquer outra palavra) |
//!
//! ## Esquema BIO
//!
//! - `B-TAG`: Begin — primeiro token de uma entidade
//! - `I-TAG`: Inside — tokens subsequentes da mesma entidade
//! - `O`: Outside — não é parte de nenhuma entidade

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

/// Categorias de entidade produzidas pelo anotador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityCategory {
    /// **Preço**: valores, moeda e palavras como "ዋጋ" (preço).
    Price,
    /// **Local**: bairros e cidades onde a loja atende. Ex: "ቦሌ", "ፒያሳ".
    Loc,
    /// **Produto**: o item anunciado. Ex: "ጫማ" (sapato), "ሶፋ" (sofá).
    Product,
}

impl EntityCategory {
    /// Nome da categoria como aparece no arquivo CoNLL
    pub fn name(&self) -> &'static str {
        match self {
            EntityCategory::Price => "PRICE",
            EntityCategory::Loc => "LOC",
            EntityCategory::Product => "PRODUCT",
        }
    }

    /// Tenta parsear a partir do nome (ex: "LOC" → Some(Loc))
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "PRICE" => Some(EntityCategory::Price),
            "LOC" => Some(EntityCategory::Loc),
            "PRODUCT" => Some(EntityCategory::Product),
            _ => None,
        }
    }
}

/// Rótulo BIO aplicado a um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// **Begin**: início de uma entidade. Ex: **ቦሌ** (B-LOC).
    Begin(EntityCategory),
    /// **Inside**: continuação de uma entidade. Ex: 500 **ብር** (I-PRICE).
    Inside(EntityCategory),
    /// **Outside**: o token não faz parte de nenhuma entidade.
    Outside,
}

impl Label {
    /// Representação textual (ex: "B-PRICE", "I-LOC", "O")
    pub fn label(&self) -> String {
        match self {
            Label::Begin(cat) => format!("B-{}", cat.name()),
            Label::Inside(cat) => format!("I-{}", cat.name()),
            Label::Outside => "O".to_string(),
        }
    }

    /// Retorna a categoria deste rótulo (se for B- ou I-)
    pub fn category(&self) -> Option<EntityCategory> {
        match self {
            Label::Begin(c) | Label::Inside(c) => Some(*c),
            Label::Outside => None,
        }
    }

    /// Verifica se a transição `prev → next` é válida no esquema BIO
    ///
    /// - `I-X` só pode seguir `B-X` ou `I-X` (mesma categoria)
    /// - `B-X` e `O` podem seguir qualquer rótulo
    pub fn is_valid_transition(prev: &Label, next: &Label) -> bool {
        match next {
            Label::Inside(cat) => match prev {
                Label::Begin(prev_cat) | Label::Inside(prev_cat) => prev_cat == cat,
                Label::Outside => false,
            },
            _ => true,
        }
    }

    /// Parseia um rótulo a partir de string (ex: "B-LOC" → Begin(Loc))
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(Label::Outside);
        }
        let (prefix, name) = s.split_once('-')?;
        let cat = EntityCategory::from_name(name)?;
        match prefix {
            "B" => Some(Label::Begin(cat)),
            "I" => Some(Label::Inside(cat)),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Um token com seu rótulo BIO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledToken {
    pub token: Token,
    pub label: Label,
}

/// Sequência rotulada de uma mensagem, na ordem original dos tokens.
///
/// Uma mensagem vazia (após normalização) gera uma sequência vazia, mas ainda
/// gera uma sequência: o alinhamento com a tabela de entrada depende disso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSequence {
    /// Identificador da mensagem de origem
    pub message_id: String,
    pub tokens: Vec<LabeledToken>,
}

impl LabeledSequence {
    pub fn new(message_id: impl Into<String>, tokens: Vec<LabeledToken>) -> Self {
        Self {
            message_id: message_id.into(),
            tokens,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.tokens.iter().map(|t| t.label).collect()
    }

    pub fn spans(&self) -> Vec<EntitySpan> {
        tokens_to_spans(&self.tokens)
    }

    pub fn violations(&self) -> Vec<usize> {
        bio_violations(&self.labels())
    }
}

/// Uma entidade reconstruída a partir dos rótulos BIO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Superfícies dos tokens unidas por espaço (ex: "500 ብር")
    pub text: String,
    pub category: EntityCategory,
    /// Índice do primeiro token
    pub start_token: usize,
    /// Índice do último token (inclusivo)
    pub end_token: usize,
}

/// Converte uma sequência rotulada (BIO) em spans de entidades.
///
/// Máquina de estados do esquema BIO:
/// - `B-X` inicia uma nova entidade.
/// - `I-X` continua a entidade aberta se ela for da **mesma** categoria.
/// - `I-X` sem entidade aberta da mesma categoria também abre uma entidade
///   (convenção do conlleval). A regra literal de preço produz esse caso.
/// - `O` fecha a entidade aberta.
///
/// # Exemplo
/// `[B-PRICE, I-PRICE, O, B-LOC]` -> `[EntitySpan(PRICE), EntitySpan(LOC)]`
pub fn tokens_to_spans(tagged: &[LabeledToken]) -> Vec<EntitySpan> {
    let mut spans: Vec<EntitySpan> = Vec::new();
    let mut open: Option<EntityCategory> = None;

    for (i, lt) in tagged.iter().enumerate() {
        match lt.label {
            Label::Inside(cat) if open == Some(cat) => {
                if let Some(span) = spans.last_mut() {
                    span.text.push(' ');
                    span.text.push_str(&lt.token.text);
                    span.end_token = i;
                }
            }
            Label::Begin(cat) | Label::Inside(cat) => {
                spans.push(EntitySpan {
                    text: lt.token.text.clone(),
                    category: cat,
                    start_token: i,
                    end_token: i,
                });
                open = Some(cat);
            }
            Label::Outside => open = None,
        }
    }

    spans
}

/// Posições que quebram a validade BIO: um `I-X` na posição 0, ou
/// precedido por `O` ou por rótulo de outra categoria.
pub fn bio_violations(labels: &[Label]) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(i, label)| match label {
            Label::Inside(_) => match i.checked_sub(1) {
                None => true,
                Some(prev) => !Label::is_valid_transition(&labels[prev], label),
            },
            _ => false,
        })
        .map(|(i, _)| i)
        .collect()
}
