//! # Tabela de Palavras-Chave (Gazetteers)
//!
//! Listas curadas de termos que alimentam o classificador por regras:
//! locais, produtos, marcadores de preço e marcadores de moeda.
//!
//! A tabela é construída uma vez, validada e depois só lida: o classificador
//! recebe uma referência imutável e todas as mensagens de um lote a compartilham.
//! As listas vêm da configuração (ver `config/amner.toml`), então podem ser
//! estendidas sem mudar código.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::NerError;

/// Política de casamento das listas de local e produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// **Exato**: o token precisa ser igual a um termo da lista.
    #[default]
    Exact,
    /// **Substring**: basta o token conter um termo (ex: "ቦሌመድሃኒዓለም" contém "ቦሌ").
    Substring,
}

/// Forma serializada da tabela: listas simples, como aparecem no TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordLists {
    pub location_terms: Vec<String>,
    pub product_terms: Vec<String>,
    pub price_markers: Vec<String>,
    #[serde(default = "default_currency_markers")]
    pub currency_markers: Vec<String>,
}

fn default_currency_markers() -> Vec<String> {
    vec!["ብር".to_string()]
}

/// Tabela de palavras-chave validada.
///
/// - `location_terms`, `product_terms`, `price_markers`: casamento por pertinência.
/// - `currency_markers`: palavras/símbolos de moeda. Um token que termina com um
///   deles é preço, e um número seguido exatamente por um deles também.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "KeywordLists", into = "KeywordLists")]
pub struct KeywordTable {
    location_terms: BTreeSet<String>,
    product_terms: BTreeSet<String>,
    price_markers: BTreeSet<String>,
    currency_markers: BTreeSet<String>,
}

impl KeywordTable {
    /// Constrói e valida a tabela.
    ///
    /// Termos são aparados e deduplicados. Listas de local, produto ou preço
    /// vazias resultam em [`NerError::Config`].
    pub fn new<I, S>(
        location_terms: I,
        product_terms: I,
        price_markers: I,
        currency_markers: I,
    ) -> Result<Self, NerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = Self {
            location_terms: clean_terms(location_terms),
            product_terms: clean_terms(product_terms),
            price_markers: clean_terms(price_markers),
            currency_markers: clean_terms(currency_markers),
        };

        for (name, terms) in [
            ("location_terms", &table.location_terms),
            ("product_terms", &table.product_terms),
            ("price_markers", &table.price_markers),
        ] {
            if terms.is_empty() {
                return Err(NerError::Config(format!("a lista `{name}` está vazia")));
            }
        }
        if table.currency_markers.is_empty() {
            tracing::warn!(
                "currency_markers vazia: regras de sufixo e lookahead de preço ficam inativas"
            );
        }

        Ok(table)
    }

    /// Listas curadas para anúncios de lojas em canais do Telegram etíopes.
    pub fn amharic_default() -> Self {
        Self {
            location_terms: clean_terms([
                "አዲስ", "አበባ", "ድሬዳዋ", "የታይላንድ", "ቦሌ", "ቡልጋሪ", "ቁ2ፒያሳ", "ቁ1መገናኛ", "በረራ", "ልደታ",
                "ባልቻ", "አአ", "ፒያሳ", "መገናኛ", "ጀሞ", "ገርጂ", "ጉርድሾላ", "ሜክሲኮ", "22", "4ኪሎ", "አዳማ",
            ]),
            product_terms: clean_terms([
                "ምርት",
                "የጫማ",
                "ሳጥን",
                "ምንጣፍ",
                "ጎማ",
                "ቁም",
                "ማስቀመጫ",
                "ፕላሰሰቲክ",
                "ባልዲ",
                "ኮምፒውተር",
                "ስቶቭ",
                "ማንኪያ",
                "የችበስመጥበሻ",
                "ጫማዎች",
                "ጫማ",
                "እስቲመር",
                "መኪና",
                "መጥበሻ",
                "መጥበሻዎች",
                "ምርቶች",
                "ባትራ",
                "ካርድ",
                "መፍጫ",
                "ማሞቂያ",
                "መወልወያ",
                "መደርደሪያ",
                "መስታወት",
                "እንጨት",
                "ሶፋ",
                "ኩርሲ",
            ]),
            price_markers: clean_terms(["ዋጋ", "ብር", "ከ"]),
            currency_markers: clean_terms(default_currency_markers()),
        }
    }

    /// O token (aparado) é um local conhecido, segundo o modo de casamento.
    pub fn is_location(&self, token: &str, mode: MatchingMode) -> bool {
        matches_terms(&self.location_terms, token.trim(), mode)
    }

    /// O token (aparado) é um produto conhecido, segundo o modo de casamento.
    pub fn is_product(&self, token: &str, mode: MatchingMode) -> bool {
        matches_terms(&self.product_terms, token.trim(), mode)
    }

    /// Pertinência exata em `price_markers` ou `currency_markers`.
    pub fn is_price_marker(&self, token: &str) -> bool {
        let token = token.trim();
        self.price_markers.contains(token) || self.currency_markers.contains(token)
    }

    /// O token é exatamente um marcador de moeda (ex: "ብር").
    pub fn is_currency(&self, token: &str) -> bool {
        self.currency_markers.contains(token.trim())
    }

    /// O token termina com um marcador de moeda (ex: "100ብር").
    pub fn ends_with_currency(&self, token: &str) -> bool {
        let token = token.trim();
        self.currency_markers.iter().any(|m| token.ends_with(m.as_str()))
    }

    pub fn currency_markers(&self) -> impl Iterator<Item = &str> {
        self.currency_markers.iter().map(String::as_str)
    }

    /// Caracteres de pontuação que fazem parte de algum marcador de preço ou moeda
    /// (ex: `$` em "$", `.` em "ብር."). O tokenizador não pode descartá-los.
    pub fn price_symbols(&self) -> BTreeSet<char> {
        self.price_markers
            .iter()
            .chain(&self.currency_markers)
            .flat_map(|m| m.chars())
            .filter(|c| !is_word_char(*c) && !c.is_whitespace())
            .collect()
    }

    pub fn location_count(&self) -> usize {
        self.location_terms.len()
    }

    pub fn product_count(&self) -> usize {
        self.product_terms.len()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::amharic_default()
    }
}

impl TryFrom<KeywordLists> for KeywordTable {
    type Error = NerError;

    fn try_from(lists: KeywordLists) -> Result<Self, Self::Error> {
        Self::new(
            lists.location_terms,
            lists.product_terms,
            lists.price_markers,
            lists.currency_markers,
        )
    }
}

impl From<KeywordTable> for KeywordLists {
    fn from(table: KeywordTable) -> Self {
        Self {
            location_terms: table.location_terms.into_iter().collect(),
            product_terms: table.product_terms.into_iter().collect(),
            price_markers: table.price_markers.into_iter().collect(),
            currency_markers: table.currency_markers.into_iter().collect(),
        }
    }
}

/// Caractere de "palavra" no sentido de `\w`: letras, dígitos, marcas e `_`.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || is_combining_mark(c)
}

fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}' | '\u{135D}'..='\u{135F}')
}

fn clean_terms<I, S>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn matches_terms(terms: &BTreeSet<String>, token: &str, mode: MatchingMode) -> bool {
    if token.is_empty() {
        return false;
    }
    match mode {
        MatchingMode::Exact => terms.contains(token),
        MatchingMode::Substring => terms.iter().any(|t| token.contains(t.as_str())),
    }
}
