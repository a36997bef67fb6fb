//! # Tokenizador para Mensagens em Amárico
//!
//! Divide o texto normalizado em tokens separados por espaço, na ordem de leitura.
//! Cada token guarda sua posição (`index`) e o intervalo de bytes que cobre no texto.
//!
//! ## Pontuação
//!
//! A pontuação é descartada **sem** virar separador (ex: "ቦሌ/መገናኛ" → "ቦሌመገናኛ"),
//! exceto quando carrega informação de preço:
//!
//! - separador decimal/milhar entre dígitos: "1,500" e "2.5" ficam intactos;
//! - símbolos que fazem parte de um marcador de preço configurado (ex: `$`).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use amner_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("ዋጋ፦ 1,500 ብር።");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["ዋጋ", "1,500", "ብር"]);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::keywords::{is_word_char, KeywordTable};

/// Um token extraído do texto normalizado.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Superfície do token, já sem a pontuação descartada.
    pub text: String,
    /// Índice de byte inicial no texto normalizado (inclusive).
    pub start: usize,
    /// Índice de byte final no texto normalizado (exclusivo).
    pub end: usize,
    /// Posição do token na mensagem (0, 1, 2...).
    pub index: usize,
}

/// Configuração do tokenizador.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Símbolos não-palavra que devem sobreviver (vindos dos marcadores de preço).
    pub price_symbols: BTreeSet<char>,
}

impl TokenizerConfig {
    pub fn from_keywords(keywords: &KeywordTable) -> Self {
        Self {
            price_symbols: keywords.price_symbols(),
        }
    }
}

/// Tokeniza um texto preservando apenas separadores decimais.
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with(text, &TokenizerConfig::default())
}

/// Tokeniza um texto com a configuração dada.
///
/// Texto vazio (ou só pontuação) produz uma sequência vazia.
pub fn tokenize_with(text: &str, config: &TokenizerConfig) -> Vec<Token> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut end = 0;

    for (i, &(byte_pos, ch)) in chars.iter().enumerate() {
        if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current, start, end);
            continue;
        }

        let keep = is_word_char(ch)
            || config.price_symbols.contains(&ch)
            || is_digit_separator(&chars, i);
        if !keep {
            continue;
        }

        if current.is_empty() {
            start = byte_pos;
        }
        current.push(ch);
        end = byte_pos + ch.len_utf8();
    }
    flush_token(&mut tokens, &mut current, start, end);

    tokens
}

/// `.` ou `,` entre dois dígitos (ex: "1,500", "2.5").
fn is_digit_separator(chars: &[(usize, char)], i: usize) -> bool {
    let (_, ch) = chars[i];
    if ch != '.' && ch != ',' {
        return false;
    }
    let prev_is_digit = i
        .checked_sub(1)
        .and_then(|p| chars.get(p))
        .is_some_and(|(_, c)| c.is_numeric());
    let next_is_digit = chars.get(i + 1).is_some_and(|(_, c)| c.is_numeric());
    prev_is_digit && next_is_digit
}

/// Fecha o token acumulado e adiciona à lista (se não vazio)
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize) {
    if !text.is_empty() {
        let index = tokens.len();
        tokens.push(Token {
            text: std::mem::take(text),
            start,
            end,
            index,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_whitespace() {
        let tokens = tokenize("ጫማ  500\tብር\nቦሌ");
        assert_eq!(texts(&tokens), vec!["ጫማ", "500", "ብር", "ቦሌ"]);
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.index, i);
        }
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n ").is_empty());
        assert!(tokenize("። ፣ !!").is_empty());
    }

    #[test]
    fn test_punctuation_is_discarded_without_splitting() {
        let tokens = tokenize("ቦሌ/መገናኛ, (ሶፋ)።");
        assert_eq!(texts(&tokens), vec!["ቦሌመገናኛ", "ሶፋ"]);
    }

    #[test]
    fn test_decimal_separators_survive() {
        let tokens = tokenize("1,500 2.5 ብር. 3, 4");
        assert_eq!(texts(&tokens), vec!["1,500", "2.5", "ብር", "3", "4"]);
    }

    #[test]
    fn test_price_symbols_survive() {
        let config = TokenizerConfig {
            price_symbols: ['$'].into_iter().collect(),
        };
        let tokens = tokenize_with("$ 20$ #ጫማ", &config);
        assert_eq!(texts(&tokens), vec!["$", "20$", "ጫማ"]);
        // Sem configuração o símbolo some
        assert_eq!(texts(&tokenize("$ 20$")), vec!["20"]);
    }

    #[test]
    fn test_offsets_map_back_to_text() {
        let text = "ዋጋ፦ 1,500 ብር";
        let tokens = tokenize(text);
        assert_eq!(&text[tokens[1].start..tokens[1].end], "1,500");
        assert_eq!(&text[tokens[2].start..tokens[2].end], "ብር");
        // "ዋጋ፦": o intervalo cobre só os caracteres mantidos
        assert_eq!(&text[tokens[0].start..tokens[0].end], "ዋጋ");
    }

    #[test]
    fn test_deterministic() {
        let text = "ከ 4ኪሎ እስከ ፒያሳ 1,200ብር";
        assert_eq!(tokenize(text), tokenize(text));
    }
}
