//! # Normalizador de Texto
//!
//! Remove ruído das mensagens antes da tokenização:
//!
//! - **Emojis e pictogramas**: removidos por faixa Unicode. A remoção é feita por
//!   *grapheme cluster* (`unicode-segmentation`): um cluster que começa com emoji sai
//!   inteiro, junto com modificadores de tom de pele, ZWJ e seletores de variação.
//! - **Palavras latinas** (opcional): palavras formadas só por letras latinas são
//!   tratadas como ruído estrangeiro num corpus em escrita ge'ez.
//!
//! A normalização nunca mexe nos espaços que separam palavras, é pura e idempotente:
//! `normalize(normalize(x)) == normalize(x)`.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::keywords::is_word_char;

/// Opções do normalizador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Remove palavras compostas apenas por letras latinas (variante estendida).
    #[serde(default)]
    pub strip_latin: bool,
}

/// Remove emojis do texto (variante básica).
pub fn normalize(text: &str) -> String {
    normalize_with(text, &NormalizerConfig::default())
}

/// Normaliza o texto com as opções dadas.
///
/// Texto vazio, ou que após a limpeza não tenha nenhum caractere de palavra
/// (só símbolos e espaços), resulta em string vazia.
pub fn normalize_with(text: &str, config: &NormalizerConfig) -> String {
    let mut cleaned = strip_emojis(text);
    if config.strip_latin {
        cleaned = strip_latin_words(&cleaned);
    }

    if cleaned.chars().any(is_word_char) {
        cleaned
    } else {
        String::new()
    }
}

fn strip_emojis(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for grapheme in text.graphemes(true) {
        let starts_with_emoji = grapheme.chars().next().is_some_and(is_emoji);
        if starts_with_emoji {
            continue;
        }
        // Ex: keycap "1️⃣" mantém o dígito e perde o seletor e o keycap
        out.extend(grapheme.chars().filter(|c| !is_emoji(*c)));
    }
    out
}

/// Remove palavras formadas só por letras latinas. A palavra é o trecho contínuo
/// de caracteres de palavra: pontuação e espaços ao redor ficam intactos
/// (ex: "Price: ሶፋ" → ": ሶፋ").
fn strip_latin_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    for ch in text.chars() {
        if is_word_char(ch) {
            word.push(ch);
        } else {
            flush_word(&mut out, &mut word);
            out.push(ch);
        }
    }
    flush_word(&mut out, &mut word);
    out
}

fn flush_word(out: &mut String, word: &mut String) {
    if !word.chars().all(is_latin_letter) {
        out.push_str(word);
    }
    word.clear();
}

fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || (c.is_alphabetic()
            && matches!(c,
                '\u{00C0}'..='\u{024F}'   // Latin-1 Supplement + Extended-A/B
                | '\u{1E00}'..='\u{1EFF}' // Latin Extended Additional
                | '\u{FF21}'..='\u{FF3A}' // letras latinas de largura total
                | '\u{FF41}'..='\u{FF5A}'))
}

/// Faixas de emojis, pictogramas e caracteres de composição de emoji.
fn is_emoji(c: char) -> bool {
    matches!(c,
        '\u{1F600}'..='\u{1F64F}'   // emoticons
        | '\u{1F300}'..='\u{1F5FF}' // símbolos e pictogramas (inclui tons de pele)
        | '\u{1F680}'..='\u{1F6FF}' // transporte e mapas
        | '\u{1F700}'..='\u{1F77F}' // símbolos alquímicos
        | '\u{1F780}'..='\u{1F7FF}' // formas geométricas estendidas
        | '\u{1F900}'..='\u{1F9FF}' // símbolos e pictogramas suplementares
        | '\u{1FA00}'..='\u{1FA6F}' // símbolos de xadrez
        | '\u{1FA70}'..='\u{1FAFF}' // pictogramas estendidos A
        | '\u{1F170}'..='\u{1F251}' // alfanuméricos fechados, inclui indicadores regionais
        | '\u{2600}'..='\u{26FF}'   // símbolos diversos
        | '\u{2702}'..='\u{27B0}'   // dingbats
        | '\u{24C2}'
        | '\u{2B50}' | '\u{2B55}'
        | '\u{200D}'                // zero width joiner
        | '\u{20E3}'                // keycap
        | '\u{FE0E}'..='\u{FE0F}'   // seletores de variação
        | '\u{E0020}'..='\u{E007F}' // tags (bandeiras de subdivisões)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATIN: NormalizerConfig = NormalizerConfig { strip_latin: true };

    #[test]
    fn test_removes_emojis() {
        assert_eq!(normalize("ጫማ 😀 500 ብር 🔥"), "ጫማ  500 ብር ");
        assert_eq!(normalize("ቦሌ👍🏽"), "ቦሌ");
        // Sequência ZWJ sai inteira
        assert_eq!(normalize("ሶፋ 👨\u{200D}👩\u{200D}👧"), "ሶፋ ");
        assert_eq!(normalize("1\u{FE0F}\u{20E3} ዋጋ"), "1 ዋጋ");
        assert_eq!(normalize("አዲስ 🇪🇹 አበባ"), "አዲስ  አበባ");
    }

    #[test]
    fn test_keeps_ethiopic_and_whitespace() {
        let text = "ዋጋ፦ 1,500 ብር\nአድራሻ፡ መገናኛ";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_empty_and_symbolic_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("😀😀 🔥"), "");
        assert_eq!(normalize("!!! ..."), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_strip_latin_words() {
        assert_eq!(normalize_with("Sale ጫማ now 500 ብር", &LATIN), " ጫማ  500 ብር");
        // Palavras mistas ou com dígitos ficam
        assert_eq!(normalize_with("iPhone12 ሶፋ café", &LATIN), "iPhone12 ሶፋ ");
        assert_eq!(normalize_with("only latin words", &LATIN), "");
        // Pontuação colada não protege a palavra latina
        assert_eq!(normalize_with("Price: ሶፋ, Call now! ቦሌ", &LATIN), ": ሶፋ,  ! ቦሌ");
        assert_eq!(normalize_with("Price: ሶፋ (New) ቦሌ", &LATIN), ": ሶፋ () ቦሌ");
        // Sem a opção, o latim é preservado
        assert_eq!(normalize("Sale ጫማ"), "Sale ጫማ");
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "ጫማ 😀 500 ብር",
            "sale😀 ቦሌ",
            "Hello, ዋጋ 👍🏽 100ብር!",
            "1\u{FE0F}\u{20E3} 🔥 ok",
            "",
            "🔥",
            "  ፒያሳ  \t መገናኛ ",
            "Price: ሶፋ, Call now! ቦሌ",
        ];
        for config in [NormalizerConfig::default(), LATIN] {
            for sample in samples {
                let once = normalize_with(sample, &config);
                assert_eq!(normalize_with(&once, &config), once, "entrada: {sample:?}");
            }
        }
    }
}
