//! # Exportação e Leitura no Formato CoNLL
//!
//! Cada token vira uma linha `token<espaço>rótulo`; cada mensagem termina com
//! uma linha em branco, inclusive a última. Uma mensagem sem tokens gera só a
//! linha em branco, então o número de blocos sempre bate com o de mensagens.
//!
//! ```text
//! የጫማ B-PRODUCT
//! ዋጋ I-PRICE
//! 500 I-PRICE
//! ብር I-PRICE
//!
//!
//! ቦሌ B-LOC
//!
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{NerError, Result};
use crate::tagger::{Label, LabeledSequence, LabeledToken};
use crate::tokenizer::Token;

/// Pares `(token, rótulo)` de um bloco lido de um arquivo CoNLL.
pub type ConllSentence = Vec<(String, Label)>;

/// Escreve as sequências no destino, em UTF-8.
pub fn export<W: Write>(sequences: &[LabeledSequence], sink: &mut W) -> Result<()> {
    for sequence in sequences {
        for lt in &sequence.tokens {
            writeln!(sink, "{} {}", lt.token.text, lt.label)?;
        }
        writeln!(sink)?;
    }
    sink.flush()?;
    Ok(())
}

/// Escreve as sequências num arquivo, substituindo todo o conteúdo anterior.
pub fn export_to_file(sequences: &[LabeledSequence], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    export(sequences, &mut writer)?;
    tracing::info!(path = %path.display(), sequences = sequences.len(), "arquivo CoNLL gravado");
    Ok(())
}

/// Lê blocos CoNLL separados por linha em branco.
///
/// Cada linha em branco fecha um bloco, mesmo vazio. Um último bloco sem a
/// linha em branco final também é aceito.
pub fn read_conll<R: BufRead>(reader: R) -> Result<Vec<ConllSentence>> {
    let mut sentences = Vec::new();
    let mut current: ConllSentence = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');

        if line.trim().is_empty() {
            sentences.push(std::mem::take(&mut current));
            continue;
        }

        let parsed = line
            .rsplit_once(' ')
            .filter(|(token, _)| !token.is_empty())
            .and_then(|(token, label)| Some((token.to_string(), Label::from_label(label)?)));
        match parsed {
            Some(pair) => current.push(pair),
            None => {
                return Err(NerError::ConllParse {
                    line: n + 1,
                    content: line.to_string(),
                })
            }
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }
    Ok(sentences)
}

pub fn read_conll_file(path: impl AsRef<Path>) -> Result<Vec<ConllSentence>> {
    read_conll(BufReader::new(File::open(path)?))
}

/// Converte uma sequência rotulada nos pares que o leitor devolve.
pub fn to_sentence(sequence: &LabeledSequence) -> ConllSentence {
    sequence
        .tokens
        .iter()
        .map(|lt| (lt.token.text.clone(), lt.label))
        .collect()
}

/// Reconstrói uma sequência rotulada a partir de um bloco lido.
///
/// Os offsets dos tokens referem-se ao texto com os tokens unidos por um espaço.
pub fn into_sequence(message_id: impl Into<String>, sentence: ConllSentence) -> LabeledSequence {
    let mut offset = 0;
    let tokens = sentence
        .into_iter()
        .enumerate()
        .map(|(index, (text, label))| {
            let start = offset;
            let end = start + text.len();
            offset = end + 1;
            LabeledToken {
                token: Token {
                    text,
                    start,
                    end,
                    index,
                },
                label,
            }
        })
        .collect();
    LabeledSequence::new(message_id, tokens)
}
