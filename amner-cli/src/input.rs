//! Leitura e limpeza do CSV produzido pelo coletor do Telegram.
//!
//! Colunas esperadas: `Channel Title, Channel Username, ID, Message, Date, Media Path`.
//! Só `Message` e `ID` importam para a anotação; as demais são preservadas na limpeza.

use std::io::{Read, Write};

use amner_core::normalizer::{normalize_with, NormalizerConfig};
use amner_core::Message;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

const MESSAGE_COLUMN: &str = "Message";

/// Uma linha do CSV do coletor.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "Channel Title", default)]
    pub channel_title: Option<String>,
    #[serde(rename = "Channel Username", default)]
    pub channel_username: Option<String>,
    #[serde(rename = "ID", default)]
    pub id: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Media Path", default)]
    pub media_path: Option<String>,
}

impl MessageRecord {
    /// Converte para [`Message`]. `row` identifica a linha quando falta o `ID`.
    pub fn into_message(self, row: usize) -> Message {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("linha-{row}"));
        let timestamp = self.date.as_deref().and_then(|raw| {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                warn!(id = %id, date = raw, "data não reconhecida");
            }
            parsed
        });

        Message {
            text: self.message.filter(|m| !m.trim().is_empty()),
            source: self
                .channel_username
                .or(self.channel_title)
                .unwrap_or_default(),
            timestamp,
            id,
        }
    }
}

/// Lê as mensagens na ordem do arquivo.
///
/// Uma linha que não pode ser interpretada vira uma mensagem sem texto, para que
/// o rotulador a conte como pulada sem quebrar o alinhamento das demais.
pub fn read_messages<R: Read>(reader: R) -> Result<Vec<Message>> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv.headers().context("CSV sem cabeçalho")?.clone();

    let mut messages = Vec::new();
    for (i, record) in csv.records().enumerate() {
        let row = i + 1;
        let message = match record {
            Ok(record) => match record.deserialize::<MessageRecord>(Some(&headers)) {
                Ok(parsed) => parsed.into_message(row),
                Err(e) => {
                    warn!(row, "linha ignorada: {e}");
                    unreadable_row(row)
                }
            },
            Err(e) => {
                warn!(row, "linha ignorada: {e}");
                unreadable_row(row)
            }
        };
        messages.push(message);
    }
    Ok(messages)
}

fn unreadable_row(row: usize) -> Message {
    Message {
        id: format!("linha-{row}"),
        text: None,
        source: String::new(),
        timestamp: None,
    }
}

/// Resultado de [`clean_messages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanSummary {
    pub read: usize,
    /// Linhas sem `Message`.
    pub dropped: usize,
    /// Linhas que o leitor CSV rejeitou (ex: UTF-8 inválido); ficam de fora da saída.
    pub unreadable: usize,
    pub written: usize,
}

/// Remove linhas sem `Message` e normaliza a coluna, mantendo todas as outras.
///
/// Uma linha ilegível é registrada e descartada sem interromper o arquivo.
pub fn clean_messages<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &NormalizerConfig,
) -> Result<CleanSummary> {
    let mut csv_in = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_in.headers().context("CSV sem cabeçalho")?.clone();
    let message_idx = headers
        .iter()
        .position(|h| h == MESSAGE_COLUMN)
        .with_context(|| format!("coluna `{MESSAGE_COLUMN}` não encontrada"))?;

    let mut csv_out = csv::Writer::from_writer(writer);
    csv_out.write_record(&headers)?;

    let mut summary = CleanSummary::default();
    for (i, record) in csv_in.records().enumerate() {
        summary.read += 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(row = i + 1, "linha ignorada: {e}");
                summary.unreadable += 1;
                continue;
            }
        };

        let message = record.get(message_idx).unwrap_or_default();
        if message.trim().is_empty() {
            summary.dropped += 1;
            continue;
        }

        let cleaned = normalize_with(message, config);
        let row: Vec<&str> = record
            .iter()
            .enumerate()
            .map(|(i, field)| if i == message_idx { cleaned.as_str() } else { field })
            .collect();
        csv_out.write_record(&row)?;
        summary.written += 1;
    }
    csv_out.flush()?;

    Ok(summary)
}

/// Aceita o formato do pandas (`2024-09-21 10:04:59+00:00`), RFC 3339 ou data sem fuso (UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const RAW: &str = "\
Channel Title,Channel Username,ID,Message,Date,Media Path
Shager Store,@Shageronlinestore,101,ጫማ 😀 ዋጋ 500 ብር,2024-09-21 10:04:59+00:00,data/raw/media/@Shageronlinestore_101
Shager Store,@Shageronlinestore,102,,2024-09-21 11:00:00+00:00,data/raw/media/@Shageronlinestore_102
Shager Store,@Shageronlinestore,103,\"Sale ሶፋ, ቦሌ\",ontem,
";

    #[test]
    fn test_read_messages() {
        let messages = read_messages(RAW.as_bytes()).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].id, "101");
        assert_eq!(messages[0].source, "@Shageronlinestore");
        assert_eq!(messages[0].text.as_deref(), Some("ጫማ 😀 ዋጋ 500 ብር"));
        assert_eq!(messages[0].timestamp.map(|t| t.hour()), Some(10));
        // Mensagem vazia vira texto ausente
        assert_eq!(messages[1].text, None);
        // Data inválida não derruba a linha
        assert_eq!(messages[2].timestamp, None);
        assert_eq!(messages[2].text.as_deref(), Some("Sale ሶፋ, ቦሌ"));
    }

    #[test]
    fn test_missing_id_uses_row_number() {
        let raw = "Message\nሶፋ\n";
        let messages = read_messages(raw.as_bytes()).unwrap();
        assert_eq!(messages[0].id, "linha-1");
        assert_eq!(messages[0].source, "");
    }

    #[test]
    fn test_clean_messages() {
        let mut out = Vec::new();
        let summary = clean_messages(
            RAW.as_bytes(),
            &mut out,
            &NormalizerConfig { strip_latin: true },
        )
        .unwrap();
        assert_eq!(
            summary,
            CleanSummary {
                read: 3,
                dropped: 1,
                unreadable: 0,
                written: 2
            }
        );

        let cleaned = read_messages(out.as_slice()).unwrap();
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].text.as_deref(), Some("ጫማ  ዋጋ 500 ብር"));
        assert_eq!(cleaned[1].id, "103");
        assert_eq!(cleaned[1].text.as_deref(), Some(" ሶፋ, ቦሌ"));
    }

    #[test]
    fn test_clean_skips_unreadable_rows() {
        let raw: &[u8] = b"ID,Message\n1,\xe1\x88\x80\n2,\xff\xfe bad\n3,\xe1\x88\x80\n";
        let mut out = Vec::new();
        let summary = clean_messages(raw, &mut out, &NormalizerConfig::default()).unwrap();
        assert_eq!(
            summary,
            CleanSummary {
                read: 3,
                dropped: 0,
                unreadable: 1,
                written: 2
            }
        );
        assert_eq!(String::from_utf8(out).unwrap(), "ID,Message\n1,ሀ\n3,ሀ\n");
        assert_eq!(read_messages(raw).unwrap().len(), 3);
    }

    #[test]
    fn test_clean_requires_message_column() {
        let err = clean_messages(
            "ID,Text\n1,ሶፋ\n".as_bytes(),
            Vec::<u8>::new(),
            &NormalizerConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Message"));
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-09-21 10:04:59+03:00").is_some_and(|d| d.hour() == 7));
        assert!(parse_date("2024-09-21T10:04:59Z").is_some());
        assert!(parse_date("2024-09-21 10:04:59").is_some_and(|d| d.day() == 21));
        assert!(parse_date("ontem").is_none());
    }
}
