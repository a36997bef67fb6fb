//! # Erros do pipeline de anotação
//!
//! Taxonomia usada pelo crate:
//!
//! - **Configuração** (`Config`, `ConfigFile`, `ConfigParse`): fatais na inicialização.
//!   Uma tabela de palavras-chave vazia faria o classificador rotular tudo como `O`
//!   sem que ninguém percebesse.
//! - **Entrada** (`Input`): mensagem malformada (ex: texto ausente). Recuperada localmente
//!   pelo [`CorpusLabeler`](crate::pipeline::CorpusLabeler), que trata a mensagem como texto vazio.
//! - **E/S** (`Io`, `ConllParse`): propagados ao chamador, sem nova tentativa interna.

use std::path::PathBuf;

use thiserror::Error;

/// Erros que podem ocorrer durante a anotação e exportação.
#[derive(Debug, Error)]
pub enum NerError {
    /// Tabela de palavras-chave ausente ou vazia.
    #[error("configuração inválida: {0}")]
    Config(String),

    /// Arquivo de configuração não pôde ser lido.
    #[error("falha ao ler o arquivo de configuração {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Arquivo de configuração com TOML inválido.
    #[error("falha ao interpretar o arquivo de configuração {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Mensagem com campo obrigatório ausente ou malformado.
    #[error("mensagem {id}: {reason}")]
    Input { id: String, reason: String },

    /// Linha CoNLL que não segue o formato `token rótulo`.
    #[error("linha CoNLL {line} malformada: {content:?}")]
    ConllParse { line: usize, content: String },

    /// Padrão de preço montado a partir dos marcadores não compilou.
    #[error("erro ao compilar padrão de preço: {0}")]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Alias de `Result` para as operações do crate.
pub type Result<T> = std::result::Result<T, NerError>;
