//! # Configuração
//!
//! Lida uma única vez na inicialização. Cada opção aceita flag de linha de
//! comando ou variável de ambiente (um `.env` no diretório atual é
//! carregado antes, via `dotenvy`):
//!
//! | Flag | Env | Padrão |
//! |------|-----|--------|
//! | `--host` | `HOST` | `0.0.0.0` |
//! | `--port` | `PORT` | `5000` |
//! | `--categories` | `CATEGORIES` | nove categorias financeiras |
//! | `--hf-model` | `HF_MODEL` | `joeddav/xlm-roberta-large-xnli` |
//! | `--max-upload-kb` | `MAX_UPLOAD_KB` | `5120` |
//! | `--stopwords-dir` | `STOPWORDS_DIR` | lista embutida |
//! | `--preload-model` | `PRELOAD_MODEL` | `true` |

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::core::DEFAULT_CATEGORIES;
use crate::nlu::xnli::DEFAULT_MODEL;

/// Folga para cabeçalhos multipart além do próprio arquivo.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug, Parser)]
#[command(name = "triagem-financeira", about = "Triagem de emails financeiros com classificação zero-shot")]
pub struct Config {
    /// Endereço de escuta.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Categorias separadas por vírgula, na ordem enviada ao classificador.
    #[arg(long, env = "CATEGORIES")]
    pub categories: Option<String>,

    /// Repositório do modelo NLI no HuggingFace Hub.
    #[arg(long, env = "HF_MODEL", default_value = DEFAULT_MODEL)]
    pub hf_model: String,

    /// Tamanho máximo de arquivo enviado, em KB.
    #[arg(long, env = "MAX_UPLOAD_KB", default_value_t = 5120)]
    pub max_upload_kb: u64,

    /// Diretório no layout do corpus NLTK (`<dir>/portuguese`).
    #[arg(long, env = "STOPWORDS_DIR")]
    pub stopwords_dir: Option<PathBuf>,

    /// Carrega o modelo em segundo plano logo na inicialização.
    #[arg(long, env = "PRELOAD_MODEL", default_value_t = true, action = ArgAction::Set)]
    pub preload_model: bool,
}

impl Config {
    /// Labels de categoria efetivos.
    pub fn category_labels(&self) -> Vec<String> {
        parse_categories(self.categories.as_deref())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Limite do corpo HTTP: arquivo máximo + folga de multipart.
    pub fn body_limit_bytes(&self) -> usize {
        (self.max_upload_kb as usize)
            .saturating_mul(1024)
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }
}

/// Lista de categorias a partir do override (vírgulas, entradas vazias descartadas).
///
/// Sem override, ou override sem nenhum label, usa [`DEFAULT_CATEGORIES`].
pub fn parse_categories(raw: Option<&str>) -> Vec<String> {
    let defaults = || DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect();
    let Some(raw) = raw else {
        return defaults();
    };
    let labels: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if labels.is_empty() {
        tracing::warn!(raw = %raw, "CATEGORIES sem nenhum label, usando categorias padrão");
        return defaults();
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_override() {
        assert_eq!(parse_categories(None).len(), 9);
        assert_eq!(parse_categories(None)[1], "comprovante");
    }

    #[test]
    fn override_keeps_order_and_drops_blanks() {
        assert_eq!(
            parse_categories(Some(" spam, ,Fatura ,newsletter,")),
            vec!["spam", "Fatura", "newsletter"]
        );
    }

    #[test]
    fn blank_override_falls_back_to_defaults() {
        assert_eq!(parse_categories(Some(" , ,")), parse_categories(None));
    }

    #[test]
    fn parses_flags() {
        let config = Config::try_parse_from([
            "triagem-financeira",
            "--port",
            "8080",
            "--max-upload-kb",
            "10",
            "--preload-model",
            "false",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(!config.preload_model);
        assert_eq!(config.body_limit_bytes(), 10 * 1024 + 1024 * 1024);
    }
}
