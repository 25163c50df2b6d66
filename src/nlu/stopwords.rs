//! # Stopwords — Palavras Vazias do Português
//!
//! A lista vem de um [`StopwordProvider`]. Há dois:
//!
//! | Provider | Fonte |
//! |----------|-------|
//! | [`DirStopwords`] | diretório no layout do corpus NLTK (`<dir>/portuguese`, uma palavra por linha) |
//! | [`EmbeddedStopwords`] | lista NLTK embutida no binário |
//!
//! [`load_stopwords`] resolve a cadeia uma única vez: diretório configurado
//! → lista embutida → conjunto vazio. Cada degrau registra o motivo em log.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Idioma usado pela normalização.
pub const LANGUAGE: &str = "portuguese";

/// Lista NLTK de stopwords em Português.
const EMBEDDED_PORTUGUESE: &str = include_str!("../../data/stopwords/portuguese");

/// Falha ao obter a lista de stopwords.
#[derive(Debug, Error)]
pub enum StopwordError {
    /// O arquivo do corpus não existe ou não pôde ser lido.
    #[error("corpus de stopwords indisponível em {path}: {source}")]
    MissingCorpus {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Nenhuma lista para o idioma pedido.
    #[error("idioma sem lista de stopwords: {0}")]
    UnsupportedLanguage(String),
}

pub trait StopwordProvider {
    fn words(&self, language: &str) -> Result<HashSet<String>, StopwordError>;
}

/// Lê `<dir>/<language>`.
pub struct DirStopwords {
    pub dir: PathBuf,
}

impl StopwordProvider for DirStopwords {
    fn words(&self, language: &str) -> Result<HashSet<String>, StopwordError> {
        let path = self.dir.join(language);
        let content = std::fs::read_to_string(&path)
            .map_err(|source| StopwordError::MissingCorpus { path, source })?;
        Ok(parse_word_list(&content))
    }
}

pub struct EmbeddedStopwords;

impl StopwordProvider for EmbeddedStopwords {
    fn words(&self, language: &str) -> Result<HashSet<String>, StopwordError> {
        match language {
            LANGUAGE => Ok(parse_word_list(EMBEDDED_PORTUGUESE)),
            other => Err(StopwordError::UnsupportedLanguage(other.to_string())),
        }
    }
}

fn parse_word_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Resolve as stopwords de `language`: diretório (se houver) → embutida → vazio.
pub fn load_stopwords(dir: Option<&Path>, language: &str) -> HashSet<String> {
    if let Some(dir) = dir {
        match (DirStopwords { dir: dir.to_path_buf() }).words(language) {
            Ok(words) => {
                tracing::info!(count = words.len(), dir = %dir.display(), "Stopwords carregadas do disco");
                return words;
            }
            Err(e) => tracing::warn!(error = %e, "Usando lista de stopwords embutida"),
        }
    }
    match EmbeddedStopwords.words(language) {
        Ok(words) => words,
        Err(e) => {
            tracing::warn!(error = %e, "Sem stopwords, normalização não removerá palavras");
            HashSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_list_has_common_words() {
        let words = EmbeddedStopwords.words(LANGUAGE).unwrap();
        for w in ["de", "não", "você", "para", "é"] {
            assert!(words.contains(w), "{w}");
        }
        assert!(!words.contains("fatura"));
    }

    #[test]
    fn embedded_rejects_other_languages() {
        assert!(matches!(
            EmbeddedStopwords.words("klingon"),
            Err(StopwordError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn reads_nltk_layout_from_disk() {
        let dir = std::env::temp_dir().join(format!("stopwords-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(LANGUAGE), "Foo\n\n bar \n").unwrap();

        let words = load_stopwords(Some(&dir), LANGUAGE);
        assert_eq!(words, HashSet::from(["foo".to_string(), "bar".to_string()]));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_dir_falls_back_to_embedded() {
        let dir = Path::new("/caminho/que/nao/existe");
        let err = DirStopwords { dir: dir.to_path_buf() }.words(LANGUAGE).unwrap_err();
        assert!(matches!(err, StopwordError::MissingCorpus { .. }));

        let words = load_stopwords(Some(dir), LANGUAGE);
        assert!(words.contains("que"));
    }

    #[test]
    fn unknown_language_yields_empty_set() {
        assert!(load_stopwords(None, "klingon").is_empty());
    }
}
