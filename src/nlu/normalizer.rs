//! # Normalizador — Texto Limpo para o Classificador
//!
//! ```text
//! "Olá! Segue a FATURA nº 123, vencendo amanhã."
//!   ├── NFC + lowercase     → "olá! segue a fatura nº 123, vencendo amanhã."
//!   ├── remove [^\w\s]      → "olá segue a fatura nº 123 vencendo amanhã"
//!   ├── remove stopwords    → ["olá", "segue", "fatura", "nº", "123", "vencendo", "amanhã"]
//!   └── junta com espaço    → "olá segue fatura nº 123 vencendo amanhã"
//! ```
//!
//! O texto normalizado só alimenta o fallback binário de produtividade,
//! e é truncado em [`MAX_NORMALIZED_CHARS`] antes de ir ao modelo.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Limite de caracteres do texto normalizado enviado ao scorer.
pub const MAX_NORMALIZED_CHARS: usize = 2000;

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("invalid regex"));

pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl Normalizer {
    pub fn new(stopwords: HashSet<String>) -> Self {
        if stopwords.is_empty() {
            tracing::warn!("Normalizador sem stopwords: nenhuma palavra será removida");
        }
        Self { stopwords }
    }

    /// Minúsculas, sem pontuação, sem stopwords, espaços simples.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.nfc().collect::<String>().to_lowercase();
        let stripped = NON_WORD_RE.replace_all(&lowered, "");
        stripped
            .split_whitespace()
            .filter(|word| !self.stopwords.contains(*word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// [`normalize`](Self::normalize) limitado a [`MAX_NORMALIZED_CHARS`] caracteres.
    pub fn normalize_for_scoring(&self, text: &str) -> String {
        let normalized = self.normalize(text);
        match normalized.char_indices().nth(MAX_NORMALIZED_CHARS) {
            Some((cut, _)) => normalized[..cut].to_string(),
            None => normalized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlu::stopwords::{load_stopwords, LANGUAGE};

    fn normalizer() -> Normalizer {
        Normalizer::new(load_stopwords(None, LANGUAGE))
    }

    #[test]
    fn strips_punctuation_case_and_stopwords() {
        let out = normalizer().normalize("Olá! Segue a FATURA nº 123, vencendo amanhã.");
        assert_eq!(out, "olá segue fatura nº 123 vencendo amanhã");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalizer().normalize("  boleto \n\n  pago\t "), "boleto pago");
    }

    #[test]
    fn without_stopwords_keeps_every_word() {
        let out = Normalizer::new(HashSet::new()).normalize("Segue a fatura");
        assert_eq!(out, "segue a fatura");
    }

    #[test]
    fn truncates_by_characters_not_bytes() {
        let text = "ção ".repeat(1000);
        let out = normalizer().normalize_for_scoring(&text);
        assert_eq!(out.chars().count(), MAX_NORMALIZED_CHARS);
    }

    #[test]
    fn only_punctuation_normalizes_to_empty() {
        assert_eq!(normalizer().normalize("!!! ... ???"), "");
    }
}
