//! # Erros da Classificação
//!
//! Taxonomia que a camada web enxerga. São só três casos, e cada um tem
//! uma reação diferente na interface:
//!
//! | Erro | Causa | Reação |
//! |------|-------|--------|
//! | [`NoContent`](ClassifyError::NoContent) | nada utilizável, extensão não suportada, PDF ilegível | pede o conteúdo de novo (HTTP 400) |
//! | [`PayloadTooLarge`](ClassifyError::PayloadTooLarge) | arquivo acima do limite | mostra limite e tamanho (HTTP 413) |
//! | [`ClassifierUnavailable`](ClassifyError::ClassifierUnavailable) | modelo não carregou ou falhou na inferência | falha a requisição (HTTP 503) |
//!
//! Falhas internas que têm fallback (decodificação, stopwords, extração de
//! PDF) têm seus próprios tipos nos módulos correspondentes e são
//! registradas em log, mas nunca chegam aqui como um tipo distinto —
//! uma falha de PDF após a nova tentativa vira `NoContent`.

use thiserror::Error;

/// Falha tipada de uma requisição de classificação.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Nenhum conteúdo utilizável foi fornecido.
    #[error("nenhum conteúdo de email fornecido")]
    NoContent,

    /// Arquivo enviado excede o limite configurado.
    #[error("arquivo muito grande: {size_kb} KB (limite {limit_kb} KB)")]
    PayloadTooLarge {
        /// Limite configurado, em KB.
        limit_kb: u64,
        /// Tamanho real do arquivo, em KB (divisão inteira).
        size_kb: u64,
    },

    /// O classificador zero-shot não pôde ser construído ou invocado.
    #[error("classificador indisponível: {0}")]
    ClassifierUnavailable(String),
}

impl ClassifyError {
    /// Constrói `ClassifierUnavailable` preservando a cadeia de contexto do anyhow.
    pub fn unavailable(err: &anyhow::Error) -> Self {
        Self::ClassifierUnavailable(format!("{err:#}"))
    }

    /// Mensagem em português para exibição ao usuário.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoContent => {
                "Nenhum conteúdo de email fornecido. Cole o texto ou envie um .txt/.pdf.".into()
            }
            Self::PayloadTooLarge { limit_kb, size_kb } => format!(
                "Arquivo muito grande ({size_kb} KB). O limite é {limit_kb} KB."
            ),
            Self::ClassifierUnavailable(_) => {
                "O classificador está indisponível no momento. Tente novamente em instantes.".into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_keeps_context_chain() {
        let err = anyhow::anyhow!("conexão recusada").context("falha ao baixar modelo");
        let ClassifyError::ClassifierUnavailable(msg) = ClassifyError::unavailable(&err) else {
            panic!("variante errada");
        };
        assert_eq!(msg, "falha ao baixar modelo: conexão recusada");
    }

    #[test]
    fn payload_message_shows_both_sizes() {
        let err = ClassifyError::PayloadTooLarge { limit_kb: 10, size_kb: 12 };
        assert_eq!(err.user_message(), "Arquivo muito grande (12 KB). O limite é 10 KB.");
    }
}
