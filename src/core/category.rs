//! # Categorias — Os Baldes da Triagem Financeira
//!
//! Um **CategoryLabel** é só uma string ("fatura", "alerta de segurança"),
//! vinda da configuração e devolvida pelo classificador zero-shot. Para
//! comparação, todo label passa por [`canonical_label`]: trim + lowercase,
//! **preservando diacríticos** ("Cobrança" → "cobrança", nunca "cobranca").
//!
//! Para decidir *qual template de resposta usar*, o label canônico é
//! dobrado no enum [`Category`]:
//!
//! ```text
//! "  Fatura "          → canonical "fatura"          → Category::Fatura
//! "Carta de Demissão"  → contém "demiss"             → Category::Demissao
//! "newsletter"         → nada reconhecido            → Category::Generic
//! ```

use std::fmt;

/// Labels padrão — nove categorias do domínio financeiro, na ordem em que
/// são enviadas ao classificador.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "fatura",
    "comprovante",
    "cobrança",
    "oferta",
    "spam",
    "suporte",
    "relatório",
    "alerta de segurança",
    "demissão",
];

/// Label usado pelo atalho de mensagens triviais.
pub const SPAM_LABEL: &str = "spam";

/// Forma canônica de um label: sem espaços nas pontas, em minúsculas.
pub fn canonical_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Categoria reconhecida pelo sintetizador de respostas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Fatura,
    Comprovante,
    Cobranca,
    Oferta,
    Spam,
    Suporte,
    Relatorio,
    AlertaSeguranca,
    /// Pedido/carta de demissão — qualquer label contendo "demiss".
    Demissao,
    /// Qualquer label não reconhecido.
    Generic,
}

impl Category {
    /// Dobra um label arbitrário numa categoria.
    ///
    /// Ordem: match exato do label canônico; depois a regra de substring
    /// "demiss" (cobre "demissão", "carta de demissão", "demissao"...);
    /// por fim [`Category::Generic`].
    pub fn from_label(label: &str) -> Self {
        let canonical = canonical_label(label);
        match canonical.as_str() {
            "fatura" => Self::Fatura,
            "comprovante" => Self::Comprovante,
            "cobrança" => Self::Cobranca,
            "oferta" => Self::Oferta,
            "spam" => Self::Spam,
            "suporte" => Self::Suporte,
            "relatório" => Self::Relatorio,
            "alerta de segurança" => Self::AlertaSeguranca,
            other if other.contains("demiss") => Self::Demissao,
            _ => Self::Generic,
        }
    }

    /// Nome canônico da categoria ("genérico" para o fallback).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fatura => "fatura",
            Self::Comprovante => "comprovante",
            Self::Cobranca => "cobrança",
            Self::Oferta => "oferta",
            Self::Spam => "spam",
            Self::Suporte => "suporte",
            Self::Relatorio => "relatório",
            Self::AlertaSeguranca => "alerta de segurança",
            Self::Demissao => "demissão",
            Self::Generic => "genérico",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
