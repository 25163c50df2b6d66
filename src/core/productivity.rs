//! # Produtividade — O Rótulo Binário de Negócio
//!
//! Um email é **Produtivo** quando exige acompanhamento operacional
//! (fatura a conferir, comprovante a validar, chamado de suporte) e
//! **Improdutivo** quando não exige (oferta, spam, alerta genérico).
//!
//! A tabela [`productivity_for`] resolve a maioria dos casos de forma
//! determinística a partir da categoria. Categorias fora da tabela não
//! são erro: sinalizam que o resolvedor deve consultar o classificador.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Rótulo binário de produtividade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ProductivityLabel {
    Produtivo,
    Improdutivo,
}

impl ProductivityLabel {
    /// Os dois labels, na ordem enviada ao classificador zero-shot.
    pub const ALL: [ProductivityLabel; 2] = [Self::Produtivo, Self::Improdutivo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Produtivo => "Produtivo",
            Self::Improdutivo => "Improdutivo",
        }
    }

    /// O outro label do par.
    pub fn other(&self) -> Self {
        match self {
            Self::Produtivo => Self::Improdutivo,
            Self::Improdutivo => Self::Produtivo,
        }
    }
}

impl fmt::Display for ProductivityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Erro de parsing — o classificador devolveu algo fora do par.
#[derive(Debug, thiserror::Error)]
#[error("rótulo de produtividade desconhecido: {0:?}")]
pub struct UnknownProductivity(pub String);

impl FromStr for ProductivityLabel {
    type Err = UnknownProductivity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Produtivo" => Ok(Self::Produtivo),
            "Improdutivo" => Ok(Self::Improdutivo),
            other => Err(UnknownProductivity(other.to_string())),
        }
    }
}

/// Tabela estática categoria (canônica) → produtividade.
///
/// Imutável, construída uma única vez no primeiro acesso.
static PRODUCTIVITY_MAP: Lazy<HashMap<&'static str, ProductivityLabel>> = Lazy::new(|| {
    use ProductivityLabel::*;
    HashMap::from([
        ("demissão", Produtivo),
        ("comprovante", Produtivo),
        ("cobrança", Produtivo),
        ("relatório", Produtivo),
        ("oferta", Improdutivo),
        ("suporte", Produtivo),
        ("alerta de segurança", Improdutivo),
        ("spam", Improdutivo),
        ("fatura", Produtivo),
    ])
});

/// Consulta a tabela com um label **já canônico** (trim + lowercase).
pub fn productivity_for(canonical_category: &str) -> Option<ProductivityLabel> {
    PRODUCTIVITY_MAP.get(canonical_category).copied()
}

/// Todas as categorias mapeadas — usado em testes de totalidade.
#[cfg(test)]
pub fn mapped_categories() -> impl Iterator<Item = &'static str> {
    PRODUCTIVITY_MAP.keys().copied()
}
