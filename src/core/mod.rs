//! # Módulo Core — Tipos Fundamentais da Triagem
//!
//! Tipos de domínio compartilhados por todo o pipeline de classificação.
//! Nenhum deles guarda estado mutável: são criados por requisição e
//! descartados ao final.
//!
//! - [`RankedScoreList`] / [`ScoredLabel`](ranking::ScoredLabel) — distribuição de scores ordenada
//! - [`Category`] — categoria reconhecida pelo sintetizador de respostas
//! - [`ProductivityLabel`] — Produtivo / Improdutivo
//! - [`ExtractedEntities`] — valor e data extraídos do corpo
//! - [`ClassificationResult`] — o pacote final entregue à camada web

/// Sub-módulo com [`Category`] e a canonicalização de labels.
pub mod category;

/// Sub-módulo com [`ProductivityLabel`] e a tabela categoria → produtividade.
pub mod productivity;

/// Sub-módulo com [`RankedScoreList`] e [`ScoredLabel`](ranking::ScoredLabel).
pub mod ranking;

/// Sub-módulo com [`ClassificationResult`] e [`ExtractedEntities`].
pub mod result;

// Re-exports para conveniência — permite usar `crate::core::Category` diretamente.
pub use category::{canonical_label, Category, DEFAULT_CATEGORIES, SPAM_LABEL};
pub use productivity::{productivity_for, ProductivityLabel};
pub use ranking::RankedScoreList;
pub use result::{ClassificationResult, ExtractedEntities};
