//! # Estado da Aplicação Web
//!
//! ```text
//! AppState (clonado por requisição, tudo atrás de Arc)
//!  ├── pipeline  → EmailPipeline imutável
//!  ├── scorer    → LazyScorer (o mesmo handle injetado no pipeline)
//!  └── body_limit
//! ```
//!
//! O servidor sobe imediatamente; o modelo é construído no primeiro uso
//! (ou pelo warm-up em background) e `/status` reporta quando ficou pronto.

use std::sync::Arc;

use crate::config::Config;
use crate::ingest::ContentIngestor;
use crate::nlu::normalizer::Normalizer;
use crate::nlu::stopwords::{load_stopwords, LANGUAGE};
use crate::nlu::zero_shot::{LazyScorer, ZeroShotScorer};
use crate::nlu::EmailPipeline;
use crate::pdf::PdfReader;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EmailPipeline>,
    /// Handle do classificador, consultado por `/status`.
    pub scorer: Arc<LazyScorer>,
    /// Limite do corpo HTTP em bytes.
    pub body_limit: usize,
}

impl AppState {
    /// Monta o pipeline a partir da configuração, injetando `scorer`.
    pub fn build(config: &Config, scorer: Arc<LazyScorer>) -> Self {
        let stopwords = load_stopwords(config.stopwords_dir.as_deref(), LANGUAGE);
        let pipeline = EmailPipeline::new(
            scorer.clone() as Arc<dyn ZeroShotScorer>,
            config.category_labels(),
            Normalizer::new(stopwords),
            ContentIngestor::new(config.max_upload_kb, PdfReader::default()),
        );
        tracing::info!(
            categories = pipeline.categories().len(),
            max_upload_kb = config.max_upload_kb,
            "Pipeline de triagem montado"
        );
        Self {
            pipeline: Arc::new(pipeline),
            scorer,
            body_limit: config.body_limit_bytes(),
        }
    }
}
