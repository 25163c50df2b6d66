//! # Triagem Financeira
//!
//! **Ponto de entrada** do serviço de triagem de emails financeiros.
//!
//! A inicialização segue duas fases:
//!
//! 1. **Fase imediata**: configuração, pipeline e servidor axum. O servidor
//!    aceita conexões antes de o modelo existir.
//! 2. **Fase background**: com `PRELOAD_MODEL=true` o XLM-RoBERTa XNLI é
//!    baixado/carregado via `spawn_blocking`. Sem preload, o primeiro
//!    email classificado dispara o carregamento.
//!
//! ```text
//! main()
//!   ├── .env (dotenvy) + tracing
//!   ├── Config (clap: flags + env)
//!   ├── LazyScorer (loader → XnliScorer::load)
//!   ├── AppState::build → EmailPipeline
//!   ├── TcpListener (HOST:PORT)
//!   ├── Spawn background: warm-up do modelo
//!   └── axum::serve
//! ```
//!
//! ```bash
//! RUST_LOG=debug cargo run -- --port 8080 --categories "fatura,spam"
//! ```

mod config;
mod core;
mod error;
mod ingest;
mod metrics;
mod nlu;
mod pdf;
mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::nlu::xnli::XnliScorer;
use crate::nlu::zero_shot::{LazyScorer, ZeroShotScorer};
use crate::web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // .env ausente não é erro
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    tracing::info!(
        model = %config.hf_model,
        preload = config.preload_model,
        "📨 Triagem Financeira — iniciando"
    );

    let model = config.hf_model.clone();
    let scorer = Arc::new(LazyScorer::new(Box::new(move || {
        Ok(Arc::new(XnliScorer::load(&model)?) as Arc<dyn ZeroShotScorer>)
    })));

    let state = AppState::build(&config, scorer.clone());
    let app = web::create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("falha ao escutar em {addr}"))?;
    tracing::info!(%addr, "🚀 Servidor no ar");

    if config.preload_model {
        tokio::task::spawn_blocking(move || {
            // o erro já foi registrado pelo LazyScorer
            if scorer.get().is_err() {
                tracing::warn!("Warm-up do modelo falhou; nova tentativa no próximo email");
            }
        });
    }

    axum::serve(listener, app).await.context("servidor axum encerrou com erro")?;
    Ok(())
}
