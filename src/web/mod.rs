//! # Módulo Web — Interface e API da Triagem
//!
//! Camada web construída com **Axum** + **Maud**.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Browser (formulário HTML) / clientes da API             │
//! ├─────────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                               │
//! │  ├── GET  /               → formulário                  │
//! │  ├── POST /processar      → página de resultado         │
//! │  ├── POST /api/processar  → JSON (form ou corpo JSON)   │
//! │  └── GET  /status         → JSON: modelo pronto?        │
//! ├─────────────────────────────────────────────────────────┤
//! │ Static Assets (tower_http::ServeDir → /assets/)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submódulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |
//! | [`templates`] | Templates Maud (HTML server-side) |

pub mod handlers;
pub mod state;
pub mod templates;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use state::AppState;

/// Cria o router com todas as rotas.
///
/// O limite de corpo vale para o router inteiro: arquivo máximo
/// configurado + folga de multipart. CORS aberto só nas rotas JSON.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.body_limit;
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── API JSON ──────────────────────────────────────────────
    let api = Router::new()
        .route("/api/processar", post(handlers::api_processar))
        .route("/status", get(handlers::model_status))
        .layer(cors);

    Router::new()
        // ── Páginas HTML ──────────────────────────────────────
        .route("/", get(handlers::index))
        .route("/processar", post(handlers::processar))
        .merge(api)
        // ── Arquivos estáticos ────────────────────────────────
        .nest_service("/assets", ServeDir::new("assets"))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
