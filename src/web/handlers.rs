//! # Handlers HTTP
//!
//! | Handler | Rota | Retorno |
//! |---------|------|---------|
//! | `index` | GET `/` | formulário (Maud) |
//! | `processar` | POST `/processar` | página de resultado ou formulário com flash |
//! | `api_processar` | POST `/api/processar` | JSON |
//! | `model_status` | GET `/status` | `{ "ready": bool }` |
//!
//! ## Mapeamento de Erros
//!
//! | Erro | HTML | API |
//! |------|------|-----|
//! | `NoContent` | formulário + flash (400) | 400 `{error}` |
//! | `PayloadTooLarge` | formulário + flash (413) | 413 `{error, limit_kb, size_kb}` |
//! | `ClassifierUnavailable` | página de erro (503) | 503 `{error}` |
//!
//! A classificação roda em `spawn_blocking`: o forward pass do modelo é
//! CPU-bound e não pode bloquear o executor do Tokio.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Form, FromRequest, Multipart, Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::AppState;
use super::templates;
use crate::core::ClassificationResult;
use crate::error::ClassifyError;
use crate::ingest::UploadedFile;
use crate::metrics;

/// Resposta do endpoint `/status`.
#[derive(Serialize)]
pub struct StatusResponse {
    /// `true` quando o classificador já foi construído.
    pub ready: bool,
}

/// Campos do formulário (`email-text`, `email-file`).
#[derive(Default)]
pub struct EmailForm {
    pub text: Option<String>,
    pub file: Option<UploadedFile>,
}

/// Formulário `application/x-www-form-urlencoded` (só texto, sem arquivo).
#[derive(Deserialize)]
struct UrlEncodedForm {
    #[serde(rename = "email-text")]
    text: Option<String>,
}

/// De onde veio o conteúdo da requisição.
enum EmailInput {
    Form(EmailForm),
    Json(serde_json::Value),
}

/// Resultado + linha de métricas do processamento.
struct Classified {
    result: ClassificationResult,
    metrics_line: String,
}

/// Corpo de sucesso de `/api/processar`.
#[derive(Serialize)]
struct ApiResponse<'a> {
    #[serde(flatten)]
    result: &'a ClassificationResult,
    processado_em: String,
}

/// Erro da API serializado como JSON.
pub struct ApiError(pub ClassifyError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = match &self.0 {
            ClassifyError::PayloadTooLarge { limit_kb, size_kb } => serde_json::json!({
                "error": self.0.user_message(),
                "limit_kb": limit_kb,
                "size_kb": size_kb,
            }),
            other => serde_json::json!({ "error": other.user_message() }),
        };
        (status, Json(body)).into_response()
    }
}

fn status_for(err: &ClassifyError) -> StatusCode {
    match err {
        ClassifyError::NoContent => StatusCode::BAD_REQUEST,
        ClassifyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ClassifyError::ClassifierUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn markup_to_html(m: maud::Markup) -> Html<String> {
    Html(m.into_string())
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Falha de transporte (corpo grande demais, multipart malformado).
///
/// Um 413 do limite de corpo vira `PayloadTooLarge`, com o tamanho
/// estimado pelo `Content-Length`; o resto vira `NoContent`.
fn transport_error(
    status: StatusCode,
    detail: &str,
    limit_kb: u64,
    content_length: Option<u64>,
) -> ClassifyError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        let size_kb = content_length.map(|len| len / 1024).unwrap_or(limit_kb + 1);
        tracing::info!(size_kb, limit_kb, "Corpo da requisição acima do limite");
        return ClassifyError::PayloadTooLarge { limit_kb, size_kb };
    }
    tracing::warn!(%status, detail, "Requisição ilegível");
    ClassifyError::NoContent
}

/// Lê `email-text` e `email-file` do multipart, ignorando outros campos.
async fn read_form(
    mut multipart: Multipart,
    limit_kb: u64,
    content_length: Option<u64>,
) -> Result<EmailForm, ClassifyError> {
    let fail = |e: MultipartError| transport_error(e.status(), &e.body_text(), limit_kb, content_length);
    let mut form = EmailForm::default();

    while let Some(field) = multipart.next_field().await.map_err(fail)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "email-text" => form.text = Some(field.text().await.map_err(fail)?),
            "email-file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(fail)?;
                // input de arquivo vazio ainda envia a parte, sem nome
                if !filename.is_empty() {
                    tracing::info!(size_bytes = bytes.len(), filename = %filename, "Arquivo recebido");
                    form.file = Some(UploadedFile::new(filename, bytes));
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Roda o pipeline fora do executor async, com span por requisição.
async fn classify(state: &AppState, input: EmailInput) -> Result<Classified, ClassifyError> {
    let pipeline = state.pipeline.clone();
    let span = tracing::info_span!("request", id = %Uuid::new_v4());

    tokio::task::spawn_blocking(move || -> Result<Classified, ClassifyError> {
        let _enter = span.enter();
        let t0 = Instant::now();
        let result = match &input {
            EmailInput::Form(form) => pipeline.process(form.text.as_deref(), form.file.as_ref()),
            EmailInput::Json(payload) => pipeline.process_json(payload),
        }
        .inspect_err(|e| tracing::warn!(error = %e, "Classificação não concluída"))?;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        let pm = metrics::collect_metrics(Some(metrics::throughput(
            result.texto.chars().count(),
            elapsed_ms,
        )));
        let metrics_line = pm.summary_line(elapsed_ms);
        tracing::info!(metrics = %metrics_line, "Classificação concluída");

        Ok(Classified {
            result,
            metrics_line,
        })
    })
    .await
    .map_err(|e| ClassifyError::ClassifierUnavailable(format!("tarefa de classificação interrompida: {e}")))?
}

/// GET `/` — formulário.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    markup_to_html(templates::index_page(None, state.pipeline.ingestor().max_upload_kb()))
}

/// GET `/status` — o classificador já foi carregado?
pub async fn model_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        ready: state.scorer.is_ready(),
    })
}

/// POST `/processar` — formulário HTML.
///
/// Conteúdo ausente ou grande demais devolve o formulário com a mensagem;
/// classificador indisponível devolve a página de erro.
pub async fn processar(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let limit_kb = state.pipeline.ingestor().max_upload_kb();
    let outcome = match read_form(multipart, limit_kb, content_length(&headers)).await {
        Ok(form) => classify(&state, EmailInput::Form(form)).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(c) => markup_to_html(templates::result_page(&c.result, &c.metrics_line)).into_response(),
        Err(e @ ClassifyError::ClassifierUnavailable(_)) => (
            status_for(&e),
            markup_to_html(templates::error_page(&e.user_message())),
        )
            .into_response(),
        Err(e) => (
            status_for(&e),
            markup_to_html(templates::index_page(Some(&e.user_message()), limit_kb)),
        )
            .into_response(),
    }
}

/// POST `/api/processar` — multipart, urlencoded ou JSON (`texto`/`text`).
///
/// JSON inválido é tratado como corpo vazio (→ 400).
pub async fn api_processar(State(state): State<AppState>, req: Request) -> Response {
    let limit_kb = state.pipeline.ingestor().max_upload_kb();
    let length = content_length(req.headers());
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let input = if content_type.starts_with("multipart/form-data") {
        match Multipart::from_request(req, &state).await {
            Ok(multipart) => read_form(multipart, limit_kb, length).await.map(EmailInput::Form),
            Err(rej) => Err(transport_error(rej.status(), &rej.body_text(), limit_kb, length)),
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        match Form::<UrlEncodedForm>::from_request(req, &state).await {
            Ok(Form(form)) => Ok(EmailInput::Form(EmailForm {
                text: form.text,
                file: None,
            })),
            Err(rej) => Err(transport_error(rej.status(), &rej.body_text(), limit_kb, length)),
        }
    } else {
        match Bytes::from_request(req, &state).await {
            Ok(body) => Ok(EmailInput::Json(
                serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
            )),
            Err(rej) => Err(transport_error(rej.status(), &rej.body_text(), limit_kb, length)),
        }
    };

    let outcome = match input {
        Ok(input) => classify(&state, input).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(c) => Json(ApiResponse {
            result: &c.result,
            processado_em: chrono::Local::now().to_rfc3339(),
        })
        .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
