//! # Templates Maud — HTML Server-Side
//!
//! | Função | Página |
//! |--------|--------|
//! | [`index_page()`] | Formulário: texto colado ou arquivo `.txt`/`.pdf` |
//! | [`result_page()`] | Categoria, produtividade, rankings, resposta sugerida |
//! | [`error_page()`] | Classificador indisponível |
//!
//! ## Layout
//!
//! ```text
//! ┌──────────── nav-bar ─────────────────┐
//! │ TF │ Triagem Financeira        │ ●  │  ← status do modelo (/status)
//! ├──────────────────────────────────────┤
//! │ [flash]                              │
//! │ ┌──────── email-text ────────────┐   │
//! │ └────────────────────────────────┘   │
//! │ [email-file .txt/.pdf]  [Classificar]│
//! └──────────────────────────────────────┘
//! ```

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::core::{ClassificationResult, RankedScoreList};

/// Polling de `/status` a cada 3s até o modelo ficar pronto.
const STATUS_SCRIPT: &str = r#"
(function () {
  const dot = document.getElementById('model-status');
  if (!dot) return;
  function poll() {
    fetch('/status').then(r => r.json()).then(s => {
      dot.classList.toggle('ready', s.ready);
      dot.title = s.ready ? 'Modelo pronto' : 'Modelo carregando...';
      if (!s.ready) setTimeout(poll, 3000);
    }).catch(() => setTimeout(poll, 3000));
  }
  poll();
})();
"#;

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " — Triagem Financeira" }
                link rel="stylesheet" href="/assets/style.css";
            }
            body {
                nav class="nav-bar" {
                    a href="/" class="nav-brand" {
                        span class="nav-brand-icon" { "TF" }
                        span class="nav-brand-text" { "Triagem " em { "Financeira" } }
                    }
                    span id="model-status" class="status-dot" title="Modelo carregando..." {}
                }
                main class="container" { (body) }
                script { (PreEscaped(STATUS_SCRIPT)) }
            }
        }
    }
}

/// Formulário principal, com mensagem flash opcional.
pub fn index_page(flash: Option<&str>, max_upload_kb: u64) -> Markup {
    layout(
        "Classificar",
        html! {
            @if let Some(message) = flash {
                div class="flash" role="alert" { (message) }
            }
            form class="email-form" method="post" action="/processar" enctype="multipart/form-data" {
                label for="email-text" { "Cole o conteúdo do email" }
                textarea id="email-text" name="email-text" rows="12"
                    placeholder="Prezados, segue em anexo o comprovante..." {}
                div class="form-row" {
                    label for="email-file" {
                        "ou envie um arquivo (.txt, .pdf — até " (max_upload_kb) " KB)"
                    }
                    input id="email-file" name="email-file" type="file" accept=".txt,.pdf";
                }
                button type="submit" { "Classificar" }
            }
        },
    )
}

fn ranking_table(caption: &str, ranking: &RankedScoreList) -> Markup {
    html! {
        table class="ranking" {
            caption { (caption) }
            @for item in ranking {
                tr {
                    td class="label" { (item.label) }
                    td class="bar" {
                        span class="bar-fill" style=(format!("width: {:.1}%", item.score * 100.0)) {}
                    }
                    td class="score" { (format!("{:.3}", item.score)) }
                }
            }
        }
    }
}

/// Página de resultado com o rodapé de métricas.
pub fn result_page(result: &ClassificationResult, metrics_line: &str) -> Markup {
    layout(
        "Resultado",
        html! {
            section class="summary" {
                div class="badge category" { "Categoria: " strong { (result.categoria) } }
                div class=(format!("badge productivity {}", result.produtividade.as_str().to_lowercase())) {
                    "Produtividade: " strong { (result.produtividade.as_str()) }
                }
                @if result.spam {
                    div class="badge spam" { "Spam" }
                }
            }

            @if !result.resposta.is_empty() {
                section class="reply" {
                    h2 { "Resposta sugerida" }
                    pre class="reply-text" { (result.resposta) }
                }
            }

            @if result.entidades.valor.is_some() || result.entidades.data.is_some() {
                section class="entities" {
                    h2 { "Entidades" }
                    ul {
                        @if let Some(valor) = &result.entidades.valor { li { "Valor: " (valor) } }
                        @if let Some(data) = &result.entidades.data { li { "Data: " (data) } }
                    }
                }
            }

            section class="rankings" {
                (ranking_table("Categorias", &result.ranking))
                (ranking_table("Produtividade", &result.produtividade_ranking))
            }

            details class="original" {
                summary { "Texto analisado" }
                pre { (result.texto) }
            }

            a class="button" href="/" { "Classificar outro email" }
            footer class="metrics-line" { (format!("\u{26a1} {}", metrics_line)) }
        },
    )
}

/// Página de erro (classificador indisponível).
pub fn error_page(message: &str) -> Markup {
    layout(
        "Indisponível",
        html! {
            div class="flash error" role="alert" { (message) }
            a class="button" href="/" { "Voltar" }
        },
    )
}
