//! # Ingestão de Conteúdo — De Onde Vem o Email
//!
//! O texto a classificar pode chegar de três fontes, nesta prioridade:
//!
//! ```text
//! 1. Texto colado no formulário (email-text)   → sempre vence
//! 2. Arquivo enviado (email-file: .txt / .pdf)  → validado e decodificado
//! 3. Corpo JSON {"texto": ...} / {"text": ...}  → só na API
//! ```
//!
//! ## Validação do Arquivo
//!
//! | Verificação | Falha |
//! |-------------|-------|
//! | extensão ∈ {txt, pdf} | `NoContent` (silencioso) |
//! | tamanho ≤ limite configurado | `PayloadTooLarge { limit_kb, size_kb }` |
//! | PDF com texto extraível | `NoContent` (após retry) |
//!
//! ## Decodificação de `.txt`
//!
//! Nunca falha: UTF-8 e, se inválido, ISO-8859-1 (Latin-1), que mapeia
//! cada byte para o code point de mesmo valor e portanto aceita qualquer
//! entrada. Bytes 0x80–0x9F viram controles C1, não os símbolos do
//! Windows-1252. A troca para Latin-1 fica registrada em log.

use axum::body::Bytes;

use crate::error::ClassifyError;
use crate::pdf::PdfReader;

/// Extensões aceitas para upload.
const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf"];

/// Arquivo recebido do formulário multipart, já em memória.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    /// Nome informado pelo navegador (não confiável — só a extensão é usada).
    pub filename: String,
    /// Conteúdo completo.
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Tamanho em bytes — lido do buffer, sem consumir o conteúdo.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Extensão em minúsculas (texto após o último `.`), se houver.
    pub fn extension(&self) -> Option<String> {
        let name = self.filename.trim();
        let (_, ext) = name.rsplit_once('.')?;
        Some(ext.to_lowercase())
    }
}

/// Encoding efetivamente usado para decodificar um `.txt`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1 estrito.
    Latin1,
}

/// Decodifica bytes de um `.txt`: UTF-8, senão Latin-1.
pub fn decode_text(bytes: &[u8]) -> (String, TextEncoding) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), TextEncoding::Utf8);
    }
    tracing::info!("Arquivo não é UTF-8 válido, decodificando como Latin-1");
    (encoding_rs::mem::decode_latin1(bytes).into_owned(), TextEncoding::Latin1)
}

/// Extrai o texto de um corpo JSON arbitrário.
///
/// A primeira chave (`texto`, depois `text`) com string não vazia é a
/// escolhida; o trim vem depois. `{"texto": "  ", "text": "x"}` não
/// tem conteúdo, `{"texto": "", "text": "x"}` usa `text`.
pub fn text_from_json(payload: &serde_json::Value) -> Option<String> {
    let raw = ["texto", "text"]
        .iter()
        .filter_map(|key| payload.get(key).and_then(|v| v.as_str()))
        .find(|raw| !raw.is_empty())?;
    let text = raw.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Resolve o texto do email a partir do formulário.
pub struct ContentIngestor {
    /// Limite de upload em KB.
    max_upload_kb: u64,
    pdf: PdfReader,
}

impl ContentIngestor {
    pub fn new(max_upload_kb: u64, pdf: PdfReader) -> Self {
        Self { max_upload_kb, pdf }
    }

    pub fn max_upload_kb(&self) -> u64 {
        self.max_upload_kb
    }

    /// Resolve o conteúdo: texto inline (se não vazio) ou arquivo.
    ///
    /// # Erros
    ///
    /// - [`ClassifyError::NoContent`] — sem texto, sem arquivo, extensão
    ///   não suportada ou PDF ilegível
    /// - [`ClassifyError::PayloadTooLarge`] — arquivo acima do limite
    pub fn resolve(
        &self,
        inline_text: Option<&str>,
        file: Option<&UploadedFile>,
    ) -> Result<String, ClassifyError> {
        if let Some(text) = inline_text.map(str::trim).filter(|t| !t.is_empty()) {
            return Ok(text.to_string());
        }

        let Some(file) = file else {
            return Err(ClassifyError::NoContent);
        };

        let ext = file.extension().unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            tracing::debug!(filename = %file.filename, "Extensão não suportada, ignorando arquivo");
            return Err(ClassifyError::NoContent);
        }

        let size = file.size();
        if size > self.max_upload_kb.saturating_mul(1024) {
            tracing::info!(size_bytes = size, limit_kb = self.max_upload_kb, "Upload acima do limite");
            return Err(ClassifyError::PayloadTooLarge {
                limit_kb: self.max_upload_kb,
                size_kb: size / 1024,
            });
        }

        match ext.as_str() {
            "txt" => {
                let (text, encoding) = decode_text(&file.bytes);
                tracing::debug!(?encoding, chars = text.chars().count(), "Arquivo .txt decodificado");
                Ok(text)
            }
            _ => self.pdf.read(&file.bytes).ok_or(ClassifyError::NoContent),
        }
    }
}
