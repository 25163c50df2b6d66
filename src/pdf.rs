//! # Extração de Texto de PDF
//!
//! Anexos `.pdf` chegam como bytes do upload multipart. Este módulo
//! transforma esses bytes em texto para o pipeline de classificação.
//!
//! ## Cadeia de Extração
//!
//! ```text
//! bytes do upload
//!   ├── 1. Backend primário  → pdf_extract (texto por página)
//!   │      └── falhou? registra PdfError e tenta de novo
//!   ├── 2. Backend de retry  → lopdf (mesmos bytes, parser independente)
//!   │      └── falhou? registra PdfError → None (vira NoContent no ingestor)
//!   ├── 3. Junta páginas com linha em branco ("\n\n") + trim
//!   └── 4. Normaliza texto PT-BR → NFC + reconstrução de sílabas
//! ```
//!
//! Os bytes ficam num buffer imutável, então a segunda tentativa relê o
//! conteúdo inteiro desde o início — não há stream a rebobinar.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Falha de um backend de extração.
#[derive(Debug, Error)]
pub enum PdfError {
    /// O parser não conseguiu ler o documento.
    #[error("PDF ilegível ({backend}): {message}")]
    Unreadable {
        backend: &'static str,
        message: String,
    },
    /// O documento abriu, mas nenhuma página tinha texto.
    #[error("PDF sem texto extraível ({backend})")]
    Empty { backend: &'static str },
}

/// Capacidade de extrair texto de um PDF, página por página.
pub trait PdfTextExtractor: Send + Sync {
    /// Nome curto do backend, para logs.
    fn name(&self) -> &'static str;

    /// Texto de cada página, na ordem do documento.
    fn pages(&self, bytes: &[u8]) -> Result<Vec<String>, PdfError>;
}

/// Backend primário: crate `pdf_extract`.
pub struct PdfExtractBackend;

impl PdfTextExtractor for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn pages(&self, bytes: &[u8]) -> Result<Vec<String>, PdfError> {
        // pdf_extract entra em pânico em alguns PDFs malformados
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));
        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(PdfError::Unreadable {
                backend: self.name(),
                message: e.to_string(),
            }),
            Err(_) => Err(PdfError::Unreadable {
                backend: self.name(),
                message: "pânico durante a extração".into(),
            }),
        }
    }
}

/// Backend de retry: crate `lopdf`, parser independente do primário.
pub struct LopdfBackend;

impl PdfTextExtractor for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn pages(&self, bytes: &[u8]) -> Result<Vec<String>, PdfError> {
        let unreadable = |e: lopdf::Error| PdfError::Unreadable {
            backend: "lopdf",
            message: e.to_string(),
        };
        let doc = lopdf::Document::load_mem(bytes).map_err(unreadable)?;
        // get_pages() é um BTreeMap ordenado pelo número da página
        doc.get_pages()
            .keys()
            .map(|&page| doc.extract_text(&[page]).map_err(unreadable))
            .collect()
    }
}

/// Leitor de PDF com uma nova tentativa em backend secundário.
pub struct PdfReader {
    primary: Box<dyn PdfTextExtractor>,
    retry: Box<dyn PdfTextExtractor>,
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new(Box::new(PdfExtractBackend), Box::new(LopdfBackend))
    }
}

impl PdfReader {
    pub fn new(primary: Box<dyn PdfTextExtractor>, retry: Box<dyn PdfTextExtractor>) -> Self {
        Self { primary, retry }
    }

    /// Extrai o texto completo do PDF, ou `None` se ambas as tentativas falharem.
    ///
    /// Cada falha é registrada em log com o backend e o motivo; o chamador
    /// só precisa saber se há texto ou não.
    pub fn read(&self, bytes: &[u8]) -> Option<String> {
        match extract_with(self.primary.as_ref(), bytes) {
            Ok(text) => return Some(text),
            Err(e) => {
                tracing::warn!(error = %e, retry = self.retry.name(), "Extração de PDF falhou, tentando novamente");
            }
        }
        match extract_with(self.retry.as_ref(), bytes) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "Extração de PDF falhou após nova tentativa");
                None
            }
        }
    }
}

/// Roda um backend e monta o texto final: páginas separadas por linha em
/// branco, trim, normalização PT-BR.
fn extract_with(backend: &dyn PdfTextExtractor, bytes: &[u8]) -> Result<String, PdfError> {
    let pages = backend.pages(bytes)?;
    let joined = pages.join("\n\n");
    let text = normalize_pdf_text(joined.trim());
    if text.trim().is_empty() {
        return Err(PdfError::Empty {
            backend: backend.name(),
        });
    }
    tracing::debug!(backend = backend.name(), pages = pages.len(), text_len = text.len(), "Texto extraído do PDF");
    Ok(text)
}

/// Sílabas PT-BR que a extração de PDF costuma separar da palavra.
///
/// Só fragmentos que não existem como palavra isolada: "mente" e "cia"
/// ficam de fora ("em mente", "a cia").
static BROKEN_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+)[ \t]+(ção|ções|ência|ências|ância|âncias|dades?|ável|áveis|ível|íveis|mentos?)\b")
        .expect("invalid regex")
});

/// Normaliza texto extraído de PDF para Português Brasileiro.
///
/// ## Passo 1: NFC Normalization (Unicode)
///
/// "ã" pode vir precomposto (U+00E3) ou decomposto ("a" + U+0303).
/// NFC garante a forma precomposta, para que regex e stopwords casem.
///
/// ## Passo 2: Reconstrução de Sílabas PT-BR
///
/// PDFs frequentemente introduzem espaços espúrios antes de sufixos
/// comuns: "condi ção" → "condição", "paga mento" → "pagamento".
/// "pendên cia" não é tocado.
/// Só espaços e tabs são considerados — quebras de linha são preservadas.
pub fn normalize_pdf_text(text: &str) -> String {
    let normalized: String = text.nfc().collect();
    BROKEN_SUFFIX_RE.replace_all(&normalized, "$1$2").into_owned()
}
