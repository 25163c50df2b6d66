//! # Pipeline de Triagem — Do Email Bruto à Resposta Sugerida
//!
//! O [`EmailPipeline`] encadeia todos os estágios da classificação. Os
//! estágios são estritamente sequenciais e não há resultado parcial:
//! qualquer erro interrompe a requisição antes de montar o resultado.
//!
//! ```text
//! texto colado / arquivo / JSON
//!   ├── 1. Ingestão (ContentIngestor)            → texto bruto
//!   ├── 2. Trivialidade (is_trivial)
//!   │      └── trivial? → spam, Improdutivo, resposta vazia (modelo não é chamado)
//!   ├── 3. Categoria (CategoryClassifier)        → ranking sobre os labels configurados
//!   ├── 4. Produtividade (ProductivityResolver)  → tabela estática ou fallback binário
//!   ├── 5. Entidades (EntityExtractor)           → valor, data
//!   └── 6. Resposta (ResponseSynthesizer)        → template da categoria
//! ```
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`zero_shot`] | Trait do scorer e handle preguiçoso |
//! | [`xnli`] | Scorer concreto XLM-RoBERTa via candle |
//! | [`stopwords`] | Providers de stopwords |
//! | [`normalizer`] | Limpeza do texto para o fallback de produtividade |
//! | [`triviality`] | Atalho de spam para mensagens triviais |
//! | [`classifier`] | Classificação de categoria |
//! | [`productivity`] | Resolução Produtivo/Improdutivo |
//! | [`extractor`] | Valor monetário e data |
//! | [`responder`] | Templates de resposta |

pub mod classifier;
pub mod extractor;
pub mod normalizer;
pub mod productivity;
pub mod responder;
pub mod stopwords;
pub mod triviality;
pub mod xnli;
pub mod zero_shot;

use std::sync::Arc;
use std::time::Instant;

use crate::core::{
    canonical_label, ClassificationResult, ExtractedEntities, ProductivityLabel,
    RankedScoreList, SPAM_LABEL,
};
use crate::error::ClassifyError;
use crate::ingest::{text_from_json, ContentIngestor, UploadedFile};

use classifier::CategoryClassifier;
use extractor::EntityExtractor;
use normalizer::Normalizer;
use productivity::ProductivityResolver;
use responder::ResponseSynthesizer;
use zero_shot::ZeroShotScorer;

/// Pipeline completo de triagem.
///
/// Sem estado mutável: uma instância é compartilhada (via `Arc`) por
/// todas as requisições.
pub struct EmailPipeline {
    ingestor: ContentIngestor,
    classifier: CategoryClassifier,
    resolver: ProductivityResolver,
    extractor: EntityExtractor,
    responder: ResponseSynthesizer,
}

impl EmailPipeline {
    /// Monta o pipeline com um scorer injetado.
    ///
    /// `categories` deve vir já validado (ver [`crate::config::parse_categories`]).
    pub fn new(
        scorer: Arc<dyn ZeroShotScorer>,
        categories: Vec<String>,
        normalizer: Normalizer,
        ingestor: ContentIngestor,
    ) -> Self {
        let resolver = ProductivityResolver::new(scorer.clone(), Arc::new(normalizer), &categories);
        let extractor = EntityExtractor::new();
        Self {
            ingestor,
            classifier: CategoryClassifier::new(scorer, categories),
            resolver,
            extractor,
            responder: ResponseSynthesizer::new(extractor),
        }
    }

    pub fn ingestor(&self) -> &ContentIngestor {
        &self.ingestor
    }

    pub fn categories(&self) -> &[String] {
        self.classifier.labels()
    }

    /// Entrada do formulário: texto colado (prioridade) ou arquivo.
    pub fn process(
        &self,
        inline_text: Option<&str>,
        file: Option<&UploadedFile>,
    ) -> Result<ClassificationResult, ClassifyError> {
        let text = self.ingestor.resolve(inline_text, file)?;
        self.classify_text(&text)
    }

    /// Entrada JSON: chave `texto` (preferida) ou `text`.
    pub fn process_json(
        &self,
        payload: &serde_json::Value,
    ) -> Result<ClassificationResult, ClassifyError> {
        let text = text_from_json(payload).ok_or(ClassifyError::NoContent)?;
        self.classify_text(&text)
    }

    /// Sequência de estágios compartilhada pelas duas entradas.
    pub fn classify_text(&self, text: &str) -> Result<ClassificationResult, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::NoContent);
        }
        let start = Instant::now();

        if triviality::is_trivial(text) {
            tracing::info!(chars = text.chars().count(), "Mensagem trivial, tratada como spam");
            return Ok(self.trivial_result(text));
        }

        let ranking = self.classifier.classify(text)?;
        let categoria = ranking
            .top()
            .map(|s| s.label.clone())
            .ok_or_else(|| ClassifyError::ClassifierUnavailable("ranking vazio".into()))?;

        let (produtividade, produtividade_ranking) = self.resolver.resolve(text, &categoria)?;
        let entidades = self.extractor.extract(text);
        let resposta = self.responder.synthesize(text, &categoria);
        let spam = canonical_label(&categoria) == SPAM_LABEL;

        tracing::info!(
            categoria = %categoria,
            produtividade = %produtividade,
            spam,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Email classificado"
        );

        Ok(ClassificationResult {
            categoria,
            ranking,
            produtividade,
            produtividade_ranking,
            resposta,
            spam,
            entidades,
            texto: text.to_string(),
        })
    }

    /// Resultado do atalho de spam: nenhum modelo envolvido.
    fn trivial_result(&self, text: &str) -> ClassificationResult {
        let labels = self.classifier.labels().iter().map(String::as_str);
        ClassificationResult {
            categoria: SPAM_LABEL.to_string(),
            ranking: RankedScoreList::certain(SPAM_LABEL, labels),
            produtividade: ProductivityLabel::Improdutivo,
            produtividade_ranking: productivity::certain(ProductivityLabel::Improdutivo),
            resposta: String::new(),
            spam: true,
            entidades: ExtractedEntities::default(),
            texto: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::DEFAULT_CATEGORIES;
    use crate::pdf::PdfReader;
    use zero_shot::testing::{FailingScorer, FixedScorer};

    fn pipeline(scorer: Arc<dyn ZeroShotScorer>) -> EmailPipeline {
        let categories = DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect();
        EmailPipeline::new(
            scorer,
            categories,
            Normalizer::new(stopwords::load_stopwords(None, stopwords::LANGUAGE)),
            ContentIngestor::new(4, PdfReader::default()),
        )
    }

    #[test]
    fn trivial_input_short_circuits_to_spam() {
        let scorer = FixedScorer::preferring("fatura");
        let result = pipeline(scorer.clone()).process(Some("123"), None).unwrap();

        assert_eq!(result.categoria, "spam");
        assert_eq!(result.resposta, "");
        assert!(result.spam);
        assert_eq!(result.produtividade, ProductivityLabel::Improdutivo);
        assert_eq!(
            result.produtividade_ranking.pairs(),
            vec![("Improdutivo", 1.0), ("Produtivo", 0.0)]
        );
        assert_eq!(result.ranking.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(result.ranking.pairs()[0], ("spam", 1.0));
        assert_eq!(result.ranking.pairs()[1], ("fatura", 0.0));
        assert!(scorer.calls().is_empty());
    }

    #[test]
    fn receipt_gets_financial_reply_and_mapped_productivity() {
        let scorer = FixedScorer::preferring("comprovante");
        let text = "Segue comprovante de pagamento de R$ 150,00 referente a 10/03/2024";
        let result = pipeline(scorer.clone()).process(Some(text), None).unwrap();

        assert_eq!(result.categoria, "comprovante");
        assert_eq!(result.produtividade, ProductivityLabel::Produtivo);
        assert_eq!(
            result.produtividade_ranking.pairs(),
            vec![("Produtivo", 1.0), ("Improdutivo", 0.0)]
        );
        assert!(result.resposta.contains("R$ 150,00"));
        assert!(result.resposta.contains("10/03/2024"));
        assert!(result.resposta.contains("Equipe Financeira"));
        assert!(!result.spam);
        assert_eq!(result.entidades.valor.as_deref(), Some("R$ 150,00"));
        // só a chamada de categoria; produtividade veio da tabela
        assert_eq!(scorer.calls().len(), 1);
    }

    #[test]
    fn classified_spam_sets_the_flag_and_keeps_reply() {
        let text = "Ganhe dinheiro fácil agora mesmo clicando neste link exclusivo";
        let result = pipeline(FixedScorer::preferring("spam")).classify_text(text).unwrap();
        assert!(result.spam);
        assert!(result.resposta.contains("não temos interesse"));
    }

    #[test]
    fn json_entry_prefers_texto() {
        let payload = serde_json::json!({"texto": "ok", "text": "ignorado porque texto existe"});
        let result = pipeline(FixedScorer::preferring("fatura")).process_json(&payload).unwrap();
        assert_eq!(result.categoria, "spam");
    }

    #[test]
    fn json_without_text_is_no_content() {
        let err = pipeline(Arc::new(FailingScorer))
            .process_json(&serde_json::json!({"assunto": "x"}))
            .unwrap_err();
        assert!(matches!(err, ClassifyError::NoContent));
    }

    #[test]
    fn scorer_failure_aborts_without_result() {
        let text = "Prezados, segue em anexo o relatório trimestral de despesas";
        let err = pipeline(Arc::new(FailingScorer)).classify_text(text).unwrap_err();
        assert!(matches!(err, ClassifyError::ClassifierUnavailable(_)));
    }

    #[test]
    fn file_upload_flows_through_pipeline() {
        let file = UploadedFile::new(
            "cobranca.txt",
            "Informamos que a fatura de R$ 89,90 vence em 15/04/2024, favor efetuar o pagamento"
                .as_bytes()
                .to_vec(),
        );
        let result = pipeline(FixedScorer::preferring("cobrança")).process(None, Some(&file)).unwrap();
        assert_eq!(result.categoria, "cobrança");
        assert!(result.resposta.contains("de R$ 89,90 com vencimento/competência em 15/04/2024."));
    }

    #[test]
    fn unmapped_configured_category_uses_productivity_fallback() {
        let scorer = FixedScorer::preferring("newsletter");
        let pipeline = EmailPipeline::new(
            scorer.clone(),
            vec!["newsletter".into(), "fatura".into()],
            Normalizer::new(HashSet::new()),
            ContentIngestor::new(4, PdfReader::default()),
        );
        let result = pipeline
            .classify_text("Confira as novidades desta semana em nosso boletim informativo")
            .unwrap();
        assert_eq!(result.categoria, "newsletter");
        assert_eq!(result.produtividade_ranking.len(), 2);
        assert_eq!(scorer.calls().len(), 2);
        assert!(result.resposta.ends_with("Equipe"));
    }
}
