//! Classificador de categoria: delega ao [`ZeroShotScorer`] com os labels
//! configurados e o template `"Este email é sobre {}."`.

use std::sync::Arc;

use crate::core::RankedScoreList;
use crate::error::ClassifyError;

use super::zero_shot::ZeroShotScorer;

/// Template de hipótese para as categorias.
pub const CATEGORY_HYPOTHESIS: &str = "Este email é sobre {}.";

pub struct CategoryClassifier {
    scorer: Arc<dyn ZeroShotScorer>,
    labels: Vec<String>,
    template: String,
}

impl CategoryClassifier {
    pub fn new(scorer: Arc<dyn ZeroShotScorer>, labels: Vec<String>) -> Self {
        Self {
            scorer,
            labels,
            template: CATEGORY_HYPOTHESIS.to_string(),
        }
    }

    /// Labels na ordem configurada.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Ranking completo sobre os labels configurados.
    ///
    /// Qualquer falha do scorer vira [`ClassifyError::ClassifierUnavailable`];
    /// não há fallback local.
    pub fn classify(&self, text: &str) -> Result<RankedScoreList, ClassifyError> {
        let ranking = self
            .scorer
            .score(text, &self.labels, &self.template)
            .map_err(|e| ClassifyError::unavailable(&e))?;
        if ranking.is_empty() {
            return Err(ClassifyError::ClassifierUnavailable(
                "classificador devolveu ranking vazio".into(),
            ));
        }
        Ok(ranking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_CATEGORIES;
    use crate::nlu::zero_shot::testing::{FailingScorer, FixedScorer};

    fn default_labels() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sends_configured_labels_with_category_template() {
        let scorer = FixedScorer::preferring("cobrança");
        let classifier = CategoryClassifier::new(scorer.clone(), default_labels());

        let ranking = classifier.classify("Seu boleto venceu ontem").unwrap();
        assert_eq!(ranking.top().map(|s| s.label.as_str()), Some("cobrança"));
        assert_eq!(ranking.len(), DEFAULT_CATEGORIES.len());

        let calls = scorer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].template, "Este email é sobre {}.");
        assert_eq!(calls[0].labels, default_labels());
        assert_eq!(calls[0].text, "Seu boleto venceu ontem");
    }

    #[test]
    fn scorer_failure_is_unavailable() {
        let classifier = CategoryClassifier::new(Arc::new(FailingScorer), default_labels());
        let err = classifier.classify("texto").unwrap_err();
        match err {
            ClassifyError::ClassifierUnavailable(msg) => assert!(msg.contains("modelo fora do ar")),
            other => panic!("esperava ClassifierUnavailable, veio {other:?}"),
        }
    }
}
