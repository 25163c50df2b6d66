//! # Resolvedor de Produtividade
//!
//! ```text
//! categoria ──canonical──► tabela estática? ──sim──► (label, [(label,1.0),(outro,0.0)])
//!                                │
//!                               não
//!                                ▼
//!            scorer(texto normalizado, ["Produtivo","Improdutivo"], "Este email é {}.")
//! ```
//!
//! O caminho da tabela nunca chama o modelo.

use std::sync::Arc;

use crate::core::{canonical_label, productivity_for, ProductivityLabel, RankedScoreList};
use crate::error::ClassifyError;

use super::normalizer::Normalizer;
use super::zero_shot::ZeroShotScorer;

/// Template de hipótese do fallback binário.
pub const PRODUCTIVITY_HYPOTHESIS: &str = "Este email é {}.";

pub struct ProductivityResolver {
    scorer: Arc<dyn ZeroShotScorer>,
    normalizer: Arc<Normalizer>,
    /// Labels de categoria configurados, já canônicos.
    known_categories: Vec<String>,
}

impl ProductivityResolver {
    pub fn new(
        scorer: Arc<dyn ZeroShotScorer>,
        normalizer: Arc<Normalizer>,
        categories: &[String],
    ) -> Self {
        Self {
            scorer,
            normalizer,
            known_categories: categories.iter().map(|c| canonical_label(c)).collect(),
        }
    }

    /// Resolve a produtividade de `text` já classificado em `category`.
    pub fn resolve(
        &self,
        text: &str,
        category: &str,
    ) -> Result<(ProductivityLabel, RankedScoreList), ClassifyError> {
        let canonical = canonical_label(category);

        if let Some(label) = productivity_for(&canonical) {
            tracing::debug!(category = %canonical, productivity = %label, "Produtividade pela tabela");
            return Ok((label, certain(label)));
        }

        if !canonical.is_empty() && !self.known_categories.contains(&canonical) {
            tracing::warn!(category = %canonical, "Categoria fora do conjunto configurado");
        }
        self.score_binary(text)
    }

    fn score_binary(&self, text: &str) -> Result<(ProductivityLabel, RankedScoreList), ClassifyError> {
        let normalized = self.normalizer.normalize_for_scoring(text);
        let labels: Vec<String> = ProductivityLabel::ALL
            .iter()
            .map(|l| l.as_str().to_string())
            .collect();

        let ranking = self
            .scorer
            .score(&normalized, &labels, PRODUCTIVITY_HYPOTHESIS)
            .map_err(|e| ClassifyError::unavailable(&e))?;

        let top = ranking
            .top()
            .ok_or_else(|| ClassifyError::ClassifierUnavailable("ranking de produtividade vazio".into()))?;
        let label = top
            .label
            .parse::<ProductivityLabel>()
            .map_err(|e| ClassifyError::ClassifierUnavailable(e.to_string()))?;

        tracing::debug!(productivity = %label, score = top.score, "Produtividade pelo classificador");
        Ok((label, ranking))
    }
}

/// Ranking degenerado `[(label, 1.0), (outro, 0.0)]`.
pub fn certain(label: ProductivityLabel) -> RankedScoreList {
    RankedScoreList::certain(label.as_str(), [label.other().as_str()])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::productivity::mapped_categories;
    use crate::core::DEFAULT_CATEGORIES;
    use crate::nlu::zero_shot::testing::{FailingScorer, FixedScorer, ScriptedScorer};

    fn resolver(scorer: Arc<dyn ZeroShotScorer>) -> ProductivityResolver {
        let categories: Vec<String> = DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect();
        ProductivityResolver::new(scorer, Arc::new(Normalizer::new(HashSet::new())), &categories)
    }

    #[test]
    fn mapped_category_never_calls_scorer() {
        let resolver = resolver(Arc::new(FailingScorer));
        let (label, ranking) = resolver.resolve("qualquer", "fatura").unwrap();
        assert_eq!(label, ProductivityLabel::Produtivo);
        assert_eq!(ranking.pairs(), vec![("Produtivo", 1.0), ("Improdutivo", 0.0)]);
    }

    #[test]
    fn map_is_total_and_case_insensitive() {
        let resolver = resolver(Arc::new(FailingScorer));
        for category in mapped_categories() {
            let shouted = format!("  {}  ", category.to_uppercase());
            let (label, ranking) = resolver.resolve("texto", &shouted).unwrap();
            assert_eq!(Some(label), productivity_for(category));
            assert_eq!(ranking.top().map(|s| s.score), Some(1.0));
        }
    }

    #[test]
    fn spam_is_improdutivo() {
        let (label, ranking) = resolver(Arc::new(FailingScorer)).resolve("x", "Spam").unwrap();
        assert_eq!(label, ProductivityLabel::Improdutivo);
        assert_eq!(ranking.pairs(), vec![("Improdutivo", 1.0), ("Produtivo", 0.0)]);
    }

    #[test]
    fn unmapped_category_uses_binary_fallback_on_normalized_text() {
        let scorer = FixedScorer::preferring("Improdutivo");
        let (label, ranking) = resolver(scorer.clone())
            .resolve("Newsletter DE Março!", "newsletter")
            .unwrap();
        assert_eq!(label, ProductivityLabel::Improdutivo);
        assert_eq!(ranking.len(), 2);

        let calls = scorer.calls();
        assert_eq!(calls[0].labels, vec!["Produtivo", "Improdutivo"]);
        assert_eq!(calls[0].template, "Este email é {}.");
        assert_eq!(calls[0].text, "newsletter de março");
    }

    #[test]
    fn empty_category_takes_statistical_path() {
        let scorer = FixedScorer::preferring("Produtivo");
        let (label, _) = resolver(scorer.clone()).resolve("texto", "").unwrap();
        assert_eq!(label, ProductivityLabel::Produtivo);
        assert_eq!(scorer.calls().len(), 1);
    }

    #[test]
    fn unknown_top_label_is_unavailable() {
        let scorer = Arc::new(ScriptedScorer(vec![("Talvez", 0.8), ("Produtivo", 0.2)]));
        let err = resolver(scorer).resolve("texto", "newsletter").unwrap_err();
        assert!(matches!(err, ClassifyError::ClassifierUnavailable(_)));
    }

    #[test]
    fn fallback_failure_is_unavailable() {
        let err = resolver(Arc::new(FailingScorer)).resolve("texto", "outro").unwrap_err();
        assert!(matches!(err, ClassifyError::ClassifierUnavailable(_)));
    }
}
