//! # Classificação Zero-Shot — A Capacidade Estatística Injetada
//!
//! Todo julgamento estatístico do pipeline passa por um único trait,
//! [`ZeroShotScorer`]: dado um texto, um conjunto de labels candidatos e um
//! template de hipótese, devolve o ranking completo.
//!
//! ```text
//! texto: "Segue a fatura de março"
//! labels: ["fatura", "spam", ...]
//! template: "Este email é sobre {}."
//!        ↓
//! hipóteses: "Este email é sobre fatura.", "Este email é sobre spam.", ...
//!        ↓
//! RankedScoreList [("fatura", 0.83), ("cobrança", 0.07), ...]
//! ```
//!
//! ## Inicialização Preguiçosa
//!
//! Carregar o modelo NLI custa segundos e ~2 GB de RAM. O [`LazyScorer`]
//! adia a construção até o primeiro uso e garante:
//!
//! | Situação | Comportamento |
//! |----------|---------------|
//! | várias requisições simultâneas no primeiro uso | o loader roda **uma** vez; as demais esperam |
//! | loader falha | o erro volta para quem chamou; **não** fica em cache |
//! | já inicializado | leitura sem lock |

use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::OnceCell;

use crate::core::RankedScoreList;

/// Capacidade de classificação zero-shot.
///
/// Implementações devem devolver um score para **cada** label recebido,
/// todos vindos da mesma chamada.
pub trait ZeroShotScorer: Send + Sync {
    fn score(
        &self,
        text: &str,
        labels: &[String],
        hypothesis_template: &str,
    ) -> Result<RankedScoreList>;
}

/// Preenche o primeiro `{}` do template com o label.
pub fn fill_hypothesis(template: &str, label: &str) -> String {
    template.replacen("{}", label, 1)
}

/// Função que constrói o scorer concreto.
pub type ScorerLoader = Box<dyn Fn() -> Result<Arc<dyn ZeroShotScorer>> + Send + Sync>;

/// Handle de scorer construído no primeiro uso.
///
/// É ele que o pipeline recebe; a rota `/status` consulta [`is_ready`](Self::is_ready).
pub struct LazyScorer {
    cell: OnceCell<Arc<dyn ZeroShotScorer>>,
    loader: ScorerLoader,
}

impl LazyScorer {
    pub fn new(loader: ScorerLoader) -> Self {
        Self {
            cell: OnceCell::new(),
            loader,
        }
    }

    /// Devolve o scorer, construindo-o se necessário.
    pub fn get(&self) -> Result<&Arc<dyn ZeroShotScorer>> {
        self.cell.get_or_try_init(|| {
            tracing::info!("Inicializando classificador zero-shot...");
            let start = std::time::Instant::now();
            let scorer = (self.loader)().inspect_err(|e| {
                tracing::error!(error = %format!("{e:#}"), "Falha ao inicializar classificador");
            })?;
            tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "Classificador pronto");
            Ok(scorer)
        })
    }

    /// `true` depois da primeira inicialização bem-sucedida.
    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl ZeroShotScorer for LazyScorer {
    fn score(
        &self,
        text: &str,
        labels: &[String],
        hypothesis_template: &str,
    ) -> Result<RankedScoreList> {
        self.get()?.score(text, labels, hypothesis_template)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::testing::*;
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fills_only_the_first_placeholder() {
        assert_eq!(fill_hypothesis("Este email é sobre {}.", "fatura"), "Este email é sobre fatura.");
        assert_eq!(fill_hypothesis("{} e {}", "a"), "a e {}");
        assert_eq!(fill_hypothesis("sem marcador", "a"), "sem marcador");
    }

    #[test]
    fn initializes_once_under_concurrent_first_use() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = Arc::new(LazyScorer::new(counting_loader(0, calls.clone())));
        assert!(!lazy.is_ready());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = lazy.clone();
                std::thread::spawn(move || {
                    lazy.score("texto", &labels(&["fatura", "spam"]), "{}").map(|r| r.len())
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap(), 2);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lazy.is_ready());
    }

    #[test]
    fn failed_initialization_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = LazyScorer::new(counting_loader(1, calls.clone()));

        let err = lazy.score("x", &labels(&["fatura"]), "{}").unwrap_err();
        assert!(err.to_string().contains("download interrompido"));
        assert!(!lazy.is_ready());

        assert!(lazy.score("x", &labels(&["fatura"]), "{}").is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(lazy.is_ready());
    }

    #[test]
    fn fixed_scorer_ranks_preferred_first() {
        let scorer = FixedScorer::preferring("spam");
        let ranking = scorer.score("t", &labels(&["fatura", "spam", "oferta"]), "{}").unwrap();
        assert_eq!(ranking.top().map(|s| s.label.as_str()), Some("spam"));
        assert_eq!(ranking.len(), 3);
        assert_eq!(scorer.calls().len(), 1);
    }
}
