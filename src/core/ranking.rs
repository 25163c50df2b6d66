//! # Ranking de Scores — A Saída de Toda Classificação
//!
//! Toda classificação (categoria ou produtividade) produz um
//! [`RankedScoreList`]: a lista completa de labels candidatos com seus
//! scores, **ordenada de forma decrescente**. O primeiro elemento é o
//! label vencedor ("top").
//!
//! ```text
//! [("comprovante", 0.71), ("fatura", 0.12), ("cobrança", 0.09), ...]
//!        ↑ top
//! ```
//!
//! A ordenação é garantida pelo construtor — não existe forma de criar
//! um ranking fora de ordem, então quem consome nunca precisa reordenar.

use std::cmp::Ordering;

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

/// Um label candidato com seu score ∈ [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredLabel {
    /// Label como retornado pelo classificador (diacríticos preservados).
    pub label: String,
    /// Score normalizado.
    pub score: f32,
}

impl ScoredLabel {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Serializa como tupla `["label", score]`, o mesmo formato de par que o
/// frontend e a API JSON consomem.
impl Serialize for ScoredLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.label)?;
        tuple.serialize_element(&self.score)?;
        tuple.end()
    }
}

/// Lista de [`ScoredLabel`] ordenada por score decrescente.
///
/// Os scores vêm de uma única chamada de classificação sobre o mesmo
/// universo de labels; não precisam somar exatamente 1.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedScoreList(Vec<ScoredLabel>);

impl RankedScoreList {
    /// Constrói o ranking a partir de pares em qualquer ordem.
    ///
    /// A ordenação é estável: empates preservam a ordem de entrada,
    /// o que mantém rankings degenerados (`1.0, 0.0, 0.0, ...`) na ordem
    /// em que os labels foram configurados. Scores `NaN` vão para o fim.
    pub fn from_unsorted<I, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, f32)>,
        L: Into<String>,
    {
        let mut items: Vec<ScoredLabel> = pairs
            .into_iter()
            .map(|(label, score)| ScoredLabel::new(label, score))
            .collect();
        items.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
        });
        Self(items)
    }

    /// Ranking determinístico: `winner` com score 1.0, os demais com 0.0.
    ///
    /// Não é uma confiança real — serve para que o caminho determinístico
    /// tenha o mesmo formato de resultado que o caminho estatístico.
    pub fn certain<'a>(winner: &str, others: impl IntoIterator<Item = &'a str>) -> Self {
        let rest = others
            .into_iter()
            .filter(|label| *label != winner)
            .map(|label| (label.to_string(), 0.0));
        Self::from_unsorted(std::iter::once((winner.to_string(), 1.0)).chain(rest))
    }

    /// O label vencedor, se o ranking não estiver vazio.
    pub fn top(&self) -> Option<&ScoredLabel> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredLabel> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pares `(label, score)` — formato conveniente para asserções e templates.
    pub fn pairs(&self) -> Vec<(&str, f32)> {
        self.0.iter().map(|s| (s.label.as_str(), s.score)).collect()
    }
}

impl<'a> IntoIterator for &'a RankedScoreList {
    type Item = &'a ScoredLabel;
    type IntoIter = std::slice::Iter<'a, ScoredLabel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
