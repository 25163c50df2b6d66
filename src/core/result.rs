//! Resultado de uma classificação — o pacote entregue à camada web.

use serde::Serialize;

use super::productivity::ProductivityLabel;
use super::ranking::RankedScoreList;

/// Entidades extraídas do corpo do email.
///
/// Os valores são o texto **exatamente como encontrado** — sem conversão
/// para número ou data. Ausência é `None`, nunca string vazia, para que os
/// templates possam omitir a cláusula inteira.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedEntities {
    /// Valor monetário, ex: "R$ 150,00".
    pub valor: Option<String>,
    /// Data de referência, ex: "10/03/2024".
    pub data: Option<String>,
}

/// Resultado completo de uma classificação bem-sucedida.
///
/// Imutável após construção; nunca existe resultado parcial.
#[derive(Clone, Debug, Serialize)]
pub struct ClassificationResult {
    /// Categoria vencedora, como devolvida pelo classificador.
    pub categoria: String,
    /// Ranking completo das categorias.
    pub ranking: RankedScoreList,
    /// Produtividade resolvida.
    pub produtividade: ProductivityLabel,
    /// Ranking sobre exatamente {Produtivo, Improdutivo}.
    pub produtividade_ranking: RankedScoreList,
    /// Resposta sugerida (vazia no atalho de spam trivial).
    pub resposta: String,
    /// `true` quando a mensagem foi tratada como spam.
    pub spam: bool,
    /// Entidades usadas na resposta.
    pub entidades: ExtractedEntities,
    /// Texto que foi classificado. Fica fora do JSON: só a página de
    /// resultado e as métricas usam.
    #[serde(skip)]
    pub texto: String,
}
