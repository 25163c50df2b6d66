//! # Extrator de Entidades — Valor e Data
//!
//! O [`EntityExtractor`] procura no corpo **bruto** do email (antes da
//! normalização, para não perder `R$`, vírgulas e barras) duas entidades
//! opcionais:
//!
//! | Entidade | Padrão | Exemplos |
//! |----------|--------|----------|
//! | valor | `R$` opcional + milhar com `.` + centavos com `,` | `R$ 150,00`, `1.234,56`, `R$ 99` |
//! | data | `d/m/aa` a `dd/mm/aaaa` | `10/03/2024`, `1/2/24` |
//!
//! Só a **primeira** ocorrência de cada uma é usada. Nada é convertido
//! nem validado: `31/02/2024` é devolvido como está.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::ExtractedEntities;

static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:R\$\s*)?[\d\.]{1,3}(?:\.\d{3})*(?:,\d{2})|R\$\s*[\d,\.]+")
        .expect("invalid regex")
});

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2}/\d{1,2}/\d{2,4})\b").expect("invalid regex"));

/// Extrator de valor monetário e data de referência.
///
/// Sem estado: as regexes são compiladas uma vez por processo.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> ExtractedEntities {
        ExtractedEntities {
            valor: MONEY_RE.find(text).map(|m| m.as_str().to_string()),
            data: DATE_RE
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> ExtractedEntities {
        EntityExtractor::new().extract(text)
    }

    #[test]
    fn finds_money_and_date() {
        let e = extract("Segue comprovante de pagamento de R$ 150,00 referente a 10/03/2024");
        assert_eq!(e.valor.as_deref(), Some("R$ 150,00"));
        assert_eq!(e.data.as_deref(), Some("10/03/2024"));
    }

    #[test]
    fn thousands_separator() {
        let e = extract("Total: R$ 1.234,56 até amanhã");
        assert_eq!(e.valor.as_deref(), Some("R$ 1.234,56"));
    }

    #[test]
    fn amount_without_currency_symbol() {
        assert_eq!(extract("valor de 89,90 no cartão").valor.as_deref(), Some("89,90"));
    }

    #[test]
    fn currency_without_cents() {
        assert_eq!(extract("custa r$ 99 por mês").valor.as_deref(), Some("r$ 99"));
    }

    #[test]
    fn first_match_wins() {
        let e = extract("Parcela de R$ 10,00 em 01/01/2024 e R$ 20,00 em 01/02/2024");
        assert_eq!(e.valor.as_deref(), Some("R$ 10,00"));
        assert_eq!(e.data.as_deref(), Some("01/01/2024"));
    }

    #[test]
    fn dates_are_not_validated() {
        assert_eq!(extract("vence 31/02/24").data.as_deref(), Some("31/02/24"));
    }

    #[test]
    fn absent_entities_are_none() {
        let e = extract("Bom dia, tudo bem?");
        assert_eq!(e, ExtractedEntities::default());
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "Boleto de R$ 300,00 vencendo 05/06/2025";
        assert_eq!(extract(text), extract(text));
    }
}
