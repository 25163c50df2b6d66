//! # Sintetizador de Respostas — Templates por Categoria
//!
//! Cada [`Category`] tem um template fixo: uma sequência de frases. Uma
//! frase é feita de fragmentos literais e de fragmentos de entidade, que só
//! aparecem quando a entidade foi extraída:
//!
//! ```text
//! [Lit("Obrigado por enviar o comprovante"), Money(" de "), Date(" referente a "), Lit(".")]
//!
//!   valor = "R$ 150,00", data = "10/03/2024"
//!     → "Obrigado por enviar o comprovante de R$ 150,00 referente a 10/03/2024."
//!   valor = None, data = None
//!     → "Obrigado por enviar o comprovante."
//! ```
//!
//! As frases não vazias são unidas por um espaço. A saída depende só de
//! (texto, categoria): mesma entrada, mesmos bytes.

use crate::core::{Category, ExtractedEntities};

use super::extractor::EntityExtractor;

/// Pedaço de uma frase de template.
#[derive(Clone, Copy, Debug)]
enum Fragment {
    Lit(&'static str),
    /// Prefixo + valor monetário, omitido sem valor.
    Money(&'static str),
    /// Prefixo + data, omitido sem data.
    Date(&'static str),
}

use Fragment::{Date, Lit, Money};

type Template = &'static [&'static [Fragment]];

const GREETING: &[Fragment] = &[Lit("Olá,")];
const CLOSING: &[Fragment] = &[Lit("Atenciosamente,")];

const FATURA: Template = &[
    GREETING,
    &[Lit("Recebemos sua fatura"), Money(" no valor de "), Date(" com referência em "), Lit(".")],
    &[Lit("Estamos conferindo os detalhes e enviaremos a confirmação/posicionamento em breve.")],
    &[Lit("Caso precise de algo adicional, fique à vontade para responder este email.")],
    CLOSING,
    &[Lit("Equipe de Suporte")],
];

const COMPROVANTE: Template = &[
    GREETING,
    &[Lit("Obrigado por enviar o comprovante"), Money(" de "), Date(" referente a "), Lit(".")],
    &[Lit("Vamos validar o recebimento e atualizaremos o status assim que possível.")],
    &[Lit("Se houver qualquer divergência, retornaremos com orientações.")],
    CLOSING,
    &[Lit("Equipe Financeira")],
];

const COBRANCA: Template = &[
    GREETING,
    &[
        Lit("Identificamos sua mensagem sobre cobrança"),
        Money(" de "),
        Date(" com vencimento/competência em "),
        Lit("."),
    ],
    &[Lit("Estamos analisando o caso e retornaremos com os próximos passos.")],
    &[Lit("Se possível, confirme dados do pagamento ou anexe documentos complementares.")],
    CLOSING,
    &[Lit("Equipe Financeira")],
];

const OFERTA: Template = &[
    GREETING,
    &[Lit("Agradecemos o contato e a proposta compartilhada.")],
    &[Lit("Encaminhamos internamente para avaliação e retornaremos caso seja de interesse.")],
    &[Lit("Obrigado pela compreensão.")],
    CLOSING,
    &[Lit("Equipe de Parcerias")],
];

const SPAM: Template = &[
    GREETING,
    &[Lit("Agradecemos a mensagem. No momento, não temos interesse.")],
    &[Lit("Por gentileza, remova este email de listas de distribuição, se aplicável.")],
    CLOSING,
    &[Lit("Equipe")],
];

const SUPORTE: Template = &[
    GREETING,
    &[Lit("Obrigado por entrar em contato com o suporte.")],
    &[Lit("Registramos seu chamado e nossa equipe está investigando o ocorrido.")],
    &[Lit("Assim que tivermos uma atualização, retornaremos com instruções.")],
    CLOSING,
    &[Lit("Suporte Técnico")],
];

const RELATORIO: Template = &[
    GREETING,
    &[Lit("Recebemos o relatório"), Date(" referente a "), Lit(".")],
    &[Lit("Vamos revisar as informações e enviaremos um parecer em seguida.")],
    &[Lit("Obrigado pelo envio.")],
    CLOSING,
    &[Lit("Equipe")],
];

const ALERTA_SEGURANCA: Template = &[
    GREETING,
    &[Lit("Agradecemos o alerta. Levamos segurança muito a sério.")],
    &[Lit("Nossa equipe já está verificando o incidente reportado e tomará as medidas cabíveis.")],
    &[Lit("Se possível, mantenha o canal aberto para trocarmos mais detalhes.")],
    CLOSING,
    &[Lit("Segurança da Informação")],
];

const DEMISSAO: Template = &[
    GREETING,
    &[Lit("Acusamos o recebimento do seu pedido de demissão"), Date(" datado de "), Lit(".")],
    &[Lit("Agradecemos pela colaboração prestada até aqui.")],
    &[Lit(
        "Nossa equipe de RH dará sequência aos procedimentos de desligamento e retornará com \
         as orientações sobre documentos, prazos e eventuais acertos (ex.: aviso prévio, \
         devolução de equipamentos).",
    )],
    &[Lit("Se precisar de alguma declaração ou tiver dúvidas, por favor, responda este email.")],
    &[Lit("Desejamos sucesso em seus próximos passos.")],
    CLOSING,
    &[Lit("Recursos Humanos")],
];

const GENERIC: Template = &[
    GREETING,
    &[Lit("Obrigado pela sua mensagem.")],
    &[Lit("Estamos analisando o conteúdo e retornaremos em breve com os próximos passos.")],
    CLOSING,
    &[Lit("Equipe")],
];

fn template_for(category: Category) -> Template {
    match category {
        Category::Fatura => FATURA,
        Category::Comprovante => COMPROVANTE,
        Category::Cobranca => COBRANCA,
        Category::Oferta => OFERTA,
        Category::Spam => SPAM,
        Category::Suporte => SUPORTE,
        Category::Relatorio => RELATORIO,
        Category::AlertaSeguranca => ALERTA_SEGURANCA,
        Category::Demissao => DEMISSAO,
        Category::Generic => GENERIC,
    }
}

fn render_sentence(fragments: &[Fragment], entities: &ExtractedEntities) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            Lit(text) => out.push_str(text),
            Money(prefix) => {
                if let Some(valor) = &entities.valor {
                    out.push_str(prefix);
                    out.push_str(valor);
                }
            }
            Date(prefix) => {
                if let Some(data) = &entities.data {
                    out.push_str(prefix);
                    out.push_str(data);
                }
            }
        }
    }
    out
}

/// Gera respostas determinísticas a partir da categoria e das entidades.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseSynthesizer {
    extractor: EntityExtractor,
}

impl ResponseSynthesizer {
    pub fn new(extractor: EntityExtractor) -> Self {
        Self { extractor }
    }

    /// Extrai as entidades de `text` e monta a resposta para `category`.
    pub fn synthesize(&self, text: &str, category: &str) -> String {
        let entities = self.extractor.extract(text);
        self.reply_for(Category::from_label(category), &entities)
    }

    /// Monta a resposta com entidades já extraídas.
    pub fn reply_for(&self, category: Category, entities: &ExtractedEntities) -> String {
        template_for(category)
            .iter()
            .map(|sentence| render_sentence(sentence, entities))
            .filter(|sentence| !sentence.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synth() -> ResponseSynthesizer {
        ResponseSynthesizer::default()
    }

    #[test]
    fn comprovante_interpolates_money_and_date() {
        let reply = synth().synthesize(
            "Segue comprovante de pagamento de R$ 150,00 referente a 10/03/2024",
            "comprovante",
        );
        assert!(reply.contains("Obrigado por enviar o comprovante de R$ 150,00 referente a 10/03/2024."));
        assert!(reply.ends_with("Atenciosamente, Equipe Financeira"));
        assert!(reply.starts_with("Olá, "));
    }

    #[test]
    fn missing_entities_drop_their_clauses() {
        let reply = synth().synthesize("Segue a fatura em anexo", "Fatura");
        assert!(reply.contains("Recebemos sua fatura. Estamos conferindo"));
        assert!(!reply.contains("no valor de"));
        assert!(!reply.contains("  "));
    }

    #[test]
    fn only_date_clause_renders_when_only_date_present() {
        let reply = synth().synthesize("Cobrança com vencimento 05/06/2025", "cobrança");
        assert!(reply.contains("sobre cobrança com vencimento/competência em 05/06/2025."));
    }

    #[test]
    fn resignation_variants_share_template() {
        let a = synth().synthesize("Peço demissão a partir de 01/08/2024", "Carta de Demissão");
        assert!(a.contains("pedido de demissão datado de 01/08/2024."));
        assert!(a.ends_with("Recursos Humanos"));
    }

    #[test]
    fn unknown_category_uses_generic_template() {
        let reply = synth().synthesize("qualquer coisa", "newsletter");
        assert_eq!(
            reply,
            "Olá, Obrigado pela sua mensagem. Estamos analisando o conteúdo e retornaremos \
             em breve com os próximos passos. Atenciosamente, Equipe"
        );
    }

    #[test]
    fn every_category_has_a_signed_reply() {
        let signatures = [
            (Category::Fatura, "Equipe de Suporte"),
            (Category::Oferta, "Equipe de Parcerias"),
            (Category::Suporte, "Suporte Técnico"),
            (Category::AlertaSeguranca, "Segurança da Informação"),
            (Category::Spam, "Equipe"),
            (Category::Relatorio, "Equipe"),
        ];
        for (category, signature) in signatures {
            let reply = synth().reply_for(category, &ExtractedEntities::default());
            assert!(reply.ends_with(signature), "{category}: {reply}");
        }
    }

    #[test]
    fn synthesis_is_deterministic() {
        let text = "Relatório mensal de 03/2024 fechado em 31/03/2024";
        assert_eq!(synth().synthesize(text, "relatório"), synth().synthesize(text, "relatório"));
    }
}
