//! # Scorer XNLI — Zero-Shot via Inferência de Linguagem Natural
//!
//! O [`XnliScorer`] implementa [`ZeroShotScorer`] com um modelo
//! **XLM-RoBERTa** ajustado em XNLI (padrão `joeddav/xlm-roberta-large-xnli`),
//! multilíngue e portanto adequado a emails em Português.
//!
//! ## Como NLI vira classificação
//!
//! Cada label candidato vira uma hipótese. O modelo julga se o texto
//! (premissa) **implica** a hipótese:
//!
//! ```text
//! premissa:  "segue o boleto com vencimento dia 10"
//! hipótese:  "Este email é sobre cobrança."
//!                   ↓
//! XLM-R → logits [contradiction, neutral, entailment]
//!                   ↓
//! logit de entailment de cada par → softmax entre os labels
//! ```
//!
//! Todos os pares rodam num único batch com padding; a premissa é
//! truncada para caber em 512 tokens (a hipótese nunca é cortada).
//!
//! ## Carregamento
//!
//! | Componente | Preferido | Fallback |
//! |-----------|-----------|----------|
//! | Tokenizer | `tokenizer.json` do modelo | `tokenizer.json` de `FacebookAI/xlm-roberta-large` |
//! | Pesos | `model.safetensors` | `pytorch_model.bin` |
//! | Índice de entailment | `label2id` do `config.json` | — (erro) |
//! | Device | CPU | — |

use std::collections::HashMap;

use anyhow::{Context, Result};
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::ops::softmax;
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config, XLMRobertaForSequenceClassification};
use hf_hub::api::sync::{Api, ApiRepo};
use tokenizers::{Tokenizer, TruncationParams, TruncationStrategy};

use super::zero_shot::{fill_hypothesis, ZeroShotScorer};
use crate::core::RankedScoreList;

/// Modelo NLI padrão.
pub const DEFAULT_MODEL: &str = "joeddav/xlm-roberta-large-xnli";

/// Repositório de onde vem o tokenizer quando o modelo não publica `tokenizer.json`.
const TOKENIZER_FALLBACK_REPO: &str = "FacebookAI/xlm-roberta-large";

/// Id de `<pad>` no vocabulário sentencepiece do XLM-R.
const XLMR_PAD_ID: u32 = 1;

/// Comprimento máximo de um par premissa + hipótese.
const MAX_SEQ_LEN: usize = 512;

/// Scorer zero-shot sobre XLM-RoBERTa XNLI, rodando em CPU via candle.
pub struct XnliScorer {
    model: XLMRobertaForSequenceClassification,
    tokenizer: Tokenizer,
    /// Coluna dos logits que corresponde a "entailment".
    entailment_id: usize,
    pad_id: u32,
    device: Device,
}

/// Campos do `config.json` que o `Config` do candle não carrega.
#[derive(serde::Deserialize)]
struct LabelMaps {
    #[serde(default)]
    label2id: HashMap<String, usize>,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

impl XnliScorer {
    /// Baixa (ou lê do cache `~/.cache/huggingface/`) e instancia o modelo.
    ///
    /// Operação bloqueante e pesada: chamar fora do runtime async
    /// (`spawn_blocking`) ou através do [`LazyScorer`](super::zero_shot::LazyScorer).
    pub fn load(repo_id: &str) -> Result<Self> {
        let device = Device::Cpu;
        tracing::info!("Loading NLI model ({}) from HuggingFace Hub...", repo_id);

        let api = Api::new().context("Failed to create HF Hub API")?;
        let repo = api.model(repo_id.to_string());

        // ─── Config + mapa de labels ──────────────────────────────
        let config_path = repo.get("config.json").context("Failed to download config.json")?;
        let config_str = std::fs::read_to_string(&config_path)?;
        let mut raw: serde_json::Value =
            serde_json::from_str(&config_str).context("Failed to parse config.json")?;
        // checkpoints antigos não declaram o tipo de posição
        if let Some(obj) = raw.as_object_mut() {
            obj.entry("position_embedding_type")
                .or_insert_with(|| serde_json::Value::String("absolute".into()));
        }
        let maps: LabelMaps =
            serde_json::from_value(raw.clone()).context("Failed to parse label maps")?;
        let config: Config =
            serde_json::from_value(raw).context("Failed to parse model config")?;

        let entailment_id = maps
            .label2id
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case("entailment"))
            .map(|(_, &id)| id)
            .with_context(|| {
                let available: Vec<_> = maps.label2id.keys().cloned().collect();
                format!("Missing 'entailment' in label2id. Available: {}", available.join(", "))
            })?;
        let num_labels = maps.id2label.len().max(maps.label2id.len());
        tracing::info!(entailment_id, num_labels, "NLI label map loaded");

        // ─── Tokenizer ────────────────────────────────────────────
        let mut tokenizer = load_tokenizer(&api, &repo)?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LEN,
                strategy: TruncationStrategy::OnlyFirst,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;
        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id("<pad>"))
            .unwrap_or(XLMR_PAD_ID);

        // ─── Pesos ────────────────────────────────────────────────
        let vb = match repo.get("model.safetensors") {
            Ok(path) => {
                tracing::info!("Loading from model.safetensors...");
                unsafe {
                    VarBuilder::from_mmaped_safetensors(&[path], DType::F32, &device)
                        .context("Failed to load safetensors weights")?
                }
            }
            Err(_) => {
                tracing::info!("Falling back to pytorch_model.bin...");
                let path = repo
                    .get("pytorch_model.bin")
                    .context("Failed to download pytorch_model.bin")?;
                VarBuilder::from_pth(&path, DType::F32, &device)
                    .context("Failed to load pytorch weights")?
            }
        };

        let model = XLMRobertaForSequenceClassification::new(num_labels, &config, vb)
            .context("Failed to load XLM-RoBERTa classifier")?;

        tracing::info!("NLI model loaded successfully on {:?}!", device);
        Ok(Self {
            model,
            tokenizer,
            entailment_id,
            pad_id,
            device,
        })
    }
}

/// `tokenizer.json` do próprio modelo ou, na falta dele, do XLM-R base.
fn load_tokenizer(api: &Api, repo: &ApiRepo) -> Result<Tokenizer> {
    let path = match repo.get("tokenizer.json") {
        Ok(path) => path,
        Err(_) => {
            tracing::info!(
                "tokenizer.json not available, using tokenizer from {}...",
                TOKENIZER_FALLBACK_REPO
            );
            api.model(TOKENIZER_FALLBACK_REPO.to_string())
                .get("tokenizer.json")
                .context("Failed to download fallback tokenizer.json")?
        }
    };
    Tokenizer::from_file(&path).map_err(|e| anyhow::anyhow!("{}", e))
}

impl ZeroShotScorer for XnliScorer {
    fn score(
        &self,
        text: &str,
        labels: &[String],
        hypothesis_template: &str,
    ) -> Result<RankedScoreList> {
        if labels.is_empty() {
            return Ok(RankedScoreList::default());
        }

        let encodings = labels
            .iter()
            .map(|label| {
                let hypothesis = fill_hypothesis(hypothesis_template, label);
                self.tokenizer
                    .encode((text, hypothesis.as_str()), true)
                    .map_err(|e| anyhow::anyhow!("Tokenizer error: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let batch_size = encodings.len();
        let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);

        let mut all_ids = vec![self.pad_id; batch_size * max_len];
        let mut all_mask = vec![0u32; batch_size * max_len];
        let all_type_ids = vec![0u32; batch_size * max_len];
        for (i, enc) in encodings.iter().enumerate() {
            let offset = i * max_len;
            let ids = enc.get_ids();
            all_ids[offset..offset + ids.len()].copy_from_slice(ids);
            all_mask[offset..offset + ids.len()].copy_from_slice(enc.get_attention_mask());
        }

        let input_ids = Tensor::from_vec(all_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(all_mask, (batch_size, max_len), &self.device)?;
        let token_type_ids = Tensor::from_vec(all_type_ids, (batch_size, max_len), &self.device)?;

        // [batch_size, num_labels_nli]
        let logits = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids)?;
        let entailment = logits.i((.., self.entailment_id))?;
        let probs: Vec<f32> = softmax(&entailment, D::Minus1)?.to_vec1()?;

        tracing::debug!(labels = batch_size, seq_len = max_len, "Zero-shot batch scored");
        Ok(RankedScoreList::from_unsorted(
            labels.iter().cloned().zip(probs),
        ))
    }
}
