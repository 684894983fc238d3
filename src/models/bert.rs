use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::ops::softmax;
use candle_transformers::models::bert::{BertForMaskedLM, Config};
use tokenizers::Tokenizer;

use crate::error::{PredictionError, Result};
use crate::loaders::{TokenizerLoader, WeightsLoader};
use crate::pipelines::utils::weight_dtype;
use crate::pipelines::word_prediction::model::{FillMaskModel, Prediction};
use crate::pipelines::word_prediction::pipeline::MASK_TOKEN;

/// A model repository on the Hugging Face Hub, pinned to a revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuggingFaceModel {
    /// Repository id, e.g. `KBLab/bert-base-swedish-cased`.
    pub model_name: String,
    /// Commit, branch or tag of the weights.
    pub model_revision: String,
    /// Tokenizer repository when it differs from the model's.
    pub tokenizer_name: Option<String>,
    /// Tokenizer revision; `main` when only `tokenizer_name` is set.
    pub tokenizer_revision: Option<String>,
}

impl HuggingFaceModel {
    /// A model whose tokenizer lives in the same repository and revision.
    pub fn new(model_name: &str, model_revision: &str) -> Self {
        Self {
            model_name: model_name.into(),
            model_revision: model_revision.into(),
            tokenizer_name: None,
            tokenizer_revision: None,
        }
    }

    /// Swedish BERT base (cased) from the National Library of Sweden.
    pub fn kb_bert() -> Self {
        Self::new(
            "KBLab/bert-base-swedish-cased",
            "c710fb8dff81abb11d704cd46a8a1e010b2b022c",
        )
    }

    /// Repository and revision to fetch the tokenizer from.
    pub fn tokenizer_name_and_revision(&self) -> (&str, &str) {
        match &self.tokenizer_name {
            Some(name) => (name, self.tokenizer_revision.as_deref().unwrap_or("main")),
            None => (&self.model_name, &self.model_revision),
        }
    }
}

impl Default for HuggingFaceModel {
    fn default() -> Self {
        Self::kb_bert()
    }
}

impl std::fmt::Display for HuggingFaceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.model_name, self.model_revision)
    }
}

/// BERT masked language model with its tokenizer.
pub struct BertFillMaskModel {
    model: BertForMaskedLM,
    tokenizer: Tokenizer,
    mask_id: u32,
    device: Device,
}

impl BertFillMaskModel {
    /// Downloads (or reuses cached) weights and tokenizer and loads them onto `device`.
    pub fn load(source: &HuggingFaceModel, device: Device) -> Result<Self> {
        let dtype = weight_dtype(&device);
        tracing::info!(model = %source, ?dtype, "Loading masked language model");

        let (config, vb) = WeightsLoader::new(&source.model_name, &source.model_revision)
            .load::<Config>(dtype, &device)?;
        let model = BertForMaskedLM::load(vb, &config)?;

        let (tokenizer_name, tokenizer_revision) = source.tokenizer_name_and_revision();
        let tokenizer = TokenizerLoader::new(tokenizer_name, tokenizer_revision).load()?;

        Self::from_parts(model, tokenizer, device)
    }

    /// Wraps an already built model and tokenizer.
    pub fn from_parts(model: BertForMaskedLM, tokenizer: Tokenizer, device: Device) -> Result<Self> {
        let mask_id = tokenizer.token_to_id(MASK_TOKEN).ok_or_else(|| {
            PredictionError::Tokenization(format!("Tokenizer has no {MASK_TOKEN} token"))
        })?;
        Ok(Self {
            model,
            tokenizer,
            mask_id,
            device,
        })
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &Device {
        &self.device
    }

    fn encode(&self, text: &str) -> Result<tokenizers::Encoding> {
        self.tokenizer.encode(text, true).map_err(|e| {
            PredictionError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                &text.chars().take(50).collect::<String>(),
                e
            ))
        })
    }
}

impl FillMaskModel for BertFillMaskModel {
    fn token_count(&self, text: &str) -> Result<usize> {
        Ok(self.encode(text)?.len())
    }

    fn predict_top_k(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        if k == 0 {
            return Ok(vec![]);
        }

        let encoding = self.encode(text)?;
        let mask_index = encoding
            .get_ids()
            .iter()
            .position(|&id| id == self.mask_id)
            .ok_or_else(|| {
                let preview: String = text.chars().take(50).collect();
                PredictionError::Unexpected(format!(
                    "No {MASK_TOKEN} token in input '{preview}'. Fill-mask requires exactly one {MASK_TOKEN}."
                ))
            })?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let logits = logits
            .squeeze(0)?
            .i((mask_index, ..))?
            .to_dtype(DType::F32)?;
        let probs = softmax(&logits, D::Minus1)?;
        let probs_vec = probs.to_vec1::<f32>()?;

        let mut idxs: Vec<usize> = (0..probs_vec.len()).collect();
        idxs.sort_by(|&i, &j| probs_vec[j].total_cmp(&probs_vec[i]));
        idxs.truncate(k.min(idxs.len()));

        idxs.into_iter()
            .map(|idx| {
                let token = self.tokenizer.decode(&[idx as u32], false).map_err(|e| {
                    PredictionError::Tokenization(format!("Failed to decode token {idx}: {e}"))
                })?;
                Ok(Prediction::new(token.trim(), probs_vec[idx]))
            })
            .collect()
    }
}
