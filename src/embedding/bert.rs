use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

use super::loader::Weights;

/// BERT encoder followed by attention-mask mean pooling.
pub struct SentenceBert {
    bert: BertModel,
    config: Config,
}

impl SentenceBert {
    pub fn load(config_path: &Path, weights: &Weights, device: &Device) -> Result<Self> {
        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb = match weights {
            Weights::Safetensors(path) => unsafe {
                VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device)?
            },
            Weights::Pytorch(path) => VarBuilder::from_pth(path, DType::F32, device)?,
        };

        // sentence-transformers exports drop the `bert.` prefix, HF checkpoints keep it.
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else {
            BertModel::load(vb, &config)?
        };

        Ok(Self { bert, config })
    }

    pub fn hidden_size(&self) -> usize {
        self.config.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.config.num_hidden_layers
    }

    /// Returns pooled sentence vectors, shape `[batch, hidden_size]`.
    pub fn forward_pooled(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self
            .bert
            .forward(input_ids, &token_type_ids, Some(attention_mask))?;

        mean_pool(&hidden, attention_mask)
    }
}

/// Averages `hidden` (`[batch, seq, hidden]`) over positions where `mask` is 1.
pub fn mean_pool(hidden: &Tensor, mask: &Tensor) -> Result<Tensor> {
    let mask = mask.to_dtype(hidden.dtype())?.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.maximum(1e-9f64)?;
    summed.broadcast_div(&counts)
}

/// Divides each row of `x` (`[batch, dim]`) by its L2 norm.
pub fn l2_normalize(x: &Tensor) -> Result<Tensor> {
    let norms = x.sqr()?.sum_keepdim(1)?.sqrt()?.maximum(1e-12f64)?;
    x.broadcast_div(&norms)
}
