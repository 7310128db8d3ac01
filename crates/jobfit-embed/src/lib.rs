//! Local sentence embeddings for skill labels, keywords and text chunks.
//!
//! `BertEmbedder` runs a BERT-family sentence encoder (all-MiniLM-L6-v2 by
//! default) on candle with masked mean pooling and L2 normalization.
//! `FakeEmbedder` is a deterministic token-hashing stand-in selected with
//! `APP_USE_FAKE_EMBEDDINGS=1` or `embedding.use_fake = true`.

use anyhow::{anyhow, ensure, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use jobfit_core::config::EmbeddingConfig;
use jobfit_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;
pub use tokenize::tokenize_batch;

const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    pad_id: u32,
    max_len: usize,
    batch_size: usize,
    dim: usize,
    id: String,
}

impl BertEmbedder {
    pub fn new(model_dir: &Path, max_len: usize, batch_size: usize) -> Result<Self> {
        let device = device::select_device();
        tracing::info!(dir = %model_dir.display(), "loading sentence encoder");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let raw_config = std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&raw_config)?;
        let fields: serde_json::Value = serde_json::from_str(&raw_config)?;
        let dim = fields
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))? as usize;
        let pad_id = fields.get("pad_token_id").and_then(serde_json::Value::as_u64).unwrap_or(0) as u32;

        let vb = load_weights(model_dir, &device)?;
        let model = BertModel::load(vb, &config)?;

        let name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
        let id = format!("bert:{name}:d{dim}");
        tracing::info!(embedder = %id, "sentence encoder ready");

        Ok(Self { model, tokenizer, device, pad_id, max_len, batch_size: batch_size.max(1), dim, id })
    }

    fn embed_group(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let (input_ids, attention_mask) =
            tokenize_batch(&self.tokenizer, texts, self.max_len, self.pad_id, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let rows: Vec<Vec<f32>> = pooled.to_device(&Device::Cpu)?.to_vec2()?;
        ensure!(rows.len() == texts.len(), "encoder returned {} rows for {} texts", rows.len(), texts.len());
        ensure!(rows.iter().all(|r| r.len() == self.dim), "encoder returned a vector of unexpected size");
        Ok(rows)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        // SAFETY: the weights file is only read; it must not be modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device)? };
        return Ok(vb);
    }
    let weights_path = model_dir.join("pytorch_model.bin");
    let weights = candle_core::pickle::read_all(&weights_path)
        .with_context(|| format!("reading {}", weights_path.display()))?;
    let weights_map: HashMap<String, Tensor> = weights.into_iter().collect();
    Ok(VarBuilder::from_tensors(weights_map, DType::F32, device))
}

impl Embedder for BertEmbedder {
    fn embedder_id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        let mut out = Vec::with_capacity(texts.len());
        for group in texts.chunks(self.batch_size) {
            out.extend(self.embed_group(group)?);
        }
        tracing::debug!(texts = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "embedded batch");
        Ok(out)
    }
}

/// Deterministic, model-free embedder: each whitespace token is hashed into one
/// bucket. Identical texts get identical vectors; texts sharing tokens overlap.
pub struct FakeEmbedder {
    dim: usize,
    id: String,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self { dim, id: format!("fake:xxhash64:d{dim}") }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn embedder_id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

pub fn get_default_embedder(cfg: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    let env_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if env_fake || cfg.use_fake {
        tracing::info!(dim = cfg.fake_dim, "using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(cfg.fake_dim)));
    }
    let model_dir = resolve_model_dir(cfg.model_dir.as_deref())?;
    Ok(Box::new(BertEmbedder::new(&model_dir, cfg.max_len, cfg.batch_size)?))
}

fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            candidates.push(PathBuf::from(dir));
        }
    }
    if let Some(dir) = configured {
        candidates.push(jobfit_core::config::expand_path(dir));
    }
    candidates.push(Path::new("models").join(DEFAULT_MODEL_NAME));
    candidates.push(Path::new("../models").join(DEFAULT_MODEL_NAME));

    candidates
        .into_iter()
        .find(|p| p.exists())
        .inspect(|p| tracing::info!(dir = %p.display(), "resolved model directory"))
        .ok_or_else(|| anyhow!("Could not locate the {DEFAULT_MODEL_NAME} model directory; set embedding.model_dir or APP_MODEL_DIR"))
}
