//! Sentence encoder trait and the pretrained model implementation.
//!
//! The production encoder wraps fastembed's all-MiniLM-L6-v2 (384-d ONNX
//! inference, CPU or accelerated — the vectors are the same either way,
//! only latency differs). The trait seam exists so tests can substitute a
//! deterministic encoder and skip the model download.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;
use tracing::info;

/// Model identifier, fixed per run
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Output dimension of the pretrained model
pub const MODEL_DIMENSION: usize = 384;

/// Batch size for movie encoding, bounds peak memory
pub const ENCODE_BATCH_SIZE: usize = 64;

/// Errors that can occur when loading or invoking the sentence encoder
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to load sentence encoder '{model}': {reason}")]
    ModelLoad { model: String, reason: String },

    #[error("Encoding failed: {0}")]
    Inference(String),

    #[error("Encoder returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },

    #[error("Expected {expected}-dimensional vectors, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Maps text to fixed-dimension f32 vectors.
///
/// Implementations must be deterministic for a given input and preserve
/// input order in `encode_batch`.
pub trait SentenceEncoder: Send + Sync {
    /// Output vector dimension
    fn dimension(&self) -> usize;

    /// Encode a batch of texts, one vector per input, in input order.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Encode a single text.
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut rows = self.encode_batch(&[text])?;
        rows.pop().ok_or(EncodeError::CountMismatch {
            expected: 1,
            got: 0,
        })
    }
}

/// The pretrained all-MiniLM-L6-v2 sentence encoder.
///
/// Loaded once per run; inference-only (no training surface).
pub struct MiniLmEncoder {
    model: TextEmbedding,
}

impl MiniLmEncoder {
    /// Load the pretrained model (downloads it on first use).
    pub fn new() -> Result<Self> {
        info!("Loading sentence encoder '{}'", MODEL_NAME);
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(true),
        )
        .map_err(|e| EncodeError::ModelLoad {
            model: MODEL_NAME.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { model })
    }
}

impl SentenceEncoder for MiniLmEncoder {
    fn dimension(&self) -> usize {
        MODEL_DIMENSION
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let rows = self
            .model
            .embed(texts.to_vec(), None)
            .map_err(|e| EncodeError::Inference(e.to_string()))?;

        if rows.len() != texts.len() {
            return Err(EncodeError::CountMismatch {
                expected: texts.len(),
                got: rows.len(),
            });
        }
        Ok(rows)
    }
}
