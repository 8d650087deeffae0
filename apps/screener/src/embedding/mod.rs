//! Embedding backends used by the analyst stage.
//!
//! `LexicalEmbedder` is a deterministic hashed bag-of-words model that needs no
//! network; `HttpEmbedder` talks to any OpenAI-compatible `/embeddings` server
//! (e.g. a sentence-transformers model behind TEI or Ollama).
//!
//! The analyst stage holds the backend as `Arc<dyn Embedder>`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;

pub mod http;
pub mod lexical;

pub use http::HttpEmbedder;
pub use lexical::LexicalEmbedder;

/// Which embedding backend the analyst stage builds on first use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    #[default]
    Lexical,
    Http,
}

impl std::str::FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" => Ok(Self::Lexical),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown embedding backend '{other}' (expected lexical|http)")),
        }
    }
}

/// Everything needed to construct a backend. Building is deferred until the
/// analyst stage first needs a vector.
#[derive(Debug, Clone)]
pub struct EmbedderSettings {
    pub backend: EmbeddingBackend,
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl EmbedderSettings {
    pub fn build(&self) -> Result<Arc<dyn Embedder>, PipelineError> {
        match self.backend {
            EmbeddingBackend::Lexical => Ok(Arc::new(LexicalEmbedder::default())),
            EmbeddingBackend::Http => Ok(Arc::new(HttpEmbedder::new(
                &self.api_url,
                self.model.clone(),
                self.api_key.clone(),
            )?)),
        }
    }
}

/// Turns text into a dense vector. Implement this to swap backends without
/// touching the analyst stage.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Cosine similarity in [-1, 1]. Mismatched or zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        (dot / (na * nb)).clamp(-1.0, 1.0)
    }
}

/// Embeds both texts and returns their cosine similarity.
pub async fn text_similarity(
    embedder: &dyn Embedder,
    left: &str,
    right: &str,
) -> Result<f32, PipelineError> {
    let left = embedder.embed(left).await?;
    let right = embedder.embed(right).await?;
    Ok(cosine_similarity(&left, &right))
}
