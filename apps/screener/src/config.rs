use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::embedding::EmbeddingBackend;
use crate::screening::analyst::MatchStrategy;

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Overrides `<data_dir>/job_descriptions/job_description.txt`.
    pub job_description_path: Option<PathBuf>,
    pub analyst_strategy: MatchStrategy,
    pub embedding_backend: EmbeddingBackend,
    pub embedding_api_url: String,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub shortlist_size: usize,
    pub raw_preview_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            job_description_path: None,
            analyst_strategy: MatchStrategy::default(),
            embedding_backend: EmbeddingBackend::default(),
            embedding_api_url: "http://localhost:8081/v1".to_string(),
            embedding_api_key: None,
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            shortlist_size: 5,
            raw_preview_chars: 2000,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            data_dir: optional_env("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            job_description_path: optional_env("JOB_DESCRIPTION_PATH").map(PathBuf::from),
            analyst_strategy: parse_env("ANALYST_STRATEGY", defaults.analyst_strategy)?,
            embedding_backend: parse_env("EMBEDDING_BACKEND", defaults.embedding_backend)?,
            embedding_api_url: optional_env("EMBEDDING_API_URL")
                .unwrap_or(defaults.embedding_api_url),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: optional_env("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            shortlist_size: parse_env("SHORTLIST_SIZE", defaults.shortlist_size)?,
            raw_preview_chars: parse_env("RAW_PREVIEW_CHARS", defaults.raw_preview_chars)?,
            port: parse_env("PORT", defaults.port)?,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}
