//! JSON snapshot handoff between stages.
//!
//! Writes go to a temp file in the target directory and are renamed into
//! place, so readers never observe a partial snapshot.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::PipelineError;

pub async fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PipelineError> {
    let bytes = read_required(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn write_snapshot<T: Serialize>(path: &Path, records: &[T]) -> Result<(), PipelineError> {
    let json = serde_json::to_vec_pretty(records)?;
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic(&target, &json)).await??;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads a UTF-8 text input such as the job description.
pub async fn read_text(path: &Path) -> Result<String, PipelineError> {
    let bytes = read_required(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Atomically replaces `path` with `contents`, creating parent directories.
pub async fn write_text(path: &Path, contents: &str) -> Result<(), PipelineError> {
    let target = path.to_path_buf();
    let bytes = contents.as_bytes().to_vec();
    tokio::task::spawn_blocking(move || write_atomic(&target, &bytes)).await??;
    Ok(())
}

async fn read_required(path: &Path) -> Result<Vec<u8>, PipelineError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(PipelineError::MissingInput(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

fn write_atomic(path: &PathBuf, contents: &[u8]) -> Result<(), PipelineError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| PipelineError::Io(e.error))?;
    Ok(())
}
