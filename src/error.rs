use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{program} not found. Install with: pip install pydeface")]
    DefacerNotFound { program: String },

    #[error("dataset root not found: {}", .0.display())]
    DatasetRootNotFound(PathBuf),

    #[error("Output root '{}' is not writable. Use a path in your home dir.", .0.display())]
    OutputNotWritable(PathBuf),

    #[error("Worker error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Serde JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
