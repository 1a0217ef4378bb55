use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("The specified folder path does not exist: {}", path.display())]
    InputDirNotFound { path: PathBuf },

    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}
