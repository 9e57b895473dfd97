//! Errors surfaced by the terminal front-end

use roll_core::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to set up logging: {0}")]
    Logging(String),
    #[error("Nothing to export: no simulation has completed")]
    NothingToExport,
}
