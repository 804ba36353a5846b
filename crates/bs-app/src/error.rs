//! Error types for the bs-app service layer.

use std::path::PathBuf;

/// Unified error for everything the frontends call into.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bs-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<bs_project::ProjectError> for AppError {
    fn from(err: bs_project::ProjectError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<bs_project::ValidationError> for AppError {
    fn from(err: bs_project::ValidationError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<bs_sim::SimError> for AppError {
    fn from(err: bs_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}
