//! Error types for the pn-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// behind one interface for front ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Study error: {0}")]
    Study(String),

    #[error("Failed to read study file: {path}")]
    StudyFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write study file: {path}")]
    StudyFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Study validation failed: {0}")]
    Validation(String),

    #[error("Study compilation failed: {0}")]
    Compile(String),

    #[error("Invasion error: {0}")]
    Invasion(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pn-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pn_project::ProjectError> for AppError {
    fn from(err: pn_project::ProjectError) -> Self {
        AppError::Study(err.to_string())
    }
}

impl From<pn_project::ValidationError> for AppError {
    fn from(err: pn_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<pn_graph::GraphError> for AppError {
    fn from(err: pn_graph::GraphError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<pn_invasion::InvasionError> for AppError {
    fn from(err: pn_invasion::InvasionError) -> Self {
        AppError::Invasion(err.to_string())
    }
}

impl From<pn_results::ResultsError> for AppError {
    fn from(err: pn_results::ResultsError) -> Self {
        match err {
            pn_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
