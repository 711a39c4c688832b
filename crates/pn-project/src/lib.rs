//! pn-project: study file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{MAX_ENTITIES, ValidationError, validate_study};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Study> {
    let content = std::fs::read_to_string(path)?;
    let study: Study = serde_yaml::from_str(&content)?;
    validate_study(&study)?;
    Ok(study)
}

pub fn save_yaml(path: &std::path::Path, study: &Study) -> ProjectResult<()> {
    validate_study(study)?;
    let content = serde_yaml::to_string(study)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Study> {
    let content = std::fs::read_to_string(path)?;
    let study: Study = serde_json::from_str(&content)?;
    validate_study(&study)?;
    Ok(study)
}

pub fn save_json(path: &std::path::Path, study: &Study) -> ProjectResult<()> {
    validate_study(study)?;
    let content = serde_json::to_string_pretty(study)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a study, choosing the format from the file extension (`.json` or YAML).
pub fn load_study(path: &std::path::Path) -> ProjectResult<Study> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
