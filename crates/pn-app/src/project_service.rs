//! Study loading, saving, validation, and introspection.

use std::path::Path;

use pn_project::schema::{EntryPressureDef, NetworkDef, PoreSetDef, StepsDef, Study};

use crate::error::{AppError, AppResult};
use crate::study_compile;

/// Summary of a study for display.
#[derive(Debug, Clone)]
pub struct StudySummary {
    pub name: String,
    pub network: String,
    pub pore_count: usize,
    pub throat_count: usize,
    pub mode: String,
    pub inlets: String,
    pub outlets: String,
    pub steps: String,
    pub has_volumes: bool,
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Load a study from a YAML or JSON file (chosen by extension).
pub fn load_study(path: &Path) -> AppResult<Study> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::StudyFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let study: Study = if is_json(path) {
        serde_json::from_str(&content)
            .map_err(|e| AppError::Study(format!("Failed to parse study JSON: {}", e)))?
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Study(format!("Failed to parse study YAML: {}", e)))?
    };

    Ok(study)
}

/// Save a study, YAML unless the path ends in `.json`.
pub fn save_study(path: &Path, study: &Study) -> AppResult<()> {
    let content = if is_json(path) {
        serde_json::to_string_pretty(study)
            .map_err(|e| AppError::Study(format!("Failed to serialize study: {}", e)))?
    } else {
        serde_yaml::to_string(study)
            .map_err(|e| AppError::Study(format!("Failed to serialize study: {}", e)))?
    };

    std::fs::write(path, content).map_err(|e| AppError::StudyFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Schema validation followed by a trial compilation, so that lattice and
/// boundary problems surface before a run is requested.
pub fn validate_study(study: &Study) -> AppResult<()> {
    pn_project::validate_study(study)?;
    study_compile::compile_study(study)?;
    Ok(())
}

pub fn summarize(study: &Study) -> StudySummary {
    let network = match &study.network {
        NetworkDef::Explicit { .. } => "explicit".to_string(),
        NetworkDef::Cubic { shape: [nx, ny, nz] } => format!("cubic {nx}x{ny}x{nz}"),
    };
    let mode = match &study.entry_pressure {
        EntryPressureDef::Site { .. } => "Site",
        EntryPressureDef::Bond { .. } => "Bond",
        EntryPressureDef::Mixed { .. } => "Mixed",
    };
    let steps = match &study.steps {
        StepsDef::Count { count } => format!("{count} linear"),
        StepsDef::LogCount { count } => format!("{count} logarithmic"),
        StepsDef::Explicit { pressures_pa } => format!("{} explicit", pressures_pa.len()),
    };

    StudySummary {
        name: study.name.clone(),
        network,
        pore_count: study.pore_count(),
        throat_count: study.throat_count(),
        mode: mode.to_string(),
        inlets: describe_set(&study.boundaries.inlets),
        outlets: describe_set(&study.boundaries.outlets),
        steps,
        has_volumes: study.volumes.is_some(),
    }
}

fn describe_set(set: &PoreSetDef) -> String {
    match set {
        PoreSetDef::Pores { ids } => format!("{} pore(s)", ids.len()),
        PoreSetDef::Face { face } => format!("face {face:?}"),
    }
}
