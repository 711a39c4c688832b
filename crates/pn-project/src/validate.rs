//! Study validation logic.

use crate::schema::{
    BoundariesDef, EntryPressureDef, NetworkDef, PoreSetDef, STUDY_VERSION, StepsDef, Study,
    VolumesDef,
};
use std::collections::HashSet;

/// Largest pore or throat count addressable by a compact `u32` id.
pub const MAX_ENTITIES: usize = u32::MAX as usize - 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_study(study: &Study) -> Result<(), ValidationError> {
    if study.version == 0 || study.version > STUDY_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: study.version,
        });
    }
    if study.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }

    validate_network(&study.network)?;
    let pores = study.pore_count();
    let throats = study.throat_count();

    validate_entry(&study.entry_pressure, pores, throats)?;
    if let Some(volumes) = &study.volumes {
        validate_volumes(volumes, pores, throats)?;
    }
    validate_boundaries(&study.boundaries, &study.network)?;
    validate_steps(&study.steps)?;

    if study.max_steps == Some(0) {
        return Err(invalid("max_steps", 0, "must be at least 1"));
    }
    Ok(())
}

fn validate_network(network: &NetworkDef) -> Result<(), ValidationError> {
    match network {
        NetworkDef::Explicit { pores, throats } => {
            if *pores == 0 {
                return Err(invalid("network.pores", pores, "must be at least 1"));
            }
            for (i, [a, b]) in throats.iter().enumerate() {
                for p in [a, b] {
                    if *p as usize >= *pores {
                        return Err(ValidationError::MissingReference {
                            id: format!("pore {p}"),
                            context: format!("network.throats[{i}]"),
                        });
                    }
                }
                if a == b {
                    return Err(invalid(
                        &format!("network.throats[{i}]"),
                        format!("[{a}, {b}]"),
                        "throat connects a pore to itself",
                    ));
                }
            }
        }
        NetworkDef::Cubic { shape } => {
            if shape.contains(&0) {
                return Err(invalid(
                    "network.shape",
                    format!("{shape:?}"),
                    "every dimension must be at least 1",
                ));
            }
        }
    }

    let pores = network.checked_pore_count();
    let throats = network.checked_throat_count();
    if pores.is_none_or(|n| n > MAX_ENTITIES) || throats.is_none_or(|n| n > MAX_ENTITIES) {
        let value = match network {
            NetworkDef::Explicit { pores, .. } => format!("{pores} pores"),
            NetworkDef::Cubic { shape } => format!("{shape:?}"),
        };
        return Err(invalid(
            "network",
            value,
            "too many pores or throats for compact ids",
        ));
    }
    Ok(())
}

fn validate_entry(
    entry: &EntryPressureDef,
    pores: usize,
    throats: usize,
) -> Result<(), ValidationError> {
    match entry {
        EntryPressureDef::Site { pores_pa } => {
            check_values("entry_pressure.pores_pa", pores_pa, pores)?;
        }
        EntryPressureDef::Bond { throats_pa } => {
            check_values("entry_pressure.throats_pa", throats_pa, throats)?;
        }
        EntryPressureDef::Mixed {
            pores_pa,
            throats_pa,
        } => {
            check_values("entry_pressure.pores_pa", pores_pa, pores)?;
            check_values("entry_pressure.throats_pa", throats_pa, throats)?;
        }
    }
    Ok(())
}

fn check_values(field: &str, values: &[f64], expected: usize) -> Result<(), ValidationError> {
    if values.len() != expected {
        return Err(ValidationError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual: values.len(),
        });
    }
    if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(invalid(&format!("{field}[{i}]"), v, "must be finite"));
    }
    Ok(())
}

fn validate_volumes(
    volumes: &VolumesDef,
    pores: usize,
    throats: usize,
) -> Result<(), ValidationError> {
    check_values("volumes.pores_m3", &volumes.pores_m3, pores)?;
    check_values("volumes.throats_m3", &volumes.throats_m3, throats)?;

    let all = volumes.pores_m3.iter().chain(&volumes.throats_m3);
    if let Some(v) = all.clone().find(|v| **v < 0.0) {
        return Err(invalid("volumes", v, "volumes must be non-negative"));
    }
    let total: f64 = all.sum();
    if total <= 0.0 {
        return Err(invalid("volumes", total, "total volume must be positive"));
    }
    Ok(())
}

fn validate_boundaries(
    boundaries: &BoundariesDef,
    network: &NetworkDef,
) -> Result<(), ValidationError> {
    let inlets = validate_pore_set("boundaries.inlets", &boundaries.inlets, network)?;
    let outlets = validate_pore_set("boundaries.outlets", &boundaries.outlets, network)?;

    // Identical faces or explicit overlap
    if boundaries.inlets == boundaries.outlets {
        return Err(invalid(
            "boundaries",
            "inlets == outlets",
            "inlet and outlet sets must differ",
        ));
    }
    if let Some(p) = inlets.intersection(&outlets).next() {
        return Err(invalid(
            "boundaries",
            format!("pore {p}"),
            "pore is both an inlet and an outlet",
        ));
    }
    Ok(())
}

fn validate_pore_set(
    field: &str,
    set: &PoreSetDef,
    network: &NetworkDef,
) -> Result<HashSet<u32>, ValidationError> {
    match set {
        PoreSetDef::Pores { ids } => {
            if ids.is_empty() {
                return Err(invalid(field, "[]", "at least one pore is required"));
            }
            let pores = network.pore_count();
            if let Some(p) = ids.iter().find(|p| **p as usize >= pores) {
                return Err(ValidationError::MissingReference {
                    id: format!("pore {p}"),
                    context: field.to_string(),
                });
            }
            Ok(ids.iter().copied().collect())
        }
        PoreSetDef::Face { face } => match network {
            NetworkDef::Cubic { .. } => Ok(HashSet::new()),
            NetworkDef::Explicit { .. } => Err(ValidationError::Unsupported {
                feature: format!("{field}: face {face:?}"),
                reason: "faces are only defined for cubic networks".to_string(),
            }),
        },
    }
}

fn validate_steps(steps: &StepsDef) -> Result<(), ValidationError> {
    match steps {
        StepsDef::Count { count } | StepsDef::LogCount { count } => {
            if *count == 0 {
                return Err(invalid("steps.count", count, "must be at least 1"));
            }
        }
        StepsDef::Explicit { pressures_pa } => {
            if pressures_pa.is_empty() {
                return Err(invalid(
                    "steps.pressures_pa",
                    "[]",
                    "at least one pressure is required",
                ));
            }
            if let Some(v) = pressures_pa.iter().find(|v| !v.is_finite()) {
                return Err(invalid("steps.pressures_pa", v, "must be finite"));
            }
        }
    }
    Ok(())
}
