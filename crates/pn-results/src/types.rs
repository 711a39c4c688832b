//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub study_name: String,
    pub timestamp: String,
    pub engine_version: String,
    /// `site`, `bond` or `mixed`.
    pub mode: String,
    pub pore_count: usize,
    pub throat_count: usize,
    pub step_count: usize,
    pub percolation_threshold_pa: Option<f64>,
    pub percolation_step: Option<usize>,
    pub final_saturation: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl RunManifest {
    pub fn percolates(&self) -> bool {
        self.percolation_threshold_pa.is_some()
    }
}

/// One point of a stored intrusion curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurveRecord {
    pub step: usize,
    pub pressure_pa: f64,
    pub saturation: f64,
    pub invaded_volume_m3: f64,
    pub percolating: bool,
}

/// Invasion pressure per pore and throat; `None` means never invaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InvasionPressures {
    pub pores_pa: Vec<Option<f64>>,
    pub throats_pa: Vec<Option<f64>>,
}
