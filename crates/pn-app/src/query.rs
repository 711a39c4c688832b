//! Query helpers for stored intrusion curves.

use pn_results::{CurveRecord, RunManifest};

use crate::error::{AppError, AppResult};

/// Summary of a stored run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub pressure_range: (f64, f64),
    pub point_count: usize,
    pub interior_count: usize,
    pub initial_saturation: f64,
    pub final_saturation: f64,
    pub percolation_threshold_pa: Option<f64>,
}

/// Summarize a run from its manifest and curve.
pub fn get_run_summary(manifest: &RunManifest, curve: &[CurveRecord]) -> AppResult<RunSummary> {
    let (first, last) = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AppError::InvalidInput("No points in run curve".to_string())),
    };

    Ok(RunSummary {
        pressure_range: (first.pressure_pa, last.pressure_pa),
        point_count: curve.len(),
        interior_count: interior_points(curve).len(),
        initial_saturation: first.saturation,
        final_saturation: last.saturation,
        percolation_threshold_pa: manifest.percolation_threshold_pa,
    })
}

/// Points strictly between empty and fully saturated.
pub fn interior_points(curve: &[CurveRecord]) -> Vec<CurveRecord> {
    curve
        .iter()
        .filter(|r| r.saturation > 0.0 && r.saturation < 1.0)
        .copied()
        .collect()
}

/// Saturation at pressure `p`, reading the stored curve as a step function.
pub fn saturation_at(curve: &[CurveRecord], p: f64) -> f64 {
    let i = curve.partition_point(|r| r.pressure_pa <= p);
    if i == 0 { 0.0 } else { curve[i - 1].saturation }
}

/// CSV rendering of a curve, optionally dropping the flat ends.
pub fn curve_to_csv(curve: &[CurveRecord], interior_only: bool) -> String {
    let rows = if interior_only {
        interior_points(curve)
    } else {
        curve.to_vec()
    };

    let mut csv = String::from("step,pressure_pa,saturation,invaded_volume_m3,percolating\n");
    for r in rows {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            r.step, r.pressure_pa, r.saturation, r.invaded_volume_m3, r.percolating
        ));
    }
    csv
}
