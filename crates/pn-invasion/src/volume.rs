//! Per-entity volume weights used to turn invaded entities into saturation.

use pn_core::{PoreId, Real, ThroatId};
use pn_graph::PoreNetwork;

use crate::entry::PercolationMode;
use crate::error::{InvasionError, InvasionResult};

/// Volume of every pore and throat.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeWeights {
    pores: Vec<Real>,
    throats: Vec<Real>,
}

impl VolumeWeights {
    pub fn new(pores: Vec<Real>, throats: Vec<Real>) -> Self {
        Self { pores, throats }
    }

    /// Default weights for a mode: unit volume on the valued entities, zero elsewhere.
    ///
    /// Mixed mode weighs every pore and throat equally.
    pub fn default_for(mode: PercolationMode, network: &PoreNetwork) -> Self {
        let (pore_w, throat_w) = match mode {
            PercolationMode::Site => (1.0, 0.0),
            PercolationMode::Bond => (0.0, 1.0),
            PercolationMode::Mixed => (1.0, 1.0),
        };
        Self {
            pores: vec![pore_w; network.pore_count()],
            throats: vec![throat_w; network.throat_count()],
        }
    }

    pub fn pore(&self, pore: PoreId) -> Real {
        self.pores.get(pore.idx()).copied().unwrap_or(0.0)
    }

    pub fn throat(&self, throat: ThroatId) -> Real {
        self.throats.get(throat.idx()).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> Real {
        self.pores.iter().sum::<Real>() + self.throats.iter().sum::<Real>()
    }

    /// Number of pores and throats carrying positive volume.
    pub fn weighted_count(&self) -> usize {
        self.pores
            .iter()
            .chain(&self.throats)
            .filter(|v| **v > 0.0)
            .count()
    }

    /// Check lengths and values; returns the total volume.
    pub fn validate(&self, network: &PoreNetwork) -> InvasionResult<Real> {
        check(&self.pores, network.pore_count(), "pore volume")?;
        check(&self.throats, network.throat_count(), "throat volume")?;

        let total = self.total();
        if !total.is_finite() || total <= 0.0 {
            return Err(InvasionError::config(format!(
                "total pore + throat volume must be positive and finite, got {total}"
            )));
        }
        Ok(total)
    }
}

fn check(values: &[Real], expected: usize, what: &'static str) -> InvasionResult<()> {
    if values.len() != expected {
        return Err(InvasionError::LengthMismatch {
            what,
            expected,
            actual: values.len(),
        });
    }
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(InvasionError::NonFinite { what, index, value });
        }
        if value < 0.0 {
            return Err(InvasionError::config(format!(
                "{what} at index {index} is negative ({value})"
            )));
        }
    }
    Ok(())
}
