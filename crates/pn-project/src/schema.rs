//! Study schema definitions.
//!
//! Pressures are in pascal, volumes in cubic metres. Pore and throat
//! references are zero-based indices into the network.

use serde::{Deserialize, Serialize};

/// Current study file version.
pub const STUDY_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Study {
    pub version: u32,
    pub name: String,
    pub network: NetworkDef,
    pub entry_pressure: EntryPressureDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<VolumesDef>,
    pub boundaries: BoundariesDef,
    pub steps: StepsDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

impl Study {
    pub fn pore_count(&self) -> usize {
        self.network.pore_count()
    }

    pub fn throat_count(&self) -> usize {
        self.network.throat_count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum NetworkDef {
    /// Pore count plus an explicit throat list of `[pore_a, pore_b]` pairs.
    Explicit {
        pores: usize,
        #[serde(default)]
        throats: Vec<[u32; 2]>,
    },
    /// 6-connected `[nx, ny, nz]` lattice.
    Cubic { shape: [usize; 3] },
}

impl NetworkDef {
    /// Pore count, or `None` if the lattice shape overflows `usize`.
    pub fn checked_pore_count(&self) -> Option<usize> {
        match self {
            NetworkDef::Explicit { pores, .. } => Some(*pores),
            NetworkDef::Cubic { shape: [nx, ny, nz] } => nx.checked_mul(*ny)?.checked_mul(*nz),
        }
    }

    /// Throat count, or `None` if the lattice shape overflows `usize`.
    pub fn checked_throat_count(&self) -> Option<usize> {
        match self {
            NetworkDef::Explicit { throats, .. } => Some(throats.len()),
            NetworkDef::Cubic { shape: [nx, ny, nz] } => {
                let (nx, ny, nz) = (*nx, *ny, *nz);
                let along_x = nx.saturating_sub(1).checked_mul(ny)?.checked_mul(nz)?;
                let along_y = nx.checked_mul(ny.saturating_sub(1))?.checked_mul(nz)?;
                let along_z = nx.checked_mul(ny)?.checked_mul(nz.saturating_sub(1))?;
                along_x.checked_add(along_y)?.checked_add(along_z)
            }
        }
    }

    /// Saturating pore count, for display.
    pub fn pore_count(&self) -> usize {
        self.checked_pore_count().unwrap_or(usize::MAX)
    }

    /// Saturating throat count, for display.
    pub fn throat_count(&self) -> usize {
        self.checked_throat_count().unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode")]
pub enum EntryPressureDef {
    /// One entry pressure per pore.
    Site { pores_pa: Vec<f64> },
    /// One entry pressure per throat.
    Bond { throats_pa: Vec<f64> },
    /// Entry pressures on both pores and throats.
    Mixed {
        pores_pa: Vec<f64>,
        throats_pa: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VolumesDef {
    pub pores_m3: Vec<f64>,
    pub throats_m3: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundariesDef {
    pub inlets: PoreSetDef,
    pub outlets: PoreSetDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum PoreSetDef {
    Pores { ids: Vec<u32> },
    /// All pores on one face of a cubic network.
    Face { face: FaceDef },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FaceDef {
    Front,
    Back,
    Left,
    Right,
    Bottom,
    Top,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum StepsDef {
    /// Linear spacing between the smallest and largest entry pressure.
    Count { count: usize },
    /// Logarithmic spacing over the same range.
    LogCount { count: usize },
    Explicit { pressures_pa: Vec<f64> },
}
