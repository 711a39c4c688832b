//! Compilation of a `Study` into engine inputs.

use pn_core::PoreId;
use pn_graph::{CubicLattice, Face, PoreNetwork};
use pn_invasion::{EntryPressures, PressureSteps, RunConfig, VolumeWeights};
use pn_project::schema::{EntryPressureDef, FaceDef, NetworkDef, PoreSetDef, StepsDef, Study};

use crate::error::{AppError, AppResult};

/// Everything a sweep needs, built from a study.
#[derive(Debug, Clone)]
pub struct CompiledStudy {
    pub network: PoreNetwork,
    pub entry: EntryPressures,
    pub volumes: Option<VolumeWeights>,
    pub config: RunConfig,
}

/// Compile a study definition into engine structures.
pub fn compile_study(study: &Study) -> AppResult<CompiledStudy> {
    let built = build_network(&study.network)?;

    let inlets = resolve_pore_set(&study.boundaries.inlets, built.lattice(), "inlets")?;
    let outlets = resolve_pore_set(&study.boundaries.outlets, built.lattice(), "outlets")?;

    let mut config = RunConfig::new(inlets, outlets, build_steps(&study.steps));
    if let Some(budget) = study.max_steps {
        config = config.with_max_steps(budget);
    }

    Ok(CompiledStudy {
        network: built.into_network(),
        entry: build_entry(&study.entry_pressure),
        volumes: study
            .volumes
            .as_ref()
            .map(|v| VolumeWeights::new(v.pores_m3.clone(), v.throats_m3.clone())),
        config,
    })
}

/// Cubic networks stay a lattice until boundaries are resolved against their faces.
enum BuiltNetwork {
    Explicit(PoreNetwork),
    Lattice(CubicLattice),
}

impl BuiltNetwork {
    fn lattice(&self) -> Option<&CubicLattice> {
        match self {
            BuiltNetwork::Explicit(_) => None,
            BuiltNetwork::Lattice(lattice) => Some(lattice),
        }
    }

    fn into_network(self) -> PoreNetwork {
        match self {
            BuiltNetwork::Explicit(network) => network,
            BuiltNetwork::Lattice(lattice) => lattice.into_network(),
        }
    }
}

fn build_network(def: &NetworkDef) -> AppResult<BuiltNetwork> {
    match def {
        NetworkDef::Explicit { pores, throats } => {
            let edges: Vec<(u32, u32)> = throats.iter().map(|[a, b]| (*a, *b)).collect();
            Ok(BuiltNetwork::Explicit(PoreNetwork::from_edges(*pores, &edges)?))
        }
        NetworkDef::Cubic { shape } => Ok(BuiltNetwork::Lattice(CubicLattice::new(*shape)?)),
    }
}

fn resolve_pore_set(
    def: &PoreSetDef,
    lattice: Option<&CubicLattice>,
    what: &str,
) -> AppResult<Vec<PoreId>> {
    match def {
        PoreSetDef::Pores { ids } => Ok(ids.iter().copied().map(PoreId::from_index).collect()),
        PoreSetDef::Face { face } => {
            let lattice = lattice.ok_or_else(|| {
                AppError::Compile(format!("{what}: faces need a cubic network"))
            })?;
            Ok(lattice.face_pores(face_of(*face)))
        }
    }
}

pub fn face_of(face: FaceDef) -> Face {
    match face {
        FaceDef::Front => Face::Front,
        FaceDef::Back => Face::Back,
        FaceDef::Left => Face::Left,
        FaceDef::Right => Face::Right,
        FaceDef::Bottom => Face::Bottom,
        FaceDef::Top => Face::Top,
    }
}

pub fn build_entry(def: &EntryPressureDef) -> EntryPressures {
    match def {
        EntryPressureDef::Site { pores_pa } => EntryPressures::site(pores_pa.clone()),
        EntryPressureDef::Bond { throats_pa } => EntryPressures::bond(throats_pa.clone()),
        EntryPressureDef::Mixed {
            pores_pa,
            throats_pa,
        } => EntryPressures::mixed(pores_pa.clone(), throats_pa.clone()),
    }
}

pub fn build_steps(def: &StepsDef) -> PressureSteps {
    match def {
        StepsDef::Count { count } => PressureSteps::Count(*count),
        StepsDef::LogCount { count } => PressureSteps::LogCount(*count),
        StepsDef::Explicit { pressures_pa } => PressureSteps::Explicit(pressures_pa.clone()),
    }
}
