//! Run configuration: boundary pore sets and the pressure-step specification.

use pn_core::PoreId;
use pn_graph::PoreNetwork;

use crate::error::{InvasionError, InvasionResult};
use crate::sequence::PressureSteps;

/// Configuration for one invasion run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Pores in contact with the invading reservoir.
    pub inlets: Vec<PoreId>,
    /// Pores whose invasion marks percolation.
    pub outlets: Vec<PoreId>,
    /// How the pressure sequence is produced.
    pub steps: PressureSteps,
    /// Optional cap on the number of pressure steps.
    pub max_steps: Option<usize>,
}

impl RunConfig {
    pub fn new(inlets: Vec<PoreId>, outlets: Vec<PoreId>, steps: PressureSteps) -> Self {
        Self {
            inlets,
            outlets,
            steps,
            max_steps: None,
        }
    }

    pub fn with_max_steps(mut self, budget: usize) -> Self {
        self.max_steps = Some(budget);
        self
    }

    /// Validate the boundary sets against a network.
    pub(crate) fn boundaries(&self, network: &PoreNetwork) -> InvasionResult<BoundarySets> {
        let inlets = normalize(&self.inlets, network, "inlet")?;
        let outlets = normalize(&self.outlets, network, "outlet")?;

        let mut is_inlet = vec![false; network.pore_count()];
        for p in &inlets {
            is_inlet[p.idx()] = true;
        }
        let mut is_outlet = vec![false; network.pore_count()];
        for p in &outlets {
            if is_inlet[p.idx()] {
                return Err(InvasionError::config(format!(
                    "pore {p} is both an inlet and an outlet"
                )));
            }
            is_outlet[p.idx()] = true;
        }

        Ok(BoundarySets {
            inlets,
            outlets,
            is_outlet,
        })
    }
}

/// Validated, sorted and de-duplicated boundary sets.
#[derive(Debug, Clone)]
pub(crate) struct BoundarySets {
    pub(crate) inlets: Vec<PoreId>,
    pub(crate) outlets: Vec<PoreId>,
    pub(crate) is_outlet: Vec<bool>,
}

fn normalize(
    pores: &[PoreId],
    network: &PoreNetwork,
    what: &'static str,
) -> InvasionResult<Vec<PoreId>> {
    if pores.is_empty() {
        return Err(InvasionError::config(format!("{what} set is empty")));
    }
    if let Some(bad) = pores.iter().find(|p| !network.contains_pore(**p)) {
        return Err(InvasionError::config(format!(
            "{what} pore {bad} does not exist (pore count {})",
            network.pore_count()
        )));
    }
    let mut out = pores.to_vec();
    out.sort_unstable();
    out.dedup();
    Ok(out)
}
