//! Capillary entry pressures and the percolation mode that owns them.
//!
//! The mode is a closed enum resolved once per run. Entities the mode does not
//! assign a value to are treated as qualified from the start (threshold −∞):
//! throats in site percolation, pores in bond percolation.

use std::fmt;

use pn_core::{PoreId, Real, ThroatId, finite_range};
use pn_graph::PoreNetwork;

use crate::error::{InvasionError, InvasionResult};

/// A graph entity that can be activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Pore(PoreId),
    Throat(ThroatId),
}

/// Which entities carry an entry pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PercolationMode {
    /// Pores carry thresholds; throats are always passable.
    Site,
    /// Throats carry thresholds; pores are always passable.
    Bond,
    /// Both pores and throats carry thresholds.
    Mixed,
}

impl fmt::Display for PercolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Site => write!(f, "site"),
            Self::Bond => write!(f, "bond"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// Entry pressure per pore and/or per throat, tagged by mode.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryPressures {
    Site { pores: Vec<Real> },
    Bond { throats: Vec<Real> },
    Mixed { pores: Vec<Real>, throats: Vec<Real> },
}

impl EntryPressures {
    pub fn site(pores: Vec<Real>) -> Self {
        Self::Site { pores }
    }

    pub fn bond(throats: Vec<Real>) -> Self {
        Self::Bond { throats }
    }

    pub fn mixed(pores: Vec<Real>, throats: Vec<Real>) -> Self {
        Self::Mixed { pores, throats }
    }

    pub fn mode(&self) -> PercolationMode {
        match self {
            Self::Site { .. } => PercolationMode::Site,
            Self::Bond { .. } => PercolationMode::Bond,
            Self::Mixed { .. } => PercolationMode::Mixed,
        }
    }

    fn pore_values(&self) -> Option<&[Real]> {
        match self {
            Self::Site { pores } | Self::Mixed { pores, .. } => Some(pores.as_slice()),
            Self::Bond { .. } => None,
        }
    }

    fn throat_values(&self) -> Option<&[Real]> {
        match self {
            Self::Bond { throats } | Self::Mixed { throats, .. } => Some(throats.as_slice()),
            Self::Site { .. } => None,
        }
    }

    /// Threshold of a pore; −∞ when the mode leaves pores unvalued.
    pub fn pore_threshold(&self, pore: PoreId) -> Real {
        match self.pore_values() {
            Some(values) => values.get(pore.idx()).copied().unwrap_or(Real::INFINITY),
            None => Real::NEG_INFINITY,
        }
    }

    /// Threshold of a throat; −∞ when the mode leaves throats unvalued.
    pub fn throat_threshold(&self, throat: ThroatId) -> Real {
        match self.throat_values() {
            Some(values) => values.get(throat.idx()).copied().unwrap_or(Real::INFINITY),
            None => Real::NEG_INFINITY,
        }
    }

    pub fn threshold(&self, entity: Entity) -> Real {
        match entity {
            Entity::Pore(p) => self.pore_threshold(p),
            Entity::Throat(t) => self.throat_threshold(t),
        }
    }

    /// Check array lengths against the network and reject non-finite values.
    pub fn validate(&self, network: &PoreNetwork) -> InvasionResult<()> {
        if let Some(values) = self.pore_values() {
            check_values(values, network.pore_count(), "pore entry pressure")?;
        }
        if let Some(values) = self.throat_values() {
            check_values(values, network.throat_count(), "throat entry pressure")?;
        }
        Ok(())
    }

    /// Smallest and largest valued threshold, or `None` if nothing is valued.
    pub fn range(&self) -> Option<(Real, Real)> {
        let pores = self.pore_values().and_then(finite_range);
        let throats = self.throat_values().and_then(finite_range);
        match (pores, throats) {
            (Some((a, b)), Some((c, d))) => Some((a.min(c), b.max(d))),
            (Some(r), None) | (None, Some(r)) => Some(r),
            (None, None) => None,
        }
    }

    /// Every entity paired with its threshold, ascending by threshold.
    ///
    /// Unvalued entities sort first at −∞. Ties keep pores before throats and
    /// index order, though activation order within a step does not affect results.
    pub(crate) fn activation_order(&self, network: &PoreNetwork) -> Vec<(Real, Entity)> {
        let mut order: Vec<(Real, Entity)> =
            Vec::with_capacity(network.pore_count() + network.throat_count());
        order.extend(
            network
                .pore_ids()
                .map(|p| (self.pore_threshold(p), Entity::Pore(p))),
        );
        order.extend(
            network
                .throats()
                .iter()
                .map(|t| (self.throat_threshold(t.id), Entity::Throat(t.id))),
        );
        order.sort_by(|a, b| a.0.total_cmp(&b.0));
        order
    }
}

fn check_values(values: &[Real], expected: usize, what: &'static str) -> InvasionResult<()> {
    if values.len() != expected {
        return Err(InvasionError::LengthMismatch {
            what,
            expected,
            actual: values.len(),
        });
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(InvasionError::NonFinite { what, index, value });
    }
    Ok(())
}
