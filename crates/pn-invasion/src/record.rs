//! Write-once invasion pressures per pore and throat.

use pn_core::{PoreId, Real, ThroatId};

/// Sentinel pressure for entities never invaded within the tested range.
pub const UNINVADED: Real = Real::INFINITY;

const NO_STEP: u32 = u32::MAX;

/// Pressure (and step index) at which each pore and throat was first invaded.
///
/// Entries are written at most once and never cleared; invasion is irreversible.
#[derive(Debug, Clone, PartialEq)]
pub struct InvasionRecord {
    pore_pressure: Vec<Real>,
    pore_step: Vec<u32>,
    throat_pressure: Vec<Real>,
    throat_step: Vec<u32>,
    invaded_pores: usize,
    invaded_throats: usize,
}

impl InvasionRecord {
    pub fn new(pore_count: usize, throat_count: usize) -> Self {
        Self {
            pore_pressure: vec![UNINVADED; pore_count],
            pore_step: vec![NO_STEP; pore_count],
            throat_pressure: vec![UNINVADED; throat_count],
            throat_step: vec![NO_STEP; throat_count],
            invaded_pores: 0,
            invaded_throats: 0,
        }
    }

    /// Record a pore's invasion. Returns `false` if it was already invaded.
    pub fn mark_pore(&mut self, pore: PoreId, pressure: Real, step: usize) -> bool {
        let i = pore.idx();
        if self.pore_step[i] != NO_STEP {
            return false;
        }
        self.pore_pressure[i] = pressure;
        self.pore_step[i] = step as u32;
        self.invaded_pores += 1;
        true
    }

    /// Record a throat's invasion. Returns `false` if it was already invaded.
    pub fn mark_throat(&mut self, throat: ThroatId, pressure: Real, step: usize) -> bool {
        let i = throat.idx();
        if self.throat_step[i] != NO_STEP {
            return false;
        }
        self.throat_pressure[i] = pressure;
        self.throat_step[i] = step as u32;
        self.invaded_throats += 1;
        true
    }

    /// Invasion pressure of a pore, `None` if never invaded.
    pub fn pore_pressure(&self, pore: PoreId) -> Option<Real> {
        self.pore_pressure
            .get(pore.idx())
            .copied()
            .filter(|p| *p != UNINVADED)
    }

    pub fn throat_pressure(&self, throat: ThroatId) -> Option<Real> {
        self.throat_pressure
            .get(throat.idx())
            .copied()
            .filter(|p| *p != UNINVADED)
    }

    /// Step index at which a pore was invaded.
    pub fn pore_step(&self, pore: PoreId) -> Option<usize> {
        self.pore_step
            .get(pore.idx())
            .copied()
            .filter(|s| *s != NO_STEP)
            .map(|s| s as usize)
    }

    pub fn throat_step(&self, throat: ThroatId) -> Option<usize> {
        self.throat_step
            .get(throat.idx())
            .copied()
            .filter(|s| *s != NO_STEP)
            .map(|s| s as usize)
    }

    pub fn is_pore_invaded(&self, pore: PoreId) -> bool {
        self.pore_step.get(pore.idx()).is_some_and(|s| *s != NO_STEP)
    }

    pub fn is_throat_invaded(&self, throat: ThroatId) -> bool {
        self.throat_step.get(throat.idx()).is_some_and(|s| *s != NO_STEP)
    }

    /// Whether the pore is invaded at or below pressure `p`.
    pub fn is_pore_invaded_at(&self, pore: PoreId, p: Real) -> bool {
        self.pore_pressure
            .get(pore.idx())
            .is_some_and(|v| *v != UNINVADED && *v <= p)
    }

    /// Pores invaded at or below pressure `p`, in index order.
    pub fn invaded_pores_at(&self, p: Real) -> Vec<PoreId> {
        self.pore_pressure
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != UNINVADED && **v <= p)
            .map(|(i, _)| PoreId::from_index(i as u32))
            .collect()
    }

    /// Raw per-pore invasion pressures; [`UNINVADED`] marks pores never reached.
    pub fn pore_pressures(&self) -> &[Real] {
        &self.pore_pressure
    }

    pub fn throat_pressures(&self) -> &[Real] {
        &self.throat_pressure
    }

    pub fn invaded_pore_count(&self) -> usize {
        self.invaded_pores
    }

    pub fn invaded_throat_count(&self) -> usize {
        self.invaded_throats
    }

    pub fn pore_count(&self) -> usize {
        self.pore_pressure.len()
    }

    pub fn throat_count(&self) -> usize {
        self.throat_pressure.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninvaded() {
        let rec = InvasionRecord::new(3, 2);
        assert_eq!(rec.pore_pressure(PoreId::from_index(0)), None);
        assert_eq!(rec.invaded_pore_count(), 0);
        assert!(rec.pore_pressures().iter().all(|p| *p == UNINVADED));
    }

    #[test]
    fn pore_is_write_once() {
        let mut rec = InvasionRecord::new(3, 2);
        let p = PoreId::from_index(1);
        assert!(rec.mark_pore(p, 5.0, 2));
        assert!(!rec.mark_pore(p, 7.0, 3));
        assert!(!rec.mark_pore(p, 1.0, 0));
        assert_eq!(rec.pore_pressure(p), Some(5.0));
        assert_eq!(rec.pore_step(p), Some(2));
        assert_eq!(rec.invaded_pore_count(), 1);
    }

    #[test]
    fn invaded_at_threshold_queries() {
        let mut rec = InvasionRecord::new(3, 0);
        rec.mark_pore(PoreId::from_index(0), 1.0, 0);
        rec.mark_pore(PoreId::from_index(2), 3.0, 1);
        assert!(rec.is_pore_invaded_at(PoreId::from_index(2), 3.0));
        assert!(!rec.is_pore_invaded_at(PoreId::from_index(2), 2.9));
        assert_eq!(rec.invaded_pores_at(2.0), vec![PoreId::from_index(0)]);
        assert_eq!(rec.invaded_pores_at(Real::INFINITY).len(), 2);
        assert!(!rec.is_pore_invaded_at(PoreId::from_index(1), Real::INFINITY));
    }

    #[test]
    fn throat_is_write_once() {
        let mut rec = InvasionRecord::new(2, 1);
        let t = ThroatId::from_index(0);
        assert!(rec.mark_throat(t, 4.0, 1));
        assert!(!rec.mark_throat(t, 6.0, 2));
        assert_eq!(rec.throat_pressure(t), Some(4.0));
        assert!(rec.is_throat_invaded(t));
        assert_eq!(rec.invaded_throat_count(), 1);
    }
}
