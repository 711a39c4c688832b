//! Post-hoc percolation queries over a finalized invasion record.

use pn_core::{PoreId, Real};

use crate::error::{InvasionError, InvasionResult};
use crate::record::InvasionRecord;
use crate::sequence::PressureSequence;

/// Percolation evaluator and threshold finder.
///
/// Pure lookups; nothing is re-run.
#[derive(Debug, Clone, Copy)]
pub struct PercolationEvaluator<'a> {
    record: &'a InvasionRecord,
    outlets: &'a [PoreId],
    sequence: &'a PressureSequence,
}

impl<'a> PercolationEvaluator<'a> {
    pub fn new(
        record: &'a InvasionRecord,
        outlets: &'a [PoreId],
        sequence: &'a PressureSequence,
    ) -> Self {
        Self {
            record,
            outlets,
            sequence,
        }
    }

    /// Lowest invasion pressure among the outlet pores.
    fn first_outlet_pressure(&self) -> Option<Real> {
        self.outlets
            .iter()
            .filter_map(|&p| self.record.pore_pressure(p))
            .min_by(|a, b| a.total_cmp(b))
    }

    /// True iff at least one outlet pore is invaded at or below `p`.
    pub fn is_percolating(&self, p: Real) -> bool {
        self.outlets
            .iter()
            .any(|&o| self.record.is_pore_invaded_at(o, p))
    }

    /// Index of the first step at which the network percolates.
    pub fn percolation_step(&self) -> Option<usize> {
        let reached = self.first_outlet_pressure()?;
        self.sequence.first_at_or_above(reached)
    }

    /// Minimum pressure step at which percolation first occurs.
    pub fn percolation_threshold(&self) -> InvasionResult<Real> {
        self.percolation_step()
            .and_then(|step| self.sequence.get(step))
            .ok_or(InvasionError::NoPercolation)
    }
}
