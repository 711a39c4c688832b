//! Finalized result of a completed sweep.

use pn_core::{PoreId, Real};

use crate::curve::IntrusionCurve;
use crate::diagnostics::Diagnostic;
use crate::entry::PercolationMode;
use crate::error::InvasionResult;
use crate::percolation::PercolationEvaluator;
use crate::record::InvasionRecord;
use crate::sequence::PressureSequence;

/// Everything a completed sweep produced.
#[derive(Debug, Clone)]
pub struct InvasionOutcome {
    mode: PercolationMode,
    sequence: PressureSequence,
    record: InvasionRecord,
    curve: IntrusionCurve,
    inlets: Vec<PoreId>,
    outlets: Vec<PoreId>,
    diagnostics: Vec<Diagnostic>,
    total_volume: Real,
}

impl InvasionOutcome {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        mode: PercolationMode,
        sequence: PressureSequence,
        record: InvasionRecord,
        curve: IntrusionCurve,
        inlets: Vec<PoreId>,
        outlets: Vec<PoreId>,
        diagnostics: Vec<Diagnostic>,
        total_volume: Real,
    ) -> Self {
        Self {
            mode,
            sequence,
            record,
            curve,
            inlets,
            outlets,
            diagnostics,
            total_volume,
        }
    }

    pub fn mode(&self) -> PercolationMode {
        self.mode
    }

    pub fn sequence(&self) -> &PressureSequence {
        &self.sequence
    }

    pub fn record(&self) -> &InvasionRecord {
        &self.record
    }

    pub fn curve(&self) -> &IntrusionCurve {
        &self.curve
    }

    /// Sorted, de-duplicated inlet pores.
    pub fn inlets(&self) -> &[PoreId] {
        &self.inlets
    }

    /// Sorted, de-duplicated outlet pores.
    pub fn outlets(&self) -> &[PoreId] {
        &self.outlets
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn total_volume(&self) -> Real {
        self.total_volume
    }

    pub fn evaluator(&self) -> PercolationEvaluator<'_> {
        PercolationEvaluator::new(&self.record, &self.outlets, &self.sequence)
    }

    pub fn is_percolating(&self, p: Real) -> bool {
        self.evaluator().is_percolating(p)
    }

    pub fn percolation_step(&self) -> Option<usize> {
        self.evaluator().percolation_step()
    }

    /// Fails with `NoPercolation` when no outlet was reached; the curve stays available.
    pub fn percolation_threshold(&self) -> InvasionResult<Real> {
        self.evaluator().percolation_threshold()
    }

    /// Split into the curve and record, dropping the rest.
    pub fn into_parts(self) -> (IntrusionCurve, InvasionRecord) {
        (self.curve, self.record)
    }
}
