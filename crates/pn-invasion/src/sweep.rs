//! Quasi-static invasion sweep over an ascending pressure sequence.
//!
//! Each step activates every entity whose entry pressure is at or below the
//! applied pressure, marks newly inlet-connected pores and throats as invaded,
//! records saturation, and updates the percolation flag. All merges of a step
//! finish before any reachability is read.

use pn_core::{PoreId, Real, ThroatId};
use pn_graph::PoreNetwork;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cluster::ClusterTracker;
use crate::config::{BoundarySets, RunConfig};
use crate::curve::{IntrusionCurve, IntrusionPoint};
use crate::diagnostics::Diagnostic;
use crate::entry::{EntryPressures, Entity};
use crate::error::{InvasionError, InvasionResult};
use crate::outcome::InvasionOutcome;
use crate::percolation::PercolationEvaluator;
use crate::record::InvasionRecord;
use crate::sequence::PressureSequence;
use crate::volume::VolumeWeights;

/// Pending lists at least this long are scanned with rayon.
const PARALLEL_SCAN_MIN: usize = 16_384;

/// Lifecycle of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    NotStarted,
    Running,
    /// Terminal: every pressure step has been processed.
    Completed,
    /// Terminal: configuration was rejected at start.
    Failed,
}

/// Driver for one invasion run.
#[derive(Debug)]
pub struct InvasionSweep<'a> {
    network: &'a PoreNetwork,
    entry: &'a EntryPressures,
    volumes: Option<VolumeWeights>,
    config: RunConfig,
    state: SweepState,
    failure: Option<InvasionError>,
    run: Option<SweepRun<'a>>,
}

impl<'a> InvasionSweep<'a> {
    /// Create a sweep. Nothing is validated until [`start`](Self::start).
    ///
    /// With `volumes == None` the weights come from [`VolumeWeights::default_for`].
    pub fn new(
        network: &'a PoreNetwork,
        entry: &'a EntryPressures,
        volumes: Option<VolumeWeights>,
        config: RunConfig,
    ) -> Self {
        Self {
            network,
            entry,
            volumes,
            config,
            state: SweepState::NotStarted,
            failure: None,
            run: None,
        }
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The pressure sequence, once started.
    pub fn sequence(&self) -> Option<&PressureSequence> {
        self.run.as_ref().map(|r| &r.sequence)
    }

    /// Curve points produced so far.
    pub fn curve(&self) -> Option<&IntrusionCurve> {
        self.run.as_ref().map(|r| &r.curve)
    }

    /// Validate inputs and build the run state.
    ///
    /// Any configuration error moves the sweep to `Failed` before a single
    /// entity is activated.
    pub fn start(&mut self) -> InvasionResult<()> {
        match self.state {
            SweepState::NotStarted => {}
            SweepState::Failed => return Err(self.failed()),
            SweepState::Running | SweepState::Completed => return Ok(()),
        }

        match self.prepare() {
            Ok(run) => {
                info!(
                    pores = self.network.pore_count(),
                    throats = self.network.throat_count(),
                    mode = %self.entry.mode(),
                    steps = run.sequence.len(),
                    "invasion sweep started"
                );
                self.run = Some(run);
                self.state = SweepState::Running;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "invasion sweep rejected its configuration");
                self.state = SweepState::Failed;
                self.failure = Some(e.clone());
                Err(e)
            }
        }
    }

    fn prepare(&mut self) -> InvasionResult<SweepRun<'a>> {
        let network = self.network;
        self.entry.validate(network)?;
        let boundaries = self.config.boundaries(network)?;

        let volumes = self
            .volumes
            .take()
            .unwrap_or_else(|| VolumeWeights::default_for(self.entry.mode(), network));
        let total_volume = volumes.validate(network)?;

        let (sequence, fallback) = PressureSequence::build(&self.config.steps, self.entry)?;
        if let Some(budget) = self.config.max_steps {
            if sequence.len() > budget {
                return Err(InvasionError::StepBudgetExceeded {
                    steps: sequence.len(),
                    budget,
                });
            }
        }

        let weighted_remaining = volumes.weighted_count();
        let tracker = ClusterTracker::new(network, &boundaries.inlets);
        let order = self.entry.activation_order(network);
        let steps = sequence.len();

        Ok(SweepRun {
            tracker,
            order,
            cursor: 0,
            record: InvasionRecord::new(network.pore_count(), network.throat_count()),
            curve: IntrusionCurve::with_capacity(steps),
            pending_pores: network.pore_ids().collect(),
            pending_throats: network.throats().iter().map(|t| t.id).collect(),
            invaded_volume: 0.0,
            weighted_remaining,
            total_volume,
            percolating: false,
            next_step: 0,
            diagnostics: fallback.into_iter().collect(),
            sequence,
            boundaries,
            volumes,
        })
    }

    fn failed(&self) -> InvasionError {
        InvasionError::SweepFailed {
            what: self
                .failure
                .as_ref()
                .map_or_else(|| "unknown failure".to_string(), |e| e.to_string()),
        }
    }

    /// Process the next pressure step, starting the sweep if needed.
    ///
    /// Returns `Ok(None)` once the sweep has completed.
    pub fn step(&mut self) -> InvasionResult<Option<IntrusionPoint>> {
        if self.state == SweepState::NotStarted {
            self.start()?;
        }
        match self.state {
            SweepState::Failed => return Err(self.failed()),
            SweepState::Completed => return Ok(None),
            SweepState::NotStarted | SweepState::Running => {}
        }

        let run = self.run.as_mut().ok_or_else(|| InvasionError::Invariant {
            what: "running sweep has no run state".to_string(),
        })?;
        let point = run.advance()?;

        if run.next_step == run.sequence.len() {
            self.state = SweepState::Completed;
            info!(
                invaded_pores = run.record.invaded_pore_count(),
                final_saturation = run.curve.final_saturation(),
                percolating = run.percolating,
                "invasion sweep completed"
            );
        }
        Ok(Some(point))
    }

    /// Drive the sweep to completion and return the finalized outcome.
    pub fn run(mut self) -> InvasionResult<InvasionOutcome> {
        self.start()?;
        while self.step()?.is_some() {}
        self.finish()
    }

    /// Percolation threshold, available once the sweep has completed.
    ///
    /// `SweepNotCompleted` before the last step; `NoPercolation` when the
    /// finished sweep never reached an outlet.
    pub fn percolation_threshold(&self) -> InvasionResult<Real> {
        self.completed_run()?.evaluator().percolation_threshold()
    }

    pub fn is_percolating(&self, p: Real) -> InvasionResult<bool> {
        Ok(self.completed_run()?.evaluator().is_percolating(p))
    }

    fn completed_run(&self) -> InvasionResult<&SweepRun<'a>> {
        match self.state {
            SweepState::Completed => self.run.as_ref().ok_or(InvasionError::SweepNotCompleted),
            SweepState::Failed => Err(self.failed()),
            SweepState::NotStarted | SweepState::Running => Err(InvasionError::SweepNotCompleted),
        }
    }

    /// Consume a completed sweep into its outcome.
    pub fn finish(self) -> InvasionResult<InvasionOutcome> {
        match self.state {
            SweepState::Completed => {}
            SweepState::Failed => return Err(self.failed()),
            SweepState::NotStarted | SweepState::Running => {
                return Err(InvasionError::SweepNotCompleted);
            }
        }
        let run = self.run.ok_or(InvasionError::SweepNotCompleted)?;
        Ok(InvasionOutcome::new(
            self.entry.mode(),
            run.sequence,
            run.record,
            run.curve,
            run.boundaries.inlets,
            run.boundaries.outlets,
            run.diagnostics,
            run.total_volume,
        ))
    }
}

/// Mutable state of a running sweep.
#[derive(Debug)]
struct SweepRun<'a> {
    tracker: ClusterTracker<'a>,
    order: Vec<(Real, Entity)>,
    cursor: usize,
    sequence: PressureSequence,
    boundaries: BoundarySets,
    volumes: VolumeWeights,
    total_volume: Real,
    record: InvasionRecord,
    curve: IntrusionCurve,
    pending_pores: Vec<PoreId>,
    pending_throats: Vec<ThroatId>,
    invaded_volume: Real,
    /// Volume-carrying entities not yet invaded; zero means saturation is exactly 1.
    weighted_remaining: usize,
    percolating: bool,
    next_step: usize,
    diagnostics: Vec<Diagnostic>,
}

impl SweepRun<'_> {
    fn evaluator(&self) -> PercolationEvaluator<'_> {
        PercolationEvaluator::new(&self.record, &self.boundaries.outlets, &self.sequence)
    }

    fn add_volume(&mut self, volume: Real) {
        if volume > 0.0 {
            self.invaded_volume += volume;
            self.weighted_remaining -= 1;
        }
    }

    fn advance(&mut self) -> InvasionResult<IntrusionPoint> {
        let step = self.next_step;
        let pressure = self
            .sequence
            .get(step)
            .ok_or(InvasionError::SweepNotCompleted)?;

        // Merge phase: qualify everything at or below this pressure
        let mut activated = 0usize;
        while let Some(&(threshold, entity)) = self.order.get(self.cursor) {
            if threshold > pressure {
                break;
            }
            if self.tracker.activate(entity)? {
                activated += 1;
            }
            self.cursor += 1;
        }

        // Read phase: reachability against the fully merged forest
        let new_pores = reached_pores(&self.tracker, &self.pending_pores);
        let new_throats = reached_throats(&self.tracker, &self.pending_throats);

        for &pore in &new_pores {
            if self.record.mark_pore(pore, pressure, step) {
                self.add_volume(self.volumes.pore(pore));
                if self.boundaries.is_outlet[pore.idx()] {
                    self.percolating = true;
                }
            }
        }
        for &throat in &new_throats {
            if self.record.mark_throat(throat, pressure, step) {
                self.add_volume(self.volumes.throat(throat));
            }
        }
        if !new_pores.is_empty() {
            self.pending_pores
                .retain(|p| !self.record.is_pore_invaded(*p));
        }
        if !new_throats.is_empty() {
            self.pending_throats
                .retain(|t| !self.record.is_throat_invaded(*t));
        }

        // Summation order differs from the total's, so a full invasion is pinned to 1
        let saturation = if self.weighted_remaining == 0 {
            1.0
        } else {
            (self.invaded_volume / self.total_volume).min(1.0)
        };
        let point = IntrusionPoint {
            pressure,
            saturation,
            invaded_volume: self.invaded_volume,
            percolating: self.percolating,
        };
        self.curve.push(point)?;

        if step == 0 && saturation > 0.0 {
            warn!(
                pressure,
                saturation, "inlets have non-zero volume; intrusion curve does not start at 0"
            );
            self.diagnostics
                .push(Diagnostic::NonZeroInitialSaturation {
                    pressure,
                    saturation,
                });
        }

        debug!(
            step,
            pressure,
            activated,
            new_pores = new_pores.len(),
            new_throats = new_throats.len(),
            saturation,
            percolating = self.percolating,
            "pressure step"
        );

        self.next_step += 1;
        Ok(point)
    }
}

fn reached_pores(tracker: &ClusterTracker<'_>, pending: &[PoreId]) -> Vec<PoreId> {
    let reached = |p: &PoreId| tracker.is_pore_qualified(*p) && tracker.reaches_inlet(*p);
    if pending.len() >= PARALLEL_SCAN_MIN {
        pending.par_iter().copied().filter(reached).collect()
    } else {
        pending.iter().copied().filter(reached).collect()
    }
}

fn reached_throats(tracker: &ClusterTracker<'_>, pending: &[ThroatId]) -> Vec<ThroatId> {
    let network = tracker.network();
    let reached = |t: &ThroatId| {
        tracker.is_throat_open(*t)
            && network
                .throat_pores(*t)
                .is_some_and(|[head, _]| tracker.reaches_inlet(head))
    };
    if pending.len() >= PARALLEL_SCAN_MIN {
        pending.par_iter().copied().filter(reached).collect()
    } else {
        pending.iter().copied().filter(reached).collect()
    }
}

/// Run a complete sweep in one call.
pub fn invade(
    network: &PoreNetwork,
    entry: &EntryPressures,
    volumes: Option<VolumeWeights>,
    config: RunConfig,
) -> InvasionResult<InvasionOutcome> {
    InvasionSweep::new(network, entry, volumes, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::PressureSteps;

    fn ids(v: &[u32]) -> Vec<PoreId> {
        v.iter().copied().map(PoreId::from_index).collect()
    }

    #[test]
    fn state_machine_transitions() {
        let net = PoreNetwork::from_edges(2, &[(0, 1)]).unwrap();
        let entry = EntryPressures::bond(vec![5.0]);
        let cfg = RunConfig::new(
            ids(&[0]),
            ids(&[1]),
            PressureSteps::Explicit(vec![1.0, 7.0]),
        );
        let mut sweep = InvasionSweep::new(&net, &entry, None, cfg);
        assert_eq!(sweep.state(), SweepState::NotStarted);

        assert!(sweep.step().unwrap().is_some());
        assert_eq!(sweep.state(), SweepState::Running);
        assert!(sweep.step().unwrap().is_some());
        assert_eq!(sweep.state(), SweepState::Completed);
        assert!(sweep.step().unwrap().is_none());
        assert!(sweep.finish().is_ok());
    }

    #[test]
    fn finish_before_completion_is_distinct_error() {
        let net = PoreNetwork::from_edges(2, &[(0, 1)]).unwrap();
        let entry = EntryPressures::bond(vec![5.0]);
        let cfg = RunConfig::new(ids(&[0]), ids(&[1]), PressureSteps::Explicit(vec![1.0, 3.0, 5.0, 7.0]));
        let mut sweep = InvasionSweep::new(&net, &entry, None, cfg);
        sweep.start().unwrap();
        assert_eq!(
            sweep.percolation_threshold(),
            Err(InvasionError::SweepNotCompleted)
        );
        sweep.step().unwrap();
        assert_eq!(sweep.is_percolating(7.0), Err(InvasionError::SweepNotCompleted));
        while sweep.step().unwrap().is_some() {}
        assert_eq!(sweep.percolation_threshold(), Ok(5.0));
        assert_eq!(sweep.is_percolating(7.0), Ok(true));

        let mut unfinished = InvasionSweep::new(
            &net,
            &entry,
            None,
            RunConfig::new(ids(&[0]), ids(&[1]), PressureSteps::Explicit(vec![1.0, 3.0, 5.0, 7.0])),
        );
        unfinished.start().unwrap();
        assert_eq!(unfinished.finish().unwrap_err(), InvasionError::SweepNotCompleted);
    }

    #[test]
    fn invalid_configuration_fails_terminally() {
        let net = PoreNetwork::from_edges(2, &[(0, 1)]).unwrap();
        let entry = EntryPressures::bond(vec![5.0]);
        let cfg = RunConfig::new(ids(&[0]), ids(&[0]), PressureSteps::Count(4));
        let mut sweep = InvasionSweep::new(&net, &entry, None, cfg);

        assert!(matches!(
            sweep.start(),
            Err(InvasionError::Configuration { .. })
        ));
        assert_eq!(sweep.state(), SweepState::Failed);
        assert!(sweep.curve().is_none());
        assert!(matches!(sweep.step(), Err(InvasionError::SweepFailed { .. })));
    }

    #[test]
    fn step_budget_is_enforced_at_start() {
        let net = PoreNetwork::from_edges(2, &[(0, 1)]).unwrap();
        let entry = EntryPressures::bond(vec![5.0]);
        let cfg = RunConfig::new(
            ids(&[0]),
            ids(&[1]),
            PressureSteps::Explicit(vec![1.0, 2.0, 3.0]),
        )
        .with_max_steps(2);
        let err = invade(&net, &entry, None, cfg).unwrap_err();
        assert_eq!(err, InvasionError::StepBudgetExceeded { steps: 3, budget: 2 });
    }
}
