//! End-to-end sweeps on small hand-built networks and a square lattice.

use pn_core::{PoreId, Real};
use pn_graph::{CubicLattice, Face, PoreNetwork};
use pn_invasion::{
    ClusterTracker, Diagnostic, Entity, EntryPressures, InvasionError, InvasionSweep,
    PressureSteps, RunConfig, SweepState, VolumeWeights, invade,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn pores(ids: &[u32]) -> Vec<PoreId> {
    ids.iter().copied().map(PoreId::from_index).collect()
}

#[test]
fn single_throat_percolates_at_its_entry_pressure() {
    let net = PoreNetwork::from_edges(2, &[(0, 1)]).unwrap();
    let entry = EntryPressures::bond(vec![5.0]);
    let cfg = RunConfig::new(
        pores(&[0]),
        pores(&[1]),
        PressureSteps::Explicit(vec![1.0, 3.0, 5.0, 7.0]),
    );

    let outcome = invade(&net, &entry, None, cfg).unwrap();

    assert_eq!(outcome.percolation_threshold(), Ok(5.0));
    assert_eq!(outcome.percolation_step(), Some(2));
    assert_eq!(outcome.curve().saturations(), vec![0.0, 0.0, 1.0, 1.0]);
    assert_eq!(outcome.curve().initial_saturation(), 0.0);
    assert_eq!(outcome.curve().final_saturation(), 1.0);
    assert!(outcome.diagnostics().is_empty());

    let record = outcome.record();
    assert_eq!(record.pore_pressure(PoreId::from_index(0)), Some(1.0));
    assert_eq!(record.pore_pressure(PoreId::from_index(1)), Some(5.0));
    assert_eq!(record.throat_pressure(pn_core::ThroatId::from_index(0)), Some(5.0));
}

#[test]
fn disconnected_outlet_reports_no_percolation_but_keeps_curve() {
    // 0 - 1    2 - 3
    let net = PoreNetwork::from_edges(4, &[(0, 1), (2, 3)]).unwrap();
    let entry = EntryPressures::bond(vec![1.0, 2.0]);
    let cfg = RunConfig::new(pores(&[0]), pores(&[3]), PressureSteps::Count(5));

    let outcome = invade(&net, &entry, None, cfg).unwrap();

    assert_eq!(
        outcome.percolation_threshold(),
        Err(InvasionError::NoPercolation)
    );
    assert_eq!(outcome.percolation_step(), None);
    assert_eq!(outcome.curve().len(), 5);
    assert!(outcome.curve().points().iter().all(|p| !p.percolating));
    // Only the inlet-side throat carries volume
    assert_eq!(outcome.curve().final_saturation(), 0.5);
    assert!(!outcome.record().is_pore_invaded(PoreId::from_index(2)));
}

#[test]
fn qualified_inlet_gives_nonzero_initial_saturation() {
    // Site mode: the inlet pore's entry pressure is below the first step.
    let net = PoreNetwork::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
    let entry = EntryPressures::site(vec![0.5, 4.0, 6.0]);
    let cfg = RunConfig::new(
        pores(&[0]),
        pores(&[2]),
        PressureSteps::Explicit(vec![1.0, 5.0, 7.0]),
    );

    let outcome = invade(&net, &entry, None, cfg).unwrap();

    let first = outcome.curve().points()[0];
    assert!(first.saturation > 0.0);
    assert_eq!(
        outcome.diagnostics(),
        &[Diagnostic::NonZeroInitialSaturation {
            pressure: 1.0,
            saturation: 1.0 / 3.0,
        }]
    );
    assert_eq!(outcome.percolation_threshold(), Ok(7.0));
}

#[test]
fn log_spacing_over_non_positive_range_falls_back() {
    let net = PoreNetwork::from_edges(2, &[(0, 1)]).unwrap();
    let entry = EntryPressures::site(vec![0.0, 10.0]);
    let cfg = RunConfig::new(pores(&[0]), pores(&[1]), PressureSteps::LogCount(3));

    let outcome = invade(&net, &entry, None, cfg).unwrap();
    assert_eq!(outcome.sequence().values(), &[0.0, 5.0, 10.0]);
    assert!(
        outcome
            .diagnostics()
            .contains(&Diagnostic::LogSpacingFallback { min_pressure: 0.0 })
    );
}

#[test]
fn degenerate_range_is_rejected() {
    let net = PoreNetwork::from_edges(2, &[(0, 1)]).unwrap();
    let entry = EntryPressures::bond(vec![3.0]);
    let cfg = RunConfig::new(pores(&[0]), pores(&[1]), PressureSteps::Count(4));

    let mut sweep = InvasionSweep::new(&net, &entry, None, cfg);
    assert_eq!(
        sweep.start(),
        Err(InvasionError::DegenerateRange { value: 3.0 })
    );
    assert_eq!(sweep.state(), SweepState::Failed);
}

#[test]
fn empty_explicit_sequence_is_rejected() {
    let net = PoreNetwork::from_edges(2, &[(0, 1)]).unwrap();
    let entry = EntryPressures::bond(vec![3.0]);
    let cfg = RunConfig::new(pores(&[0]), pores(&[1]), PressureSteps::Explicit(vec![]));
    assert_eq!(
        invade(&net, &entry, None, cfg).unwrap_err(),
        InvasionError::EmptySequence
    );
}

#[test]
fn bad_configuration_never_starts() {
    let net = PoreNetwork::from_edges(2, &[(0, 1)]).unwrap();
    let entry = EntryPressures::bond(vec![3.0, 4.0]);
    let cfg = RunConfig::new(pores(&[0]), pores(&[1]), PressureSteps::Count(4));
    assert!(matches!(
        invade(&net, &entry, None, cfg),
        Err(InvasionError::LengthMismatch { .. })
    ));

    let entry = EntryPressures::bond(vec![3.0]);
    let cfg = RunConfig::new(vec![], pores(&[1]), PressureSteps::Count(4));
    assert!(matches!(
        invade(&net, &entry, None, cfg),
        Err(InvasionError::Configuration { .. })
    ));
}

#[test]
fn custom_volumes_weight_saturation() {
    // 0 - 1 - 2, mixed mode with heavy pore 2
    let net = PoreNetwork::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
    let entry = EntryPressures::mixed(vec![1.0, 2.0, 3.0], vec![1.0, 1.0]);
    let volumes = VolumeWeights::new(vec![1.0, 1.0, 8.0], vec![0.0, 0.0]);
    let cfg = RunConfig::new(
        pores(&[0]),
        pores(&[2]),
        PressureSteps::Explicit(vec![1.0, 2.0, 3.0]),
    );

    let outcome = invade(&net, &entry, Some(volumes), cfg).unwrap();
    assert_eq!(outcome.curve().saturations(), vec![0.1, 0.2, 1.0]);
    assert_eq!(outcome.total_volume(), 10.0);
}

#[test]
fn full_invasion_with_fractional_volumes_reaches_exactly_one() {
    // 2 - 1 - 0, invaded from pore 2 one pore per step
    let net = PoreNetwork::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
    let entry = EntryPressures::site(vec![3.0, 2.0, 1.0]);
    let volumes = VolumeWeights::new(vec![0.1, 0.2, 0.3], vec![0.0, 0.0]);
    let cfg = RunConfig::new(
        pores(&[2]),
        pores(&[0]),
        PressureSteps::Explicit(vec![1.0, 2.0, 3.0]),
    );

    let outcome = invade(&net, &entry, Some(volumes), cfg).unwrap();

    assert_eq!(outcome.record().invaded_pore_count(), 3);
    assert_eq!(outcome.curve().final_saturation(), 1.0);
    let interior = outcome.curve().interior();
    assert_eq!(interior.len(), 2);
    assert!(interior.iter().all(|p| p.pressure < 3.0));
}

#[test]
fn zero_volume_leftovers_do_not_block_full_saturation() {
    // Pore 3 hangs off a closed throat but carries no volume
    let net = PoreNetwork::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
    let entry = EntryPressures::bond(vec![1.0, 1.0, 9.0]);
    let volumes = VolumeWeights::new(vec![0.1, 0.2, 0.3, 0.0], vec![0.7, 0.11, 0.0]);
    let cfg = RunConfig::new(
        pores(&[0]),
        pores(&[2]),
        PressureSteps::Explicit(vec![1.0, 2.0]),
    );

    let outcome = invade(&net, &entry, Some(volumes), cfg).unwrap();

    assert!(!outcome.record().is_pore_invaded(PoreId::from_index(3)));
    assert_eq!(outcome.curve().saturations(), vec![1.0, 1.0]);
}

#[test]
fn stepwise_driving_matches_run() {
    let net = PoreNetwork::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
    let entry = EntryPressures::bond(vec![2.0, 4.0]);
    let cfg = RunConfig::new(pores(&[0]), pores(&[2]), PressureSteps::Count(5));

    let mut sweep = InvasionSweep::new(&net, &entry, None, cfg.clone());
    let mut stepped = Vec::new();
    while let Some(point) = sweep.step().unwrap() {
        stepped.push(point);
    }
    let outcome = sweep.finish().unwrap();
    assert_eq!(outcome.curve().points(), stepped.as_slice());

    let direct = invade(&net, &entry, None, cfg).unwrap();
    assert_eq!(direct.curve(), outcome.curve());
    assert_eq!(direct.record(), outcome.record());
}

/// Exact bond-percolation threshold between two pore sets by adding throats
/// in ascending order until an outlet joins the inlet cluster.
fn critical_pressure(net: &PoreNetwork, thresholds: &[Real], inlets: &[PoreId], outlets: &[PoreId]) -> Real {
    let mut tracker = ClusterTracker::new(net, inlets);
    for p in net.pore_ids() {
        tracker.activate(Entity::Pore(p)).unwrap();
    }
    let mut order: Vec<_> = net.throats().iter().map(|t| (thresholds[t.id.idx()], t.id)).collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (value, throat) in order {
        tracker.activate(Entity::Throat(throat)).unwrap();
        if outlets.iter().any(|&o| tracker.connected_to_inlet(o)) {
            return value;
        }
    }
    Real::INFINITY
}

#[test]
fn square_lattice_threshold_converges_with_step_count() {
    let lattice = CubicLattice::new([100, 100, 1]).unwrap();
    let net = lattice.network();
    let mut rng = StdRng::seed_from_u64(7);
    let thresholds: Vec<Real> = (0..net.throat_count()).map(|_| rng.r#gen::<Real>()).collect();
    let inlets = lattice.face_pores(Face::Front);
    let outlets = lattice.face_pores(Face::Back);

    let exact = critical_pressure(net, &thresholds, &inlets, &outlets);
    // Square-lattice bond percolation sits near 1/2; allow for finite size
    assert!((0.35..0.65).contains(&exact), "exact threshold {exact}");

    let entry = EntryPressures::bond(thresholds);
    let (min, max) = entry.range().unwrap();
    for steps in [10usize, 100, 1000] {
        let cfg = RunConfig::new(inlets.clone(), outlets.clone(), PressureSteps::Count(steps));
        let outcome = invade(net, &entry, None, cfg).unwrap();
        let found = outcome.percolation_threshold().unwrap();

        let expected_step = outcome.sequence().first_at_or_above(exact).unwrap();
        assert_eq!(outcome.percolation_step(), Some(expected_step));

        let spacing = (max - min) / (steps - 1) as Real;
        let error = found - exact;
        assert!(error >= 0.0 && error <= spacing + 1e-12, "steps {steps}: error {error}");

        let curve = outcome.curve();
        assert!(curve.saturations().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(curve.final_saturation(), 1.0);
    }
}
