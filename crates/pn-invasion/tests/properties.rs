//! Property tests for sweep results on random small networks.

use pn_core::{PoreId, Real, ThroatId};
use pn_graph::PoreNetwork;
use pn_invasion::{EntryPressures, InvasionOutcome, PressureSteps, RunConfig, invade};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Case {
    pores: usize,
    edges: Vec<(u32, u32)>,
    pore_t: Vec<Real>,
    throat_t: Vec<Real>,
    mode: u8,
    inlet: u32,
    outlet: u32,
}

impl Case {
    fn network(&self) -> PoreNetwork {
        PoreNetwork::from_edges(self.pores, &self.edges).unwrap()
    }

    fn entry(&self) -> EntryPressures {
        match self.mode {
            0 => EntryPressures::site(self.pore_t.clone()),
            1 => EntryPressures::bond(self.throat_t.clone()),
            _ => EntryPressures::mixed(self.pore_t.clone(), self.throat_t.clone()),
        }
    }

    fn config(&self, steps: Vec<Real>) -> RunConfig {
        RunConfig::new(
            vec![PoreId::from_index(self.inlet)],
            vec![PoreId::from_index(self.outlet)],
            PressureSteps::Explicit(steps),
        )
    }

    fn run(&self, steps: Vec<Real>) -> InvasionOutcome {
        invade(&self.network(), &self.entry(), None, self.config(steps)).unwrap()
    }

    /// Same network with pore labels reversed and throats listed backwards.
    fn relabeled(&self) -> Case {
        let n = self.pores as u32;
        Case {
            pores: self.pores,
            edges: self
                .edges
                .iter()
                .rev()
                .map(|&(a, b)| (n - 1 - b, n - 1 - a))
                .collect(),
            pore_t: self.pore_t.iter().rev().copied().collect(),
            throat_t: self.throat_t.iter().rev().copied().collect(),
            mode: self.mode,
            inlet: n - 1 - self.inlet,
            outlet: n - 1 - self.outlet,
        }
    }
}

fn case() -> impl Strategy<Value = Case> {
    (2usize..14)
        .prop_flat_map(|n| {
            let edge = (0..n as u32, 0..n as u32).prop_filter("no self loops", |(a, b)| a != b);
            (
                Just(n),
                prop::collection::vec(edge, 1..30),
                prop::collection::vec(0.0..10.0f64, n),
                0u8..3,
            )
        })
        .prop_flat_map(|(n, edges, pore_t, mode)| {
            let m = edges.len();
            (
                Just(n),
                Just(edges),
                Just(pore_t),
                prop::collection::vec(0.0..10.0f64, m),
                Just(mode),
            )
        })
        .prop_map(|(pores, edges, pore_t, throat_t, mode)| Case {
            inlet: 0,
            outlet: pores as u32 - 1,
            pores,
            edges,
            pore_t,
            throat_t,
            mode,
        })
}

fn fine_steps() -> Vec<Real> {
    (0..=40).map(|i| i as Real * 0.25).collect()
}

fn coarse_steps() -> Vec<Real> {
    (0..=10).map(|i| i as Real).collect()
}

proptest! {
    #[test]
    fn repeated_runs_are_identical(c in case()) {
        let a = c.run(coarse_steps());
        let b = c.run(coarse_steps());
        prop_assert_eq!(a.record(), b.record());
        prop_assert_eq!(a.curve(), b.curve());
        prop_assert_eq!(a.diagnostics(), b.diagnostics());
    }

    #[test]
    fn labels_and_throat_order_do_not_matter(c in case()) {
        let a = c.run(coarse_steps());
        let b = c.relabeled().run(coarse_steps());
        let n = c.pores;
        let m = c.edges.len();

        for i in 0..n {
            prop_assert_eq!(
                a.record().pore_pressure(PoreId::from_index(i as u32)),
                b.record().pore_pressure(PoreId::from_index((n - 1 - i) as u32))
            );
        }
        for i in 0..m {
            prop_assert_eq!(
                a.record().throat_pressure(ThroatId::from_index(i as u32)),
                b.record().throat_pressure(ThroatId::from_index((m - 1 - i) as u32))
            );
        }
        prop_assert_eq!(a.curve().saturations(), b.curve().saturations());
    }

    #[test]
    fn invaded_state_depends_only_on_pressure(c in case()) {
        // Coarse steps are a subset of the fine ones
        let coarse = c.run(coarse_steps());
        let fine = c.run(fine_steps());
        for p in coarse_steps() {
            prop_assert_eq!(
                coarse.record().invaded_pores_at(p),
                fine.record().invaded_pores_at(p)
            );
            prop_assert!((coarse.curve().saturation_at(p) - fine.curve().saturation_at(p)).abs() < 1e-12);
        }
    }

    #[test]
    fn saturation_is_bounded_and_non_decreasing(c in case()) {
        let out = c.run(fine_steps());
        let sat = out.curve().saturations();
        prop_assert!(sat.iter().all(|s| (0.0..=1.0).contains(s)));
        prop_assert!(sat.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn invasion_never_precedes_entry_pressure(c in case()) {
        let out = c.run(fine_steps());
        let entry = c.entry();
        for i in 0..c.pores {
            let pore = PoreId::from_index(i as u32);
            if let Some(p) = out.record().pore_pressure(pore) {
                prop_assert!(p >= entry.pore_threshold(pore));
            }
        }
        for i in 0..c.edges.len() {
            let throat = ThroatId::from_index(i as u32);
            if let Some(p) = out.record().throat_pressure(throat) {
                prop_assert!(p >= entry.throat_threshold(throat));
            }
        }
    }

    #[test]
    fn percolation_flag_matches_threshold(c in case()) {
        let out = c.run(fine_steps());
        match out.percolation_threshold() {
            Ok(t) => {
                for point in out.curve().points() {
                    prop_assert_eq!(point.percolating, point.pressure >= t);
                    prop_assert_eq!(out.is_percolating(point.pressure), point.pressure >= t);
                }
            }
            Err(_) => {
                prop_assert!(out.curve().points().iter().all(|p| !p.percolating));
                prop_assert!(out.outlets().iter().all(|&o| !out.record().is_pore_invaded(o)));
            }
        }
    }
}
