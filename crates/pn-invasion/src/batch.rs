//! Independent runs over one network, executed in parallel.

use pn_graph::PoreNetwork;
use rayon::prelude::*;
use tracing::info;

use crate::config::RunConfig;
use crate::entry::EntryPressures;
use crate::error::InvasionResult;
use crate::outcome::InvasionOutcome;
use crate::sweep::invade;
use crate::volume::VolumeWeights;

/// Run one sweep per configuration, sharing the read-only network.
///
/// Results come back in input order; a failing configuration does not affect the others.
pub fn run_batch(
    network: &PoreNetwork,
    entry: &EntryPressures,
    volumes: Option<&VolumeWeights>,
    configs: &[RunConfig],
) -> Vec<InvasionResult<InvasionOutcome>> {
    info!(runs = configs.len(), "starting invasion batch");
    configs
        .par_iter()
        .map(|cfg| invade(network, entry, volumes.cloned(), cfg.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvasionError;
    use crate::sequence::PressureSteps;
    use pn_core::PoreId;

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let net = PoreNetwork::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let entry = EntryPressures::bond(vec![2.0, 4.0]);
        let p = PoreId::from_index;
        let configs = vec![
            RunConfig::new(vec![p(0)], vec![p(2)], PressureSteps::Count(3)),
            RunConfig::new(vec![p(0)], vec![p(0)], PressureSteps::Count(3)),
            RunConfig::new(vec![p(0)], vec![p(1)], PressureSteps::Count(3)),
        ];

        let results = run_batch(&net, &entry, None, &configs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().percolation_threshold(), Ok(4.0));
        assert!(matches!(results[1], Err(InvasionError::Configuration { .. })));
        assert_eq!(results[2].as_ref().unwrap().percolation_threshold(), Ok(2.0));
    }
}
