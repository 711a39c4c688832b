//! Error types for invasion percolation runs.

use pn_core::{PnError, Real};
use pn_graph::GraphError;
use thiserror::Error;

use crate::entry::Entity;

/// Errors that can occur while configuring, running or querying an invasion sweep.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvasionError {
    /// Inlet/outlet sets overlap, are empty, or reference unknown pores.
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    /// Every finite entry pressure is the same value, so no range can be split.
    #[error("Degenerate pressure range: every entry pressure equals {value}")]
    DegenerateRange { value: Real },

    /// An explicit pressure sequence with no values.
    #[error("Pressure sequence is empty")]
    EmptySequence,

    /// Inlet and outlet never connect within the tested pressure range.
    #[error("No percolation within the tested pressure range")]
    NoPercolation,

    /// A result was queried before the sweep reached `Completed`.
    #[error("Sweep has not completed")]
    SweepNotCompleted,

    /// The sweep is in the terminal `Failed` state.
    #[error("Sweep failed: {what}")]
    SweepFailed { what: String },

    #[error("Non-finite {what} at index {index}: {value}")]
    NonFinite {
        what: &'static str,
        index: usize,
        value: Real,
    },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Step budget exceeded: {steps} pressure steps requested, budget is {budget}")]
    StepBudgetExceeded { steps: usize, budget: usize },

    #[error("Unknown entity: {entity:?}")]
    UnknownEntity { entity: Entity },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type InvasionResult<T> = Result<T, InvasionError>;

impl InvasionError {
    pub(crate) fn config(what: impl Into<String>) -> Self {
        InvasionError::Configuration { what: what.into() }
    }
}

impl From<InvasionError> for PnError {
    fn from(e: InvasionError) -> Self {
        match e {
            InvasionError::NonFinite { what, value, .. } => PnError::NonFinite { what, value },
            other => PnError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_percolation_is_distinct_from_not_completed() {
        assert_ne!(InvasionError::NoPercolation, InvasionError::SweepNotCompleted);
        assert!(InvasionError::NoPercolation.to_string().contains("No percolation"));
    }

    #[test]
    fn non_finite_maps_to_core_error() {
        let err: PnError = InvasionError::NonFinite {
            what: "pore entry pressure",
            index: 2,
            value: Real::NAN,
        }
        .into();
        assert!(matches!(err, PnError::NonFinite { .. }));
    }
}
