//! Graph-specific error types.

use pn_core::{PnError, PoreId, ThroatId};
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Network construction and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A throat refers to a pore that doesn't exist.
    #[error("Throat {throat} refers to non-existent pore {pore} (pore count {pore_count})")]
    InvalidPoreRef {
        throat: ThroatId,
        pore: PoreId,
        pore_count: usize,
    },

    /// A throat connects a pore to itself.
    #[error("Throat {throat} is a self-loop on pore {pore}")]
    SelfLoop { throat: ThroatId, pore: PoreId },

    /// Adjacency list is inconsistent (throat in pore's list but throat doesn't touch pore).
    #[error("Throat {throat} in pore {pore}'s adjacency list but doesn't reference that pore")]
    InconsistentAdjacency { throat: ThroatId, pore: PoreId },

    /// More entities than a compact id can address.
    #[error("Too many {what} for compact ids")]
    TooManyEntities { what: &'static str },

    /// Lattice dimensions are unusable.
    #[error("Invalid lattice shape {shape:?}: {what}")]
    InvalidShape { shape: [usize; 3], what: &'static str },
}

impl From<GraphError> for PnError {
    fn from(err: GraphError) -> Self {
        PnError::Invariant {
            what: err.to_string(),
        }
    }
}
