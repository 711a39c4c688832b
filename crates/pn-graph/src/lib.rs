//! pn-graph: pore network graph layer for poreflow.
//!
//! Provides:
//! - Core graph data structures (Throat, PoreNetwork)
//! - Incremental network builder with validation
//! - Cubic lattice generator with labelled faces
//!
//! # Example
//!
//! ```
//! use pn_graph::NetworkBuilder;
//!
//! let mut builder = NetworkBuilder::new();
//! let p0 = builder.add_pore();
//! let p1 = builder.add_pore();
//! let t0 = builder.add_throat(p0, p1);
//! let network = builder.build().unwrap();
//!
//! assert_eq!(network.pore_count(), 2);
//! assert_eq!(network.throat_pores(t0), Some([p0, p1]));
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod lattice;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{PoreNetwork, Throat};
pub use lattice::{CubicLattice, Face};
