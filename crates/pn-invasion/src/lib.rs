//! pn-invasion: invasion and ordinary percolation over pore networks.
//!
//! A sweep walks an ascending pressure sequence. At each step every pore or
//! throat whose entry pressure has been reached becomes qualified, qualified
//! pores joined by open throats are merged in a union-find forest, and every
//! cluster touching an inlet is invaded. Invasion is write-once, so the
//! record doubles as a per-entity invasion-pressure map.

pub mod batch;
pub mod cluster;
pub mod config;
pub mod curve;
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod outcome;
pub mod percolation;
pub mod record;
pub mod sequence;
pub mod sweep;
pub mod volume;

pub use batch::run_batch;
pub use cluster::ClusterTracker;
pub use config::RunConfig;
pub use curve::{IntrusionCurve, IntrusionPoint};
pub use diagnostics::Diagnostic;
pub use entry::{Entity, EntryPressures, PercolationMode};
pub use error::{InvasionError, InvasionResult};
pub use outcome::InvasionOutcome;
pub use percolation::PercolationEvaluator;
pub use record::{InvasionRecord, UNINVADED};
pub use sequence::{PressureSequence, PressureSteps};
pub use sweep::{InvasionSweep, SweepState, invade};
pub use volume::VolumeWeights;
