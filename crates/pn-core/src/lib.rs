//! pn-core: stable foundation for poreflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + float helpers)
//! - ids (compact IDs for pores and throats)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PnError, PnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
