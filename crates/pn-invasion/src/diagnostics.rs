//! Non-fatal observations returned alongside a run's results.

use std::fmt;

use pn_core::Real;

/// A warning-level condition detected during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Saturation at the first pressure step is already above zero, usually
    /// because inlet pores qualify below the first tested pressure.
    NonZeroInitialSaturation { pressure: Real, saturation: Real },
    /// Logarithmic spacing was requested over a range that is not strictly
    /// positive; linear spacing was used instead.
    LogSpacingFallback { min_pressure: Real },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonZeroInitialSaturation {
                pressure,
                saturation,
            } => write!(
                f,
                "Inlets have non-zero volume: saturation is {saturation:.4} at the first pressure step ({pressure})"
            ),
            Self::LogSpacingFallback { min_pressure } => write!(
                f,
                "Minimum entry pressure {min_pressure} is not positive; using linear pressure spacing"
            ),
        }
    }
}
