//! Pressure sequence generation.
//!
//! Produces the strictly increasing pressures at which a sweep is evaluated,
//! either by splitting the entry-pressure range or from explicit values.

use std::fmt;

use pn_core::Real;

use crate::diagnostics::Diagnostic;
use crate::entry::EntryPressures;
use crate::error::{InvasionError, InvasionResult};

/// How the pressure steps of a run are specified.
#[derive(Debug, Clone, PartialEq)]
pub enum PressureSteps {
    /// `k` linearly spaced pressures between the smallest and largest entry pressure.
    Count(usize),
    /// `k` logarithmically spaced pressures over the same range.
    LogCount(usize),
    /// Explicit pressures; sorted and de-duplicated before use.
    Explicit(Vec<Real>),
}

impl fmt::Display for PressureSteps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(k) => write!(f, "{k} linear steps"),
            Self::LogCount(k) => write!(f, "{k} logarithmic steps"),
            Self::Explicit(v) => write!(f, "{} explicit steps", v.len()),
        }
    }
}

/// A strictly increasing, non-empty sequence of pressures.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureSequence {
    values: Vec<Real>,
}

impl PressureSequence {
    /// Build the sequence for a run.
    ///
    /// Returns a diagnostic when logarithmic spacing had to fall back to linear.
    pub fn build(
        steps: &PressureSteps,
        entry: &EntryPressures,
    ) -> InvasionResult<(Self, Option<Diagnostic>)> {
        match steps {
            PressureSteps::Explicit(values) => Ok((Self::explicit(values)?, None)),
            PressureSteps::Count(k) => {
                let (min, max) = threshold_range(entry)?;
                Ok((Self::linear(min, max, *k)?, None))
            }
            PressureSteps::LogCount(k) => {
                let (min, max) = threshold_range(entry)?;
                if min > 0.0 {
                    Ok((Self::logarithmic(min, max, *k)?, None))
                } else {
                    tracing::warn!(
                        min_pressure = min,
                        "log pressure spacing needs a positive range, falling back to linear"
                    );
                    Ok((
                        Self::linear(min, max, *k)?,
                        Some(Diagnostic::LogSpacingFallback { min_pressure: min }),
                    ))
                }
            }
        }
    }

    /// `count` linearly spaced values over `[min, max]`, endpoints included.
    ///
    /// A single step evaluates at `max`, where every valued entity qualifies.
    pub fn linear(min: Real, max: Real, count: usize) -> InvasionResult<Self> {
        check_range(min, max, count)?;
        if count == 1 {
            return Ok(Self { values: vec![max] });
        }

        let delta = (max - min) / (count - 1) as Real;
        let mut values: Vec<Real> = (0..count).map(|i| min + i as Real * delta).collect();

        // Ensure exact endpoint
        values[count - 1] = max;
        Self::from_sorted(values)
    }

    /// `count` logarithmically spaced values over `[min, max]`; requires `min > 0`.
    pub fn logarithmic(min: Real, max: Real, count: usize) -> InvasionResult<Self> {
        check_range(min, max, count)?;
        if min <= 0.0 {
            return Err(InvasionError::config(format!(
                "logarithmic spacing needs a positive minimum pressure, got {min}"
            )));
        }
        if count == 1 {
            return Ok(Self { values: vec![max] });
        }

        let log_min = min.ln();
        let log_delta = (max.ln() - log_min) / (count - 1) as Real;
        let mut values: Vec<Real> = (0..count)
            .map(|i| (log_min + i as Real * log_delta).exp())
            .collect();

        values[0] = min;
        values[count - 1] = max;
        Self::from_sorted(values)
    }

    /// Sort and de-duplicate explicit pressures.
    pub fn explicit(values: &[Real]) -> InvasionResult<Self> {
        if values.is_empty() {
            return Err(InvasionError::EmptySequence);
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InvasionError::NonFinite {
                what: "pressure step",
                index,
                value,
            });
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted.dedup();
        Ok(Self { values: sorted })
    }

    fn from_sorted(mut values: Vec<Real>) -> InvasionResult<Self> {
        // Rounding can collapse neighbours on very narrow ranges
        values.dedup();
        if values.windows(2).any(|w| w[0] >= w[1]) {
            return Err(InvasionError::Invariant {
                what: "generated pressure steps are not strictly increasing".to_string(),
            });
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<Real> {
        self.values.get(step).copied()
    }

    pub fn first(&self) -> Real {
        self.values[0]
    }

    pub fn last(&self) -> Real {
        self.values[self.values.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = Real> + '_ {
        self.values.iter().copied()
    }

    /// Index of the first step whose pressure is `>= p`.
    pub fn first_at_or_above(&self, p: Real) -> Option<usize> {
        let i = self.values.partition_point(|&v| v < p);
        (i < self.values.len()).then_some(i)
    }

    /// Index of the last step whose pressure is `<= p`.
    pub fn last_at_or_below(&self, p: Real) -> Option<usize> {
        self.values.partition_point(|&v| v <= p).checked_sub(1)
    }
}

fn threshold_range(entry: &EntryPressures) -> InvasionResult<(Real, Real)> {
    let (min, max) = entry.range().ok_or_else(|| {
        InvasionError::config("no entry pressures to derive a pressure range from")
    })?;
    if min == max {
        return Err(InvasionError::DegenerateRange { value: min });
    }
    Ok((min, max))
}

fn check_range(min: Real, max: Real, count: usize) -> InvasionResult<()> {
    if count == 0 {
        return Err(InvasionError::config("pressure step count must be at least 1"));
    }
    if !min.is_finite() || !max.is_finite() {
        return Err(InvasionError::NonFinite {
            what: "pressure range bound",
            index: if min.is_finite() { 1 } else { 0 },
            value: if min.is_finite() { max } else { min },
        });
    }
    if min == max {
        return Err(InvasionError::DegenerateRange { value: min });
    }
    if min > max {
        return Err(InvasionError::config(format!(
            "pressure range is inverted: min {min} > max {max}"
        )));
    }
    Ok(())
}
