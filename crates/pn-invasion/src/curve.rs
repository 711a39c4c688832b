//! Pressure vs. saturation intrusion curve.

use pn_core::Real;
use pn_core::units::{Pressure, Ratio, Volume, m3, pa, unitless};

use crate::error::{InvasionError, InvasionResult};

/// One evaluated pressure step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrusionPoint {
    /// Applied pressure.
    pub pressure: Real,
    /// Invaded fraction of the total volume.
    pub saturation: Real,
    /// Invaded volume in the units of the supplied weights.
    pub invaded_volume: Real,
    /// Whether an outlet pore has been invaded at or before this pressure.
    pub percolating: bool,
}

impl IntrusionPoint {
    /// Pressure as a typed quantity, taking the raw value as Pa.
    pub fn pressure_si(&self) -> Pressure {
        pa(self.pressure)
    }

    pub fn saturation_ratio(&self) -> Ratio {
        unitless(self.saturation)
    }

    /// Invaded volume as a typed quantity, taking the weights as m³.
    pub fn invaded_volume_si(&self) -> Volume {
        m3(self.invaded_volume)
    }
}

/// Ordered intrusion curve, one point per pressure step.
///
/// Pressures are strictly increasing and saturations non-decreasing; `push`
/// rejects points that would break either property.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntrusionCurve {
    points: Vec<IntrusionPoint>,
}

impl IntrusionCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(steps: usize) -> Self {
        Self {
            points: Vec::with_capacity(steps),
        }
    }

    pub fn push(&mut self, point: IntrusionPoint) -> InvasionResult<()> {
        if let Some(last) = self.points.last() {
            if point.pressure <= last.pressure {
                return Err(InvasionError::Invariant {
                    what: format!(
                        "curve pressure {} does not increase past {}",
                        point.pressure, last.pressure
                    ),
                });
            }
            if point.saturation < last.saturation {
                return Err(InvasionError::Invariant {
                    what: format!(
                        "curve saturation fell from {} to {}",
                        last.saturation, point.saturation
                    ),
                });
            }
        }
        self.points.push(point);
        Ok(())
    }

    pub fn points(&self) -> &[IntrusionPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn pressures(&self) -> Vec<Real> {
        self.points.iter().map(|p| p.pressure).collect()
    }

    pub fn saturations(&self) -> Vec<Real> {
        self.points.iter().map(|p| p.saturation).collect()
    }

    /// Points with `0 < saturation < 1`, dropping the flat ends of the curve.
    pub fn interior(&self) -> Vec<IntrusionPoint> {
        self.points
            .iter()
            .filter(|p| p.saturation > 0.0 && p.saturation < 1.0)
            .copied()
            .collect()
    }

    /// Saturation at pressure `p`, reading the curve as a step function.
    ///
    /// Below the first step nothing is invaded, so the result is 0.
    pub fn saturation_at(&self, p: Real) -> Real {
        let i = self.points.partition_point(|pt| pt.pressure <= p);
        match i {
            0 => 0.0,
            _ => self.points[i - 1].saturation,
        }
    }

    pub fn final_saturation(&self) -> Real {
        self.points.last().map_or(0.0, |p| p.saturation)
    }

    pub fn initial_saturation(&self) -> Real {
        self.points.first().map_or(0.0, |p| p.saturation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(pressure: Real, saturation: Real) -> IntrusionPoint {
        IntrusionPoint {
            pressure,
            saturation,
            invaded_volume: saturation * 10.0,
            percolating: saturation >= 1.0,
        }
    }

    fn sample() -> IntrusionCurve {
        let mut curve = IntrusionCurve::new();
        for (p, s) in [(1.0, 0.0), (2.0, 0.3), (3.0, 0.7), (4.0, 1.0)] {
            curve.push(point(p, s)).unwrap();
        }
        curve
    }

    #[test]
    fn rejects_non_increasing_pressure() {
        let mut curve = sample();
        assert!(curve.push(point(4.0, 1.0)).is_err());
    }

    #[test]
    fn rejects_falling_saturation() {
        let mut curve = IntrusionCurve::new();
        curve.push(point(1.0, 0.5)).unwrap();
        assert!(curve.push(point(2.0, 0.4)).is_err());
    }

    #[test]
    fn interior_drops_boundaries() {
        let interior = sample().interior();
        let sats: Vec<Real> = interior.iter().map(|p| p.saturation).collect();
        assert_eq!(sats, vec![0.3, 0.7]);
    }

    #[test]
    fn step_lookup() {
        let curve = sample();
        assert_eq!(curve.saturation_at(0.5), 0.0);
        assert_eq!(curve.saturation_at(2.0), 0.3);
        assert_eq!(curve.saturation_at(2.9), 0.3);
        assert_eq!(curve.saturation_at(100.0), 1.0);
        assert_eq!(curve.final_saturation(), 1.0);
    }

    #[test]
    fn typed_pressure() {
        let p = point(2_000.0, 0.5);
        assert!((pn_core::units::as_pa(p.pressure_si()) - 2_000.0).abs() < 1e-9);
    }
}
