/// Floating point type used throughout system
pub type Real = f64;

/// Min and max over the finite values of a slice, or `None` if there are none.
pub fn finite_range(values: &[Real]) -> Option<(Real, Real)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn finite_range_bounds_every_value(values in prop::collection::vec(-1e6_f64..1e6_f64, 1..50)) {
            let (lo, hi) = finite_range(&values).unwrap();
            prop_assert!(lo <= hi);
            for v in &values {
                prop_assert!(*v >= lo && *v <= hi);
            }
        }
    }
}
