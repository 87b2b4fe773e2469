//! Fixed-point coordinate arithmetic.
//!
//! Coordinates are stored as `i32` values in units of 1e-7 degrees, which is
//! roughly a centimeter at the equator. That's as precise as OSM data gets,
//! and it lets us do all of our geometric predicates with exact integer
//! arithmetic.

/// The number of fixed-point units in one degree.
pub const COORDINATE_PRECISION: i32 = 10_000_000;

/// The fixed-point value that marks a coordinate as undefined.
pub const UNDEFINED_COORDINATE: i32 = i32::MAX;

/// Converts a coordinate in degrees to fixed point, rounding to the nearest unit.
///
/// Returns `None` if the result doesn't fit in an `i32`, or collides with
/// [`UNDEFINED_COORDINATE`]. NaNs and infinities also return `None`.
pub fn double_to_fix(c: f64) -> Option<i32> {
    let scaled = (c * f64::from(COORDINATE_PRECISION)).round();
    if !scaled.is_finite() || scaled < f64::from(i32::MIN) || scaled >= f64::from(i32::MAX) {
        return None;
    }
    Some(scaled as i32)
}

/// Converts a fixed-point coordinate to degrees.
pub fn fix_to_double(c: i32) -> f64 {
    f64::from(c) / f64::from(COORDINATE_PRECISION)
}

/// Divides `num` by `denom`, rounding to the nearest integer (ties away from zero).
///
/// `denom` must be non-zero.
pub(crate) fn div_round(num: i128, denom: i128) -> i128 {
    debug_assert!(denom != 0);
    let (num, denom) = if denom < 0 { (-num, -denom) } else { (num, denom) };
    if num >= 0 {
        (num + denom / 2) / denom
    } else {
        -((-num + denom / 2) / denom)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    // Kind of like Arbitrary, but
    // - it's a local trait, so we can impl it for whatever we want, and
    // - it only returns "reasonable" values.
    pub trait Reasonable {
        type Strategy: Strategy<Value = Self>;
        fn reasonable() -> Self::Strategy;
    }

    impl<S: Reasonable, T: Reasonable> Reasonable for (S, T) {
        type Strategy = (S::Strategy, T::Strategy);

        fn reasonable() -> Self::Strategy {
            (S::reasonable(), T::reasonable())
        }
    }

    #[test]
    fn round_trip_degrees() {
        assert_eq!(double_to_fix(1.0), Some(10_000_000));
        assert_eq!(double_to_fix(-180.0), Some(-1_800_000_000));
        assert_eq!(double_to_fix(0.00000005), Some(1));
        assert_eq!(fix_to_double(-1_800_000_000), -180.0);
    }

    #[test]
    fn rejects_unrepresentable() {
        assert_eq!(double_to_fix(f64::NAN), None);
        assert_eq!(double_to_fix(f64::INFINITY), None);
        assert_eq!(double_to_fix(1000.0), None);
        assert_eq!(double_to_fix(-1000.0), None);
    }

    #[test]
    fn rounding_division() {
        assert_eq!(div_round(7, 2), 4);
        assert_eq!(div_round(-7, 2), -4);
        assert_eq!(div_round(7, -2), -4);
        assert_eq!(div_round(5, 3), 2);
        assert_eq!(div_round(4, 3), 1);
        assert_eq!(div_round(0, -3), 0);
    }

    proptest! {
    #[test]
    fn fix_is_close(c in -180.0f64..180.0) {
        let fixed = double_to_fix(c).unwrap();
        prop_assert!((fix_to_double(fixed) - c).abs() <= 0.5e-7 + 1e-12);
    }

    #[test]
    fn div_round_is_nearest(num in -1_000_000i128..1_000_000, denom in 1i128..1000) {
        let q = div_round(num, denom);
        prop_assert!((q * denom - num).abs() * 2 <= denom);
    }
    }
}
