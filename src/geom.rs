//! Geometric primitives: fixed-point locations and exact segment intersection.

use crate::num::{self, div_round, fix_to_double, UNDEFINED_COORDINATE};
use crate::Error;

/// A geographic location, stored as fixed-point longitude and latitude.
///
/// Locations are sorted by `x` (longitude) and then by `y` (latitude). Two
/// locations are the same point only if they are exactly equal; there is no
/// tolerance.
///
/// The default location is undefined. Node references whose location hasn't
/// been resolved carry an undefined location.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Location {
    /// Longitude, in units of 1e-7 degrees.
    x: i32,
    /// Latitude, in units of 1e-7 degrees.
    y: i32,
}

impl Default for Location {
    fn default() -> Self {
        Location {
            x: UNDEFINED_COORDINATE,
            y: UNDEFINED_COORDINATE,
        }
    }
}

impl Location {
    /// Create a location from fixed-point coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Location { x, y }
    }

    /// The undefined location.
    pub const fn undefined() -> Self {
        Location {
            x: UNDEFINED_COORDINATE,
            y: UNDEFINED_COORDINATE,
        }
    }

    /// Create a location from a longitude and latitude in degrees.
    ///
    /// The coordinates are rounded to the nearest fixed-point unit. Coordinates
    /// outside of the usual longitude/latitude ranges are accepted as long as
    /// they are representable; use [`Location::is_valid`] to check them.
    pub fn from_degrees(lon: f64, lat: f64) -> Result<Self, Error> {
        if lon.is_nan() || lat.is_nan() {
            return Err(Error::NaN);
        }
        if lon.is_infinite() || lat.is_infinite() {
            return Err(Error::Infinity);
        }
        match (num::double_to_fix(lon), num::double_to_fix(lat)) {
            (Some(x), Some(y)) => Ok(Location { x, y }),
            _ => Err(Error::OutOfRange),
        }
    }

    /// The fixed-point longitude.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// The fixed-point latitude.
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Are both coordinates set?
    pub fn is_defined(&self) -> bool {
        self.x != UNDEFINED_COORDINATE && self.y != UNDEFINED_COORDINATE
    }

    /// Is this location defined and inside the usual longitude/latitude ranges?
    pub fn is_valid(&self) -> bool {
        const MAX_X: i32 = 180 * num::COORDINATE_PRECISION;
        const MAX_Y: i32 = 90 * num::COORDINATE_PRECISION;
        self.is_defined() && (-MAX_X..=MAX_X).contains(&self.x) && (-MAX_Y..=MAX_Y).contains(&self.y)
    }

    /// Longitude in degrees.
    ///
    /// # Panics
    ///
    /// Panics if this location isn't valid.
    pub fn lon(&self) -> f64 {
        assert!(self.is_valid(), "longitude of invalid location {self:?}");
        self.lon_without_check()
    }

    /// Latitude in degrees.
    ///
    /// # Panics
    ///
    /// Panics if this location isn't valid.
    pub fn lat(&self) -> f64 {
        assert!(self.is_valid(), "latitude of invalid location {self:?}");
        self.lat_without_check()
    }

    /// Longitude in degrees, even if the location isn't valid.
    pub fn lon_without_check(&self) -> f64 {
        fix_to_double(self.x)
    }

    /// Latitude in degrees, even if the location isn't valid.
    pub fn lat_without_check(&self) -> f64 {
        fix_to_double(self.y)
    }

    /// Converts to a `kurbo` point, in degrees.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.lon_without_check(), self.lat_without_check())
    }
}

impl std::fmt::Debug for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_defined() {
            write!(f, "(")?;
            write_coordinate(f, self.x)?;
            write!(f, ",")?;
            write_coordinate(f, self.y)?;
            write!(f, ")")
        } else {
            write!(f, "(undefined,undefined)")
        }
    }
}

// Writes a fixed-point coordinate in degrees, without trailing zeros.
fn write_coordinate(f: &mut std::fmt::Formatter<'_>, c: i32) -> std::fmt::Result {
    let precision = i64::from(num::COORDINATE_PRECISION);
    let c = i64::from(c);
    if c < 0 {
        write!(f, "-")?;
    }
    let (int, frac) = (c.abs() / precision, c.abs() % precision);
    write!(f, "{int}")?;
    if frac != 0 {
        let digits = format!("{frac:07}");
        write!(f, ".{}", digits.trim_end_matches('0'))?;
    }
    Ok(())
}

/// Finds the point where the closed segments `a0 -- a1` and `b0 -- b1` cross.
///
/// All of the arithmetic is exact, except that the returned point is rounded
/// to the nearest fixed-point unit along `a0 -- a1`. Parallel and collinear
/// segments never intersect, even if they overlap.
pub(crate) fn intersect_segments(
    a0: Location,
    a1: Location,
    b0: Location,
    b1: Location,
) -> Option<Location> {
    let (ax, ay) = (i128::from(a0.x), i128::from(a0.y));
    let (adx, ady) = (i128::from(a1.x) - ax, i128::from(a1.y) - ay);
    let (bx, by) = (i128::from(b0.x), i128::from(b0.y));
    let (bdx, bdy) = (i128::from(b1.x) - bx, i128::from(b1.y) - by);

    let denom = bdy * adx - bdx * ady;
    if denom == 0 {
        return None;
    }

    // The intersection is at a0 + (nume_a / denom) * (a1 - a0), which is
    // also b0 + (nume_b / denom) * (b1 - b0). It's inside both segments when
    // both of those fractions are in [0, 1].
    let nume_a = bdx * (ay - by) - bdy * (ax - bx);
    let nume_b = adx * (ay - by) - ady * (ax - bx);

    let inside = if denom > 0 {
        (0..=denom).contains(&nume_a) && (0..=denom).contains(&nume_b)
    } else {
        (denom..=0).contains(&nume_a) && (denom..=0).contains(&nume_b)
    };
    if !inside {
        return None;
    }

    // The result lies between a0 and a1, so it fits in an i32.
    let x = ax + div_round(nume_a * adx, denom);
    let y = ay + div_round(nume_a * ady, denom);
    Some(Location::new(x as i32, y as i32))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::num::tests::Reasonable;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    impl Reasonable for Location {
        type Strategy = BoxedStrategy<Location>;

        // A small grid, so that coincidences are likely.
        fn reasonable() -> Self::Strategy {
            (-20i32..20, -20i32..20)
                .prop_map(|(x, y)| Location::new(x, y))
                .boxed()
        }
    }

    fn loc(x: i32, y: i32) -> Location {
        Location::new(x, y)
    }

    #[test]
    fn undefined_by_default() {
        let l = Location::default();
        assert!(!l.is_defined());
        assert!(!l.is_valid());
        assert_eq!(l, Location::undefined());
        assert_eq!(l.to_string(), "(undefined,undefined)");
    }

    #[test]
    fn validity() {
        assert!(Location::from_degrees(180.0, -90.0).unwrap().is_valid());
        let outside = Location::from_degrees(181.0, 0.0).unwrap();
        assert!(outside.is_defined());
        assert!(!outside.is_valid());
    }

    #[test]
    #[should_panic]
    fn lon_of_undefined() {
        Location::default().lon();
    }

    #[test]
    fn from_degrees_errors() {
        assert_matches!(Location::from_degrees(f64::NAN, 0.0), Err(Error::NaN));
        assert_matches!(
            Location::from_degrees(0.0, f64::NEG_INFINITY),
            Err(Error::Infinity)
        );
        assert_matches!(Location::from_degrees(0.0, 500.0), Err(Error::OutOfRange));
    }

    #[test]
    fn display() {
        let l = Location::from_degrees(1.5, -0.25).unwrap();
        assert_eq!(l.to_string(), "(1.5,-0.25)");
        assert_eq!(l.lon(), 1.5);
        assert_eq!(l.lat(), -0.25);
    }

    #[test]
    fn display_trims_zeros() {
        assert_eq!(Location::new(0, 0).to_string(), "(0,0)");
        assert_eq!(Location::new(10_000_000, 20_000_000).to_string(), "(1,2)");
        assert_eq!(Location::new(-5, 10).to_string(), "(-0.0000005,0.000001)");
        assert_eq!(
            Location::new(-1_799_999_999, 899_999_999).to_string(),
            "(-179.9999999,89.9999999)"
        );
        assert_eq!(Location::undefined().to_string(), "(undefined,undefined)");
    }

    #[test]
    fn order_is_x_then_y() {
        assert!(loc(0, 5) < loc(1, -5));
        assert!(loc(1, -5) < loc(1, 0));
        assert!(loc(i32::MIN, 0) < Location::undefined());
    }

    #[test]
    fn crossing() {
        let p = intersect_segments(loc(0, 0), loc(10, 0), loc(5, -5), loc(5, 5));
        assert_eq!(p, Some(loc(5, 0)));
    }

    #[test]
    fn endpoint_on_interior() {
        let p = intersect_segments(loc(0, 0), loc(10, 0), loc(4, 0), loc(4, 7));
        assert_eq!(p, Some(loc(4, 0)));
    }

    #[test]
    fn disjoint() {
        assert_eq!(
            intersect_segments(loc(0, 0), loc(10, 0), loc(11, -5), loc(11, 5)),
            None
        );
        assert_eq!(
            intersect_segments(loc(0, 0), loc(10, 10), loc(0, 1), loc(3, 10)),
            None
        );
    }

    #[test]
    fn parallel_and_collinear() {
        assert_eq!(
            intersect_segments(loc(0, 0), loc(10, 0), loc(0, 1), loc(10, 1)),
            None
        );
        assert_eq!(
            intersect_segments(loc(0, 0), loc(10, 0), loc(5, 0), loc(15, 0)),
            None
        );
    }

    #[test]
    fn extreme_coordinates() {
        let max = 180 * num::COORDINATE_PRECISION;
        let p = intersect_segments(loc(-max, -max), loc(max, max), loc(-max, max), loc(max, -max));
        assert_eq!(p, Some(loc(0, 0)));
    }

    #[test]
    fn rounds_to_nearest() {
        // The true intersection is at (1/3, 1/3).
        let p = intersect_segments(loc(0, 0), loc(1, 1), loc(0, 1), loc(1, -1));
        assert_eq!(p, Some(loc(0, 0)));
    }

    proptest! {
    #[test]
    fn intersection_is_symmetric_and_bounded(
        a0 in Location::reasonable(),
        a1 in Location::reasonable(),
        b0 in Location::reasonable(),
        b1 in Location::reasonable(),
    ) {
        let p = intersect_segments(a0, a1, b0, b1);
        let q = intersect_segments(b0, b1, a0, a1);
        prop_assert_eq!(p.is_some(), q.is_some());
        if let Some(p) = p {
            let in_box = |l: Location, m0: Location, m1: Location| {
                (m0.x.min(m1.x)..=m0.x.max(m1.x)).contains(&l.x)
                    && (m0.y.min(m1.y)..=m0.y.max(m1.y)).contains(&l.y)
            };
            prop_assert!(in_box(p, a0, a1));
        }
    }
    }
}
