use crate::{
    geom::{self, Location},
    osm::{NodeRef, Role},
};

/// An index into the ways that a [`SegmentList`](crate::SegmentList) was built from.
///
/// Every segment remembers which way it came from. Two segments came from
/// the same way exactly when their indices are equal.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct WayIdx(pub usize);

/// A vector indexed by [`WayIdx`].
pub struct WayVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(WayVec, WayIdx, "w");

/// A segment between two adjacent nodes of a way.
///
/// The endpoints are stored in canonical order: the one with the smaller
/// location comes first, no matter which direction the way runs in. This
/// means that two segments connecting the same pair of locations compare
/// equal, even if they came from different ways.
///
/// Segments are ordered by their first endpoint (by `x`, then by `y`) and
/// then by their second endpoint. In particular, all segments that start at
/// the same location are contiguous in a sorted list, and a sorted list has
/// non-decreasing starting `x` coordinates.
///
/// Equality and ordering only look at the endpoint locations: the node ids,
/// role and source way are ignored.
#[derive(Clone, Copy)]
pub struct NodeRefSegment {
    first: NodeRef,
    second: NodeRef,
    role: Role,
    way: WayIdx,
}

impl NodeRefSegment {
    /// Create a new segment.
    ///
    /// The two node references must have different, defined locations.
    pub fn new(nr1: NodeRef, nr2: NodeRef, role: Role, way: WayIdx) -> Self {
        debug_assert!(nr1.location.is_defined() && nr2.location.is_defined());
        debug_assert!(nr1.location != nr2.location, "zero-length segment");
        let (first, second) = if nr1.location < nr2.location {
            (nr1, nr2)
        } else {
            (nr2, nr1)
        };
        NodeRefSegment {
            first,
            second,
            role,
            way,
        }
    }

    /// The endpoint with the smaller location.
    pub fn first(&self) -> &NodeRef {
        &self.first
    }

    /// The endpoint with the larger location.
    pub fn second(&self) -> &NodeRef {
        &self.second
    }

    /// The role of the way this segment came from.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The way that this segment came from.
    pub fn way(&self) -> WayIdx {
        self.way
    }

    /// The smallest fixed-point `x` coordinate on this segment.
    pub fn min_x(&self) -> i32 {
        // Canonical order sorts by x first.
        self.first.location.x()
    }

    /// The largest fixed-point `x` coordinate on this segment.
    pub fn max_x(&self) -> i32 {
        self.second.location.x()
    }

    /// The smallest fixed-point `y` coordinate on this segment.
    pub fn min_y(&self) -> i32 {
        self.first.location.y().min(self.second.location.y())
    }

    /// The largest fixed-point `y` coordinate on this segment.
    pub fn max_y(&self) -> i32 {
        self.first.location.y().max(self.second.location.y())
    }

    /// The bounding box of this segment, in degrees.
    pub fn bounding_box(&self) -> kurbo::Rect {
        kurbo::Rect::from_points(
            self.first.location.to_kurbo(),
            self.second.location.to_kurbo(),
        )
    }

    /// This segment as a `kurbo` line, in degrees.
    pub fn to_kurbo(&self) -> kurbo::Line {
        kurbo::Line::new(
            self.first.location.to_kurbo(),
            self.second.location.to_kurbo(),
        )
    }
}

impl PartialEq for NodeRefSegment {
    fn eq(&self, other: &Self) -> bool {
        self.first.location == other.first.location
            && self.second.location == other.second.location
    }
}

impl Eq for NodeRefSegment {}

impl Ord for NodeRefSegment {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.first.location, self.second.location)
            .cmp(&(other.first.location, other.second.location))
    }
}

impl PartialOrd for NodeRefSegment {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for NodeRefSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}--{:?}[{:?}]", self.first, self.second, self.way)
    }
}

impl std::fmt::Display for NodeRefSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Is `s2` entirely to the right of `s1`?
///
/// If the segments are sorted and `s2` comes after `s1`, then this being true
/// means that every segment after `s2` is also entirely to the right of `s1`.
pub fn outside_x_range(s2: &NodeRefSegment, s1: &NodeRefSegment) -> bool {
    s1.max_x() < s2.min_x()
}

/// Do the (closed) vertical extents of the two segments overlap?
pub fn y_range_overlap(s1: &NodeRefSegment, s2: &NodeRefSegment) -> bool {
    s1.min_y() <= s2.max_y() && s2.min_y() <= s1.max_y()
}

/// Finds where two segments cross.
///
/// Segments that share an endpoint are never considered to intersect, even if
/// they overlap: meeting at a node is fine. Neither are parallel or collinear
/// segments. Otherwise, if the segments touch at all (including an endpoint of
/// one lying on the other) this returns the crossing point.
pub fn calculate_intersection(s1: &NodeRefSegment, s2: &NodeRefSegment) -> Option<Location> {
    let (a0, a1) = (s1.first.location, s1.second.location);
    let (b0, b1) = (s2.first.location, s2.second.location);
    if a0 == b0 || a0 == b1 || a1 == b0 || a1 == b1 {
        return None;
    }
    geom::intersect_segments(a0, a1, b0, b1)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::num::tests::Reasonable;
    use proptest::prelude::*;

    fn nr(id: i64, x: i32, y: i32) -> NodeRef {
        NodeRef::new(id, Location::new(x, y))
    }

    pub(crate) fn seg(x0: i32, y0: i32, x1: i32, y1: i32) -> NodeRefSegment {
        NodeRefSegment::new(nr(1, x0, y0), nr(2, x1, y1), Role::Outer, WayIdx(0))
    }

    impl Reasonable for NodeRefSegment {
        type Strategy = BoxedStrategy<NodeRefSegment>;

        fn reasonable() -> Self::Strategy {
            (Location::reasonable(), Location::reasonable(), 0usize..3)
                .prop_filter("zero-length segment", |(a, b, _)| a != b)
                .prop_map(|(a, b, way)| {
                    NodeRefSegment::new(
                        NodeRef::new(1, a),
                        NodeRef::new(2, b),
                        Role::Outer,
                        WayIdx(way),
                    )
                })
                .boxed()
        }
    }

    #[test]
    fn canonical_orientation() {
        let forward = NodeRefSegment::new(nr(1, 0, 0), nr(2, 5, 1), Role::Inner, WayIdx(0));
        let backward = NodeRefSegment::new(nr(2, 5, 1), nr(1, 0, 0), Role::Outer, WayIdx(1));
        assert_eq!(forward, backward);
        assert_eq!(backward.first().id, 1);
        assert_eq!(backward.second().id, 2);
        assert_eq!(backward.role(), Role::Outer);
        assert_eq!(backward.way(), WayIdx(1));
    }

    #[test]
    fn vertical_segment_orientation() {
        let s = seg(3, 9, 3, -2);
        assert_eq!(s.first().location, Location::new(3, -2));
        assert_eq!(s.min_y(), -2);
        assert_eq!(s.max_y(), 9);
    }

    #[test]
    fn order() {
        let mut segs = vec![
            seg(1, 0, 2, 0),
            seg(0, 1, 5, 5),
            seg(0, 0, 3, 3),
            seg(0, 0, 1, -1),
        ];
        segs.sort();
        assert_eq!(
            segs,
            vec![seg(0, 0, 1, -1), seg(0, 0, 3, 3), seg(0, 1, 5, 5), seg(1, 0, 2, 0)]
        );
    }

    #[test]
    fn ranges() {
        let a = seg(0, 0, 10, 0);
        let b = seg(5, -5, 5, 5);
        let c = seg(11, 0, 12, 3);
        let d = seg(2, 1, 8, 4);
        assert!(!outside_x_range(&b, &a));
        assert!(outside_x_range(&c, &a));
        assert!(!outside_x_range(&seg(10, 0, 12, 3), &a));
        assert!(y_range_overlap(&a, &b));
        assert!(!y_range_overlap(&a, &d));
        assert!(y_range_overlap(&a, &seg(2, 0, 8, 4)));
    }

    #[test]
    fn crossing_segments() {
        let a = seg(0, 0, 10, 0);
        let b = seg(5, -5, 5, 5);
        let p = calculate_intersection(&a, &b).unwrap();
        assert_eq!(p, Location::new(5, 0));
        // `Rect::contains` is half-open, and `a` has zero height.
        let in_box = |r: kurbo::Rect, p: kurbo::Point| {
            (r.x0..=r.x1).contains(&p.x) && (r.y0..=r.y1).contains(&p.y)
        };
        assert!(in_box(a.bounding_box(), p.to_kurbo()));
        assert!(in_box(b.bounding_box(), p.to_kurbo()));
    }

    #[test]
    fn shared_endpoint() {
        assert_eq!(calculate_intersection(&seg(0, 0, 10, 0), &seg(10, 0, 10, 10)), None);
        // Even collinear overlaps are ignored when they share an endpoint.
        assert_eq!(calculate_intersection(&seg(0, 0, 10, 0), &seg(0, 0, 5, 0)), None);
    }

    #[test]
    fn t_junction() {
        let p = calculate_intersection(&seg(0, 0, 10, 0), &seg(3, 0, 3, 8));
        assert_eq!(p, Some(Location::new(3, 0)));
    }

    #[test]
    fn kurbo_conversions() {
        let s = seg(0, 0, 10_000_000, 20_000_000);
        assert_eq!(s.to_kurbo().p1, kurbo::Point::new(1.0, 2.0));
        assert_eq!(s.bounding_box(), kurbo::Rect::new(0.0, 0.0, 1.0, 2.0));
    }

    proptest! {
    #[test]
    fn equal_segments_are_equivalent(s in NodeRefSegment::reasonable(), t in NodeRefSegment::reasonable()) {
        prop_assert_eq!(s == t, s.cmp(&t) == std::cmp::Ordering::Equal);
        prop_assert!(s.min_x() <= s.max_x());
    }
    }
}
