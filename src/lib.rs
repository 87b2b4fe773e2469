#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod geom;
pub mod num;
mod osm;
pub mod problem;
mod segment;
mod segment_list;

#[cfg(feature = "generators")]
pub mod generators;

pub use geom::Location;
pub use osm::{ItemType, NodeRef, Relation, RelationMember, Role, Way};
pub use problem::{Problem, ProblemCollector, ProblemReporter};
pub use segment::{
    calculate_intersection, outside_x_range, y_range_overlap, NodeRefSegment, WayIdx,
};
pub use segment_list::{for_each_member, SegmentList};

/// A location couldn't be built from the given coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// At least one of the coordinates was infinite.
    Infinity,
    /// At least one of the coordinates was not a number.
    NaN,
    /// At least one of the coordinates doesn't fit in fixed point.
    OutOfRange,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Infinity => write!(f, "one of the coordinates was infinite"),
            Error::NaN => write!(f, "one of the coordinates was NaN"),
            Error::OutOfRange => write!(f, "one of the coordinates was out of range"),
        }
    }
}

impl std::error::Error for Error {}

/// The counts of problems found by [`check_area`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AreaCheck {
    /// Consecutive nodes sharing a location.
    pub duplicate_nodes: u32,
    /// Pairs of identical segments from the same way.
    pub duplicate_segments: u32,
    /// Crossing segments.
    pub intersections: u32,
}

impl AreaCheck {
    /// Were there no problems at all?
    pub fn is_clean(&self) -> bool {
        *self == AreaCheck::default()
    }
}

/// Runs all the segment-list stages on a multipolygon relation.
///
/// This extracts the segments of `member_ways` (which must line up with the
/// way members of `relation`), sorts them, removes duplicates and looks for
/// crossings. Problems are reported to `reporter`, which is first told that
/// they concern `relation`.
///
/// The returned list is ready for ring assembly.
pub fn check_area<'a>(
    mut reporter: Option<&mut (dyn ProblemReporter + '_)>,
    relation: &Relation,
    member_ways: &[&'a Way],
) -> (SegmentList<'a>, AreaCheck) {
    if let Some(r) = reporter.as_deref_mut() {
        r.set_object(ItemType::Relation, relation.id);
    }
    let mut list = SegmentList::new(false);
    let duplicate_nodes =
        list.extract_segments_from_ways(reporter.as_deref_mut(), relation, member_ways);
    list.sort();
    let duplicate_segments = list.erase_duplicate_segments(reporter.as_deref_mut());
    let intersections = list.find_intersections(reporter.as_deref_mut());
    log::trace!(
        "relation {}: {} segments, {duplicate_nodes} duplicate nodes, \
         {duplicate_segments} duplicate segments, {intersections} intersections",
        relation.id,
        list.len()
    );

    (
        list,
        AreaCheck {
            duplicate_nodes,
            duplicate_segments,
            intersections,
        },
    )
}
