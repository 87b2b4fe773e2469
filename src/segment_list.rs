//! The list of segments that an area gets assembled from.

use std::collections::HashMap;

use crate::{
    osm::{ItemType, NodeRef, Relation, RelationMember, Role, Way},
    problem::ProblemReporter,
    segment::{
        calculate_intersection, outside_x_range, y_range_overlap, NodeRefSegment, WayIdx, WayVec,
    },
};

/// Walks the members of `relation` together with `ways`, calling `f` for each
/// way member and its way.
///
/// `ways` must contain exactly one way for each way member of `relation`, in
/// order. Non-way members are skipped.
///
/// # Panics
///
/// Panics if the number of ways doesn't match the number of way members.
pub fn for_each_member<'a>(
    relation: &Relation,
    ways: &[&'a Way],
    mut f: impl FnMut(&RelationMember, &'a Way),
) {
    let mut ways = ways.iter();
    for member in relation
        .members
        .iter()
        .filter(|m| m.item_type() == ItemType::Way)
    {
        let Some(way) = ways.next() else {
            panic!(
                "relation {} has more way members than ways were supplied",
                relation.id
            );
        };
        f(member, way);
    }
    assert!(
        ways.next().is_none(),
        "relation {} has fewer way members than ways were supplied",
        relation.id
    );
}

/// A list of segments, extracted from a way or from the member ways of a
/// multipolygon relation.
///
/// The intended use goes in stages: extract segments (with
/// [`extract_segments_from_way`](SegmentList::extract_segments_from_way) or
/// [`extract_segments_from_ways`](SegmentList::extract_segments_from_ways)),
/// then [`sort`](SegmentList::sort), then
/// [`erase_duplicate_segments`](SegmentList::erase_duplicate_segments), and
/// then [`find_intersections`](SegmentList::find_intersections). After that
/// the segments are ready to be assembled into rings.
///
/// The list borrows the ways it was built from, so they can't change while
/// it's alive.
pub struct SegmentList<'a> {
    segments: Vec<NodeRefSegment>,
    ways: WayVec<&'a Way>,
    // Keyed by the address of the way.
    way_indices: HashMap<usize, WayIdx>,
    debug: bool,
}

impl<'a> SegmentList<'a> {
    /// Creates an empty segment list.
    ///
    /// If `debug` is true, the list logs (at debug level) every duplicate
    /// segment it removes and every intersection it finds.
    pub fn new(debug: bool) -> Self {
        SegmentList {
            segments: Vec::new(),
            ways: WayVec::default(),
            way_indices: HashMap::new(),
            debug,
        }
    }

    /// Turns debug logging on or off.
    pub fn enable_debug_output(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// The number of segments in the list.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Is the list empty?
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates over the segments, in their current order.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeRefSegment> {
        self.segments.iter()
    }

    /// The segments, in their current order.
    pub fn as_slice(&self) -> &[NodeRefSegment] {
        &self.segments
    }

    /// The first segment.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn front(&self) -> &NodeRefSegment {
        assert!(!self.is_empty(), "front() of an empty segment list");
        &self.segments[0]
    }

    /// The first segment, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn front_mut(&mut self) -> &mut NodeRefSegment {
        assert!(!self.is_empty(), "front_mut() of an empty segment list");
        &mut self.segments[0]
    }

    /// The last segment.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn back(&self) -> &NodeRefSegment {
        assert!(!self.is_empty(), "back() of an empty segment list");
        &self.segments[self.segments.len() - 1]
    }

    /// The last segment, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn back_mut(&mut self) -> &mut NodeRefSegment {
        assert!(!self.is_empty(), "back_mut() of an empty segment list");
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    /// The way that segments with index `idx` came from.
    pub fn way(&self, idx: WayIdx) -> &'a Way {
        self.ways[idx]
    }

    /// All the ways that segments were extracted from.
    pub fn ways(&self) -> impl Iterator<Item = (WayIdx, &'a Way)> + '_ {
        self.ways.iter().map(|(idx, way)| (idx, *way))
    }

    // Ways are told apart by address, not by id: the same way listed twice in
    // a relation gets one index, but two distinct ways sharing an id don't.
    // The borrow keeps every registered address alive and unique.
    fn register_way(&mut self, way: &'a Way) -> WayIdx {
        let ways = &mut self.ways;
        *self
            .way_indices
            .entry(way as *const Way as usize)
            .or_insert_with(|| ways.push(way))
    }

    fn extract_segments_from_way_impl(
        &mut self,
        reporter: &mut Option<&mut (dyn ProblemReporter + '_)>,
        way: &'a Way,
        role: Role,
    ) -> u32 {
        let way_idx = self.register_way(way);
        let mut duplicate_nodes = 0;

        for pair in way.nodes.windows(2) {
            let (prev, nr): (&NodeRef, &NodeRef) = (&pair[0], &pair[1]);
            if !prev.location.is_defined() || !nr.location.is_defined() {
                continue;
            }
            if prev.location != nr.location {
                self.segments
                    .push(NodeRefSegment::new(*prev, *nr, role, way_idx));
            } else {
                duplicate_nodes += 1;
                if let Some(r) = reporter.as_deref_mut() {
                    r.report_duplicate_node(prev.id, nr.id, nr.location);
                }
            }
        }

        duplicate_nodes
    }

    /// Extracts the segments of a single way, and adds them to the list.
    ///
    /// The segments get the [`Role::Outer`] role. Consecutive nodes with the
    /// same location don't make a segment; they are counted and reported as
    /// duplicate nodes. Nodes with undefined locations are skipped, along with
    /// both of the segments touching them.
    ///
    /// Returns the number of duplicate nodes.
    pub fn extract_segments_from_way(
        &mut self,
        mut reporter: Option<&mut (dyn ProblemReporter + '_)>,
        way: &'a Way,
    ) -> u32 {
        if way.nodes.is_empty() {
            return 0;
        }
        self.segments.reserve(way.segment_count());
        self.extract_segments_from_way_impl(&mut reporter, way, Role::Outer)
    }

    /// Extracts the segments of all the member ways of a multipolygon
    /// relation, and adds them to the list.
    ///
    /// `member_ways` must hold the ways of the relation's way members, in
    /// the same order as they appear in the relation. Each segment gets the
    /// role of its way's membership.
    ///
    /// The reporter is told the total number of segments before anything
    /// else happens. Returns the number of duplicate nodes.
    ///
    /// # Panics
    ///
    /// Panics if `member_ways` doesn't line up with the relation's way members.
    pub fn extract_segments_from_ways(
        &mut self,
        mut reporter: Option<&mut (dyn ProblemReporter + '_)>,
        relation: &Relation,
        member_ways: &[&'a Way],
    ) -> u32 {
        assert!(
            relation.members.len() >= member_ways.len(),
            "relation {} has {} members, but {} ways were supplied",
            relation.id,
            relation.members.len(),
            member_ways.len()
        );

        let num_segments: usize = member_ways.iter().map(|w| w.segment_count()).sum();
        if let Some(r) = reporter.as_deref_mut() {
            r.set_nodes(num_segments);
        }
        self.segments.reserve(num_segments);

        let mut duplicate_nodes = 0;
        for_each_member(relation, member_ways, |member, way| {
            duplicate_nodes +=
                self.extract_segments_from_way_impl(&mut reporter, way, member.role_tag());
        });

        duplicate_nodes
    }

    /// Sorts the segments into their canonical order.
    ///
    /// Sorting is stable, so sorting twice is the same as sorting once.
    pub fn sort(&mut self) {
        self.segments.sort();
    }

    /// Removes pairs of identical segments.
    ///
    /// The list must be sorted. Duplicates are always removed in pairs: of
    /// three identical segments, two are removed and one is kept. Afterwards,
    /// no two segments in the list are equal.
    ///
    /// A removed pair only counts as a problem (and is reported) if both
    /// segments came from the same way. Identical segments from different
    /// ways are fine: they happen whenever two rings touch along an edge.
    ///
    /// Returns the number of pairs that were counted as problems.
    pub fn erase_duplicate_segments(
        &mut self,
        mut reporter: Option<&mut (dyn ProblemReporter + '_)>,
    ) -> u32 {
        let mut duplicate_segments = 0;

        let mut pos = 0;
        while pos + 1 < self.segments.len() {
            let (s1, s2) = (&self.segments[pos], &self.segments[pos + 1]);
            if s1 != s2 {
                pos += 1;
                continue;
            }

            if self.debug {
                log::debug!("erase duplicate segment: {s1}");
            }
            if s1.way() == s2.way() {
                duplicate_segments += 1;
                if let Some(r) = reporter.as_deref_mut() {
                    r.report_duplicate_segment(s1.first(), s1.second());
                }
            }
            // Because the list is sorted, the segment before `pos` can't be
            // equal to the one that moves into `pos`, so we don't go back.
            self.segments.drain(pos..pos + 2);
        }

        duplicate_segments
    }

    /// Finds the crossings between segments.
    ///
    /// The list must be sorted, and free of duplicates. Segments meeting only
    /// at a shared endpoint don't count as crossing.
    ///
    /// Returns the number of crossings.
    pub fn find_intersections(
        &self,
        mut reporter: Option<&mut (dyn ProblemReporter + '_)>,
    ) -> u32 {
        #[cfg(feature = "slow-asserts")]
        self.check_invariants();

        let mut found_intersections = 0;

        for (i, s1) in self.segments.iter().enumerate() {
            for s2 in &self.segments[i + 1..] {
                debug_assert!(s1 != s2, "duplicate segments {s1} and {s2}");

                // All the following segments start even further to the right.
                if outside_x_range(s2, s1) {
                    break;
                }

                if !y_range_overlap(s1, s2) {
                    continue;
                }

                let Some(intersection) = calculate_intersection(s1, s2) else {
                    continue;
                };
                found_intersections += 1;
                if self.debug {
                    log::debug!("segments {s1} and {s2} intersecting at {intersection}");
                }
                if let Some(r) = reporter.as_deref_mut() {
                    r.report_intersection(
                        self.way(s1.way()).id,
                        s1.first().location,
                        s1.second().location,
                        self.way(s2.way()).id,
                        s2.first().location,
                        s2.second().location,
                        intersection,
                    );
                }
            }
        }

        found_intersections
    }

    /// Checks that the list is sorted and has no duplicates.
    ///
    /// # Panics
    ///
    /// Panics if it isn't.
    #[cfg(any(test, feature = "slow-asserts"))]
    pub fn check_invariants(&self) {
        for pair in self.segments.windows(2) {
            assert!(
                pair[0] < pair[1],
                "segments out of order: {} and {}",
                pair[0],
                pair[1]
            );
        }
    }

    /// Draws the segments into an SVG document, for debugging.
    ///
    /// Latitude increases upward. Each way gets its own color, and crossings
    /// are marked with red circles.
    #[cfg(feature = "debug-svg")]
    pub fn dump_svg(&self) -> svg::Document {
        use svg::node::element::{Circle, Line};

        const COLORS: [&str; 6] = ["black", "blue", "green", "orange", "purple", "brown"];

        let bbox = self
            .segments
            .iter()
            .map(NodeRefSegment::bounding_box)
            .reduce(|a, b| a.union(b))
            .unwrap_or(kurbo::Rect::ZERO);
        let stroke_width = (bbox.width().max(bbox.height()) / 500.0).max(1e-7);
        let margin = 10.0 * stroke_width;
        // Flip vertically, so north is up.
        let flip = |p: kurbo::Point| (p.x, bbox.y0 + bbox.y1 - p.y);

        let mut document = svg::Document::new().set(
            "viewBox",
            (
                bbox.x0 - margin,
                bbox.y0 - margin,
                bbox.width() + 2.0 * margin,
                bbox.height() + 2.0 * margin,
            ),
        );

        for seg in &self.segments {
            let line = seg.to_kurbo();
            let (x1, y1) = flip(line.p0);
            let (x2, y2) = flip(line.p1);
            document = document.add(
                Line::new()
                    .set("x1", x1)
                    .set("y1", y1)
                    .set("x2", x2)
                    .set("y2", y2)
                    .set("stroke", COLORS[seg.way().0 % COLORS.len()])
                    .set("stroke-width", stroke_width),
            );
        }

        for (i, s1) in self.segments.iter().enumerate() {
            for s2 in &self.segments[i + 1..] {
                if outside_x_range(s2, s1) {
                    break;
                }
                if let Some(p) = calculate_intersection(s1, s2) {
                    let (cx, cy) = flip(p.to_kurbo());
                    document = document.add(
                        Circle::new()
                            .set("cx", cx)
                            .set("cy", cy)
                            .set("r", 3.0 * stroke_width)
                            .set("fill", "red"),
                    );
                }
            }
        }

        document
    }
}

impl std::fmt::Debug for SegmentList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.segments.iter()).finish()
    }
}

impl std::ops::Index<usize> for SegmentList<'_> {
    type Output = NodeRefSegment;

    fn index(&self, index: usize) -> &Self::Output {
        &self.segments[index]
    }
}

impl std::ops::IndexMut<usize> for SegmentList<'_> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.segments[index]
    }
}

impl<'s> IntoIterator for &'s SegmentList<'_> {
    type Item = &'s NodeRefSegment;
    type IntoIter = std::slice::Iter<'s, NodeRefSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
