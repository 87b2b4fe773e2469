#![no_main]

use libfuzzer_sys::fuzz_target;
use waysegments::{calculate_intersection, Location, NodeRef, NodeRefSegment, Role, WayIdx};

fn segment(p: (i32, i32), q: (i32, i32)) -> Option<NodeRefSegment> {
    let p = Location::new(p.0, p.1);
    let q = Location::new(q.0, q.1);
    if p == q || !p.is_defined() || !q.is_defined() {
        return None;
    }
    Some(NodeRefSegment::new(
        NodeRef::new(1, p),
        NodeRef::new(2, q),
        Role::Outer,
        WayIdx(0),
    ))
}

fuzz_target!(|input: [(i32, i32); 4]| {
    let (Some(s), Some(t)) = (segment(input[0], input[1]), segment(input[2], input[3])) else {
        return;
    };
    let st = calculate_intersection(&s, &t);
    assert_eq!(st.is_some(), calculate_intersection(&t, &s).is_some());
    if let Some(p) = st {
        let (x, y) = (i64::from(p.x()), i64::from(p.y()));
        for seg in [&s, &t] {
            // Rounding can move the point by one unit off the second segment.
            assert!(i64::from(seg.min_x()) - 1 <= x && x <= i64::from(seg.max_x()) + 1);
            assert!(i64::from(seg.min_y()) - 1 <= y && y <= i64::from(seg.max_y()) + 1);
        }
    }
});
