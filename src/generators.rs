//! Utilities for generating examples, benchmarks, and test cases.

use crate::{Location, NodeRef, Relation, RelationMember, Way};

// Everything is in fixed-point units; this makes a square of size 30 about
// 3 meters across.
const UNIT: i32 = 1000;

/// Generate a bunch of squares, arranged in a grid, as closed ways.
///
/// The bottom-left of the first square is at (x0, y0). Each square has size
/// `size x size`, and the distance between squares (both horizontally and
/// vertically) is `offset`. Way ids start at `first_id`.
fn squares(
    (x0, y0): (i32, i32),
    size: i32,
    offset: i32,
    count: usize,
    first_id: i64,
) -> Vec<Way> {
    let mut ret = Vec::new();
    for i in 0..count {
        let x = x0 + i as i32 * offset;
        for j in 0..count {
            let y = y0 + j as i32 * offset;
            let id = first_id + ret.len() as i64;
            let corners = [(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)];
            ret.push(Way::new(
                id,
                corners.iter().enumerate().map(|(k, &(cx, cy))| {
                    NodeRef::new(id * 10 + k as i64, Location::new(cx * UNIT, cy * UNIT))
                }),
            ));
        }
    }

    ret
}

fn relation_of(ways: &[Way], roles: impl Fn(usize) -> &'static str) -> Relation {
    Relation::new(
        1,
        ways.iter()
            .enumerate()
            .map(|(i, w)| RelationMember::way(w.id, roles(i))),
    )
}

/// Generate an `n` by `n` checkerboard-like pattern of overlapping squares.
///
/// There are `n x n` non-overlapping outer squares, and `(n - 1) x (n - 1)`
/// non-overlapping inner squares. Each inner square crosses the four outer
/// squares around it twice, for `8 (n - 1)^2` intersections in all.
pub fn checkerboard(n: usize) -> (Relation, Vec<Way>) {
    let mut ways = squares((0, 0), 30, 40, n, 1);
    let outer_count = ways.len();
    ways.extend(squares(
        (20, 20),
        30,
        40,
        n.saturating_sub(1),
        1 + outer_count as i64,
    ));
    let relation = relation_of(&ways, |i| if i < outer_count { "outer" } else { "inner" });
    (relation, ways)
}

/// Generate an `n` by `n` grid of squares that touch along their edges.
///
/// Every square is its own way, so each shared edge turns into a pair of
/// identical segments from different ways. There are no intersections.
pub fn tiles(n: usize) -> (Relation, Vec<Way>) {
    let ways = squares((0, 0), 10, 10, n, 1);
    let relation = relation_of(&ways, |_| "outer");
    (relation, ways)
}
