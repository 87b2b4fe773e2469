//! Utilities for fuzz and/or property testing using `arbitrary`.
//!
//! Everything here lives on a small grid, so that the generated data is full of
//! the problems we're looking for: repeated nodes, repeated edges, and crossings.

use arbitrary::Unstructured;

use crate::{ItemType, Location, NodeRef, Relation, RelationMember, Way};

const GRID: i32 = 16;

const ROLES: [&str; 5] = ["outer", "inner", "", "Outer", "subarea"];

/// Generate a location on a small grid, or occasionally an undefined one.
pub fn location(u: &mut Unstructured<'_>) -> Result<Location, arbitrary::Error> {
    if u.ratio(1u8, 32u8)? {
        return Ok(Location::undefined());
    }
    Ok(Location::new(
        u.int_in_range(0..=GRID)?,
        u.int_in_range(0..=GRID)?,
    ))
}

/// Generate a way with the given id.
///
/// Some nodes are repeated from earlier in the way, which gives closed rings,
/// duplicate nodes and doubled-back edges.
pub fn way(id: i64, u: &mut Unstructured<'_>) -> Result<Way, arbitrary::Error> {
    let len: usize = u.int_in_range(0..=12)?;
    let mut nodes: Vec<NodeRef> = Vec::with_capacity(len);
    for i in 0..len {
        let nr = if i > 0 && u.ratio(1u8, 4u8)? {
            nodes[u.int_in_range(0..=i - 1)?]
        } else {
            NodeRef::new(id * 1000 + i as i64, location(u)?)
        };
        nodes.push(nr);
    }
    Ok(Way::new(id, nodes))
}

/// Generate a multipolygon relation, along with its member ways (in order).
///
/// Way ids are distinct. Some members aren't ways, and some roles aren't
/// `inner` or `outer`.
pub fn multipolygon(u: &mut Unstructured<'_>) -> Result<(Relation, Vec<Way>), arbitrary::Error> {
    let way_count: i64 = u.int_in_range(0..=6)?;
    let mut members = Vec::new();
    let mut ways = Vec::new();
    for id in 1..=way_count {
        if u.ratio(1u8, 8u8)? {
            members.push(RelationMember::new(ItemType::Node, id, "label"));
        }
        let role = *u.choose(&ROLES)?;
        let way = way(id, u)?;
        members.push(RelationMember::way(way.id, role));
        ways.push(way);
    }
    Ok((Relation::new(1, members), ways))
}
