//! A minimal, read-only model of OSM ways and relations.

use crate::geom::Location;

/// A reference from a way to a node, together with the node's location.
///
/// Node references compare (and sort) by location only. Two references with
/// the same location but different ids are a data problem (a duplicate node),
/// not the same node.
#[derive(Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct NodeRef {
    /// The id of the referenced node.
    pub id: i64,
    /// The resolved location, which is undefined if the node wasn't found.
    pub location: Location,
}

impl NodeRef {
    /// Create a new node reference.
    pub fn new(id: i64, location: Location) -> Self {
        NodeRef { id, location }
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for NodeRef {}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.location.cmp(&other.location)
    }
}

impl PartialOrd for NodeRef {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}{}", self.id, self.location)
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// An ordered list of nodes, describing a line or a ring.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Way {
    /// The way's id.
    pub id: i64,
    /// The way's nodes, in order.
    pub nodes: Vec<NodeRef>,
}

impl Way {
    /// Create a new way.
    pub fn new(id: i64, nodes: impl IntoIterator<Item = NodeRef>) -> Self {
        Way {
            id,
            nodes: nodes.into_iter().collect(),
        }
    }

    /// The number of segments between consecutive nodes of this way.
    pub fn segment_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// The kinds of OSM objects that can be relation members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ItemType {
    /// A node.
    Node,
    /// A way.
    Way,
    /// A relation.
    Relation,
}

impl ItemType {
    /// The one-letter abbreviation of this item type, as used in diagnostics.
    pub fn to_char(self) -> char {
        match self {
            ItemType::Node => 'n',
            ItemType::Way => 'w',
            ItemType::Relation => 'r',
        }
    }
}

/// The part a way plays in a multipolygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Role {
    /// The member has an empty role.
    Empty,
    /// An outer ring.
    Outer,
    /// An inner ring.
    Inner,
    /// Anything else.
    Unknown,
}

impl Role {
    /// Decode a member role string.
    ///
    /// The match is exact and case-sensitive: only `"outer"` and `"inner"`
    /// are recognized, and everything other than the empty string is
    /// [`Role::Unknown`].
    pub fn parse(role: &str) -> Role {
        match role {
            "" => Role::Empty,
            "outer" => Role::Outer,
            "inner" => Role::Inner,
            _ => Role::Unknown,
        }
    }
}

/// A member of a relation.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationMember {
    item_type: ItemType,
    ref_id: i64,
    role: String,
    role_tag: Role,
}

impl RelationMember {
    /// Create a new relation member.
    pub fn new(item_type: ItemType, ref_id: i64, role: impl Into<String>) -> Self {
        let role = role.into();
        let role_tag = Role::parse(&role);
        RelationMember {
            item_type,
            ref_id,
            role,
            role_tag,
        }
    }

    /// Create a new way member.
    pub fn way(ref_id: i64, role: impl Into<String>) -> Self {
        Self::new(ItemType::Way, ref_id, role)
    }

    /// What kind of object this member refers to.
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// The id of the referenced object.
    pub fn ref_id(&self) -> i64 {
        self.ref_id
    }

    /// The role string, exactly as it appears in the data.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The decoded role.
    pub fn role_tag(&self) -> Role {
        self.role_tag
    }
}

/// An ordered list of typed, role-tagged members.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Relation {
    /// The relation's id.
    pub id: i64,
    /// The members, in order.
    pub members: Vec<RelationMember>,
}

impl Relation {
    /// Create a new relation.
    pub fn new(id: i64, members: impl IntoIterator<Item = RelationMember>) -> Self {
        Relation {
            id,
            members: members.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing() {
        assert_eq!(Role::parse(""), Role::Empty);
        assert_eq!(Role::parse("outer"), Role::Outer);
        assert_eq!(Role::parse("inner"), Role::Inner);
        assert_eq!(Role::parse("Outer"), Role::Unknown);
        assert_eq!(Role::parse("outer "), Role::Unknown);
        assert_eq!(Role::parse("subarea"), Role::Unknown);
    }

    #[test]
    fn member_role_is_decoded_once() {
        let m = RelationMember::way(7, "inner");
        assert_eq!(m.role(), "inner");
        assert_eq!(m.role_tag(), Role::Inner);
        assert_eq!(m.item_type(), ItemType::Way);
        assert_eq!(m.ref_id(), 7);
    }

    #[test]
    fn node_refs_compare_by_location() {
        let a = NodeRef::new(1, Location::new(3, 4));
        let b = NodeRef::new(2, Location::new(3, 4));
        let c = NodeRef::new(1, Location::new(3, 5));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }

    #[test]
    fn segment_count() {
        assert_eq!(Way::default().segment_count(), 0);
        let loc = Location::new(0, 0);
        assert_eq!(Way::new(1, [NodeRef::new(1, loc)]).segment_count(), 0);
        assert_eq!(
            Way::new(1, [NodeRef::new(1, loc), NodeRef::new(2, loc)]).segment_count(),
            1
        );
    }
}
