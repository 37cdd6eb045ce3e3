use crate::error::SteinerError;
use crate::geom::coord::GridCoord;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    Source,
    Sink,
    Steiner,
}

/// A point of the tree: a pin or an inserted bend/junction.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub coord: GridCoord,
    pub role: NodeRole,
}

impl Node {
    pub fn new(coord: GridCoord, role: NodeRole) -> Self {
        Self { coord, role }
    }

    pub fn source(coord: GridCoord) -> Self {
        Self::new(coord, NodeRole::Source)
    }

    pub fn sink(coord: GridCoord) -> Self {
        Self::new(coord, NodeRole::Sink)
    }

    pub fn steiner(coord: GridCoord) -> Self {
        Self::new(coord, NodeRole::Steiner)
    }
}

// Node identity is the coordinate (position + layer) alone. The role is
// mutable state, not identity.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}

/// An undirected tree edge between two nodes. `index` is assigned by the
/// driver in commit order and only used for external lookup.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub first: Node,
    pub last: Node,
    pub index: usize,
}

impl Segment {
    pub fn new(first: Node, last: Node, index: usize) -> Self {
        Self { first, last, index }
    }

    /// Undirected endpoint equality: (a, b) and (b, a) are the same wire.
    pub fn same_endpoints(&self, other: &Segment) -> bool {
        (self.first == other.first && self.last == other.last)
            || (self.first == other.last && self.last == other.first)
    }

    pub fn touches(&self, node: &Node) -> bool {
        self.first == *node || self.last == *node
    }

    pub fn is_via(&self) -> bool {
        self.first.coord.x == self.last.coord.x
            && self.first.coord.y == self.last.coord.y
            && self.first.coord.z != self.last.coord.z
    }

    /// Rectilinear length in the routing plane; zero for a via.
    pub fn length(&self) -> u32 {
        self.first.coord.manhattan_distance(self.last.coord)
    }
}

/// A named pin list for one net, the input to tree construction.
#[derive(Clone, Debug)]
pub struct Net {
    pub name: String,
    pub source: GridCoord,
    pub sinks: Vec<GridCoord>,
}

/// The rectilinear Steiner tree of a single net: pins, inserted Steiner
/// points, and the committed wire segments connecting them.
///
/// The collections are filled by the construction driver and read-only
/// afterwards. Lookups are linear scans; per-net entity counts stay small
/// (pins plus a few bends), so no index structure is kept.
#[derive(Clone, Debug, Default)]
pub struct SteinerTree {
    nodes: Vec<Node>,
    segments: Vec<Segment>,
}

impl SteinerTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the node if no equal node exists. An already-present node may
    /// only be promoted to Source; it is never downgraded.
    pub fn add_node(&mut self, node: Node) {
        match self.nodes.iter_mut().find(|n| **n == node) {
            None => self.nodes.push(node),
            Some(existing) => {
                if node.role == NodeRole::Source {
                    existing.role = NodeRole::Source;
                }
            }
        }
    }

    /// Appends the segment unless an undirected duplicate is already stored.
    pub fn add_segment(&mut self, segment: Segment) {
        if self.segments.iter().any(|s| s.same_endpoints(&segment)) {
            return;
        }
        self.segments.push(segment);
    }

    pub fn node_exists(&self, node: &Node) -> bool {
        self.nodes.iter().any(|n| n == node)
    }

    pub fn find_node(&self, node: &Node) -> Option<&Node> {
        self.nodes.iter().find(|n| *n == node)
    }

    pub fn node_at(&self, coord: GridCoord) -> Option<&Node> {
        self.nodes.iter().find(|n| n.coord == coord)
    }

    /// All segments incident to the node, in insertion order.
    pub fn node_segments(&self, node: &Node) -> Vec<Segment> {
        self.segments
            .iter()
            .filter(|s| s.touches(node))
            .copied()
            .collect()
    }

    pub fn source(&self) -> Result<&Node, SteinerError> {
        self.nodes
            .iter()
            .find(|n| n.role == NodeRole::Source)
            .ok_or(SteinerError::MissingSource)
    }

    /// All sink nodes, in insertion order.
    pub fn sinks(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.role == NodeRole::Sink)
            .collect()
    }

    pub fn segment_by_index(&self, index: usize) -> Option<&Segment> {
        self.segments.iter().find(|s| s.index == index)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Total rectilinear wirelength over all segments.
    pub fn wirelength(&self) -> u64 {
        self.segments.iter().map(|s| s.length() as u64).sum()
    }
}

// Debug dump: one line per segment, endpoint triples (x, y, layer).
impl fmt::Display for SteinerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.segments {
            writeln!(f, "{}; {}", seg.first.coord, seg.last.coord)?;
        }
        Ok(())
    }
}
