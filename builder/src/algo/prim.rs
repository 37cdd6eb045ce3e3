use crate::algo::heap::IndexedHeap;
use steiner_common::error::SteinerError;
use steiner_common::geom::coord::GridCoord;
use steiner_common::tree::core::{Node, Segment, SteinerTree};

const NO_PARENT: u32 = u32::MAX;

/// Default edge cost: rectilinear distance plus a fixed cost per layer
/// crossed. Used when the surrounding router supplies no cost of its own.
pub fn default_edge_cost(via_cost: i64) -> impl Fn(GridCoord, GridCoord) -> i64 + Copy {
    move |a, b| a.manhattan_distance(b) as i64 + a.layer_distance(b) as i64 * via_cost
}

/// Builds the rectilinear Steiner tree for one net with a fresh builder.
/// Callers constructing many trees should reuse a [`TreeBuilder`] instead.
pub fn build_steiner_tree<F>(
    source: GridCoord,
    sinks: &[GridCoord],
    cost: F,
) -> Result<SteinerTree, SteinerError>
where
    F: Fn(GridCoord, GridCoord) -> i64,
{
    TreeBuilder::new().build(source, sinks, cost)
}

/// Reusable Prim driver. Owns the heap and the parent scratch array so that
/// building many nets in sequence stops allocating once the largest net has
/// been seen. Not shareable: each worker thread must clone its own instance
/// (the position map is sized and reset per run).
#[derive(Clone, Debug, Default)]
pub struct TreeBuilder {
    heap: IndexedHeap,
    parents: Vec<u32>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Result<Self, SteinerError> {
        Ok(Self {
            heap: IndexedHeap::with_capacity(n)?,
            parents: Vec::with_capacity(n),
        })
    }

    /// Grows a spanning structure over the source and sinks with Prim's
    /// algorithm, then commits each parent edge as rectilinear segments
    /// (inserting L-bend Steiner points and via legs where needed).
    ///
    /// `cost(a, b)` supplies the key for the candidate edge between two
    /// pins; keys must not be negative for the result to be a minimum tree.
    pub fn build<F>(
        &mut self,
        source: GridCoord,
        sinks: &[GridCoord],
        cost: F,
    ) -> Result<SteinerTree, SteinerError>
    where
        F: Fn(GridCoord, GridCoord) -> i64,
    {
        // Dense point ids: source is 0, deduplicated sinks follow.
        let mut points: Vec<GridCoord> = Vec::with_capacity(sinks.len() + 1);
        points.push(source);
        for &pin in sinks {
            if !points.contains(&pin) {
                points.push(pin);
            }
        }
        let n = points.len();

        let mut tree = SteinerTree::new();
        tree.add_node(Node::source(source));
        for &pin in &points[1..] {
            tree.add_node(Node::sink(pin));
        }

        self.heap.reset(n)?;
        self.parents.clear();
        self.parents.resize(n, NO_PARENT);

        self.heap.insert(0, 0);
        let mut next_index = 0usize;

        while let Some(p) = self.heap.delete_min() {
            let pi = p as usize;
            if self.parents[pi] != NO_PARENT {
                next_index = commit_edge(
                    &mut tree,
                    points[self.parents[pi] as usize],
                    points[pi],
                    next_index,
                );
            }

            // Relax every pin not yet finalized against the new tree point.
            for q in 0..n as u32 {
                if self.heap.is_visited(q) {
                    continue;
                }
                let key = cost(points[pi], points[q as usize]);
                if !self.heap.contains(q) {
                    self.heap.insert(q, key);
                    self.parents[q as usize] = p;
                } else if key < self.heap.key_of(q) {
                    self.heap.decrease_key(q, key);
                    self.parents[q as usize] = p;
                }
            }
        }

        Ok(tree)
    }
}

// Commits the Prim edge (a, b) as one to three rectilinear segments: the
// planar part runs on a's layer (through an L-corner Steiner point when the
// pins share neither row nor column), and a via leg covers any remaining
// layer change. Returns the next free segment index.
fn commit_edge(tree: &mut SteinerTree, a: GridCoord, b: GridCoord, mut index: usize) -> usize {
    let landing = GridCoord::new(b.x, b.y, a.z);

    if landing != a && landing != b {
        tree.add_node(Node::steiner(landing));
    }

    if landing != a {
        if a.x != landing.x && a.y != landing.y {
            let corner = GridCoord::new(b.x, a.y, a.z);
            tree.add_node(Node::steiner(corner));
            index = push_segment(tree, a, corner, index);
            index = push_segment(tree, corner, landing, index);
        } else {
            index = push_segment(tree, a, landing, index);
        }
    }

    if landing != b {
        index = push_segment(tree, landing, b, index);
    }

    index
}

fn push_segment(tree: &mut SteinerTree, from: GridCoord, to: GridCoord, index: usize) -> usize {
    // Trunk sharing: when two edges route through the same corner, the leg
    // up to it already exists. Adding it again would close a cycle, so the
    // existing path is reused instead.
    if connected(tree, from, to) {
        return index;
    }

    // Endpoints resolve to the stored nodes so segment endpoints carry the
    // roles already recorded in the tree.
    let first = tree.node_at(from).copied().unwrap_or(Node::steiner(from));
    let last = tree.node_at(to).copied().unwrap_or(Node::steiner(to));
    tree.add_segment(Segment::new(first, last, index));
    index + 1
}

// True when the two coordinates are already joined by committed segments.
fn connected(tree: &SteinerTree, from: GridCoord, to: GridCoord) -> bool {
    if from == to {
        return true;
    }

    let mut stack = vec![from];
    let mut seen = vec![from];
    while let Some(c) = stack.pop() {
        let node = match tree.node_at(c) {
            Some(n) => *n,
            None => continue,
        };
        for seg in tree.node_segments(&node) {
            let other = if seg.first.coord == c {
                seg.last.coord
            } else {
                seg.first.coord
            };
            if other == to {
                return true;
            }
            if !seen.contains(&other) {
                seen.push(other);
                stack.push(other);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use steiner_common::tree::core::NodeRole;
    use steiner_common::util::check::run_tree_check;

    fn c(x: u32, y: u32, z: u8) -> GridCoord {
        GridCoord::new(x, y, z)
    }

    #[test]
    fn three_pin_l0_scenario() {
        let source = c(0, 0, 0);
        let a = c(2, 0, 0);
        let b = c(0, 2, 0);

        let tree = build_steiner_tree(source, &[a, b], default_edge_cost(10)).unwrap();

        assert_eq!(tree.num_nodes(), 3);
        assert_eq!(tree.num_segments(), 2);
        assert_eq!(tree.wirelength(), 4);
        assert_eq!(tree.source().unwrap().coord, source);

        let sinks: Vec<GridCoord> = tree.sinks().iter().map(|n| n.coord).collect();
        assert_eq!(sinks, vec![a, b]);

        assert!(run_tree_check(&tree).is_ok());
    }

    #[test]
    fn bent_edge_gets_steiner_corner() {
        let source = c(0, 0, 0);
        let sink = c(3, 2, 0);

        let tree = build_steiner_tree(source, &[sink], default_edge_cost(10)).unwrap();

        assert_eq!(tree.num_nodes(), 3);
        assert_eq!(tree.num_segments(), 2);
        assert_eq!(tree.wirelength(), 5);

        let corner = tree.node_at(c(3, 0, 0)).unwrap();
        assert_eq!(corner.role, NodeRole::Steiner);
        assert_eq!(tree.node_segments(corner).len(), 2);

        assert!(run_tree_check(&tree).is_ok());
    }

    #[test]
    fn cross_layer_edge_gets_via_leg() {
        let source = c(0, 0, 0);
        let sink = c(4, 0, 2);

        let tree = build_steiner_tree(source, &[sink], default_edge_cost(10)).unwrap();

        // Planar run on the source layer, then a via stack up to the sink.
        assert_eq!(tree.num_segments(), 2);
        let landing = tree.node_at(c(4, 0, 0)).unwrap();
        assert_eq!(landing.role, NodeRole::Steiner);

        let via = tree
            .segments()
            .iter()
            .find(|s| s.is_via())
            .expect("via segment");
        assert_eq!(via.length(), 0);

        assert!(run_tree_check(&tree).is_ok());
    }

    #[test]
    fn stacked_pins_connect_with_single_via() {
        let source = c(5, 5, 0);
        let sink = c(5, 5, 3);

        let tree = build_steiner_tree(source, &[sink], default_edge_cost(10)).unwrap();
        assert_eq!(tree.num_nodes(), 2);
        assert_eq!(tree.num_segments(), 1);
        assert!(tree.segments()[0].is_via());
        assert_eq!(tree.wirelength(), 0);
    }

    #[test]
    fn duplicate_pins_collapse() {
        let source = c(0, 0, 0);
        let a = c(3, 0, 0);

        let tree = build_steiner_tree(source, &[a, a, source], default_edge_cost(10)).unwrap();
        assert_eq!(tree.num_nodes(), 2);
        assert_eq!(tree.num_segments(), 1);
    }

    #[test]
    fn source_only_net_is_trivial() {
        let tree = build_steiner_tree(c(1, 1, 0), &[], default_edge_cost(10)).unwrap();
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.num_segments(), 0);
        assert!(tree.source().is_ok());
    }

    #[test]
    fn segment_indices_count_up_in_commit_order() {
        let source = c(0, 0, 0);
        let sinks = [c(3, 2, 0), c(6, 0, 1)];

        let tree = build_steiner_tree(source, &sinks, default_edge_cost(10)).unwrap();
        for (expected, seg) in tree.segments().iter().enumerate() {
            assert_eq!(seg.index, expected);
        }
        assert!(tree.segment_by_index(tree.num_segments()).is_none());
    }

    #[test]
    fn custom_cost_reshapes_tree() {
        // Chain: source -- a -- b along x. With Manhattan costs b attaches
        // to a, not to the source.
        let source = c(0, 0, 0);
        let a = c(5, 0, 0);
        let b = c(9, 0, 0);

        let tree = build_steiner_tree(source, &[a, b], default_edge_cost(10)).unwrap();
        assert_eq!(tree.wirelength(), 9);
        let at_a = tree.node_segments(tree.node_at(a).unwrap());
        assert_eq!(at_a.len(), 2);

        // A cost that ranks every pair equally lets b attach to the source
        // directly instead.
        let flat = build_steiner_tree(source, &[a, b], |_, _| 1).unwrap();
        assert!(run_tree_check(&flat).is_ok());
        assert_eq!(flat.num_segments(), 2);
    }

    #[test]
    fn builder_reuse_across_nets() {
        let mut builder = TreeBuilder::with_capacity(4).unwrap();

        let big = builder
            .build(c(0, 0, 0), &[c(8, 0, 0), c(0, 8, 0), c(8, 8, 0)], default_edge_cost(10))
            .unwrap();
        assert!(run_tree_check(&big).is_ok());

        // A smaller net right after must see none of the previous run.
        let small = builder
            .build(c(1, 1, 0), &[c(1, 4, 0)], default_edge_cost(10))
            .unwrap();
        assert_eq!(small.num_nodes(), 2);
        assert_eq!(small.num_segments(), 1);
        assert_eq!(small.wirelength(), 3);
        assert!(run_tree_check(&small).is_ok());
    }

    #[test]
    fn edges_sharing_a_corner_share_the_trunk() {
        // Both sinks bend through (2, 5, 0); the leg from the source to the
        // corner must be committed once and reused, not duplicated.
        let source = c(0, 5, 0);
        let tree =
            build_steiner_tree(source, &[c(2, 1, 0), c(2, 9, 0)], default_edge_cost(10)).unwrap();

        assert_eq!(tree.num_nodes(), 4);
        assert_eq!(tree.num_segments(), 3);
        assert_eq!(tree.wirelength(), 10);

        let corner = tree.node_at(c(2, 5, 0)).unwrap();
        assert_eq!(corner.role, NodeRole::Steiner);
        assert_eq!(tree.node_segments(corner).len(), 3);

        assert!(run_tree_check(&tree).is_ok());
    }

    #[test]
    fn spanning_invariant_on_larger_net() {
        let source = c(10, 10, 0);
        let sinks = [
            c(0, 0, 0),
            c(20, 0, 1),
            c(0, 20, 0),
            c(20, 20, 1),
            c(10, 0, 0),
            c(3, 17, 2),
        ];

        let tree = build_steiner_tree(source, &sinks, default_edge_cost(10)).unwrap();
        assert!(run_tree_check(&tree).is_ok());
        assert_eq!(tree.sinks().len(), sinks.len());
        // Spanning over n nodes takes n - 1 segments, bends included.
        assert_eq!(tree.num_segments(), tree.num_nodes() - 1);
    }
}
