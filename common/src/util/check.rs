use crate::tree::core::{NodeRole, SteinerTree};
use std::collections::VecDeque;

/// Verifies that a finished tree is a valid spanning structure: exactly one
/// source, every segment endpoint present in the node set, and a segment set
/// that connects all nodes without cycles.
pub fn run_tree_check(tree: &SteinerTree) -> Result<(), String> {
    log::info!("Starting Steiner Tree Verification...");
    let mut valid = true;

    let num_sources = tree
        .nodes()
        .iter()
        .filter(|n| n.role == NodeRole::Source)
        .count();
    if num_sources != 1 {
        log::error!("FAIL: Expected exactly 1 source node, found {}.", num_sources);
        valid = false;
    }

    for seg in tree.segments() {
        if !tree.node_exists(&seg.first) || !tree.node_exists(&seg.last) {
            log::error!(
                "FAIL: Segment {} references an endpoint missing from the node set.",
                seg.index
            );
            valid = false;
        }
    }

    // A spanning tree over n nodes has exactly n - 1 segments; together with
    // connectivity this rules out cycles.
    let n = tree.num_nodes();
    if n > 0 && tree.num_segments() != n - 1 {
        log::error!(
            "FAIL: {} nodes but {} segments (expected {}).",
            n,
            tree.num_segments(),
            n - 1
        );
        valid = false;
    }

    if n > 0 && !is_connected(tree) {
        log::error!("FAIL: Tree is disconnected.");
        valid = false;
    }

    if valid {
        log::info!("\x1b[32mPASS\x1b[0m: Tree is a valid spanning structure.");
        Ok(())
    } else {
        Err("Steiner tree verification failed.".to_string())
    }
}

fn is_connected(tree: &SteinerTree) -> bool {
    let nodes = tree.nodes();
    if nodes.is_empty() {
        return true;
    }

    let mut seen = vec![false; nodes.len()];
    let mut queue = VecDeque::new();
    seen[0] = true;
    queue.push_back(0usize);
    let mut reached = 1;

    while let Some(i) = queue.pop_front() {
        for seg in tree.node_segments(&nodes[i]) {
            let other = if seg.first == nodes[i] {
                seg.last
            } else {
                seg.first
            };
            if let Some(j) = nodes.iter().position(|n| *n == other) {
                if !seen[j] {
                    seen[j] = true;
                    reached += 1;
                    queue.push_back(j);
                }
            }
        }
    }

    reached == nodes.len()
}
