pub mod algo;

pub use algo::heap::IndexedHeap;
pub use algo::prim::{TreeBuilder, build_steiner_tree, default_edge_cost};

use rayon::prelude::*;
use std::time::Instant;
use steiner_common::error::SteinerError;
use steiner_common::tree::core::{Net, SteinerTree};
use steiner_common::util::check;
use steiner_common::util::config::SteinerConfig;

/// Builds the Steiner tree of every net, in parallel. Each worker thread
/// gets its own [`TreeBuilder`] clone, so heap storage is reused within a
/// worker but never shared between concurrent constructions.
///
/// The outer `Result` covers setup (initial heap allocation); the inner
/// per-net results keep one failed net from discarding the rest.
pub fn build_nets(
    nets: &[Net],
    config: &SteinerConfig,
) -> Result<Vec<Result<SteinerTree, SteinerError>>, SteinerError> {
    log::info!("Building Steiner trees for {} nets...", nets.len());
    let start = Instant::now();

    let template = TreeBuilder::with_capacity(config.initial_capacity)?;
    let cost = default_edge_cost(config.via_cost);

    let results: Vec<Result<SteinerTree, SteinerError>> = nets
        .par_iter()
        .map_with(template, |builder, net| {
            if net.sinks.is_empty() {
                return Err(SteinerError::EmptyNet);
            }
            builder.build(net.source, &net.sinks, cost)
        })
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        log::warn!("{} of {} nets failed to build.", failed, nets.len());
    }

    if config.validate_trees {
        for (net, result) in nets.iter().zip(&results) {
            if let Ok(tree) = result {
                if check::run_tree_check(tree).is_err() {
                    log::error!("Net '{}' produced an invalid tree.", net.name);
                }
            }
        }
    }

    let wirelength: u64 = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|t| t.wirelength())
        .sum();
    log::info!(
        "Built {} trees (Total WL: {}) in {}ms",
        nets.len() - failed,
        wirelength,
        start.elapsed().as_millis()
    );

    Ok(results)
}
