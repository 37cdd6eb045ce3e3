use crate::geom::coord::GridCoord;
use crate::tree::core::Net;
use rand::Rng;

/// Generates a random net on a `grid_w` x `grid_h` routing grid with pins
/// spread over `layers` layers. Duplicate pin locations are re-rolled so the
/// net has exactly `num_sinks` distinct sinks.
pub fn generate_random_net(
    name: &str,
    num_sinks: usize,
    grid_w: u32,
    grid_h: u32,
    layers: u8,
) -> Net {
    let mut rng = rand::thread_rng();
    let layers = layers.max(1);

    let source = GridCoord::new(
        rng.gen_range(0..grid_w),
        rng.gen_range(0..grid_h),
        rng.gen_range(0..layers),
    );

    let mut sinks: Vec<GridCoord> = Vec::with_capacity(num_sinks);
    while sinks.len() < num_sinks {
        let pin = GridCoord::new(
            rng.gen_range(0..grid_w),
            rng.gen_range(0..grid_h),
            rng.gen_range(0..layers),
        );
        if pin != source && !sinks.contains(&pin) {
            sinks.push(pin);
        }
    }

    Net {
        name: name.to_string(),
        source,
        sinks,
    }
}

pub fn generate_random_nets(
    count: usize,
    max_sinks: usize,
    grid_w: u32,
    grid_h: u32,
    layers: u8,
) -> Vec<Net> {
    log::info!(
        "Generating {} random nets (Grid: {}x{}x{}, Max sinks: {})...",
        count,
        grid_w,
        grid_h,
        layers,
        max_sinks
    );

    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let sinks = rng.gen_range(1..=max_sinks.max(1));
            generate_random_net(&format!("net{}", i), sinks, grid_w, grid_h, layers)
        })
        .collect()
}
