use crate::tree::core::{NodeRole, SteinerTree};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use std::path::Path;

/// Renders a built tree to a PNG for visual inspection: wire segments
/// color-coded per layer, vias as white squares, pins highlighted.
pub fn draw_tree(tree: &SteinerTree, filename: &str, width: u32, height: u32) {
    let mut img = RgbaImage::new(width, height);
    image::imageops::replace(
        &mut img,
        &RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        0,
        0,
    );

    let max_x = tree.nodes().iter().map(|n| n.coord.x).max().unwrap_or(0) + 1;
    let max_y = tree.nodes().iter().map(|n| n.coord.y).max().unwrap_or(0) + 1;

    let margin = 8.0;
    let scale_x = (width as f64 - 2.0 * margin) / max_x as f64;
    let scale_y = (height as f64 - 2.0 * margin) / max_y as f64;

    let map = |x: u32, y: u32| {
        (
            margin + x as f64 * scale_x,
            (height as f64 - margin) - y as f64 * scale_y,
        )
    };

    let colors = [
        // M1 (Vertical): Blue
        Rgba([0, 110, 255, 200]),
        // M2 (Horizontal): Red
        Rgba([255, 20, 80, 200]),
        // M3 (Vertical): Green
        Rgba([0, 255, 100, 200]),
        // M4 (Horizontal): Gold
        Rgba([255, 215, 0, 200]),
        // M5 (Vertical): Violet
        Rgba([180, 50, 255, 200]),
        // M6 (Horizontal): Cyan
        Rgba([0, 240, 255, 200]),
    ];

    let mut segments: Vec<_> = tree.segments().iter().collect();
    segments.sort_by_key(|s| s.first.coord.z.min(s.last.coord.z));

    for seg in segments {
        let (x1, y1) = map(seg.first.coord.x, seg.first.coord.y);
        let (x2, y2) = map(seg.last.coord.x, seg.last.coord.y);

        if seg.is_via() {
            let rect = ImageRect::at(x1 as i32 - 1, y1 as i32 - 1).of_size(3, 3);
            draw_filled_rect_mut(&mut img, rect, Rgba([255, 255, 255, 255]));
        } else {
            let color_idx = (seg.first.coord.z as usize).min(colors.len() - 1);
            draw_line_segment_mut(
                &mut img,
                (x1 as f32, y1 as f32),
                (x2 as f32, y2 as f32),
                colors[color_idx],
            );
        }
    }

    for node in tree.nodes() {
        let (px, py) = map(node.coord.x, node.coord.y);
        let (size, color) = match node.role {
            NodeRole::Source => (4, Rgba([255, 255, 255, 255])),
            NodeRole::Sink => (3, Rgba([220, 220, 220, 255])),
            NodeRole::Steiner => (2, Rgba([120, 120, 120, 255])),
        };
        let rect = ImageRect::at(px as i32 - 1, py as i32 - 1).of_size(size, size);
        draw_filled_rect_mut(&mut img, rect, color);
    }

    let _ = img.save(Path::new(filename));
}
