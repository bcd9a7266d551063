//! Height-derived ambient occlusion.

use rayon::prelude::*;

use crate::geometry::neighbors::{neighbor, wrap_x, OFFSETS_8};
use crate::terrain::HeightField;

/// Central-difference gradient magnitude; columns wrap, rows clamp.
fn central_gradient(heights: &HeightField, x: usize, y: usize) -> f32 {
    let w = heights.width();
    let h = heights.height();
    let east = heights.get(wrap_x(x as i64 + 1, w), y);
    let west = heights.get(wrap_x(x as i64 - 1, w), y);
    let north = heights.get(x, y.saturating_sub(1));
    let south = heights.get(x, (y + 1).min(h - 1));
    let dx = (east - west) * 0.5;
    let dy = (south - north) * 0.5;
    (dx * dx + dy * dy).sqrt()
}

/// Mean positive rise of the eight neighbors over the center.
fn cavity_depth(heights: &HeightField, x: usize, y: usize) -> f32 {
    let w = heights.width();
    let h = heights.height();
    let center = heights.get(x, y);
    let mut rise = 0.0;
    let mut count = 0;
    for &(dx, dy) in &OFFSETS_8 {
        if let Some((nx, ny)) = neighbor(w, h, x, y, dx, dy) {
            rise += (heights.get(nx, ny) - center).max(0.0);
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        rise / count as f32
    }
}

/// Brightness in `[0, 1]` per cell: 1 is fully open sky, 0 fully occluded.
///
/// Blends 60% slope brightness `sqrt(1 - min(1, 0.5·|∇h|))` with 40% open
/// cavity `1 - sqrt(min(1, 2·rise))`.
pub fn ambient_occlusion(heights: &HeightField) -> Vec<f32> {
    let width = heights.width();
    let mut out = vec![0.0f32; heights.len()];
    if width == 0 {
        return out;
    }

    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, v) in row.iter_mut().enumerate() {
            let slope = (1.0 - (central_gradient(heights, x, y) * 0.5).min(1.0)).sqrt();
            let cavity = (cavity_depth(heights, x, y) * 2.0).min(1.0).sqrt();
            *v = (0.6 * slope + 0.4 * (1.0 - cavity)).clamp(0.0, 1.0);
        }
    });
    out
}
