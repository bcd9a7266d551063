//! River masks from flow accumulation.

use rayon::prelude::*;

use crate::erosion::FlowField;
use crate::geometry::neighbors::wrap_x;

/// Marks cells whose min-max normalized accumulation reaches `threshold`.
///
/// River strength is the normalized accumulation itself; everything below the
/// threshold is zero.
pub fn detect_rivers(flow: &FlowField, threshold: f32) -> Vec<f32> {
    if flow.is_empty() {
        return Vec::new();
    }
    let (min, max) = flow
        .accumulation
        .iter()
        .fold((u32::MAX, 0), |(lo, hi), &a| (lo.min(a), hi.max(a)));
    let span = f64::from(max - min).max(1e-6);

    flow.accumulation
        .par_iter()
        .map(|&a| {
            let normalized = (f64::from(a - min) / span) as f32;
            if normalized >= threshold {
                normalized.min(1.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Box-filters a river mask, wrapping columns and skipping rows past the poles.
///
/// Each output is the mean over the in-grid cells of the window, so pole rows
/// are not darkened by missing samples.
pub fn smooth_rivers(rivers: &[f32], width: usize, height: usize, radius: usize) -> Vec<f32> {
    if radius == 0 || rivers.is_empty() {
        return rivers.to_vec();
    }
    let r = radius as i64;
    let mut out = vec![0.0f32; rivers.len()];
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, value) in row.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            let mut count = 0u32;
            for dy in -r..=r {
                let ny = y as i64 + dy;
                if ny < 0 || ny >= height as i64 {
                    continue;
                }
                let base = ny as usize * width;
                for dx in -r..=r {
                    sum += rivers[base + wrap_x(x as i64 + dx, width)];
                    count += 1;
                }
            }
            *value = sum / count as f32;
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::HeightField;

    #[test]
    fn test_rivers_follow_accumulation() {
        // Tilted plane draining west along every row.
        let data = (0..32).map(|i| (i % 8) as f32 * 0.1).collect();
        let heights = HeightField::from_vec(8, 4, data).unwrap();
        let flow = FlowField::compute(&heights);
        let rivers = detect_rivers(&flow, 0.5);

        assert!(rivers.iter().all(|&r| (0.0..=1.0).contains(&r)));
        assert_eq!(rivers.iter().cloned().fold(0.0, f32::max), 1.0);
        // The uphill edge of the plane never carries a river.
        for y in 0..4 {
            assert_eq!(rivers[y * 8 + 7], 0.0);
        }
    }

    #[test]
    fn test_uniform_accumulation_is_finite() {
        let heights = HeightField::filled(8, 4, 0.0).unwrap();
        let flow = FlowField::compute(&heights);
        let rivers = detect_rivers(&flow, 0.3);
        assert!(rivers.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_smoothing_wraps_across_seam() {
        let mut mask = vec![0.0f32; 8 * 4];
        mask[8] = 1.0;
        let smoothed = smooth_rivers(&mask, 8, 4, 1);
        assert!(smoothed[8 + 7] > 0.0, "smoothing should cross the seam");
        assert!((smoothed[8 + 1] - 1.0 / 9.0).abs() < 1e-6);
        assert_eq!(smooth_rivers(&mask, 8, 4, 0), mask);
    }

    #[test]
    fn test_smoothing_at_pole_uses_valid_cells_only() {
        let mask = vec![1.0f32; 8 * 4];
        let smoothed = smooth_rivers(&mask, 8, 4, 1);
        assert!(smoothed.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }
}
