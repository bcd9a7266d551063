//! Tangent-space normals from the height field.

use rayon::prelude::*;

use crate::geometry::neighbors::wrap_x;
use crate::geometry::CoordinateCache;
use crate::terrain::HeightField;

const MIN_COS_LAT: f64 = 1e-6;

/// Unit tangent-space normal per cell, components in `[-1, 1]`.
///
/// The east-west derivative is divided by `cos(lat)` so that features keep
/// their slope toward the poles, where a pixel spans less ground.
pub fn normal_map(heights: &HeightField, cache: &CoordinateCache) -> Vec<[f32; 3]> {
    let width = heights.width();
    let height = heights.height();
    let mut out = vec![[0.0f32, 0.0, 1.0]; heights.len()];
    if width == 0 {
        return out;
    }

    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let cos = cache.cos_lat(y).max(MIN_COS_LAT);
        let north = y.saturating_sub(1);
        let south = (y + 1).min(height - 1);
        for (x, n) in row.iter_mut().enumerate() {
            let east = heights.get(wrap_x(x as i64 + 1, width), y) as f64;
            let west = heights.get(wrap_x(x as i64 - 1, width), y) as f64;
            let dhdx = (east - west) * 0.5 / cos;
            let dhdy = (heights.get(x, south) - heights.get(x, north)) as f64 * 0.5;
            let v = glam::DVec3::new(-dhdx, -dhdy, 1.0).normalize();
            *n = [v.x as f32, v.y as f32, v.z as f32];
        }
    });
    out
}

/// Packs a normal into the usual `n·0.5 + 0.5` RGB encoding.
#[inline]
pub fn encode_normal(n: [f32; 3]) -> [f32; 3] {
    n.map(|c| (c * 0.5 + 0.5).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_field_points_up() {
        let heights = HeightField::filled(16, 8, 0.3).unwrap();
        let cache = CoordinateCache::new(16, 8).unwrap();
        for n in normal_map(&heights, &cache) {
            assert_eq!(n, [0.0, 0.0, 1.0]);
            assert_eq!(encode_normal(n), [0.5, 0.5, 1.0]);
        }
    }

    #[test]
    fn test_normals_are_unit_and_tilt_downhill() {
        let data = (0..128).map(|i| (i % 16) as f32 * 0.05).collect();
        let heights = HeightField::from_vec(16, 8, data).unwrap();
        let cache = CoordinateCache::new(16, 8).unwrap();
        let normals = normal_map(&heights, &cache);
        for n in &normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
        // Height rises to the east away from the seam, so x tilts west.
        assert!(normals[heights.index(5, 4)][0] < 0.0);
    }

    #[test]
    fn test_polar_rows_are_steeper() {
        let data = (0..128).map(|i| (i % 16) as f32 * 0.05).collect();
        let heights = HeightField::from_vec(16, 8, data).unwrap();
        let cache = CoordinateCache::new(16, 8).unwrap();
        let normals = normal_map(&heights, &cache);
        let equator = normals[heights.index(5, 4)][0].abs();
        let pole = normals[heights.index(5, 0)][0].abs();
        assert!(pole > equator);
    }
}
