//! Heightmap synthesis from layered fractal noise.

use glam::DVec3;
use rayon::prelude::*;

use super::{HeightField, TerrainParams};
use crate::geometry::CoordinateCache;
use crate::noise::{fbm, ridged, FractalNoiseConfig, Noise3, NoiseBank};

const CONTINENT_WEIGHT: f64 = 0.6;
const MOUNTAIN_WEIGHT: f64 = 0.3;
const DETAIL_WEIGHT: f64 = 0.1;
const DETAIL_GAIN: f64 = 0.15;
const SLOPE_DELTA: f64 = 0.01;

/// Finite-difference gradient magnitude of `noise` at `p * scale`.
pub fn estimate_slope<N: Noise3 + ?Sized>(noise: &N, p: DVec3, scale: f64, delta: f64) -> f64 {
    let h0 = noise.sample_at(p * scale);
    let dx = noise.sample_at((p + DVec3::X * delta) * scale) - h0;
    let dy = noise.sample_at((p + DVec3::Y * delta) * scale) - h0;
    let dz = noise.sample_at((p + DVec3::Z * delta) * scale) - h0;
    (dx * dx + dy * dy + dz * dz).sqrt() / delta
}

/// Raw (unnormalized) elevation at a sphere normal.
pub fn sample_elevation(bank: &NoiseBank, normal: DVec3, params: &TerrainParams) -> f64 {
    let scale = params.continent_scale;
    let continental = FractalNoiseConfig::new(scale, 2, 2.0, 0.5);
    let mountains = FractalNoiseConfig::new(scale * 1.5, 4, 2.0, 0.6);
    let detail = FractalNoiseConfig::new(scale * 3.0, 3, 2.0, 0.5);

    let warp = bank.continental_warp(params.warp_amplitude);
    let continent = fbm(&warp, normal, &continental);

    let ridges = ridged(&bank.terrain, normal, &mountains);
    let mountain = ridges * params.mountain_intensity * continent.max(0.0);

    let slope = estimate_slope(&bank.terrain, normal, scale, SLOPE_DELTA);
    let slope_mask = slope.max(0.0).powf(params.detail_slope_power.max(1.0));
    let detail = fbm(&bank.terrain, normal, &detail) * DETAIL_GAIN * slope_mask;

    CONTINENT_WEIGHT * continent + MOUNTAIN_WEIGHT * mountain + DETAIL_WEIGHT * detail
}

/// Fills `heights` with normalized, sea-level-adjusted elevation.
///
/// Rows are synthesized in parallel; each row only reads the shared noise bank
/// and coordinate cache. The result is renormalized to `[-1, 1]` from the
/// realized range, shifted by `sea_level`, then clamped back into `[-1, 1]`.
pub fn generate_heightmap(
    heights: &mut HeightField,
    cache: &CoordinateCache,
    bank: &NoiseBank,
    params: &TerrainParams,
) {
    if heights.is_empty() {
        return;
    }
    let width = heights.width();

    heights
        .data_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (h, &normal) in row.iter_mut().zip(cache.row_normals(y)) {
                *h = sample_elevation(bank, normal, params) as f32;
            }
        });

    heights.normalize();

    let sea_level = params.sea_level;
    heights
        .data_mut()
        .par_iter_mut()
        .for_each(|h| *h = (*h - sea_level).clamp(-1.0, 1.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesize(seed: u64, width: usize, params: &TerrainParams) -> HeightField {
        let height = width / 2;
        let cache = CoordinateCache::new(width, height).unwrap();
        let bank = NoiseBank::new(seed);
        let mut heights = HeightField::new(width, height).unwrap();
        generate_heightmap(&mut heights, &cache, &bank, params);
        heights
    }

    #[test]
    fn test_heightmap_range() {
        let heights = synthesize(42, 64, &TerrainParams::default());
        let (min, max) = heights.range();
        assert!(min >= -1.0 && max <= 1.0, "range ({}, {}) escapes [-1, 1]", min, max);
        assert!(min < max, "Should have height variation");
    }

    #[test]
    fn test_heightmap_reproducibility() {
        let params = TerrainParams::default();
        let a = synthesize(999, 32, &params);
        let b = synthesize(999, 32, &params);
        assert_eq!(a, b, "Same seed should produce identical heights");
    }

    #[test]
    fn test_seeds_change_terrain() {
        let params = TerrainParams::default();
        assert_ne!(synthesize(1, 32, &params), synthesize(2, 32, &params));
    }

    #[test]
    fn test_sea_level_shifts_heights() {
        let low = TerrainParams {
            sea_level: 0.0,
            ..TerrainParams::default()
        };
        let high = TerrainParams {
            sea_level: 0.3,
            ..TerrainParams::default()
        };
        let a = synthesize(5, 32, &low);
        let b = synthesize(5, 32, &high);
        let (_, max_a) = a.range();
        let (_, max_b) = b.range();
        assert!((max_a - 1.0).abs() < 1e-6);
        assert!((max_b - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_estimate_slope_is_non_negative() {
        let bank = NoiseBank::new(3);
        for i in 0..50 {
            let t = i as f64 * 0.12;
            let p = DVec3::new(t.cos(), t.sin(), 0.3).normalize();
            let s = estimate_slope(&bank.terrain, p, 2.2, 0.01);
            assert!(s >= 0.0 && s.is_finite());
        }
    }
}
