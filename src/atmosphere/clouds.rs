//! Three-layer cloud opacity field.

use glam::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::CoordinateCache;
use crate::noise::{fbm, ridged, FractalNoiseConfig, NoiseBank};

const STRATO_SCALE: f64 = 1.5;
const ALTO_SCALE: f64 = 4.0;
const CIRRUS_SCALE: f64 = 8.0;
const DENSITY_THRESHOLD: f64 = 0.3;

/// Cloud coverage coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudParams {
    /// Final opacity multiplier in `[0, 1]`.
    pub coverage: f64,
    /// Domain-warp amplitude for the low cloud layer.
    pub warp: f64,
    /// Edge softness; opacity is raised to `1 / gamma`.
    pub gamma: f64,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            coverage: 0.55,
            warp: 0.25,
            gamma: 2.4,
        }
    }
}

#[inline]
fn unit(v: f64) -> f64 {
    (v + 1.0) * 0.5
}

/// Cloud opacity at one sphere normal, in `[0, 1]`.
///
/// Stratocumulus (warped macro fBm plus billow detail), altocumulus (ridges
/// plus turbulence) and cirrus (fine fBm) are blended 0.6/0.3/0.1, thresholded,
/// gamma-shaped and scaled by coverage.
pub fn cloud_opacity(bank: &NoiseBank, normal: DVec3, params: &CloudParams) -> f32 {
    let warped = bank.cloud_warp(params.warp);
    let base = &bank.cloud;

    let macro_cover = unit(fbm(&warped, normal, &FractalNoiseConfig::new(STRATO_SCALE, 2, 2.0, 0.5)));
    let billow = unit(fbm(base, normal, &FractalNoiseConfig::new(STRATO_SCALE * 2.5, 3, 2.0, 0.6)));
    let strato = macro_cover * 0.7 + billow * 0.3;

    let ridges = ridged(base, normal, &FractalNoiseConfig::new(ALTO_SCALE, 4, 2.0, 0.6));
    let turbulence = unit(fbm(base, normal, &FractalNoiseConfig::new(ALTO_SCALE * 3.0, 2, 2.0, 0.5)));
    let alto = ridges * 0.6 + turbulence * 0.4;

    let cirrus = unit(fbm(base, normal, &FractalNoiseConfig::new(CIRRUS_SCALE, 5, 2.0, 0.5))) * 0.6;

    let density = 0.6 * strato + 0.3 * alto + 0.1 * cirrus;
    let opacity = (density - DENSITY_THRESHOLD).max(0.0) / (1.0 - DENSITY_THRESHOLD);
    let shaped = opacity.powf(1.0 / params.gamma.max(1e-3));
    (shaped * params.coverage).clamp(0.0, 1.0) as f32
}

/// Per-pixel cloud opacity on the equirectangular grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloudField {
    width: usize,
    height: usize,
    alpha: Vec<f32>,
}

impl CloudField {
    /// Samples every pixel, one row per task.
    pub fn generate(cache: &CoordinateCache, bank: &NoiseBank, params: &CloudParams) -> Self {
        let width = cache.width();
        let height = cache.height();
        let mut alpha = vec![0.0f32; width * height];

        if width > 0 {
            alpha.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
                for (a, &normal) in row.iter_mut().zip(cache.row_normals(y)) {
                    *a = cloud_opacity(bank, normal, params);
                }
            });
        }

        tracing::debug!(width, height, coverage = params.coverage, "Generated cloud field");
        Self { width, height, alpha }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn alpha(&self) -> &[f32] {
        &self.alpha
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.alpha[y * self.width + x]
    }

    /// Mean opacity over all pixels.
    pub fn mean_cover(&self) -> f32 {
        if self.alpha.is_empty() {
            return 0.0;
        }
        (self.alpha.iter().map(|&a| a as f64).sum::<f64>() / self.alpha.len() as f64) as f32
    }
}
