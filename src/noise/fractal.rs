//! Multi-octave fractal Brownian motion (fBm) and ridged noise.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::Noise3;

/// Upper bound on `gain` so the `(1 - gain)` normalization never collapses.
const MAX_GAIN: f64 = 0.999;

/// Configuration for multi-octave fractal noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Base frequency applied to the sample position.
    pub scale: f64,
    /// Number of noise octaves.
    pub octaves: u8,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f64,
    /// Amplitude decay per octave. Kept in `[0, 0.999]`.
    pub gain: f64,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a configuration, clamping `gain` into its valid range.
    pub fn new(scale: f64, octaves: u8, lacunarity: f64, gain: f64) -> Self {
        Self {
            scale,
            octaves,
            lacunarity,
            gain: gain.clamp(0.0, MAX_GAIN),
        }
    }

    /// Returns a copy with the base frequency multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            scale: self.scale * factor,
            ..self
        }
    }

    #[inline]
    fn normalization(&self) -> f64 {
        1.0 - self.gain.clamp(0.0, MAX_GAIN)
    }
}

/// Samples fractal Brownian motion at `p`.
///
/// The octave sum is multiplied by `1 - gain`, which keeps the result inside
/// `[-1, 1]` for any octave count.
pub fn fbm<N: Noise3 + ?Sized>(noise: &N, p: DVec3, config: &FractalNoiseConfig) -> f64 {
    let gain = config.gain.clamp(0.0, MAX_GAIN);
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = config.scale;

    for _ in 0..config.octaves {
        sum += amplitude * noise.sample_at(p * frequency);
        frequency *= config.lacunarity;
        amplitude *= gain;
    }

    (sum * config.normalization()).clamp(-1.0, 1.0)
}

/// Samples ridged multifractal noise at `p`.
///
/// Each octave contributes `1 - |n|`, so the result lies in `[0, 1]` with sharp
/// crests where the underlying field crosses zero.
pub fn ridged<N: Noise3 + ?Sized>(noise: &N, p: DVec3, config: &FractalNoiseConfig) -> f64 {
    let gain = config.gain.clamp(0.0, MAX_GAIN);
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = config.scale;

    for _ in 0..config.octaves {
        let n = noise.sample_at(p * frequency);
        sum += amplitude * (1.0 - n.abs());
        frequency *= config.lacunarity;
        amplitude *= gain;
    }

    (sum * config.normalization()).clamp(0.0, 1.0)
}
