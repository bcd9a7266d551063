//! Emissive layer: city lights on habitable worlds, glowing lava on volcanic ones.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::CoordinateCache;
use crate::noise::Noise3;
use crate::terrain::HeightField;

const CITY_FREQUENCY: f64 = 4.0;
const LAVA_FREQUENCY: f64 = 8.0;
/// Cities cluster around this height above sea level.
const CITY_BAND: f32 = 0.1;
const CITY_FALLOFF: f32 = 5.0;
const CITY_GLOW_EXPONENT: f32 = 0.4;
const CITY_CUTOFF: f32 = 0.01;
const LAVA_CUTOFF: f32 = 0.05;

/// What the emissive layer depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmissiveKind {
    /// Fully transparent layer.
    #[default]
    None,
    /// Warm point lights clustered along low coastal land.
    NightLights,
    /// Ridged glow on terrain above a height threshold.
    Lava,
}

impl EmissiveKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NightLights => "night_lights",
            Self::Lava => "lava",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissiveParams {
    pub kind: EmissiveKind,
    /// Emission multiplier; the result is clamped to `[0, 1]`.
    pub intensity: f64,
    /// Height where lava starts to glow. Kept below 1.
    pub threshold: f64,
}

impl Default for EmissiveParams {
    fn default() -> Self {
        Self {
            kind: EmissiveKind::None,
            intensity: 0.5,
            threshold: 0.3,
        }
    }
}

/// Linear RGBA emission of one pixel; alpha carries the strength.
pub fn emissive_texel(h: f32, pattern_noise: f64, sea_level: f32, params: &EmissiveParams) -> [f32; 4] {
    let intensity = params.intensity.max(0.0) as f32;
    match params.kind {
        EmissiveKind::None => [0.0; 4],
        EmissiveKind::NightLights => {
            if h < sea_level {
                return [0.0; 4];
            }
            let d = h - (sea_level + CITY_BAND);
            let coast = (-d * d * CITY_FALLOFF).exp();
            let pattern = ((pattern_noise as f32 + 1.0) * 0.5).clamp(0.0, 1.0);
            let emission = (coast * pattern * intensity).clamp(0.0, 1.0).powf(CITY_GLOW_EXPONENT);
            if emission <= CITY_CUTOFF {
                return [0.0; 4];
            }
            let tint = pattern - 0.5;
            [
                (1.0 + 0.2 * tint).min(1.0),
                200.0 / 255.0 * (1.0 + 0.1 * tint).min(1.0),
                100.0 / 255.0 * (1.0 - 0.2 * tint).min(1.0),
                emission,
            ]
        }
        EmissiveKind::Lava => {
            let threshold = params.threshold.min(0.99) as f32;
            let ridge = 1.0 - (pattern_noise as f32).abs().min(1.0);
            let elevation = (h - threshold).max(0.0) / (1.0 - threshold);
            let t = (elevation * ridge * intensity).clamp(0.0, 1.0);
            if t <= LAVA_CUTOFF {
                return [0.0; 4];
            }
            [
                ((200.0 + 55.0 * t) / 255.0).min(1.0),
                (100.0 * t / 255.0).min(1.0),
                (50.0 * t * t / 255.0).min(1.0),
                t,
            ]
        }
    }
}

/// Emission for every pixel, sampling `noise` at the sphere normal.
pub fn emissive_map<N: Noise3 + ?Sized>(
    heights: &HeightField,
    cache: &CoordinateCache,
    noise: &N,
    params: &EmissiveParams,
    sea_level: f32,
) -> Vec<[f32; 4]> {
    let width = heights.width();
    let mut out = vec![[0.0f32; 4]; heights.len()];
    if params.kind == EmissiveKind::None || width == 0 {
        return out;
    }
    let frequency = match params.kind {
        EmissiveKind::Lava => LAVA_FREQUENCY,
        _ => CITY_FREQUENCY,
    };

    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let normals = cache.row_normals(y);
        for (x, texel) in row.iter_mut().enumerate() {
            let n = noise.sample_at(normals[x] * frequency);
            *texel = emissive_texel(heights.row(y)[x], n, sea_level, params);
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::GradientNoise;

    fn ramp() -> (HeightField, CoordinateCache) {
        let (w, h) = (32, 16);
        let data = (0..w * h).map(|i| (i % w) as f32 / (w - 1) as f32 * 2.0 - 1.0).collect();
        (
            HeightField::from_vec(w, h, data).unwrap(),
            CoordinateCache::new(w, h).unwrap(),
        )
    }

    fn params(kind: EmissiveKind, intensity: f64) -> EmissiveParams {
        EmissiveParams {
            kind,
            intensity,
            ..EmissiveParams::default()
        }
    }

    #[test]
    fn test_none_is_transparent() {
        let (heights, cache) = ramp();
        let noise = GradientNoise::new(1);
        let map = emissive_map(&heights, &cache, &noise, &EmissiveParams::default(), 0.0);
        assert_eq!(map.len(), heights.len());
        assert!(map.iter().all(|t| *t == [0.0; 4]));
    }

    #[test]
    fn test_channels_in_range() {
        let (heights, cache) = ramp();
        let noise = GradientNoise::new(2);
        for kind in [EmissiveKind::NightLights, EmissiveKind::Lava] {
            for intensity in [0.2, 0.8, 5.0] {
                let map = emissive_map(&heights, &cache, &noise, &params(kind, intensity), 0.02);
                for t in &map {
                    assert!(t.iter().all(|v| (0.0..=1.0).contains(v)), "{} texel {:?}", kind.name(), t);
                }
                assert!(map.iter().any(|t| t[3] > 0.0), "{} never glows", kind.name());
            }
        }
    }

    #[test]
    fn test_city_lights_stay_on_land() {
        for noise in [-1.0, 0.0, 1.0] {
            let t = emissive_texel(-0.2, noise, 0.0, &params(EmissiveKind::NightLights, 1.0));
            assert_eq!(t, [0.0; 4]);
        }
        let lit = emissive_texel(0.1, 1.0, 0.0, &params(EmissiveKind::NightLights, 1.0));
        assert!(lit[3] > 0.9);
        assert!(lit[0] >= lit[1] && lit[1] >= lit[2], "city light should be warm");
    }

    #[test]
    fn test_lava_needs_height() {
        let lava = params(EmissiveKind::Lava, 1.0);
        assert_eq!(emissive_texel(0.2, 0.0, 0.0, &lava), [0.0; 4]);
        let glow = emissive_texel(1.0, 0.0, 0.0, &lava);
        assert!((glow[3] - 1.0).abs() < 1e-6);
        assert!(glow[0] > glow[1] && glow[1] > glow[2]);
        // Field crests (|n| = 1) never glow.
        assert_eq!(emissive_texel(1.0, 1.0, 0.0, &lava), [0.0; 4]);
    }

    #[test]
    fn test_is_deterministic() {
        let (heights, cache) = ramp();
        let p = params(EmissiveKind::Lava, 0.8);
        let a = emissive_map(&heights, &cache, &GradientNoise::new(9), &p, 0.0);
        let b = emissive_map(&heights, &cache, &GradientNoise::new(9), &p, 0.0);
        assert_eq!(a, b);
    }
}
