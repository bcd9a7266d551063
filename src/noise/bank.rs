//! Seed-derived set of noise fields used by one planet run.

use super::{DomainWarp, GradientNoise};

/// Every noise field a generation run samples, derived from a single seed.
///
/// Each field gets its own sub-seed so terrain, climate, surface detail and
/// clouds stay decorrelated while remaining fully reproducible.
#[derive(Debug, Clone)]
pub struct NoiseBank {
    seed: u64,
    /// Base terrain field (continents, ridges, detail, slope estimate).
    pub terrain: GradientNoise,
    /// Warp fields for the continental layer.
    pub terrain_warp: [GradientNoise; 3],
    /// Large-scale moisture variation.
    pub moisture: GradientNoise,
    /// High-frequency surface jitter.
    pub detail: GradientNoise,
    /// Low-frequency variation used for volcanic regions.
    pub macro_variation: GradientNoise,
    /// City-light clustering and lava flow pattern.
    pub emissive: GradientNoise,
    /// Cloud density base field.
    pub cloud: GradientNoise,
    /// Warp fields for the cloud layers.
    pub cloud_warp: [GradientNoise; 3],
}

impl NoiseBank {
    pub fn new(seed: u64) -> Self {
        let sub = |salt: u64| GradientNoise::new(seed.wrapping_add(salt));
        let mixed = |salt: u64| GradientNoise::new(seed ^ salt);

        Self {
            seed,
            terrain: sub(0),
            terrain_warp: [sub(1), sub(2), sub(3)],
            moisture: mixed(0x9E37_79B9_7F4A_7C15),
            detail: mixed(0xC2B2_AE3D_27D4_EB4F),
            macro_variation: mixed(0x1656_67B1_9E37_79F9),
            emissive: mixed(0x27D4_EB2F_1656_67C5),
            cloud: mixed(0xD6E8_FEB8_6659_FD93),
            cloud_warp: [sub(11), sub(12), sub(13)],
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Continental base field displaced by the terrain warp fields.
    pub fn continental_warp(&self, amplitude: f64) -> DomainWarp<'_> {
        DomainWarp::new(
            &self.terrain,
            [
                &self.terrain_warp[0],
                &self.terrain_warp[1],
                &self.terrain_warp[2],
            ],
            amplitude,
        )
    }

    /// Cloud base field displaced by the cloud warp fields.
    pub fn cloud_warp(&self, amplitude: f64) -> DomainWarp<'_> {
        DomainWarp::new(
            &self.cloud,
            [&self.cloud_warp[0], &self.cloud_warp[1], &self.cloud_warp[2]],
            amplitude,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::Noise3;

    #[test]
    fn test_fields_are_decorrelated() {
        let bank = NoiseBank::new(42);
        let seeds = [
            bank.terrain.seed(),
            bank.terrain_warp[0].seed(),
            bank.moisture.seed(),
            bank.detail.seed(),
            bank.macro_variation.seed(),
            bank.emissive.seed(),
            bank.cloud.seed(),
            bank.cloud_warp[0].seed(),
        ];
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_bank_is_reproducible() {
        let a = NoiseBank::new(7);
        let b = NoiseBank::new(7);
        let warp_a = a.continental_warp(0.08);
        let warp_b = b.continental_warp(0.08);
        assert_eq!(warp_a.sample(0.1, 0.9, -0.3), warp_b.sample(0.1, 0.9, -0.3));
    }
}
