//! Seeded 3D gradient noise.

use glam::DVec3;
use noise::{NoiseFn, Perlin};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A coherent scalar field over R³.
///
/// Implementations must be pure: the same input always yields the same output,
/// and the output stays inside `[-1, 1]`.
pub trait Noise3: Send + Sync {
    /// Samples the field at `(x, y, z)`.
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;

    /// Samples the field at a vector position.
    fn sample_at(&self, p: DVec3) -> f64 {
        self.sample(p.x, p.y, p.z)
    }
}

impl<N: Noise3 + ?Sized> Noise3 for &N {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        (**self).sample(x, y, z)
    }
}

/// Perlin noise keyed by a 64-bit seed.
///
/// `Perlin` takes a 32-bit seed, so the planet seed is folded through a ChaCha8
/// stream first; nearby 64-bit seeds still land on unrelated permutations.
#[derive(Debug, Clone)]
pub struct GradientNoise {
    seed: u64,
    perlin: Perlin,
}

impl GradientNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            perlin: Perlin::new(fold_seed(seed)),
        }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// First 32-bit word of the ChaCha8 stream for `seed`.
pub fn fold_seed(seed: u64) -> u32 {
    ChaCha8Rng::seed_from_u64(seed).next_u32()
}

impl Noise3 for GradientNoise {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin.get([x, y, z]).clamp(-1.0, 1.0)
    }
}
