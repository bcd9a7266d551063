//! Domain warping: offset the sample position by three independent fields.

use glam::DVec3;

use super::Noise3;

/// A noise field whose input is displaced by a vector-valued warp.
///
/// `warped(p) = base(p + amplitude * (wx(p), wy(p), wz(p)))`
#[derive(Clone, Copy)]
pub struct DomainWarp<'a> {
    base: &'a dyn Noise3,
    warp: [&'a dyn Noise3; 3],
    amplitude: f64,
}

impl<'a> DomainWarp<'a> {
    pub fn new(base: &'a dyn Noise3, warp: [&'a dyn Noise3; 3], amplitude: f64) -> Self {
        Self {
            base,
            warp,
            amplitude,
        }
    }

    /// Displaced position for `p`.
    pub fn displace(&self, p: DVec3) -> DVec3 {
        let offset = DVec3::new(
            self.warp[0].sample_at(p),
            self.warp[1].sample_at(p),
            self.warp[2].sample_at(p),
        );
        p + offset * self.amplitude
    }
}

impl Noise3 for DomainWarp<'_> {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.base.sample_at(self.displace(DVec3::new(x, y, z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::GradientNoise;

    #[test]
    fn test_zero_amplitude_matches_base() {
        let base = GradientNoise::new(1);
        let (wx, wy, wz) = (GradientNoise::new(2), GradientNoise::new(3), GradientNoise::new(4));
        let warp = DomainWarp::new(&base, [&wx, &wy, &wz], 0.0);
        let p = DVec3::new(0.3, -0.8, 0.52);
        assert_eq!(warp.sample_at(p), base.sample_at(p));
    }

    #[test]
    fn test_displacement_is_bounded() {
        let base = GradientNoise::new(1);
        let (wx, wy, wz) = (GradientNoise::new(2), GradientNoise::new(3), GradientNoise::new(4));
        let warp = DomainWarp::new(&base, [&wx, &wy, &wz], 0.08);
        let p = DVec3::new(0.61, 0.2, -0.4);
        let moved = warp.displace(p) - p;
        assert!(moved.abs().max_element() <= 0.08 + 1e-12);
    }
}
