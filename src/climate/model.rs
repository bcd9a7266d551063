//! Per-pixel temperature, moisture and humidity.

use glam::DVec3;

use super::ClimateParams;
use crate::noise::Noise3;

/// Climate values at one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    /// Dimensionless temperature in `[-1, 1]`.
    pub temperature: f64,
    /// Moisture in `[0, 1]`.
    pub moisture: f64,
    /// Moisture scaled down in hot regions, in `[0, 1]`.
    pub humidity: f64,
}

impl ClimateSample {
    /// Temperature remapped to `[0, 1]`.
    pub fn normalized_temperature(&self) -> f64 {
        ((self.temperature + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// Temperature and moisture model bound to an explicit moisture noise field.
#[derive(Clone, Copy)]
pub struct ClimateModel<'a> {
    moisture_noise: &'a dyn Noise3,
    params: &'a ClimateParams,
    sea_level: f64,
}

impl<'a> ClimateModel<'a> {
    pub fn new(moisture_noise: &'a dyn Noise3, params: &'a ClimateParams, sea_level: f32) -> Self {
        Self {
            moisture_noise,
            params,
            sea_level: sea_level as f64,
        }
    }

    /// `T = T0 - k_lat·|sin(lat)| - k_alt·max(0, h - sea)`, clamped to `[-1, 1]`.
    pub fn temperature(&self, height: f32, sin_lat: f64) -> f64 {
        let p = self.params;
        let altitude = (height as f64 - self.sea_level).max(0.0);
        (p.base_temperature - p.temp_lat_coeff * sin_lat.abs() - p.temp_alt_coeff * altitude)
            .clamp(-1.0, 1.0)
    }

    /// Bias plus noise plus a valley term, clamped to `[0, 1]`.
    ///
    /// The noise is sampled at the sphere normal so the field has no seam.
    pub fn moisture(&self, normal: DVec3, height: f32) -> f64 {
        let p = self.params;
        let noise = (self.moisture_noise.sample_at(normal * p.moisture_noise_scale) + 1.0) * 0.5;
        let valley = ((self.sea_level - height as f64) * 0.5).max(0.0);
        (p.moisture_bias + p.moisture_noise_weight * noise + p.valley_moisture_weight * valley)
            .clamp(0.0, 1.0)
    }

    pub fn sample(&self, normal: DVec3, height: f32, sin_lat: f64) -> ClimateSample {
        let temperature = self.temperature(height, sin_lat);
        let moisture = self.moisture(normal, height);
        let humidity = (moisture * (0.5 + 0.5 * (1.0 - temperature.max(0.0)))).clamp(0.0, 1.0);
        ClimateSample {
            temperature,
            moisture,
            humidity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::GradientNoise;

    fn model_parts() -> (GradientNoise, ClimateParams) {
        (GradientNoise::new(8), ClimateParams::default())
    }

    #[test]
    fn test_poles_are_colder_than_equator() {
        let (noise, params) = model_parts();
        let model = ClimateModel::new(&noise, &params, 0.02);
        let equator = model.temperature(0.0, 0.0);
        let pole = model.temperature(0.0, 1.0);
        assert!((equator - 0.7).abs() < 1e-12);
        assert!(pole < equator);
        assert!((pole - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_altitude_cools() {
        let (noise, params) = model_parts();
        let model = ClimateModel::new(&noise, &params, 0.02);
        assert!(model.temperature(0.8, 0.2) < model.temperature(0.1, 0.2));
        // Below sea level there is no altitude term.
        assert_eq!(model.temperature(-0.5, 0.2), model.temperature(0.02, 0.2));
    }

    #[test]
    fn test_sample_ranges() {
        let (noise, params) = model_parts();
        let model = ClimateModel::new(&noise, &params, 0.02);
        for i in 0..200 {
            let t = i as f64 * 0.07;
            let normal = DVec3::new(t.cos(), (t * 0.3).sin(), t.sin()).normalize();
            let h = ((i as f32) * 0.013).sin();
            let s = model.sample(normal, h, normal.y);
            assert!((-1.0..=1.0).contains(&s.temperature));
            assert!((0.0..=1.0).contains(&s.moisture));
            assert!((0.0..=1.0).contains(&s.humidity));
            assert!(s.humidity <= s.moisture + 1e-12);
            assert!((0.0..=1.0).contains(&s.normalized_temperature()));
        }
    }

    #[test]
    fn test_valleys_are_wetter() {
        let (noise, params) = model_parts();
        let model = ClimateModel::new(&noise, &params, 0.02);
        let n = DVec3::new(0.3, 0.1, 0.9).normalize();
        assert!(model.moisture(n, -0.6) > model.moisture(n, 0.5));
    }
}
