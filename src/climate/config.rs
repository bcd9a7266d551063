//! Climate configuration parameters.

use serde::{Deserialize, Serialize};

/// Coefficients of the temperature / moisture model.
///
/// Temperatures are dimensionless in `[-1, 1]` (0 ≈ freezing); moisture and
/// humidity are in `[0, 1]`. Heights use the normalized `[-1, 1]` elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateParams {
    /// Temperature at the equator at sea level.
    pub base_temperature: f64,
    /// Temperature drop per unit `|sin(lat)|`.
    pub temp_lat_coeff: f64,
    /// Temperature drop per unit height above sea level.
    pub temp_alt_coeff: f64,
    /// Baseline moisture before noise and valley terms.
    pub moisture_bias: f64,
    /// Frequency of the moisture noise on the unit sphere.
    pub moisture_noise_scale: f64,
    /// Weight of the `[0, 1]` moisture noise term.
    pub moisture_noise_weight: f64,
    /// Weight of the below-sea-level (valley) moisture term.
    pub valley_moisture_weight: f64,
}

impl Default for ClimateParams {
    fn default() -> Self {
        Self {
            base_temperature: 0.7,
            temp_lat_coeff: 1.2,
            temp_alt_coeff: 0.9,
            moisture_bias: 0.1,
            moisture_noise_scale: 1.6,
            moisture_noise_weight: 0.4,
            valley_moisture_weight: 0.4,
        }
    }
}
