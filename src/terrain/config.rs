//! Height synthesis parameters.

use serde::{Deserialize, Serialize};

/// Parameters for the continental / mountain / detail height layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Offset subtracted after normalization; positive values drown more land.
    pub sea_level: f32,
    /// Base frequency of the continental layer. Mountains and detail derive from it.
    pub continent_scale: f64,
    /// Multiplier on the ridged mountain layer.
    pub mountain_intensity: f64,
    /// Displacement applied by the continental domain warp.
    pub warp_amplitude: f64,
    /// Exponent applied to the slope estimate when masking detail noise (≥ 1).
    pub detail_slope_power: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            sea_level: 0.02,
            continent_scale: 2.2,
            mountain_intensity: 0.9,
            warp_amplitude: 0.08,
            detail_slope_power: 2.0,
        }
    }
}
