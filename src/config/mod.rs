//! Top-level planet parameters, validation and named presets.

mod presets;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use presets::Preset;

use crate::atmosphere::CloudParams;
use crate::biomes::BiomeParams;
use crate::climate::ClimateParams;
use crate::erosion::{HydraulicParams, ThermalParams};
use crate::hydrology::HydrologyParams;
use crate::surface::EmissiveParams;
use crate::terrain::TerrainParams;

/// Rejected parameter values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("parameter '{0}' must be finite, got {1}")]
    NonFinite(&'static str, f64),
    #[error("parameter '{0}' must not be negative, got {1}")]
    Negative(&'static str, f64),
    #[error("parameter '{name}' must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("unknown preset '{0}' (expected earthlike, desert, ice, lava or alien)")]
    UnknownPreset(String),
}

/// Every input of a generation run apart from seed and grid size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetParams {
    pub terrain: TerrainParams,
    pub thermal: ThermalParams,
    pub hydraulic: HydraulicParams,
    pub climate: ClimateParams,
    pub hydrology: HydrologyParams,
    pub biomes: BiomeParams,
    pub clouds: CloudParams,
    pub emissive: EmissiveParams,
}

fn finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite(name, value))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if finite(name, value)? < 0.0 {
        return Err(ConfigError::Negative(name, value));
    }
    Ok(())
}

fn in_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    let value = finite(name, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            min,
            max,
            value,
        });
    }
    Ok(())
}

impl PlanetParams {
    /// Checks every numeric field before any computation runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.terrain;
        in_range("terrain.sea_level", t.sea_level as f64, -1.0, 1.0)?;
        non_negative("terrain.continent_scale", t.continent_scale)?;
        non_negative("terrain.mountain_intensity", t.mountain_intensity)?;
        non_negative("terrain.warp_amplitude", t.warp_amplitude)?;
        non_negative("terrain.detail_slope_power", t.detail_slope_power)?;

        let th = &self.thermal;
        non_negative("thermal.talus", th.talus as f64)?;
        in_range("thermal.rate", th.rate as f64, 0.0, 1.0)?;

        let h = &self.hydraulic;
        non_negative("hydraulic.rainfall", h.rainfall as f64)?;
        in_range("hydraulic.evaporation", h.evaporation as f64, 0.0, 1.0)?;
        non_negative("hydraulic.capacity_factor", h.capacity_factor as f64)?;
        in_range("hydraulic.erosion_rate", h.erosion_rate as f64, 0.0, 1.0)?;
        in_range("hydraulic.deposition_rate", h.deposition_rate as f64, 0.0, 1.0)?;
        non_negative("hydraulic.min_water", h.min_water as f64)?;
        non_negative("hydraulic.min_slope", h.min_slope as f64)?;
        non_negative("hydraulic.min_capacity", h.min_capacity as f64)?;
        non_negative("hydraulic.max_erosion", h.max_erosion as f64)?;

        let c = &self.climate;
        finite("climate.base_temperature", c.base_temperature)?;
        finite("climate.temp_lat_coeff", c.temp_lat_coeff)?;
        finite("climate.temp_alt_coeff", c.temp_alt_coeff)?;
        finite("climate.moisture_bias", c.moisture_bias)?;
        non_negative("climate.moisture_noise_scale", c.moisture_noise_scale)?;
        finite("climate.moisture_noise_weight", c.moisture_noise_weight)?;
        finite("climate.valley_moisture_weight", c.valley_moisture_weight)?;

        let hy = &self.hydrology;
        in_range("hydrology.river_threshold", hy.river_threshold as f64, 0.0, 1.0)?;
        finite("hydrology.lake_threshold_offset", hy.lake_threshold_offset as f64)?;

        let cl = &self.clouds;
        in_range("clouds.coverage", cl.coverage, 0.0, 1.0)?;
        non_negative("clouds.warp", cl.warp)?;
        if finite("clouds.gamma", cl.gamma)? <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "clouds.gamma",
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
                value: cl.gamma,
            });
        }

        let em = &self.emissive;
        non_negative("emissive.intensity", em.intensity)?;
        in_range("emissive.threshold", em.threshold, -1.0, 0.99)?;

        Ok(())
    }
}
