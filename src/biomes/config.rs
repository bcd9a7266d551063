//! Biome classification thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds for the biome decision procedure.
///
/// Temperatures are normalized to `[0, 1]`; heights are relative to sea level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeParams {
    /// Depth below sea level where shallow water turns deep.
    pub deep_ocean_depth: f32,
    /// Depth below sea level where beach turns into shallow water.
    pub shallow_ocean_depth: f32,
    /// Snow coverage that turns land into snow or ice.
    pub snow_threshold: f32,
    /// Lake strength that turns land into swamp.
    pub swamp_lake_threshold: f32,
    /// River strength (with moisture above `riparian_moisture`) for riparian land.
    pub riparian_river_threshold: f32,
    pub riparian_moisture: f32,
    /// Slope above which land is mountain.
    pub mountain_slope: f32,
    /// Height above sea level above which land is mountain.
    pub mountain_height: f32,
    /// Normalized temperature below which land is cold (taiga/tundra, snow vs ice).
    pub cold_temperature: f32,
    /// Normalized temperature below which land is temperate.
    pub temperate_temperature: f32,
    /// Normalized temperature above which hot deserts may become volcanic.
    pub volcanic_temperature: f32,
    /// Macro-variation above which hot deserts become volcanic.
    pub volcanic_macro: f32,
}

impl Default for BiomeParams {
    fn default() -> Self {
        Self {
            deep_ocean_depth: 0.18,
            shallow_ocean_depth: 0.04,
            snow_threshold: 0.6,
            swamp_lake_threshold: 0.4,
            riparian_river_threshold: 0.5,
            riparian_moisture: 0.5,
            mountain_slope: 0.75,
            mountain_height: 0.55,
            cold_temperature: 0.25,
            temperate_temperature: 0.5,
            volcanic_temperature: 0.8,
            volcanic_macro: 0.6,
        }
    }
}
