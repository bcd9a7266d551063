//! Built-in planet styles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ConfigError, PlanetParams};
use crate::surface::EmissiveKind;

/// Named parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Preset {
    #[default]
    Earthlike,
    Desert,
    Ice,
    Lava,
    Alien,
}

/// Preset-specific values layered over [`PlanetParams::default`].
struct Row {
    sea_level: f32,
    continent_scale: f64,
    mountain_intensity: f64,
    thermal_iterations: u32,
    hydraulic_iterations: u32,
    rainfall: f32,
    evaporation: f32,
    temp_lat_coeff: f64,
    temp_alt_coeff: f64,
    moisture_bias: f64,
    cloud_coverage: f64,
    cloud_warp: f64,
    cloud_gamma: f64,
    rivers: Option<f32>,
    emissive: EmissiveKind,
    emissive_intensity: f64,
}

const TALUS: f32 = 0.55;
const THERMAL_RATE: f32 = 0.15;

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Earthlike,
        Preset::Desert,
        Preset::Ice,
        Preset::Lava,
        Preset::Alien,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Earthlike => "earthlike",
            Preset::Desert => "desert",
            Preset::Ice => "ice",
            Preset::Lava => "lava",
            Preset::Alien => "alien",
        }
    }

    fn row(self) -> Row {
        match self {
            Preset::Earthlike => Row {
                sea_level: 0.02,
                continent_scale: 2.2,
                mountain_intensity: 0.9,
                thermal_iterations: 8,
                hydraulic_iterations: 15,
                rainfall: 0.6,
                evaporation: 0.1,
                temp_lat_coeff: 1.2,
                temp_alt_coeff: 0.9,
                moisture_bias: 0.1,
                cloud_coverage: 0.55,
                cloud_warp: 0.25,
                cloud_gamma: 2.4,
                rivers: Some(0.3),
                emissive: EmissiveKind::NightLights,
                emissive_intensity: 0.3,
            },
            Preset::Desert => Row {
                sea_level: 0.05,
                continent_scale: 2.5,
                mountain_intensity: 0.6,
                thermal_iterations: 6,
                hydraulic_iterations: 10,
                rainfall: 0.2,
                evaporation: 0.3,
                temp_lat_coeff: 0.8,
                temp_alt_coeff: 1.1,
                moisture_bias: -0.3,
                cloud_coverage: 0.2,
                cloud_warp: 0.15,
                cloud_gamma: 2.0,
                rivers: None,
                emissive: EmissiveKind::NightLights,
                emissive_intensity: 0.2,
            },
            Preset::Ice => Row {
                sea_level: -0.1,
                continent_scale: 1.8,
                mountain_intensity: 1.2,
                thermal_iterations: 12,
                hydraulic_iterations: 20,
                rainfall: 0.4,
                evaporation: 0.05,
                temp_lat_coeff: 1.5,
                temp_alt_coeff: 1.3,
                moisture_bias: 0.2,
                cloud_coverage: 0.7,
                cloud_warp: 0.3,
                cloud_gamma: 2.6,
                rivers: None,
                emissive: EmissiveKind::NightLights,
                emissive_intensity: 0.2,
            },
            Preset::Lava => Row {
                sea_level: 0.0,
                continent_scale: 2.0,
                mountain_intensity: 1.5,
                thermal_iterations: 10,
                hydraulic_iterations: 12,
                rainfall: 0.1,
                evaporation: 0.2,
                temp_lat_coeff: 0.5,
                temp_alt_coeff: 0.5,
                moisture_bias: -0.5,
                cloud_coverage: 0.1,
                cloud_warp: 0.1,
                cloud_gamma: 1.8,
                rivers: None,
                emissive: EmissiveKind::Lava,
                emissive_intensity: 0.8,
            },
            Preset::Alien => Row {
                sea_level: 0.03,
                continent_scale: 3.0,
                mountain_intensity: 1.1,
                thermal_iterations: 7,
                hydraulic_iterations: 14,
                rainfall: 0.65,
                evaporation: 0.08,
                temp_lat_coeff: 0.9,
                temp_alt_coeff: 0.8,
                moisture_bias: 0.15,
                cloud_coverage: 0.6,
                cloud_warp: 0.4,
                cloud_gamma: 2.2,
                rivers: Some(0.25),
                emissive: EmissiveKind::NightLights,
                emissive_intensity: 0.4,
            },
        }
    }

    /// Full parameter set for this preset.
    pub fn params(self) -> PlanetParams {
        let row = self.row();
        let mut params = PlanetParams::default();

        params.terrain.sea_level = row.sea_level;
        params.terrain.continent_scale = row.continent_scale;
        params.terrain.mountain_intensity = row.mountain_intensity;

        params.thermal.iterations = row.thermal_iterations;
        params.thermal.talus = TALUS;
        params.thermal.rate = THERMAL_RATE;

        params.hydraulic.iterations = row.hydraulic_iterations;
        params.hydraulic.rainfall = row.rainfall;
        params.hydraulic.evaporation = row.evaporation;

        params.climate.temp_lat_coeff = row.temp_lat_coeff;
        params.climate.temp_alt_coeff = row.temp_alt_coeff;
        params.climate.moisture_bias = row.moisture_bias;

        params.clouds.coverage = row.cloud_coverage;
        params.clouds.warp = row.cloud_warp;
        params.clouds.gamma = row.cloud_gamma;

        params.emissive.kind = row.emissive;
        params.emissive.intensity = row.emissive_intensity;

        params.hydrology.rivers_enabled = row.rivers.is_some();
        if let Some(threshold) = row.rivers {
            params.hydrology.river_threshold = threshold;
        }

        params
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_validates() {
        for preset in Preset::ALL {
            assert_eq!(preset.params().validate(), Ok(()), "{} is invalid", preset);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Earthlike".parse::<Preset>(), Ok(Preset::Earthlike));
        assert_eq!("LAVA".parse::<Preset>(), Ok(Preset::Lava));
        assert_eq!(" alien ".parse::<Preset>(), Ok(Preset::Alien));
        assert!(matches!(
            "venus".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_preset_values() {
        let desert = Preset::Desert.params();
        assert_eq!(desert.terrain.sea_level, 0.05);
        assert_eq!(desert.hydraulic.iterations, 10);
        assert!(!desert.hydrology.rivers_enabled);

        let alien = Preset::Alien.params();
        assert!(alien.hydrology.rivers_enabled);
        assert_eq!(alien.hydrology.river_threshold, 0.25);
        assert_eq!(alien.clouds.warp, 0.4);

        let lava = Preset::Lava.params();
        assert_eq!(lava.emissive.kind, EmissiveKind::Lava);
        assert_eq!(lava.emissive.intensity, 0.8);
        assert_eq!(Preset::Earthlike.params().emissive.kind, EmissiveKind::NightLights);

        for preset in Preset::ALL {
            let p = preset.params();
            assert_eq!(p.thermal.talus, 0.55);
            assert_eq!(p.thermal.rate, 0.15);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>(), Ok(preset));
        }
    }
}
