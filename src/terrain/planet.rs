//! Planet data container populated by the generation pipeline.

use crate::atmosphere::CloudField;
use crate::erosion::{FlowField, HydraulicOutputs};
use crate::geometry::CoordinateCache;
use crate::hydrology::HydrologyMasks;
use crate::surface::SurfaceData;

use super::{GridError, HeightField};

/// Represents a procedurally generated planet on an equirectangular grid.
#[derive(Debug, Clone)]
pub struct Planet {
    /// Master random seed for generation.
    pub seed: u64,
    /// Shared longitude/latitude/normal cache.
    pub cache: CoordinateCache,
    /// Elevation in `[-1, 1]`.
    pub heights: HeightField,
    /// Residual water and sediment (populated after hydraulic erosion).
    pub erosion: Option<HydraulicOutputs>,
    /// Steepest-descent flow routing (populated after hydrology stage).
    pub flow: Option<FlowField>,
    /// River and lake masks (populated after hydrology stage).
    pub hydrology: Option<HydrologyMasks>,
    /// Per-pixel material channels (populated after surface stage).
    pub surface: Option<SurfaceData>,
    /// Cloud opacity (populated after cloud stage).
    pub clouds: Option<CloudField>,
}

impl Planet {
    /// Creates an empty planet, validating the grid dimensions.
    pub fn new(width: usize, height: usize, seed: u64) -> Result<Self, GridError> {
        let cache = CoordinateCache::new(width, height)?;
        let heights = HeightField::new(width, height)?;
        Ok(Self {
            seed,
            cache,
            heights,
            erosion: None,
            flow: None,
            hydrology: None,
            surface: None,
            clouds: None,
        })
    }

    pub fn width(&self) -> usize {
        self.heights.width()
    }

    pub fn height(&self) -> usize {
        self.heights.height()
    }

    pub fn pixel_count(&self) -> usize {
        self.heights.len()
    }

    pub fn height_range(&self) -> (f32, f32) {
        self.heights.range()
    }

    /// Fraction of cells below `sea_level`.
    pub fn ocean_fraction(&self, sea_level: f32) -> f32 {
        if self.heights.is_empty() {
            return 0.0;
        }
        let wet = self.heights.data().iter().filter(|&&h| h < sea_level).count();
        wet as f32 / self.heights.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planet_creation() {
        let planet = Planet::new(64, 32, 42).unwrap();
        assert_eq!(planet.width(), 64);
        assert_eq!(planet.height(), 32);
        assert_eq!(planet.seed, 42);
        assert_eq!(planet.pixel_count(), 64 * 32);
        assert!(planet.flow.is_none() && planet.surface.is_none());
    }

    #[test]
    fn test_planet_rejects_non_equirect() {
        assert!(Planet::new(64, 64, 1).is_err());
    }

    #[test]
    fn test_ocean_fraction() {
        let mut planet = Planet::new(8, 4, 0).unwrap();
        for x in 0..8 {
            planet.heights.set(x, 0, -0.5);
        }
        assert!((planet.ocean_fraction(-0.1) - 0.25).abs() < 1e-6);
    }
}
