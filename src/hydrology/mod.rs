//! Hydrology masks derived from the flow field.
//!
//! Rivers come from normalized flow accumulation; lakes from strict local
//! minima below a water level, grown outwards and grouped into regions.

mod lakes;
mod rivers;

use serde::{Deserialize, Serialize};

pub use lakes::{detect_lakes, lake_regions, LakeRegions, LAKE_GROWN, LAKE_SEED};
pub use rivers::{detect_rivers, smooth_rivers};

use crate::erosion::FlowField;
use crate::terrain::HeightField;

/// Parameters for river and lake extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrologyParams {
    /// Extract rivers at all. Disabled rivers yield an all-zero mask.
    pub rivers_enabled: bool,
    /// Normalized accumulation at which a cell becomes a river (0-1).
    pub river_threshold: f32,
    /// Box-filter radius applied to the river mask; 0 disables smoothing.
    pub river_smoothing_radius: usize,
    /// Lake water level relative to sea level.
    pub lake_threshold_offset: f32,
    /// Regions smaller than this many pixels are discarded.
    pub lake_min_region_size: usize,
    /// Maximum lake growth rings; `None` uses the grid height.
    pub lake_max_growth_steps: Option<usize>,
}

impl Default for HydrologyParams {
    fn default() -> Self {
        Self {
            rivers_enabled: true,
            river_threshold: 0.3,
            river_smoothing_radius: 1,
            lake_threshold_offset: 0.0,
            lake_min_region_size: 4,
            lake_max_growth_steps: None,
        }
    }
}

/// River and lake masks for one planet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydrologyMasks {
    /// River strength per cell (0-1).
    pub rivers: Vec<f32>,
    /// Lake strength per cell: 1 for seeds, 0.9 for grown cells, else 0.
    pub lakes: Vec<f32>,
    pub regions: LakeRegions,
}

impl HydrologyMasks {
    pub fn compute(
        heights: &HeightField,
        flow: &FlowField,
        params: &HydrologyParams,
        sea_level: f32,
    ) -> Self {
        let width = heights.width();
        let height = heights.height();

        let rivers = if params.rivers_enabled {
            let raw = detect_rivers(flow, params.river_threshold);
            smooth_rivers(&raw, width, height, params.river_smoothing_radius)
        } else {
            vec![0.0; heights.len()]
        };

        let threshold = sea_level + params.lake_threshold_offset;
        let steps = params.lake_max_growth_steps.unwrap_or(height);
        let lakes = detect_lakes(heights, threshold, steps);
        let regions = lake_regions(&lakes, width, height, params.lake_min_region_size);

        Self {
            rivers,
            lakes,
            regions,
        }
    }

    pub fn river_coverage(&self) -> f32 {
        if self.rivers.is_empty() {
            return 0.0;
        }
        self.rivers.iter().filter(|&&r| r > 0.0).count() as f32 / self.rivers.len() as f32
    }
}
