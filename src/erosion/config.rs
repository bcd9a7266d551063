//! Erosion configuration.

use serde::{Deserialize, Serialize};

use crate::geometry::neighbors::{OFFSETS_4, OFFSETS_8};

/// Neighborhood used by thermal erosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThermalStencil {
    /// Four axis-aligned neighbors.
    #[default]
    VonNeumann,
    /// Eight neighbors including diagonals.
    Moore,
}

impl ThermalStencil {
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::VonNeumann => &OFFSETS_4,
            Self::Moore => &OFFSETS_8,
        }
    }
}

/// Parameters for slope-limited thermal erosion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalParams {
    /// Number of diffusion iterations. Zero leaves the grid untouched.
    pub iterations: u32,
    /// Height difference below which no material moves.
    pub talus: f32,
    /// Fraction of a cell's excess difference moved per iteration, shared
    /// across the stencil (0-1).
    pub rate: f32,
    pub stencil: ThermalStencil,
}

impl Default for ThermalParams {
    fn default() -> Self {
        Self {
            iterations: 20,
            talus: 0.55,
            rate: 0.15,
            stencil: ThermalStencil::default(),
        }
    }
}

/// Which hydraulic erosion formulation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HydraulicModel {
    /// Single-target steepest-descent routing with ordered accumulation.
    #[default]
    SteepestDescent,
    /// Four-neighbor shallow-water flux lattice.
    ShallowWater,
}

impl HydraulicModel {
    pub fn name(self) -> &'static str {
        match self {
            Self::SteepestDescent => "steepest-descent",
            Self::ShallowWater => "shallow-water",
        }
    }
}

/// Parameters for hydraulic erosion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicParams {
    pub model: HydraulicModel,
    /// Number of rain/route/erode/evaporate cycles. Zero leaves the grid untouched.
    pub iterations: u32,
    /// Water added to every cell per iteration.
    pub rainfall: f32,
    /// Fraction of water removed per iteration (0-1).
    pub evaporation: f32,
    /// Sediment capacity factor (Kc).
    pub capacity_factor: f32,
    /// Erosion rate (Ks).
    pub erosion_rate: f32,
    /// Deposition rate (Kd), clamped to 0-1 so deposits never exceed the load.
    pub deposition_rate: f32,
    /// Water depth below which a cell counts as dry (ε).
    pub min_water: f32,
    /// Floor applied to the routing slope.
    pub min_slope: f32,
    /// Floor applied to the carrying capacity.
    pub min_capacity: f32,
    /// Upper bound on bed material removed from one cell per iteration.
    pub max_erosion: f32,
    /// Scale capacity by upstream accumulation (steepest-descent model only).
    pub use_accumulation: bool,
}

impl Default for HydraulicParams {
    fn default() -> Self {
        Self {
            model: HydraulicModel::default(),
            iterations: 60,
            rainfall: 0.6,
            evaporation: 0.1,
            capacity_factor: 0.01,
            erosion_rate: 0.1,
            deposition_rate: 0.1,
            min_water: 0.001,
            min_slope: 0.001,
            min_capacity: 1e-4,
            max_erosion: 0.01,
            use_accumulation: true,
        }
    }
}
