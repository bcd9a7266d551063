//! Erosion and flow routing.
//!
//! Thermal erosion diffuses over-steep slopes; hydraulic erosion runs
//! rain → routing → sediment exchange → evaporation cycles using either
//! steepest-descent routing or a shallow-water flux lattice. The flow field
//! machinery is shared with hydrology.

mod config;
pub mod flow;
mod hydraulic;
mod shallow_water;
mod thermal;

pub use config::{HydraulicModel, HydraulicParams, ThermalParams, ThermalStencil};
pub use flow::{FlowDirection, FlowField, FlowWorkspace, NO_TARGET};
pub use hydraulic::{
    apply_hydraulic_erosion, BedLimits, HydraulicErosion, HydraulicOutputs, SteepestDescent,
    SteepestDescentState,
};
pub use shallow_water::ShallowWater;
pub use thermal::apply_thermal_erosion;
