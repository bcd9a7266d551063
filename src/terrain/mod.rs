//! Terrain generation module.
//!
//! Provides the height grid, its synthesis from noise, and the Planet
//! container that every later stage writes into.

mod config;
mod grid;
mod heightmap;
mod planet;

pub use config::TerrainParams;
pub use grid::{check_dimensions, GridError, HeightField};
pub use heightmap::{estimate_slope, generate_heightmap, sample_elevation};
pub use planet::Planet;
