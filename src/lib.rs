//! Deterministic procedural planet generator.
//!
//! Synthesizes terrain on a 2:1 equirectangular grid from seeded 3D noise,
//! erodes it, routes water across it and classifies per-pixel surface
//! materials. Every stage is a pure function of seed, grid size and
//! [`PlanetParams`], so repeated runs are bit-identical.

pub mod atmosphere;
pub mod biomes;
pub mod climate;
pub mod config;
pub mod erosion;
pub mod export;
pub mod geometry;
pub mod hydrology;
pub mod noise;
pub mod pipeline;
pub mod surface;
pub mod terrain;

pub use config::{ConfigError, PlanetParams, Preset};
pub use geometry::{CoordinateCache, SphericalSampler};
pub use noise::{FractalNoiseConfig, NoiseBank};
pub use pipeline::{generate_planet, GenerationStage, Pipeline, PipelineError};
pub use surface::SurfaceData;
pub use terrain::{GridError, HeightField, Planet};
