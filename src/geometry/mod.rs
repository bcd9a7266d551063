//! Equirectangular grid geometry.
//!
//! Maps pixel centers to longitude/latitude and unit-sphere normals, and
//! provides the wrap/clamp neighbor rules shared by every grid algorithm.

pub mod neighbors;
mod sampler;

pub use sampler::{lat_lon_to_normal, CoordinateCache, SphericalSampler};
