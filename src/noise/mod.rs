//! Noise generation module for terrain synthesis.
//!
//! Every field is built from an explicit 64-bit seed; nothing here holds global
//! state, so the same seed always produces the same planet.

mod bank;
mod fractal;
mod gradient;
mod warp;

pub use bank::NoiseBank;
pub use fractal::{fbm, ridged, FractalNoiseConfig};
pub use gradient::{GradientNoise, Noise3};
pub use warp::DomainWarp;
