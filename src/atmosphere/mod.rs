//! Cloud cover.
//!
//! Clouds are a presentation layer: they read the noise bank and the
//! coordinate cache but never feed back into erosion or classification.

mod clouds;

pub use clouds::{cloud_opacity, CloudField, CloudParams};
