//! Climate model.
//!
//! Temperature falls with latitude and altitude; moisture combines a bias,
//! large-scale noise and a valley term. The noise field is passed in by the
//! caller, never held globally.

mod config;
mod model;

pub use config::ClimateParams;
pub use model::{ClimateModel, ClimateSample};
