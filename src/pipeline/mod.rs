//! Pipeline module for orchestrating planet generation stages.
//!
//! Stages run in insertion order against a single [`Planet`](crate::terrain::Planet);
//! each declares the stages it depends on and the pipeline refuses to run a
//! stage whose dependencies have not completed.

mod stage;
mod stages;

pub use stage::{GenerationStage, Pipeline, PipelineError, StageContext, StageId};
pub use stages::{
    generate_planet, CloudStage, HeightmapStage, HydraulicErosionStage, HydrologyStage,
    SurfaceStage, ThermalErosionStage,
};
