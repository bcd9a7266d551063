//! Generation stage trait and pipeline orchestration.

use std::time::Instant;

use thiserror::Error;

use crate::config::{ConfigError, PlanetParams};
use crate::noise::NoiseBank;
use crate::terrain::{GridError, Planet};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Height synthesis from layered noise.
    Heightmap,
    /// Talus-driven slope relaxation.
    ThermalErosion,
    /// Rain, routing and sediment transport.
    HydraulicErosion,
    /// Flow routing plus river and lake masks.
    Hydrology,
    /// Climate, biome and material channels.
    Surface,
    /// Cloud opacity.
    Clouds,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Heightmap => "heightmap",
            StageId::ThermalErosion => "thermal-erosion",
            StageId::HydraulicErosion => "hydraulic-erosion",
            StageId::Hydrology => "hydrology",
            StageId::Surface => "surface",
            StageId::Clouds => "clouds",
        }
    }
}

/// Read-only state shared by every stage of one run.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub params: PlanetParams,
    /// Noise fields derived from the planet seed.
    pub noise: NoiseBank,
}

impl StageContext {
    pub fn new(params: PlanetParams, seed: u64) -> Self {
        Self {
            params,
            noise: NoiseBank::new(seed),
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
}

/// One step of planet generation.
///
/// Stages read the shared context and write their results into the planet.
pub trait GenerationStage: Send + Sync {
    fn id(&self) -> StageId;

    fn name(&self) -> &str;

    /// Stages that must have completed before this one runs.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    fn execute(&self, planet: &mut Planet, ctx: &StageContext) -> Result<(), PipelineError>;
}

/// Ordered list of stages run against one planet.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    params: PlanetParams,
}

impl Pipeline {
    pub fn new(params: PlanetParams) -> Self {
        Self {
            stages: Vec::new(),
            params,
        }
    }

    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn params(&self) -> &PlanetParams {
        &self.params
    }

    /// Executes all stages in order on the given planet.
    pub fn run(&self, planet: &mut Planet) -> Result<(), PipelineError> {
        self.run_with_callbacks(planet, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages, reporting `(name, index, total)` around each one.
    ///
    /// Parameters are validated once up front; the noise bank is derived from
    /// the planet seed.
    pub fn run_with_callbacks<F1, F2>(
        &self,
        planet: &mut Planet,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        self.params.validate()?;
        let ctx = StageContext::new(self.params.clone(), planet.seed);

        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::with_capacity(total);

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let start = Instant::now();
            stage.execute(planet, &ctx)?;
            tracing::info!(
                stage = stage.id().name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "stage complete"
            );
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}
