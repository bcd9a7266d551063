//! Built-in generation stages.

use super::stage::{GenerationStage, Pipeline, PipelineError, StageContext, StageId};
use crate::atmosphere::CloudField;
use crate::config::PlanetParams;
use crate::erosion::{apply_hydraulic_erosion, apply_thermal_erosion, FlowField};
use crate::hydrology::HydrologyMasks;
use crate::surface::SurfaceAnalyzer;
use crate::terrain::{generate_heightmap, Planet};

/// Heightmap generation stage using layered fractal noise.
pub struct HeightmapStage;

impl GenerationStage for HeightmapStage {
    fn id(&self) -> StageId {
        StageId::Heightmap
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn execute(&self, planet: &mut Planet, ctx: &StageContext) -> Result<(), PipelineError> {
        generate_heightmap(&mut planet.heights, &planet.cache, &ctx.noise, &ctx.params.terrain);
        let (min, max) = planet.height_range();
        tracing::debug!(min, max, "heightmap synthesized");
        Ok(())
    }
}

/// Thermal erosion stage. Renormalizes heights after a non-empty pass.
pub struct ThermalErosionStage;

impl GenerationStage for ThermalErosionStage {
    fn id(&self) -> StageId {
        StageId::ThermalErosion
    }

    fn name(&self) -> &str {
        "Thermal Erosion"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, planet: &mut Planet, ctx: &StageContext) -> Result<(), PipelineError> {
        let params = &ctx.params.thermal;
        if params.iterations == 0 {
            return Ok(());
        }
        apply_thermal_erosion(&mut planet.heights, params);
        planet.heights.normalize();
        Ok(())
    }
}

/// Hydraulic erosion stage. Keeps the residual water and sediment grids.
pub struct HydraulicErosionStage;

impl GenerationStage for HydraulicErosionStage {
    fn id(&self) -> StageId {
        StageId::HydraulicErosion
    }

    fn name(&self) -> &str {
        "Hydraulic Erosion"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, planet: &mut Planet, ctx: &StageContext) -> Result<(), PipelineError> {
        let params = &ctx.params.hydraulic;
        if params.iterations == 0 {
            return Ok(());
        }
        let outputs = apply_hydraulic_erosion(&mut planet.heights, params);
        planet.heights.normalize();
        tracing::debug!(
            model = params.model.name(),
            water = outputs.total_water(),
            sediment = outputs.total_sediment(),
            "hydraulic erosion finished"
        );
        planet.erosion = Some(outputs);
        Ok(())
    }
}

/// Flow routing plus river and lake extraction on the final heights.
pub struct HydrologyStage;

impl GenerationStage for HydrologyStage {
    fn id(&self) -> StageId {
        StageId::Hydrology
    }

    fn name(&self) -> &str {
        "Hydrology"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, planet: &mut Planet, ctx: &StageContext) -> Result<(), PipelineError> {
        let flow = FlowField::compute(&planet.heights);
        let masks = HydrologyMasks::compute(
            &planet.heights,
            &flow,
            &ctx.params.hydrology,
            ctx.params.terrain.sea_level,
        );
        tracing::debug!(
            sinks = flow.sink_count(),
            max_accumulation = flow.max_accumulation(),
            lakes = masks.regions.count(),
            river_coverage = masks.river_coverage(),
            "hydrology extracted"
        );
        planet.flow = Some(flow);
        planet.hydrology = Some(masks);
        Ok(())
    }
}

/// Climate, biome and material channels.
pub struct SurfaceStage;

impl GenerationStage for SurfaceStage {
    fn id(&self) -> StageId {
        StageId::Surface
    }

    fn name(&self) -> &str {
        "Surface Classification"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Hydrology]
    }

    fn execute(&self, planet: &mut Planet, ctx: &StageContext) -> Result<(), PipelineError> {
        let (Some(flow), Some(hydrology)) = (planet.flow.as_ref(), planet.hydrology.as_ref()) else {
            return Err(PipelineError::StageFailed(
                self.name().to_string(),
                "flow field and hydrology masks are not populated".to_string(),
            ));
        };
        let params = &ctx.params;
        let analyzer = SurfaceAnalyzer::new(
            &planet.cache,
            &ctx.noise,
            &params.climate,
            &params.biomes,
            params.terrain.sea_level,
        )
        .with_emissive(&params.emissive);
        let surface = analyzer.analyze(&planet.heights, flow, hydrology);
        planet.surface = Some(surface);
        Ok(())
    }
}

/// Cloud opacity layer.
pub struct CloudStage;

impl GenerationStage for CloudStage {
    fn id(&self) -> StageId {
        StageId::Clouds
    }

    fn name(&self) -> &str {
        "Clouds"
    }

    fn execute(&self, planet: &mut Planet, ctx: &StageContext) -> Result<(), PipelineError> {
        planet.clouds = Some(CloudField::generate(&planet.cache, &ctx.noise, &ctx.params.clouds));
        Ok(())
    }
}

impl Pipeline {
    /// Heightmap, thermal, hydraulic, hydrology, surface and cloud stages.
    pub fn standard(params: PlanetParams) -> Self {
        let mut pipeline = Pipeline::new(params);
        pipeline
            .add_stage(HeightmapStage)
            .add_stage(ThermalErosionStage)
            .add_stage(HydraulicErosionStage)
            .add_stage(HydrologyStage)
            .add_stage(SurfaceStage)
            .add_stage(CloudStage);
        pipeline
    }
}

/// Runs the standard pipeline on a fresh `width x height` planet.
pub fn generate_planet(
    seed: u64,
    width: usize,
    height: usize,
    params: &PlanetParams,
) -> Result<Planet, PipelineError> {
    params.validate()?;
    let mut planet = Planet::new(width, height, seed)?;
    tracing::info!(seed, width, height, "generating planet");
    Pipeline::standard(params.clone()).run(&mut planet)?;
    Ok(planet)
}
