//! Per-pixel surface material synthesis.
//!
//! Combines the eroded height field, flow routing, hydrology masks and the
//! climate model into the final material channels.

mod emissive;
mod normal_map;
mod occlusion;

use rayon::prelude::*;

pub use emissive::{emissive_map, emissive_texel, EmissiveKind, EmissiveParams};
pub use normal_map::{encode_normal, normal_map};
pub use occlusion::ambient_occlusion;

use crate::biomes::{
    atmosphere_mask, classify_biome, shade_biome, snow_coverage, vegetation_density, Biome,
    BiomeInputs, BiomeParams, ShadingInputs,
};
use crate::climate::{ClimateModel, ClimateParams};
use crate::erosion::FlowField;
use crate::geometry::CoordinateCache;
use crate::hydrology::HydrologyMasks;
use crate::noise::{Noise3, NoiseBank};
use crate::terrain::HeightField;

const DETAIL_FREQUENCY: f64 = 12.0;
const MACRO_FREQUENCY: f64 = 2.5;
/// Peak alpha of the atmosphere tint, out of 255.
const ATMOSPHERE_ALPHA: f32 = 210.0 / 255.0;

/// Scalar surface channels, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceChannel {
    Roughness,
    Metallic,
    AmbientOcclusion,
    Vegetation,
    Snow,
    Detail,
    OceanSpecular,
    AtmosphereMask,
    WaterDepth,
}

impl SurfaceChannel {
    pub const ALL: [SurfaceChannel; 9] = [
        SurfaceChannel::Roughness,
        SurfaceChannel::Metallic,
        SurfaceChannel::AmbientOcclusion,
        SurfaceChannel::Vegetation,
        SurfaceChannel::Snow,
        SurfaceChannel::Detail,
        SurfaceChannel::OceanSpecular,
        SurfaceChannel::AtmosphereMask,
        SurfaceChannel::WaterDepth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SurfaceChannel::Roughness => "roughness",
            SurfaceChannel::Metallic => "metallic",
            SurfaceChannel::AmbientOcclusion => "ao",
            SurfaceChannel::Vegetation => "vegetation",
            SurfaceChannel::Snow => "snow",
            SurfaceChannel::Detail => "detail",
            SurfaceChannel::OceanSpecular => "ocean_specular",
            SurfaceChannel::AtmosphereMask => "atmosphere_mask",
            SurfaceChannel::WaterDepth => "water_depth",
        }
    }
}

/// Output bundle of the surface stage. Every channel is row-major `width * height`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceData {
    pub width: usize,
    pub height: usize,
    pub sea_level: f32,
    /// Linear base color.
    pub albedo: Vec<[f32; 3]>,
    /// Base color with specular sheen added over water.
    pub ocean_color: Vec<[f32; 3]>,
    /// Atmosphere tint with alpha from the atmosphere mask.
    pub atmosphere: Vec<[f32; 4]>,
    /// City-light or lava emission; alpha is the strength.
    pub emissive: Vec<[f32; 4]>,
    pub roughness: Vec<f32>,
    pub metallic: Vec<f32>,
    pub ambient_occlusion: Vec<f32>,
    pub vegetation: Vec<f32>,
    pub snow: Vec<f32>,
    pub detail: Vec<f32>,
    pub ocean_specular: Vec<f32>,
    pub atmosphere_mask: Vec<f32>,
    pub water_depth: Vec<f32>,
    /// [`Biome::as_u8`] per pixel.
    pub biome_ids: Vec<u8>,
    /// [`crate::biomes::Material::as_u8`] per pixel.
    pub material_ids: Vec<u8>,
}

impl SurfaceData {
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self, channel: SurfaceChannel) -> &[f32] {
        match channel {
            SurfaceChannel::Roughness => &self.roughness,
            SurfaceChannel::Metallic => &self.metallic,
            SurfaceChannel::AmbientOcclusion => &self.ambient_occlusion,
            SurfaceChannel::Vegetation => &self.vegetation,
            SurfaceChannel::Snow => &self.snow,
            SurfaceChannel::Detail => &self.detail,
            SurfaceChannel::OceanSpecular => &self.ocean_specular,
            SurfaceChannel::AtmosphereMask => &self.atmosphere_mask,
            SurfaceChannel::WaterDepth => &self.water_depth,
        }
    }

    pub fn biome(&self, x: usize, y: usize) -> Option<Biome> {
        Biome::from_u8(self.biome_ids[y * self.width + x])
    }

    /// Pixel count per biome, indexed by [`Biome::as_u8`].
    pub fn biome_histogram(&self) -> [usize; 18] {
        let mut counts = [0usize; 18];
        for &id in &self.biome_ids {
            if let Some(slot) = counts.get_mut(id as usize) {
                *slot += 1;
            }
        }
        counts
    }
}

/// One pixel's worth of outputs before being split into channels.
#[derive(Debug, Clone, Copy)]
struct Texel {
    albedo: [f32; 3],
    ocean_color: [f32; 3],
    atmosphere: [f32; 4],
    roughness: f32,
    metallic: f32,
    ambient_occlusion: f32,
    vegetation: f32,
    snow: f32,
    detail: f32,
    ocean_specular: f32,
    atmosphere_mask: f32,
    water_depth: f32,
    biome: Biome,
}

/// Read-only inputs shared by every texel of one analysis.
pub struct SurfaceAnalyzer<'a> {
    cache: &'a CoordinateCache,
    bank: &'a NoiseBank,
    climate: ClimateModel<'a>,
    biomes: &'a BiomeParams,
    emissive: Option<&'a EmissiveParams>,
    sea_level: f32,
}

impl<'a> SurfaceAnalyzer<'a> {
    pub fn new(
        cache: &'a CoordinateCache,
        bank: &'a NoiseBank,
        climate: &'a ClimateParams,
        biomes: &'a BiomeParams,
        sea_level: f32,
    ) -> Self {
        Self {
            cache,
            bank,
            climate: ClimateModel::new(&bank.moisture, climate, sea_level),
            biomes,
            emissive: None,
            sea_level,
        }
    }

    /// Enables the emissive layer; without it the layer is fully transparent.
    pub fn with_emissive(mut self, params: &'a EmissiveParams) -> Self {
        self.emissive = Some(params);
        self
    }

    /// Builds every surface channel. Pixels are independent and evaluated in
    /// parallel; the output order is fixed by pixel index.
    pub fn analyze(
        &self,
        heights: &HeightField,
        flow: &FlowField,
        hydrology: &HydrologyMasks,
    ) -> SurfaceData {
        let width = heights.width();
        let height = heights.height();
        let raw_ao = ambient_occlusion(heights);

        let texels: Vec<Texel> = (0..heights.len())
            .into_par_iter()
            .map(|i| {
                let (x, y) = (i % width, i / width);
                let river = hydrology.rivers.get(i).copied().unwrap_or(0.0);
                let lake = hydrology.lakes.get(i).copied().unwrap_or(0.0);
                self.texel(x, y, heights.data()[i], flow.slope[i], river, lake, raw_ao[i])
            })
            .collect();

        let mut data = SurfaceData {
            width,
            height,
            sea_level: self.sea_level,
            ..SurfaceData::default()
        };
        let n = texels.len();
        data.albedo.reserve(n);
        data.ocean_color.reserve(n);
        data.atmosphere.reserve(n);
        for t in &texels {
            data.albedo.push(t.albedo);
            data.ocean_color.push(t.ocean_color);
            data.atmosphere.push(t.atmosphere);
            data.roughness.push(t.roughness);
            data.metallic.push(t.metallic);
            data.ambient_occlusion.push(t.ambient_occlusion);
            data.vegetation.push(t.vegetation);
            data.snow.push(t.snow);
            data.detail.push(t.detail);
            data.ocean_specular.push(t.ocean_specular);
            data.atmosphere_mask.push(t.atmosphere_mask);
            data.water_depth.push(t.water_depth);
            data.biome_ids.push(t.biome.as_u8());
            data.material_ids.push(t.biome.material().as_u8());
        }
        data.emissive = match self.emissive {
            Some(params) => {
                emissive_map(heights, self.cache, &self.bank.emissive, params, self.sea_level)
            }
            None => vec![[0.0; 4]; n],
        };
        data
    }

    #[allow(clippy::too_many_arguments)]
    fn texel(
        &self,
        x: usize,
        y: usize,
        h: f32,
        slope: f32,
        river: f32,
        lake: f32,
        raw_ao: f32,
    ) -> Texel {
        let normal = self.cache.normal(x, y);
        let sin_lat = self.cache.sin_lat(y);
        let abs_sin_lat = sin_lat.abs() as f32;
        let is_water = h < self.sea_level;

        let slope = slope.clamp(0.0, 1.0);
        let river = river.clamp(0.0, 1.0);
        let lake = lake.clamp(0.0, 1.0);
        let water_depth = if is_water {
            (self.sea_level - h).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let climate = self.climate.sample(normal, h, sin_lat);
        let temperature = climate.normalized_temperature() as f32;
        let moisture = climate.moisture as f32;
        let humidity = climate.humidity as f32;

        let detail = unit(self.bank.detail.sample_at(normal * DETAIL_FREQUENCY));
        let macro_variation = unit(self.bank.macro_variation.sample_at(normal * MACRO_FREQUENCY));

        let vegetation = vegetation_density(temperature, moisture, slope, river, lake);
        let snow = snow_coverage(temperature, h, self.sea_level, slope, abs_sin_lat);

        let biome = classify_biome(
            &BiomeInputs {
                height: h,
                sea_level: self.sea_level,
                temperature,
                moisture,
                slope,
                river,
                lake,
                snow,
                abs_sin_lat,
                macro_variation,
            },
            self.biomes,
        );

        let shading = shade_biome(
            biome,
            &ShadingInputs {
                vegetation,
                snow,
                detail,
                macro_variation,
                river,
                water_depth,
                sin_lat: sin_lat as f32,
                cos_lat: self.cache.cos_lat(y) as f32,
                is_water,
            },
        );

        let atmosphere_strength = atmosphere_mask(h, self.sea_level, temperature, humidity, abs_sin_lat);
        let [ar, ag, ab] = shading.atmosphere_color;

        Texel {
            albedo: shading.base_color,
            ocean_color: shading.ocean_color,
            atmosphere: [
                ar.clamp(0.0, 1.0),
                ag.clamp(0.0, 1.0),
                ab.clamp(0.0, 1.0),
                atmosphere_strength * ATMOSPHERE_ALPHA,
            ],
            roughness: shading.roughness,
            metallic: shading.metallic,
            ambient_occlusion: (raw_ao * 0.6 + (1.0 - slope * 0.8) * 0.4).clamp(0.0, 1.0),
            vegetation,
            snow,
            detail,
            ocean_specular: shading.ocean_specular,
            atmosphere_mask: atmosphere_strength,
            water_depth,
            biome,
        }
    }
}

#[inline]
fn unit(v: f64) -> f32 {
    ((v + 1.0) * 0.5).clamp(0.0, 1.0) as f32
}

/// Convenience wrapper around [`SurfaceAnalyzer`].
#[allow(clippy::too_many_arguments)]
pub fn analyze_surface(
    heights: &HeightField,
    cache: &CoordinateCache,
    flow: &FlowField,
    hydrology: &HydrologyMasks,
    bank: &NoiseBank,
    climate: &ClimateParams,
    biomes: &BiomeParams,
    sea_level: f32,
) -> SurfaceData {
    SurfaceAnalyzer::new(cache, bank, climate, biomes, sea_level).analyze(heights, flow, hydrology)
}
