//! Export of planet layers to PNG files.
//!
//! Height goes out as 16-bit grayscale; scalar channels as 8-bit grayscale;
//! colors, id masks and the packed AO/roughness/metallic texture as 8-bit RGB(A).

mod png;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use png::{
    export_height_png, export_pbr_pack, export_rgb8_png, export_rgb_png, export_rgba_png,
    export_scalar_png, PngExportOptions,
};

use crate::biomes::{Biome, Material};
use crate::surface::{encode_normal, normal_map, SurfaceChannel, SurfaceData};
use crate::terrain::Planet;

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Buffer length mismatch: expected {expected} pixels, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Layer '{0}' has not been generated")]
    MissingLayer(&'static str),
}

/// Every layer that can be written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportMap {
    Height,
    Albedo,
    Normal,
    Pbr,
    Roughness,
    Metallic,
    AmbientOcclusion,
    Vegetation,
    Snow,
    Detail,
    OceanSpecular,
    OceanColor,
    Atmosphere,
    AtmosphereMask,
    Emissive,
    WaterDepth,
    Biomes,
    Materials,
    Rivers,
    Lakes,
    Clouds,
}

impl ExportMap {
    pub const ALL: [ExportMap; 21] = [
        ExportMap::Height,
        ExportMap::Albedo,
        ExportMap::Normal,
        ExportMap::Pbr,
        ExportMap::Roughness,
        ExportMap::Metallic,
        ExportMap::AmbientOcclusion,
        ExportMap::Vegetation,
        ExportMap::Snow,
        ExportMap::Detail,
        ExportMap::OceanSpecular,
        ExportMap::OceanColor,
        ExportMap::Atmosphere,
        ExportMap::AtmosphereMask,
        ExportMap::Emissive,
        ExportMap::WaterDepth,
        ExportMap::Biomes,
        ExportMap::Materials,
        ExportMap::Rivers,
        ExportMap::Lakes,
        ExportMap::Clouds,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ExportMap::Height => "height.png",
            ExportMap::Albedo => "albedo.png",
            ExportMap::Normal => "normal.png",
            ExportMap::Pbr => "pbr_ao_rough_metal.png",
            ExportMap::Roughness => "roughness.png",
            ExportMap::Metallic => "metallic.png",
            ExportMap::AmbientOcclusion => "ao.png",
            ExportMap::Vegetation => "vegetation.png",
            ExportMap::Snow => "snow.png",
            ExportMap::Detail => "detail.png",
            ExportMap::OceanSpecular => "ocean_specular.png",
            ExportMap::OceanColor => "ocean_color.png",
            ExportMap::Atmosphere => "atmosphere.png",
            ExportMap::AtmosphereMask => "atmosphere_mask.png",
            ExportMap::Emissive => "emissive.png",
            ExportMap::WaterDepth => "water_depth.png",
            ExportMap::Biomes => "biomes.png",
            ExportMap::Materials => "materials.png",
            ExportMap::Rivers => "rivers.png",
            ExportMap::Lakes => "lakes.png",
            ExportMap::Clouds => "clouds.png",
        }
    }
}

fn surface(planet: &Planet) -> Result<&SurfaceData, ExportError> {
    planet.surface.as_ref().ok_or(ExportError::MissingLayer("surface"))
}

/// Writes one layer into `dir` and returns the file path.
pub fn export_map(planet: &Planet, map: ExportMap, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(map.file_name());
    let (w, h) = (planet.width(), planet.height());

    let scalar = |channel: SurfaceChannel| -> Result<(), ExportError> {
        export_scalar_png(surface(planet)?.channel(channel), w, h, &path)
    };

    match map {
        ExportMap::Roughness => scalar(SurfaceChannel::Roughness)?,
        ExportMap::Metallic => scalar(SurfaceChannel::Metallic)?,
        ExportMap::AmbientOcclusion => scalar(SurfaceChannel::AmbientOcclusion)?,
        ExportMap::Vegetation => scalar(SurfaceChannel::Vegetation)?,
        ExportMap::Snow => scalar(SurfaceChannel::Snow)?,
        ExportMap::Detail => scalar(SurfaceChannel::Detail)?,
        ExportMap::OceanSpecular => scalar(SurfaceChannel::OceanSpecular)?,
        ExportMap::AtmosphereMask => scalar(SurfaceChannel::AtmosphereMask)?,
        ExportMap::WaterDepth => scalar(SurfaceChannel::WaterDepth)?,
        ExportMap::Height => {
            export_height_png(&planet.heights, &path, &PngExportOptions::default())?;
        }
        ExportMap::Albedo => export_rgb_png(&surface(planet)?.albedo, w, h, &path)?,
        ExportMap::OceanColor => export_rgb_png(&surface(planet)?.ocean_color, w, h, &path)?,
        ExportMap::Atmosphere => export_rgba_png(&surface(planet)?.atmosphere, w, h, &path)?,
        ExportMap::Emissive => export_rgba_png(&surface(planet)?.emissive, w, h, &path)?,
        ExportMap::Normal => {
            let normals: Vec<[f32; 3]> = normal_map(&planet.heights, &planet.cache)
                .into_iter()
                .map(encode_normal)
                .collect();
            export_rgb_png(&normals, w, h, &path)?;
        }
        ExportMap::Pbr => {
            let s = surface(planet)?;
            export_pbr_pack(&s.ambient_occlusion, &s.roughness, &s.metallic, w, h, &path)?;
        }
        ExportMap::Biomes => {
            let pixels: Vec<[u8; 3]> = surface(planet)?
                .biome_ids
                .iter()
                .map(|&id| Biome::from_u8(id).map_or([0, 0, 0], Biome::preview_rgb))
                .collect();
            export_rgb8_png(&pixels, w, h, &path)?;
        }
        ExportMap::Materials => {
            let pixels: Vec<[u8; 3]> = surface(planet)?
                .material_ids
                .iter()
                .map(|&id| Material::from_u8(id).map_or([0, 0, 0], Material::preview_rgb))
                .collect();
            export_rgb8_png(&pixels, w, h, &path)?;
        }
        ExportMap::Rivers | ExportMap::Lakes => {
            let masks = planet
                .hydrology
                .as_ref()
                .ok_or(ExportError::MissingLayer("hydrology"))?;
            let values = if map == ExportMap::Rivers {
                &masks.rivers
            } else {
                &masks.lakes
            };
            export_scalar_png(values, w, h, &path)?;
        }
        ExportMap::Clouds => {
            let clouds = planet
                .clouds
                .as_ref()
                .ok_or(ExportError::MissingLayer("clouds"))?;
            export_scalar_png(clouds.alpha(), w, h, &path)?;
        }
    }

    tracing::debug!(path = %path.display(), "exported layer");
    Ok(path)
}

/// Writes several layers, creating `dir` first.
pub fn export_maps(
    planet: &Planet,
    maps: &[ExportMap],
    dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;
    maps.iter().map(|&map| export_map(planet, map, dir)).collect()
}
