//! PNG writers for grids and surface channels.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::ExportError;
use crate::terrain::HeightField;

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Height mapped to black in 16-bit height exports.
    pub min_height: f32,
    /// Height mapped to white in 16-bit height exports.
    pub max_height: f32,
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: -1.0,
            max_height: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Options spanning the realized height range of `heights`.
    pub fn auto_range(heights: &HeightField) -> Self {
        let (min, max) = heights.range();
        Self {
            min_height: min,
            max_height: max,
            ..Default::default()
        }
    }
}

#[inline]
pub(crate) fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn check_len(expected: usize, actual: usize) -> Result<(), ExportError> {
    if expected != actual {
        return Err(ExportError::LengthMismatch { expected, actual });
    }
    Ok(())
}

fn write_png(
    path: &Path,
    bytes: &[u8],
    width: usize,
    height: usize,
    color: ExtendedColorType,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(bytes, width as u32, height as u32, color)?;
    Ok(())
}

/// Writes heights as a 16-bit grayscale PNG over `[min_height, max_height]`.
pub fn export_height_png(
    heights: &HeightField,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    let min = options.min_height;
    let range = (options.max_height - min).max(f32::EPSILON);

    let pixels: Vec<u16> = heights
        .data()
        .iter()
        .map(|&h| (((h - min) / range).clamp(0.0, 1.0) * 65535.0).round() as u16)
        .collect();

    let bytes: &[u8] = bytemuck::cast_slice(&pixels);
    write_png(
        path,
        bytes,
        heights.width(),
        heights.height(),
        ExtendedColorType::L16,
        options,
    )
}

/// Writes a `[0, 1]` scalar grid as 8-bit grayscale.
pub fn export_scalar_png(
    values: &[f32],
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), ExportError> {
    check_len(width * height, values.len())?;
    let bytes: Vec<u8> = values.iter().map(|&v| unit_to_u8(v)).collect();
    write_png(path, &bytes, width, height, ExtendedColorType::L8, &PngExportOptions::default())
}

/// Writes a linear `[0, 1]` color grid as 8-bit RGB.
pub fn export_rgb_png(
    values: &[[f32; 3]],
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), ExportError> {
    check_len(width * height, values.len())?;
    let bytes: Vec<u8> = values.iter().flatten().map(|&v| unit_to_u8(v)).collect();
    write_png(path, &bytes, width, height, ExtendedColorType::Rgb8, &PngExportOptions::default())
}

/// Writes a `[0, 1]` RGBA grid as 8-bit RGBA.
pub fn export_rgba_png(
    values: &[[f32; 4]],
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), ExportError> {
    check_len(width * height, values.len())?;
    let bytes: Vec<u8> = values.iter().flatten().map(|&v| unit_to_u8(v)).collect();
    write_png(path, &bytes, width, height, ExtendedColorType::Rgba8, &PngExportOptions::default())
}

/// Writes already-quantized RGB pixels.
pub fn export_rgb8_png(
    pixels: &[[u8; 3]],
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), ExportError> {
    check_len(width * height, pixels.len())?;
    let bytes: &[u8] = bytemuck::cast_slice(pixels);
    write_png(path, bytes, width, height, ExtendedColorType::Rgb8, &PngExportOptions::default())
}

/// Packs ambient occlusion, roughness and metallic into R, G and B.
pub fn export_pbr_pack(
    ambient_occlusion: &[f32],
    roughness: &[f32],
    metallic: &[f32],
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), ExportError> {
    let n = width * height;
    check_len(n, ambient_occlusion.len())?;
    check_len(n, roughness.len())?;
    check_len(n, metallic.len())?;

    let pixels: Vec<[f32; 3]> = ambient_occlusion
        .iter()
        .zip(roughness)
        .zip(metallic)
        .map(|((&ao, &r), &m)| [ao, r, m])
        .collect();
    export_rgb_png(&pixels, width, height, path)
}
