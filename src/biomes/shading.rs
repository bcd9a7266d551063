//! Continuous surface signals and per-biome shading.

use super::Biome;

#[inline]
fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Vegetation density in `[0, 1]`.
///
/// Peaks around a mild normalized temperature (0.65), scales with moisture,
/// thins on steep slopes and gets a boost next to rivers and lakes.
pub fn vegetation_density(temperature: f32, moisture: f32, slope: f32, river: f32, lake: f32) -> f32 {
    let thermal = clamp01(1.0 - (temperature - 0.65).abs() * 1.4);
    let base = clamp01(moisture * thermal);
    let water_boost = clamp01(river * 0.6 + lake * 0.4);
    let slope_penalty = 1.0 - clamp01(slope * 1.5);
    clamp01(base * slope_penalty + water_boost * 0.4)
}

/// Snow coverage in `[0, 1]`: the strongest of altitude, polar and cold terms,
/// reduced on steep slopes.
pub fn snow_coverage(temperature: f32, height: f32, sea_level: f32, slope: f32, abs_sin_lat: f32) -> f32 {
    let altitude = clamp01((height - sea_level) * 1.4);
    let polar = clamp01((abs_sin_lat - 0.65) * 1.2);
    let cold = clamp01((0.18 - temperature) * 2.0);
    let slope_penalty = 1.0 - clamp01(slope * 1.1);
    clamp01(altitude.max(polar).max(cold) * slope_penalty)
}

/// Atmospheric haze strength in `[0, 1]`.
pub fn atmosphere_mask(height: f32, sea_level: f32, temperature: f32, humidity: f32, abs_sin_lat: f32) -> f32 {
    let altitude = clamp01((height - sea_level) * 0.9);
    let polar_glow = clamp01((abs_sin_lat - 0.55) * 0.9);
    let dryness = clamp01(1.0 - humidity);
    let cold = clamp01((0.35 - temperature) * 1.1);
    clamp01((altitude * 0.45 + dryness * 0.15).max(polar_glow * 0.35 + cold * 0.25))
}

/// Per-pixel signals consumed by [`shade_biome`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingInputs {
    pub vegetation: f32,
    pub snow: f32,
    /// Detail noise in `[0, 1]`.
    pub detail: f32,
    /// Macro variation in `[0, 1]`.
    pub macro_variation: f32,
    pub river: f32,
    pub water_depth: f32,
    pub sin_lat: f32,
    pub cos_lat: f32,
    pub is_water: bool,
}

/// Linear colors and PBR scalars for one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeShading {
    pub base_color: [f32; 3],
    pub roughness: f32,
    pub metallic: f32,
    pub ocean_specular: f32,
    pub ocean_color: [f32; 3],
    pub atmosphere_color: [f32; 3],
}

/// Shades a classified pixel.
///
/// The biome sets a base color, roughness and metallic value. Modifiers then
/// apply in order: vegetation tint (land only), snow whitening, detail jitter
/// and polar desaturation (land only). All outputs are clamped to `[0, 1]`.
pub fn shade_biome(biome: Biome, s: &ShadingInputs) -> BiomeShading {
    let d = s.detail;
    let mut roughness = 0.6;
    let mut metallic = 0.02;
    let mut ocean_specular = 0.0;
    let mut ocean_tint: Option<[f32; 3]> = None;

    let mut c: [f32; 3] = match biome {
        Biome::OceanDeep => {
            let depth = clamp01(s.water_depth / 0.5);
            let shallow = 1.0 - depth;
            let cold_bias = clamp01(s.sin_lat.abs() * 0.6);
            metallic = 0.0;
            roughness = 0.05 + 0.05 * depth;
            ocean_specular = clamp01(0.25 + s.cos_lat * s.cos_lat * 0.55);
            ocean_tint = Some([40.0, 50.0, 80.0]);
            [
                0.04 + 0.03 * shallow,
                0.11 + 0.18 * shallow,
                0.25 + 0.4 * shallow + cold_bias * 0.12,
            ]
        }
        Biome::OceanShallow => {
            let shallow = 1.0 - clamp01(s.water_depth / 0.2);
            metallic = 0.0;
            roughness = 0.08;
            ocean_specular = clamp01(0.35 + s.cos_lat * s.cos_lat * 0.45);
            ocean_tint = Some([30.0, 40.0, 60.0]);
            [
                0.12 + 0.08 * shallow,
                0.32 + 0.25 * shallow,
                0.42 + 0.35 * shallow,
            ]
        }
        Biome::Beach => {
            roughness = 0.55;
            metallic = 0.0;
            [0.78 + d * 0.06, 0.71 + d * 0.04, 0.56 + d * 0.02]
        }
        Biome::Swamp => {
            roughness = 0.72;
            [0.24, 0.33 + s.vegetation * 0.2, 0.24]
        }
        Biome::Riparian => {
            roughness = 0.48;
            [0.19, 0.36 + s.river * 0.15, 0.24]
        }
        Biome::Rainforest => {
            roughness = 0.42;
            [0.16, 0.38 + s.vegetation * 0.2, 0.22 + s.vegetation * 0.1]
        }
        Biome::Forest => {
            roughness = 0.5;
            metallic = 0.025;
            [0.24, 0.45 + s.vegetation * 0.1, 0.28 + s.vegetation * 0.05]
        }
        Biome::Taiga => {
            roughness = 0.56;
            [0.22, 0.38 + s.snow * 0.2, 0.24 + s.snow * 0.05]
        }
        Biome::Tundra => {
            roughness = 0.7;
            metallic = 0.01;
            [0.53 + s.vegetation * 0.05, 0.55 + s.vegetation * 0.08, 0.5]
        }
        Biome::Savanna => {
            roughness = 0.58;
            metallic = 0.015;
            [0.58, 0.52 + s.vegetation * 0.1, 0.28]
        }
        Biome::Semiarid => {
            roughness = 0.65;
            metallic = 0.015;
            [0.55, 0.48, 0.32]
        }
        Biome::Grassland => {
            roughness = 0.55;
            metallic = 0.015;
            [0.45, 0.57 + s.vegetation * 0.12, 0.32]
        }
        Biome::Shrubland => {
            roughness = 0.63;
            [0.52, 0.48, 0.36]
        }
        Biome::Desert => {
            roughness = 0.8;
            metallic = 0.008;
            [0.78 + d * 0.08, 0.68 + d * 0.05, 0.45 + d * 0.03]
        }
        Biome::Mountain => {
            roughness = 0.72;
            metallic = 0.03;
            [0.42 + d * 0.08, 0.41 + d * 0.08, 0.43 + d * 0.08]
        }
        Biome::Volcanic => {
            let m = s.macro_variation;
            let glow = clamp01(m * 0.6);
            metallic = 0.18;
            roughness = 0.4;
            [0.35 + m * 0.2 + glow * 0.4, 0.18 + glow * 0.1, 0.1]
        }
        Biome::Ice => {
            roughness = 0.78;
            metallic = 0.0;
            [0.86, 0.9, 0.95]
        }
        Biome::Snow => {
            roughness = 0.74;
            metallic = 0.0;
            [0.92, 0.94, 0.97]
        }
    };

    let ocean_color = ocean_tint.map(|tint| {
        [
            clamp01(c[0] + ocean_specular * tint[0] / 255.0),
            clamp01(c[1] + ocean_specular * tint[1] / 255.0),
            clamp01(c[2] + ocean_specular * tint[2] / 255.0),
        ]
    });

    if !s.is_water {
        let tint = s.vegetation * 0.6;
        c = [mix(c[0], 0.18, tint), mix(c[1], 0.32, tint), mix(c[2], 0.18, tint)];
    }

    if s.snow > 0.0 {
        c = [mix(c[0], 0.96, s.snow), mix(c[1], 0.97, s.snow), mix(c[2], 0.98, s.snow)];
    }

    let strength = if s.is_water { 0.02 } else { 0.08 };
    let jitter = (d - 0.5) * strength;
    c = [
        clamp01(c[0] + jitter),
        clamp01(c[1] + jitter * 0.8),
        clamp01(c[2] + jitter * 0.6),
    ];

    let polar = clamp01(s.sin_lat.abs() * 0.9 - 0.45);
    if !s.is_water && polar > 0.0 {
        let desat = polar * 0.1;
        let avg = (c[0] + c[1] + c[2]) / 3.0;
        c = c.map(|v| mix(v, avg, desat));
    }

    BiomeShading {
        base_color: c,
        roughness: clamp01(roughness),
        metallic: clamp01(metallic),
        ocean_specular,
        ocean_color: ocean_color.unwrap_or(c),
        atmosphere_color: [0.3 + polar * 0.08, 0.42 + polar * 0.12, 0.65 + polar * 0.1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ShadingInputs {
        ShadingInputs {
            vegetation: 0.4,
            snow: 0.0,
            detail: 0.5,
            macro_variation: 0.5,
            river: 0.0,
            water_depth: 0.0,
            sin_lat: 0.3,
            cos_lat: (1.0f32 - 0.09).sqrt(),
            is_water: false,
        }
    }

    #[test]
    fn test_vegetation_range_and_shape() {
        assert!(vegetation_density(0.65, 1.0, 0.0, 0.0, 0.0) > vegetation_density(0.1, 1.0, 0.0, 0.0, 0.0));
        assert!(vegetation_density(0.65, 0.8, 0.9, 0.0, 0.0) < vegetation_density(0.65, 0.8, 0.0, 0.0, 0.0));
        assert!(vegetation_density(0.0, 0.0, 1.0, 1.0, 1.0) > 0.0, "water should boost vegetation");
        for t in 0..=10 {
            for m in 0..=10 {
                let v = vegetation_density(t as f32 / 10.0, m as f32 / 10.0, 0.3, 0.5, 0.5);
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_snow_terms() {
        assert_eq!(snow_coverage(0.6, 0.0, 0.0, 0.0, 0.0), 0.0);
        assert!(snow_coverage(0.6, 0.9, 0.0, 0.0, 0.0) > 0.9);
        assert!(snow_coverage(0.6, 0.0, 0.0, 0.0, 0.99) > 0.3);
        assert!(snow_coverage(0.0, 0.0, 0.0, 0.0, 0.0) > 0.3);
        assert_eq!(snow_coverage(0.0, 1.0, 0.0, 1.0, 1.0), 0.0, "cliffs shed snow");
    }

    #[test]
    fn test_atmosphere_mask_range() {
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            let v = atmosphere_mask(t * 2.0 - 1.0, 0.0, t, 1.0 - t, t);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_all_biomes_shade_in_range() {
        for biome in Biome::ALL {
            let s = ShadingInputs {
                is_water: biome.is_ocean() || biome == Biome::Beach,
                water_depth: if biome.is_ocean() { 0.3 } else { 0.0 },
                snow: 0.2,
                detail: 0.9,
                ..inputs()
            };
            let out = shade_biome(biome, &s);
            for v in out
                .base_color
                .iter()
                .chain(&out.ocean_color)
                .chain(&out.atmosphere_color)
                .chain([&out.roughness, &out.metallic, &out.ocean_specular])
            {
                assert!((0.0..=1.0).contains(v), "{:?} produced {}", biome, v);
            }
        }
    }

    #[test]
    fn test_ocean_specular_peaks_at_equator() {
        let equator = ShadingInputs {
            is_water: true,
            water_depth: 0.4,
            sin_lat: 0.0,
            cos_lat: 1.0,
            ..inputs()
        };
        let polar = ShadingInputs {
            sin_lat: 0.95,
            cos_lat: (1.0f32 - 0.9025).sqrt(),
            ..equator
        };
        let a = shade_biome(Biome::OceanDeep, &equator);
        let b = shade_biome(Biome::OceanDeep, &polar);
        assert!((a.ocean_specular - 0.8).abs() < 1e-6);
        assert!(b.ocean_specular < a.ocean_specular);
        assert_ne!(a.ocean_color, a.base_color);
    }

    #[test]
    fn test_snow_whitens() {
        let bare = shade_biome(Biome::Tundra, &inputs());
        let snowy = shade_biome(Biome::Tundra, &ShadingInputs { snow: 0.9, ..inputs() });
        let brightness = |c: [f32; 3]| c.iter().sum::<f32>();
        assert!(brightness(snowy.base_color) > brightness(bare.base_color));
    }
}
