//! Biome classification.
//!
//! A deterministic decision procedure maps per-pixel climate, terrain and
//! hydrology signals to one of eighteen biomes. Each biome carries a stable
//! storage id, a preview color and a coarse material class.

mod config;
mod shading;

pub use config::BiomeParams;
pub use shading::{
    atmosphere_mask, shade_biome, snow_coverage, vegetation_density, BiomeShading, ShadingInputs,
};

/// Biome classification ID. `as_u8()` is stable and used for storage/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    OceanDeep = 0,
    OceanShallow = 1,
    Beach = 2,
    Swamp = 3,
    Riparian = 4,
    Rainforest = 5,
    Forest = 6,
    Taiga = 7,
    Tundra = 8,
    Savanna = 9,
    Semiarid = 10,
    Grassland = 11,
    Shrubland = 12,
    Desert = 13,
    Mountain = 14,
    Volcanic = 15,
    Ice = 16,
    Snow = 17,
}

impl Biome {
    pub const ALL: [Biome; 18] = [
        Biome::OceanDeep,
        Biome::OceanShallow,
        Biome::Beach,
        Biome::Swamp,
        Biome::Riparian,
        Biome::Rainforest,
        Biome::Forest,
        Biome::Taiga,
        Biome::Tundra,
        Biome::Savanna,
        Biome::Semiarid,
        Biome::Grassland,
        Biome::Shrubland,
        Biome::Desert,
        Biome::Mountain,
        Biome::Volcanic,
        Biome::Ice,
        Biome::Snow,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn is_ocean(self) -> bool {
        matches!(self, Biome::OceanDeep | Biome::OceanShallow)
    }

    /// RGB preview color for biome masks.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            Biome::OceanDeep => [0x1A, 0x2A, 0x5A],
            Biome::OceanShallow => [0x2E, 0x6C, 0x88],
            Biome::Beach => [0xE2, 0xD1, 0xA0],
            Biome::Swamp => [0x2F, 0x4B, 0x35],
            Biome::Riparian => [0x2D, 0x6C, 0x3A],
            Biome::Rainforest => [0x2C, 0x5E, 0x3A],
            Biome::Forest => [0x35, 0x66, 0x3B],
            Biome::Taiga => [0x36, 0x53, 0x38],
            Biome::Tundra => [0x84, 0x8F, 0x82],
            Biome::Savanna => [0x9C, 0x8C, 0x46],
            Biome::Semiarid => [0x9A, 0x7B, 0x4C],
            Biome::Grassland => [0x7D, 0xA6, 0x53],
            Biome::Shrubland => [0x9C, 0x8B, 0x60],
            Biome::Desert => [0xE2, 0xBF, 0x7D],
            Biome::Mountain => [0x6E, 0x6C, 0x6F],
            Biome::Volcanic => [0x9D, 0x40, 0x23],
            Biome::Ice => [0xE5, 0xF1, 0xF8],
            Biome::Snow => [0xF3, 0xF6, 0xFA],
        }
    }

    /// Coarse material class of the biome's ground cover.
    pub fn material(self) -> Material {
        match self {
            Biome::OceanDeep => Material::DeepWater,
            Biome::OceanShallow => Material::ShallowWater,
            Biome::Beach | Biome::Desert => Material::Sand,
            Biome::Swamp => Material::Wetland,
            Biome::Riparian | Biome::Rainforest | Biome::Forest | Biome::Taiga => {
                Material::Canopy
            }
            Biome::Grassland | Biome::Savanna => Material::Grass,
            Biome::Tundra | Biome::Semiarid | Biome::Shrubland => Material::Soil,
            Biome::Mountain => Material::Rock,
            Biome::Volcanic => Material::Basalt,
            Biome::Ice => Material::Ice,
            Biome::Snow => Material::Snow,
        }
    }
}

/// Material class ID. `as_u8()` is stable and used for storage/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    DeepWater = 0,
    ShallowWater = 1,
    Sand = 2,
    Wetland = 3,
    Canopy = 4,
    Grass = 5,
    Soil = 6,
    Rock = 7,
    Basalt = 8,
    Ice = 9,
    Snow = 10,
}

impl Material {
    pub const ALL: [Material; 11] = [
        Material::DeepWater,
        Material::ShallowWater,
        Material::Sand,
        Material::Wetland,
        Material::Canopy,
        Material::Grass,
        Material::Soil,
        Material::Rock,
        Material::Basalt,
        Material::Ice,
        Material::Snow,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// RGB preview color for material masks.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            Material::DeepWater => [0x20, 0x30, 0x50],
            Material::ShallowWater => [0x2A, 0x6B, 0x76],
            Material::Sand => [0xE0, 0xC0, 0x7A],
            Material::Wetland => [0x32, 0x41, 0x32],
            Material::Canopy => [0x29, 0x53, 0x32],
            Material::Grass => [0x5F, 0x7D, 0x3C],
            Material::Soil => [0x85, 0x63, 0x3F],
            Material::Rock => [0x54, 0x53, 0x54],
            Material::Basalt => [0x5B, 0x2E, 0x28],
            Material::Ice => [0xDC, 0xEC, 0xF2],
            Material::Snow => [0xE9, 0xF0, 0xF6],
        }
    }
}

/// Per-pixel signals consumed by [`classify_biome`].
///
/// Temperature is normalized to `[0, 1]`; every other signal is in `[0, 1]`
/// except the raw height and sea level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeInputs {
    pub height: f32,
    pub sea_level: f32,
    pub temperature: f32,
    pub moisture: f32,
    pub slope: f32,
    pub river: f32,
    pub lake: f32,
    pub snow: f32,
    pub abs_sin_lat: f32,
    pub macro_variation: f32,
}

impl BiomeInputs {
    pub fn is_water(&self) -> bool {
        self.height < self.sea_level
    }
}

/// Classifies one pixel. Checks run in a fixed priority order: water depth,
/// snow, lakes, rivers, relief, then temperature and moisture bands.
pub fn classify_biome(inputs: &BiomeInputs, params: &BiomeParams) -> Biome {
    let i = inputs;
    let p = params;

    if i.is_water() {
        if i.height < i.sea_level - p.deep_ocean_depth {
            return Biome::OceanDeep;
        }
        if i.height < i.sea_level - p.shallow_ocean_depth {
            return Biome::OceanShallow;
        }
        return Biome::Beach;
    }

    if i.snow > p.snow_threshold {
        return if i.temperature < p.cold_temperature {
            Biome::Snow
        } else {
            Biome::Ice
        };
    }
    if i.lake > p.swamp_lake_threshold {
        return Biome::Swamp;
    }
    if i.river > p.riparian_river_threshold && i.moisture > p.riparian_moisture {
        return Biome::Riparian;
    }
    if i.slope > p.mountain_slope || i.height > i.sea_level + p.mountain_height {
        return Biome::Mountain;
    }

    if i.temperature < p.cold_temperature {
        return if i.moisture > 0.45 {
            Biome::Taiga
        } else {
            Biome::Tundra
        };
    }
    if i.temperature < p.temperate_temperature {
        return if i.moisture > 0.6 {
            Biome::Forest
        } else if i.moisture > 0.35 {
            Biome::Grassland
        } else {
            Biome::Shrubland
        };
    }

    if i.moisture > 0.75 {
        Biome::Rainforest
    } else if i.moisture > 0.55 {
        Biome::Savanna
    } else if i.moisture > 0.35 {
        Biome::Semiarid
    } else if i.temperature > p.volcanic_temperature && i.macro_variation > p.volcanic_macro {
        Biome::Volcanic
    } else {
        Biome::Desert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn land() -> BiomeInputs {
        BiomeInputs {
            height: 0.2,
            sea_level: 0.0,
            temperature: 0.6,
            moisture: 0.2,
            slope: 0.1,
            river: 0.0,
            lake: 0.0,
            snow: 0.0,
            abs_sin_lat: 0.2,
            macro_variation: 0.3,
        }
    }

    fn classify(inputs: BiomeInputs) -> Biome {
        classify_biome(&inputs, &BiomeParams::default())
    }

    #[test]
    fn test_water_bands() {
        assert_eq!(classify(BiomeInputs { height: -0.5, ..land() }), Biome::OceanDeep);
        assert_eq!(classify(BiomeInputs { height: -0.1, ..land() }), Biome::OceanShallow);
        assert_eq!(classify(BiomeInputs { height: -0.01, ..land() }), Biome::Beach);
    }

    #[test]
    fn test_priority_order() {
        // Snow outranks a lake, which outranks a river.
        let wet = BiomeInputs {
            snow: 0.7,
            lake: 1.0,
            river: 1.0,
            moisture: 0.9,
            ..land()
        };
        assert_eq!(classify(BiomeInputs { temperature: 0.1, ..wet }), Biome::Snow);
        assert_eq!(classify(wet), Biome::Ice);
        assert_eq!(classify(BiomeInputs { snow: 0.0, ..wet }), Biome::Swamp);
        assert_eq!(
            classify(BiomeInputs {
                snow: 0.0,
                lake: 0.0,
                ..wet
            }),
            Biome::Riparian
        );
    }

    #[test]
    fn test_relief_makes_mountains() {
        assert_eq!(classify(BiomeInputs { slope: 0.8, ..land() }), Biome::Mountain);
        assert_eq!(classify(BiomeInputs { height: 0.6, ..land() }), Biome::Mountain);
    }

    #[test]
    fn test_climate_bands() {
        let cold = BiomeInputs { temperature: 0.1, ..land() };
        assert_eq!(classify(BiomeInputs { moisture: 0.5, ..cold }), Biome::Taiga);
        assert_eq!(classify(cold), Biome::Tundra);

        let temperate = BiomeInputs { temperature: 0.4, ..land() };
        assert_eq!(classify(BiomeInputs { moisture: 0.7, ..temperate }), Biome::Forest);
        assert_eq!(classify(BiomeInputs { moisture: 0.4, ..temperate }), Biome::Grassland);
        assert_eq!(classify(temperate), Biome::Shrubland);

        assert_eq!(classify(BiomeInputs { moisture: 0.8, ..land() }), Biome::Rainforest);
        assert_eq!(classify(BiomeInputs { moisture: 0.6, ..land() }), Biome::Savanna);
        assert_eq!(classify(BiomeInputs { moisture: 0.4, ..land() }), Biome::Semiarid);
        assert_eq!(classify(land()), Biome::Desert);
        assert_eq!(
            classify(BiomeInputs {
                temperature: 0.9,
                macro_variation: 0.7,
                ..land()
            }),
            Biome::Volcanic
        );
    }

    #[test]
    fn test_ids_round_trip() {
        for biome in Biome::ALL {
            assert_eq!(Biome::from_u8(biome.as_u8()), Some(biome));
        }
        assert_eq!(Biome::from_u8(18), None);
    }

    #[test]
    fn test_materials() {
        assert_eq!(Biome::OceanDeep.material(), Material::DeepWater);
        assert_eq!(Biome::Desert.material(), Biome::Beach.material());
        assert_eq!(Biome::Volcanic.material().as_u8(), 8);
    }
}
