//! Planetgen CLI - deterministic procedural planet generator.
//!
//! Generates an equirectangular height field, erodes it, extracts rivers and
//! lakes, classifies surface materials and writes the layers as PNG files.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use planetgen::biomes::Biome;
use planetgen::config::Preset;
use planetgen::erosion::HydraulicModel;
use planetgen::export::{export_maps, ExportMap};
use planetgen::pipeline::Pipeline;
use planetgen::terrain::Planet;

/// Deterministic procedural planet generator.
#[derive(Parser)]
#[command(name = "planetgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a planet and export its layers.
    Generate {
        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Grid width in pixels.
        #[arg(short, long, default_value = "1024")]
        width: usize,

        /// Grid height in pixels; must be exactly half the width.
        #[arg(long)]
        height: Option<usize>,

        /// Planet style.
        #[arg(short, long, value_enum, default_value = "earthlike")]
        preset: PresetArg,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        out: PathBuf,

        /// Layers to export (repeatable). Defaults to height, albedo and normal.
        #[arg(short, long, value_enum)]
        export: Vec<MapArg>,

        /// Export every available layer.
        #[arg(long)]
        export_all: bool,

        /// Override the preset's thermal erosion iterations.
        #[arg(long)]
        thermal_iters: Option<u32>,

        /// Override the preset's hydraulic erosion iterations.
        #[arg(long)]
        hydraulic_iters: Option<u32>,

        /// Hydraulic erosion model.
        #[arg(long, value_enum, default_value = "steepest-descent")]
        hydraulic_model: ModelArg,
    },

    /// Display grid and memory information for a width.
    Info {
        /// Grid width in pixels.
        #[arg(short, long, default_value = "1024")]
        width: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Earthlike,
    Desert,
    Ice,
    Lava,
    Alien,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Earthlike => Preset::Earthlike,
            PresetArg::Desert => Preset::Desert,
            PresetArg::Ice => Preset::Ice,
            PresetArg::Lava => Preset::Lava,
            PresetArg::Alien => Preset::Alien,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    /// Single-outlet routing over the flow field.
    SteepestDescent,
    /// Four-way virtual-pipe flux.
    ShallowWater,
}

impl From<ModelArg> for HydraulicModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::SteepestDescent => HydraulicModel::SteepestDescent,
            ModelArg::ShallowWater => HydraulicModel::ShallowWater,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MapArg {
    Height,
    Albedo,
    Normal,
    Pbr,
    Roughness,
    Metallic,
    Ao,
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

impl From<MapArg> for ExportMap {
    fn from(arg: MapArg) -> Self {
        match arg {
            MapArg::Height => ExportMap::Height,
            MapArg::Albedo => ExportMap::Albedo,
            MapArg::Normal => ExportMap::Normal,
            MapArg::Pbr => ExportMap::Pbr,
            MapArg::Roughness => ExportMap::Roughness,
            MapArg::Metallic => ExportMap::Metallic,
            MapArg::Ao => ExportMap::AmbientOcclusion,
            MapArg::Vegetation => ExportMap::Vegetation,
            MapArg::Snow => ExportMap::Snow,
            MapArg::Detail => ExportMap::Detail,
            MapArg::OceanSpecular => ExportMap::OceanSpecular,
            MapArg::OceanColor => ExportMap::OceanColor,
            MapArg::Atmosphere => ExportMap::Atmosphere,
            MapArg::AtmosphereMask => ExportMap::AtmosphereMask,
            MapArg::Emissive => ExportMap::Emissive,
            MapArg::WaterDepth => ExportMap::WaterDepth,
            MapArg::Biomes => ExportMap::Biomes,
            MapArg::Materials => ExportMap::Materials,
            MapArg::Rivers => ExportMap::Rivers,
            MapArg::Lakes => ExportMap::Lakes,
            MapArg::Clouds => ExportMap::Clouds,
        }
    }
}

struct GenerateArgs {
    seed: Option<u64>,
    width: usize,
    height: Option<usize>,
    preset: Preset,
    out: PathBuf,
    maps: Vec<ExportMap>,
    thermal_iters: Option<u32>,
    hydraulic_iters: Option<u32>,
    hydraulic_model: HydraulicModel,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("planetgen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            seed,
            width,
            height,
            preset,
            out,
            export,
            export_all,
            thermal_iters,
            hydraulic_iters,
            hydraulic_model,
        } => {
            let maps = if export_all {
                ExportMap::ALL.to_vec()
            } else if export.is_empty() {
                vec![ExportMap::Height, ExportMap::Albedo, ExportMap::Normal]
            } else {
                export.into_iter().map(ExportMap::from).collect()
            };
            run_generate(GenerateArgs {
                seed,
                width,
                height,
                preset: preset.into(),
                out,
                maps,
                thermal_iters,
                hydraulic_iters,
                hydraulic_model: hydraulic_model.into(),
            })
        }
        Commands::Info { width } => run_info(width),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let width = args.width;
    let height = args.height.unwrap_or(width / 2);
    if width == 0 || width % 2 != 0 || height * 2 != width {
        return Err(format!(
            "grid must be 2:1 with an even width, got {}x{}",
            width, height
        ));
    }

    let seed = args.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64)
    });

    let mut params = args.preset.params();
    if let Some(iters) = args.thermal_iters {
        params.thermal.iterations = iters;
    }
    if let Some(iters) = args.hydraulic_iters {
        params.hydraulic.iterations = iters;
    }
    params.hydraulic.model = args.hydraulic_model;

    println!("Planetgen - Procedural Planet Generator");
    println!("=======================================");
    println!("Grid: {}x{}", width, height);
    println!("Seed: {}", seed);
    println!("Preset: {}", args.preset);
    println!("Output: {}", args.out.display());

    let start = Instant::now();
    let mut planet = Planet::new(width, height, seed).map_err(|e| e.to_string())?;
    let pipeline = Pipeline::standard(params.clone());

    println!("\nRunning generation pipeline...");
    pipeline
        .run_with_callbacks(
            &mut planet,
            |name, i, total| println!("  [{}/{}] Starting: {}", i + 1, total, name),
            |name, i, total| println!("  [{}/{}] Completed: {}", i + 1, total, name),
        )
        .map_err(|e| format!("generation failed: {}", e))?;

    println!("Generation completed in {:.2?}", start.elapsed());

    let (min_h, max_h) = planet.height_range();
    println!("Height range: [{:.4}, {:.4}]", min_h, max_h);
    println!(
        "Ocean fraction: {:.1}%",
        planet.ocean_fraction(params.terrain.sea_level) * 100.0
    );
    if let Some(surface) = &planet.surface {
        let histogram = surface.biome_histogram();
        let total = surface.len().max(1) as f32;
        println!("Biomes:");
        for biome in Biome::ALL {
            let count = histogram[biome.as_u8() as usize];
            if count > 0 {
                println!("  {:<14} {:>5.1}%", format!("{:?}", biome), count as f32 / total * 100.0);
            }
        }
    }

    println!("\nExporting {} layer(s)...", args.maps.len());
    let export_start = Instant::now();
    let written = export_maps(&planet, &args.maps, &args.out).map_err(|e| e.to_string())?;
    for path in &written {
        println!("  Exported: {}", path.display());
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
    Ok(())
}

fn run_info(width: usize) -> Result<(), String> {
    if width == 0 || width % 2 != 0 {
        return Err(format!("width must be a positive even number, got {}", width));
    }
    let height = width / 2;
    let pixels = (width as u64) * (height as u64);

    let mb = |bytes: u64| bytes as f64 / 1024.0 / 1024.0;
    let bytes_heights = pixels * 4;
    let bytes_flow = pixels * (4 + 4 + 4 + 2);
    let bytes_hydrology = pixels * (4 + 4 + 4);
    let bytes_surface = pixels * (3 * 4 * 2 + 4 * 4 * 2 + 9 * 4 + 2);
    let bytes_clouds = pixels * 4;
    let total = bytes_heights + bytes_flow + bytes_hydrology + bytes_surface + bytes_clouds;

    println!("Planetgen - Grid Configuration Info");
    println!("===================================");
    println!();
    println!("Grid: {}x{} ({} pixels)", width, height, pixels);
    println!(
        "Pixel size at equator: {:.4} degrees",
        360.0 / width as f64
    );
    println!();
    println!("Memory usage (in-memory):");
    println!("  Heights:    {:>12} bytes ({:.2} MB)", bytes_heights, mb(bytes_heights));
    println!("  Flow field: {:>12} bytes ({:.2} MB)", bytes_flow, mb(bytes_flow));
    println!("  Hydrology:  {:>12} bytes ({:.2} MB)", bytes_hydrology, mb(bytes_hydrology));
    println!("  Surface:    {:>12} bytes ({:.2} MB)", bytes_surface, mb(bytes_surface));
    println!("  Clouds:     {:>12} bytes ({:.2} MB)", bytes_clouds, mb(bytes_clouds));
    println!("  Total:      {:>12} bytes ({:.2} MB)", total, mb(total));
    println!();
    println!("Export file sizes (uncompressed):");
    println!("  Height (16-bit gray): {:>10} bytes", pixels * 2);
    println!("  Scalar (8-bit gray):  {:>10} bytes", pixels);
    println!("  Color (8-bit RGB):    {:>10} bytes", pixels * 3);
    println!();
    println!("Presets:");
    for preset in Preset::ALL {
        let p = preset.params();
        println!(
            "  {:<10} sea {:>5.2}  thermal {:>3}  hydraulic {:>3}  rivers {:<3}  emissive {}",
            preset.name(),
            p.terrain.sea_level,
            p.thermal.iterations,
            p.hydraulic.iterations,
            if p.hydrology.rivers_enabled { "on" } else { "off" },
            p.emissive.kind.name()
        );
    }
    Ok(())
}
