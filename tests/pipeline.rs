use planetgen::erosion::HydraulicModel;
use planetgen::geometry::SphericalSampler;
use planetgen::surface::SurfaceChannel;
use planetgen::terrain::sample_elevation;
use planetgen::{generate_planet, NoiseBank, PlanetParams, Preset};

fn small_params() -> PlanetParams {
    let mut params = Preset::Earthlike.params();
    params.thermal.iterations = 4;
    params.hydraulic.iterations = 6;
    params
}

#[test]
fn test_same_seed_is_bit_identical() {
    let params = small_params();
    let a = generate_planet(1234, 64, 32, &params).unwrap();
    let b = generate_planet(1234, 64, 32, &params).unwrap();

    assert_eq!(a.heights, b.heights);
    assert_eq!(a.surface, b.surface);
    assert_eq!(a.flow.unwrap().accumulation, b.flow.unwrap().accumulation);
    assert_eq!(a.hydrology, b.hydrology);
    assert_eq!(a.clouds, b.clouds);
}

#[test]
fn test_thread_count_does_not_change_output() {
    let params = small_params();
    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| generate_planet(77, 64, 32, &params).unwrap());
    let multi = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap()
        .install(|| generate_planet(77, 64, 32, &params).unwrap());

    assert_eq!(single.heights, multi.heights);
    assert_eq!(single.surface, multi.surface);
}

#[test]
fn test_output_ranges() {
    let planet = generate_planet(9, 64, 32, &small_params()).unwrap();

    assert!(planet
        .heights
        .data()
        .iter()
        .all(|h| (-1.0..=1.0).contains(h)));

    let flow = planet.flow.as_ref().unwrap();
    assert!(flow.accumulation.iter().all(|&a| a >= 1));
    let total: usize = (0..flow.len())
        .filter(|&i| flow.is_sink(i))
        .map(|i| flow.accumulation[i] as usize)
        .sum();
    assert_eq!(total, flow.len(), "sink accumulation should equal cell count");

    let surface = planet.surface.as_ref().unwrap();
    for channel in SurfaceChannel::ALL {
        for &v in surface.channel(channel) {
            assert!((0.0..=1.0).contains(&v), "{} = {}", channel.name(), v);
        }
    }
}

#[test]
fn test_height_field_wraps_at_seam() {
    let (w, h) = (64usize, 32usize);
    let sampler = SphericalSampler::new(w, h).unwrap();
    let bank = NoiseBank::new(2024);
    let params = PlanetParams::default();

    for y in 0..h {
        let wrapped = sample_elevation(&bank, sampler.normal(w as f64, y as f64), &params.terrain);
        let first = sample_elevation(&bank, sampler.normal(0.0, y as f64), &params.terrain);
        assert!(
            (wrapped - first).abs() < 1e-9,
            "row {}: column {} gives {} but column 0 gives {}",
            y,
            w,
            wrapped,
            first
        );
    }
}

#[test]
fn test_every_preset_generates() {
    for preset in Preset::ALL {
        let mut params = preset.params();
        params.thermal.iterations = params.thermal.iterations.min(3);
        params.hydraulic.iterations = params.hydraulic.iterations.min(3);
        let planet = generate_planet(5, 32, 16, &params)
            .unwrap_or_else(|e| panic!("{} failed: {}", preset, e));
        let masks = planet.hydrology.as_ref().unwrap();
        if !params.hydrology.rivers_enabled {
            assert!(masks.rivers.iter().all(|&r| r == 0.0), "{} should have no rivers", preset);
        }
    }
}

#[test]
fn test_shallow_water_model_runs() {
    let mut params = small_params();
    params.hydraulic.model = HydraulicModel::ShallowWater;
    let planet = generate_planet(31, 32, 16, &params).unwrap();
    let erosion = planet.erosion.as_ref().unwrap();
    assert!(erosion.water.iter().all(|&w| w >= 0.0));
    assert!(erosion.sediment.iter().all(|&s| s >= 0.0));
}

#[test]
fn test_different_seeds_differ() {
    let params = small_params();
    let a = generate_planet(1, 32, 16, &params).unwrap();
    let b = generate_planet(2, 32, 16, &params).unwrap();
    assert_ne!(a.heights, b.heights);
}
