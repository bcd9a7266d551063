use planetgen::export::{export_map, export_maps, ExportError, ExportMap};
use planetgen::terrain::Planet;
use planetgen::{generate_planet, Preset};
use tempfile::tempdir;

fn planet() -> Planet {
    let mut params = Preset::Earthlike.params();
    params.thermal.iterations = 2;
    params.hydraulic.iterations = 2;
    generate_planet(42, 32, 16, &params).unwrap()
}

#[test]
fn test_every_layer_round_trips_through_png() {
    let planet = planet();
    let dir = tempdir().unwrap();
    let written = export_maps(&planet, &ExportMap::ALL, dir.path()).unwrap();
    assert_eq!(written.len(), ExportMap::ALL.len());

    for (map, path) in ExportMap::ALL.iter().zip(&written) {
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(map.file_name()));
        let img = image::open(path).unwrap_or_else(|e| panic!("{:?}: {}", map, e));
        assert_eq!((img.width(), img.height()), (32, 16), "{:?} has wrong size", map);
    }
}

#[test]
fn test_color_types_match_layer_kind() {
    let planet = planet();
    let dir = tempdir().unwrap();

    let height = image::open(export_map(&planet, ExportMap::Height, dir.path()).unwrap()).unwrap();
    assert_eq!(height.color(), image::ColorType::L16);

    let snow = image::open(export_map(&planet, ExportMap::Snow, dir.path()).unwrap()).unwrap();
    assert_eq!(snow.color(), image::ColorType::L8);

    let albedo = image::open(export_map(&planet, ExportMap::Albedo, dir.path()).unwrap()).unwrap();
    assert_eq!(albedo.color(), image::ColorType::Rgb8);

    let atmosphere =
        image::open(export_map(&planet, ExportMap::Atmosphere, dir.path()).unwrap()).unwrap();
    assert_eq!(atmosphere.color(), image::ColorType::Rgba8);
}

#[test]
fn test_height_png_preserves_extremes() {
    let planet = planet();
    let dir = tempdir().unwrap();
    let path = export_map(&planet, ExportMap::Height, dir.path()).unwrap();
    let img = image::open(path).unwrap().into_luma16();

    let values: Vec<u16> = img.pixels().map(|p| p.0[0]).collect();
    assert_eq!(values.iter().min(), Some(&0));
    assert_eq!(values.iter().max(), Some(&65535));
}

#[test]
fn test_missing_surface_is_reported() {
    let planet = Planet::new(16, 8, 1).unwrap();
    let dir = tempdir().unwrap();
    let err = export_map(&planet, ExportMap::Albedo, dir.path()).unwrap_err();
    assert!(matches!(err, ExportError::MissingLayer("surface")));

    // Height needs no later stage.
    assert!(export_map(&planet, ExportMap::Height, dir.path()).is_ok());
}

#[test]
fn test_lava_emissive_glows_in_rgba() {
    let mut params = Preset::Lava.params();
    params.thermal.iterations = 2;
    params.hydraulic.iterations = 2;
    let planet = generate_planet(3, 32, 16, &params).unwrap();
    let dir = tempdir().unwrap();

    let path = export_map(&planet, ExportMap::Emissive, dir.path()).unwrap();
    let img = image::open(path).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgba8);
    assert!(img.into_rgba8().pixels().any(|p| p.0[3] > 0), "lava planet has no glow");

    let bare = Planet::new(16, 8, 1).unwrap();
    let err = export_map(&bare, ExportMap::Emissive, dir.path()).unwrap_err();
    assert!(matches!(err, ExportError::MissingLayer("surface")));
}
