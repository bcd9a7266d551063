//! Pixel ↔ longitude/latitude ↔ unit-normal mapping.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;
use rayon::prelude::*;

use crate::terrain::{check_dimensions, GridError};

/// Converts a latitude/longitude pair (radians) to a unit-sphere normal.
///
/// `lat = +π/2` maps to `+Y`; `lon = 0` maps to `+X`.
#[inline]
pub fn lat_lon_to_normal(lat: f64, lon: f64) -> DVec3 {
    let cos_lat = lat.cos();
    DVec3::new(cos_lat * lon.cos(), lat.sin(), cos_lat * lon.sin())
}

/// Stateless mapping from pixel-center coordinates to the sphere.
///
/// Accepts fractional and out-of-range columns so callers can probe the
/// virtual column `x = width`, which lands exactly on column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphericalSampler {
    width: usize,
    height: usize,
}

impl SphericalSampler {
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Longitude in radians of column `x`'s center, in `(-π, π)` for `x < width`.
    #[inline]
    pub fn lon(&self, x: f64) -> f64 {
        let u = (x + 0.5) / self.width as f64;
        TAU * u - PI
    }

    /// Latitude in radians of row `y`'s center, `+π/2` at the top edge.
    #[inline]
    pub fn lat(&self, y: f64) -> f64 {
        let v = (y + 0.5) / self.height as f64;
        FRAC_PI_2 - PI * v
    }

    #[inline]
    pub fn normal(&self, x: f64, y: f64) -> DVec3 {
        lat_lon_to_normal(self.lat(y), self.lon(x))
    }
}

/// Per-run cache of longitudes, latitudes and sphere normals.
///
/// Built once and shared read-only by every stage.
#[derive(Debug, Clone)]
pub struct CoordinateCache {
    sampler: SphericalSampler,
    lons: Vec<f64>,
    lats: Vec<f64>,
    sin_lats: Vec<f64>,
    cos_lats: Vec<f64>,
    normals: Vec<DVec3>,
}

impl CoordinateCache {
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let sampler = SphericalSampler::new(width, height)?;

        let lons: Vec<f64> = (0..width).map(|x| sampler.lon(x as f64)).collect();
        let lats: Vec<f64> = (0..height).map(|y| sampler.lat(y as f64)).collect();
        let sin_lats = lats.iter().map(|l| l.sin()).collect();
        let cos_lats = lats.iter().map(|l| l.cos()).collect();

        let mut normals = vec![DVec3::ZERO; width * height];
        normals
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let lat = lats[y];
                for (x, n) in row.iter_mut().enumerate() {
                    *n = lat_lon_to_normal(lat, lons[x]);
                }
            });

        Ok(Self {
            sampler,
            lons,
            lats,
            sin_lats,
            cos_lats,
            normals,
        })
    }

    pub fn sampler(&self) -> &SphericalSampler {
        &self.sampler
    }

    pub fn width(&self) -> usize {
        self.sampler.width
    }

    pub fn height(&self) -> usize {
        self.sampler.height
    }

    #[inline]
    pub fn lon(&self, x: usize) -> f64 {
        self.lons[x]
    }

    #[inline]
    pub fn lat(&self, y: usize) -> f64 {
        self.lats[y]
    }

    #[inline]
    pub fn sin_lat(&self, y: usize) -> f64 {
        self.sin_lats[y]
    }

    #[inline]
    pub fn cos_lat(&self, y: usize) -> f64 {
        self.cos_lats[y]
    }

    #[inline]
    pub fn normal(&self, x: usize, y: usize) -> DVec3 {
        self.normals[y * self.sampler.width + x]
    }

    /// All normals in row-major order.
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    pub fn row_normals(&self, y: usize) -> &[DVec3] {
        let w = self.sampler.width;
        &self.normals[y * w..(y + 1) * w]
    }
}
