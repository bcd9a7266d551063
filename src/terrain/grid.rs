//! Dense equirectangular scalar grid.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a grid is constructed with unusable dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height is zero.
    #[error("grid dimensions must be positive (got {width}x{height})")]
    Empty { width: usize, height: usize },
    /// Width is not exactly twice the height.
    #[error("equirectangular grid must be 2:1 (got {width}x{height})")]
    InvalidAspect { width: usize, height: usize },
    /// A backing buffer does not match `width * height`.
    #[error("grid buffer has {actual} cells, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Validates that `width x height` is a non-empty 2:1 grid.
pub fn check_dimensions(width: usize, height: usize) -> Result<(), GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::Empty { width, height });
    }
    if width != height * 2 {
        return Err(GridError::InvalidAspect { width, height });
    }
    Ok(())
}

/// Row-major elevation grid of `width * height` cells.
///
/// `Default` yields the empty 0x0 grid, which every erosion pass treats as a
/// no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeightField {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl HeightField {
    /// Creates a zero-filled grid.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::filled(width, height, 0.0)
    }

    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; width * height],
        })
    }

    /// Wraps an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        let expected = width * height;
        if data.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Realized `(min, max)`, reduced per row in parallel then merged.
    ///
    /// Returns `(0.0, 0.0)` for an empty grid.
    pub fn range(&self) -> (f32, f32) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        let per_row: Vec<(f32, f32)> = self
            .data
            .par_chunks(self.width)
            .map(|row| {
                row.iter()
                    .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
            })
            .collect();

        per_row
            .into_iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), (rlo, rhi)| {
                (lo.min(rlo), hi.max(rhi))
            })
    }

    /// Linearly maps the realized range onto `[-1, 1]`.
    ///
    /// A (near-)flat grid is shifted so its minimum lands on -1.
    pub fn normalize(&mut self) {
        if self.data.is_empty() {
            return;
        }
        let (min, max) = self.range();
        let mut span = max - min;
        if span < 1e-6 {
            span = 1.0;
        }
        self.data.par_iter_mut().for_each(|h| {
            *h = (((*h - min) / span) * 2.0 - 1.0).clamp(-1.0, 1.0);
        });
    }

    /// Sum of all cells, accumulated sequentially in `f64`.
    pub fn total(&self) -> f64 {
        self.data.iter().map(|&h| h as f64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_dimensions() {
        assert_eq!(
            HeightField::new(0, 0),
            Err(GridError::Empty { width: 0, height: 0 })
        );
        assert_eq!(
            HeightField::new(9, 4),
            Err(GridError::InvalidAspect { width: 9, height: 4 })
        );
        assert_eq!(
            HeightField::from_vec(8, 4, vec![0.0; 31]),
            Err(GridError::LengthMismatch {
                expected: 32,
                actual: 31
            })
        );
    }

    #[test]
    fn test_get_set() {
        let mut field = HeightField::new(8, 4).unwrap();
        field.set(6, 3, 0.25);
        assert_eq!(field.get(6, 3), 0.25);
        assert_eq!(field.data()[3 * 8 + 6], 0.25);
    }

    #[test]
    fn test_range_merges_rows() {
        let mut field = HeightField::new(8, 4).unwrap();
        field.set(0, 0, -3.0);
        field.set(7, 3, 5.0);
        assert_eq!(field.range(), (-3.0, 5.0));
    }

    #[test]
    fn test_normalize_maps_to_unit_range() {
        let data: Vec<f32> = (0..32).map(|i| i as f32 * 0.37 - 4.0).collect();
        let mut field = HeightField::from_vec(8, 4, data).unwrap();
        field.normalize();
        let (min, max) = field.range();
        assert!((min + 1.0).abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_flat_grid_is_finite() {
        let mut field = HeightField::filled(8, 4, 0.3).unwrap();
        field.normalize();
        assert!(field.data().iter().all(|h| h.is_finite() && *h == -1.0));
    }

    #[test]
    fn test_default_is_empty() {
        let mut field = HeightField::default();
        assert!(field.is_empty());
        field.normalize();
        assert_eq!(field.range(), (0.0, 0.0));
    }
}
