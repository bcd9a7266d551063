//! Slope-limited thermal erosion.
//!
//! Every iteration reads one unmodified snapshot of heights and writes into a
//! separate delta buffer, so cells can be processed in any order (and in
//! parallel) without directional bias.
//!
//! The excess `Δh - talus` across each pair is shared over the stencil, so a
//! cell moves at most `rate` times its largest excess per iteration. With
//! `rate <= 1` the update never overshoots and heights stay inside their
//! starting range.

use rayon::prelude::*;

use super::ThermalParams;
use crate::geometry::neighbors::neighbor_index;
use crate::terrain::HeightField;

/// Runs `params.iterations` thermal passes in place.
///
/// The raw pass does not renormalize; the pipeline stage does that after a
/// non-empty run. Zero iterations or an empty grid leave `heights` untouched.
pub fn apply_thermal_erosion(heights: &mut HeightField, params: &ThermalParams) {
    if params.iterations == 0 || heights.is_empty() {
        return;
    }

    let width = heights.width();
    let height = heights.height();
    let talus = params.talus.max(0.0);
    let rate = params.rate.clamp(0.0, 1.0);
    let offsets = params.stencil.offsets();
    let share = rate / offsets.len() as f32;

    let mut delta = vec![0.0f32; heights.len()];

    for _ in 0..params.iterations {
        {
            let snapshot = heights.data();
            delta
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, d) in row.iter_mut().enumerate() {
                        *d = cell_delta(snapshot, width, height, x, y, offsets, talus, share);
                    }
                });
        }

        heights
            .data_mut()
            .par_iter_mut()
            .zip(delta.par_iter())
            .for_each(|(h, d)| *h += d);
    }

    tracing::debug!(iterations = params.iterations, talus, rate, "thermal erosion done");
}

/// Net material change of one cell: outflow to lower neighbors, inflow from
/// higher ones, each `share * (Δh - talus)` where `Δh` exceeds `talus`.
#[inline]
#[allow(clippy::too_many_arguments)]
fn cell_delta(
    heights: &[f32],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    offsets: &[(i32, i32)],
    talus: f32,
    share: f32,
) -> f32 {
    let h0 = heights[y * width + x];
    let mut d = 0.0;
    for &(dx, dy) in offsets {
        let Some(j) = neighbor_index(width, height, x, y, dx, dy) else {
            continue;
        };
        let diff = h0 - heights[j];
        if diff > talus {
            d -= share * (diff - talus);
        } else if -diff > talus {
            d += share * (-diff - talus);
        }
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erosion::ThermalStencil;

    fn spike(x: usize, y: usize) -> HeightField {
        let mut field = HeightField::new(8, 4).unwrap();
        field.set(x, y, 1.0);
        field
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mut field = HeightField::filled(8, 4, 0.25).unwrap();
        let before = field.clone();
        let params = ThermalParams {
            iterations: 0,
            ..ThermalParams::default()
        };
        apply_thermal_erosion(&mut field, &params);
        assert_eq!(field, before);
    }

    #[test]
    fn test_empty_grid_is_noop() {
        let mut field = HeightField::default();
        apply_thermal_erosion(&mut field, &ThermalParams::default());
        assert!(field.is_empty());
    }

    #[test]
    fn test_spike_spreads_to_four_neighbors() {
        let mut field = spike(3, 1);
        let before = field.total();
        let params = ThermalParams {
            iterations: 5,
            talus: 0.0,
            rate: 0.1,
            stencil: ThermalStencil::VonNeumann,
        };
        apply_thermal_erosion(&mut field, &params);

        for (x, y) in [(2, 1), (4, 1), (3, 0), (3, 2)] {
            assert!(field.get(x, y) > 0.0, "neighbor ({}, {}) received nothing", x, y);
        }
        assert!(field.get(3, 1) < 1.0);
        assert!((field.total() - before).abs() < 1e-5, "mass not conserved");
    }

    #[test]
    fn test_spike_spreads_to_eight_neighbors() {
        let mut field = spike(4, 2);
        let before = field.total();
        let params = ThermalParams {
            iterations: 5,
            talus: 0.0,
            rate: 0.05,
            stencil: ThermalStencil::Moore,
        };
        apply_thermal_erosion(&mut field, &params);

        for (dx, dy) in crate::geometry::neighbors::OFFSETS_8 {
            let x = (4 + dx) as usize;
            let y = (2 + dy) as usize;
            assert!(field.get(x, y) > 0.0, "neighbor ({}, {}) received nothing", x, y);
        }
        assert!((field.total() - before).abs() < 1e-5, "mass not conserved");
    }

    #[test]
    fn test_spike_at_seam_wraps() {
        let mut field = spike(0, 1);
        let params = ThermalParams {
            iterations: 1,
            talus: 0.0,
            rate: 0.1,
            stencil: ThermalStencil::VonNeumann,
        };
        apply_thermal_erosion(&mut field, &params);
        assert!(field.get(7, 1) > 0.0, "material should cross the longitude seam");
    }

    #[test]
    fn test_full_rate_stays_bounded() {
        for stencil in [ThermalStencil::VonNeumann, ThermalStencil::Moore] {
            let mut field = HeightField::new(16, 8).unwrap();
            field.set(5, 3, 1.0);
            let before = field.total();
            let params = ThermalParams {
                iterations: 40,
                talus: 0.0,
                rate: 1.0,
                stencil,
            };
            apply_thermal_erosion(&mut field, &params);

            let (min, max) = field.range();
            assert!(min > -1e-6 && max < 1.0 + 1e-6, "{:?} left [0, 1]: ({}, {})", stencil, min, max);
            assert!(field.data().iter().all(|h| h.is_finite()));
            assert!((field.total() - before).abs() < 1e-4, "{:?} lost mass", stencil);
        }
    }

    #[test]
    fn test_differences_below_talus_stay_put() {
        let mut field = spike(3, 1);
        let before = field.clone();
        let params = ThermalParams {
            iterations: 3,
            talus: 1.5,
            rate: 0.5,
            stencil: ThermalStencil::Moore,
        };
        apply_thermal_erosion(&mut field, &params);
        assert_eq!(field, before);
    }
}
