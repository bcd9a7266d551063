//! Shallow-water flux lattice.
//!
//! Each step moves water between the four axis-aligned neighbors along the
//! water-surface gradient, with per-cell outflow clamped to the water present.
//! Columns wrap; the pole rows have a closed wall (zero flux) on their outer
//! edge. Bed changes go through the same [`BedLimits`] as steepest descent,
//! taken over the four flux neighbors.

use rayon::prelude::*;

use super::hydraulic::{BedLimits, HydraulicErosion, HydraulicOutputs};
use super::{HydraulicModel, HydraulicParams};
use crate::geometry::neighbors::{neighbor_index, OFFSETS_4};
use crate::terrain::HeightField;

/// Flux order: east, west, north, south (matches `OFFSETS_4`).
type Flux = [f32; 4];

/// Index of the direction pointing back at the sender.
const OPPOSITE: [usize; 4] = [1, 0, 3, 2];

#[inline]
fn neighbors4(width: usize, height: usize, i: usize) -> [Option<usize>; 4] {
    let (x, y) = (i % width, i / width);
    OFFSETS_4.map(|(dx, dy)| neighbor_index(width, height, x, y, dx, dy))
}

/// Shallow-water flux strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShallowWater;

impl HydraulicErosion for ShallowWater {
    fn name(&self) -> &'static str {
        HydraulicModel::ShallowWater.name()
    }

    fn erode(&self, heights: &mut HeightField, params: &HydraulicParams) -> HydraulicOutputs {
        let n = heights.len();
        if params.iterations == 0 || n == 0 {
            return HydraulicOutputs {
                water: vec![0.0; n],
                sediment: vec![0.0; n],
            };
        }

        let width = heights.width();
        let height = heights.height();
        let rainfall = params.rainfall.max(0.0);
        let evaporation = params.evaporation.clamp(0.0, 1.0);
        let kc = params.capacity_factor.max(0.0);
        let ks = params.erosion_rate.max(0.0);
        let kd = params.deposition_rate.clamp(0.0, 1.0);
        let min_water = params.min_water.max(0.0);
        let max_erosion = params.max_erosion.max(0.0);

        let mut w = vec![0.0f32; n];
        let mut s = vec![0.0f32; n];
        let mut flux: Vec<Flux> = vec![[0.0; 4]; n];
        let mut w_prev = vec![0.0f32; n];
        let mut s_next = vec![0.0f32; n];
        let mut limits = BedLimits::new(n);

        for _ in 0..params.iterations {
            // Pass 1 (rainfall).
            if rainfall > 0.0 {
                w.par_iter_mut().for_each(|wi| *wi += rainfall);
            }

            // Pass 2 (flow): outflow along the water-surface gradient.
            {
                let h = heights.data();
                let w = &w;
                flux.par_iter_mut().enumerate().for_each(|(i, f)| {
                    let surface = h[i] + w[i];
                    let mut out = [0.0f32; 4];
                    for (k, j) in neighbors4(width, height, i).into_iter().enumerate() {
                        if let Some(j) = j {
                            out[k] = (surface - (h[j] + w[j])).max(0.0);
                        }
                    }
                    let sum: f32 = out.iter().sum();
                    if sum > 1e-6 && sum > w[i] {
                        let scale = w[i] / sum;
                        out.iter_mut().for_each(|o| *o *= scale);
                    }
                    *f = out;
                });
            }

            // Pass 3 (water update): flux divergence.
            w_prev.copy_from_slice(&w);
            {
                let flux = &flux;
                let w_prev = &w_prev;
                w.par_iter_mut().enumerate().for_each(|(i, wi)| {
                    let outflow: f32 = flux[i].iter().sum();
                    let mut inflow = 0.0;
                    for (k, j) in neighbors4(width, height, i).into_iter().enumerate() {
                        if let Some(j) = j {
                            inflow += flux[j][OPPOSITE[k]];
                        }
                    }
                    *wi = (w_prev[i] + inflow - outflow).max(0.0);
                });
            }

            // Pass 4 (erosion/deposition): capacity from velocity and surface slope.
            limits.update(heights, &OFFSETS_4);
            {
                let snapshot = heights.data().to_vec();
                let (flux, w) = (&flux, &w);
                let fall = &limits.fall;
                heights
                    .data_mut()
                    .par_iter_mut()
                    .zip(s.par_iter_mut())
                    .zip(limits.rise.par_iter_mut())
                    .enumerate()
                    .for_each(|(i, ((hi, si), rise))| {
                        if w[i] < min_water {
                            return;
                        }
                        let surface = snapshot[i] + w[i];
                        let lowest = neighbors4(width, height, i)
                            .into_iter()
                            .flatten()
                            .map(|j| snapshot[j] + w[j])
                            .fold(surface, f32::min);
                        let slope = surface - lowest;

                        let f = flux[i];
                        let vx = f[0] - f[1];
                        let vy = f[2] - f[3];
                        let velocity = (vx * vx + vy * vy).sqrt();

                        let capacity = kc * velocity * slope;
                        if *si > capacity {
                            let deposited = (kd * (*si - capacity)).min(*rise);
                            *rise -= deposited;
                            *hi += deposited;
                            *si -= deposited;
                        } else {
                            let eroded = (ks * (capacity - *si)).min(max_erosion).min(fall[i]);
                            *hi -= eroded;
                            *si += eroded;
                        }
                    });
            }

            // Pass 5 (sediment transport): sediment follows the water flux.
            {
                let (flux, s, w_prev) = (&flux, &s, &w_prev);
                let leaving = |j: usize, k: usize| -> f32 {
                    if w_prev[j] > 1e-9 {
                        (flux[j][k] / w_prev[j]).clamp(0.0, 1.0)
                    } else {
                        0.0
                    }
                };
                s_next.par_iter_mut().enumerate().for_each(|(i, next)| {
                    let out: f32 = (0..4).map(|k| leaving(i, k)).sum();
                    let mut total = s[i] * (1.0 - out).max(0.0);
                    for (k, j) in neighbors4(width, height, i).into_iter().enumerate() {
                        if let Some(j) = j {
                            total += s[j] * leaving(j, OPPOSITE[k]);
                        }
                    }
                    *next = total;
                });
            }
            std::mem::swap(&mut s, &mut s_next);

            // Pass 6 (evaporation): dry cells drop what their rise bound allows.
            heights
                .data_mut()
                .par_iter_mut()
                .zip(w.par_iter_mut())
                .zip(s.par_iter_mut())
                .zip(limits.rise.par_iter())
                .for_each(|(((hi, wi), si), &rise)| {
                    *wi *= 1.0 - evaporation;
                    if *wi < min_water {
                        let settled = si.min(rise);
                        *hi += settled;
                        *si -= settled;
                        *wi = 0.0;
                    }
                });
        }

        let outputs = HydraulicOutputs {
            water: w,
            sediment: s,
        };
        tracing::debug!(
            iterations = params.iterations,
            water = outputs.total_water(),
            sediment = outputs.total_sediment(),
            "shallow-water erosion done"
        );
        outputs
    }
}
