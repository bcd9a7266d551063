//! Hydraulic erosion strategies.
//!
//! Two formulations sit behind [`HydraulicErosion`]: single-target
//! steepest-descent routing ([`SteepestDescent`]) and a four-neighbor
//! shallow-water flux lattice ([`ShallowWater`]). Both mutate the height grid
//! in place and return the residual water and suspended sediment.

use rayon::prelude::*;

use super::flow::{FlowField, FlowWorkspace, NO_TARGET};
use super::shallow_water::ShallowWater;
use super::{HydraulicModel, HydraulicParams};
use crate::geometry::neighbors::{neighbor_index, OFFSETS_8};
use crate::terrain::HeightField;

/// Water and suspended sediment left on the grid after a hydraulic run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydraulicOutputs {
    pub water: Vec<f32>,
    pub sediment: Vec<f32>,
}

impl HydraulicOutputs {
    pub fn total_water(&self) -> f64 {
        self.water.iter().map(|&w| w as f64).sum()
    }

    pub fn total_sediment(&self) -> f64 {
        self.sediment.iter().map(|&s| s as f64).sum()
    }
}

/// A hydraulic erosion formulation.
pub trait HydraulicErosion: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Runs `params.iterations` cycles on `heights` in place.
    ///
    /// Zero iterations or an empty grid must leave `heights` untouched.
    fn erode(&self, heights: &mut HeightField, params: &HydraulicParams) -> HydraulicOutputs;
}

impl HydraulicModel {
    /// The strategy implementing this model.
    pub fn strategy(self) -> &'static dyn HydraulicErosion {
        match self {
            Self::SteepestDescent => &SteepestDescent,
            Self::ShallowWater => &ShallowWater,
        }
    }
}

/// Share of the gap to the nearest neighbor a bed may close in one step. Two
/// neighbors moving towards each other close at most twice this.
const GAP_SHARE: f32 = 0.45;

/// Per-cell bounds on how far the bed may fall and rise during one step.
///
/// A cell may fall by [`GAP_SHARE`] of its smallest drop to a lower neighbor
/// and rise by [`GAP_SHARE`] of its smallest climb to a higher one, so no two
/// neighbors swap order within a step. Pits, cells with no lower neighbor,
/// never rise and may fall freely. Peaks may rise freely.
#[derive(Debug, Clone, Default)]
pub struct BedLimits {
    pub fall: Vec<f32>,
    pub rise: Vec<f32>,
}

impl BedLimits {
    pub fn new(len: usize) -> Self {
        Self {
            fall: vec![0.0; len],
            rise: vec![0.0; len],
        }
    }

    /// Recomputes both bounds from `heights` over the given neighborhood.
    pub fn update(&mut self, heights: &HeightField, offsets: &[(i32, i32)]) {
        let width = heights.width();
        let height = heights.height();
        if width == 0 {
            return;
        }
        let h = heights.data();
        self.fall.resize(h.len(), 0.0);
        self.rise.resize(h.len(), 0.0);

        self.fall
            .par_chunks_mut(width)
            .zip(self.rise.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (fall, rise))| {
                for x in 0..width {
                    let center = h[y * width + x];
                    let mut drop = f32::INFINITY;
                    let mut climb = f32::INFINITY;
                    for &(dx, dy) in offsets {
                        let Some(j) = neighbor_index(width, height, x, y, dx, dy) else {
                            continue;
                        };
                        let diff = center - h[j];
                        if diff > 0.0 {
                            drop = drop.min(diff);
                        } else if diff < 0.0 {
                            climb = climb.min(-diff);
                        }
                    }
                    if drop.is_finite() {
                        fall[x] = GAP_SHARE * drop;
                        rise[x] = GAP_SHARE * climb;
                    } else {
                        fall[x] = f32::INFINITY;
                        rise[x] = 0.0;
                    }
                }
            });
    }
}

/// Runs the hydraulic model selected by `params.model`.
pub fn apply_hydraulic_erosion(heights: &mut HeightField, params: &HydraulicParams) -> HydraulicOutputs {
    params.model.strategy().erode(heights, params)
}

/// Steepest-descent routing strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteepestDescent;

impl HydraulicErosion for SteepestDescent {
    fn name(&self) -> &'static str {
        HydraulicModel::SteepestDescent.name()
    }

    fn erode(&self, heights: &mut HeightField, params: &HydraulicParams) -> HydraulicOutputs {
        if params.iterations == 0 || heights.is_empty() {
            return HydraulicOutputs {
                water: vec![0.0; heights.len()],
                sediment: vec![0.0; heights.len()],
            };
        }

        let mut state = SteepestDescentState::new(heights.width(), heights.height());
        for _ in 0..params.iterations {
            state.step(heights, params);
        }

        let outputs = state.into_outputs();
        tracing::debug!(
            iterations = params.iterations,
            water = outputs.total_water(),
            sediment = outputs.total_sediment(),
            "steepest-descent erosion done"
        );
        outputs
    }
}

/// Water, sediment and scratch buffers carried across steepest-descent steps.
#[derive(Debug)]
pub struct SteepestDescentState {
    width: usize,
    height: usize,
    water: Vec<f32>,
    sediment: Vec<f32>,
    next_water: Vec<f32>,
    next_sediment: Vec<f32>,
    bed: Vec<f32>,
    limits: BedLimits,
    workspace: FlowWorkspace,
}

impl SteepestDescentState {
    pub fn new(width: usize, height: usize) -> Self {
        let n = width * height;
        Self {
            width,
            height,
            water: vec![0.0; n],
            sediment: vec![0.0; n],
            next_water: vec![0.0; n],
            next_sediment: vec![0.0; n],
            bed: vec![0.0; n],
            limits: BedLimits::new(n),
            workspace: FlowWorkspace::with_dimensions(width, height),
        }
    }

    /// Routing computed at the start of the most recent step.
    pub fn flow(&self) -> &FlowField {
        self.workspace.flow()
    }

    pub fn water(&self) -> &[f32] {
        &self.water
    }

    pub fn sediment(&self) -> &[f32] {
        &self.sediment
    }

    pub fn into_outputs(self) -> HydraulicOutputs {
        HydraulicOutputs {
            water: self.water,
            sediment: self.sediment,
        }
    }

    /// One rain → route → erode/deposit → advect → evaporate cycle.
    ///
    /// Bed changes are bounded by [`BedLimits`], so every cell keeps a strictly
    /// lower neighbor it already had and a sink stays a sink. Load that cannot
    /// settle stays in suspension.
    pub fn step(&mut self, heights: &mut HeightField, params: &HydraulicParams) {
        debug_assert_eq!(heights.len(), self.water.len());
        let width = self.width;
        let height = self.height;

        let rainfall = params.rainfall.max(0.0);
        let evaporation = params.evaporation.clamp(0.0, 1.0);
        let kc = params.capacity_factor.max(0.0);
        let ks = params.erosion_rate.max(0.0);
        let kd = params.deposition_rate.clamp(0.0, 1.0);
        let min_water = params.min_water.max(0.0);
        let min_slope = params.min_slope.max(0.0);
        let min_capacity = params.min_capacity.max(f32::EPSILON);
        let max_erosion = params.max_erosion.max(0.0);
        let use_accumulation = params.use_accumulation;

        // Rain.
        if rainfall > 0.0 {
            self.water.par_iter_mut().for_each(|w| *w += rainfall);
        }

        // Route.
        let flow = self.workspace.compute(heights);
        self.limits.update(heights, &OFFSETS_8);

        // Erode / deposit against a copy of the bed.
        self.bed.copy_from_slice(heights.data());
        let water = &self.water;
        let fall = &self.limits.fall;
        self.bed
            .par_iter_mut()
            .zip(self.sediment.par_iter_mut())
            .zip(self.limits.rise.par_iter_mut())
            .enumerate()
            .for_each(|(i, ((bed, s), rise))| {
                let w = water[i];
                if w < min_water {
                    return;
                }
                let upstream = if use_accumulation {
                    1.0 + flow.accumulation[i] as f32
                } else {
                    1.0
                };
                let slope = flow.slope[i].max(min_slope);
                let capacity = (kc * w * slope * upstream).max(min_capacity);
                if *s < capacity {
                    let eroded = (ks * (capacity - *s) * w).min(max_erosion).min(fall[i]);
                    *bed -= eroded;
                    *s += eroded;
                } else {
                    let deposited = (kd * (*s - capacity)).min(*rise);
                    *rise -= deposited;
                    *bed += deposited;
                    *s -= deposited;
                }
            });

        // Advect: each cell gathers from the neighbors that route into it.
        let water = &self.water;
        let sediment = &self.sediment;
        let targets = &flow.targets;
        self.next_water
            .par_chunks_mut(width)
            .zip(self.next_sediment.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (next_w, next_s))| {
                for x in 0..width {
                    let i = y * width + x;
                    let (mut w_in, mut s_in) = (0.0f32, 0.0f32);

                    let moves = water[i] >= min_water && targets[i] != NO_TARGET;
                    if !moves {
                        w_in += water[i];
                        s_in += sediment[i];
                    }

                    let mut seen = [usize::MAX; 8];
                    for (k, &(dx, dy)) in OFFSETS_8.iter().enumerate() {
                        let Some(j) = neighbor_index(width, height, x, y, dx, dy) else {
                            continue;
                        };
                        if seen[..k].contains(&j) {
                            continue;
                        }
                        seen[k] = j;
                        if targets[j] as usize == i && water[j] >= min_water {
                            w_in += water[j];
                            s_in += sediment[j];
                        }
                    }

                    next_w[x] = w_in;
                    next_s[x] = s_in;
                }
            });
        std::mem::swap(&mut self.water, &mut self.next_water);
        std::mem::swap(&mut self.sediment, &mut self.next_sediment);
        heights.data_mut().copy_from_slice(&self.bed);

        // Evaporate; cells that dry out drop what their rise bound allows.
        heights
            .data_mut()
            .par_iter_mut()
            .zip(self.water.par_iter_mut())
            .zip(self.sediment.par_iter_mut())
            .zip(self.limits.rise.par_iter())
            .for_each(|(((h, w), s), &rise)| {
                *w *= 1.0 - evaporation;
                if *w < min_water {
                    let settled = s.min(rise);
                    *h += settled;
                    *s -= settled;
                    *w = 0.0;
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINK: usize = 2 * 8 + 4;

    /// Cone around a single minimum at (4, 2); every other cell has a strictly
    /// lower neighbor closer to the minimum.
    fn bowl() -> HeightField {
        let mut field = HeightField::new(8, 4).unwrap();
        for y in 0..4 {
            for x in 0..8 {
                let dx = (x as f32 - 4.0).abs().min(8.0 - (x as f32 - 4.0).abs());
                let dy = y as f32 - 2.0;
                field.set(x, y, 0.02 * (dx * dx + dy * dy).sqrt());
            }
        }
        field.set(4, 2, -0.05);
        field
    }

    fn light_rain() -> HydraulicParams {
        HydraulicParams {
            iterations: 10,
            rainfall: 0.01,
            ..HydraulicParams::default()
        }
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mut field = bowl();
        let before = field.clone();
        let params = HydraulicParams {
            iterations: 0,
            ..HydraulicParams::default()
        };
        for model in [HydraulicModel::SteepestDescent, HydraulicModel::ShallowWater] {
            let out = model.strategy().erode(&mut field, &HydraulicParams { model, ..params.clone() });
            assert_eq!(field, before, "{} changed the grid", model.name());
            assert!(out.water.iter().all(|&w| w == 0.0));
        }
    }

    #[test]
    fn test_empty_grid_is_noop() {
        let mut field = HeightField::default();
        let out = apply_hydraulic_erosion(&mut field, &HydraulicParams::default());
        assert!(field.is_empty());
        assert!(out.water.is_empty());
    }

    #[test]
    fn test_sink_accumulation_grows_and_bed_erodes() {
        let mut field = bowl();
        let before = field.get(4, 2);
        let params = HydraulicParams::default();
        let mut state = SteepestDescentState::new(8, 4);

        let mut last = 0;
        for step in 0..params.iterations {
            state.step(&mut field, &params);
            let accum = state.flow().accumulation[SINK];
            assert!(accum >= last, "accumulation fell at step {}: {} < {}", step, accum, last);
            last = accum;
            assert!(state.flow().is_sink(SINK));
        }
        assert_eq!(last, 32, "every cell should drain into the minimum");
        assert!(field.get(4, 2) <= before, "sink bed rose: {} > {}", field.get(4, 2), before);
    }

    #[test]
    fn test_sink_bed_never_rises_for_either_model() {
        for model in [HydraulicModel::SteepestDescent, HydraulicModel::ShallowWater] {
            for (rainfall, evaporation) in [(0.6, 0.1), (0.05, 0.9), (2.0, 0.0)] {
                let mut field = bowl();
                let before = field.get(4, 2);
                let params = HydraulicParams {
                    model,
                    rainfall,
                    evaporation,
                    ..HydraulicParams::default()
                };
                let out = apply_hydraulic_erosion(&mut field, &params);
                let after = field.get(4, 2);
                assert!(
                    after <= before,
                    "{} rain={} evap={}: sink bed rose {} -> {}",
                    model.name(),
                    rainfall,
                    evaporation,
                    before,
                    after
                );
                assert!(field.data().iter().all(|h| h.is_finite()));
                assert!(out.sediment.iter().all(|&s| s >= 0.0 && s.is_finite()));
                let lowest = field
                    .data()
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(i, _)| i);
                assert_eq!(lowest, Some(SINK), "{} moved the minimum", model.name());
            }
        }
    }

    #[test]
    fn test_step_keeps_every_downhill_target() {
        let mut rng = 0x2545_F491u32;
        let data = (0..16 * 8)
            .map(|_| {
                rng ^= rng << 13;
                rng ^= rng >> 17;
                rng ^= rng << 5;
                (rng % 1000) as f32 / 1000.0
            })
            .collect();
        let mut field = HeightField::from_vec(16, 8, data).unwrap();
        let params = HydraulicParams {
            rainfall: 1.0,
            deposition_rate: 0.5,
            ..HydraulicParams::default()
        };
        let mut state = SteepestDescentState::new(16, 8);
        for _ in 0..10 {
            let before = FlowField::compute(&field);
            state.step(&mut field, &params);
            let h = field.data();
            for i in 0..before.len() {
                if let Some(t) = before.target(i) {
                    assert!(h[t] < h[i], "cell {} lost its downhill target {}", i, t);
                }
            }
        }
    }

    #[test]
    fn test_pits_never_rise() {
        let field = bowl();
        let mut limits = BedLimits::new(field.len());
        limits.update(&field, &OFFSETS_8);
        assert_eq!(limits.rise[SINK], 0.0);
        assert!(limits.fall[SINK].is_infinite());
        // (4, 1) sits 0.07 above the pit; its nearest uphill neighbors sit
        // beside it in the same row.
        let i = 8 + 4;
        let climb = 0.02 * (std::f32::consts::SQRT_2 - 1.0);
        assert!((limits.fall[i] - GAP_SHARE * 0.07).abs() < 1e-6);
        assert!((limits.rise[i] - GAP_SHARE * climb).abs() < 1e-6);
    }

    #[test]
    fn test_water_and_sediment_stay_non_negative() {
        let mut field = bowl();
        field.set(0, 0, 0.9);
        field.set(7, 3, -0.2);
        let params = HydraulicParams {
            iterations: 25,
            rainfall: 0.05,
            evaporation: 0.3,
            ..HydraulicParams::default()
        };
        let mut state = SteepestDescentState::new(8, 4);
        for _ in 0..params.iterations {
            state.step(&mut field, &params);
            assert!(state.water().iter().all(|&w| w >= 0.0 && w.is_finite()));
            assert!(state.sediment().iter().all(|&s| s >= 0.0 && s.is_finite()));
        }
        assert!(field.data().iter().all(|h| h.is_finite()));
    }

    #[test]
    fn test_strategy_is_deterministic() {
        let params = light_rain();
        let mut a = bowl();
        let mut b = bowl();
        let out_a = apply_hydraulic_erosion(&mut a, &params);
        let out_b = apply_hydraulic_erosion(&mut b, &params);
        assert_eq!(a, b);
        assert_eq!(out_a, out_b);
    }
}
