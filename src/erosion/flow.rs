//! Steepest-descent flow routing and elevation-ordered accumulation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rayon::prelude::*;

use crate::geometry::neighbors::{neighbor_index, step_distance};
use crate::terrain::HeightField;

/// Target value of a cell with no downhill neighbor.
pub const NO_TARGET: u32 = u32::MAX;

/// One of the eight outgoing directions, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowDirection {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl FlowDirection {
    /// All directions in scan order (`dy` outer, `dx` inner). Ties between
    /// equally steep neighbors resolve to the earliest entry.
    pub const ALL: [FlowDirection; 8] = [
        Self::NorthWest,
        Self::North,
        Self::NorthEast,
        Self::West,
        Self::East,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    /// Grid offset `(dx, dy)`; north is towards row 0.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::NorthWest => (-1, -1),
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
            Self::SouthWest => (-1, 1),
            Self::South => (0, 1),
            Self::SouthEast => (1, 1),
        }
    }

    pub fn distance(self) -> f32 {
        let (dx, dy) = self.offset();
        step_distance(dx, dy)
    }
}

/// Per-cell flow routing: direction, target index, slope and accumulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowField {
    width: usize,
    height: usize,
    /// Outgoing direction, `None` for sinks.
    pub directions: Vec<Option<FlowDirection>>,
    /// Flat index of the downstream cell, or [`NO_TARGET`].
    pub targets: Vec<u32>,
    /// Drop to the target divided by the step distance; zero for sinks.
    pub slope: Vec<f32>,
    /// Contributing cells including the cell itself (always ≥ 1).
    pub accumulation: Vec<u32>,
}

impl FlowField {
    /// Computes routing and accumulation for `heights` with a throwaway workspace.
    pub fn compute(heights: &HeightField) -> Self {
        let mut workspace = FlowWorkspace::new();
        workspace.compute(heights);
        workspace.into_flow()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[inline]
    pub fn target(&self, i: usize) -> Option<usize> {
        match self.targets[i] {
            NO_TARGET => None,
            t => Some(t as usize),
        }
    }

    #[inline]
    pub fn is_sink(&self, i: usize) -> bool {
        self.targets[i] == NO_TARGET
    }

    pub fn sink_count(&self) -> usize {
        self.targets.iter().filter(|&&t| t == NO_TARGET).count()
    }

    /// Largest accumulation value, at least 1 for a non-empty field.
    pub fn max_accumulation(&self) -> u32 {
        self.accumulation.iter().copied().max().unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug)]
struct QueuedCell {
    height: f32,
    index: u32,
}

impl PartialEq for QueuedCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedCell {}

impl PartialOrd for QueuedCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Max-heap by height; equal heights pop in ascending scan index.
impl Ord for QueuedCell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.height
            .total_cmp(&other.height)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Reusable scratch buffers for repeated flow computations.
///
/// Hydraulic erosion recomputes the flow field every iteration; the workspace
/// keeps the direction, target, slope, accumulation, visited and queue storage
/// alive between calls and only reallocates when the grid size changes.
#[derive(Debug, Default)]
pub struct FlowWorkspace {
    flow: FlowField,
    visited: Vec<bool>,
    queue: BinaryHeap<QueuedCell>,
}

impl FlowWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes every buffer for a `width x height` grid.
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        let mut workspace = Self::new();
        workspace.resize(width, height);
        workspace
    }

    fn resize(&mut self, width: usize, height: usize) {
        let n = width * height;
        let flow = &mut self.flow;
        flow.width = width;
        flow.height = height;
        flow.directions.resize(n, None);
        flow.targets.resize(n, NO_TARGET);
        flow.slope.resize(n, 0.0);
        flow.accumulation.resize(n, 1);
        self.visited.resize(n, false);
        self.queue.reserve(n.saturating_sub(self.queue.len()));
    }

    /// Recomputes directions (parallel per row) then accumulation
    /// (sequential, highest cell first).
    pub fn compute(&mut self, heights: &HeightField) -> &FlowField {
        let width = heights.width();
        let height = heights.height();
        self.resize(width, height);
        if heights.is_empty() {
            return &self.flow;
        }

        let src = heights.data();
        let FlowField {
            directions,
            targets,
            slope,
            accumulation,
            ..
        } = &mut self.flow;

        directions
            .par_chunks_mut(width)
            .zip(targets.par_chunks_mut(width))
            .zip(slope.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, ((dirs, tgts), slopes))| {
                for x in 0..width {
                    let (dir, target, s) = steepest_descent(src, width, height, x, y);
                    dirs[x] = dir;
                    tgts[x] = target;
                    slopes[x] = s;
                }
            });

        accumulate(
            src,
            targets.as_slice(),
            accumulation.as_mut_slice(),
            &mut self.visited,
            &mut self.queue,
        );
        &self.flow
    }

    pub fn flow(&self) -> &FlowField {
        &self.flow
    }

    pub fn into_flow(self) -> FlowField {
        self.flow
    }
}

/// Picks the neighbor with the greatest positive drop per unit distance.
fn steepest_descent(
    heights: &[f32],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
) -> (Option<FlowDirection>, u32, f32) {
    let center = heights[y * width + x];
    let mut best: Option<(FlowDirection, usize)> = None;
    let mut max_slope = 0.0f32;

    for dir in FlowDirection::ALL {
        let (dx, dy) = dir.offset();
        let Some(j) = neighbor_index(width, height, x, y, dx, dy) else {
            continue;
        };
        let drop = center - heights[j];
        if drop <= 0.0 {
            continue;
        }
        let s = drop / dir.distance();
        if s > max_slope {
            max_slope = s;
            best = Some((dir, j));
        }
    }

    match best {
        Some((dir, j)) => (Some(dir), j as u32, max_slope),
        None => (None, NO_TARGET, 0.0),
    }
}

/// Visits every cell once from highest to lowest, pushing its accumulation
/// downstream. Targets are strictly lower, so each cell is complete when popped.
fn accumulate(
    heights: &[f32],
    targets: &[u32],
    accumulation: &mut [u32],
    visited: &mut [bool],
    queue: &mut BinaryHeap<QueuedCell>,
) {
    accumulation.fill(1);
    visited.fill(false);
    queue.clear();
    queue.extend(heights.iter().enumerate().map(|(i, &height)| QueuedCell {
        height,
        index: i as u32,
    }));

    while let Some(QueuedCell { index, .. }) = queue.pop() {
        let i = index as usize;
        if std::mem::replace(&mut visited[i], true) {
            continue;
        }
        let t = targets[i];
        if t != NO_TARGET {
            accumulation[t as usize] += accumulation[i];
        }
    }
}
