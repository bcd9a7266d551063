//! Lake detection and region labeling.

use std::collections::VecDeque;

use rayon::prelude::*;

use crate::geometry::neighbors::{neighbor_index, OFFSETS_4, OFFSETS_8};
use crate::terrain::HeightField;

/// Strength assigned to a lake seed (strict local minimum).
pub const LAKE_SEED: f32 = 1.0;
/// Strength assigned to cells reached by lake growth.
pub const LAKE_GROWN: f32 = 0.9;

/// Cells at or above this strength belong to a lake region.
const REGION_CUTOFF: f32 = 0.5;

/// Finds lakes below `threshold`.
///
/// Seeds are cells under the threshold whose every in-grid 8-neighbor is
/// strictly higher. Lakes then grow breadth-first into adjacent cells that are
/// also under the threshold, one ring per step, for at most `max_steps` rings.
pub fn detect_lakes(heights: &HeightField, threshold: f32, max_steps: usize) -> Vec<f32> {
    if heights.is_empty() {
        return Vec::new();
    }
    let width = heights.width();
    let height = heights.height();
    let h = heights.data();

    let mut lakes = vec![0.0f32; h.len()];
    lakes.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, lake) in row.iter_mut().enumerate() {
            if is_lake_seed(h, width, height, x, y, threshold) {
                *lake = LAKE_SEED;
            }
        }
    });

    let mut frontier: VecDeque<usize> = lakes
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > 0.0)
        .map(|(i, _)| i)
        .collect();

    for _ in 0..max_steps {
        if frontier.is_empty() {
            break;
        }
        let mut next = VecDeque::new();
        while let Some(i) = frontier.pop_front() {
            let (x, y) = (i % width, i / width);
            for &(dx, dy) in &OFFSETS_8 {
                let Some(j) = neighbor_index(width, height, x, y, dx, dy) else {
                    continue;
                };
                if lakes[j] == 0.0 && h[j] < threshold {
                    lakes[j] = LAKE_GROWN;
                    next.push_back(j);
                }
            }
        }
        frontier = next;
    }

    lakes
}

fn is_lake_seed(h: &[f32], width: usize, height: usize, x: usize, y: usize, threshold: f32) -> bool {
    let center = h[y * width + x];
    if center >= threshold {
        return false;
    }
    let mut neighbors = 0;
    for &(dx, dy) in &OFFSETS_8 {
        let Some(j) = neighbor_index(width, height, x, y, dx, dy) else {
            continue;
        };
        if h[j] <= center {
            return false;
        }
        neighbors += 1;
    }
    neighbors > 0
}

/// Connected lake regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LakeRegions {
    /// Region id per cell; 0 means no (surviving) lake.
    pub labels: Vec<u32>,
    /// Pixel count of region `id` at index `id - 1`.
    pub sizes: Vec<usize>,
}

impl LakeRegions {
    pub fn count(&self) -> usize {
        self.sizes.len()
    }
}

/// Labels 4-connected, seam-wrapping lake regions and drops those smaller than
/// `min_size`. Surviving ids are contiguous from 1 in scan order.
pub fn lake_regions(lakes: &[f32], width: usize, height: usize, min_size: usize) -> LakeRegions {
    let mut labels = vec![0u32; lakes.len()];
    let mut sizes = Vec::new();
    let mut visited = vec![false; lakes.len()];
    let mut stack = Vec::new();
    let mut members = Vec::new();

    for start in 0..lakes.len() {
        if visited[start] || lakes[start] < REGION_CUTOFF {
            continue;
        }
        let id = sizes.len() as u32 + 1;
        members.clear();
        stack.push(start);
        visited[start] = true;

        while let Some(i) = stack.pop() {
            members.push(i);
            let (x, y) = (i % width, i / width);
            for &(dx, dy) in &OFFSETS_4 {
                let Some(j) = neighbor_index(width, height, x, y, dx, dy) else {
                    continue;
                };
                if !visited[j] && lakes[j] >= REGION_CUTOFF {
                    visited[j] = true;
                    stack.push(j);
                }
            }
        }

        if members.len() >= min_size {
            for &i in &members {
                labels[i] = id;
            }
            sizes.push(members.len());
        }
    }

    LakeRegions { labels, sizes }
}
