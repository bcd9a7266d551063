//! Seam-aware neighbor mapping on the equirectangular grid.
//!
//! Columns wrap around the ±π longitude seam. Rows are clamped: there is no
//! neighbor beyond either pole, so callers simply skip those directions.

/// Von Neumann stencil `(dx, dy)`: east, west, north, south.
pub const OFFSETS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];

/// Moore stencil `(dx, dy)` in scan order (`dy` outer, `dx` inner).
pub const OFFSETS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Wraps a column index into `[0, width)`.
#[inline]
pub fn wrap_x(x: i64, width: usize) -> usize {
    x.rem_euclid(width as i64) as usize
}

/// Returns the neighbor of `(x, y)` at `(dx, dy)`, or `None` past a pole.
#[inline]
pub fn neighbor(
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    dx: i32,
    dy: i32,
) -> Option<(usize, usize)> {
    let ny = y as i64 + dy as i64;
    if ny < 0 || ny >= height as i64 {
        return None;
    }
    Some((wrap_x(x as i64 + dx as i64, width), ny as usize))
}

/// Flat-index variant of [`neighbor`].
#[inline]
pub fn neighbor_index(
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    dx: i32,
    dy: i32,
) -> Option<usize> {
    neighbor(width, height, x, y, dx, dy).map(|(nx, ny)| ny * width + nx)
}

/// Grid distance for a unit step: 1 for cardinal moves, √2 for diagonals.
#[inline]
pub fn step_distance(dx: i32, dy: i32) -> f32 {
    if dx != 0 && dy != 0 {
        std::f32::consts::SQRT_2
    } else {
        1.0
    }
}
