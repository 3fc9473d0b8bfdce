use std::ops::{Add, Mul};

use glam::{UVec2, Vec2, Vec4};
use ndarray::Array2;

/// A value stored in one cell of a [`Grid`].
///
/// Samples have 1, 2 or 4 `f32` components and behave like the texels of a
/// floating point texture: they can be scaled, summed and interpolated.
pub trait Sample: Copy + Default + PartialEq + Send + Sync + Add<Output = Self> + Mul<f32, Output = Self> {
    /// Number of `f32` components in the sample.
    const COMPONENTS: usize;

    fn is_finite(self) -> bool;

    /// Squared magnitude of the sample.
    fn norm_squared(self) -> f32;

    /// Forces the alpha channel to `1` for samples that have one.
    #[inline(always)]
    fn with_unit_alpha(self) -> Self {
        self
    }

    #[inline(always)]
    fn mix(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl Sample for f32 {
    const COMPONENTS: usize = 1;

    #[inline(always)]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }

    #[inline(always)]
    fn norm_squared(self) -> f32 {
        self * self
    }
}

impl Sample for Vec2 {
    const COMPONENTS: usize = 2;

    #[inline(always)]
    fn is_finite(self) -> bool {
        Vec2::is_finite(self)
    }

    #[inline(always)]
    fn norm_squared(self) -> f32 {
        self.length_squared()
    }
}

impl Sample for Vec4 {
    const COMPONENTS: usize = 4;

    #[inline(always)]
    fn is_finite(self) -> bool {
        Vec4::is_finite(self)
    }

    #[inline(always)]
    fn norm_squared(self) -> f32 {
        self.length_squared()
    }

    #[inline(always)]
    fn with_unit_alpha(self) -> Self {
        self.truncate().extend(1.0)
    }
}

/// A `W × H` array of samples addressed in texture space.
///
/// Cells are indexed `(x, y)` with `y = 0` at the bottom. The center of cell
/// `(x, y)` sits at the normalized coordinate `((x + 0.5) / W, (y + 0.5) / H)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    data: Array2<T>,
    /// Size of the grid, in cells.
    size: UVec2,
    /// `1.0 / size`.
    texel_size: Vec2,
}

impl<T: Sample> Grid<T> {
    /// Creates a grid filled with zeros.
    pub fn new(size: UVec2) -> Self {
        Self::from_elem(size, T::default())
    }

    pub fn from_elem(size: UVec2, value: T) -> Self {
        Self {
            data: Array2::from_elem((size.x as usize, size.y as usize), value),
            size,
            texel_size: size.as_vec2().recip(),
        }
    }

    /// Creates a grid by evaluating `f` at every cell index.
    pub fn from_fn<F: FnMut(UVec2) -> T>(size: UVec2, mut f: F) -> Self {
        let data = Array2::from_shape_fn((size.x as usize, size.y as usize), |(x, y)| {
            f(UVec2::new(x as u32, y as u32))
        });

        Self {
            data,
            size,
            texel_size: size.as_vec2().recip(),
        }
    }

    #[inline(always)]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.size.x as usize
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.size.y as usize
    }

    #[inline(always)]
    pub fn texel_size(&self) -> Vec2 {
        self.texel_size
    }

    /// Number of cells in the grid.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Normalized coordinate of the center of cell `(x, y)`.
    #[inline(always)]
    pub fn uv(&self, x: usize, y: usize) -> Vec2 {
        (Vec2::new(x as f32, y as f32) + 0.5) * self.texel_size
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[(x, y)]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[(x, y)] = value;
    }

    /// Fetches a cell, clamping out of range indices to the nearest edge cell.
    #[inline(always)]
    pub fn texel(&self, x: isize, y: isize) -> T {
        let x = x.clamp(0, self.size.x as isize - 1) as usize;
        let y = y.clamp(0, self.size.y as isize - 1) as usize;
        self.data[(x, y)]
    }

    /// Bilinearly samples the grid at a normalized coordinate.
    ///
    /// Coordinates outside `[0, 1]²` clamp to the edge cells.
    pub fn sample(&self, uv: Vec2) -> T {
        // Keep the integer base in range so the `+ 1` neighbor cannot overflow.
        let st = (uv * self.size.as_vec2() - 0.5).clamp(Vec2::splat(-1.0), self.size.as_vec2());
        let base = st.floor();
        let t = st - base;

        let x0 = base.x as isize;
        let y0 = base.y as isize;

        let bottom = self.texel(x0, y0).mix(self.texel(x0 + 1, y0), t.x);
        let top = self.texel(x0, y0 + 1).mix(self.texel(x0 + 1, y0 + 1), t.x);

        bottom.mix(top, t.y)
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    #[inline(always)]
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    #[inline(always)]
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    /// Iterates over rows from the top of the image to the bottom.
    pub fn rows_top_down(&self) -> impl Iterator<Item = impl Iterator<Item = T> + '_> + '_ {
        (0..self.height()).rev().map(move |y| (0..self.width()).map(move |x| self.data[(x, y)]))
    }

    /// Copies this grid into a grid of a different size, bilinearly
    /// sampling at the new cell centers.
    pub fn resampled(&self, size: UVec2) -> Grid<T> {
        let texel_size = size.as_vec2().recip();
        Grid::from_fn(size, |i| self.sample((i.as_vec2() + 0.5) * texel_size))
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Sum of the squared magnitudes of all samples.
    pub fn sum_squared(&self) -> f32 {
        self.data.iter().map(|v| v.norm_squared()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(size: UVec2) -> Grid<f32> {
        Grid::from_fn(size, |i| (i.x + 10 * i.y) as f32)
    }

    #[test]
    fn sample_at_texel_center_matches_texel() {
        let grid = ramp(UVec2::new(7, 5));

        for x in 0..7 {
            for y in 0..5 {
                assert!((grid.sample(grid.uv(x, y)) - grid.get(x, y)).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn sample_between_texels_interpolates() {
        let grid = ramp(UVec2::new(4, 4));
        let mid = (grid.uv(1, 2) + grid.uv(2, 2)) * 0.5;

        assert!((grid.sample(mid) - 21.5).abs() < 1e-5);
    }

    #[test]
    fn sample_outside_clamps_to_edge() {
        let grid = ramp(UVec2::new(4, 3));

        assert_eq!(grid.sample(Vec2::new(-3.0, -3.0)), grid.get(0, 0));
        assert_eq!(grid.sample(Vec2::new(5.0, 5.0)), grid.get(3, 2));
        assert_eq!(grid.texel(-1, 1), grid.get(0, 1));
        assert_eq!(grid.texel(4, 7), grid.get(3, 2));
    }

    #[test]
    fn sample_far_outside_stays_on_its_edge() {
        let grid = ramp(UVec2::new(4, 4));

        // Between rows 1 and 2 of the right-most column.
        assert!((grid.sample(Vec2::new(1e30, 0.5)) - 18.0).abs() < 1e-4);
        assert!((grid.sample(Vec2::new(-1e30, 0.5)) - 15.0).abs() < 1e-4);
        assert_eq!(grid.sample(Vec2::new(f32::MAX, f32::MAX)), grid.get(3, 3));
        assert_eq!(grid.sample(Vec2::new(f32::MIN, f32::MIN)), grid.get(0, 0));
    }

    #[test]
    fn rows_top_down_starts_at_last_row() {
        let grid = ramp(UVec2::new(2, 3));
        let rows: Vec<Vec<f32>> = grid.rows_top_down().map(|r| r.collect()).collect();

        assert_eq!(rows, vec![vec![20.0, 21.0], vec![10.0, 11.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn resample_preserves_constant() {
        let grid = Grid::from_elem(UVec2::new(5, 3), Vec2::new(1.5, -2.0));
        let resized = grid.resampled(UVec2::new(11, 8));

        assert_eq!(resized.size(), UVec2::new(11, 8));
        assert!(resized.iter().all(|&v| (v - Vec2::new(1.5, -2.0)).length() < 1e-5));
    }

    #[test]
    fn vec4_unit_alpha() {
        let v = Vec4::new(0.2, 0.3, 0.4, 7.0).with_unit_alpha();
        assert_eq!(v, Vec4::new(0.2, 0.3, 0.4, 1.0));
        assert_eq!(2.0f32.with_unit_alpha(), 2.0);
    }
}
