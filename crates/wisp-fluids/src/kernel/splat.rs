use glam::{UVec2, Vec2};

use crate::grid::{Grid, Sample};

use super::{Cell, Kernel, KernelId};

/// Adds a Gaussian blob of `impulse` centered on `point`.
///
/// The x offset is multiplied by the display aspect ratio so the blob is
/// round on screen rather than in grid space.
#[derive(Debug, Clone, Copy)]
pub struct Splat<'a, T> {
    pub target: &'a Grid<T>,
    /// Center of the blob, in normalized coordinates.
    pub point: Vec2,
    pub impulse: T,
    pub aspect_ratio: f32,
    pub radius: f32,
}

impl<T: Sample> Kernel for Splat<'_, T> {
    type Output = T;

    fn id(&self) -> KernelId {
        KernelId::Splat
    }

    fn extent(&self) -> Option<UVec2> {
        Some(self.target.size())
    }

    fn eval(&self, cell: Cell) -> T {
        let mut p = cell.uv - self.point;
        p.x *= self.aspect_ratio;

        let falloff = (-p.dot(p) / self.radius).exp();
        (self.target.get(cell.x, cell.y) + self.impulse * falloff).with_unit_alpha()
    }
}
