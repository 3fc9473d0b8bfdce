use glam::{UVec2, Vec2};

use crate::grid::{Grid, Sample};

use super::{Cell, Kernel, KernelId};

/// Scales every cell of a grid by a constant.
#[derive(Debug, Clone, Copy)]
pub struct Clear<'a, T> {
    pub source: &'a Grid<T>,
    pub value: f32,
}

impl<'a, T> Clear<'a, T> {
    pub fn new(source: &'a Grid<T>, value: f32) -> Self {
        Self { source, value }
    }
}

impl<T: Sample> Kernel for Clear<'_, T> {
    type Output = T;

    fn id(&self) -> KernelId {
        KernelId::Clear
    }

    fn extent(&self) -> Option<UVec2> {
        Some(self.source.size())
    }

    fn eval(&self, cell: Cell) -> T {
        self.source.get(cell.x, cell.y) * self.value
    }
}

/// Semi-Lagrangian advection of `source` through `velocity`.
///
/// Velocity is expressed in simulation cells per unit time, so the back
/// trace is scaled by the simulation grid's `texel_size` regardless of the
/// output resolution. Both grids are sampled bilinearly.
#[derive(Debug, Clone, Copy)]
pub struct Advect<'a, T> {
    pub velocity: &'a Grid<Vec2>,
    pub source: &'a Grid<T>,
    pub texel_size: Vec2,
    pub dt: f32,
    pub dissipation: f32,
}

impl<'a, T> Advect<'a, T> {
    pub fn new(velocity: &'a Grid<Vec2>, source: &'a Grid<T>, dt: f32, dissipation: f32) -> Self {
        Self {
            velocity,
            source,
            texel_size: velocity.texel_size(),
            dt,
            dissipation,
        }
    }
}

impl<T: Sample> Kernel for Advect<'_, T> {
    type Output = T;

    fn id(&self) -> KernelId {
        KernelId::Advect
    }

    fn eval(&self, cell: Cell) -> T {
        let coord = cell.uv - self.dt * self.velocity.sample(cell.uv) * self.texel_size;
        self.source.sample(coord) * self.dissipation
    }
}
