use glam::{UVec2, Vec2};

use crate::grid::Grid;

use super::{Cell, Kernel, KernelId};

/// Scalar vorticity of a velocity field.
#[derive(Debug, Clone, Copy)]
pub struct Curl<'a> {
    pub velocity: &'a Grid<Vec2>,
}

impl<'a> Curl<'a> {
    pub fn new(velocity: &'a Grid<Vec2>) -> Self {
        Self { velocity }
    }
}

impl Kernel for Curl<'_> {
    type Output = f32;

    fn id(&self) -> KernelId {
        KernelId::Curl
    }

    fn extent(&self) -> Option<UVec2> {
        Some(self.velocity.size())
    }

    fn eval(&self, cell: Cell) -> f32 {
        let (x, y) = (cell.ix(), cell.iy());

        let l = self.velocity.texel(x - 1, y).y;
        let r = self.velocity.texel(x + 1, y).y;
        let t = self.velocity.texel(x, y + 1).x;
        let b = self.velocity.texel(x, y - 1).x;

        0.5 * (r - l - t + b)
    }
}

/// Vorticity confinement: pushes velocity along the rotated, normalized
/// gradient of `|curl|`.
#[derive(Debug, Clone, Copy)]
pub struct Vorticity<'a> {
    pub velocity: &'a Grid<Vec2>,
    pub curl: &'a Grid<f32>,
    /// Confinement strength.
    pub strength: f32,
    pub dt: f32,
}

impl Kernel for Vorticity<'_> {
    type Output = Vec2;

    fn id(&self) -> KernelId {
        KernelId::Vorticity
    }

    fn extent(&self) -> Option<UVec2> {
        Some(self.velocity.size())
    }

    fn eval(&self, cell: Cell) -> Vec2 {
        let (x, y) = (cell.ix(), cell.iy());

        let l = self.curl.texel(x - 1, y);
        let r = self.curl.texel(x + 1, y);
        let t = self.curl.texel(x, y + 1);
        let b = self.curl.texel(x, y - 1);
        let c = self.curl.get(cell.x, cell.y);

        let mut force = 0.5 * Vec2::new(t.abs() - b.abs(), r.abs() - l.abs());
        force /= force.length() + 1e-4;
        force *= self.strength * c;
        force.y = -force.y;

        self.velocity.get(cell.x, cell.y) + force * self.dt
    }
}

/// Velocity divergence with no-penetration walls.
///
/// A neighbor outside the domain is replaced by the negated center component
/// along that axis, so the wall sees a mirrored inflow.
#[derive(Debug, Clone, Copy)]
pub struct Divergence<'a> {
    pub velocity: &'a Grid<Vec2>,
}

impl<'a> Divergence<'a> {
    pub fn new(velocity: &'a Grid<Vec2>) -> Self {
        Self { velocity }
    }
}

impl Kernel for Divergence<'_> {
    type Output = f32;

    fn id(&self) -> KernelId {
        KernelId::Divergence
    }

    fn extent(&self) -> Option<UVec2> {
        Some(self.velocity.size())
    }

    fn eval(&self, cell: Cell) -> f32 {
        let (x, y) = (cell.ix(), cell.iy());
        let c = self.velocity.get(cell.x, cell.y);

        let l = if cell.x == 0 { -c.x } else { self.velocity.texel(x - 1, y).x };
        let r = if cell.x + 1 == self.velocity.width() { -c.x } else { self.velocity.texel(x + 1, y).x };
        let t = if cell.y + 1 == self.velocity.height() { -c.y } else { self.velocity.texel(x, y + 1).y };
        let b = if cell.y == 0 { -c.y } else { self.velocity.texel(x, y - 1).y };

        0.5 * (r - l + t - b)
    }
}

/// One Jacobi relaxation sweep of the pressure Poisson equation.
///
/// Neighbors past the edge fall back to the edge cell itself.
#[derive(Debug, Clone, Copy)]
pub struct Jacobi<'a> {
    pub pressure: &'a Grid<f32>,
    pub divergence: &'a Grid<f32>,
}

impl Kernel for Jacobi<'_> {
    type Output = f32;

    fn id(&self) -> KernelId {
        KernelId::Jacobi
    }

    fn extent(&self) -> Option<UVec2> {
        Some(self.pressure.size())
    }

    fn eval(&self, cell: Cell) -> f32 {
        let (x, y) = (cell.ix(), cell.iy());

        let l = self.pressure.texel(x - 1, y);
        let r = self.pressure.texel(x + 1, y);
        let t = self.pressure.texel(x, y + 1);
        let b = self.pressure.texel(x, y - 1);
        let div = self.divergence.get(cell.x, cell.y);

        (l + r + b + t - div) * 0.25
    }
}

/// Subtracts the pressure gradient from velocity.
#[derive(Debug, Clone, Copy)]
pub struct GradientSubtract<'a> {
    pub pressure: &'a Grid<f32>,
    pub velocity: &'a Grid<Vec2>,
}

impl Kernel for GradientSubtract<'_> {
    type Output = Vec2;

    fn id(&self) -> KernelId {
        KernelId::GradientSubtract
    }

    fn extent(&self) -> Option<UVec2> {
        Some(self.velocity.size())
    }

    fn eval(&self, cell: Cell) -> Vec2 {
        let (x, y) = (cell.ix(), cell.iy());

        let l = self.pressure.texel(x - 1, y);
        let r = self.pressure.texel(x + 1, y);
        let t = self.pressure.texel(x, y + 1);
        let b = self.pressure.texel(x, y - 1);

        self.velocity.get(cell.x, cell.y) - Vec2::new(r - l, t - b)
    }
}
