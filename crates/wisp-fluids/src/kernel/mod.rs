use std::fmt;

use glam::{UVec2, Vec2};

use crate::grid::Sample;

mod splat;
mod stencil;
mod transport;

pub use splat::Splat;
pub use stencil::{Curl, Divergence, GradientSubtract, Jacobi, Vorticity};
pub use transport::{Advect, Clear};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelId {
    Curl,
    Vorticity,
    Divergence,
    Clear,
    Jacobi,
    GradientSubtract,
    Advect,
    Splat,
}

impl fmt::Display for KernelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelId::Curl => "curl",
            KernelId::Vorticity => "vorticity",
            KernelId::Divergence => "divergence",
            KernelId::Clear => "clear",
            KernelId::Jacobi => "jacobi",
            KernelId::GradientSubtract => "gradient subtract",
            KernelId::Advect => "advect",
            KernelId::Splat => "splat",
        };

        f.write_str(name)
    }
}

/// The output cell a kernel is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    /// Normalized coordinate of the cell center.
    pub uv: Vec2,
}

impl Cell {
    #[inline(always)]
    pub fn new(x: usize, y: usize, texel_size: Vec2) -> Self {
        Self {
            x,
            y,
            uv: (Vec2::new(x as f32, y as f32) + 0.5) * texel_size,
        }
    }

    #[inline(always)]
    pub(crate) fn ix(&self) -> isize {
        self.x as isize
    }

    #[inline(always)]
    pub(crate) fn iy(&self) -> isize {
        self.y as isize
    }
}

/// A per-cell grid operator.
///
/// A kernel borrows its input grids and carries its scalar parameters as
/// plain fields. [`Kernel::eval`] must depend only on those inputs, never on
/// other output cells, so a backend is free to evaluate cells in any order
/// or in parallel.
pub trait Kernel: Sync {
    type Output: Sample;

    fn id(&self) -> KernelId;

    /// Size the output grid must have, when the kernel is tied to the
    /// resolution of one of its inputs.
    fn extent(&self) -> Option<UVec2> {
        None
    }

    fn eval(&self, cell: Cell) -> Self::Output;
}
