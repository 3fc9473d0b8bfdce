use crate::{error::BackendError, grid::Grid, kernel::Kernel};

mod cpu;
mod parallel;

pub use cpu::CpuBackend;
pub use parallel::RayonBackend;

/// Executes kernels over every cell of an output grid.
///
/// A backend may evaluate cells in any order and on any number of threads,
/// but `dispatch` must not return before every cell of `output` is written.
/// That return is the only barrier the simulation relies on between passes.
pub trait ComputeBackend {
    fn name(&self) -> &str;

    fn dispatch<K: Kernel>(&self, kernel: &K, output: &mut Grid<K::Output>) -> Result<(), BackendError>;
}

/// Rejects an output grid that does not match the extent the kernel requires.
pub(crate) fn check_extent<K: Kernel>(kernel: &K, output: &Grid<K::Output>) -> Result<(), BackendError> {
    match kernel.extent() {
        Some(expected) if expected != output.size() => Err(BackendError::ExtentMismatch {
            kernel: kernel.id(),
            expected,
            found: output.size(),
        }),
        _ => Ok(()),
    }
}
