use ndarray::Zip;

use crate::{error::BackendError, grid::Grid, kernel::{Cell, Kernel}};

use super::{check_extent, ComputeBackend};

/// Evaluates kernels cell by cell on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn dispatch<K: Kernel>(&self, kernel: &K, output: &mut Grid<K::Output>) -> Result<(), BackendError> {
        check_extent(kernel, output)?;

        let texel_size = output.texel_size();

        Zip::indexed(output.data_mut()).for_each(|(x, y), out| {
            *out = kernel.eval(Cell::new(x, y, texel_size));
        });

        Ok(())
    }
}
