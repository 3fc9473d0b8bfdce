use ndarray::Zip;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{error::BackendError, grid::Grid, kernel::{Cell, Kernel}};

use super::{check_extent, ComputeBackend};

/// Evaluates kernels on a rayon thread pool.
///
/// Cells are split across threads by ndarray's parallel `Zip`; the dispatch
/// returns once the whole grid has been written.
#[derive(Debug, Default)]
pub struct RayonBackend {
    /// Dedicated pool. `None` runs on the global rayon pool.
    pool: Option<ThreadPool>,
}

impl RayonBackend {
    /// A backend running on the global rayon pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// A backend with its own pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self, BackendError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("wisp-kernel-{i}"))
            .build()?;

        Ok(Self { pool: Some(pool) })
    }

    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl ComputeBackend for RayonBackend {
    fn name(&self) -> &str {
        "rayon"
    }

    fn dispatch<K: Kernel>(&self, kernel: &K, output: &mut Grid<K::Output>) -> Result<(), BackendError> {
        check_extent(kernel, output)?;

        let texel_size = output.texel_size();
        let mut run = || {
            Zip::indexed(output.data_mut()).par_for_each(|(x, y), out| {
                *out = kernel.eval(Cell::new(x, y, texel_size));
            });
        };

        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }

        Ok(())
    }
}
