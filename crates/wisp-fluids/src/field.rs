use std::mem;

use glam::UVec2;

use crate::grid::{Grid, Sample};

/// A double-buffered grid.
///
/// `read` holds the current state and `write` receives the output of the
/// next kernel. The two buffers are separate allocations and are only ever
/// exchanged by [`Field::swap`], so a kernel always samples the fully settled
/// state of the previous pass.
#[derive(Debug, Clone)]
pub struct Field<T> {
    read: Grid<T>,
    write: Grid<T>,
}

impl<T: Sample> Field<T> {
    pub fn new(size: UVec2) -> Self {
        Self {
            read: Grid::new(size),
            write: Grid::new(size),
        }
    }

    /// Creates a field whose current state is `grid`.
    pub fn from_grid(grid: Grid<T>) -> Self {
        Self {
            write: Grid::new(grid.size()),
            read: grid,
        }
    }

    #[inline(always)]
    pub fn size(&self) -> UVec2 {
        self.read.size()
    }

    /// The current state.
    #[inline(always)]
    pub fn read(&self) -> &Grid<T> {
        &self.read
    }

    /// Mutable access to the current state, for seeding a field between
    /// kernel passes.
    #[inline(always)]
    pub fn read_mut(&mut self) -> &mut Grid<T> {
        &mut self.read
    }

    /// The scratch buffer the next kernel writes into.
    #[inline(always)]
    pub fn write(&mut self) -> &mut Grid<T> {
        &mut self.write
    }

    /// Makes the scratch buffer the current state.
    #[inline(always)]
    pub fn swap(&mut self) {
        mem::swap(&mut self.read, &mut self.write);
    }

    /// Runs one pass from the current state into the scratch buffer and
    /// makes the result current. A failed pass leaves the current state as
    /// it was.
    pub fn update<E, F>(&mut self, pass: F) -> Result<(), E>
    where
        F: FnOnce(&Grid<T>, &mut Grid<T>) -> Result<(), E>,
    {
        pass(&self.read, &mut self.write)?;
        self.swap();

        Ok(())
    }

    /// Replaces both buffers with grids of a new size. The current state
    /// becomes `grid`.
    pub fn replace(&mut self, grid: Grid<T>) {
        self.write = Grid::new(grid.size());
        self.read = grid;
    }
}
