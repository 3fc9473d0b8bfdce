//! Grid-based 2D smoke simulation.
//!
//! A [`Simulation`] owns a coarse velocity field and a finer dye field and
//! advances them with vorticity confinement, a Jacobi pressure projection and
//! semi-Lagrangian advection. Every per-cell pass is a [`Kernel`] run by a
//! [`ComputeBackend`].

pub mod backend;
pub mod config;
pub mod disturb;
pub mod error;
pub mod field;
pub mod grid;
pub mod kernel;
pub mod present;
pub mod resolution;
pub mod simulation;

pub use backend::{ComputeBackend, CpuBackend, RayonBackend};
pub use config::SimulationConfig;
pub use disturb::Disturbance;
pub use error::SimulationError;
pub use field::Field;
pub use grid::{Grid, Sample};
pub use kernel::Kernel;
pub use present::PresentationSink;
pub use simulation::Simulation;
