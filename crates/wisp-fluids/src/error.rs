use glam::UVec2;
use thiserror::Error;

use crate::kernel::KernelId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("display size {width}x{height} has an empty side")]
    EmptyDisplay { width: u32, height: u32 },
    #[error("grid resolution must be positive")]
    ZeroResolution,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be in (0, 1], got {value}")]
    Dissipation { name: &'static str, value: f32 },
    #[error("splat radius must be positive and finite, got {0}")]
    SplatRadius(f32),
    #[error("vorticity strength must be finite, got {0}")]
    Curl(f32),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

#[derive(Debug, Error)]
pub enum BackendError {
    /// The output grid does not have the size the kernel was built for.
    #[error("{kernel} kernel expects a {expected} output grid, got {found}")]
    ExtentMismatch { kernel: KernelId, expected: UVec2, found: UVec2 },
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("kernel dispatch failed: {0}")]
    Backend(#[from] BackendError),
}
