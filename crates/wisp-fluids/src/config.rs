use crate::error::{ConfigError, ResolutionError};

/// Solver tunables. Set once before the first step and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Cells along the short axis of the simulation grid.
    pub sim_resolution: u32,
    /// Cells along the short axis of the dye grid.
    pub dye_resolution: u32,
    /// Multiplicative dye decay per step.
    pub density_dissipation: f32,
    /// Multiplicative velocity decay per step.
    pub velocity_dissipation: f32,
    /// Decay applied to the previous pressure before each solve.
    pub pressure_dissipation: f32,
    /// Jacobi sweeps per step. There is no early exit.
    pub pressure_iterations: u32,
    /// Vorticity confinement strength.
    pub curl: f32,
    /// Splat radius. Kernels receive `splat_radius / 100`.
    pub splat_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sim_resolution: 128,
            dye_resolution: 512,
            density_dissipation: 0.97,
            velocity_dissipation: 0.98,
            pressure_dissipation: 0.8,
            pressure_iterations: 20,
            curl: 30.0,
            splat_radius: 0.5,
        }
    }
}

impl SimulationConfig {
    pub fn sim_resolution(mut self, resolution: u32) -> Self {
        self.sim_resolution = resolution;
        self
    }

    pub fn dye_resolution(mut self, resolution: u32) -> Self {
        self.dye_resolution = resolution;
        self
    }

    pub fn density_dissipation(mut self, dissipation: f32) -> Self {
        self.density_dissipation = dissipation;
        self
    }

    pub fn velocity_dissipation(mut self, dissipation: f32) -> Self {
        self.velocity_dissipation = dissipation;
        self
    }

    pub fn pressure_dissipation(mut self, dissipation: f32) -> Self {
        self.pressure_dissipation = dissipation;
        self
    }

    pub fn pressure_iterations(mut self, iterations: u32) -> Self {
        self.pressure_iterations = iterations;
        self
    }

    pub fn curl(mut self, curl: f32) -> Self {
        self.curl = curl;
        self
    }

    pub fn splat_radius(mut self, radius: f32) -> Self {
        self.splat_radius = radius;
        self
    }

    /// Radius as the splat kernel consumes it.
    #[inline(always)]
    pub fn kernel_splat_radius(&self) -> f32 {
        self.splat_radius / 100.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sim_resolution == 0 || self.dye_resolution == 0 {
            return Err(ResolutionError::ZeroResolution.into());
        }

        for (name, value) in [
            ("density_dissipation", self.density_dissipation),
            ("velocity_dissipation", self.velocity_dissipation),
            ("pressure_dissipation", self.pressure_dissipation),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Dissipation { name, value });
            }
        }

        if !(self.splat_radius.is_finite() && self.splat_radius > 0.0) {
            return Err(ConfigError::SplatRadius(self.splat_radius));
        }

        if !self.curl.is_finite() {
            return Err(ConfigError::Curl(self.curl));
        }

        Ok(())
    }
}
