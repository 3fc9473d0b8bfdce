use glam::{UVec2, Vec2, Vec4};
use log::{debug, trace};

use crate::{
    backend::ComputeBackend,
    config::SimulationConfig,
    error::SimulationError,
    field::Field,
    grid::Grid,
    kernel::{Advect, Clear, Curl, Divergence, GradientSubtract, Jacobi, Vorticity},
    present::PresentationSink,
    resolution::grid_size,
};

/// A 2D smoke simulation: a velocity field on a coarse grid transporting a
/// dye field on a finer one.
///
/// Owns every field it touches. Kernels run on the backend `B`.
pub struct Simulation<B> {
    pub(crate) backend: B,
    pub(crate) config: SimulationConfig,
    /// Display size, in pixels.
    pub(crate) display: UVec2,

    /// Simulation grid velocity.
    pub(crate) velocity: Field<Vec2>,
    /// Dye color on the dye grid.
    pub(crate) dye: Field<Vec4>,
    pressure: Field<f32>,
    divergence: Grid<f32>,
    curl: Grid<f32>,
}

impl<B: ComputeBackend> Simulation<B> {
    /// Validates `config` and allocates every field for a display of
    /// `width × height` pixels.
    pub fn new(backend: B, config: SimulationConfig, width: u32, height: u32) -> Result<Self, SimulationError> {
        config.validate()?;

        let display = UVec2::new(width, height);
        let sim_size = grid_size(display, config.sim_resolution)?;
        let dye_size = grid_size(display, config.dye_resolution)?;

        debug!(
            "simulation {}x{} dye {}x{} on {} backend",
            sim_size.x, sim_size.y, dye_size.x, dye_size.y, backend.name(),
        );

        Ok(Self {
            backend,
            config,
            display,
            velocity: Field::new(sim_size),
            dye: Field::new(dye_size),
            pressure: Field::new(sim_size),
            divergence: Grid::new(sim_size),
            curl: Grid::new(sim_size),
        })
    }

    /// Advances the simulation by `dt`.
    ///
    /// Runs vorticity confinement, pressure projection and advection, in that
    /// order. If a dispatch fails the fields are left part way through the
    /// step and the frame should not be presented.
    pub fn step(&mut self, dt: f32) -> Result<(), SimulationError> {
        self.confine_vorticity(dt)?;
        self.project()?;
        self.advect(dt)?;

        Ok(())
    }

    /// Curl, then vorticity confinement into velocity.
    pub fn confine_vorticity(&mut self, dt: f32) -> Result<(), SimulationError> {
        trace!("curl");
        self.backend.dispatch(&Curl::new(self.velocity.read()), &mut self.curl)?;

        trace!("vorticity");
        self.velocity.update(|velocity, out| {
            let vorticity = Vorticity {
                velocity,
                curl: &self.curl,
                strength: self.config.curl,
                dt,
            };
            self.backend.dispatch(&vorticity, out)
        })?;

        Ok(())
    }

    /// Makes velocity approximately divergence free.
    ///
    /// Computes divergence, decays the previous pressure, relaxes pressure
    /// with a fixed number of Jacobi sweeps and subtracts its gradient.
    pub fn project(&mut self) -> Result<(), SimulationError> {
        trace!("divergence");
        self.backend.dispatch(&Divergence::new(self.velocity.read()), &mut self.divergence)?;

        trace!("clear pressure");
        self.pressure.update(|pressure, out| {
            self.backend.dispatch(&Clear::new(pressure, self.config.pressure_dissipation), out)
        })?;

        trace!("jacobi x{}", self.config.pressure_iterations);
        for _ in 0..self.config.pressure_iterations {
            self.pressure.update(|pressure, out| {
                let jacobi = Jacobi {
                    pressure,
                    divergence: &self.divergence,
                };
                self.backend.dispatch(&jacobi, out)
            })?;
        }

        trace!("gradient subtract");
        self.velocity.update(|velocity, out| {
            let subtract = GradientSubtract {
                pressure: self.pressure.read(),
                velocity,
            };
            self.backend.dispatch(&subtract, out)
        })?;

        Ok(())
    }

    /// Self-advects velocity, then carries the dye along the new velocity.
    pub fn advect(&mut self, dt: f32) -> Result<(), SimulationError> {
        trace!("advect velocity");
        self.velocity.update(|velocity, out| {
            let advect = Advect::new(velocity, velocity, dt, self.config.velocity_dissipation);
            self.backend.dispatch(&advect, out)
        })?;

        trace!("advect dye");
        self.dye.update(|dye, out| {
            let advect = Advect::new(self.velocity.read(), dye, dt, self.config.density_dissipation);
            self.backend.dispatch(&advect, out)
        })?;

        Ok(())
    }

    /// Hands the current dye field to `sink`.
    pub fn render<S: PresentationSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.present(self.dye.read())
    }

    /// Reallocates the fields for a new display size.
    ///
    /// Velocity and dye are resampled onto the new grids. Pressure,
    /// divergence and curl restart from zero.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SimulationError> {
        let display = UVec2::new(width, height);
        let sim_size = grid_size(display, self.config.sim_resolution)?;
        let dye_size = grid_size(display, self.config.dye_resolution)?;
        self.display = display;

        if sim_size != self.sim_size() {
            debug!("resizing simulation grid to {}x{}", sim_size.x, sim_size.y);
            let velocity = self.velocity.read().resampled(sim_size);
            self.velocity.replace(velocity);
            self.pressure = Field::new(sim_size);
            self.divergence = Grid::new(sim_size);
            self.curl = Grid::new(sim_size);
        }

        if dye_size != self.dye_size() {
            debug!("resizing dye grid to {}x{}", dye_size.x, dye_size.y);
            let dye = self.dye.read().resampled(dye_size);
            self.dye.replace(dye);
        }

        Ok(())
    }

    /// Sum of `|v|²` over the simulation grid.
    pub fn kinetic_energy(&self) -> f32 {
        self.velocity.read().sum_squared()
    }

    /// Mean absolute divergence of the current velocity.
    ///
    /// Overwrites the divergence grid, which the next step recomputes anyway.
    pub fn mean_abs_divergence(&mut self) -> Result<f32, SimulationError> {
        self.backend.dispatch(&Divergence::new(self.velocity.read()), &mut self.divergence)?;

        let sum: f32 = self.divergence.iter().map(|d| d.abs()).sum();
        Ok(sum / self.divergence.len() as f32)
    }

    /// `false` if any velocity, pressure or dye value is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.velocity.read().is_finite() && self.pressure.read().is_finite() && self.dye.read().is_finite()
    }

    #[inline(always)]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline(always)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Display size, in pixels.
    #[inline(always)]
    pub fn display_size(&self) -> UVec2 {
        self.display
    }

    #[inline(always)]
    pub fn sim_size(&self) -> UVec2 {
        self.velocity.size()
    }

    #[inline(always)]
    pub fn dye_size(&self) -> UVec2 {
        self.dye.size()
    }

    #[inline(always)]
    pub fn velocity(&self) -> &Grid<Vec2> {
        self.velocity.read()
    }

    /// Mutable access to the current velocity, for setting up initial
    /// conditions between steps.
    #[inline(always)]
    pub fn velocity_mut(&mut self) -> &mut Grid<Vec2> {
        self.velocity.read_mut()
    }

    #[inline(always)]
    pub fn dye(&self) -> &Grid<Vec4> {
        self.dye.read()
    }

    #[inline(always)]
    pub fn dye_mut(&mut self) -> &mut Grid<Vec4> {
        self.dye.read_mut()
    }

    #[inline(always)]
    pub fn pressure(&self) -> &Grid<f32> {
        self.pressure.read()
    }

    #[inline(always)]
    pub fn divergence(&self) -> &Grid<f32> {
        &self.divergence
    }

    #[inline(always)]
    pub fn curl(&self) -> &Grid<f32> {
        &self.curl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::CpuBackend, error::ConfigError, present::LatestFrame};

    fn small(config: SimulationConfig) -> Simulation<CpuBackend> {
        Simulation::new(CpuBackend, config.sim_resolution(32).dye_resolution(64), 400, 300).unwrap()
    }

    #[test]
    fn allocates_per_resolution_policy() {
        let sim = Simulation::new(CpuBackend, SimulationConfig::default(), 1024, 768).unwrap();

        assert_eq!(sim.sim_size(), UVec2::new(170, 128));
        assert_eq!(sim.dye_size(), UVec2::new(682, 512));
        assert_eq!(sim.pressure().size(), sim.sim_size());
        assert_eq!(sim.curl().size(), sim.sim_size());
        assert_eq!(sim.divergence().size(), sim.sim_size());
    }

    #[test]
    fn rejects_invalid_setup() {
        let err = Simulation::new(CpuBackend, SimulationConfig::default().velocity_dissipation(2.0), 100, 100);
        assert!(matches!(err, Err(SimulationError::Config(ConfigError::Dissipation { .. }))));

        let err = Simulation::new(CpuBackend, SimulationConfig::default(), 0, 100);
        assert!(matches!(err, Err(SimulationError::Resolution(_))));
    }

    #[test]
    fn still_fluid_stays_still() {
        let mut sim = small(SimulationConfig::default());

        for _ in 0..5 {
            sim.step(0.016).unwrap();
        }

        assert_eq!(sim.kinetic_energy(), 0.0);
        assert!(sim.dye().iter().all(|&c| c == Vec4::ZERO));
    }

    #[test]
    fn unforced_energy_is_non_increasing() {
        let mut sim = small(SimulationConfig::default().velocity_dissipation(0.98));

        let mut last = sim.kinetic_energy();
        for _ in 0..20 {
            sim.step(0.016).unwrap();
            let energy = sim.kinetic_energy();
            assert!(energy <= last);
            last = energy;
        }
    }

    #[test]
    fn advection_applies_velocity_dissipation() {
        let mut sim = small(SimulationConfig::default());
        sim.velocity_mut().set(10, 10, Vec2::new(1.0, 0.0));

        sim.advect(0.0).unwrap();

        assert!((sim.velocity().get(10, 10).x - 0.98).abs() < 1e-4);
    }

    #[test]
    fn dye_advects_with_updated_velocity() {
        let config = SimulationConfig::default();
        let mut sim = small(config.clone());
        let dt = 0.05;

        *sim.velocity_mut() = Grid::from_fn(sim.sim_size(), |i| {
            Vec2::new((i.y as f32 * 0.3).sin() * 20.0, (i.x as f32 * 0.3).cos() * 20.0)
        });
        *sim.dye_mut() = Grid::from_fn(sim.dye_size(), |i| Vec4::new(i.x as f32 / 85.0, i.y as f32 / 64.0, 0.5, 1.0));
        let velocity_before = sim.velocity().clone();
        let dye_before = sim.dye().clone();

        sim.advect(dt).unwrap();
        assert_ne!(sim.velocity(), &velocity_before);

        let mut expected = Grid::new(sim.dye_size());
        let advect = Advect::new(sim.velocity(), &dye_before, dt, config.density_dissipation);
        CpuBackend.dispatch(&advect, &mut expected).unwrap();
        assert_eq!(sim.dye(), &expected);

        let mut stale = Grid::new(sim.dye_size());
        let advect = Advect::new(&velocity_before, &dye_before, dt, config.density_dissipation);
        CpuBackend.dispatch(&advect, &mut stale).unwrap();
        assert_ne!(sim.dye(), &stale);
    }

    #[test]
    fn projection_without_sweeps_uses_cleared_pressure() {
        let mut sim = small(SimulationConfig::default().pressure_iterations(0));
        let ramp = Grid::from_fn(sim.sim_size(), |i| 0.5 * i.x as f32);
        *sim.pressure.read_mut() = ramp.clone();

        sim.project().unwrap();

        let cleared = Grid::from_fn(sim.sim_size(), |i| ramp.get(i.x as usize, i.y as usize) * 0.8);
        assert_eq!(sim.pressure(), &cleared);

        let size = sim.sim_size();
        for y in 1..size.y as usize - 1 {
            for x in 1..size.x as usize - 1 {
                let v = sim.velocity().get(x, y);
                assert!((v.x + 0.8).abs() < 1e-5, "({x}, {y}) {v}");
                assert_eq!(v.y, 0.0);
            }
        }
    }

    #[test]
    fn projection_reduces_divergence() {
        let mut sim = small(SimulationConfig::default());
        sim.disturb(200.0, 150.0, 300.0, -200.0, glam::Vec3::ONE).unwrap();

        let before = sim.mean_abs_divergence().unwrap();
        sim.project().unwrap();
        let after = sim.mean_abs_divergence().unwrap();

        assert!(before > 0.0);
        assert!(after < before, "divergence {before} -> {after}");
    }

    #[test]
    fn render_presents_dye() {
        let mut sim = small(SimulationConfig::default());
        sim.disturb(200.0, 150.0, 0.0, 0.0, glam::Vec3::new(1.0, 0.5, 0.0)).unwrap();

        let mut sink = LatestFrame::default();
        sim.render(&mut sink).unwrap();

        assert_eq!(sink.frame(), Some(sim.dye()));
    }

    #[test]
    fn resize_reallocates() {
        let mut sim = small(SimulationConfig::default());
        sim.disturb(200.0, 150.0, 100.0, 0.0, glam::Vec3::ONE).unwrap();
        sim.step(0.016).unwrap();

        sim.resize(300, 400).unwrap();

        assert_eq!(sim.display_size(), UVec2::new(300, 400));
        assert_eq!(sim.sim_size(), UVec2::new(32, 42));
        assert_eq!(sim.dye_size(), UVec2::new(64, 85));
        assert_eq!(sim.pressure().size(), sim.sim_size());
        assert!(sim.kinetic_energy() > 0.0);

        sim.step(0.016).unwrap();
        assert!(sim.is_finite());
    }

    #[test]
    fn resize_to_same_size_keeps_pressure() {
        let mut sim = small(SimulationConfig::default());
        sim.disturb(200.0, 150.0, 100.0, 0.0, glam::Vec3::ONE).unwrap();
        sim.step(0.016).unwrap();
        let pressure = sim.pressure().clone();

        sim.resize(400, 300).unwrap();
        assert_eq!(sim.pressure(), &pressure);
    }
}
