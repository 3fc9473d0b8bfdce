use glam::{Vec2, Vec3};
use log::debug;
use rand::Rng;

use crate::{backend::ComputeBackend, error::SimulationError, kernel::Splat, simulation::Simulation};

/// An impulse applied at a point on the display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disturbance {
    /// Position in display pixels, `y` pointing down.
    pub position: Vec2,
    /// Velocity impulse in display orientation, `y` pointing down.
    pub velocity: Vec2,
    /// Dye color added around the point.
    pub color: Vec3,
}

impl Disturbance {
    pub fn new(position: Vec2, velocity: Vec2, color: Vec3) -> Self {
        Self { position, velocity, color }
    }
}

impl<B: ComputeBackend> Simulation<B> {
    /// Stirs the fluid at display pixel `(x, y)` with velocity `(dx, dy)` and
    /// drops `color` dye at the same spot.
    pub fn disturb(&mut self, x: f32, y: f32, dx: f32, dy: f32, color: Vec3) -> Result<(), SimulationError> {
        self.apply(&Disturbance::new(Vec2::new(x, y), Vec2::new(dx, dy), color))
    }

    pub fn apply(&mut self, disturbance: &Disturbance) -> Result<(), SimulationError> {
        let display = self.display.as_vec2();
        let point = Vec2::new(disturbance.position.x / display.x, 1.0 - disturbance.position.y / display.y);
        let aspect_ratio = display.x / display.y;
        let radius = self.config.kernel_splat_radius();

        self.velocity.update(|velocity, out| {
            let splat = Splat {
                target: velocity,
                point,
                impulse: Vec2::new(disturbance.velocity.x, -disturbance.velocity.y),
                aspect_ratio,
                radius,
            };
            self.backend.dispatch(&splat, out)
        })?;

        self.dye.update(|dye, out| {
            let splat = Splat {
                target: dye,
                point,
                impulse: disturbance.color.extend(0.0),
                aspect_ratio,
                radius,
            };
            self.backend.dispatch(&splat, out)
        })?;

        Ok(())
    }

    /// Applies `count` random disturbances across the display.
    pub fn seed<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<(), SimulationError> {
        debug!("seeding {count} splats");

        let display = self.display.as_vec2();

        for _ in 0..count {
            self.apply(&random_disturbance(rng, display))?;
        }

        Ok(())
    }
}

/// A random splat somewhere on a display of size `display`.
///
/// Positions land on whole pixels. Velocity components are uniform in
/// `[-500, 500)`.
pub fn random_disturbance<R: Rng + ?Sized>(rng: &mut R, display: Vec2) -> Disturbance {
    let color = random_color(rng) * 10.0;
    let position = (Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()) * display).floor();
    let velocity = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * 1000.0;

    Disturbance::new(position, velocity, color)
}

/// A fully saturated color of random hue, dimmed to 15%.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    hsv_to_rgb(rng.gen::<f32>(), 1.0, 1.0) * 0.15
}

/// Converts hue, saturation and value in `[0, 1]` to RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (i as i32).rem_euclid(6) {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}
