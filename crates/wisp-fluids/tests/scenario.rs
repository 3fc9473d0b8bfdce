//! End-to-end runs of the full step pipeline.

use glam::{UVec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wisp_fluids::{ComputeBackend, CpuBackend, RayonBackend, Simulation, SimulationConfig};

fn square<B: ComputeBackend>(backend: B) -> Simulation<B> {
    let config = SimulationConfig::default().sim_resolution(128).dye_resolution(512);
    Simulation::new(backend, config, 512, 512).unwrap()
}

#[test]
fn single_splat_decays() {
    let mut sim = square(CpuBackend);
    assert_eq!(sim.sim_size(), UVec2::new(128, 128));
    assert_eq!(sim.dye_size(), UVec2::new(512, 512));

    // Center of the display, pushing up.
    sim.disturb(256.0, 256.0, 0.0, -400.0, Vec3::new(1.0, 0.5, 0.2)).unwrap();

    sim.step(0.0016).unwrap();
    let first = sim.kinetic_energy();
    assert!(first > 0.0);

    for _ in 1..100 {
        sim.step(0.0016).unwrap();
        assert!(sim.is_finite());
    }

    let last = sim.kinetic_energy();
    assert!(last < first, "energy grew from {first} to {last}");
    assert!(sim.dye().is_finite());
}

#[test]
fn backends_agree_on_a_seeded_run() {
    let mut serial = square(CpuBackend);
    let mut parallel = square(RayonBackend::with_threads(4).unwrap());

    serial.seed(6, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
    parallel.seed(6, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();

    for _ in 0..10 {
        serial.step(0.016).unwrap();
        parallel.step(0.016).unwrap();
    }

    assert_eq!(serial.velocity(), parallel.velocity());
    assert_eq!(serial.pressure(), parallel.pressure());
    assert_eq!(serial.dye(), parallel.dye());
}

#[test]
fn dye_follows_the_flow() {
    let config = SimulationConfig::default().sim_resolution(32).dye_resolution(64).curl(0.0);
    let mut sim = Simulation::new(CpuBackend, config, 256, 256).unwrap();

    // A rightward push near the left edge, middle height.
    sim.disturb(64.0, 128.0, 600.0, 0.0, Vec3::X).unwrap();

    let centroid = |sim: &Simulation<CpuBackend>| {
        let dye = sim.dye();
        let (mut weighted, mut total) = (0.0, 0.0);
        for y in 0..dye.height() {
            for x in 0..dye.width() {
                let r = dye.get(x, y).x;
                weighted += r * x as f32;
                total += r;
            }
        }
        weighted / total
    };

    let before = centroid(&sim);
    for _ in 0..20 {
        sim.step(0.016).unwrap();
    }
    let after = centroid(&sim);

    assert!(after > before, "centroid moved from {before} to {after}");
}
