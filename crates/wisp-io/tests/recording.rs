use std::path::PathBuf;

use glam::{UVec2, Vec3, Vec4};

use wisp_fluids::{present::PresentationSink, CpuBackend, Grid, Simulation, SimulationConfig};
use wisp_io::{DecodingError, EncodingError, FrameDecoder, FrameEncoder, ImageSink, METADATA_FILE};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wisp-io-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn gradient(size: UVec2, t: f32) -> Grid<Vec4> {
    Grid::from_fn(size, |i| Vec4::new(i.x as f32 * 0.1, i.y as f32 * -2.0, t, 1.0))
}

#[test]
fn recording_round_trip() {
    let dir = scratch("round-trip");
    let size = UVec2::new(5, 3);

    let mut encoder = FrameEncoder::create(&dir, 12, 30).unwrap();
    for t in 0..12 {
        encoder.present(&gradient(size, t as f32)).unwrap();
    }
    assert_eq!(encoder.frames_written(), 12);
    assert!(dir.join(METADATA_FILE).exists());
    assert!(dir.join("00.dat").exists());
    assert!(dir.join("11.dat").exists());

    let mut decoder = FrameDecoder::open(&dir).unwrap();
    let meta = *decoder.metadata();
    assert_eq!(meta.size(), size);
    assert_eq!(meta.components, 4);
    assert_eq!(meta.fps, 30);
    assert_eq!(meta.num_frames, 12);

    for t in 0..12 {
        let frame = decoder.decode_frame().unwrap().unwrap();
        assert_eq!(frame, gradient(size, t as f32));
    }
    assert!(decoder.decode_frame().unwrap().is_none());

    decoder.reset();
    assert_eq!(decoder.count(), 12);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn simulation_frames_survive_recording() {
    let dir = scratch("simulation");
    let config = SimulationConfig::default().sim_resolution(16).dye_resolution(32);
    let mut sim = Simulation::new(CpuBackend, config, 200, 100).unwrap();
    sim.disturb(100.0, 50.0, 200.0, 100.0, Vec3::new(0.2, 0.9, 0.4)).unwrap();

    let mut encoder = FrameEncoder::create(&dir, 3, 60).unwrap();
    let mut expected = Vec::new();
    for _ in 0..3 {
        sim.step(0.016).unwrap();
        sim.render(&mut encoder).unwrap();
        expected.push(sim.dye().clone());
    }

    let frames: Vec<_> = FrameDecoder::open(&dir).unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(frames, expected);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn encoder_rejects_bad_frames() {
    let dir = scratch("reject");

    let mut encoder = FrameEncoder::create(&dir, 2, 60).unwrap();
    encoder.present(&gradient(UVec2::new(4, 4), 0.0)).unwrap();

    let err = encoder.present(&gradient(UVec2::new(4, 5), 0.0));
    assert!(matches!(err, Err(EncodingError::SizeMismatch { .. })));

    encoder.present(&gradient(UVec2::new(4, 4), 1.0)).unwrap();
    let err = encoder.present(&gradient(UVec2::new(4, 4), 2.0));
    assert!(matches!(err, Err(EncodingError::TooManyFrames(2))));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn decoder_reports_truncated_frames() {
    let dir = scratch("truncated");

    let mut encoder = FrameEncoder::create(&dir, 2, 60).unwrap();
    encoder.present(&gradient(UVec2::new(3, 3), 0.0)).unwrap();
    encoder.present(&gradient(UVec2::new(3, 3), 1.0)).unwrap();
    std::fs::write(dir.join("0.dat"), [0u8; 20]).unwrap();

    let mut decoder = FrameDecoder::open(&dir).unwrap();
    let err = decoder.decode_frame();
    assert!(matches!(err, Err(DecodingError::FrameLength { frame: 0, expected: 144, found: 20 })));
    assert!(decoder.decode_frame().unwrap().is_some());

    assert!(matches!(FrameDecoder::open(dir.join("missing")), Err(DecodingError::Io(_))));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn image_sink_writes_pngs() {
    let dir = scratch("png");
    let size = UVec2::new(6, 4);

    let mut sink = ImageSink::create(&dir, 2).unwrap();
    let dye = Grid::from_fn(size, |i| if i.y == 3 { Vec4::new(1.0, 0.0, 0.0, 1.0) } else { Vec4::ZERO });
    sink.present(&dye).unwrap();
    sink.present(&dye).unwrap();
    assert_eq!(sink.frames_written(), 2);

    let image = image::open(dir.join("0.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (6, 4));
    // Top row of the grid is the first image row.
    assert_eq!(image.get_pixel(2, 0).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(2, 3).0, [0, 0, 0, 0]);

    std::fs::remove_dir_all(&dir).unwrap();
}
