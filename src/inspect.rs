use std::path::Path;

use glam::Vec4;
use log::info;

use wisp_fluids::Grid;
use wisp_io::FrameDecoder;

use crate::error::RunError;

/// Dye intensity statistics of one frame. A cell's intensity is its
/// brightest color channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intensity {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl Intensity {
    pub fn of(dye: &Grid<Vec4>) -> Self {
        let (mut min, mut max, mut sum) = (f32::INFINITY, f32::NEG_INFINITY, 0.0);

        for c in dye.iter() {
            let v = c.truncate().max_element();
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        Self { min, max, mean: sum / dye.len() as f32 }
    }
}

pub fn inspect(dir: &Path) -> Result<(), RunError> {
    let decoder = FrameDecoder::open(dir)?;
    let meta = *decoder.metadata();
    info!(
        "{}: {} frames of {}x{} at {} fps",
        dir.display(), meta.num_frames, meta.width, meta.height, meta.fps,
    );

    println!("frame\tmin\tmax\tmean");
    for (i, frame) in decoder.enumerate() {
        let stats = Intensity::of(&frame?);
        println!("{i}\t{:.5}\t{:.5}\t{:.5}", stats.min, stats.max, stats.mean);
    }

    Ok(())
}
