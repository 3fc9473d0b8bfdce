use std::convert::Infallible;

use glam::Vec4;

use crate::grid::Grid;

/// Something that shows or stores the dye field.
pub trait PresentationSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn present(&mut self, dye: &Grid<Vec4>) -> Result<(), Self::Error>;
}

/// Keeps a copy of the most recently presented frame.
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    frame: Option<Grid<Vec4>>,
    presented: u64,
}

impl LatestFrame {
    pub fn frame(&self) -> Option<&Grid<Vec4>> {
        self.frame.as_ref()
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl PresentationSink for LatestFrame {
    type Error = Infallible;

    fn present(&mut self, dye: &Grid<Vec4>) -> Result<(), Infallible> {
        match &mut self.frame {
            Some(frame) if frame.size() == dye.size() => frame.data_mut().assign(dye.data()),
            frame => *frame = Some(dye.clone()),
        }

        self.presented += 1;
        Ok(())
    }
}

/// Converts a dye grid to 8-bit RGBA, top row first.
///
/// Color channels are clamped to `[0, 1]` and alpha is the brightest color
/// channel, so empty regions are transparent.
pub fn to_rgba8(dye: &Grid<Vec4>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(dye.len() * 4);

    for row in dye.rows_top_down() {
        for c in row {
            let rgb = c.truncate().clamp(glam::Vec3::ZERO, glam::Vec3::ONE);
            let a = rgb.max_element();

            bytes.extend([rgb.x, rgb.y, rgb.z, a].map(|v| (v * 255.0).round() as u8));
        }
    }

    bytes
}
