use std::path::PathBuf;

use glam::Vec4;
use image::RgbaImage;
use log::debug;

use wisp_fluids::{present::{to_rgba8, PresentationSink}, Grid};

use crate::{encode::EncodingError, frame_path};

/// Writes every presented frame as a numbered PNG.
pub struct ImageSink {
    path: PathBuf,
    num_frames: u64,
    current_frame: u64,
}

impl ImageSink {
    /// Creates `path` for `num_frames` images.
    pub fn create(path: impl Into<PathBuf>, num_frames: u64) -> Result<Self, EncodingError> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        debug!("writing {num_frames} images to {}", path.display());

        Ok(Self {
            path,
            num_frames,
            current_frame: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.current_frame
    }
}

impl PresentationSink for ImageSink {
    type Error = EncodingError;

    fn present(&mut self, dye: &Grid<Vec4>) -> Result<(), EncodingError> {
        if self.current_frame >= self.num_frames {
            return Err(EncodingError::TooManyFrames(self.num_frames));
        }

        let size = dye.size();
        let Some(image) = RgbaImage::from_raw(size.x, size.y, to_rgba8(dye)) else {
            return Err(EncodingError::ImageBuffer(size));
        };

        image.save(frame_path(&self.path, self.current_frame, self.num_frames, "png"))?;

        self.current_frame += 1;
        Ok(())
    }
}
