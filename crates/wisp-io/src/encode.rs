use std::{fs::File, io::{BufWriter, Write}, path::PathBuf};

use glam::{UVec2, Vec4};
use log::debug;
use thiserror::Error;

use wisp_fluids::{present::PresentationSink, Grid, Sample};

use crate::{as_bytes::AsBytes, frame_path, METADATA_FILE};

/// Records every presented dye frame as raw `f32` data.
///
/// The recording directory holds a `_meta` file, written with the first
/// frame, and one `.dat` file per frame with the samples in row order,
/// bottom row first.
pub struct FrameEncoder {
    /// The directory into which the frames are written.
    path: PathBuf,
    num_frames: u64,
    fps: u32,
    /// Frame size, fixed by the first frame.
    size: Option<UVec2>,
    current_frame: u64,
}

impl FrameEncoder {
    /// Creates `path` (and its parents) for a recording of `num_frames`
    /// frames played back at `fps`.
    pub fn create(path: impl Into<PathBuf>, num_frames: u64, fps: u32) -> Result<Self, EncodingError> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;

        Ok(Self {
            path,
            num_frames,
            fps,
            size: None,
            current_frame: 0,
        })
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.current_frame
    }

    fn encode_metadata(&self, size: UVec2) -> Result<(), EncodingError> {
        let mut writer = BufWriter::new(File::create(self.path.join(METADATA_FILE))?);

        writer.write_all(&size.x.to_bytes())?;
        writer.write_all(&size.y.to_bytes())?;
        writer.write_all(&(Vec4::COMPONENTS as u8).to_bytes())?;
        writer.write_all(&self.fps.to_bytes())?;
        writer.write_all(&self.num_frames.to_bytes())?;
        writer.flush()?;

        debug!("recording {} frames of {}x{} to {}", self.num_frames, size.x, size.y, self.path.display());
        Ok(())
    }

    /// Writes one frame.
    pub fn encode_frame(&mut self, dye: &Grid<Vec4>) -> Result<(), EncodingError> {
        if self.current_frame >= self.num_frames {
            return Err(EncodingError::TooManyFrames(self.num_frames));
        }

        match self.size {
            None => {
                self.encode_metadata(dye.size())?;
                self.size = Some(dye.size());
            }
            Some(expected) if expected != dye.size() => {
                return Err(EncodingError::SizeMismatch { expected, found: dye.size() });
            }
            Some(_) => (),
        }

        let path = frame_path(&self.path, self.current_frame, self.num_frames, "dat");
        let mut writer = BufWriter::new(File::create(path)?);

        for y in 0..dye.height() {
            for x in 0..dye.width() {
                writer.write_all(&dye.get(x, y).to_bytes())?;
            }
        }
        writer.flush()?;

        self.current_frame += 1;
        Ok(())
    }
}

impl PresentationSink for FrameEncoder {
    type Error = EncodingError;

    fn present(&mut self, dye: &Grid<Vec4>) -> Result<(), EncodingError> {
        self.encode_frame(dye)
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("frame is {}x{} but the recording is {}x{}", .found.x, .found.y, .expected.x, .expected.y)]
    SizeMismatch { expected: UVec2, found: UVec2 },
    #[error("pixel buffer does not fit a {}x{} image", .0.x, .0.y)]
    ImageBuffer(UVec2),
    #[error("recording already holds all {0} frames")]
    TooManyFrames(u64),
}
