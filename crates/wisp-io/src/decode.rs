use std::{fs::File, io::{BufReader, Read}, path::{Path, PathBuf}};

use glam::{UVec2, Vec4};
use thiserror::Error;

use wisp_fluids::{Grid, Sample};

use crate::{as_bytes::AsBytes, frame_path, METADATA_FILE};

/// Reads a recording written by [`FrameEncoder`](crate::FrameEncoder).
pub struct FrameDecoder {
    /// The directory in which the recording resides.
    path: PathBuf,
    metadata: RecordingMetadata,
    current_frame: u64,
}

impl FrameDecoder {
    /// Opens the recording in `path` and reads its metadata.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DecodingError> {
        let path = path.into();
        let metadata = Self::decode_metadata(&path)?;

        Ok(Self {
            path,
            metadata,
            current_frame: 0,
        })
    }

    fn read_value<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R) -> Result<T, DecodingError> {
        let mut bytes = [0; N];
        reader.read_exact(&mut bytes)?;

        Ok(T::from_bytes(bytes))
    }

    fn decode_metadata(path: &Path) -> Result<RecordingMetadata, DecodingError> {
        let mut reader = BufReader::new(File::open(path.join(METADATA_FILE))?);

        let width = Self::read_value::<4, u32, _>(&mut reader)?;
        let height = Self::read_value::<4, u32, _>(&mut reader)?;
        let components = Self::read_value::<1, u8, _>(&mut reader)?;
        let fps = Self::read_value::<4, u32, _>(&mut reader)?;
        let num_frames = Self::read_value::<8, u64, _>(&mut reader)?;

        if components as usize != Vec4::COMPONENTS {
            return Err(DecodingError::Components(components));
        }

        if width == 0 || height == 0 {
            return Err(DecodingError::EmptyFrame { width, height });
        }

        Ok(RecordingMetadata {
            width,
            height,
            components,
            fps,
            num_frames,
        })
    }

    pub fn metadata(&self) -> &RecordingMetadata {
        &self.metadata
    }

    /// Reads the next frame, or `None` past the last one.
    ///
    /// A frame that fails to decode is skipped by the following call.
    pub fn decode_frame(&mut self) -> Result<Option<Grid<Vec4>>, DecodingError> {
        if self.current_frame >= self.metadata.num_frames {
            return Ok(None);
        }

        let frame = self.current_frame;
        self.current_frame += 1;

        let path = frame_path(&self.path, frame, self.metadata.num_frames, "dat");
        let mut bytes = Vec::new();
        BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;

        let size = self.metadata.size();
        let expected = size.x as usize * size.y as usize * 16;
        if bytes.len() != expected {
            return Err(DecodingError::FrameLength {
                frame,
                expected,
                found: bytes.len(),
            });
        }

        let values: Vec<Vec4> = bytes
            .chunks_exact(16)
            .map(|chunk| {
                let mut b = [0; 16];
                b.copy_from_slice(chunk);
                Vec4::from_bytes(b)
            })
            .collect();

        let width = size.x as usize;
        Ok(Some(Grid::from_fn(size, |i| values[i.y as usize * width + i.x as usize])))
    }

    /// Rewinds to the first frame.
    pub fn reset(&mut self) {
        self.current_frame = 0;
    }
}

impl Iterator for FrameDecoder {
    type Item = Result<Grid<Vec4>, DecodingError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode_frame().transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingMetadata {
    pub width: u32,
    pub height: u32,
    pub components: u8,
    pub fps: u32,
    pub num_frames: u64,
}

impl RecordingMetadata {
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }
}

#[derive(Debug, Error)]
pub enum DecodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unsupported component count {0}")]
    Components(u8),
    #[error("recording has an empty {width}x{height} frame size")]
    EmptyFrame { width: u32, height: u32 },
    #[error("frame {frame} holds {found} bytes, expected {expected}")]
    FrameLength { frame: u64, expected: usize, found: usize },
}
