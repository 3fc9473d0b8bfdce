//! Sinks that persist the dye field: a raw frame recording and PNG images.

use std::path::{Path, PathBuf};

pub mod as_bytes;
pub mod decode;
pub mod encode;
pub mod png;

pub use decode::{DecodingError, FrameDecoder, RecordingMetadata};
pub use encode::{EncodingError, FrameEncoder};
pub use png::ImageSink;

/// Name of the metadata file in a recording directory.
pub const METADATA_FILE: &str = "_meta";

/// Path of frame `frame` in `dir`, zero padded to the digit width of the
/// last frame index.
pub(crate) fn frame_path(dir: &Path, frame: u64, num_frames: u64, extension: &str) -> PathBuf {
    let digits = num_frames.saturating_sub(1).checked_ilog10().unwrap_or(0) as usize + 1;

    dir.join(format!("{frame:0digits$}.{extension}"))
}
