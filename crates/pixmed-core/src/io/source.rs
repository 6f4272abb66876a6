use std::path::{Path, PathBuf};

use crate::error::{PixmedError, Result};
use crate::frame::VideoFrame;
use crate::io::image_io::{list_image_sequence, load_rgb_image};
use crate::io::ser::SerReader;

/// Where input frames come from: a SER video or a directory of images.
pub enum FrameSource {
    Ser(SerReader),
    Images(Vec<PathBuf>),
}

impl FrameSource {
    /// Open a directory as an image sequence, anything else as SER.
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Ok(Self::Images(list_image_sequence(path)?))
        } else {
            Ok(Self::Ser(SerReader::open(path)?))
        }
    }

    pub fn frame_count(&self) -> usize {
        match self {
            Self::Ser(reader) => reader.frame_count(),
            Self::Images(paths) => paths.len(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ser(_) => "SER video",
            Self::Images(_) => "image sequence",
        }
    }

    pub fn read_frame(&self, index: usize) -> Result<VideoFrame> {
        match self {
            Self::Ser(reader) => reader.read_frame(index),
            Self::Images(paths) => {
                let path = paths.get(index).ok_or(PixmedError::FrameIndexOutOfRange {
                    index,
                    total: paths.len(),
                })?;
                let mut frame = load_rgb_image(path)?;
                frame.metadata.frame_index = index;
                Ok(frame)
            }
        }
    }

    /// Iterator over all frames, in order.
    pub fn frames(&self) -> impl Iterator<Item = Result<VideoFrame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }
}
