use std::path::{Path, PathBuf};

use crate::consts::FRAME_NUMBER_WIDTH;
use crate::error::Result;
use crate::frame::VideoFrame;
use crate::io::image_io::save_rgb_image;
use crate::io::ser::SerHeader;
use crate::io::ser_writer::SerWriter;
use crate::pipeline::config::ImageSequenceFormat;

/// Where filtered frames go: a SER video or numbered images in a directory.
pub enum FrameSink {
    Ser(SerWriter),
    Images {
        dir: PathBuf,
        format: ImageSequenceFormat,
        written: usize,
    },
}

impl FrameSink {
    /// A `.ser` path becomes a SER video; any other path is used as an
    /// output directory (created if missing).
    pub fn create(
        path: &Path,
        width: u32,
        height: u32,
        format: ImageSequenceFormat,
    ) -> Result<Self> {
        if is_ser_path(path) {
            let header = SerHeader::rgb8(width, height);
            Ok(Self::Ser(SerWriter::create(path, &header)?))
        } else {
            std::fs::create_dir_all(path)?;
            Ok(Self::Images {
                dir: path.to_path_buf(),
                format,
                written: 0,
            })
        }
    }

    pub fn write(&mut self, frame: &VideoFrame) -> Result<()> {
        match self {
            Self::Ser(writer) => writer.write_frame(frame),
            Self::Images {
                dir,
                format,
                written,
            } => {
                let name = format!(
                    "frame_{:0width$}.{}",
                    *written,
                    format.extension(),
                    width = FRAME_NUMBER_WIDTH
                );
                save_rgb_image(frame, &dir.join(name))?;
                *written += 1;
                Ok(())
            }
        }
    }

    pub fn frames_written(&self) -> usize {
        match self {
            Self::Ser(writer) => writer.frames_written() as usize,
            Self::Images { written, .. } => *written,
        }
    }

    pub fn finish(self) -> Result<()> {
        match self {
            Self::Ser(writer) => writer.finalize(),
            Self::Images { .. } => Ok(()),
        }
    }
}

pub fn is_ser_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ser"))
}
