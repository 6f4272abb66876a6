use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FILTER_LENGTH;
use crate::engine::MedianStrategy;
use crate::error::{PixmedError, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterConfig {
    /// SER file or directory of images.
    pub input: PathBuf,
    /// `.ser` file, or a directory for numbered images.
    pub output: PathBuf,
    #[serde(default = "default_filter_length")]
    pub filter_length: usize,
    #[serde(default)]
    pub strategy: MedianStrategy,
    /// Working resolution every input frame is resampled to.
    #[serde(default)]
    pub resize: Option<Size>,
    /// Drop the first `filter_length - 1` outputs, which still contain padding.
    #[serde(default)]
    pub skip_warmup: bool,
    #[serde(default)]
    pub max_frames: Option<usize>,
    #[serde(default)]
    pub image_format: ImageSequenceFormat,
}

fn default_filter_length() -> usize {
    DEFAULT_FILTER_LENGTH
}

impl FilterConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            filter_length: DEFAULT_FILTER_LENGTH,
            strategy: MedianStrategy::default(),
            resize: None,
            skip_warmup: false,
            max_frames: None,
            image_format: ImageSequenceFormat::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.filter_length == 0 {
            return Err(PixmedError::InvalidConfiguration(
                "filter_length must be at least 1".into(),
            ));
        }
        if let Some(size) = self.resize {
            if size.width == 0 || size.height == 0 {
                return Err(PixmedError::InvalidConfiguration(format!(
                    "resize target {size} has a zero dimension"
                )));
            }
        }
        if self.max_frames == Some(0) {
            return Err(PixmedError::InvalidConfiguration(
                "max_frames must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Number of leading outputs dropped by `skip_warmup`.
    pub fn warmup_frames(&self) -> usize {
        if self.skip_warmup {
            self.filter_length.saturating_sub(1)
        } else {
            0
        }
    }
}

/// Frame dimensions in pixels, written `WIDTHxHEIGHT` on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid width '{w}'"))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid height '{h}'"))?;
        Ok(Self { width, height })
    }
}

/// File format of frames written to an output directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSequenceFormat {
    #[default]
    Png,
    Tiff,
}

impl ImageSequenceFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Tiff => "tiff",
        }
    }
}

impl std::fmt::Display for ImageSequenceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Tiff => write!(f, "TIFF"),
        }
    }
}
