use ndarray::Array2;
use std::path::PathBuf;

/// One 8-bit color pixel in R, G, B order.
pub type Rgb = [u8; 3];

/// A single color video frame, row-major, shape = (height, width).
#[derive(Clone, Debug, PartialEq)]
pub struct VideoFrame {
    pub data: Array2<Rgb>,
    pub metadata: FrameMetadata,
}

impl VideoFrame {
    pub fn new(data: Array2<Rgb>) -> Self {
        Self {
            data,
            metadata: FrameMetadata::default(),
        }
    }

    /// A frame filled with one color.
    pub fn solid(width: usize, height: usize, color: Rgb) -> Self {
        Self::new(Array2::from_elem((height, width), color))
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Number of pixel locations (rows x cols).
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }
}

/// Single-channel brightness frame matching a [`VideoFrame`].
#[derive(Clone, Debug, PartialEq)]
pub struct LumaFrame {
    pub data: Array2<u8>,
}

impl LumaFrame {
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// Color mode of the source data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ColorMode {
    Mono,
    BayerRGGB,
    BayerGRBG,
    BayerGBRG,
    BayerBGGR,
    RGB,
    BGR,
}

impl ColorMode {
    pub fn is_bayer(&self) -> bool {
        matches!(
            self,
            Self::BayerRGGB | Self::BayerGRBG | Self::BayerGBRG | Self::BayerBGGR
        )
    }
}

/// Metadata about the source file.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_mode: ColorMode,
    pub observer: Option<String>,
    pub telescope: Option<String>,
    pub instrument: Option<String>,
}
