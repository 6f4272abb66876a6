use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixmedError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(
        "Filter already initialized with {current_locations} locations x {current_length} samples, \
         cannot re-initialize with {requested_locations} x {requested_length}"
    )]
    AlreadyInitializedMismatch {
        current_locations: usize,
        current_length: usize,
        requested_locations: usize,
        requested_length: usize,
    },

    #[error("Frame has {actual} pixels, filter expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Unsupported color mode: {0}")]
    UnsupportedColorMode(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Empty frame sequence")]
    EmptySequence,
}

pub type Result<T> = std::result::Result<T, PixmedError>;
