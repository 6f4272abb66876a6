/// Minimum pixel count (h*w) to update windows with Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Window length used when none is configured.
pub const DEFAULT_FILTER_LENGTH: usize = 10;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// ITU-R BT.601 luminance weights in 14-bit fixed point (sum = 1 << 14).
pub const LUMA_WEIGHT_R: u32 = 4899;
pub const LUMA_WEIGHT_G: u32 = 9617;
pub const LUMA_WEIGHT_B: u32 = 1868;

/// Fixed-point shift matching the luminance weights.
pub const LUMA_SHIFT: u32 = 14;

/// Rounding term added before the luminance shift.
pub const LUMA_ROUND: u32 = 1 << (LUMA_SHIFT - 1);

/// Image file extensions recognised when reading an image sequence.
pub const IMAGE_SEQUENCE_EXTENSIONS: [&str; 6] = ["png", "tif", "tiff", "jpg", "jpeg", "bmp"];

/// Zero-padded width of frame numbers in written image sequences.
pub const FRAME_NUMBER_WIDTH: usize = 6;
