use crate::color::luminance;
use crate::frame::Rgb;

/// One observed pixel: its color and the brightness it is ranked by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Sample {
    pub color: Rgb,
    pub brightness: u8,
}

impl Sample {
    /// Black padding that fills every window before the first frame.
    pub const SENTINEL: Sample = Sample {
        color: [0, 0, 0],
        brightness: 0,
    };

    pub fn new(color: Rgb, brightness: u8) -> Self {
        Self { color, brightness }
    }

    /// Build a sample, deriving brightness with the BT.601 conversion.
    pub fn from_color(color: Rgb) -> Self {
        Self::new(color, luminance(color))
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self::SENTINEL
    }
}
