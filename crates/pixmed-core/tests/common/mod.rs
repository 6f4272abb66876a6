#![allow(dead_code)]

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;

use pixmed_core::frame::{Rgb, VideoFrame};
use pixmed_core::io::ser::SER_HEADER_SIZE;

/// SER color ids used by the synthetic files.
pub const SER_MONO: i32 = 0;
pub const SER_BAYER_RGGB: i32 = 8;
pub const SER_RGB: i32 = 100;
pub const SER_BGR: i32 = 101;

/// Build a SER file header with configurable bit depth and color mode.
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID (4 bytes)
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer, Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 120]);
    // DateTime, DateTimeUTC (8 bytes each)
    buf.extend_from_slice(&[0u8; 16]);

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete synthetic 8-bit SER file with the given raw frame data.
pub fn build_ser_with_frames(width: u32, height: u32, color_id: i32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header_full(width, height, 8, frames.len(), color_id);
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Write a SER buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(".ser")
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}

/// Interleaved RGB bytes of a frame, the layout of a SER RGB frame.
pub fn rgb_bytes(frame: &VideoFrame) -> Vec<u8> {
    frame.data.iter().flat_map(|px| px.iter().copied()).collect()
}

pub fn gray(value: u8) -> Rgb {
    [value, value, value]
}

/// A frame whose pixels are drawn uniformly at random.
pub fn random_frame(rng: &mut StdRng, width: usize, height: usize) -> VideoFrame {
    let pixels: Vec<Rgb> = (0..width * height)
        .map(|_| [rng.gen(), rng.gen(), rng.gen()])
        .collect();
    VideoFrame::new(Array2::from_shape_vec((height, width), pixels).unwrap())
}

/// Brightness-only model of the sorted replacement rule: drop the darkest
/// (front) or brightest (tail) entry, insert the new value in order, read
/// the middle.
pub struct SortedRuleModel {
    sorted: Vec<u8>,
    replace_at_tail: bool,
}

impl SortedRuleModel {
    pub fn new(filter_length: usize) -> Self {
        Self {
            sorted: vec![0; filter_length],
            replace_at_tail: false,
        }
    }

    pub fn push(&mut self, brightness: u8) -> u8 {
        if self.replace_at_tail {
            self.sorted.pop();
        } else {
            self.sorted.remove(0);
        }
        let pos = self.sorted.partition_point(|&b| b <= brightness);
        self.sorted.insert(pos, brightness);
        self.replace_at_tail = !self.replace_at_tail;
        self.sorted[self.sorted.len() / 2]
    }
}
