use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array2;

use crate::color::gray_to_rgb;
use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{PixmedError, Result};
use crate::frame::{ColorMode, FrameMetadata, Rgb, SourceInfo, VideoFrame};

pub const SER_HEADER_SIZE: usize = 178;
pub const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// Byte offset of the FrameCount field inside the header.
pub const SER_FRAME_COUNT_OFFSET: u64 = 38;

pub const SER_COLOR_MONO: i32 = 0;
pub const SER_COLOR_RGB: i32 = 100;
pub const SER_COLOR_BGR: i32 = 101;

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Header for an 8-bit RGB video with no frames yet.
    pub fn rgb8(width: u32, height: u32) -> Self {
        Self {
            color_id: SER_COLOR_RGB,
            little_endian: true,
            width,
            height,
            pixel_depth: 8,
            frame_count: 0,
            observer: String::new(),
            instrument: String::new(),
            telescope: String::new(),
            date_time: 0,
            date_time_utc: 0,
        }
    }

    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Number of planes per pixel (1 for mono/bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            SER_COLOR_RGB | SER_COLOR_BGR => COLOR_CHANNEL_COUNT,
            _ => 1,
        }
    }

    /// Total bytes per frame, or `None` if the dimensions overflow `usize`.
    pub fn frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_pixel_plane())?
            .checked_mul(self.planes_per_pixel())
    }

    pub fn color_mode(&self) -> ColorMode {
        match self.color_id {
            8 => ColorMode::BayerRGGB,
            9 => ColorMode::BayerGRBG,
            10 => ColorMode::BayerGBRG,
            11 => ColorMode::BayerBGGR,
            SER_COLOR_RGB => ColorMode::RGB,
            SER_COLOR_BGR => ColorMode::BGR,
            SER_COLOR_MONO => ColorMode::Mono,
            _ => ColorMode::Mono,
        }
    }
}

/// Memory-mapped SER file reader producing 8-bit color frames.
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
    frame_bytes: usize,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(PixmedError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(PixmedError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;

        if header.color_mode().is_bayer() {
            return Err(PixmedError::UnsupportedColorMode(format!(
                "{:?} (debayer the video first)",
                header.color_mode()
            )));
        }

        let overflow = || PixmedError::InvalidSer("Frame data size overflows".into());
        let frame_bytes = header.frame_byte_size().ok_or_else(overflow)?;
        let expected_data_size = frame_bytes
            .checked_mul(header.frame_count as usize)
            .and_then(|data| data.checked_add(SER_HEADER_SIZE))
            .ok_or_else(overflow)?;
        if mmap.len() < expected_data_size {
            return Err(PixmedError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            header,
            frame_bytes,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Bytes of pixel data per frame, validated at open.
    pub fn frame_bytes(&self) -> usize {
        self.frame_bytes
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(PixmedError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        // In bounds: open() checked the whole data block fits the file.
        let offset = SER_HEADER_SIZE + index * self.frame_bytes;
        let end = offset + self.frame_bytes;
        Ok(&self.mmap[offset..end])
    }

    /// Read a single frame as 8-bit RGB. Mono is replicated to all channels;
    /// deeper samples keep their top 8 bits.
    pub fn read_frame(&self, index: usize) -> Result<VideoFrame> {
        let raw = self.frame_raw(index)?;
        let h = self.header.height as usize;
        let w = self.header.width as usize;
        let decoder = SampleDecoder {
            bytes_per_sample: self.header.bytes_per_pixel_plane(),
            bit_depth: self.header.pixel_depth,
            little_endian: self.header.little_endian,
        };

        let pixels: Vec<Rgb> = match self.header.color_mode() {
            ColorMode::RGB => decode_interleaved(raw, h * w, &decoder, [0, 1, 2]),
            ColorMode::BGR => decode_interleaved(raw, h * w, &decoder, [2, 1, 0]),
            _ => (0..h * w)
                .map(|i| gray_to_rgb(decoder.decode(raw, i)))
                .collect(),
        };

        let mut frame = VideoFrame::new(Array2::from_shape_vec((h, w), pixels)?);
        frame.metadata = FrameMetadata {
            frame_index: index,
            timestamp_us: self.read_timestamp(index),
        };
        Ok(frame)
    }

    /// Read per-frame timestamp from the optional trailer.
    fn read_timestamp(&self, index: usize) -> Option<u64> {
        let trailer_offset = SER_HEADER_SIZE + self.frame_bytes * self.frame_count();
        let ts_offset = trailer_offset.checked_add(index.checked_mul(8)?)?;
        if ts_offset.checked_add(8)? <= self.mmap.len() {
            let bytes = &self.mmap[ts_offset..ts_offset + 8];
            Some(u64::from_le_bytes(bytes.try_into().ok()?))
        } else {
            None
        }
    }

    /// Build SourceInfo from the header.
    pub fn source_info(&self, path: &Path) -> SourceInfo {
        SourceInfo {
            filename: path.to_path_buf(),
            total_frames: self.frame_count(),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            color_mode: self.header.color_mode(),
            observer: non_empty(&self.header.observer),
            telescope: non_empty(&self.header.telescope),
            instrument: non_empty(&self.header.instrument),
        }
    }

    /// Iterator over all frames.
    pub fn frames(&self) -> impl Iterator<Item = Result<VideoFrame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }
}

struct SampleDecoder {
    bytes_per_sample: usize,
    bit_depth: u32,
    little_endian: bool,
}

impl SampleDecoder {
    /// Decode the sample at `sample_index` (counted in samples, not bytes).
    fn decode(&self, raw: &[u8], sample_index: usize) -> u8 {
        let idx = sample_index * self.bytes_per_sample;
        if self.bytes_per_sample == 1 {
            return raw[idx];
        }
        let pair = [raw[idx], raw[idx + 1]];
        let value = if self.little_endian {
            u16::from_le_bytes(pair)
        } else {
            u16::from_be_bytes(pair)
        };
        (value >> (self.bit_depth.clamp(8, 16) - 8)).min(255) as u8
    }
}

fn decode_interleaved(
    raw: &[u8],
    pixel_count: usize,
    decoder: &SampleDecoder,
    order: [usize; 3],
) -> Vec<Rgb> {
    (0..pixel_count)
        .map(|i| {
            let base = i * 3;
            [
                decoder.decode(raw, base + order[0]),
                decoder.decode(raw, base + order[1]),
                decoder.decode(raw, base + order[2]),
            ]
        })
        .collect()
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = read_non_negative(&mut cursor, "width")?;
    let height = read_non_negative(&mut cursor, "height")?;
    let pixel_depth = read_non_negative(&mut cursor, "pixel depth")?;
    let frame_count = read_non_negative(&mut cursor, "frame count")?;

    let observer = read_fixed_string(&buf[42..82]);
    let instrument = read_fixed_string(&buf[82..122]);
    let telescope = read_fixed_string(&buf[122..162]);

    let mut cursor = std::io::Cursor::new(&buf[162..]);
    let date_time = cursor.read_u64::<LittleEndian>()?;
    let date_time_utc = cursor.read_u64::<LittleEndian>()?;

    if width == 0 || height == 0 {
        return Err(PixmedError::InvalidDimensions { width, height });
    }
    if pixel_depth == 0 || pixel_depth > 16 {
        return Err(PixmedError::InvalidSer(format!(
            "Unsupported pixel depth {pixel_depth}"
        )));
    }

    // Treat 0 as little-endian, as most capture software writes it.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
        observer,
        instrument,
        telescope,
        date_time,
        date_time_utc,
    })
}

fn read_non_negative(cursor: &mut std::io::Cursor<&[u8]>, field: &str) -> Result<u32> {
    let value = cursor.read_i32::<LittleEndian>()?;
    u32::try_from(value)
        .map_err(|_| PixmedError::InvalidSer(format!("Negative {field} in header: {value}")))
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}
