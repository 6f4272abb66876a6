use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{PixmedError, Result};
use crate::frame::VideoFrame;
use crate::io::ser::{SerHeader, SER_FRAME_COUNT_OFFSET, SER_HEADER_SIZE, SER_MAGIC};

/// Streams 8-bit RGB frames into a SER file.
///
/// The frame count in the header is patched by [`SerWriter::finalize`], so
/// the number of frames need not be known up front.
pub struct SerWriter {
    writer: BufWriter<File>,
    header: SerHeader,
    frame_bytes: usize,
    timestamps: Vec<Option<u64>>,
}

impl SerWriter {
    /// Create a new SER file and write the header.
    pub fn create(path: &Path, header: &SerHeader) -> Result<Self> {
        let frame_bytes = header
            .frame_byte_size()
            .ok_or(PixmedError::InvalidDimensions {
                width: header.width,
                height: header.height,
            })?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: SerHeader {
                frame_count: 0,
                ..header.clone()
            },
            frame_bytes,
            timestamps: Vec::new(),
        })
    }

    pub fn frames_written(&self) -> u32 {
        self.header.frame_count
    }

    /// Write a single raw frame (bytes must match the header's frame size).
    pub fn write_raw_frame(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != self.frame_bytes {
            return Err(PixmedError::InvalidSer(format!(
                "Frame has {} bytes, header expects {}",
                data.len(),
                self.frame_bytes
            )));
        }
        self.writer.write_all(data)?;
        self.header.frame_count += 1;
        Ok(())
    }

    /// Write one color frame as interleaved RGB.
    pub fn write_frame(&mut self, frame: &VideoFrame) -> Result<()> {
        if frame.width() != self.header.width as usize
            || frame.height() != self.header.height as usize
        {
            return Err(PixmedError::InvalidDimensions {
                width: frame.width() as u32,
                height: frame.height() as u32,
            });
        }
        let raw: Vec<u8> = frame.data.iter().flat_map(|px| px.iter().copied()).collect();
        self.write_raw_frame(&raw)?;
        self.timestamps.push(frame.metadata.timestamp_us);
        Ok(())
    }

    /// Write the timestamp trailer (only when every frame carried one),
    /// patch the frame count and flush.
    pub fn finalize(mut self) -> Result<()> {
        if !self.timestamps.is_empty() && self.timestamps.iter().all(Option::is_some) {
            for ts in self.timestamps.iter().flatten() {
                self.writer.write_all(&ts.to_le_bytes())?;
            }
        }
        self.writer.seek(SeekFrom::Start(SER_FRAME_COUNT_OFFSET))?;
        self.writer
            .write_all(&(self.header.frame_count as i32).to_le_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

fn write_header(w: &mut impl Write, header: &SerHeader) -> Result<()> {
    // Magic (14 bytes)
    w.write_all(SER_MAGIC)?;
    // LuID (4 bytes)
    w.write_all(&0i32.to_le_bytes())?;
    // ColorID (4 bytes)
    w.write_all(&header.color_id.to_le_bytes())?;
    // LittleEndian flag: 0 = little-endian
    let le_flag: i32 = if header.little_endian { 0 } else { 1 };
    w.write_all(&le_flag.to_le_bytes())?;
    w.write_all(&(header.width as i32).to_le_bytes())?;
    w.write_all(&(header.height as i32).to_le_bytes())?;
    w.write_all(&(header.pixel_depth as i32).to_le_bytes())?;
    w.write_all(&(header.frame_count as i32).to_le_bytes())?;
    write_fixed_string(w, &header.observer, 40)?;
    write_fixed_string(w, &header.instrument, 40)?;
    write_fixed_string(w, &header.telescope, 40)?;
    w.write_all(&header.date_time.to_le_bytes())?;
    w.write_all(&header.date_time_utc.to_le_bytes())?;

    debug_assert_eq!(
        14 + 4 + 4 + 4 + 4 + 4 + 4 + 4 + 40 + 40 + 40 + 8 + 8,
        SER_HEADER_SIZE
    );
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    w.write_all(&vec![0u8; len - to_write])?;
    Ok(())
}
