use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::color::{from_rgb_image, to_rgb_image};
use crate::consts::IMAGE_SEQUENCE_EXTENSIONS;
use crate::error::{PixmedError, Result};
use crate::frame::VideoFrame;

/// Load any image file as an 8-bit RGB frame.
pub fn load_rgb_image(path: &Path) -> Result<VideoFrame> {
    let img = image::open(path)?.to_rgb8();
    from_rgb_image(&img)
}

/// Save a frame as 8-bit RGB PNG.
pub fn save_png(frame: &VideoFrame, path: &Path) -> Result<()> {
    to_rgb_image(frame)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a frame as 8-bit RGB TIFF.
pub fn save_tiff(frame: &VideoFrame, path: &Path) -> Result<()> {
    to_rgb_image(frame)?.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save frame, choosing format from file extension (PNG by default).
pub fn save_rgb_image(frame: &VideoFrame, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => save_tiff(frame, path),
        _ => save_png(frame, path),
    }
}

/// Image files in `dir`, sorted by file name.
pub fn list_image_sequence(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_image_extension(p))
        .collect();
    if paths.is_empty() {
        return Err(PixmedError::EmptySequence);
    }
    paths.sort();
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            IMAGE_SEQUENCE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}
