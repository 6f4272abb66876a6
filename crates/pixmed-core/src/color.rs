//! Conversion between color frames and the brightness samples the median
//! filter ranks by.

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array2;

use crate::consts::{
    COLOR_CHANNEL_COUNT, LUMA_ROUND, LUMA_SHIFT, LUMA_WEIGHT_B, LUMA_WEIGHT_G, LUMA_WEIGHT_R,
};
use crate::error::{PixmedError, Result};
use crate::frame::{LumaFrame, Rgb, VideoFrame};
use crate::pipeline::config::Size;

/// BT.601 brightness of one RGB pixel, rounded to nearest.
pub fn luminance(color: Rgb) -> u8 {
    let [r, g, b] = color;
    let y = r as u32 * LUMA_WEIGHT_R + g as u32 * LUMA_WEIGHT_G + b as u32 * LUMA_WEIGHT_B;
    ((y + LUMA_ROUND) >> LUMA_SHIFT) as u8
}

/// Brightness grid of a color frame.
pub fn to_luma(frame: &VideoFrame) -> LumaFrame {
    LumaFrame::new(frame.data.mapv(luminance))
}

pub fn gray_to_rgb(value: u8) -> Rgb {
    [value, value, value]
}

pub fn to_rgb_image(frame: &VideoFrame) -> Result<RgbImage> {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    let mut raw = Vec::with_capacity(frame.pixel_count() * COLOR_CHANNEL_COUNT);
    raw.extend(frame.data.iter().flat_map(|px| px.iter().copied()));
    RgbImage::from_raw(w, h, raw).ok_or(PixmedError::InvalidDimensions {
        width: w,
        height: h,
    })
}

pub fn from_rgb_image(img: &RgbImage) -> Result<VideoFrame> {
    let (w, h) = img.dimensions();
    let pixels: Vec<Rgb> = img.pixels().map(|p| p.0).collect();
    let data = Array2::from_shape_vec((h as usize, w as usize), pixels)?;
    Ok(VideoFrame::new(data))
}

/// Resample a frame to a fixed working resolution. Metadata is preserved.
pub fn resize(frame: &VideoFrame, size: Size) -> Result<VideoFrame> {
    if size.width == 0 || size.height == 0 {
        return Err(PixmedError::InvalidDimensions {
            width: size.width,
            height: size.height,
        });
    }
    if frame.width() == size.width as usize && frame.height() == size.height as usize {
        return Ok(frame.clone());
    }
    let img = to_rgb_image(frame)?;
    let scaled = imageops::resize(&img, size.width, size.height, FilterType::Triangle);
    let mut out = from_rgb_image(&scaled)?;
    out.metadata = frame.metadata.clone();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(luminance([0, 0, 0]), 0);
        assert_eq!(luminance([255, 255, 255]), 255);
    }

    #[test]
    fn test_luminance_primaries() {
        // 0.299 * 255, 0.587 * 255, 0.114 * 255 rounded
        assert_eq!(luminance([255, 0, 0]), 76);
        assert_eq!(luminance([0, 255, 0]), 150);
        assert_eq!(luminance([0, 0, 255]), 29);
    }

    #[test]
    fn test_gray_is_fixed_point() {
        for v in [0u8, 1, 10, 50, 128, 200, 254] {
            assert_eq!(luminance(gray_to_rgb(v)), v);
        }
    }

    #[test]
    fn test_rgb_image_round_trip_keeps_layout() {
        let mut data = Array2::from_elem((2, 3), [0u8; 3]);
        data[[1, 2]] = [9, 8, 7];
        let frame = VideoFrame::new(data);
        assert_eq!(frame.pixel_count(), 6);
        let img = to_rgb_image(&frame).unwrap();
        assert_eq!(img.as_raw().len(), frame.pixel_count() * COLOR_CHANNEL_COUNT);
        assert_eq!(img.get_pixel(2, 1).0, [9, 8, 7]);
        let back = from_rgb_image(&img).unwrap();
        assert_eq!(back.data, frame.data);
    }

    #[test]
    fn test_resize_solid_frame() {
        let frame = VideoFrame::solid(8, 6, [40, 80, 120]);
        let out = resize(&frame, Size { width: 4, height: 3 }).unwrap();
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 3);
        assert!(out.data.iter().all(|px| *px == [40, 80, 120]));
    }
}
