// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Grayscale intensity images.
//!
//! [`IntensityImage`] is a row-major `f64` array. Images enter the crate
//! through [`IntensityImage::decode`] / [`IntensityImage::open`] (PNG, JPEG,
//! BMP, GIF, TIFF, converted to 8-bit luminance) or directly from samples,
//! and leave it through [`IntensityImage::to_luma8`] and
//! [`IntensityImage::preview`] for display.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};

use crate::error::{JitterError, Result};
use crate::normalize::{self, FlatPolicy};

/// Maximum pixel dimension (width or height) accepted on load.
pub const MAX_DIMENSION: u32 = 8192;

/// Maximum total pixel count accepted on load (width × height).
pub const MAX_PIXELS: u32 = 16_000_000;

/// Edge length of the enlarged preview.
pub const PREVIEW_SIZE: u32 = 400;

/// Container formats accepted by [`IntensityImage::decode`].
pub const SUPPORTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::Gif,
    ImageFormat::Tiff,
];

/// Validate image dimensions for loading.
///
/// # Errors
/// - [`JitterError::EmptyImage`] if either dimension is 0.
/// - [`JitterError::ImageTooLarge`] if either dimension > 8192px or total pixels > 16M.
pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(JitterError::EmptyImage);
    }
    if width > MAX_DIMENSION
        || height > MAX_DIMENSION
        || width.checked_mul(height).is_none_or(|p| p > MAX_PIXELS)
    {
        return Err(JitterError::ImageTooLarge);
    }
    Ok(())
}

/// A height × width array of real-valued intensity samples.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityImage {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl IntensityImage {
    /// Wrap row-major samples. `data.len()` must equal `width * height`.
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(JitterError::EmptyImage);
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(JitterError::DimensionMismatch { expected, actual: data.len() });
        }
        Ok(IntensityImage { width, height, data })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// Shape is already known to be valid (produced from another image).
    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        IntensityImage { width, height, data }
    }

    /// Samples from an 8-bit grayscale buffer, subject to [`validate_dimensions`].
    pub fn from_luma8(gray: &GrayImage) -> Result<Self> {
        validate_dimensions(gray.width(), gray.height())?;
        let data = gray.as_raw().iter().map(|&v| v as f64).collect();
        Ok(Self::from_parts(gray.width() as usize, gray.height() as usize, data))
    }

    /// Convert any decoded image to 8-bit luminance, then to samples.
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        validate_dimensions(img.width(), img.height())?;
        Self::from_luma8(&img.to_luma8())
    }

    /// Decode an in-memory PNG, JPEG, BMP, GIF or TIFF file.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(JitterError::UnsupportedFormat);
        }
        let img = image::load_from_memory_with_format(bytes, format)?;
        let decoded = Self::from_dynamic(&img)?;
        log::debug!("decoded {format:?} image {}x{}", decoded.width, decoded.height);
        Ok(decoded)
    }

    /// Read and decode an image file. The format is detected from content.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::decode(&bytes)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Global `(min, max)`, ignoring NaN samples.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        normalize::min_max(&self.data)
    }

    /// Min-max normalized copy in `[0, 1]`.
    pub fn normalized(&self, policy: FlatPolicy) -> IntensityImage {
        let mut data = self.data.clone();
        normalize::normalize_in_place(&mut data, policy);
        Self::from_parts(self.width, self.height, data)
    }

    /// Render a `[0, 1]` image as 8-bit grayscale: ×255, truncated toward
    /// zero, clamped to `[0, 255]`. Non-finite samples render black.
    pub fn to_luma8(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let v = self.data[y as usize * self.width + x as usize];
            let px = if v.is_finite() { (v * 255.0).trunc().clamp(0.0, 255.0) as u8 } else { 0 };
            Luma([px])
        })
    }

    /// 8-bit render resized to `size × size` for enlarged display.
    pub fn preview(&self, size: u32) -> GrayImage {
        image::imageops::resize(&self.to_luma8(), size, size, FilterType::Lanczos3)
    }

    /// Mean absolute per-pixel difference.
    pub fn mean_abs_diff(&self, other: &IntensityImage) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(JitterError::ShapeMismatch);
        }
        let sum: f64 = self.data.iter().zip(&other.data).map(|(a, b)| (a - b).abs()).sum();
        Ok(sum / self.data.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(img: &GrayImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn valid_dimensions() {
        assert!(validate_dimensions(1, 1).is_ok());
        assert!(validate_dimensions(8192, 1000).is_ok());
        assert!(validate_dimensions(4000, 4000).is_ok());
    }

    #[test]
    fn dimension_errors() {
        match validate_dimensions(0, 10) {
            Err(JitterError::EmptyImage) => {}
            other => panic!("expected EmptyImage, got {other:?}"),
        }
        match validate_dimensions(8193, 10) {
            Err(JitterError::ImageTooLarge) => {}
            other => panic!("expected ImageTooLarge, got {other:?}"),
        }
        // 5000 * 3201 = 16_005_000 > 16M
        assert!(validate_dimensions(5000, 3201).is_err());
    }

    #[test]
    fn new_checks_length() {
        match IntensityImage::new(3, 2, vec![0.0; 5]) {
            Err(JitterError::DimensionMismatch { expected: 6, actual: 5 }) => {}
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
        assert!(matches!(IntensityImage::new(0, 2, vec![]), Err(JitterError::EmptyImage)));
    }

    #[test]
    fn from_fn_is_row_major() {
        let img = IntensityImage::from_fn(3, 2, |x, y| (y * 10 + x) as f64).unwrap();
        assert_eq!(img.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(img.get(2, 1), Some(12.0));
        assert_eq!(img.get(3, 0), None);
    }

    #[test]
    fn luma8_buffer_is_validated() {
        match IntensityImage::from_luma8(&GrayImage::new(0, 0)) {
            Err(JitterError::EmptyImage) => {}
            other => panic!("expected EmptyImage, got {other:?}"),
        }
        assert!(matches!(
            IntensityImage::from_luma8(&GrayImage::new(8193, 1)),
            Err(JitterError::ImageTooLarge)
        ));
        let img = IntensityImage::from_luma8(&GrayImage::from_pixel(3, 2, Luma([9]))).unwrap();
        assert_eq!(img.shape(), (3, 2));
        assert_eq!(img.get(2, 1), Some(9.0));
    }

    #[test]
    fn png_decode_preserves_luma() {
        let gray = GrayImage::from_fn(5, 3, |x, y| Luma([(x * 40 + y) as u8]));
        let img = IntensityImage::decode(&encode(&gray, ImageFormat::Png)).unwrap();
        assert_eq!(img.shape(), (5, 3));
        assert_eq!(img.get(4, 2), Some(162.0));
    }

    #[test]
    fn bmp_decode() {
        let gray = GrayImage::from_fn(4, 4, |x, _| Luma([(x * 60) as u8]));
        let img = IntensityImage::decode(&encode(&gray, ImageFormat::Bmp)).unwrap();
        assert_eq!(img.shape(), (4, 4));
        // BMP stores gray as a palette; the luma round-trip may be off by one.
        let v = img.get(3, 0).unwrap();
        assert!((v - 180.0).abs() <= 1.0, "got {v}");
    }

    #[test]
    fn garbage_is_rejected() {
        let err = IntensityImage::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, JitterError::UnsupportedFormat), "got {err:?}");
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let gray = GrayImage::from_fn(16, 16, |x, y| Luma([(x ^ y) as u8]));
        let bytes = encode(&gray, ImageFormat::Png);
        let err = IntensityImage::decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(
            matches!(err, JitterError::Decode(_) | JitterError::Io(_)),
            "got {err:?}"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = IntensityImage::open("/nonexistent/phasejitter/input.png").unwrap_err();
        assert!(matches!(err, JitterError::Io(_)));
    }

    #[test]
    fn luma8_render_scales_and_clamps() {
        let img = IntensityImage::new(6, 1, vec![0.0, 0.5, 0.999, 1.0, 1.5, f64::NAN]).unwrap();
        let gray = img.to_luma8();
        // 127.5 -> 127 and 254.745 -> 254: truncation, not rounding.
        assert_eq!(gray.as_raw(), &vec![0u8, 127, 254, 255, 255, 0]);
    }

    #[test]
    fn preview_has_requested_size() {
        let img = IntensityImage::from_fn(7, 5, |x, y| ((x + y) % 2) as f64).unwrap();
        let preview = img.preview(PREVIEW_SIZE);
        assert_eq!(preview.dimensions(), (PREVIEW_SIZE, PREVIEW_SIZE));
    }

    #[test]
    fn normalized_original() {
        let img = IntensityImage::new(2, 2, vec![50.0, 100.0, 150.0, 250.0]).unwrap();
        let n = img.normalized(FlatPolicy::Zeros);
        assert_eq!(n.as_slice(), &[0.0, 0.25, 0.5, 1.0]);
    }

    #[test]
    fn mean_abs_diff_requires_same_shape() {
        let a = IntensityImage::new(2, 1, vec![0.0, 1.0]).unwrap();
        let b = IntensityImage::new(2, 1, vec![0.5, 0.5]).unwrap();
        assert_eq!(a.mean_abs_diff(&b).unwrap(), 0.5);
        let c = IntensityImage::new(1, 2, vec![0.0, 1.0]).unwrap();
        assert!(matches!(a.mean_abs_diff(&c), Err(JitterError::ShapeMismatch)));
    }
}
