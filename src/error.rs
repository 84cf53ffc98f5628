// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for loading images and running phase-jitter sweeps.

use core::fmt;

/// Errors that can occur while loading an image or jittering its spectrum.
#[derive(Debug)]
pub enum JitterError {
    /// A sweep or preview was requested before any image was loaded.
    NoImageLoaded,
    /// The image has zero width or zero height.
    EmptyImage,
    /// The image dimensions exceed the maximum allowed (8192px / 16MP).
    ImageTooLarge,
    /// A sample buffer does not match the declared `width * height`.
    DimensionMismatch { expected: usize, actual: usize },
    /// Two images that must share a shape do not.
    ShapeMismatch,
    /// The jitter amount is not a finite value in `[0, 1]`.
    InvalidAmount(f64),
    /// No output exists at the requested index.
    IndexOutOfRange { index: usize, len: usize },
    /// The input is not PNG, JPEG, BMP, GIF or TIFF.
    UnsupportedFormat,
    /// The image bytes could not be decoded.
    Decode(image::ImageError),
    /// The image file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for JitterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImageLoaded => write!(f, "no image loaded"),
            Self::EmptyImage => write!(f, "image has zero width or height"),
            Self::ImageTooLarge => write!(f, "image too large (max 8192px / 16MP)"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "sample buffer has {actual} values, expected {expected}")
            }
            Self::ShapeMismatch => write!(f, "images differ in shape"),
            Self::InvalidAmount(a) => write!(f, "jitter amount {a} is outside [0, 1]"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "output index {index} out of range ({len} outputs)")
            }
            Self::UnsupportedFormat => {
                write!(f, "unsupported image format (expected PNG, JPEG, BMP, GIF or TIFF)")
            }
            Self::Decode(e) => write!(f, "image decode failed: {e}"),
            Self::Io(e) => write!(f, "cannot read image: {e}"),
        }
    }
}

impl std::error::Error for JitterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for JitterError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Unsupported(_) => Self::UnsupportedFormat,
            image::ImageError::IoError(io) => Self::Io(io),
            other => Self::Decode(other),
        }
    }
}

impl From<std::io::Error> for JitterError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, JitterError>;
