// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Center-shifted spectrum of a loaded image.
//!
//! Computed once per image and then only read: every jitter amount of a
//! sweep starts from the same bins.

use core::fmt;

use num_complex::Complex64;

use crate::fft2d::{self, Fft2d};
use crate::intensity::IntensityImage;

/// 2D DFT of an [`IntensityImage`] with zero frequency at `(height / 2, width / 2)`.
///
/// Carries the FFT plan for its shape so reconstructions reuse the same
/// twiddle and chirp tables.
pub struct CenteredSpectrum {
    width: usize,
    height: usize,
    bins: Vec<Complex64>,
    fft: Fft2d,
}

impl CenteredSpectrum {
    pub fn from_image(image: &IntensityImage) -> Self {
        let (width, height) = image.shape();
        let fft = Fft2d::new(width, height);
        let bins = fft2d::fft_shift(&fft.forward(image.as_slice()), width, height);
        log::debug!("computed {width}x{height} centered spectrum");
        CenteredSpectrum { width, height, bins, fft }
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

    /// Row-major shifted bins.
    pub fn bins(&self) -> &[Complex64] {
        &self.bins
    }

    /// Zero-frequency bin (sum of all samples).
    pub fn dc(&self) -> Complex64 {
        self.bins[(self.height / 2) * self.width + self.width / 2]
    }

    /// Undo the shift and inverse-transform a set of shifted bins of this
    /// spectrum's shape.
    pub(crate) fn reconstruct(&self, shifted: &[Complex64]) -> Vec<Complex64> {
        let unshifted = fft2d::ifft_shift(shifted, self.width, self.height);
        self.fft.inverse(&unshifted)
    }
}

impl fmt::Debug for CenteredSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CenteredSpectrum")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dc", &self.dc())
            .finish()
    }
}
