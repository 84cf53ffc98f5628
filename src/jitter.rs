// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! The phase jitter transform.
//!
//! Multiplies each bin of a centered spectrum by `exp(i * 2*pi * r * amount)`
//! with `r` uniform in `[0, 1)`, then reconstructs:
//!
//! 1. inverse center shift
//! 2. inverse 2D DFT
//! 3. `|z|` per pixel (drops rounding residue in the imaginary part)
//! 4. min-max normalization to `[0, 1]`
//!
//! Magnitudes are untouched; phase coherence is destroyed in proportion to
//! `amount`. At `amount = 0` the output is the normalized original.

use num_complex::Complex64;

use crate::error::{JitterError, Result};
use crate::intensity::IntensityImage;
use crate::normalize::{normalize_in_place, FlatPolicy, Normalization};
use crate::phasor::{unit_phasor, PhaseSource};
use crate::spectrum::CenteredSpectrum;

/// Jitter amounts must be finite and within `[0, 1]`.
pub fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && (0.0..=1.0).contains(&amount) {
        Ok(())
    } else {
        Err(JitterError::InvalidAmount(amount))
    }
}

/// Jitter with the default [`FlatPolicy::Zeros`].
pub fn jitter<S: PhaseSource + ?Sized>(
    spectrum: &CenteredSpectrum,
    amount: f64,
    source: &mut S,
) -> Result<IntensityImage> {
    jitter_with_policy(spectrum, amount, source, FlatPolicy::default())
}

/// Randomize the phase of `spectrum` by `amount` and reconstruct.
///
/// Draws exactly `width * height` values from `source`, in row-major order
/// over the shifted bins. An invalid amount is rejected before any value is
/// drawn.
pub fn jitter_with_policy<S: PhaseSource + ?Sized>(
    spectrum: &CenteredSpectrum,
    amount: f64,
    source: &mut S,
    policy: FlatPolicy,
) -> Result<IntensityImage> {
    validate_amount(amount)?;
    let mut bins = spectrum.bins().to_vec();
    for bin in bins.iter_mut() {
        *bin *= unit_phasor(source.next_unit(), amount);
    }
    Ok(reconstruct_normalized(spectrum, &bins, policy))
}

/// Apply caller-supplied phasors instead of random ones.
///
/// `phasors` must have one entry per bin, in the same shifted layout.
pub fn apply_phasors(
    spectrum: &CenteredSpectrum,
    phasors: &[Complex64],
    policy: FlatPolicy,
) -> Result<IntensityImage> {
    if phasors.len() != spectrum.bins().len() {
        return Err(JitterError::DimensionMismatch {
            expected: spectrum.bins().len(),
            actual: phasors.len(),
        });
    }
    let bins: Vec<Complex64> = spectrum.bins().iter().zip(phasors).map(|(b, p)| b * p).collect();
    Ok(reconstruct_normalized(spectrum, &bins, policy))
}

fn reconstruct_normalized(
    spectrum: &CenteredSpectrum,
    bins: &[Complex64],
    policy: FlatPolicy,
) -> IntensityImage {
    let mut magnitudes: Vec<f64> = spectrum.reconstruct(bins).iter().map(|z| z.norm()).collect();
    if normalize_in_place(&mut magnitudes, policy) == Normalization::Flat {
        log::warn!(
            "{}x{} reconstruction is flat, applying {policy:?}",
            spectrum.width(),
            spectrum.height()
        );
    }
    let (width, height) = spectrum.shape();
    IntensityImage::from_parts(width, height, magnitudes)
}
