// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Min-max normalization to `[0, 1]` and the policy for flat inputs.

/// Relative tolerance under which `max - min` counts as zero.
///
/// Reconstructing a constant image through forward FFT, phasor multiply,
/// inverse FFT and `|z|` leaves rounding noise of a few ULPs, so an exact
/// `max == min` test would miss it.
pub const FLAT_EPSILON: f64 = 1e-9;

/// What to produce when the values to normalize are (numerically) constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlatPolicy {
    /// Return an all-zero array of the same shape.
    #[default]
    Zeros,
    /// Return the `0 / 0` result: every value becomes NaN.
    Propagate,
}

/// Outcome of [`normalize_in_place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Values were scaled so the minimum is exactly 0.0 and the maximum 1.0.
    Scaled,
    /// Values were constant and were replaced according to the [`FlatPolicy`].
    Flat,
}

/// Global `(min, max)` over finite and infinite values; NaNs are skipped.
/// `None` for an empty slice or one that is entirely NaN.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Whether a range is too narrow to normalize, relative to the larger
/// endpoint magnitude. An all-zero slice is flat.
pub fn is_flat(min: f64, max: f64) -> bool {
    let scale = min.abs().max(max.abs());
    max - min <= FLAT_EPSILON * scale
}

/// `(v - min) / (max - min)` over the whole slice.
pub fn normalize_in_place(values: &mut [f64], policy: FlatPolicy) -> Normalization {
    let Some((lo, hi)) = min_max(values) else {
        return Normalization::Flat;
    };

    if is_flat(lo, hi) {
        let fill = match policy {
            FlatPolicy::Zeros => 0.0,
            FlatPolicy::Propagate => f64::NAN,
        };
        values.fill(fill);
        return Normalization::Flat;
    }

    let range = hi - lo;
    for v in values.iter_mut() {
        *v = (*v - lo) / range;
    }
    Normalization::Scaled
}
