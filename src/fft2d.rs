// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! 2D discrete Fourier transform for arbitrary image sizes.
//!
//! - Radix-2 Cooley-Tukey for power-of-2 axis lengths
//! - Bluestein's chirp-z transform for every other length
//!
//! An [`Fft2d`] holds one plan per axis and direction, so the twiddle and
//! chirp tables are computed once per image size and reused across all rows
//! and columns (and across every jitter slot of a sweep).
//!
//! Columns are transformed with gather-transform-scatter through a single
//! column buffer instead of a full transposed copy.
//!
//! [`fft_shift`] / [`ifft_shift`] move the zero-frequency bin to the array
//! center and back. They are exact inverses for odd and even sizes.

use num_complex::Complex64;
use std::f64::consts::PI;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `X[k] = sum x[n] * exp(-2*pi*i*n*k/N)`
    Forward,
    /// `x[n] = sum X[k] * exp(+2*pi*i*n*k/N)` (unnormalized at the 1D level)
    Inverse,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        }
    }
}

fn phasor(angle: f64) -> Complex64 {
    let (s, c) = angle.sin_cos();
    Complex64::new(c, s)
}

// ──────────────────────────────────────────────────────────────────────────
// 1D plans
// ──────────────────────────────────────────────────────────────────────────

/// In-place radix-2 plan with a precomputed half-length twiddle table.
struct Radix2Plan {
    n: usize,
    twiddles: Vec<Complex64>,
}

impl Radix2Plan {
    fn new(n: usize, direction: Direction) -> Self {
        debug_assert!(n.is_power_of_two());
        let step = direction.sign() * 2.0 * PI / n as f64;
        let twiddles = (0..n / 2).map(|k| phasor(step * k as f64)).collect();
        Radix2Plan { n, twiddles }
    }

    fn process(&self, data: &mut [Complex64]) {
        let n = self.n;
        debug_assert_eq!(data.len(), n);

        let mut j = 0usize;
        for i in 1..n {
            let mut bit = n >> 1;
            while j & bit != 0 {
                j ^= bit;
                bit >>= 1;
            }
            j ^= bit;
            if i < j {
                data.swap(i, j);
            }
        }

        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for k in 0..half {
                    let w = self.twiddles[k * stride];
                    let u = data[start + k];
                    let v = data[start + k + half] * w;
                    data[start + k] = u + v;
                    data[start + k + half] = u - v;
                }
            }
            len <<= 1;
        }
    }
}

/// Bluestein plan: length-`n` DFT as a circular convolution of length
/// `m = next_pow2(2n - 1)`, evaluated with radix-2 transforms.
///
/// Uses `n*k = (n^2 + k^2 - (k - n)^2) / 2`, so with the chirp
/// `c[k] = exp(sign * i * pi * k^2 / N)` the DFT becomes
/// `X[k] = c[k] * sum (x[n] * c[n]) * conj(c[k - n])`.
struct BluesteinPlan {
    n: usize,
    chirp: Vec<Complex64>,
    /// Radix-2 forward transform of the zero-padded, wrapped `conj(chirp)`.
    kernel_hat: Vec<Complex64>,
    forward: Radix2Plan,
    inverse: Radix2Plan,
}

impl BluesteinPlan {
    fn new(n: usize, direction: Direction) -> Self {
        let m = (2 * n - 1).next_power_of_two();
        let sign = direction.sign();

        // k^2 mod 2n keeps the angle small; the chirp has period 2n in k^2.
        let period = 2 * n as u64;
        let chirp: Vec<Complex64> = (0..n as u64)
            .map(|k| phasor(sign * PI * ((k * k) % period) as f64 / n as f64))
            .collect();

        let forward = Radix2Plan::new(m, Direction::Forward);
        let inverse = Radix2Plan::new(m, Direction::Inverse);

        let mut kernel = vec![ZERO; m];
        kernel[0] = chirp[0].conj();
        for k in 1..n {
            kernel[k] = chirp[k].conj();
            kernel[m - k] = chirp[k].conj();
        }
        forward.process(&mut kernel);

        BluesteinPlan { n, chirp, kernel_hat: kernel, forward, inverse }
    }

    fn process(&self, data: &mut [Complex64]) {
        debug_assert_eq!(data.len(), self.n);
        let m = self.kernel_hat.len();

        let mut a = vec![ZERO; m];
        for (k, (dst, &x)) in a.iter_mut().zip(data.iter()).enumerate() {
            *dst = x * self.chirp[k];
        }

        self.forward.process(&mut a);
        for (v, &h) in a.iter_mut().zip(&self.kernel_hat) {
            *v *= h;
        }
        self.inverse.process(&mut a);

        let inv_m = 1.0 / m as f64;
        for (k, out) in data.iter_mut().enumerate() {
            *out = a[k] * inv_m * self.chirp[k];
        }
    }
}

enum AxisPlan {
    Radix2(Radix2Plan),
    Bluestein(BluesteinPlan),
}

impl AxisPlan {
    fn new(n: usize, direction: Direction) -> Self {
        if n.is_power_of_two() {
            AxisPlan::Radix2(Radix2Plan::new(n, direction))
        } else {
            AxisPlan::Bluestein(BluesteinPlan::new(n, direction))
        }
    }

    fn process(&self, data: &mut [Complex64]) {
        match self {
            AxisPlan::Radix2(p) => p.process(data),
            AxisPlan::Bluestein(p) => p.process(data),
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────
// 2D transform
// ──────────────────────────────────────────────────────────────────────────

/// Reusable 2D DFT for one `width x height` shape.
///
/// Data is row-major, `data[row * width + col]`. Both dimensions must be
/// at least 1; [`crate::intensity::validate_dimensions`] enforces this before a
/// plan is ever built from an image.
pub struct Fft2d {
    width: usize,
    height: usize,
    rows_forward: AxisPlan,
    cols_forward: AxisPlan,
    rows_inverse: AxisPlan,
    cols_inverse: AxisPlan,
}

impl Fft2d {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "FFT dimensions must be non-zero");
        Fft2d {
            width,
            height,
            rows_forward: AxisPlan::new(width, Direction::Forward),
            cols_forward: AxisPlan::new(height, Direction::Forward),
            rows_inverse: AxisPlan::new(width, Direction::Inverse),
            cols_inverse: AxisPlan::new(height, Direction::Inverse),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Real-valued samples -> complex spectrum (unshifted).
    pub fn forward(&self, samples: &[f64]) -> Vec<Complex64> {
        assert_eq!(samples.len(), self.width * self.height);
        let mut data: Vec<Complex64> = samples.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        self.transform_in_place(&mut data, Direction::Forward);
        data
    }

    /// Complex samples -> complex spectrum (unshifted).
    pub fn forward_complex(&self, data: &[Complex64]) -> Vec<Complex64> {
        assert_eq!(data.len(), self.width * self.height);
        let mut data = data.to_vec();
        self.transform_in_place(&mut data, Direction::Forward);
        data
    }

    /// Complex spectrum (unshifted) -> complex samples, normalized by
    /// `1 / (width * height)` so that `inverse(forward(x)) == x`.
    pub fn inverse(&self, spectrum: &[Complex64]) -> Vec<Complex64> {
        assert_eq!(spectrum.len(), self.width * self.height);
        let mut data = spectrum.to_vec();
        self.transform_in_place(&mut data, Direction::Inverse);
        let norm = 1.0 / (self.width * self.height) as f64;
        for v in &mut data {
            *v *= norm;
        }
        data
    }

    fn transform_in_place(&self, data: &mut [Complex64], direction: Direction) {
        let (rows, cols) = match direction {
            Direction::Forward => (&self.rows_forward, &self.cols_forward),
            Direction::Inverse => (&self.rows_inverse, &self.cols_inverse),
        };

        for row in data.chunks_exact_mut(self.width) {
            rows.process(row);
        }

        let mut col_buf = vec![ZERO; self.height];
        for col in 0..self.width {
            for (r, slot) in col_buf.iter_mut().enumerate() {
                *slot = data[r * self.width + col];
            }
            cols.process(&mut col_buf);
            for (r, &v) in col_buf.iter().enumerate() {
                data[r * self.width + col] = v;
            }
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────
// Center shift
// ──────────────────────────────────────────────────────────────────────────

/// Move the zero-frequency bin from `(0, 0)` to `(height / 2, width / 2)`.
pub fn fft_shift<T: Copy>(data: &[T], width: usize, height: usize) -> Vec<T> {
    roll(data, width, height, width / 2, height / 2)
}

/// Undo [`fft_shift`]: move the bin at `(height / 2, width / 2)` back to `(0, 0)`.
pub fn ifft_shift<T: Copy>(data: &[T], width: usize, height: usize) -> Vec<T> {
    roll(data, width, height, width - width / 2, height - height / 2)
}

/// Cyclically move element `(r, c)` to `((r + dy) % height, (c + dx) % width)`.
fn roll<T: Copy>(data: &[T], width: usize, height: usize, dx: usize, dy: usize) -> Vec<T> {
    assert_eq!(data.len(), width * height);
    let mut out = data.to_vec();
    for r in 0..height {
        let dst_row = (r + dy) % height;
        for c in 0..width {
            out[dst_row * width + (c + dx) % width] = data[r * width + c];
        }
    }
    out
}
