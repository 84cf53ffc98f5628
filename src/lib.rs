// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! # phasejitter-core
//!
//! Phase-jitter augmentation for grayscale images. The Fourier magnitude of
//! an image is kept and its phase is randomized at five intensities, giving
//! five reconstructions that range from near-identical to texture-like.
//!
//! Pipeline per jitter amount `a`:
//!
//! ```text
//! image -> FFT2 -> center shift            (once per image)
//!       -> * exp(i * 2*pi * U[0,1) * a)     (per bin)
//!       -> inverse shift -> IFFT2 -> |z| -> min-max to [0, 1]
//! ```
//!
//! The random source is injectable ([`PhaseSource`]); seeded sweeps are
//! reproducible. Enable the `parallel` feature to run the five sweep slots
//! on rayon's thread pool, with the same results as the sequential path.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use phasejitter_core::{Session, SessionOptions};
//!
//! let mut session = Session::new(SessionOptions { seed: Some([7; 32]), ..Default::default() });
//! session.load_path("photo.png").unwrap();
//! for out in session.process().unwrap() {
//!     println!("{} -> {:?}", out.label(), out.image.shape());
//! }
//! session.select(2).unwrap();
//! let enlarged = session.preview().unwrap();
//! ```

pub mod error;
pub mod fft2d;
pub mod intensity;
pub mod jitter;
pub mod normalize;
pub mod phasor;
pub mod session;
pub mod spectrum;
pub mod sweep;

pub use error::{JitterError, Result};
pub use intensity::{validate_dimensions, IntensityImage, MAX_DIMENSION, MAX_PIXELS, PREVIEW_SIZE};
pub use jitter::{apply_phasors, jitter, jitter_with_policy};
pub use normalize::FlatPolicy;
pub use phasor::{EntropyPhase, PhaseSource, SeededPhase, SequencePhase, ZeroPhase};
pub use session::{Session, SessionOptions};
pub use spectrum::CenteredSpectrum;
pub use sweep::{jitter_amounts, run_sweep, run_sweep_with, JitterOutput, SWEEP_STEPS};
