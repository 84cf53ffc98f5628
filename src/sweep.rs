// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Fixed five-point jitter sweep.
//!
//! One spectrum, five amounts linearly spaced over `[0.01, 0.9]`, five
//! independent reconstructions returned in order. Each slot gets its own
//! phase source, so slot `i` never sees values drawn by slot `j`.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::intensity::IntensityImage;
use crate::jitter::jitter_with_policy;
use crate::normalize::FlatPolicy;
use crate::phasor::{EntropyPhase, PhaseSource, SeededPhase};
use crate::spectrum::CenteredSpectrum;

pub const SWEEP_START: f64 = 0.01;
pub const SWEEP_END: f64 = 0.9;
pub const SWEEP_STEPS: usize = 5;

/// The sweep amounts; first and last are exactly the bounds.
pub fn jitter_amounts() -> [f64; SWEEP_STEPS] {
    let step = (SWEEP_END - SWEEP_START) / (SWEEP_STEPS - 1) as f64;
    let mut amounts = [0.0; SWEEP_STEPS];
    for (i, a) in amounts.iter_mut().enumerate() {
        *a = SWEEP_START + step * i as f64;
    }
    amounts[SWEEP_STEPS - 1] = SWEEP_END;
    amounts
}

/// One reconstruction of a sweep, with the amount that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct JitterOutput {
    pub amount: f64,
    pub image: IntensityImage,
}

impl JitterOutput {
    /// Thumbnail caption, e.g. `"Jitter: 0.23"`.
    pub fn label(&self) -> String {
        format!("Jitter: {:.2}", self.amount)
    }
}

/// Run the sweep. With a seed, slot `i` uses ChaCha20 stream `i` of that
/// seed and the result is reproducible; without one, each slot is seeded
/// from OS entropy.
pub fn run_sweep(
    spectrum: &CenteredSpectrum,
    seed: Option<[u8; 32]>,
    policy: FlatPolicy,
) -> Result<Vec<JitterOutput>> {
    match seed {
        Some(seed) => {
            run_sweep_with(spectrum, policy, |slot| SeededPhase::for_slot(&seed, slot as u64))
        }
        None => run_sweep_with(spectrum, policy, |_| EntropyPhase::new()),
    }
}

/// Run the sweep with a caller-provided source per slot.
pub fn run_sweep_with<S, F>(
    spectrum: &CenteredSpectrum,
    policy: FlatPolicy,
    make_source: F,
) -> Result<Vec<JitterOutput>>
where
    S: PhaseSource + Send,
    F: Fn(usize) -> S + Sync,
{
    let amounts = jitter_amounts();
    log::info!(
        "jitter sweep over {}x{} image: {amounts:?}",
        spectrum.width(),
        spectrum.height()
    );

    let run_slot = |(slot, &amount): (usize, &f64)| -> Result<JitterOutput> {
        let mut source = make_source(slot);
        let image = jitter_with_policy(spectrum, amount, &mut source, policy)?;
        log::debug!("slot {slot} done (amount {amount:.4})");
        Ok(JitterOutput { amount, image })
    };

    #[cfg(feature = "parallel")]
    let outputs = amounts.par_iter().enumerate().map(run_slot).collect();
    #[cfg(not(feature = "parallel"))]
    let outputs = amounts.iter().enumerate().map(run_slot).collect();

    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phasor::SequencePhase;

    fn checker(size: usize) -> IntensityImage {
        IntensityImage::from_fn(size, size, |x, y| if (x + y) % 2 == 0 { 0.0 } else { 255.0 })
            .unwrap()
    }

    #[test]
    fn amounts_are_linspace() {
        let a = jitter_amounts();
        let expected = [0.01, 0.2325, 0.455, 0.6775, 0.9];
        assert_eq!(a[0], SWEEP_START);
        assert_eq!(a[4], SWEEP_END);
        for (x, e) in a.iter().zip(expected) {
            assert!((x - e).abs() < 1e-12, "{x} vs {e}");
        }
    }

    #[test]
    fn labels_use_two_decimals() {
        let labels: Vec<String> = jitter_amounts()
            .iter()
            .map(|&amount| {
                let image = IntensityImage::new(1, 1, vec![0.0]).unwrap();
                JitterOutput { amount, image }.label()
            })
            .collect();
        assert_eq!(labels[0], "Jitter: 0.01");
        assert_eq!(labels[4], "Jitter: 0.90");
    }

    #[test]
    fn five_outputs_in_order() {
        let img = checker(8);
        let spec = CenteredSpectrum::from_image(&img);
        let outputs = run_sweep(&spec, Some([1u8; 32]), FlatPolicy::Zeros).unwrap();
        assert_eq!(outputs.len(), SWEEP_STEPS);
        for (out, amount) in outputs.iter().zip(jitter_amounts()) {
            assert_eq!(out.amount, amount);
            assert_eq!(out.image.shape(), (8, 8));
        }
    }

    #[test]
    fn seeded_sweep_is_reproducible() {
        let spec = CenteredSpectrum::from_image(&checker(6));
        let a = run_sweep(&spec, Some([9u8; 32]), FlatPolicy::Zeros).unwrap();
        let b = run_sweep(&spec, Some([9u8; 32]), FlatPolicy::Zeros).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn slot_matches_standalone_jitter() {
        let seed = [5u8; 32];
        let spec = CenteredSpectrum::from_image(&checker(8));
        let outputs = run_sweep(&spec, Some(seed), FlatPolicy::Zeros).unwrap();
        let amount = jitter_amounts()[3];
        let mut slot3 = SeededPhase::for_slot(&seed, 3);
        let alone = jitter_with_policy(&spec, amount, &mut slot3, FlatPolicy::Zeros).unwrap();
        assert_eq!(outputs[3].image, alone);
    }

    #[test]
    fn injected_sources() {
        let spec = CenteredSpectrum::from_image(&checker(4));
        let outputs =
            run_sweep_with(&spec, FlatPolicy::Zeros, |_| SequencePhase::new(vec![0.0])).unwrap();
        // Zero phase everywhere: every slot is the normalized original.
        let expected = checker(4).normalized(FlatPolicy::Zeros);
        for out in &outputs {
            for (a, b) in out.image.as_slice().iter().zip(expected.as_slice()) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn unseeded_sweep_runs() {
        let spec = CenteredSpectrum::from_image(&checker(8));
        let outputs = run_sweep(&spec, None, FlatPolicy::Zeros).unwrap();
        assert_eq!(outputs.len(), SWEEP_STEPS);
        assert!(outputs.iter().all(|o| o.image.as_slice().iter().all(|v| (0.0..=1.0).contains(v))));
    }
}
