// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Random phase sources and unit phasors.
//!
//! The jitter transform draws one uniform value in `[0, 1)` per spectrum bin
//! from a [`PhaseSource`]. Production code uses [`SeededPhase`] (ChaCha20,
//! reproducible) or [`EntropyPhase`] (OS-seeded, different every run);
//! tests can substitute [`SequencePhase`] or [`ZeroPhase`].
//!
//! # Per-slot streams
//!
//! [`SeededPhase::for_slot`] keys one seed to many independent ChaCha20
//! streams. A sweep gives slot `i` stream `i`, so the values drawn for one
//! jitter amount never depend on how many values another slot consumed,
//! or on whether slots run sequentially or in parallel.

use std::f64::consts::TAU;

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Source of uniform random values in `[0, 1)`.
pub trait PhaseSource {
    fn next_unit(&mut self) -> f64;
}

impl<P: PhaseSource + ?Sized> PhaseSource for &mut P {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Reproducible source backed by ChaCha20.
#[derive(Clone, Debug)]
pub struct SeededPhase {
    rng: ChaCha20Rng,
}

impl SeededPhase {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        SeededPhase { rng: ChaCha20Rng::from_seed(seed) }
    }

    pub fn from_u64(seed: u64) -> Self {
        SeededPhase { rng: ChaCha20Rng::seed_from_u64(seed) }
    }

    /// Independent stream `slot` under the same seed.
    pub fn for_slot(seed: &[u8; 32], slot: u64) -> Self {
        let mut rng = ChaCha20Rng::from_seed(*seed);
        rng.set_stream(slot);
        SeededPhase { rng }
    }
}

impl PhaseSource for SeededPhase {
    fn next_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// Non-reproducible source seeded from OS entropy.
#[derive(Debug)]
pub struct EntropyPhase {
    rng: StdRng,
}

impl EntropyPhase {
    pub fn new() -> Self {
        EntropyPhase { rng: StdRng::from_entropy() }
    }
}

impl Default for EntropyPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseSource for EntropyPhase {
    fn next_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// Cycles through a fixed list of values. Yields 0.0 if the list is empty.
#[derive(Clone, Debug)]
pub struct SequencePhase {
    values: Vec<f64>,
    pos: usize,
}

impl SequencePhase {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        SequencePhase { values: values.into(), pos: 0 }
    }
}

impl PhaseSource for SequencePhase {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos];
        self.pos = (self.pos + 1) % self.values.len();
        v
    }
}

/// Always 0.0: every phasor is exactly `1 + 0i`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroPhase;

impl PhaseSource for ZeroPhase {
    fn next_unit(&mut self) -> f64 {
        0.0
    }
}

/// `exp(i * 2*pi * r * amount)`
pub fn unit_phasor(r: f64, amount: f64) -> Complex64 {
    Complex64::from_polar(1.0, TAU * r * amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw<P: PhaseSource>(mut p: P, n: usize) -> Vec<f64> {
        (0..n).map(|_| p.next_unit()).collect()
    }

    #[test]
    fn seeded_is_deterministic() {
        let a = draw(SeededPhase::from_seed([42u8; 32]), 64);
        let b = draw(SeededPhase::from_seed([42u8; 32]), 64);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn different_seeds_differ() {
        let a = draw(SeededPhase::from_u64(1), 16);
        let b = draw(SeededPhase::from_u64(2), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn slots_are_independent_streams() {
        let seed = [7u8; 32];
        let s0 = draw(SeededPhase::for_slot(&seed, 0), 32);
        let s1 = draw(SeededPhase::for_slot(&seed, 1), 32);
        assert_ne!(s0, s1);
        assert_eq!(s1, draw(SeededPhase::for_slot(&seed, 1), 32));
    }

    #[test]
    fn entropy_values_in_range() {
        assert!(draw(EntropyPhase::new(), 256).iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn sequence_cycles() {
        assert_eq!(draw(SequencePhase::new(vec![0.1, 0.2]), 5), vec![0.1, 0.2, 0.1, 0.2, 0.1]);
        assert_eq!(draw(SequencePhase::new(Vec::new()), 2), vec![0.0, 0.0]);
    }

    #[test]
    fn borrowed_source_advances_owner() {
        let mut seq = SequencePhase::new(vec![0.25, 0.5, 0.75]);
        assert_eq!(draw(&mut seq, 2), vec![0.25, 0.5]);
        assert_eq!(seq.next_unit(), 0.75);
    }

    #[test]
    fn phasor_is_unit_magnitude() {
        for &(r, a) in &[(0.0, 0.5), (0.3, 0.9), (0.999, 1.0), (0.5, 0.01)] {
            let p = unit_phasor(r, a);
            assert!((p.norm() - 1.0).abs() < 1e-12);
            assert!((p.arg().rem_euclid(TAU) - (TAU * r * a).rem_euclid(TAU)).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_amount_is_identity_phasor() {
        assert_eq!(unit_phasor(0.73, 0.0), Complex64::new(1.0, 0.0));
        assert_eq!(unit_phasor(ZeroPhase.next_unit(), 0.9), Complex64::new(1.0, 0.0));
    }
}
