//! Random number stream for combat rolls.
//!
//! A battle consumes a single stream in a fixed order per attack (freeze,
//! poison, critical, then bonus attack), so replaying a match only needs the
//! seed. [`SequenceRng`] replays an explicit list of draws instead, which is
//! how tests pin individual rolls.

use std::collections::VecDeque;

/// Source of uniform draws in `[0, 1)`.
///
/// Implementations must be deterministic: the same construction yields the
/// same sequence.
pub trait RandomSource {
    /// Next 32 random bits.
    fn next_u32(&mut self) -> u32;

    /// Next uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// - **Deterministic**: same seed, same stream
/// - **Fast**: single multiply + xorshift + rotate
/// - **Small state**: only 64 bits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    /// `state' = state * multiplier + increment (mod 2^64)`
    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output permutation of a state.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

/// Replays a fixed list of draws, then keeps returning a fallback value.
#[derive(Clone, Debug, Default)]
pub struct SequenceRng {
    draws: VecDeque<f64>,
    fallback: f64,
    consumed: usize,
}

impl SequenceRng {
    /// Replays `draws`; once exhausted returns `0.999_999`, which fails
    /// every "draw below chance" roll.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0.999_999,
            consumed: 0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of draws handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Scripted draws not yet consumed.
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_f64() * (f64::from(u32::MAX) + 1.0)) as u32
    }

    fn next_f64(&mut self) -> f64 {
        self.consumed += 1;
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}
