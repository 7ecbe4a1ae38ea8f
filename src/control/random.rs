// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Random numbers for solution generation.
//!
//! Puzzles only see [`RandomSource`]. On the board it is a [`SeededRandom`] seeded once from the
//! STM32 hardware RNG; tests seed it with a fixed value (or script the bytes directly).

use rand::{rngs::SmallRng, RngCore, SeedableRng};

pub trait RandomSource {
    /// Restart the stream from `value`.
    fn seed(&mut self, value: u64);

    fn next_byte(&mut self) -> u8;

    fn next_u16(&mut self) -> u16 {
        u16::from_be_bytes([self.next_byte(), self.next_byte()])
    }

    fn next_bool(&mut self) -> bool {
        self.next_byte() & 1 == 1
    }

    /// Uniform value in `0..bound` (`bound` in `1..=256`), by rejection of the biased tail.
    fn next_below(&mut self, bound: u16) -> u8 {
        let bound = bound.clamp(1, 256);
        let limit = 256 - (256 % bound);
        loop {
            let b = u16::from(self.next_byte());
            if b < limit {
                return (b % bound) as u8;
            }
        }
    }
}

/// Small, fast PRNG behind the [`RandomSource`] interface.
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn seed(&mut self, value: u64) {
        self.rng = SmallRng::seed_from_u64(value);
    }

    #[inline]
    fn next_byte(&mut self) -> u8 {
        (self.rng.next_u32() >> 24) as u8
    }

    fn next_u16(&mut self) -> u16 {
        (self.rng.next_u32() >> 16) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(7);
        b.seed(42);
        for _ in 0..32 {
            assert_eq!(a.next_byte(), b.next_byte());
        }
    }

    #[test]
    fn next_below_stays_in_range() {
        let mut rng = SeededRandom::new(1);
        for bound in [1u16, 2, 4, 10, 250, 256] {
            for _ in 0..200 {
                assert!(u16::from(rng.next_below(bound)) < bound);
            }
        }
    }

    #[test]
    fn next_below_hits_every_digit() {
        let mut rng = SeededRandom::new(99);
        let mut seen = [false; 10];
        for _ in 0..1000 {
            seen[rng.next_below(10) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
