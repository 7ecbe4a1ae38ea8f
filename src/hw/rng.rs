// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STM32F7 true random number generator, used once at boot to seed the puzzle PRNG.

use stm32f7xx_hal::pac;

/// Polls of the data-ready flag before a draw is abandoned.
const READY_POLLS: u32 = 10_000;

pub struct HwRng {
    rng: pac::RNG,
}

impl HwRng {
    /// Clock and enable the RNG peripheral.
    pub fn new(rng: pac::RNG) -> Self {
        // SAFETY: single read-modify-write of the RNG clock enable bit at boot, before the HAL
        // takes over RCC.
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.ahb2enr.modify(|_, w| w.rngen().set_bit());

        rng.cr.modify(|_, w| w.rngen().set_bit());
        Self { rng }
    }

    /// One 32-bit draw, or `None` on a seed/clock error or timeout.
    pub fn next_u32(&mut self) -> Option<u32> {
        for _ in 0..READY_POLLS {
            let sr = self.rng.sr.read();
            if sr.seis().bit_is_set() || sr.ceis().bit_is_set() {
                // clear the error and restart the generator
                self.rng.sr.modify(|_, w| w.seis().clear_bit().ceis().clear_bit());
                self.rng.cr.modify(|_, w| w.rngen().clear_bit());
                self.rng.cr.modify(|_, w| w.rngen().set_bit());
                continue;
            }
            if sr.drdy().bit_is_set() {
                return Some(self.rng.dr.read().bits());
            }
        }
        None
    }

    /// 64-bit PRNG seed. Falls back to a fixed value (with a warning) if the generator fails.
    pub fn seed(&mut self) -> u64 {
        match (self.next_u32(), self.next_u32()) {
            (Some(hi), Some(lo)) => (u64::from(hi) << 32) | u64::from(lo),
            _ => {
                log::warn!("rng: hardware generator not ready, using fixed seed");
                0x5EED_5EED_5EED_5EED
            }
        }
    }

    pub fn free(self) -> pac::RNG {
        self.rng
    }
}
