// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond clock on SysTick, plus a busy-wait delay for driver handshakes.
//!
//! The SysTick exception handler lives in the binary and must call [`tick`] once per interrupt.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::control::time::{at, Instant};

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Configure SysTick to interrupt every millisecond.
pub fn start(syst: &mut SYST, sysclk_hz: u32) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(sysclk_hz / 1000 - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Advance the clock by one millisecond.
#[inline]
pub fn tick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn now() -> Instant {
    at(MILLIS.load(Ordering::Relaxed))
}

/// Cycle-counting delay. SysTick is taken by the clock, so drivers get this instead of the HAL
/// `Delay`.
#[derive(Copy, Clone)]
pub struct SpinDelay {
    cycles_per_us: u32,
}

impl SpinDelay {
    pub fn new(sysclk_hz: u32) -> Self {
        Self {
            cycles_per_us: (sysclk_hz / 1_000_000).max(1),
        }
    }
}

impl DelayUs<u32> for SpinDelay {
    fn delay_us(&mut self, us: u32) {
        cortex_m::asm::delay(us.saturating_mul(self.cycles_per_us));
    }
}

impl DelayMs<u32> for SpinDelay {
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1000);
        }
    }
}
