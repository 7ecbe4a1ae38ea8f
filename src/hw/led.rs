// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board status LED, used as the poll-loop heartbeat.

use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;

use crate::io::ActiveLevel;

/// LED that remembers its active level and last driven state.
pub struct Led<PIN: OutputPin<Error = Infallible>> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
}

impl<PIN: OutputPin<Error = Infallible>> Led<PIN> {
    /// Create an LED wrapper, initially off.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        let mut led = Self {
            pin,
            active,
            is_on: false,
        };
        led.set(false);
        led
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    /// Drive the LED logically on or off.
    pub fn set(&mut self, on: bool) {
        let high = match self.active {
            ActiveLevel::High => on,
            ActiveLevel::Low => !on,
        };
        let _ = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        self.is_on = on;
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_on);
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }
}
