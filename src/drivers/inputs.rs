// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Digital inputs spread over the MCU and the two expanders.

use core::convert::Infallible;

use embedded_hal::digital::v2::InputPin;

use crate::io::{Bank, DigitalInput, Pin};

/// Logical MCU input slots.
pub const MCU_SLOTS: usize = 16;

/// MCU GPIO inputs by logical index.
///
/// Pull resistors are fixed when the HAL pins are configured, so `configure_input` only checks
/// that a pin is wired to the slot. Unwired slots read low.
pub struct McuInputs<'a> {
    pins: [Option<&'a mut dyn InputPin<Error = Infallible>>; MCU_SLOTS],
}

impl<'a> McuInputs<'a> {
    pub fn new() -> Self {
        Self {
            pins: Default::default(),
        }
    }

    /// Wire `pin` to logical slot `index`.
    pub fn with(mut self, index: u8, pin: &'a mut dyn InputPin<Error = Infallible>) -> Self {
        if let Some(slot) = self.pins.get_mut(index as usize) {
            *slot = Some(pin);
        }
        self
    }
}

impl Default for McuInputs<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalInput for McuInputs<'_> {
    fn configure_input(&mut self, pin: Pin, _pull_up: bool) {
        if !matches!(self.pins.get(pin.index as usize), Some(Some(_))) {
            log::warn!("gpio: no MCU pin wired to slot {}", pin.index);
        }
    }

    fn read(&mut self, pin: Pin) -> bool {
        match self.pins.get(pin.index as usize) {
            Some(Some(p)) => matches!(p.is_high(), Ok(true)),
            _ => false,
        }
    }
}

/// Routes each [`Pin`] to the input bank it lives on.
pub struct BankedInputs<'a> {
    pub mcu: &'a mut dyn DigitalInput,
    pub expander0: &'a mut dyn DigitalInput,
    pub expander1: &'a mut dyn DigitalInput,
}

impl BankedInputs<'_> {
    fn bank(&mut self, bank: Bank) -> &mut dyn DigitalInput {
        match bank {
            Bank::Mcu => &mut *self.mcu,
            Bank::Expander0 => &mut *self.expander0,
            Bank::Expander1 => &mut *self.expander1,
        }
    }
}

impl DigitalInput for BankedInputs<'_> {
    fn configure_input(&mut self, pin: Pin, pull_up: bool) {
        self.bank(pin.bank).configure_input(pin, pull_up);
    }

    fn read(&mut self, pin: Pin) -> bool {
        self.bank(pin.bank).read(pin)
    }
}
