// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SX1509 16-channel I2C GPIO expander.
//!
//! Pins 0-7 live in bank A, pins 8-15 in bank B. Every pin update is a read-modify-write of the
//! bank register, so several `Sx1509` handles (keypad, lamp, inputs) can share one chip through
//! `shared-bus` proxies without clobbering each other's pins.

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::io::{DigitalInput, Pin};

// Register addresses
pub mod reg {
    pub const INPUT_DISABLE_B: u8 = 0x00;
    pub const INPUT_DISABLE_A: u8 = 0x01;
    pub const PULL_UP_B: u8 = 0x06;
    pub const PULL_UP_A: u8 = 0x07;
    pub const DIR_B: u8 = 0x0E;
    pub const DIR_A: u8 = 0x0F;
    pub const DATA_B: u8 = 0x10;
    pub const DATA_A: u8 = 0x11;
    pub const RESET: u8 = 0x7D;
}

/// Number of I/O pins.
pub const PINS: u8 = 16;

/// Bank register (A or B) and bit mask for `pin`. Out-of-range pins get an empty mask.
#[inline]
fn locate(pin: u8, reg_b: u8, reg_a: u8) -> (u8, u8) {
    match pin {
        0..=7 => (reg_a, 1 << pin),
        8..=15 => (reg_b, 1 << (pin - 8)),
        _ => (reg_a, 0),
    }
}

pub struct Sx1509<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C, E> Sx1509<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    pub fn free(self) -> I2C {
        self.i2c
    }

    #[inline]
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Software reset. Every pin returns to a pull-less input.
    pub fn reset(&mut self) -> Result<(), E> {
        self.write_reg(reg::RESET, 0x12)?;
        self.write_reg(reg::RESET, 0x34)
    }

    pub fn read_reg(&mut self, reg: u8) -> Result<u8, E> {
        let mut buf = [0u8];
        self.i2c.write_read(self.addr, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), E> {
        self.i2c.write(self.addr, &[reg, value])
    }

    fn modify_bit(&mut self, reg: u8, mask: u8, set: bool) -> Result<(), E> {
        if mask == 0 {
            return Ok(());
        }
        let old = self.read_reg(reg)?;
        let new = if set { old | mask } else { old & !mask };
        if new != old {
            self.write_reg(reg, new)?;
        }
        Ok(())
    }

    pub fn configure_input(&mut self, pin: u8, pull_up: bool) -> Result<(), E> {
        let (dir, mask) = locate(pin, reg::DIR_B, reg::DIR_A);
        self.modify_bit(dir, mask, true)?;
        let (pull, mask) = locate(pin, reg::PULL_UP_B, reg::PULL_UP_A);
        self.modify_bit(pull, mask, pull_up)
    }

    pub fn configure_output(&mut self, pin: u8) -> Result<(), E> {
        let (dir, mask) = locate(pin, reg::DIR_B, reg::DIR_A);
        self.modify_bit(dir, mask, false)
    }

    pub fn read_pin(&mut self, pin: u8) -> Result<bool, E> {
        let (data, mask) = locate(pin, reg::DATA_B, reg::DATA_A);
        Ok(self.read_reg(data)? & mask != 0)
    }

    pub fn write_pin(&mut self, pin: u8, high: bool) -> Result<(), E> {
        let (data, mask) = locate(pin, reg::DATA_B, reg::DATA_A);
        self.modify_bit(data, mask, high)
    }

    /// All 16 pin levels, bank B in the high byte.
    pub fn read_all(&mut self) -> Result<u16, E> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.addr, &[reg::DATA_B], &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }
}

/// [`DigitalInput`] over one expander. The pin's bank is not checked; route with
/// [`super::inputs::BankedInputs`].
///
/// On a bus fault the last level read from the pin is returned.
pub struct ExpanderInputs<I2C> {
    dev: Sx1509<I2C>,
    last: u16,
}

impl<I2C, E> ExpanderInputs<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(dev: Sx1509<I2C>) -> Self {
        // inputs idle high behind their pull-ups
        Self { dev, last: 0xFFFF }
    }
}

impl<I2C, E> DigitalInput for ExpanderInputs<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: core::fmt::Debug,
{
    fn configure_input(&mut self, pin: Pin, pull_up: bool) {
        if let Err(e) = self.dev.configure_input(pin.index, pull_up) {
            log::warn!("sx1509@{:#04x}: configure pin {} failed: {:?}", self.dev.addr(), pin.index, e);
        }
    }

    fn read(&mut self, pin: Pin) -> bool {
        if pin.index >= PINS {
            return false;
        }
        let mask = 1u16 << pin.index;
        match self.dev.read_pin(pin.index) {
            Ok(high) => {
                if high {
                    self.last |= mask;
                } else {
                    self.last &= !mask;
                }
                high
            }
            Err(e) => {
                log::warn!("sx1509@{:#04x}: read pin {} failed: {:?}", self.dev.addr(), pin.index, e);
                self.last & mask != 0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeI2c;
    use crate::io::Bank;

    const ADDR: u8 = 0x3E;

    #[test]
    fn reset_writes_the_key_sequence() {
        let bus = FakeI2c::default();
        let mut dev = Sx1509::new(bus.clone(), ADDR);
        dev.reset().unwrap();
        assert_eq!(
            bus.writes(),
            [(ADDR, vec![reg::RESET, 0x12]), (ADDR, vec![reg::RESET, 0x34])]
        );
    }

    #[test]
    fn pins_map_onto_their_bank() {
        let bus = FakeI2c::default();
        let mut dev = Sx1509::new(bus.clone(), ADDR);

        dev.configure_input(3, true).unwrap();
        dev.configure_input(12, false).unwrap();
        dev.configure_output(9).unwrap();
        assert_eq!(bus.reg(ADDR, reg::DIR_A), 0b0000_1000);
        assert_eq!(bus.reg(ADDR, reg::DIR_B), 0b0001_0000);
        assert_eq!(bus.reg(ADDR, reg::PULL_UP_A), 0b0000_1000);
        assert_eq!(bus.reg(ADDR, reg::PULL_UP_B), 0);

        dev.write_pin(9, true).unwrap();
        dev.write_pin(14, true).unwrap();
        dev.write_pin(9, false).unwrap();
        assert_eq!(bus.reg(ADDR, reg::DATA_B), 0b0100_0000);
    }

    #[test]
    fn read_all_puts_bank_b_high() {
        let bus = FakeI2c::default();
        bus.set_reg(ADDR, reg::DATA_B, 0x81);
        bus.set_reg(ADDR, reg::DATA_A, 0x02);
        let mut dev = Sx1509::new(bus, ADDR);
        assert_eq!(dev.read_all().unwrap(), 0x8102);
        assert!(dev.read_pin(15).unwrap());
        assert!(dev.read_pin(1).unwrap());
        assert!(!dev.read_pin(0).unwrap());
    }

    #[test]
    fn unchanged_bit_skips_the_write() {
        let bus = FakeI2c::default();
        bus.set_reg(ADDR, reg::DATA_A, 0x01);
        let mut dev = Sx1509::new(bus.clone(), ADDR);
        dev.write_pin(0, true).unwrap();
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn input_adapter_falls_back_to_last_level() {
        let bus = FakeI2c::default();
        let pin = Pin::active_low(Bank::Expander1, 8);
        let mut inputs = ExpanderInputs::new(Sx1509::new(bus.clone(), ADDR));

        assert!(!inputs.read(pin));
        assert!(inputs.is_asserted(pin));

        bus.set_failing(true);
        assert!(!inputs.read(pin));

        bus.set_failing(false);
        bus.set_reg(ADDR, reg::DATA_B, 0x01);
        assert!(inputs.read(pin));
        bus.set_failing(true);
        assert!(inputs.read(pin));
    }
}
