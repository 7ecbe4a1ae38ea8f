// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Common-anode RGB lamp on three SX1509 pins.
//!
//! Each channel is simply on or off, so any nonzero channel level in [`Color::rgb`] lights it.

use embedded_hal::blocking::i2c::{Write, WriteRead};

use super::sx1509::Sx1509;
use crate::io::{Color, Indicator};

pub struct RgbLamp<I2C> {
    dev: Sx1509<I2C>,
    /// Red, green, blue pins.
    pins: [u8; 3],
    color: Color,
    shown: Option<Color>,
}

impl<I2C, E> RgbLamp<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: core::fmt::Debug,
{
    pub fn new(dev: Sx1509<I2C>, red: u8, green: u8, blue: u8) -> Self {
        Self {
            dev,
            pins: [red, green, blue],
            color: Color::Black,
            shown: None,
        }
    }

    /// Configure the pins as outputs and switch the lamp off.
    pub fn init(&mut self) -> Result<(), E> {
        for pin in self.pins {
            // drive high (off) before enabling the output
            self.dev.write_pin(pin, true)?;
            self.dev.configure_output(pin)?;
        }
        self.shown = Some(Color::Black);
        Ok(())
    }

    fn show(&mut self, color: Color) -> Result<(), E> {
        let (r, g, b) = color.rgb();
        for (pin, level) in self.pins.into_iter().zip([r, g, b]) {
            // active-low
            self.dev.write_pin(pin, level == 0)?;
        }
        Ok(())
    }
}

impl<I2C, E> Indicator for RgbLamp<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: core::fmt::Debug,
{
    fn len(&self) -> usize {
        1
    }

    fn set(&mut self, index: usize, color: Color) {
        if index == 0 {
            self.color = color;
        }
    }

    fn flush(&mut self) {
        if self.shown == Some(self.color) {
            return;
        }
        match self.show(self.color) {
            Ok(()) => self.shown = Some(self.color),
            Err(e) => {
                log::warn!("lamp: update failed: {:?}", e);
                self.shown = None;
            }
        }
    }
}
