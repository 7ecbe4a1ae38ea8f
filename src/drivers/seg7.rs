// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SparkFun Serial 7-Segment Display (4 digits + colon) over I2C.

use embedded_hal::blocking::i2c::Write;

use crate::io::CountdownDisplay;

const CMD_CLEAR: u8 = 0x76;
const CMD_DECIMAL: u8 = 0x77;
/// Colon bit of the decimal-control mask.
const COLON: u8 = 1 << 4;

/// Largest value the four digits can show.
pub const MAX_SECONDS: u32 = 99 * 60 + 59;

/// ASCII digits `MMSS` for `seconds`, clamped to 99:59.
pub fn mmss(seconds: u32) -> [u8; 4] {
    let seconds = seconds.min(MAX_SECONDS);
    let (m, s) = (seconds / 60, seconds % 60);
    [m / 10, m % 10, s / 10, s % 10].map(|d| b'0' + d as u8)
}

pub struct Seg7<I2C> {
    i2c: I2C,
    addr: u8,
    shown: Option<(u32, bool)>,
}

impl<I2C, E> Seg7<I2C>
where
    I2C: Write<Error = E>,
{
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            shown: None,
        }
    }

    /// Blank the display and home the cursor.
    pub fn clear(&mut self) -> Result<(), E> {
        self.shown = None;
        self.i2c.write(self.addr, &[CMD_CLEAR])
    }

    pub fn show_time(&mut self, seconds: u32, colon: bool) -> Result<(), E> {
        self.i2c.write(self.addr, &[CMD_CLEAR])?;
        let mask = if colon { COLON } else { 0 };
        self.i2c.write(self.addr, &[CMD_DECIMAL, mask])?;
        self.i2c.write(self.addr, &mmss(seconds))
    }
}

impl<I2C, E> CountdownDisplay for Seg7<I2C>
where
    I2C: Write<Error = E>,
    E: core::fmt::Debug,
{
    fn show(&mut self, seconds: u32, colon: bool) {
        if self.shown == Some((seconds, colon)) {
            return;
        }
        match self.show_time(seconds, colon) {
            Ok(()) => self.shown = Some((seconds, colon)),
            Err(e) => {
                log::warn!("seg7: update failed: {:?}", e);
                self.shown = None;
            }
        }
    }
}
