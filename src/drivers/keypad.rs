// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! 4×3 membrane keypad scanned through an SX1509.
//!
//! Rows are push-pull outputs idling high, columns are pulled-up inputs. A scan drives one row low
//! at a time and reports the first column that reads low, so with several keys down the one
//! nearest the top-left wins.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::i2c::{Write, WriteRead};

use super::sx1509::Sx1509;
use crate::io::KeyScanner;

pub const KEYMAP: [[char; 3]; 4] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    ['*', '0', '#'],
];

/// Row settle time after driving it low.
const SETTLE_US: u32 = 10;

pub struct Keypad<I2C, D> {
    dev: Sx1509<I2C>,
    delay: D,
    rows: [u8; 4],
    cols: [u8; 3],
}

impl<I2C, E, D> Keypad<I2C, D>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    D: DelayUs<u32>,
{
    pub fn new(dev: Sx1509<I2C>, delay: D, rows: [u8; 4], cols: [u8; 3]) -> Self {
        Self {
            dev,
            delay,
            rows,
            cols,
        }
    }

    /// Configure the row and column pins.
    pub fn init(&mut self) -> Result<(), E> {
        for row in self.rows {
            self.dev.configure_output(row)?;
            self.dev.write_pin(row, true)?;
        }
        for col in self.cols {
            self.dev.configure_input(col, true)?;
        }
        Ok(())
    }

    /// Key currently held down, if any.
    pub fn scan(&mut self) -> Result<Option<char>, E> {
        for (r, &row) in self.rows.iter().enumerate() {
            self.dev.write_pin(row, false)?;
            self.delay.delay_us(SETTLE_US);

            let mut found = None;
            for (c, &col) in self.cols.iter().enumerate() {
                if !self.dev.read_pin(col)? {
                    found = Some(KEYMAP[r][c]);
                    break;
                }
            }

            self.dev.write_pin(row, true)?;
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }
}

impl<I2C, E, D> KeyScanner for Keypad<I2C, D>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: core::fmt::Debug,
    D: DelayUs<u32>,
{
    fn held_key(&mut self) -> Option<char> {
        match self.scan() {
            Ok(key) => key,
            Err(e) => {
                log::warn!("keypad: scan failed: {:?}", e);
                None
            }
        }
    }
}
