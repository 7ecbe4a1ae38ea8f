// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The set of collaborators lent to a puzzle for one call.
//!
//! The firmware builds a single `Board` at boot, borrowing every driver for the lifetime of the
//! poll loop, and passes `&mut Board` into each puzzle operation, the same way drivers receive the
//! shared SPI bus per call instead of owning it.

use crate::control::feedback::FeedbackHub;
use crate::control::random::RandomSource;
use crate::io::{CountdownDisplay, DigitalInput, KeyScanner, TiltSensor};

pub struct Board<'a> {
    pub inputs: &'a mut dyn DigitalInput,
    pub keypad: &'a mut dyn KeyScanner,
    pub tilt: &'a mut dyn TiltSensor,
    pub rng: &'a mut dyn RandomSource,
    pub display: &'a mut dyn CountdownDisplay,
    pub feedback: FeedbackHub<'a>,
}
