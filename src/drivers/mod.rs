// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit between the bus wrappers (`hw/` on the
//! board, fakes in tests) and the puzzle logic. Every driver is generic over `embedded-hal` 0.2
//! traits and implements one of the collaborator traits in [`crate::io`], logging bus faults
//! instead of returning them.
//!
//! ## Existing drivers
//!
//! - [`sx1509`] – Semtech SX1509 16-channel I2C GPIO expander
//! - [`inputs`] – MCU input slots and the per-bank input router
//! - [`keypad`] – 4×3 membrane keypad scanned through an SX1509
//! - [`rgb_lamp`] – Common-anode RGB status lamp on SX1509 pins
//! - [`lsm6dso`] – ST LSM6DSO accelerometer (pitch/roll)
//! - [`dfr0760`] – DFRobot DFR0760 text-to-speech module
//! - [`seg7`] – SparkFun serial 7-segment countdown display
//! - [`neopixel`] – WS2812 pixel chains
//! - [`buzzer`] – PWM piezo buzzer

pub mod buzzer;
pub mod dfr0760;
pub mod inputs;
pub mod keypad;
pub mod lsm6dso;
pub mod neopixel;
pub mod rgb_lamp;
pub mod seg7;
pub mod sx1509;

pub use buzzer::Buzzer;
pub use dfr0760::Dfr0760;
pub use inputs::{BankedInputs, McuInputs};
pub use keypad::Keypad;
pub use lsm6dso::Lsm6dso;
pub use neopixel::NeoPixel;
pub use rgb_lamp::RgbLamp;
pub use seg7::Seg7;
pub use sx1509::{ExpanderInputs, Sx1509};
