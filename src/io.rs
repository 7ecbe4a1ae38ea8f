// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Collaborator interfaces consumed by the puzzle core.
//!
//! Everything the puzzles and the game controller touch in the outside world goes through one of
//! the traits below. Device drivers in [`crate::drivers`] and MCU wrappers in `hw` implement them
//! on the board; tests implement them with in-memory fakes.
//!
//! None of these calls return errors. An implementation that hits a bus fault logs it and returns
//! the last value it knew (or `None` where the trait allows it).

/// Whether a signal is asserted when the line is driven high or low.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// Which chip a [`Pin`] lives on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Bank {
    /// GPIO on the microcontroller itself.
    Mcu,
    /// SX1509 expander at address 0x3E.
    Expander0,
    /// SX1509 expander at address 0x70.
    Expander1,
}

/// A logical input/output line on the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pin {
    pub bank: Bank,
    pub index: u8,
    pub active: ActiveLevel,
}

impl Pin {
    /// Pull-up input that reads low when the button is pressed.
    pub const fn active_low(bank: Bank, index: u8) -> Self {
        Self {
            bank,
            index,
            active: ActiveLevel::Low,
        }
    }

    pub const fn active_high(bank: Bank, index: u8) -> Self {
        Self {
            bank,
            index,
            active: ActiveLevel::High,
        }
    }

    /// Translate a raw line level into "asserted".
    #[inline]
    pub fn is_asserted(&self, level_high: bool) -> bool {
        match self.active {
            ActiveLevel::High => level_high,
            ActiveLevel::Low => !level_high,
        }
    }
}

/// Raw digital inputs, addressed by logical pin.
pub trait DigitalInput {
    /// Configure `pin` as an input, optionally with the internal pull-up enabled.
    fn configure_input(&mut self, pin: Pin, pull_up: bool);

    /// Raw line level (`true` = high).
    fn read(&mut self, pin: Pin) -> bool;

    /// Whether `pin` is asserted, honouring its [`ActiveLevel`].
    fn is_asserted(&mut self, pin: Pin) -> bool {
        let level = self.read(pin);
        pin.is_asserted(level)
    }
}

/// Level-triggered view of a key matrix.
pub trait KeyScanner {
    /// Key currently held down, if any.
    fn held_key(&mut self) -> Option<char>;
}

/// Board orientation in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    pub pitch: f32,
    pub roll: f32,
}

pub trait TiltSensor {
    /// Begin sampling.
    fn start(&mut self);

    /// Stop sampling.
    fn stop(&mut self);

    /// Latest orientation, or `None` when no fresh sample is available.
    fn pose(&mut self) -> Option<Pose>;
}

/// Closed set of colors understood by every indicator device.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Color {
    Black,
    White,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
}

/// Channel brightness used for every lit color.
pub const BRIGHTNESS: u8 = 16;

impl Color {
    /// `(r, g, b)` levels for pixel devices.
    pub const fn rgb(self) -> (u8, u8, u8) {
        const B: u8 = BRIGHTNESS;
        match self {
            Color::Black => (0, 0, 0),
            Color::White => (B, B, B),
            Color::Red => (B, 0, 0),
            Color::Green => (0, B, 0),
            Color::Blue => (0, 0, B),
            Color::Yellow => (B, B, 0),
            Color::Cyan => (0, B, B),
            Color::Magenta => (B, 0, B),
        }
    }
}

/// Addressable array of colored lights.
///
/// Writes are buffered; nothing reaches the hardware until [`Indicator::flush`].
pub trait Indicator {
    fn len(&self) -> usize;

    /// Set one light. Out-of-range indices are ignored.
    fn set(&mut self, index: usize, color: Color);

    fn set_all(&mut self, color: Color) {
        for i in 0..self.len() {
            self.set(i, color);
        }
    }

    fn clear(&mut self, index: usize) {
        self.set(index, Color::Black);
    }

    fn clear_all(&mut self) {
        self.set_all(Color::Black);
    }

    /// Push pending changes to the device.
    fn flush(&mut self);
}

/// Longest utterance accepted by [`Speech::say`].
pub const MAX_SPEECH_LEN: usize = 250;

pub trait Speech {
    /// Speak `text`. Implementations reject (and log) text longer than [`MAX_SPEECH_LEN`].
    fn say(&mut self, text: &str);
}

/// Single-voice tone generator (buzzer).
pub trait Tone {
    fn tone_on(&mut self, freq_hz: u32);
    fn tone_off(&mut self);
}

/// Remaining-time readout.
pub trait CountdownDisplay {
    /// Show `seconds` as MM:SS, with the colon lit or dark.
    fn show(&mut self, seconds: u32, colon: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_low_pin_asserts_on_low_level() {
        let pin = Pin::active_low(Bank::Expander1, 8);
        assert!(pin.is_asserted(false));
        assert!(!pin.is_asserted(true));
    }

    #[test]
    fn lit_colors_use_shared_brightness() {
        assert_eq!(Color::Yellow.rgb(), (BRIGHTNESS, BRIGHTNESS, 0));
        assert_eq!(Color::Black.rgb(), (0, 0, 0));
    }
}
