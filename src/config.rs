// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Game-wide constants and per-puzzle configuration.
//!
//! Every `*Config` has a `Default` matching the production escape-room box. Tests and bench setups
//! override individual fields with struct update syntax:
//!
//! ```
//! use puzzlebox::config::PoseHoldConfig;
//!
//! let cfg = PoseHoldConfig { holds_required: 1, ..Default::default() };
//! assert_eq!(cfg.tolerance_deg, 20.0);
//! ```

use crate::io::{Bank, Pin};

/// Length of one game, in seconds.
pub const GAME_LENGTH_S: u32 = 5 * 60;

/// Period of the top-level poll loop.
pub const TICK_MS: u32 = 20;

/// TTS volume level (0..=9).
pub const TTS_VOLUME: u8 = 1;

/// Debug logging enabled for this build.
pub const VERBOSE: bool = cfg!(feature = "verbose");

// I2C addresses
pub const EXPANDER0_ADDR: u8 = 0x3E;
pub const EXPANDER1_ADDR: u8 = 0x70;
pub const LSM6DSO_ADDR: u8 = 0x6B;
pub const DFR0760_ADDR: u8 = 0x40;
pub const SEG7_ADDR: u8 = 0x71;

// Pixel counts
pub const RING_LEN: usize = 16;
pub const JEWEL_LEN: usize = 7;
pub const STICK_LEN: usize = 8;

/// How a puzzle's select input picks the active puzzle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SelectMode {
    /// The puzzle runs only on ticks where its select input is held.
    Held,
    /// A select press makes the puzzle active until another puzzle is selected.
    Latched,
}

/// Whether `Speech::say` waits for the module to finish talking.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SpeechMode {
    FireAndForget,
    Blocking,
}

/// What the memory puzzle replays after a wrong answer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RetryPolicy {
    /// Generate a fresh random sequence.
    Regenerate,
    /// Show the same sequence again.
    Replay,
}

#[derive(Copy, Clone, Debug)]
pub struct GameConfig {
    pub game_length_s: u32,
    pub select_mode: SelectMode,
    /// Settle time for start and select buttons.
    pub debounce_ms: u32,
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_length_s: GAME_LENGTH_S,
            select_mode: SelectMode::Held,
            debounce_ms: 50,
            debug: VERBOSE,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SequenceMatchConfig {
    pub select: Pin,
    /// Number of digits in the solution.
    pub code_len: usize,
    pub morse_unit_ms: u32,
    pub morse_tone_hz: u32,
    pub debounce_ms: u32,
}

impl Default for SequenceMatchConfig {
    fn default() -> Self {
        Self {
            select: PinMap::DEFAULT.sequence_select,
            code_len: 4,
            morse_unit_ms: 120,
            morse_tone_hz: 700,
            debounce_ms: 50,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct PoseHoldConfig {
    pub select: Pin,
    /// Allowed deviation per axis.
    pub tolerance_deg: f32,
    pub hold_ms: u32,
    /// Period of the in-tolerance re-check.
    pub check_ms: u32,
    /// One progress pixel lights per period while holding.
    pub progress_ms: u32,
    pub fail_flash_ms: u32,
    /// Successful holds needed to solve the puzzle.
    pub holds_required: usize,
}

impl Default for PoseHoldConfig {
    fn default() -> Self {
        Self {
            select: PinMap::DEFAULT.pose_select,
            tolerance_deg: 20.0,
            hold_ms: 2000,
            check_ms: 200,
            progress_ms: 250,
            fail_flash_ms: 500,
            holds_required: 3,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct MemorySequenceConfig {
    pub select: Pin,
    /// Buttons in palette order: red, yellow, blue, green.
    pub buttons: [Pin; 4],
    pub sequence_len: usize,
    pub rounds: u8,
    /// How long each color stays lit while the sequence is shown.
    pub show_ms: u32,
    /// Green/red result display before the next round.
    pub feedback_ms: u32,
    pub debounce_ms: u32,
    pub retry: RetryPolicy,
}

impl Default for MemorySequenceConfig {
    fn default() -> Self {
        let pins = PinMap::DEFAULT;
        Self {
            select: pins.memory_select,
            buttons: [pins.red_button, pins.yellow_button, pins.blue_button, pins.green_button],
            sequence_len: 6,
            rounds: 3,
            show_ms: 700,
            feedback_ms: 1000,
            debounce_ms: 50,
            retry: RetryPolicy::Regenerate,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SwitchMappingConfig {
    pub select: Pin,
    pub switches: [Pin; 5],
    /// Attempts at a covering weight set before the fixed fallback is used.
    pub max_attempts: u32,
}

impl Default for SwitchMappingConfig {
    fn default() -> Self {
        let pins = PinMap::DEFAULT;
        Self {
            select: pins.switch_select,
            switches: pins.switches,
            max_attempts: 1000,
        }
    }
}

/// Logical wiring of the box.
///
/// MCU pins are logical input slots; `hw::pins` wires slot n to port pin PFn.
#[derive(Copy, Clone, Debug)]
pub struct PinMap {
    pub start: Pin,

    pub sequence_select: Pin,
    pub pose_select: Pin,
    pub memory_select: Pin,
    pub switch_select: Pin,

    pub red_button: Pin,
    pub green_button: Pin,
    pub blue_button: Pin,
    pub yellow_button: Pin,

    pub switches: [Pin; 5],

    /// Keypad rows (driven) and columns (read) on expander 1.
    pub keypad_rows: [u8; 4],
    pub keypad_cols: [u8; 3],

    /// Keypad status lamp, active-low, on expander 1.
    pub lamp_red: u8,
    pub lamp_green: u8,
    pub lamp_blue: u8,
}

impl PinMap {
    pub const DEFAULT: PinMap = PinMap {
        start: Pin::active_low(Bank::Expander1, 8),

        sequence_select: Pin::active_low(Bank::Expander1, 15),
        pose_select: Pin::active_low(Bank::Mcu, 0),
        memory_select: Pin::active_low(Bank::Mcu, 8),
        switch_select: Pin::active_low(Bank::Mcu, 14),

        red_button: Pin::active_low(Bank::Mcu, 15),
        green_button: Pin::active_low(Bank::Mcu, 10),
        blue_button: Pin::active_low(Bank::Mcu, 11),
        yellow_button: Pin::active_low(Bank::Mcu, 12),

        switches: [
            Pin::active_high(Bank::Mcu, 3),
            Pin::active_high(Bank::Mcu, 4),
            Pin::active_high(Bank::Mcu, 5),
            Pin::active_high(Bank::Mcu, 6),
            Pin::active_high(Bank::Mcu, 7),
        ],

        keypad_rows: [0, 1, 2, 3],
        keypad_cols: [4, 5, 6],

        lamp_red: 14,
        lamp_green: 12,
        lamp_blue: 13,
    };
}

impl Default for PinMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}
