// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Game
//!
//! Session-level logic: which puzzle runs, how long the players have left, and what happens when
//! they win or run out of time.
//!
//! ## Modules
//!
//! - [`controller`] - The [`GameController`] that multiplexes the puzzles.
//! - [`countdown`] - The blinking MM:SS game clock.

pub mod controller;
pub mod countdown;

pub use controller::{GameController, Phase};
pub use countdown::Countdown;
