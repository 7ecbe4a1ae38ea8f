// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Puzzle Box Firmware
//!
//! This crate contains the firmware for an escape-room puzzle box: four physical puzzles and a
//! game controller that runs them against a five-minute countdown. It is written in Rust,
//! targeting an STM32F767 MCU.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Game constants, per-puzzle settings and the logical pin map |
//! | [`io`] | Traits for every outside-world collaborator (inputs, lights, speech, ...) |
//! | [`control`] | Non-blocking primitives: time, timers, debouncing, randomness, feedback leases |
//! | [`board`] | The bundle of collaborators lent to a puzzle per call |
//! | [`puzzles`] | The four puzzle state machines |
//! | [`game`] | Game controller and countdown |
//! | [`drivers`] | Device drivers (SX1509, LSM6DSO, DFR0760, WS2812, ...) |
//! | `hw` | MCU-level wrappers (bare-metal target only) |
//!
//! Everything except `hw` builds on the host, so the unit tests run with a plain `cargo test`.
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo fw
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod config;
pub mod control;
pub mod drivers;
pub mod game;
pub mod io;
pub mod puzzles;

#[cfg(target_os = "none")]
pub mod hw;

#[cfg(test)]
mod fakes;
