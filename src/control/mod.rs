// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Primitives
//!
//! Non-blocking building blocks shared by the puzzles and the game controller. Nothing in here
//! sleeps or busy-waits: every primitive is driven by the poll loop passing in the current
//! [`time::Instant`].
//!
//! ## Modules
//!
//! - [`time`] - Millisecond instants and durations used everywhere.
//! - [`timer`] - Software one-shot and repeating timers with stale-expiry protection.
//! - [`debounce`] - Edge detection for buttons and keys.
//! - [`random`] - Seedable random source for puzzle solutions.
//! - [`feedback`] - Leased access to the shared lights, speech and buzzer.

pub mod debounce;
pub mod feedback;
pub mod random;
pub mod time;
pub mod timer;

pub use debounce::{Debouncer, Edge};
pub use feedback::{FeedbackHub, Lights, Owner, Sinks};
pub use random::{RandomSource, SeededRandom};
pub use time::{Duration, Instant};
pub use timer::{TimerHandle, TimerMode, TimerService};
