// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Puzzles
//!
//! Every puzzle in the box is a small state machine behind the [`Puzzle`] trait. The game
//! controller only ever talks to them through that trait, holding the four concrete machines in
//! an [`AnyPuzzle`] array.
//!
//! ## Lifecycle
//!
//! | Call | Effect |
//! | ---- | ------ |
//! | `init` | One-time pin setup. I/O faults are logged by the drivers, never returned. |
//! | `start` | Reset to the initial state, generate a fresh solution, clear feedback. Does not activate. |
//! | `step` | Advance by one controller tick. The first step after `start` activates the puzzle. |
//! | `pause` | The controller stopped stepping it for now. Sound and timed feedback go quiet, and any partial timed progress is dropped. |
//! | `stop` | Cancel timers, clear feedback (a solved puzzle keeps its success display). Idempotent. |
//!
//! A `step` after `stop` without a fresh `start` does nothing. A puzzle that solves itself stops
//! itself, so `is_complete()` implies `!is_active()`.
//!
//! ## Modules
//!
//! - [`sequence_match`] - Keypad code announced in Morse on the buzzer.
//! - [`pose_hold`] - Hold the box at spoken pitch/roll targets.
//! - [`memory_sequence`] - Repeat a color sequence on four buttons.
//! - [`switch_mapping`] - Find the switch positions that light the whole ring.
//! - [`morse`] - Non-blocking Morse playback used by the keypad puzzle.

pub mod memory_sequence;
pub mod morse;
pub mod pose_hold;
pub mod sequence_match;
pub mod switch_mapping;

pub use memory_sequence::MemorySequence;
pub use pose_hold::PoseHold;
pub use sequence_match::SequenceMatch;
pub use switch_mapping::SwitchMapping;

use crate::board::Board;
use crate::control::time::Instant;
use crate::io::Pin;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PuzzleId {
    SequenceMatch,
    PoseHold,
    MemorySequence,
    SwitchMapping,
}

impl PuzzleId {
    pub const fn name(self) -> &'static str {
        match self {
            PuzzleId::SequenceMatch => "keypad",
            PuzzleId::PoseHold => "pose",
            PuzzleId::MemorySequence => "memory",
            PuzzleId::SwitchMapping => "switch",
        }
    }
}

/// Uniform lifecycle shared by every puzzle.
pub trait Puzzle {
    fn id(&self) -> PuzzleId;

    /// Input that selects this puzzle.
    fn select(&self) -> Pin;

    /// One-time hardware setup.
    fn init(&mut self, board: &mut Board<'_>, debug: bool);

    fn start(&mut self, board: &mut Board<'_>);

    /// Advance by one tick (the "continue" operation).
    fn step(&mut self, now: Instant, board: &mut Board<'_>);

    /// No more steps until it is selected again. The attempt survives, timed progress does not.
    fn pause(&mut self, _board: &mut Board<'_>) {}

    fn stop(&mut self, board: &mut Board<'_>);

    fn is_complete(&self) -> bool;

    fn is_active(&self) -> bool;
}

/// Flags every puzzle tracks alongside its own FSM state.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Lifecycle {
    /// `start` ran and no `stop` has followed it.
    armed: bool,
    active: bool,
    complete: bool,
}

impl Lifecycle {
    /// New attempt.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            armed: true,
            active: false,
            complete: false,
        };
    }

    /// Called at the top of `step`; returns false if the puzzle must not advance.
    pub(crate) fn enter(&mut self) -> bool {
        if self.armed {
            self.active = true;
        }
        self.armed
    }

    /// Returns whether the puzzle was armed.
    pub(crate) fn disarm(&mut self) -> bool {
        let was_armed = self.armed;
        self.armed = false;
        self.active = false;
        was_armed
    }

    /// Mark solved; the puzzle is disarmed at the same time.
    pub(crate) fn finish(&mut self) {
        self.complete = true;
        self.disarm();
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub(crate) fn is_complete(&self) -> bool {
        self.complete
    }
}

/// The four puzzles as one type, so the controller can keep them in an array.
pub enum AnyPuzzle {
    SequenceMatch(SequenceMatch),
    PoseHold(PoseHold),
    MemorySequence(MemorySequence),
    SwitchMapping(SwitchMapping),
}

macro_rules! dispatch {
    ($self:ident, $p:ident => $body:expr) => {
        match $self {
            AnyPuzzle::SequenceMatch($p) => $body,
            AnyPuzzle::PoseHold($p) => $body,
            AnyPuzzle::MemorySequence($p) => $body,
            AnyPuzzle::SwitchMapping($p) => $body,
        }
    };
}

impl Puzzle for AnyPuzzle {
    fn id(&self) -> PuzzleId {
        dispatch!(self, p => p.id())
    }

    fn select(&self) -> Pin {
        dispatch!(self, p => p.select())
    }

    fn init(&mut self, board: &mut Board<'_>, debug: bool) {
        dispatch!(self, p => p.init(board, debug))
    }

    fn start(&mut self, board: &mut Board<'_>) {
        dispatch!(self, p => p.start(board))
    }

    fn step(&mut self, now: Instant, board: &mut Board<'_>) {
        dispatch!(self, p => p.step(now, board))
    }

    fn pause(&mut self, board: &mut Board<'_>) {
        dispatch!(self, p => p.pause(board))
    }

    fn stop(&mut self, board: &mut Board<'_>) {
        dispatch!(self, p => p.stop(board))
    }

    fn is_complete(&self) -> bool {
        dispatch!(self, p => p.is_complete())
    }

    fn is_active(&self) -> bool {
        dispatch!(self, p => p.is_active())
    }
}

impl From<SequenceMatch> for AnyPuzzle {
    fn from(p: SequenceMatch) -> Self {
        AnyPuzzle::SequenceMatch(p)
    }
}

impl From<PoseHold> for AnyPuzzle {
    fn from(p: PoseHold) -> Self {
        AnyPuzzle::PoseHold(p)
    }
}

impl From<MemorySequence> for AnyPuzzle {
    fn from(p: MemorySequence) -> Self {
        AnyPuzzle::MemorySequence(p)
    }
}

impl From<SwitchMapping> for AnyPuzzle {
    fn from(p: SwitchMapping) -> Self {
        AnyPuzzle::SwitchMapping(p)
    }
}
