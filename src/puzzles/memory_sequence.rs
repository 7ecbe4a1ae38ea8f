// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Color memory puzzle ("Simon").
//!
//! Each round a random sequence of colors is played back on the outer pixels of the jewel, one
//! color per `show_ms`. The player then repeats it on the four colored buttons; every press is
//! echoed on the center pixel. A full-length answer is checked element by element:
//!
//! - correct: the center flashes green and the next round begins (three rounds solve it);
//! - wrong anywhere: the center flashes red and the round restarts, with a fresh sequence or the
//!   same one depending on [`RetryPolicy`].
//!
//! Button presses count on the released → pressed edge only, and only while the puzzle is
//! waiting for input.

use heapless::Vec;

use super::{Lifecycle, Puzzle, PuzzleId};
use crate::board::Board;
use crate::config::{MemorySequenceConfig, RetryPolicy};
use crate::control::debounce::{Debouncer, Edge};
use crate::control::feedback::Lights;
use crate::control::time::{ms, Instant};
use crate::control::timer::{TimerHandle, TimerMode, TimerService};
use crate::io::{Color, Pin};

/// Colors in button order.
pub const PALETTE: [Color; 4] = [Color::Red, Color::Yellow, Color::Blue, Color::Green];

pub const MAX_SEQUENCE_LEN: usize = 16;

const CENTER: usize = 0;
const OUTER_START: usize = 1;
const OUTER_LEN: usize = 6;

const SHOW: TimerHandle = TimerHandle(0);
const FEEDBACK: TimerHandle = TimerHandle(1);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    Idle,
    StartRound,
    ShowInstruction,
    WaitInput,
    CheckSequence,
    RoundSuccess,
    RoundFailure,
    GameOverSuccess,
}

pub struct MemorySequence {
    cfg: MemorySequenceConfig,
    life: Lifecycle,
    state: State,
    round: u8,
    sequence: Vec<u8, MAX_SEQUENCE_LEN>,
    input: Vec<u8, MAX_SEQUENCE_LEN>,
    /// Generate a new sequence when the next round starts.
    fresh: bool,
    shown: usize,
    buttons: Debouncer<4>,
    timers: TimerService<2>,
    debug: bool,
}

impl MemorySequence {
    pub fn new(cfg: MemorySequenceConfig) -> Self {
        Self {
            cfg,
            life: Lifecycle::default(),
            state: State::Idle,
            round: 0,
            sequence: Vec::new(),
            input: Vec::new(),
            fresh: true,
            shown: 0,
            buttons: Debouncer::new(ms(cfg.debounce_ms)),
            timers: TimerService::new([TimerMode::OneShot, TimerMode::OneShot]),
            debug: false,
        }
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn round(&self) -> u8 {
        self.round
    }

    /// Current target, as indices into [`PALETTE`].
    #[inline]
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    fn sequence_len(&self) -> usize {
        self.cfg.sequence_len.clamp(1, MAX_SEQUENCE_LEN)
    }

    fn generate(&mut self, board: &mut Board<'_>) {
        self.sequence.clear();
        for _ in 0..self.sequence_len() {
            let _ = self.sequence.push(board.rng.next_below(PALETTE.len() as u16));
        }
        if self.debug {
            log::debug!("memory: round {} sequence {:?}", self.round + 1, self.sequence.as_slice());
        }
    }

    fn start_round(&mut self, now: Instant, board: &mut Board<'_>) {
        if self.fresh || self.sequence.is_empty() {
            self.generate(board);
            self.fresh = false;
        }
        self.input.clear();
        self.shown = 0;
        board.feedback.clear_all(Lights::Jewel);
        // half a period of darkness before the first color
        self.timers.start(SHOW, ms(self.cfg.show_ms / 2), now);
        self.state = State::ShowInstruction;
    }

    fn show_next(&mut self, now: Instant, board: &mut Board<'_>) {
        match self.sequence.get(self.shown) {
            Some(&color) => {
                let pixel = OUTER_START + self.shown % OUTER_LEN;
                board.feedback.set(Lights::Jewel, pixel, PALETTE[color as usize]);
                self.shown += 1;
                self.timers.start(SHOW, ms(self.cfg.show_ms), now);
            }
            None => {
                board.feedback.clear_all(Lights::Jewel);
                self.state = State::WaitInput;
                log::debug!("memory: waiting for input");
            }
        }
    }

    fn poll_buttons(&mut self, now: Instant, board: &mut Board<'_>) {
        let buttons = self.cfg.buttons;
        for (i, &pin) in buttons.iter().enumerate() {
            let pressed = board.inputs.is_asserted(pin);
            let edge = self.buttons.update(i, pressed, now);
            if edge == Some(Edge::Pressed) && self.state == State::WaitInput {
                self.record(i as u8, board);
            }
        }
    }

    fn record(&mut self, color: u8, board: &mut Board<'_>) {
        if self.input.push(color).is_err() {
            return;
        }
        board.feedback.set(Lights::Jewel, CENTER, PALETTE[color as usize]);
        if self.input.len() >= self.sequence.len() {
            self.state = State::CheckSequence;
        }
    }

    fn check(&mut self, now: Instant, board: &mut Board<'_>) {
        let correct = self.input == self.sequence;
        board.feedback.clear_all(Lights::Jewel);
        board.feedback.set(
            Lights::Jewel,
            CENTER,
            if correct { Color::Green } else { Color::Red },
        );
        self.timers.start(FEEDBACK, ms(self.cfg.feedback_ms), now);

        if correct {
            log::debug!("memory: round {} correct", self.round + 1);
            self.state = State::RoundSuccess;
        } else {
            log::debug!("memory: round {} wrong", self.round + 1);
            self.state = State::RoundFailure;
        }
    }

    fn feedback_done(&mut self, board: &mut Board<'_>) {
        board.feedback.clear(Lights::Jewel, CENTER);
        match self.state {
            State::RoundSuccess => {
                self.round += 1;
                self.fresh = true;
                if self.round >= self.cfg.rounds {
                    log::info!("memory: solved");
                    self.state = State::GameOverSuccess;
                    self.life.finish();
                    self.stop(board);
                } else {
                    self.state = State::StartRound;
                }
            }
            State::RoundFailure => {
                self.fresh = self.cfg.retry == RetryPolicy::Regenerate;
                self.state = State::StartRound;
            }
            _ => {}
        }
    }
}

impl Puzzle for MemorySequence {
    fn id(&self) -> PuzzleId {
        PuzzleId::MemorySequence
    }

    fn select(&self) -> Pin {
        self.cfg.select
    }

    fn init(&mut self, board: &mut Board<'_>, debug: bool) {
        self.debug = debug;
        for pin in self.cfg.buttons {
            board.inputs.configure_input(pin, true);
        }
        board.inputs.configure_input(self.cfg.select, true);
        board.feedback.clear_all(Lights::Jewel);
    }

    fn start(&mut self, board: &mut Board<'_>) {
        self.life.reset();
        self.state = State::Idle;
        self.round = 0;
        self.fresh = true;
        self.sequence.clear();
        self.input.clear();
        self.buttons.reset();
        self.timers.stop_all();
        board.feedback.clear_all(Lights::Jewel);
        log::debug!("memory: started");
    }

    fn step(&mut self, now: Instant, board: &mut Board<'_>) {
        if !self.life.enter() {
            return;
        }

        self.poll_buttons(now, board);

        for expiry in self.timers.poll(now) {
            if !self.timers.accept(&expiry) {
                continue;
            }
            match expiry.handle {
                SHOW => self.show_next(now, board),
                FEEDBACK => self.feedback_done(board),
                _ => {}
            }
        }

        match self.state {
            State::Idle => self.state = State::StartRound,
            State::StartRound => self.start_round(now, board),
            State::CheckSequence => self.check(now, board),
            State::ShowInstruction
            | State::WaitInput
            | State::RoundSuccess
            | State::RoundFailure
            | State::GameOverSuccess => {}
        }
    }

    fn stop(&mut self, board: &mut Board<'_>) {
        if self.life.disarm() {
            log::debug!("memory: stopped");
        }
        self.timers.stop_all();
        if self.life.is_complete() {
            board.feedback.set_all(Lights::Jewel, Color::Green);
        } else {
            board.feedback.clear_all(Lights::Jewel);
        }
    }

    fn is_complete(&self) -> bool {
        self.life.is_complete()
    }

    fn is_active(&self) -> bool {
        self.life.is_active()
    }
}
