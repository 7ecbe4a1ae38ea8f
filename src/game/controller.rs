// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Top-level game loop.
//!
//! The controller owns every puzzle and the countdown, and is ticked once per poll period:
//!
//! 1. **Waiting** until the start button is pressed; then every puzzle gets a fresh `start()` and
//!    the clock begins.
//! 2. **Running**: the selected puzzle (see [`SelectMode`]) is stepped, at most one per tick.
//!    Selecting a different puzzle stops every other puzzle *before* the new one is stepped, so
//!    two puzzles are never active at once. A stopped puzzle is restarted from scratch when it is
//!    selected again.
//! 3. **Won** once every puzzle is complete, **Lost** when the clock runs out first. Both are
//!    terminal: the controller paints every light, says its line and then only keeps flushing.
//!
//! Feedback writes made during a puzzle's operations are attributed to that puzzle, and its
//! leases are dropped as soon as it stops, completes or finishes starting.

use super::countdown::Countdown;
use crate::board::Board;
use crate::config::{GameConfig, SelectMode};
use crate::control::debounce::{Debouncer, Edge};
use crate::control::feedback::Owner;
use crate::control::time::{ms, Instant};
use crate::io::{Color, Pin};
use crate::puzzles::Puzzle;

const WIN_SPEECH: &str = "Congratulations";
const LOSS_SPEECH: &str = "Boom";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Waiting,
    Running,
    Won,
    Lost,
}

pub struct GameController<P: Puzzle, const N: usize> {
    cfg: GameConfig,
    start_button: Pin,
    puzzles: [P; N],
    /// Stopped mid-attempt; must be restarted before its next step.
    needs_start: [bool; N],
    current: Option<usize>,
    phase: Phase,
    countdown: Countdown,
    start_debounce: Debouncer<1>,
    selects: Debouncer<N>,
}

impl<P: Puzzle, const N: usize> GameController<P, N> {
    pub fn new(cfg: GameConfig, start_button: Pin, puzzles: [P; N]) -> Self {
        let settle = ms(cfg.debounce_ms);
        Self {
            cfg,
            start_button,
            puzzles,
            needs_start: [false; N],
            current: None,
            phase: Phase::Waiting,
            countdown: Countdown::new(cfg.game_length_s),
            start_debounce: Debouncer::new(settle),
            selects: Debouncer::new(settle),
        }
    }

    /// One-time setup of the start button and every puzzle.
    pub fn init(&mut self, board: &mut Board<'_>) {
        board.inputs.configure_input(self.start_button, true);
        for p in self.puzzles.iter_mut() {
            let owner = Owner::Puzzle(p.id());
            board.feedback.act_as(owner);
            p.init(board, self.cfg.debug);
            board.feedback.release(owner);
        }
        board.feedback.act_as(Owner::Controller);
        board.display.show(self.cfg.game_length_s, true);
        board.feedback.flush();
        log::info!("game: {} puzzles ready, press start", N);
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the puzzle currently being played, if any.
    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[inline]
    pub fn puzzles(&self) -> &[P; N] {
        &self.puzzles
    }

    #[inline]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Advance the game by one poll period.
    pub fn tick(&mut self, now: Instant, board: &mut Board<'_>) {
        match self.phase {
            Phase::Waiting => self.wait_for_start(now, board),
            Phase::Running => self.run(now, board),
            Phase::Won | Phase::Lost => {}
        }
        board.feedback.act_as(Owner::Controller);
        board.feedback.flush();
    }

    fn wait_for_start(&mut self, now: Instant, board: &mut Board<'_>) {
        let pressed = board.inputs.is_asserted(self.start_button);
        if self.start_debounce.update(0, pressed, now) == Some(Edge::Pressed) {
            self.begin(now, board);
        }
    }

    fn begin(&mut self, now: Instant, board: &mut Board<'_>) {
        log::info!("game: started, {} s on the clock", self.cfg.game_length_s);
        for i in 0..N {
            self.start_puzzle(i, board);
        }
        self.countdown.start(now, &mut *board.display);
        self.phase = Phase::Running;
    }

    fn run(&mut self, now: Instant, board: &mut Board<'_>) {
        if self.countdown.poll(now, &mut *board.display) {
            self.lose(board);
            return;
        }

        match self.selection(now, board) {
            Some(i) => {
                self.switch_to(i, board);
                self.step_puzzle(i, now, board);
            }
            None => {
                if let Some(i) = self.current.take() {
                    self.pause_puzzle(i, board);
                }
            }
        }

        if self.puzzles.iter().all(|p| p.is_complete()) {
            self.win(board);
        }
    }

    /// Puzzle to step this tick.
    fn selection(&mut self, now: Instant, board: &mut Board<'_>) -> Option<usize> {
        let mut chosen = None;
        for (i, p) in self.puzzles.iter().enumerate() {
            let asserted = board.inputs.is_asserted(p.select());
            let edge = self.selects.update(i, asserted, now);
            if chosen.is_some() || p.is_complete() {
                continue;
            }
            let selected = match self.cfg.select_mode {
                SelectMode::Held => self.selects.is_pressed(i),
                SelectMode::Latched => edge == Some(Edge::Pressed),
            };
            if selected {
                chosen = Some(i);
            }
        }

        match self.cfg.select_mode {
            SelectMode::Held => chosen,
            SelectMode::Latched => chosen.or(self.current),
        }
    }

    fn switch_to(&mut self, i: usize, board: &mut Board<'_>) {
        if self.current == Some(i) && !self.needs_start[i] {
            return;
        }

        for j in 0..N {
            if j != i && (self.puzzles[j].is_active() || self.current == Some(j)) {
                self.stop_puzzle(j, board);
            }
        }
        if self.needs_start[i] {
            self.start_puzzle(i, board);
        }
        self.current = Some(i);
        log::info!("game: {} selected", self.puzzles[i].id().name());
    }

    fn start_puzzle(&mut self, i: usize, board: &mut Board<'_>) {
        let owner = Owner::Puzzle(self.puzzles[i].id());
        board.feedback.act_as(owner);
        self.puzzles[i].start(board);
        board.feedback.release(owner);
        board.feedback.act_as(Owner::Controller);
        self.needs_start[i] = false;
    }

    /// Select released in held mode: the attempt stays, its timed output goes quiet.
    fn pause_puzzle(&mut self, i: usize, board: &mut Board<'_>) {
        let owner = Owner::Puzzle(self.puzzles[i].id());
        board.feedback.act_as(owner);
        self.puzzles[i].pause(board);
        board.feedback.act_as(Owner::Controller);
        log::debug!("game: {} paused", self.puzzles[i].id().name());
    }

    fn stop_puzzle(&mut self, i: usize, board: &mut Board<'_>) {
        let owner = Owner::Puzzle(self.puzzles[i].id());
        board.feedback.act_as(owner);
        self.puzzles[i].stop(board);
        board.feedback.release(owner);
        board.feedback.act_as(Owner::Controller);
        if !self.puzzles[i].is_complete() {
            self.needs_start[i] = true;
        }
        if self.current == Some(i) {
            self.current = None;
        }
    }

    fn step_puzzle(&mut self, i: usize, now: Instant, board: &mut Board<'_>) {
        let owner = Owner::Puzzle(self.puzzles[i].id());
        board.feedback.act_as(owner);
        self.puzzles[i].step(now, board);
        if self.puzzles[i].is_complete() {
            board.feedback.release(owner);
            self.current = None;
            log::info!(
                "game: {} complete, {} s left",
                self.puzzles[i].id().name(),
                self.countdown.remaining()
            );
        }
        board.feedback.act_as(Owner::Controller);
    }

    fn win(&mut self, board: &mut Board<'_>) {
        self.countdown.stop();
        self.phase = Phase::Won;
        self.current = None;
        log::info!("game: won with {} s left", self.countdown.remaining());

        board.feedback.release_all();
        board.feedback.act_as(Owner::Controller);
        board.feedback.broadcast(Color::Green);
        board.feedback.say(WIN_SPEECH);
    }

    fn lose(&mut self, board: &mut Board<'_>) {
        for i in 0..N {
            if !self.puzzles[i].is_complete() {
                self.stop_puzzle(i, board);
            }
        }
        self.phase = Phase::Lost;
        self.current = None;
        log::info!("game: lost");

        board.feedback.release_all();
        board.feedback.act_as(Owner::Controller);
        board.feedback.tone_off();
        board.feedback.broadcast(Color::Red);
        board.feedback.say(LOSS_SPEECH);
    }
}
