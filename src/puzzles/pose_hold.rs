// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Accelerometer pose puzzle.
//!
//! The box speaks a target orientation ("x equals to 45. y equals to 0.") and the player has to
//! tilt it there and hold it. Within tolerance on both axes the hold starts; a 200 ms re-check
//! fails the hold the moment the pose drifts out, and the player goes back to seeking the same
//! target with no credit kept. Three clean holds, each on a different target, solve the puzzle.
//!
//! The LED stick shows hold progress (one green pixel per 250 ms), flashes red on a failed hold and
//! turns solid green once solved.
//!
//! ```text
//! Idle -> Announce -> Seeking -> Holding -> Success -> Announce ... -> Complete
//!                        ^          |
//!                        +- Failed -+
//! ```

use core::fmt::Write;

use heapless::String;
use micromath::F32Ext;

use super::{Lifecycle, Puzzle, PuzzleId};
use crate::board::Board;
use crate::config::PoseHoldConfig;
use crate::control::feedback::Lights;
use crate::control::time::{elapsed, ms, Instant};
use crate::control::timer::{TimerHandle, TimerMode, TimerService};
use crate::io::{Color, Pin, Pose};

/// Target orientations, played in order.
pub const TARGETS: [(i16, i16); 5] = [(45, 0), (0, 45), (-45, 0), (0, -45), (30, -30)];

const CHECK: TimerHandle = TimerHandle(0);
const PROGRESS: TimerHandle = TimerHandle(1);
const FLASH: TimerHandle = TimerHandle(2);

const DEBUG_PRINT_MS: u32 = 1000;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    Idle,
    Announce,
    Seeking,
    Holding { since: Instant },
    /// A hold just succeeded.
    Success,
    /// A hold was just lost.
    Failed,
    Complete,
}

/// `|actual - target| <= tolerance` on both axes.
pub fn within_tolerance(pose: Pose, target: (i16, i16), tolerance: f32) -> bool {
    (pose.pitch - f32::from(target.0)).abs() <= tolerance
        && (pose.roll - f32::from(target.1)).abs() <= tolerance
}

pub struct PoseHold {
    cfg: PoseHoldConfig,
    life: Lifecycle,
    state: State,
    /// Index into [`TARGETS`].
    target: usize,
    holds_done: usize,
    progress: usize,
    timers: TimerService<3>,
    sensing: bool,
    last_print: Option<Instant>,
    debug: bool,
}

impl PoseHold {
    pub fn new(cfg: PoseHoldConfig) -> Self {
        Self {
            cfg,
            life: Lifecycle::default(),
            state: State::Idle,
            target: 0,
            holds_done: 0,
            progress: 0,
            timers: TimerService::new([TimerMode::Repeating, TimerMode::Repeating, TimerMode::OneShot]),
            sensing: false,
            last_print: None,
            debug: false,
        }
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn holds_done(&self) -> usize {
        self.holds_done
    }

    pub fn current_target(&self) -> (i16, i16) {
        TARGETS[self.target % TARGETS.len()]
    }

    fn holds_required(&self) -> usize {
        self.cfg.holds_required.min(TARGETS.len())
    }

    fn announce(&mut self, board: &mut Board<'_>) {
        let (pitch, roll) = self.current_target();
        let mut text: String<64> = String::new();
        let _ = write!(text, "x equals to {}. y equals to {}.", pitch, roll);
        board.feedback.say(&text);
        log::debug!(
            "pose: target {}/{} p={} r={}",
            self.holds_done + 1,
            self.holds_required(),
            pitch,
            roll
        );
    }

    fn print_live(&mut self, now: Instant, pose: Pose) {
        if !self.debug {
            return;
        }
        let due = self
            .last_print
            .map_or(true, |t| elapsed(now, t) >= ms(DEBUG_PRINT_MS));
        if due {
            log::debug!("pose: live p={:.1} r={:.1}", pose.pitch, pose.roll);
            self.last_print = Some(now);
        }
    }

    fn begin_hold(&mut self, now: Instant, board: &mut Board<'_>) {
        if self.timers.is_running(FLASH) {
            self.timers.stop(FLASH);
            board.feedback.clear_all(Lights::Stick);
        }
        self.progress = 0;
        self.timers.start(CHECK, ms(self.cfg.check_ms), now);
        self.timers.start(PROGRESS, ms(self.cfg.progress_ms), now);
        self.state = State::Holding { since: now };
    }

    fn end_hold(&mut self) {
        self.timers.stop(CHECK);
        self.timers.stop(PROGRESS);
        self.progress = 0;
    }

    fn fail_hold(&mut self, now: Instant, board: &mut Board<'_>) {
        log::debug!("pose: hold lost");
        self.end_hold();
        board.feedback.set_all(Lights::Stick, Color::Red);
        self.timers.start(FLASH, ms(self.cfg.fail_flash_ms), now);
        self.state = State::Failed;
    }

    fn on_timer(&mut self, handle: TimerHandle, now: Instant, board: &mut Board<'_>) {
        match handle {
            CHECK => {
                if let State::Holding { .. } = self.state {
                    let target = self.current_target();
                    let held = board
                        .tilt
                        .pose()
                        .map_or(false, |pose| within_tolerance(pose, target, self.cfg.tolerance_deg));
                    if !held {
                        self.fail_hold(now, board);
                    }
                }
            }
            PROGRESS => {
                if self.progress < board.feedback.len(Lights::Stick) {
                    board.feedback.set(Lights::Stick, self.progress, Color::Green);
                    self.progress += 1;
                }
            }
            FLASH => board.feedback.clear_all(Lights::Stick),
            _ => {}
        }
    }
}

impl Puzzle for PoseHold {
    fn id(&self) -> PuzzleId {
        PuzzleId::PoseHold
    }

    fn select(&self) -> Pin {
        self.cfg.select
    }

    fn init(&mut self, board: &mut Board<'_>, debug: bool) {
        self.debug = debug;
        board.inputs.configure_input(self.cfg.select, true);
        board.feedback.clear_all(Lights::Stick);
    }

    fn start(&mut self, board: &mut Board<'_>) {
        self.life.reset();
        self.state = State::Idle;
        self.target = 0;
        self.holds_done = 0;
        self.progress = 0;
        self.timers.stop_all();
        board.feedback.clear_all(Lights::Stick);
        log::debug!("pose: started");
    }

    fn step(&mut self, now: Instant, board: &mut Board<'_>) {
        if !self.life.enter() {
            return;
        }
        if !self.sensing {
            board.tilt.start();
            self.sensing = true;
        }

        for expiry in self.timers.poll(now) {
            if self.timers.accept(&expiry) {
                self.on_timer(expiry.handle, now, board);
            }
        }

        match self.state {
            State::Idle | State::Announce => {
                self.announce(board);
                self.state = State::Seeking;
            }
            State::Seeking => {
                if let Some(pose) = board.tilt.pose() {
                    self.print_live(now, pose);
                    if within_tolerance(pose, self.current_target(), self.cfg.tolerance_deg) {
                        log::debug!("pose: holding");
                        self.begin_hold(now, board);
                    }
                }
            }
            State::Holding { since } => {
                if elapsed(now, since) >= ms(self.cfg.hold_ms) {
                    self.end_hold();
                    board.feedback.clear_all(Lights::Stick);
                    board.feedback.say("Good.");
                    self.holds_done += 1;
                    self.target += 1;
                    self.state = State::Success;
                }
            }
            State::Success => {
                if self.holds_done >= self.holds_required() {
                    log::info!("pose: solved");
                    board.feedback.say("Accelerometer puzzle complete. Well done!");
                    self.state = State::Complete;
                    self.life.finish();
                    self.stop(board);
                } else {
                    self.state = State::Announce;
                }
            }
            State::Failed => self.state = State::Seeking,
            State::Complete => {}
        }
    }

    fn pause(&mut self, board: &mut Board<'_>) {
        if !self.life.is_active() {
            return;
        }
        // unobserved time never counts toward a hold
        if let State::Holding { .. } | State::Failed = self.state {
            log::debug!("pose: paused, hold dropped");
            self.state = State::Seeking;
        }
        self.end_hold();
        self.timers.stop(FLASH);
        board.feedback.clear_all(Lights::Stick);
    }

    fn stop(&mut self, board: &mut Board<'_>) {
        if self.life.disarm() {
            log::debug!("pose: stopped");
        }
        self.timers.stop_all();
        self.progress = 0;
        if self.sensing {
            board.tilt.stop();
            self.sensing = false;
        }
        if self.life.is_complete() {
            board.feedback.set_all(Lights::Stick, Color::Green);
        } else {
            board.feedback.clear_all(Lights::Stick);
        }
    }

    fn is_complete(&self) -> bool {
        self.life.is_complete()
    }

    fn is_active(&self) -> bool {
        self.life.is_active()
    }
}
