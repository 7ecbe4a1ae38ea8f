// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Five-switch weight puzzle.
//!
//! At start every switch gets a random 16-bit weight and a random target position. The weights
//! always sum (mod 2^16) to 0xFFFF and together cover every bit, so putting all five switches in
//! their target positions is a solution. While the puzzle runs, the weights of the switches that
//! currently match their targets are summed and the sum is shown bit-for-bit on the 16-pixel ring.
//! The puzzle is solved when the sum is exactly 0xFFFF.

use super::{Lifecycle, Puzzle, PuzzleId};
use crate::board::Board;
use crate::config::SwitchMappingConfig;
use crate::control::feedback::Lights;
use crate::control::random::RandomSource;
use crate::control::time::Instant;
use crate::io::{Color, Pin};

pub const SWITCHES: usize = 5;

const SOLVED: u16 = 0xFFFF;

/// Used when rejection sampling gives up.
const FALLBACK_WEIGHTS: [u16; SWITCHES] = [0x000F, 0x00F0, 0x0F00, 0x7000, 0x8000];

/// Weights and target positions for one game.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Mapping {
    pub weights: [u16; SWITCHES],
    /// Target raw level per switch (`true` = high).
    pub targets: [bool; SWITCHES],
}

impl Mapping {
    /// Wrapping sum of the weights whose switch level matches its target.
    pub fn score(&self, levels: &[bool; SWITCHES]) -> u16 {
        self.weights
            .iter()
            .zip(self.targets.iter().zip(levels))
            .filter(|(_, (target, level))| target == level)
            .fold(0u16, |sum, (w, _)| sum.wrapping_add(*w))
    }

    #[inline]
    pub fn covers_all_bits(&self) -> bool {
        self.weights.iter().fold(0, |acc, w| acc | w) == SOLVED
    }

    #[inline]
    pub fn is_solved_by(&self, levels: &[bool; SWITCHES]) -> bool {
        self.score(levels) == SOLVED
    }
}

/// Draw a mapping whose weights cover every bit and which `current` does not already solve.
///
/// Gives up after `max_attempts` and falls back to fixed weights with every target flipped from
/// the current position.
pub fn generate_mapping(
    rng: &mut dyn RandomSource,
    max_attempts: u32,
    current: &[bool; SWITCHES],
) -> Mapping {
    for _ in 0..max_attempts {
        let mut weights = [0u16; SWITCHES];
        let mut sum = 0u16;
        for w in weights.iter_mut().take(SWITCHES - 1) {
            *w = rng.next_u16();
            sum = sum.wrapping_add(*w);
        }
        weights[SWITCHES - 1] = SOLVED.wrapping_sub(sum);

        let mut targets = [false; SWITCHES];
        for t in targets.iter_mut() {
            *t = rng.next_bool();
        }

        let mapping = Mapping { weights, targets };
        if mapping.covers_all_bits() && !mapping.is_solved_by(current) {
            return mapping;
        }
    }

    log::warn!("switch: no mapping after {} attempts, using fallback", max_attempts);
    let mut targets = [false; SWITCHES];
    for (t, level) in targets.iter_mut().zip(current) {
        *t = !level;
    }
    Mapping {
        weights: FALLBACK_WEIGHTS,
        targets,
    }
}

pub struct SwitchMapping {
    cfg: SwitchMappingConfig,
    life: Lifecycle,
    mapping: Mapping,
    score: u16,
    debug: bool,
}

impl SwitchMapping {
    pub fn new(cfg: SwitchMappingConfig) -> Self {
        Self {
            cfg,
            life: Lifecycle::default(),
            mapping: Mapping {
                weights: FALLBACK_WEIGHTS,
                targets: [false; SWITCHES],
            },
            score: 0,
            debug: false,
        }
    }

    #[inline]
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Weight sum shown on the ring after the last step.
    #[inline]
    pub fn score(&self) -> u16 {
        self.score
    }

    fn levels(&self, board: &mut Board<'_>) -> [bool; SWITCHES] {
        let mut levels = [false; SWITCHES];
        for (level, &pin) in levels.iter_mut().zip(&self.cfg.switches) {
            *level = board.inputs.read(pin);
        }
        levels
    }

    fn show(&self, board: &mut Board<'_>) {
        for bit in 0..16 {
            if self.score & (1 << bit) != 0 {
                board.feedback.set(Lights::Ring, bit, Color::Red);
            } else {
                board.feedback.clear(Lights::Ring, bit);
            }
        }
    }
}

impl Puzzle for SwitchMapping {
    fn id(&self) -> PuzzleId {
        PuzzleId::SwitchMapping
    }

    fn select(&self) -> Pin {
        self.cfg.select
    }

    fn init(&mut self, board: &mut Board<'_>, debug: bool) {
        self.debug = debug;
        for pin in self.cfg.switches {
            board.inputs.configure_input(pin, false);
        }
        board.inputs.configure_input(self.cfg.select, true);
        board.feedback.clear_all(Lights::Ring);
    }

    fn start(&mut self, board: &mut Board<'_>) {
        self.life.reset();
        let current = self.levels(board);
        self.mapping = generate_mapping(&mut *board.rng, self.cfg.max_attempts, &current);
        self.score = self.mapping.score(&current);
        board.feedback.clear_all(Lights::Ring);
        if self.debug {
            log::debug!(
                "switch: weights {:04x?} targets {:?}",
                self.mapping.weights,
                self.mapping.targets
            );
        }
        log::debug!("switch: started");
    }

    fn step(&mut self, _now: Instant, board: &mut Board<'_>) {
        if !self.life.enter() {
            return;
        }

        let levels = self.levels(board);
        let score = self.mapping.score(&levels);
        if self.debug && score != self.score {
            log::debug!("switch: levels {:?} score {:04x}", levels, score);
        }
        self.score = score;

        if score == SOLVED {
            log::info!("switch: solved");
            self.life.finish();
            self.stop(board);
        } else {
            self.show(board);
        }
    }

    fn stop(&mut self, board: &mut Board<'_>) {
        if self.life.disarm() {
            log::debug!("switch: stopped");
        }
        if self.life.is_complete() {
            board.feedback.set_all(Lights::Ring, Color::Green);
        } else {
            board.feedback.clear_all(Lights::Ring);
        }
    }

    fn is_complete(&self) -> bool {
        self.life.is_complete()
    }

    fn is_active(&self) -> bool {
        self.life.is_active()
    }
}
