// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Keypad code puzzle.
//!
//! The solution is a random digit string, announced in Morse on the buzzer. The player types it on
//! the 4×3 keypad. Input is judged on every keystroke, so a wrong digit is caught at the position
//! it is typed: the lamp turns red and the input is thrown away.
//!
//! Keys:
//! - `0`-`9` append a digit
//! - `*` replays the Morse cue and clears the input
//! - `#` clears the input
//!
//! Lamp: white while armed, red after a wrong code, green once solved.

use heapless::String;

use super::morse::MorsePlayer;
use super::{Lifecycle, Puzzle, PuzzleId};
use crate::board::Board;
use crate::config::SequenceMatchConfig;
use crate::control::debounce::{Debouncer, Edge};
use crate::control::feedback::Lights;
use crate::control::time::{ms, Instant};
use crate::io::{Color, Pin};

/// Longest code (and longest input record).
pub const MAX_CODE_LEN: usize = 10;

/// Keys in scan order.
const KEYS: [char; 12] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '*', '0', '#'];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    Idle,
    /// Waiting for keys.
    Armed,
    /// A wrong code was just rejected.
    Failed,
    Complete,
}

/// Outcome of comparing the input so far with the solution.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Judgment {
    /// Correct so far, more digits needed.
    Incomplete,
    Mismatch,
    Match,
}

/// Prefix-wise comparison of `input` against `solution`.
pub fn check(input: &str, solution: &str) -> Judgment {
    if !solution.starts_with(input) {
        Judgment::Mismatch
    } else if input.len() == solution.len() {
        Judgment::Match
    } else {
        Judgment::Incomplete
    }
}

pub struct SequenceMatch {
    cfg: SequenceMatchConfig,
    life: Lifecycle,
    state: State,
    solution: String<MAX_CODE_LEN>,
    input: String<MAX_CODE_LEN>,
    keys: Debouncer<12>,
    morse: MorsePlayer,
    lamp: Color,
    debug: bool,
}

impl SequenceMatch {
    pub fn new(cfg: SequenceMatchConfig) -> Self {
        Self {
            cfg,
            life: Lifecycle::default(),
            state: State::Idle,
            solution: String::new(),
            input: String::new(),
            keys: Debouncer::new(ms(cfg.debounce_ms)),
            morse: MorsePlayer::new(ms(cfg.morse_unit_ms), cfg.morse_tone_hz),
            lamp: Color::Black,
            debug: false,
        }
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn solution(&self) -> &str {
        &self.solution
    }

    /// Digits typed since the last clear.
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    fn set_lamp(&mut self, board: &mut Board<'_>, color: Color) {
        self.lamp = color;
        board.feedback.set_all(Lights::Lamp, color);
    }

    fn generate(&mut self, board: &mut Board<'_>) {
        self.solution.clear();
        let len = self.cfg.code_len.min(MAX_CODE_LEN);
        for _ in 0..len {
            let digit = board.rng.next_below(10);
            let _ = self.solution.push(char::from(b'0' + digit));
        }
        if self.debug {
            log::debug!("keypad: solution {}", self.solution);
        }
    }

    fn cue(&mut self, now: Instant, board: &mut Board<'_>) {
        self.morse.play(&self.solution, now, &mut board.feedback);
    }

    /// Next debounced key press, if any.
    fn poll_keys(&mut self, now: Instant, board: &mut Board<'_>) -> Option<char> {
        let held = board.keypad.held_key();
        let mut pressed = None;
        for (i, &key) in KEYS.iter().enumerate() {
            if self.keys.update(i, held == Some(key), now) == Some(Edge::Pressed) {
                pressed = Some(key);
            }
        }
        pressed
    }

    fn on_key(&mut self, key: char, now: Instant, board: &mut Board<'_>) {
        if self.lamp == Color::Red {
            self.set_lamp(board, Color::White);
        }

        match key {
            '*' => {
                log::debug!("keypad: replay");
                self.input.clear();
                self.cue(now, board);
            }
            '#' => {
                self.input.clear();
            }
            digit => {
                if self.input.push(digit).is_err() {
                    self.input.clear();
                    return;
                }
                self.judge(board);
            }
        }
    }

    fn judge(&mut self, board: &mut Board<'_>) {
        match check(&self.input, &self.solution) {
            Judgment::Incomplete => {}
            Judgment::Mismatch => {
                log::debug!("keypad: wrong code {}", self.input);
                self.input.clear();
                self.set_lamp(board, Color::Red);
                self.state = State::Failed;
            }
            Judgment::Match => {
                log::info!("keypad: solved");
                self.morse.stop(&mut board.feedback);
                board.feedback.tone_off();
                self.set_lamp(board, Color::Green);
                self.state = State::Complete;
                self.life.finish();
            }
        }
    }
}

impl Puzzle for SequenceMatch {
    fn id(&self) -> PuzzleId {
        PuzzleId::SequenceMatch
    }

    fn select(&self) -> Pin {
        self.cfg.select
    }

    fn init(&mut self, board: &mut Board<'_>, debug: bool) {
        self.debug = debug;
        board.inputs.configure_input(self.cfg.select, true);
    }

    fn start(&mut self, board: &mut Board<'_>) {
        self.life.reset();
        self.state = State::Idle;
        self.input.clear();
        self.keys.reset();
        self.morse.stop(&mut board.feedback);
        self.generate(board);
        self.set_lamp(board, Color::Black);
        log::debug!("keypad: started");
    }

    fn step(&mut self, now: Instant, board: &mut Board<'_>) {
        if !self.life.enter() {
            return;
        }

        self.morse.poll(now, &mut board.feedback);
        let key = self.poll_keys(now, board);

        match self.state {
            State::Idle => {
                self.cue(now, board);
                self.set_lamp(board, Color::White);
                self.state = State::Armed;
            }
            State::Failed => self.state = State::Armed,
            State::Armed | State::Complete => {}
        }

        if self.state == State::Armed {
            if let Some(key) = key {
                self.on_key(key, now, board);
            }
        }
    }

    fn pause(&mut self, board: &mut Board<'_>) {
        if self.morse.is_playing() {
            log::debug!("keypad: paused, cue cut short");
        }
        self.morse.stop(&mut board.feedback);
    }

    fn stop(&mut self, board: &mut Board<'_>) {
        if self.life.disarm() {
            log::debug!("keypad: stopped");
        }
        self.morse.stop(&mut board.feedback);
        if !self.life.is_complete() {
            self.input.clear();
            self.set_lamp(board, Color::Black);
        }
    }

    fn is_complete(&self) -> bool {
        self.life.is_complete()
    }

    fn is_active(&self) -> bool {
        self.life.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::time::at;
    use crate::fakes::Rig;

    fn puzzle() -> SequenceMatch {
        SequenceMatch::new(SequenceMatchConfig {
            debounce_ms: 0,
            ..Default::default()
        })
    }

    /// Press and release `key`, one tick each.
    fn tap(p: &mut SequenceMatch, rig: &Rig, board: &mut Board<'_>, key: char, t: &mut u32) {
        rig.keypad.hold(key);
        p.step(at(*t), board);
        *t += 20;
        rig.keypad.release();
        p.step(at(*t), board);
        *t += 20;
    }

    #[test]
    fn judgment_is_prefix_wise() {
        assert_eq!(check("", "1234"), Judgment::Incomplete);
        assert_eq!(check("12", "1234"), Judgment::Incomplete);
        assert_eq!(check("13", "1234"), Judgment::Mismatch);
        assert_eq!(check("1234", "1234"), Judgment::Match);
        assert_eq!(check("12345", "1234"), Judgment::Mismatch);
    }

    #[test]
    fn solution_digits_come_from_the_rng() {
        let mut rig = Rig::new(0);
        rig.rng.script(&[1, 2, 252, 13, 4]);
        let mut board = rig.board();
        let mut p = puzzle();
        p.start(&mut board);
        // 252 is rejected (biased tail), 13 maps to 3
        assert_eq!(p.solution(), "1234");
    }

    #[test]
    fn wrong_digit_fails_fast_and_correct_code_solves() {
        let mut rig = Rig::new(0);
        rig.rng.script(&[1, 2, 3, 4]);
        let hw = rig.clone();
        let mut board = rig.board();
        let mut p = puzzle();
        let mut t = 0;

        p.init(&mut board, false);
        p.start(&mut board);
        p.step(at(t), &mut board);
        assert_eq!(p.state(), State::Armed);
        assert_eq!(hw.lamp.pixel(0), Color::White);
        assert_eq!(hw.buzzer.sounding(), Some(700));

        tap(&mut p, &hw, &mut board, '1', &mut t);
        tap(&mut p, &hw, &mut board, '2', &mut t);
        assert_eq!(p.input(), "12");
        assert!(!p.is_complete());

        tap(&mut p, &hw, &mut board, '3', &mut t);
        tap(&mut p, &hw, &mut board, '5', &mut t);
        assert_eq!(p.input(), "");
        assert_eq!(hw.lamp.pixel(0), Color::Red);

        for key in ['1', '2', '3', '4'] {
            tap(&mut p, &hw, &mut board, key, &mut t);
        }
        assert!(p.is_complete());
        assert!(!p.is_active());
        assert_eq!(p.state(), State::Complete);
        assert_eq!(hw.lamp.pixel(0), Color::Green);
        assert_eq!(hw.buzzer.sounding(), None);
    }

    #[test]
    fn held_key_registers_once() {
        let mut rig = Rig::new(0);
        rig.rng.script(&[9, 9, 9, 9]);
        let hw = rig.clone();
        let mut board = rig.board();
        let mut p = puzzle();

        p.start(&mut board);
        p.step(at(0), &mut board);
        hw.keypad.hold('9');
        for t in 1..10 {
            p.step(at(t * 20), &mut board);
        }
        assert_eq!(p.input(), "9");
    }

    #[test]
    fn star_replays_and_hash_clears() {
        let mut rig = Rig::new(0);
        rig.rng.script(&[5, 5, 5, 5]);
        let hw = rig.clone();
        let mut board = rig.board();
        let mut p = puzzle();
        let mut t = 0;

        p.start(&mut board);
        p.step(at(t), &mut board);
        let cues = hw.buzzer.starts();

        tap(&mut p, &hw, &mut board, '5', &mut t);
        tap(&mut p, &hw, &mut board, '#', &mut t);
        assert_eq!(p.input(), "");

        tap(&mut p, &hw, &mut board, '5', &mut t);
        tap(&mut p, &hw, &mut board, '*', &mut t);
        assert_eq!(p.input(), "");
        assert!(hw.buzzer.starts() > cues);
        // '5' opens with a dot, still sounding one tick after the replay
        assert_eq!(hw.buzzer.sounding(), Some(700));
    }

    #[test]
    fn stop_silences_and_darkens_unless_solved() {
        let mut rig = Rig::new(0);
        let hw = rig.clone();
        let mut board = rig.board();
        let mut p = puzzle();

        p.start(&mut board);
        p.step(at(0), &mut board);
        p.stop(&mut board);
        assert_eq!(hw.buzzer.sounding(), None);
        assert_eq!(hw.lamp.pixel(0), Color::Black);
    }

    #[test]
    fn pause_silences_the_cue_and_keeps_the_input() {
        let mut rig = Rig::new(0);
        rig.rng.script(&[1, 2, 3, 4]);
        let hw = rig.clone();
        let mut board = rig.board();
        let mut p = puzzle();
        let mut t = 0;

        p.start(&mut board);
        p.step(at(t), &mut board);
        tap(&mut p, &hw, &mut board, '1', &mut t);
        assert_eq!(hw.buzzer.sounding(), Some(700));

        p.pause(&mut board);
        assert_eq!(hw.buzzer.sounding(), None);
        assert!(p.is_active());

        // picked up again much later: no stale cue, same attempt
        t += 60_000;
        tap(&mut p, &hw, &mut board, '2', &mut t);
        assert_eq!(hw.buzzer.sounding(), None);
        assert_eq!(p.input(), "12");
        assert_eq!(hw.lamp.pixel(0), Color::White);
    }
}
