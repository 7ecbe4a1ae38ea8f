// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! In-memory collaborators for unit tests.
//!
//! Every fake is a cheap `Rc<RefCell<..>>` handle: clone it before lending it to a [`Board`] and
//! keep the clone to script inputs and inspect outputs while the board is alive.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::blocking::i2c;

use crate::board::Board;
use crate::control::feedback::{FeedbackHub, Sinks};
use crate::control::random::{RandomSource, SeededRandom};
use crate::io::{
    Color, CountdownDisplay, DigitalInput, Indicator, KeyScanner, Pin, Pose, Speech, TiltSensor,
    Tone,
};

#[derive(Clone, Default)]
pub struct FakeInputs(Rc<RefCell<Vec<(Pin, bool)>>>);

impl FakeInputs {
    /// Drive `pin` to its asserted level.
    pub fn press(&self, pin: Pin) {
        self.set_asserted(pin, true);
    }

    pub fn release(&self, pin: Pin) {
        self.set_asserted(pin, false);
    }

    pub fn set_asserted(&self, pin: Pin, asserted: bool) {
        let level = pin.is_asserted(true) == asserted;
        self.set_level(pin, level);
    }

    pub fn set_level(&self, pin: Pin, high: bool) {
        let mut levels = self.0.borrow_mut();
        match levels.iter_mut().find(|(p, _)| *p == pin) {
            Some(entry) => entry.1 = high,
            None => levels.push((pin, high)),
        }
    }
}

impl DigitalInput for FakeInputs {
    fn configure_input(&mut self, _pin: Pin, _pull_up: bool) {}

    fn read(&mut self, pin: Pin) -> bool {
        self.0
            .borrow()
            .iter()
            .find(|(p, _)| *p == pin)
            .map(|&(_, level)| level)
            // unscripted pins idle deasserted
            .unwrap_or(!pin.is_asserted(true))
    }
}

#[derive(Clone, Default)]
pub struct FakeKeypad(Rc<RefCell<Option<char>>>);

impl FakeKeypad {
    pub fn hold(&self, key: char) {
        *self.0.borrow_mut() = Some(key);
    }

    pub fn release(&self) {
        *self.0.borrow_mut() = None;
    }
}

impl KeyScanner for FakeKeypad {
    fn held_key(&mut self) -> Option<char> {
        *self.0.borrow()
    }
}

#[derive(Default)]
struct TiltState {
    pose: Option<Pose>,
    running: bool,
}

#[derive(Clone, Default)]
pub struct FakeTilt(Rc<RefCell<TiltState>>);

impl FakeTilt {
    pub fn set(&self, pitch: f32, roll: f32) {
        self.0.borrow_mut().pose = Some(Pose { pitch, roll });
    }

    pub fn is_running(&self) -> bool {
        self.0.borrow().running
    }
}

impl TiltSensor for FakeTilt {
    fn start(&mut self) {
        self.0.borrow_mut().running = true;
    }

    fn stop(&mut self) {
        self.0.borrow_mut().running = false;
    }

    fn pose(&mut self) -> Option<Pose> {
        self.0.borrow().pose
    }
}

struct StripState {
    pixels: Vec<Color>,
    flushes: usize,
}

#[derive(Clone)]
pub struct FakeStrip(Rc<RefCell<StripState>>);

impl FakeStrip {
    pub fn new(len: usize) -> Self {
        Self(Rc::new(RefCell::new(StripState {
            pixels: vec![Color::Black; len],
            flushes: 0,
        })))
    }

    pub fn pixel(&self, index: usize) -> Color {
        self.0.borrow().pixels[index]
    }

    pub fn pixels(&self) -> Vec<Color> {
        self.0.borrow().pixels.clone()
    }

    pub fn all(&self, color: Color) -> bool {
        self.0.borrow().pixels.iter().all(|&c| c == color)
    }

    pub fn count(&self, color: Color) -> usize {
        self.0.borrow().pixels.iter().filter(|&&c| c == color).count()
    }

    pub fn flushes(&self) -> usize {
        self.0.borrow().flushes
    }
}

impl Indicator for FakeStrip {
    fn len(&self) -> usize {
        self.0.borrow().pixels.len()
    }

    fn set(&mut self, index: usize, color: Color) {
        if let Some(px) = self.0.borrow_mut().pixels.get_mut(index) {
            *px = color;
        }
    }

    fn flush(&mut self) {
        self.0.borrow_mut().flushes += 1;
    }
}

#[derive(Clone, Default)]
pub struct FakeSpeech(Rc<RefCell<Vec<String>>>);

impl FakeSpeech {
    pub fn spoken(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.0.borrow().last().cloned()
    }
}

impl Speech for FakeSpeech {
    fn say(&mut self, text: &str) {
        self.0.borrow_mut().push(text.into());
    }
}

#[derive(Default)]
struct BuzzerState {
    on: Option<u32>,
    starts: usize,
}

#[derive(Clone, Default)]
pub struct FakeBuzzer(Rc<RefCell<BuzzerState>>);

impl FakeBuzzer {
    /// Frequency currently sounding.
    pub fn sounding(&self) -> Option<u32> {
        self.0.borrow().on
    }

    /// Number of `tone_on` calls so far.
    pub fn starts(&self) -> usize {
        self.0.borrow().starts
    }
}

impl Tone for FakeBuzzer {
    fn tone_on(&mut self, freq_hz: u32) {
        let mut state = self.0.borrow_mut();
        state.on = Some(freq_hz);
        state.starts += 1;
    }

    fn tone_off(&mut self) {
        self.0.borrow_mut().on = None;
    }
}

#[derive(Clone, Default)]
pub struct FakeDisplay(Rc<RefCell<Option<(u32, bool)>>>);

impl FakeDisplay {
    pub fn shown(&self) -> Option<(u32, bool)> {
        *self.0.borrow()
    }
}

impl CountdownDisplay for FakeDisplay {
    fn show(&mut self, seconds: u32, colon: bool) {
        *self.0.borrow_mut() = Some((seconds, colon));
    }
}

struct RandomState {
    script: VecDeque<u8>,
    fallback: SeededRandom,
}

/// Plays back scripted bytes, then continues with a seeded PRNG.
#[derive(Clone)]
pub struct FakeRandom(Rc<RefCell<RandomState>>);

impl FakeRandom {
    pub fn new(seed: u64) -> Self {
        Self(Rc::new(RefCell::new(RandomState {
            script: VecDeque::new(),
            fallback: SeededRandom::new(seed),
        })))
    }

    pub fn script(&self, bytes: &[u8]) {
        self.0.borrow_mut().script.extend(bytes.iter().copied());
    }
}

impl RandomSource for FakeRandom {
    fn seed(&mut self, value: u64) {
        self.0.borrow_mut().fallback.seed(value);
    }

    fn next_byte(&mut self) -> u8 {
        let mut state = self.0.borrow_mut();
        match state.script.pop_front() {
            Some(b) => b,
            None => state.fallback.next_byte(),
        }
    }
}

/// One of every fake, wired the way the real box is.
#[derive(Clone)]
pub struct Rig {
    pub inputs: FakeInputs,
    pub keypad: FakeKeypad,
    pub tilt: FakeTilt,
    pub rng: FakeRandom,
    pub display: FakeDisplay,
    pub ring: FakeStrip,
    pub jewel: FakeStrip,
    pub stick: FakeStrip,
    pub lamp: FakeStrip,
    pub speech: FakeSpeech,
    pub buzzer: FakeBuzzer,
}

impl Rig {
    pub fn new(seed: u64) -> Self {
        Self {
            inputs: FakeInputs::default(),
            keypad: FakeKeypad::default(),
            tilt: FakeTilt::default(),
            rng: FakeRandom::new(seed),
            display: FakeDisplay::default(),
            ring: FakeStrip::new(16),
            jewel: FakeStrip::new(7),
            stick: FakeStrip::new(8),
            lamp: FakeStrip::new(1),
            speech: FakeSpeech::default(),
            buzzer: FakeBuzzer::default(),
        }
    }

    pub fn board(&mut self) -> Board<'_> {
        Board {
            inputs: &mut self.inputs,
            keypad: &mut self.keypad,
            tilt: &mut self.tilt,
            rng: &mut self.rng,
            display: &mut self.display,
            feedback: FeedbackHub::new(Sinks {
                ring: &mut self.ring,
                jewel: &mut self.jewel,
                stick: &mut self.stick,
                lamp: &mut self.lamp,
                speech: &mut self.speech,
                buzzer: &mut self.buzzer,
            }),
        }
    }
}

/// Error returned by [`FakeI2c`] while it is told to fail.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BusFault;

#[derive(Default)]
struct I2cState {
    regs: HashMap<u8, [u8; 256]>,
    writes: Vec<(u8, Vec<u8>)>,
    replies: VecDeque<u8>,
    failing: bool,
}

/// I2C bus with one auto-incrementing register file per address.
///
/// A write stores `bytes[1..]` starting at register `bytes[0]`; a write-read returns registers
/// starting at `bytes[0]`. Plain reads pop queued reply bytes (zero once the queue is empty). Every
/// write is recorded.
#[derive(Clone, Default)]
pub struct FakeI2c(Rc<RefCell<I2cState>>);

impl FakeI2c {
    pub fn set_reg(&self, addr: u8, reg: u8, value: u8) {
        self.0.borrow_mut().regs.entry(addr).or_insert([0; 256])[reg as usize] = value;
    }

    pub fn reg(&self, addr: u8, reg: u8) -> u8 {
        self.0
            .borrow()
            .regs
            .get(&addr)
            .map_or(0, |regs| regs[reg as usize])
    }

    /// Queue bytes for plain reads.
    pub fn reply(&self, bytes: &[u8]) {
        self.0.borrow_mut().replies.extend(bytes.iter().copied());
    }

    pub fn set_failing(&self, failing: bool) {
        self.0.borrow_mut().failing = failing;
    }

    /// Every write so far, as `(address, bytes)`.
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.0.borrow().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.0.borrow_mut().writes.clear();
    }
}

impl i2c::Write for FakeI2c {
    type Error = BusFault;

    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusFault> {
        let mut state = self.0.borrow_mut();
        if state.failing {
            return Err(BusFault);
        }
        state.writes.push((addr, bytes.to_vec()));
        if let Some((&reg, data)) = bytes.split_first() {
            let regs = state.regs.entry(addr).or_insert([0; 256]);
            for (i, &b) in data.iter().enumerate() {
                regs[(reg as usize + i) % 256] = b;
            }
        }
        Ok(())
    }
}

impl i2c::WriteRead for FakeI2c {
    type Error = BusFault;

    fn write_read(&mut self, addr: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), BusFault> {
        let mut state = self.0.borrow_mut();
        if state.failing {
            return Err(BusFault);
        }
        let reg = bytes.first().copied().unwrap_or(0) as usize;
        let regs = state.regs.entry(addr).or_insert([0; 256]);
        for (i, b) in buffer.iter_mut().enumerate() {
            *b = regs[(reg + i) % 256];
        }
        Ok(())
    }
}

impl i2c::Read for FakeI2c {
    type Error = BusFault;

    fn read(&mut self, _addr: u8, buffer: &mut [u8]) -> Result<(), BusFault> {
        let mut state = self.0.borrow_mut();
        if state.failing {
            return Err(BusFault);
        }
        for b in buffer.iter_mut() {
            *b = state.replies.pop_front().unwrap_or(0);
        }
        Ok(())
    }
}

/// Delay that returns immediately.
#[derive(Copy, Clone, Default)]
pub struct NoDelay;

impl DelayMs<u32> for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

impl DelayUs<u32> for NoDelay {
    fn delay_us(&mut self, _us: u32) {}
}
