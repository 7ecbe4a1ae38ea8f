// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Leased access to the shared feedback devices.
//!
//! The pixel strips, the keypad lamp, the speech module and the buzzer are shared by every puzzle.
//! All writes go through a [`FeedbackHub`], which attributes each write to the [`Owner`] the game
//! controller is currently acting as:
//!
//! - a free sink is leased to the first puzzle that writes to it;
//! - writes from any other puzzle are dropped (and logged) until the lease is released;
//! - the controller itself always gets through and never takes a lease.
//!
//! The controller releases a puzzle's leases whenever that puzzle stops or completes, so in
//! practice only the active puzzle ever holds one.

use crate::io::{Color, Indicator, Speech, Tone};
use crate::puzzles::PuzzleId;

/// Who is writing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Owner {
    Controller,
    Puzzle(PuzzleId),
}

/// Pixel-type feedback devices.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Lights {
    /// 16-pixel ring (switch puzzle).
    Ring,
    /// 7-pixel jewel (memory puzzle).
    Jewel,
    /// 8-pixel stick (pose puzzle).
    Stick,
    /// Single RGB lamp next to the keypad.
    Lamp,
}

impl Lights {
    pub const ALL: [Lights; 4] = [Lights::Ring, Lights::Jewel, Lights::Stick, Lights::Lamp];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Sink {
    Lights(Lights),
    Speech,
    Buzzer,
}

impl Sink {
    const COUNT: usize = 6;

    fn slot(self) -> usize {
        match self {
            Sink::Lights(Lights::Ring) => 0,
            Sink::Lights(Lights::Jewel) => 1,
            Sink::Lights(Lights::Stick) => 2,
            Sink::Lights(Lights::Lamp) => 3,
            Sink::Speech => 4,
            Sink::Buzzer => 5,
        }
    }
}

/// The physical devices behind a [`FeedbackHub`].
pub struct Sinks<'a> {
    pub ring: &'a mut dyn Indicator,
    pub jewel: &'a mut dyn Indicator,
    pub stick: &'a mut dyn Indicator,
    pub lamp: &'a mut dyn Indicator,
    pub speech: &'a mut dyn Speech,
    pub buzzer: &'a mut dyn Tone,
}

pub struct FeedbackHub<'a> {
    sinks: Sinks<'a>,
    leases: [Option<Owner>; Sink::COUNT],
    acting: Owner,
}

impl<'a> FeedbackHub<'a> {
    pub fn new(sinks: Sinks<'a>) -> Self {
        Self {
            sinks,
            leases: [None; Sink::COUNT],
            acting: Owner::Controller,
        }
    }

    /// Attribute subsequent writes to `owner`.
    pub fn act_as(&mut self, owner: Owner) {
        self.acting = owner;
    }

    #[inline]
    pub fn acting(&self) -> Owner {
        self.acting
    }

    /// Current lease holder of `sink`.
    #[inline]
    pub fn holder(&self, sink: Sink) -> Option<Owner> {
        self.leases[sink.slot()]
    }

    /// Drop every lease held by `owner`.
    pub fn release(&mut self, owner: Owner) {
        for lease in self.leases.iter_mut() {
            if *lease == Some(owner) {
                *lease = None;
            }
        }
    }

    pub fn release_all(&mut self) {
        self.leases = [None; Sink::COUNT];
    }

    /// Check (and take, if free) the lease on `sink` for the acting owner.
    fn claim(&mut self, sink: Sink) -> bool {
        let owner = self.acting;
        if owner == Owner::Controller {
            return true;
        }

        let lease = &mut self.leases[sink.slot()];
        match *lease {
            None => {
                *lease = Some(owner);
                true
            }
            Some(holder) if holder == owner => true,
            Some(holder) => {
                log::warn!("feedback: {:?} write to {:?} dropped, leased by {:?}", owner, sink, holder);
                false
            }
        }
    }

    fn lights_mut(&mut self, lights: Lights) -> &mut dyn Indicator {
        match lights {
            Lights::Ring => &mut *self.sinks.ring,
            Lights::Jewel => &mut *self.sinks.jewel,
            Lights::Stick => &mut *self.sinks.stick,
            Lights::Lamp => &mut *self.sinks.lamp,
        }
    }

    /// Number of pixels in `lights`.
    pub fn len(&mut self, lights: Lights) -> usize {
        self.lights_mut(lights).len()
    }

    pub fn set(&mut self, lights: Lights, index: usize, color: Color) {
        if self.claim(Sink::Lights(lights)) {
            self.lights_mut(lights).set(index, color);
        }
    }

    pub fn clear(&mut self, lights: Lights, index: usize) {
        if self.claim(Sink::Lights(lights)) {
            self.lights_mut(lights).clear(index);
        }
    }

    pub fn set_all(&mut self, lights: Lights, color: Color) {
        if self.claim(Sink::Lights(lights)) {
            self.lights_mut(lights).set_all(color);
        }
    }

    pub fn clear_all(&mut self, lights: Lights) {
        if self.claim(Sink::Lights(lights)) {
            self.lights_mut(lights).clear_all();
        }
    }

    pub fn say(&mut self, text: &str) {
        if self.claim(Sink::Speech) {
            self.sinks.speech.say(text);
        }
    }

    pub fn tone_on(&mut self, freq_hz: u32) {
        if self.claim(Sink::Buzzer) {
            self.sinks.buzzer.tone_on(freq_hz);
        }
    }

    pub fn tone_off(&mut self) {
        if self.claim(Sink::Buzzer) {
            self.sinks.buzzer.tone_off();
        }
    }

    /// Controller-only: paint every light the same color, ignoring leases.
    pub fn broadcast(&mut self, color: Color) {
        let prev = self.acting;
        self.acting = Owner::Controller;
        for lights in Lights::ALL {
            self.set_all(lights, color);
        }
        self.acting = prev;
    }

    /// Push buffered pixel changes out to every light.
    pub fn flush(&mut self) {
        for lights in Lights::ALL {
            self.lights_mut(lights).flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::Rig;

    const SWITCH: Owner = Owner::Puzzle(PuzzleId::SwitchMapping);
    const POSE: Owner = Owner::Puzzle(PuzzleId::PoseHold);

    #[test]
    fn first_writer_takes_the_lease() {
        let mut rig = Rig::new(0);
        let hw = rig.clone();
        let mut board = rig.board();
        let hub = &mut board.feedback;

        hub.act_as(SWITCH);
        hub.set(Lights::Ring, 3, Color::Red);
        assert_eq!(hub.holder(Sink::Lights(Lights::Ring)), Some(SWITCH));

        hub.act_as(POSE);
        hub.set(Lights::Ring, 4, Color::Green);
        hub.set(Lights::Stick, 0, Color::Green);
        assert_eq!(hub.holder(Sink::Lights(Lights::Stick)), Some(POSE));

        assert_eq!(hw.ring.pixel(3), Color::Red);
        assert_eq!(hw.ring.pixel(4), Color::Black);
        assert_eq!(hw.stick.pixel(0), Color::Green);
    }

    #[test]
    fn release_frees_sinks_for_the_next_owner() {
        let mut rig = Rig::new(0);
        let hw = rig.clone();
        let mut board = rig.board();
        let hub = &mut board.feedback;

        hub.act_as(SWITCH);
        hub.say("one");
        hub.act_as(POSE);
        hub.say("ignored");
        hub.act_as(SWITCH);
        hub.release(SWITCH);
        assert_eq!(hub.holder(Sink::Speech), None);

        hub.act_as(POSE);
        hub.say("two");

        assert_eq!(hw.speech.spoken(), ["one", "two"]);
    }

    #[test]
    fn controller_broadcast_ignores_leases() {
        let mut rig = Rig::new(0);
        let hw = rig.clone();
        let mut board = rig.board();
        let hub = &mut board.feedback;

        hub.act_as(SWITCH);
        hub.set_all(Lights::Ring, Color::Red);
        hub.broadcast(Color::Green);
        hub.flush();
        assert_eq!(hub.acting(), SWITCH);

        assert!(hw.ring.all(Color::Green));
        assert!(hw.lamp.all(Color::Green));
        assert_eq!(hw.ring.flushes(), 1);
    }
}
