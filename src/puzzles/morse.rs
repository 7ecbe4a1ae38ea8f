// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Non-blocking International Morse playback on the buzzer.
//!
//! [`MorsePlayer::play`] expands the text into a list of timed tone/silence elements and starts
//! the first one; [`MorsePlayer::poll`] moves to the next element whenever its one-shot timer
//! expires. Timing, in units:
//!
//! | Element | Units |
//! | ------- | ----- |
//! | dot | 1 |
//! | dash | 3 |
//! | gap inside a character | 1 |
//! | gap between characters | 3 |
//! | gap between words | 7 |

use heapless::Vec;

use crate::control::feedback::FeedbackHub;
use crate::control::time::{Duration, Instant};
use crate::control::timer::{TimerHandle, TimerMode, TimerService};

const ELEMENT: TimerHandle = TimerHandle(0);

/// Enough for ten five-symbol characters.
const MAX_ELEMENTS: usize = 100;

/// Dot/dash pattern for `c`, if it has one.
pub fn code(c: char) -> Option<&'static str> {
    let code = match c.to_ascii_uppercase() {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        _ => return None,
    };
    Some(code)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Element {
    pub tone: bool,
    pub units: u8,
}

/// Tone/silence schedule for `text`. Unknown characters are skipped; output past the element
/// budget is truncated.
pub fn encode(text: &str) -> Vec<Element, MAX_ELEMENTS> {
    let mut out: Vec<Element, MAX_ELEMENTS> = Vec::new();
    let mut pending_gap = 0u8;

    for c in text.chars() {
        if c == ' ' {
            if !out.is_empty() {
                pending_gap = 7;
            }
            continue;
        }
        let Some(pattern) = code(c) else {
            continue;
        };

        if pending_gap > 0 {
            let _ = out.push(Element {
                tone: false,
                units: pending_gap,
            });
        }
        for (i, sym) in pattern.bytes().enumerate() {
            if i > 0 {
                let _ = out.push(Element {
                    tone: false,
                    units: 1,
                });
            }
            let units = if sym == b'-' { 3 } else { 1 };
            let _ = out.push(Element { tone: true, units });
        }
        pending_gap = 3;
    }
    out
}

pub struct MorsePlayer {
    unit: Duration,
    freq_hz: u32,
    elements: Vec<Element, MAX_ELEMENTS>,
    next: usize,
    timers: TimerService<1>,
}

impl MorsePlayer {
    pub fn new(unit: Duration, freq_hz: u32) -> Self {
        Self {
            unit,
            freq_hz,
            elements: Vec::new(),
            next: 0,
            timers: TimerService::new([TimerMode::OneShot]),
        }
    }

    /// Start playing `text` from the beginning, replacing anything already playing.
    pub fn play(&mut self, text: &str, now: Instant, fb: &mut FeedbackHub<'_>) {
        self.elements = encode(text);
        self.next = 0;
        self.timers.stop_all();
        self.advance(now, fb);
    }

    /// Move on to the next element if the current one has run its course.
    pub fn poll(&mut self, now: Instant, fb: &mut FeedbackHub<'_>) {
        for expiry in self.timers.poll(now) {
            if self.timers.accept(&expiry) {
                self.advance(now, fb);
            }
        }
    }

    /// Silence the buzzer and drop the rest of the message.
    pub fn stop(&mut self, fb: &mut FeedbackHub<'_>) {
        if self.is_playing() {
            fb.tone_off();
        }
        self.timers.stop_all();
        self.elements.clear();
        self.next = 0;
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.timers.is_running(ELEMENT)
    }

    fn advance(&mut self, now: Instant, fb: &mut FeedbackHub<'_>) {
        let Some(&element) = self.elements.get(self.next) else {
            fb.tone_off();
            return;
        };
        self.next += 1;

        if element.tone {
            fb.tone_on(self.freq_hz);
        } else {
            fb.tone_off();
        }
        self.timers
            .start(ELEMENT, self.unit * u32::from(element.units), now);
    }
}
