// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Game clock shown on the MM:SS display.
//!
//! Remaining time is derived from the start instant on every refresh rather than counted down per
//! expiry, so a stalled poll loop (blocking speech, slow bus) never makes the game longer. A
//! repeating half-second timer only drives the display refresh and the colon blink.

use crate::control::time::{elapsed, ms, Instant};
use crate::control::timer::{TimerHandle, TimerMode, TimerService};
use crate::io::CountdownDisplay;

const REFRESH: TimerHandle = TimerHandle(0);
const HALF_SECOND_MS: u32 = 500;

pub struct Countdown {
    length_s: u32,
    started: Option<Instant>,
    remaining_s: u32,
    colon: bool,
    timers: TimerService<1>,
}

impl Countdown {
    pub fn new(length_s: u32) -> Self {
        Self {
            length_s,
            started: None,
            remaining_s: length_s,
            colon: true,
            timers: TimerService::new([TimerMode::Repeating]),
        }
    }

    pub fn start(&mut self, now: Instant, display: &mut dyn CountdownDisplay) {
        self.started = Some(now);
        self.remaining_s = self.length_s;
        self.colon = true;
        display.show(self.remaining_s, self.colon);
        self.timers.start(REFRESH, ms(HALF_SECOND_MS), now);
    }

    /// Refresh the display if due. Returns true on the poll that reaches zero.
    pub fn poll(&mut self, now: Instant, display: &mut dyn CountdownDisplay) -> bool {
        let Some(started) = self.started else {
            return false;
        };
        if self.timers.poll(now).is_empty() {
            return false;
        }

        let run_ms = elapsed(now, started).ticks();
        self.remaining_s = self.length_s.saturating_sub(run_ms / 1000);
        if self.remaining_s == 0 {
            self.colon = true;
            display.show(0, true);
            self.timers.stop_all();
            log::info!("countdown: time is up");
            return true;
        }

        self.colon = run_ms % 1000 < HALF_SECOND_MS;
        display.show(self.remaining_s, self.colon);
        false
    }

    /// Freeze the clock where it is.
    pub fn stop(&mut self) {
        self.timers.stop_all();
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining_s
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.timers.is_running(REFRESH)
    }
}
