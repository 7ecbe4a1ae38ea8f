// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Software timers polled from the main loop.
//!
//! A [`TimerService`] owns a fixed set of timers, each registered up front as one-shot or
//! repeating. Owners never receive callbacks: they call [`TimerService::poll`] from their own
//! `step()` and match on the returned handles.
//!
//! Each timer carries a generation counter that moves on every `start`/`stop`. An [`Expiry`] is
//! stamped with the generation it fired under, and [`TimerService::accept`] refuses it once the
//! timer has been stopped or restarted, so a late expiry can never land in a freshly reset FSM.
//!
//! ```
//! use puzzlebox::control::time::{at, ms};
//! use puzzlebox::control::timer::{TimerHandle, TimerMode, TimerService};
//!
//! const BLINK: TimerHandle = TimerHandle(0);
//!
//! let mut timers = TimerService::new([TimerMode::Repeating]);
//! timers.start(BLINK, ms(500), at(0));
//! assert!(timers.poll(at(499)).is_empty());
//! assert_eq!(timers.poll(at(500))[0].handle, BLINK);
//! ```

use heapless::Vec;

use super::time::{Duration, Instant};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimerMode {
    OneShot,
    Repeating,
}

/// Index of a timer inside its [`TimerService`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimerHandle(pub u8);

/// A timer that fired during [`TimerService::poll`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Expiry {
    pub handle: TimerHandle,
    generation: u32,
}

#[derive(Copy, Clone, Debug)]
struct Slot {
    mode: TimerMode,
    period: Duration,
    deadline: Option<Instant>,
    generation: u32,
}

/// Fixed-capacity set of software timers.
#[derive(Debug)]
pub struct TimerService<const N: usize> {
    slots: [Slot; N],
}

impl<const N: usize> TimerService<N> {
    /// Register `N` timers; handle `i` gets `modes[i]`.
    pub fn new(modes: [TimerMode; N]) -> Self {
        Self {
            slots: modes.map(|mode| Slot {
                mode,
                period: Duration::from_ticks(0),
                deadline: None,
                generation: 0,
            }),
        }
    }

    /// (Re)arm a timer to fire `duration` after `now`. Restarting drops any pending expiry.
    pub fn start(&mut self, handle: TimerHandle, duration: Duration, now: Instant) {
        if let Some(slot) = self.slots.get_mut(handle.0 as usize) {
            slot.generation = slot.generation.wrapping_add(1);
            slot.period = duration;
            slot.deadline = Some(now + duration);
        }
    }

    /// Disarm a timer. Stopping an idle timer is harmless.
    pub fn stop(&mut self, handle: TimerHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0 as usize) {
            slot.generation = slot.generation.wrapping_add(1);
            slot.deadline = None;
        }
    }

    pub fn stop_all(&mut self) {
        for i in 0..N {
            self.stop(TimerHandle(i as u8));
        }
    }

    #[inline]
    pub fn is_running(&self, handle: TimerHandle) -> bool {
        self.slots
            .get(handle.0 as usize)
            .map_or(false, |slot| slot.deadline.is_some())
    }

    /// Collect every timer whose deadline has passed.
    ///
    /// Repeating timers are re-armed one period after their previous deadline (catching up to
    /// `now` if the loop stalled); one-shot timers are disarmed. A timer fires at most once per
    /// poll.
    pub fn poll(&mut self, now: Instant) -> Vec<Expiry, N> {
        let mut fired = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(deadline) = slot.deadline else {
                continue;
            };
            if now < deadline {
                continue;
            }

            slot.deadline = match slot.mode {
                TimerMode::OneShot => None,
                TimerMode::Repeating if slot.period.ticks() == 0 => Some(now),
                TimerMode::Repeating => {
                    let mut next = deadline + slot.period;
                    while next <= now {
                        next = next + slot.period;
                    }
                    Some(next)
                }
            };

            // Capacity equals the slot count, so this cannot overflow.
            let _ = fired.push(Expiry {
                handle: TimerHandle(i as u8),
                generation: slot.generation,
            });
        }
        fired
    }

    /// Whether `expiry` still belongs to the current run of its timer.
    pub fn accept(&self, expiry: &Expiry) -> bool {
        self.slots
            .get(expiry.handle.0 as usize)
            .map_or(false, |slot| slot.generation == expiry.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::time::{at, ms};

    const A: TimerHandle = TimerHandle(0);
    const B: TimerHandle = TimerHandle(1);

    #[test]
    fn one_shot_fires_once() {
        let mut timers = TimerService::new([TimerMode::OneShot]);
        timers.start(A, ms(100), at(0));

        assert!(timers.poll(at(99)).is_empty());
        assert_eq!(timers.poll(at(100)).len(), 1);
        assert!(!timers.is_running(A));
        assert!(timers.poll(at(500)).is_empty());
    }

    #[test]
    fn repeating_timer_keeps_its_phase() {
        let mut timers = TimerService::new([TimerMode::Repeating]);
        timers.start(A, ms(200), at(0));

        assert_eq!(timers.poll(at(210)).len(), 1);
        // next deadline is 400, not 410
        assert!(timers.poll(at(399)).is_empty());
        assert_eq!(timers.poll(at(400)).len(), 1);
    }

    #[test]
    fn stalled_repeating_timer_fires_once_and_catches_up() {
        let mut timers = TimerService::new([TimerMode::Repeating]);
        timers.start(A, ms(100), at(0));

        assert_eq!(timers.poll(at(1050)).len(), 1);
        assert!(timers.poll(at(1099)).is_empty());
        assert_eq!(timers.poll(at(1100)).len(), 1);
    }

    #[test]
    fn stopped_timer_invalidates_pending_expiry() {
        let mut timers = TimerService::new([TimerMode::OneShot, TimerMode::Repeating]);
        timers.start(A, ms(10), at(0));
        timers.start(B, ms(10), at(0));

        let fired = timers.poll(at(10));
        assert_eq!(fired.len(), 2);

        timers.stop(A);
        assert!(!timers.accept(&fired[0]));
        assert!(timers.accept(&fired[1]));
    }

    #[test]
    fn restart_invalidates_pending_expiry() {
        let mut timers = TimerService::new([TimerMode::OneShot]);
        timers.start(A, ms(10), at(0));
        let fired = timers.poll(at(10));

        timers.start(A, ms(10), at(10));
        assert!(!timers.accept(&fired[0]));
    }

    #[test]
    fn stop_all_disarms_everything() {
        let mut timers = TimerService::new([TimerMode::OneShot, TimerMode::Repeating]);
        timers.start(A, ms(10), at(0));
        timers.start(B, ms(10), at(0));
        timers.stop_all();

        assert!(!timers.is_running(A));
        assert!(!timers.is_running(B));
        assert!(timers.poll(at(100)).is_empty());
    }
}
