// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Edge detector for mechanical buttons and keys.
//!
//! Each channel remembers its last stable state, its last raw sample and when the raw sample last
//! changed. A raw change only becomes stable once it has been seen unchanged for the settle time,
//! and only the stable transition is reported, so contact bounce and held buttons each produce
//! exactly one [`Edge`].

use super::time::{elapsed, Duration, Instant};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Edge {
    /// Released → pressed.
    Pressed,
    /// Pressed → released.
    Released,
}

#[derive(Copy, Clone, Debug)]
struct Channel {
    stable: bool,
    raw: bool,
    changed_at: Option<Instant>,
}

impl Channel {
    const RELEASED: Self = Self {
        stable: false,
        raw: false,
        changed_at: None,
    };
}

/// Debouncer for `N` independent inputs, addressed by index.
#[derive(Debug)]
pub struct Debouncer<const N: usize> {
    channels: [Channel; N],
    settle: Duration,
}

impl<const N: usize> Debouncer<N> {
    pub fn new(settle: Duration) -> Self {
        Self {
            channels: [Channel::RELEASED; N],
            settle,
        }
    }

    /// Feed one raw sample for `id`. Returns the stable edge it completes, if any.
    ///
    /// Out-of-range ids are ignored.
    pub fn update(&mut self, id: usize, pressed: bool, now: Instant) -> Option<Edge> {
        let settle = self.settle;
        let ch = self.channels.get_mut(id)?;

        if pressed != ch.raw {
            ch.raw = pressed;
            ch.changed_at = Some(now);
        }

        if ch.raw == ch.stable {
            return None;
        }

        let since = ch.changed_at.unwrap_or(now);
        if elapsed(now, since) < settle {
            return None;
        }

        ch.stable = ch.raw;
        Some(if ch.stable {
            Edge::Pressed
        } else {
            Edge::Released
        })
    }

    /// Current stable state of `id`.
    #[inline]
    pub fn is_pressed(&self, id: usize) -> bool {
        self.channels.get(id).map_or(false, |ch| ch.stable)
    }

    /// Forget all history; every channel reads as released.
    pub fn reset(&mut self) {
        self.channels = [Channel::RELEASED; N];
    }
}
