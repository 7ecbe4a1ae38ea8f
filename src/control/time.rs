// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond time base shared by the whole core.
//!
//! The firmware counts milliseconds since boot in a `u32` (SysTick on the board, a plain counter in
//! tests). Instants wrap after ~49 days; comparisons and [`elapsed`] are wrap-aware.

/// Point in time, 1 tick = 1 ms.
pub type Instant = fugit::TimerInstantU32<1000>;

/// Span of time in milliseconds.
pub type Duration = fugit::MillisDurationU32;

#[inline]
pub const fn ms(value: u32) -> Duration {
    Duration::from_ticks(value)
}

#[inline]
pub const fn at(ms_since_boot: u32) -> Instant {
    Instant::from_ticks(ms_since_boot)
}

/// Time passed from `since` to `now`; zero if `since` lies in the future.
#[inline]
pub fn elapsed(now: Instant, since: Instant) -> Duration {
    now.checked_duration_since(since).unwrap_or(ms(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_handles_counter_wrap() {
        let before = at(u32::MAX - 9);
        let after = at(10);
        assert_eq!(elapsed(after, before), ms(20));
    }

    #[test]
    fn elapsed_is_zero_for_future_instant() {
        assert_eq!(elapsed(at(100), at(150)), ms(0));
    }
}
