//! Millisecond timer helpers
//!
//! Built on the HAL [`Clock`]. The tick counter wraps, so all comparisons
//! use wrapping subtraction and stay correct across the wrap as long as
//! the intervals involved are shorter than ~49 days.

use embedded_hal::delay::DelayNs;
use pmodlink_hal::time::Clock;

/// Milliseconds from `start` to the clock's current tick
pub fn elapsed_ms<C: Clock + ?Sized>(clock: &C, start: u32) -> u32 {
    clock.now_ms().wrapping_sub(start)
}

/// Whether strictly more than `limit_ms` milliseconds have passed since
/// `start`
///
/// Exactly `limit_ms` elapsed is not yet expired.
pub fn has_expired<C: Clock + ?Sized>(clock: &C, start: u32, limit_ms: u32) -> bool {
    elapsed_ms(clock, start) > limit_ms
}

/// [`DelayNs`] on top of a millisecond [`Clock`]
///
/// Sub-millisecond delays are rounded up to whole milliseconds.
pub struct Delay<C> {
    clock: C,
}

impl<C: Clock> Delay<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn release(self) -> C {
        self.clock
    }
}

impl<C: Clock> DelayNs for Delay<C> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.sleep_ms(ns.div_ceil(1_000_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.sleep_ms(us.div_ceil(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.sleep_ms(ms);
    }
}
