//! Millisecond time source

/// Millisecond tick counter with a blocking delay
///
/// On the target this is backed by a timer interrupt incrementing a
/// counter once per millisecond. The counter wraps at `u32::MAX`; users
/// must compare instants with wrapping arithmetic.
pub trait Clock {
    /// Milliseconds elapsed since the clock was started
    fn now_ms(&self) -> u32;

    /// Block for at least `ms` milliseconds
    fn sleep_ms(&mut self, ms: u32);
}
