//! GPIO pin abstractions
//!
//! Only outputs are needed: the alarm blinker drives LEDs and nothing in
//! the bus engine reads pins directly.

/// Digital output pin
///
/// Implementations should handle the actual port register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}
