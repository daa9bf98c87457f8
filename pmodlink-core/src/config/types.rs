//! Configuration type definitions

use pmodlink_hal::i2c::I2cConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bound on how often a hardware condition is checked before giving up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PollLimit {
    /// Keep checking forever; a stuck bus hangs the caller
    #[default]
    Unbounded,
    /// Give up after this many unsuccessful checks
    Iterations(u32),
}

impl PollLimit {
    /// Whether `failures` unsuccessful checks use up the limit
    pub const fn is_exhausted(self, failures: u32) -> bool {
        match self {
            PollLimit::Unbounded => false,
            PollLimit::Iterations(max) => failures >= max,
        }
    }
}

/// Transaction engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandlerConfig {
    /// Target SCL frequency programmed by `initialize_bus`
    pub i2c: I2cConfig,
    /// Limit for every status-flag wait (bus idle, start/stop complete,
    /// transmitter ready, byte sent, byte received)
    pub poll_limit: PollLimit,
    /// Limit for re-issuing a start request the controller refused
    pub start_retries: PollLimit,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            i2c: I2cConfig::STANDARD,
            poll_limit: PollLimit::Unbounded,
            start_retries: PollLimit::Unbounded,
        }
    }
}

impl HandlerConfig {
    /// Standard-mode bus with every wait bounded to `iterations` checks
    pub const fn bounded(iterations: u32) -> Self {
        Self {
            i2c: I2cConfig::STANDARD,
            poll_limit: PollLimit::Iterations(iterations),
            start_retries: PollLimit::Iterations(iterations),
        }
    }

    /// Override the bus clock
    pub const fn with_i2c(mut self, i2c: I2cConfig) -> Self {
        self.i2c = i2c;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded_standard_mode() {
        let config = HandlerConfig::default();
        assert_eq!(config.i2c.frequency, 100_000);
        assert_eq!(config.poll_limit, PollLimit::Unbounded);
        assert_eq!(config.start_retries, PollLimit::Unbounded);
    }

    #[test]
    fn test_poll_limit() {
        assert!(!PollLimit::Unbounded.is_exhausted(u32::MAX));
        assert!(!PollLimit::Iterations(3).is_exhausted(2));
        assert!(PollLimit::Iterations(3).is_exhausted(3));
    }

    #[test]
    fn test_bounded_with_fast_mode() {
        let config = HandlerConfig::bounded(50).with_i2c(I2cConfig::FAST);
        assert_eq!(config.i2c.frequency, 400_000);
        assert_eq!(config.poll_limit, PollLimit::Iterations(50));
    }
}
