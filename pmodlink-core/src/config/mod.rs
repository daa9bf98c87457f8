//! Configuration types
//!
//! Engine tuning that the board firmware picks once at startup. With the
//! `serde` feature the types can be stored alongside other board settings.

pub mod types;

pub use pmodlink_hal::i2c::I2cConfig;
pub use types::*;
