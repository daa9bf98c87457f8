//! pmodlink Hardware Abstraction Layer
//!
//! This crate defines the traits a chip-specific HAL implements so the
//! pmodlink engine can drive it. The I2C trait is deliberately low level:
//! it exposes the individual start, repeated-start, stop, send and receive
//! requests of a master controller plus its status flags, and leaves all
//! sequencing to `pmodlink-core`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pmodlink-drivers (CLS, TMP3, ACL, GYRO)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pmodlink-core (transaction engine)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pmodlink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            chip-specific controller
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cController`] - I2C master controller requests and status
//! - [`gpio::OutputPin`] - Digital outputs
//! - [`time::Clock`] - Millisecond tick counter and blocking delay

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use i2c::{BusId, I2cConfig, I2cController, RequestError};
pub use time::Clock;
