//! Board-agnostic I2C transaction engine
//!
//! This crate contains everything between the raw controller requests of
//! `pmodlink-hal` and the device drivers:
//!
//! - Bus primitives (start, restart, stop, byte transmit/receive) with
//!   bounded status polling
//! - Register access using the write-pointer / restart / read idiom
//! - Per-controller and per-device initialization tracking
//! - The [`traits::PmodDevice`] trait drivers implement
//! - An `embedded-hal` I2C adapter over the engine
//! - Millisecond timer helpers and a bounded function queue
//! - A simulated controller for host testing (feature `sim`)
//!
//! All state is owned by one [`I2cHandler`] per chip, constructed from the
//! HAL controller value and passed by `&mut` to every operation.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod error;
pub mod hal_adapter;
pub mod queue;
pub mod state;
pub mod timer;
pub mod traits;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use bus::{I2cHandler, Session};
pub use config::{HandlerConfig, PollLimit};
pub use error::Error;
pub use pmodlink_hal::i2c::{BusId, Direction};
pub use traits::{DeviceEndpoint, DeviceKind, PmodDevice};
