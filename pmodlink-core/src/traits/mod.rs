//! Device traits
//!
//! These traits define the interface between the transaction engine and
//! the device drivers.

pub mod device;

pub use device::{DeviceEndpoint, DeviceKind, PmodDevice};
