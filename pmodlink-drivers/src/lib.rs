//! Digilent Pmod drivers
//!
//! Device drivers built on the `pmodlink-core` transaction engine:
//!
//! - Character LCD (Pmod CLS)
//! - Temperature sensor (Pmod TMP3)
//! - Accelerometer (Pmod ACL)
//! - Gyroscope (Pmod GYRO)
//! - Four-LED visual alarm
//!
//! Each Pmod is a zero-sized type implementing
//! [`PmodDevice`](pmodlink_core::PmodDevice). Its operations take the
//! [`I2cHandler`](pmodlink_core::I2cHandler) and the bus the device sits
//! on, so one driver type serves the device on every bus.

#![no_std]
#![deny(unsafe_code)]

pub mod alarm;
pub mod display;
pub mod sensor;

pub use alarm::Alarm;
pub use display::PmodCls;
pub use sensor::{Axes, PmodAcl, PmodGyro, PmodTmp3, RawAxes};
