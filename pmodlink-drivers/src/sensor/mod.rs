//! Sensor Pmods
//!
//! - TMP3: ambient temperature, read as a two-byte stream
//! - ACL: 3-axis accelerometer (ADXL345), per-register reads
//! - GYRO: 3-axis gyroscope (L3G4200D), per-register reads

pub mod acl;
pub mod gyro;
pub mod tmp3;

pub use acl::{PmodAcl, ACL_ADDRESS};
pub use gyro::{PmodGyro, GYRO_ADDRESS};
pub use tmp3::{PmodTmp3, TMP3_ADDRESS};

use pmodlink_core::{Error, Session};
use pmodlink_hal::i2c::I2cController;

/// Raw signed samples of a 3-axis sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawAxes {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// A 3-axis reading in physical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RawAxes {
    /// Multiply every axis by `scale`
    pub fn scale(self, scale: f32) -> Axes {
        Axes {
            x: self.x as f32 * scale,
            y: self.y as f32 * scale,
            z: self.z as f32 * scale,
        }
    }
}

/// High and low data register of each axis, in x, y, z order
pub(crate) struct AxisRegisters {
    pub x: (u8, u8),
    pub y: (u8, u8),
    pub z: (u8, u8),
}

/// Read all three axes, high register before low
///
/// Each byte is its own register transaction. The first failure aborts
/// the read; no partial sample is returned.
pub(crate) fn read_axes<C: I2cController>(
    session: &mut Session<'_, C>,
    registers: &AxisRegisters,
) -> Result<RawAxes, Error> {
    Ok(RawAxes {
        x: session.read_register_pair(registers.x.0, registers.x.1)?,
        y: session.read_register_pair(registers.y.0, registers.y.1)?,
        z: session.read_register_pair(registers.z.0, registers.z.1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale() {
        let raw = RawAxes { x: 2, y: -4, z: 0 };
        assert_eq!(raw.scale(0.5), Axes { x: 1.0, y: -2.0, z: 0.0 });
    }
}
