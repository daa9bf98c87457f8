//! Digilent Pmod TMP3 temperature sensor
//!
//! The TMP3 powers up converting continuously with its register pointer on
//! the temperature register, so a plain read transaction returns the
//! latest sample: high byte, then low byte.

use log::trace;
use pmodlink_core::{BusId, DeviceEndpoint, DeviceKind, Error, I2cHandler, PmodDevice};
use pmodlink_hal::i2c::I2cController;

/// 7-bit bus address of the TMP3 (all address jumpers installed)
pub const TMP3_ADDRESS: u8 = 0x4B;

/// Degrees Celsius per count after dropping the three low bits
const CELSIUS_PER_COUNT: f32 = 0.0625;

/// Pmod TMP3 on one bus
pub struct PmodTmp3;

impl PmodDevice for PmodTmp3 {
    const ENDPOINT: DeviceEndpoint = DeviceEndpoint::new(DeviceKind::Temperature, TMP3_ADDRESS);
}

impl PmodTmp3 {
    /// Mark the sensor initialized on `bus`
    ///
    /// The sensor needs no configuration; this only requires the bus to be
    /// initialized.
    pub fn init<C: I2cController>(handler: &mut I2cHandler<C>, bus: BusId) -> Result<(), Error> {
        handler.init_device::<Self>(bus)
    }

    /// Read the two raw temperature bytes, high byte first
    pub fn read_raw<C: I2cController>(
        handler: &mut I2cHandler<C>,
        bus: BusId,
    ) -> Result<[u8; 2], Error> {
        let mut raw = [0u8; 2];
        handler.session(bus, Self::ENDPOINT)?.read(&mut raw)?;
        trace!("TMP3: raw {:02X} {:02X}", raw[0], raw[1]);
        Ok(raw)
    }

    /// Temperature in degrees Celsius
    pub fn read_temperature_c<C: I2cController>(
        handler: &mut I2cHandler<C>,
        bus: BusId,
    ) -> Result<f32, Error> {
        Self::read_raw(handler, bus).map(celsius_from_raw)
    }

    /// Temperature in degrees Fahrenheit
    pub fn read_temperature_f<C: I2cController>(
        handler: &mut I2cHandler<C>,
        bus: BusId,
    ) -> Result<f32, Error> {
        Self::read_temperature_c(handler, bus).map(fahrenheit_from_celsius)
    }
}

/// Convert the two data bytes to degrees Celsius
///
/// The value is treated as unsigned; readings below 0 °C are not decoded.
pub fn celsius_from_raw(raw: [u8; 2]) -> f32 {
    (u16::from_be_bytes(raw) >> 3) as f32 * CELSIUS_PER_COUNT
}

pub fn fahrenheit_from_celsius(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}
