//! Device endpoint description and driver trait

use pmodlink_hal::i2c::I2cController;

use crate::bus::Session;
use crate::error::Error;

/// Device classes the state tracker keeps an initialization flag for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceKind {
    /// Character LCD
    Display,
    /// Temperature sensor
    Temperature,
    /// 3-axis accelerometer
    Accelerometer,
    /// 3-axis gyroscope
    Gyroscope,
}

impl DeviceKind {
    /// Number of device classes
    pub const COUNT: usize = 4;

    /// All device classes, in slot order
    pub const ALL: [DeviceKind; Self::COUNT] = [
        DeviceKind::Display,
        DeviceKind::Temperature,
        DeviceKind::Accelerometer,
        DeviceKind::Gyroscope,
    ];

    pub(crate) const fn slot(self) -> usize {
        match self {
            DeviceKind::Display => 0,
            DeviceKind::Temperature => 1,
            DeviceKind::Accelerometer => 2,
            DeviceKind::Gyroscope => 3,
        }
    }
}

/// A peripheral reachable on a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceEndpoint {
    /// Device class, selects the initialization flag
    pub kind: DeviceKind,
    /// 7-bit bus address
    pub address: u8,
}

impl DeviceEndpoint {
    pub const fn new(kind: DeviceKind, address: u8) -> Self {
        Self { kind, address }
    }
}

/// A device driver the handler can initialize
///
/// `configure` runs once per bus, the first time
/// [`I2cHandler::init_device`](crate::I2cHandler::init_device) is called
/// for the device. The session it receives skips the device-initialized
/// check so configuration registers can be touched before the flag is set.
pub trait PmodDevice {
    /// Where the device lives on the bus
    const ENDPOINT: DeviceEndpoint;

    /// Write the device's configuration registers
    ///
    /// The default does nothing, for devices that work out of reset.
    fn configure<C: I2cController>(session: &mut Session<'_, C>) -> Result<(), Error> {
        let _ = session;
        Ok(())
    }
}
