//! Digilent Pmod GYRO 3-axis gyroscope (L3G4200D)

use log::trace;
use pmodlink_core::{BusId, DeviceEndpoint, DeviceKind, Error, I2cHandler, PmodDevice, Session};
use pmodlink_hal::i2c::I2cController;

use super::{read_axes, Axes, AxisRegisters, RawAxes};

/// 7-bit bus address of the GYRO (SDO tied high on the Pmod)
pub const GYRO_ADDRESS: u8 = 0x69;

/// Register addresses
pub mod reg {
    pub const CTRL_REG1: u8 = 0x20;
    pub const OUT_X_L: u8 = 0x28;
    pub const OUT_X_H: u8 = 0x29;
    pub const OUT_Y_L: u8 = 0x2A;
    pub const OUT_Y_H: u8 = 0x2B;
    pub const OUT_Z_L: u8 = 0x2C;
    pub const OUT_Z_H: u8 = 0x2D;
}

/// CTRL_REG1 power-down bit; set means normal mode
pub const CTRL_REG1_PD: u8 = 0x08;

/// Degrees per second per count
pub const DPS_PER_COUNT: f32 = 500.0 / 65536.0;

const AXES: AxisRegisters = AxisRegisters {
    x: (reg::OUT_X_H, reg::OUT_X_L),
    y: (reg::OUT_Y_H, reg::OUT_Y_L),
    z: (reg::OUT_Z_H, reg::OUT_Z_L),
};

/// Pmod GYRO on one bus
pub struct PmodGyro;

impl PmodDevice for PmodGyro {
    const ENDPOINT: DeviceEndpoint = DeviceEndpoint::new(DeviceKind::Gyroscope, GYRO_ADDRESS);

    fn configure<C: I2cController>(session: &mut Session<'_, C>) -> Result<(), Error> {
        let ctrl = session.modify_register(reg::CTRL_REG1, |v| v | CTRL_REG1_PD)?;
        trace!("GYRO: CTRL_REG1 = 0x{:02X}", ctrl);
        Ok(())
    }
}

impl PmodGyro {
    /// Switch the gyroscope from power-down to normal mode
    pub fn init<C: I2cController>(handler: &mut I2cHandler<C>, bus: BusId) -> Result<(), Error> {
        handler.init_device::<Self>(bus)
    }

    /// Read all three axes, then issue one extra stop condition
    pub fn read_raw<C: I2cController>(
        handler: &mut I2cHandler<C>,
        bus: BusId,
    ) -> Result<RawAxes, Error> {
        let mut session = handler.session(bus, Self::ENDPOINT)?;
        let raw = read_axes(&mut session, &AXES)?;
        session.stop()?;
        Ok(raw)
    }

    /// Angular rate on each axis in degrees per second
    pub fn read_angular_rate<C: I2cController>(
        handler: &mut I2cHandler<C>,
        bus: BusId,
    ) -> Result<Axes, Error> {
        Self::read_raw(handler, bus).map(|raw| raw.scale(DPS_PER_COUNT))
    }
}
