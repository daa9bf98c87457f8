//! Digilent Pmod ACL accelerometer (ADXL345)
//!
//! Default ±2 g range, 10-bit right-justified samples.

use pmodlink_core::{BusId, DeviceEndpoint, DeviceKind, Error, I2cHandler, PmodDevice, Session};
use pmodlink_hal::i2c::I2cController;

use super::{read_axes, Axes, AxisRegisters, RawAxes};

/// 7-bit bus address of the ACL (ALT ADDRESS pin high)
pub const ACL_ADDRESS: u8 = 0x1D;

/// Register addresses
pub mod reg {
    pub const POWER_CTL: u8 = 0x2D;
    pub const DATAX0: u8 = 0x32;
    pub const DATAX1: u8 = 0x33;
    pub const DATAY0: u8 = 0x34;
    pub const DATAY1: u8 = 0x35;
    pub const DATAZ0: u8 = 0x36;
    pub const DATAZ1: u8 = 0x37;
}

/// POWER_CTL measure bit; clear means standby
pub const POWER_CTL_MEASURE: u8 = 0x08;

/// g per count
pub const G_PER_COUNT: f32 = 4.0 / 1024.0;

const AXES: AxisRegisters = AxisRegisters {
    x: (reg::DATAX1, reg::DATAX0),
    y: (reg::DATAY1, reg::DATAY0),
    z: (reg::DATAZ1, reg::DATAZ0),
};

/// Pmod ACL on one bus
pub struct PmodAcl;

impl PmodDevice for PmodAcl {
    const ENDPOINT: DeviceEndpoint = DeviceEndpoint::new(DeviceKind::Accelerometer, ACL_ADDRESS);

    fn configure<C: I2cController>(session: &mut Session<'_, C>) -> Result<(), Error> {
        session.modify_register(reg::POWER_CTL, |v| v | POWER_CTL_MEASURE)?;
        Ok(())
    }
}

impl PmodAcl {
    /// Take the accelerometer out of standby
    pub fn init<C: I2cController>(handler: &mut I2cHandler<C>, bus: BusId) -> Result<(), Error> {
        handler.init_device::<Self>(bus)
    }

    pub fn read_raw<C: I2cController>(
        handler: &mut I2cHandler<C>,
        bus: BusId,
    ) -> Result<RawAxes, Error> {
        read_axes(&mut handler.session(bus, Self::ENDPOINT)?, &AXES)
    }

    /// Acceleration on each axis in g
    pub fn read_acceleration<C: I2cController>(
        handler: &mut I2cHandler<C>,
        bus: BusId,
    ) -> Result<Axes, Error> {
        Self::read_raw(handler, bus).map(|raw| raw.scale(G_PER_COUNT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmodlink_core::sim::{BusEvent, SimController, SimDevice};

    fn handler() -> I2cHandler<SimController> {
        let mut sim = SimController::new();
        let mut acl = SimDevice::registers(BusId::I2C1, ACL_ADDRESS);
        acl.set_register(reg::POWER_CTL, 0x03);
        // x = 256, y = -256, z = 512
        acl.set_register(reg::DATAX1, 0x01);
        acl.set_register(reg::DATAY0, 0x00);
        acl.set_register(reg::DATAY1, 0xFF);
        acl.set_register(reg::DATAZ1, 0x02);
        sim.attach(acl);

        let mut handler = I2cHandler::new(sim);
        handler.initialize_bus(BusId::I2C1, 40_000_000).unwrap();
        handler
    }

    #[test]
    fn test_init_sets_measure_bit() {
        let mut handler = handler();
        PmodAcl::init(&mut handler, BusId::I2C1).unwrap();

        let acl = handler.controller().device(BusId::I2C1, ACL_ADDRESS).unwrap();
        assert_eq!(acl.register(reg::POWER_CTL), 0x0B);
    }

    #[test]
    fn test_read_acceleration() {
        let mut handler = handler();
        PmodAcl::init(&mut handler, BusId::I2C1).unwrap();

        assert_eq!(
            PmodAcl::read_acceleration(&mut handler, BusId::I2C1),
            Ok(Axes { x: 1.0, y: -1.0, z: 2.0 })
        );
    }

    #[test]
    fn test_high_register_read_first() {
        let mut handler = handler();
        PmodAcl::init(&mut handler, BusId::I2C1).unwrap();
        handler.controller_mut().clear_events();

        PmodAcl::read_raw(&mut handler, BusId::I2C1).unwrap();

        let registers: heapless::Vec<u8, 6> = handler
            .controller()
            .events()
            .windows(2)
            .filter_map(|w| match w {
                [BusEvent::Write { byte: 0x3A, .. }, BusEvent::Write { byte, .. }] => Some(*byte),
                _ => None,
            })
            .collect();
        assert_eq!(
            &registers[..],
            &[
                reg::DATAX1,
                reg::DATAX0,
                reg::DATAY1,
                reg::DATAY0,
                reg::DATAZ1,
                reg::DATAZ0,
            ]
        );
    }

    #[test]
    fn test_read_requires_init() {
        let mut handler = handler();
        assert_eq!(
            PmodAcl::read_acceleration(&mut handler, BusId::I2C1),
            Err(Error::DeviceNotInitialized)
        );
    }

    #[test]
    fn test_failure_gives_no_partial_sample() {
        let mut handler = handler();
        PmodAcl::init(&mut handler, BusId::I2C1).unwrap();
        handler.controller_mut().detach(BusId::I2C1, ACL_ADDRESS);

        assert_eq!(
            PmodAcl::read_acceleration(&mut handler, BusId::I2C1),
            Err(Error::NotAcknowledged)
        );
    }

    #[test]
    fn test_scale() {
        assert_eq!(256.0 * G_PER_COUNT, 1.0);
    }
}
