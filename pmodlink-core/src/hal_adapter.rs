//! `embedded-hal` I2C bus over the transaction engine
//!
//! Lets generic `embedded-hal` 1.0 drivers share a controller with the
//! Pmod drivers. The adapter borrows the handler for its whole lifetime,
//! so its transactions cannot interleave with anything else.

use embedded_hal::i2c::{ErrorType, I2c, Operation};
use pmodlink_hal::i2c::{BusId, Direction, I2cController};

use crate::bus::I2cHandler;
use crate::error::Error;

/// One initialized controller as an [`embedded_hal::i2c::I2c`] bus
pub struct BusDevice<'a, C> {
    handler: &'a mut I2cHandler<C>,
    bus: BusId,
}

impl<'a, C: I2cController> BusDevice<'a, C> {
    /// Wrap `bus` of `handler`
    ///
    /// Fails with [`Error::InvalidModule`] for a controller the chip does
    /// not have, and with [`Error::DeviceNotInitialized`] if the bus has
    /// not been initialized yet.
    pub fn new(handler: &'a mut I2cHandler<C>, bus: BusId) -> Result<Self, Error> {
        handler.check(bus)?;
        if !handler.is_bus_initialized(bus) {
            return Err(Error::DeviceNotInitialized);
        }
        Ok(Self { handler, bus })
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }
}

impl<C: I2cController> ErrorType for BusDevice<'_, C> {
    type Error = Error;
}

impl<C: I2cController> I2c for BusDevice<'_, C> {
    /// Run `operations` as one transaction
    ///
    /// The address goes out after the start and again after a repeated
    /// start whenever the direction changes. Adjacent operations of the
    /// same kind are merged. The stop is issued even when an operation
    /// fails.
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if operations.is_empty() {
            return Ok(());
        }

        let bus = self.bus;
        self.handler.transaction(bus, |h| {
            let mut current: Option<Direction> = None;

            for op in operations.iter_mut() {
                let direction = match op {
                    Operation::Write(_) => Direction::Write,
                    Operation::Read(_) => Direction::Read,
                };

                if current != Some(direction) {
                    if current.is_some() {
                        h.restart(bus)?;
                    }
                    h.transmit_address(bus, address, direction)?;
                    current = Some(direction);
                }

                match op {
                    Operation::Write(bytes) => {
                        let bytes: &[u8] = bytes;
                        h.transmit_bytes(bus, bytes, bytes.len())?;
                    }
                    Operation::Read(buf) => {
                        for byte in buf.iter_mut() {
                            *byte = h.receive_byte(bus)?;
                        }
                    }
                }
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BusEvent, SimController, SimDevice};
    use embedded_hal::i2c::{Error as _, ErrorKind, NoAcknowledgeSource};

    const ADDR: u8 = 0x1D;

    fn handler() -> I2cHandler<SimController> {
        let mut sim = SimController::new();
        let mut device = SimDevice::registers(BusId::I2C1, ADDR);
        device.set_register(0x00, 0xE5);
        device.set_register(0x32, 0x11);
        device.set_register(0x33, 0x22);
        sim.attach(device);

        let mut handler = I2cHandler::new(sim);
        handler.initialize_bus(BusId::I2C1, 40_000_000).unwrap();
        handler.controller_mut().clear_events();
        handler
    }

    /// What a generic embedded-hal driver would do
    fn read_device_id<I: I2c>(i2c: &mut I) -> Result<u8, I::Error> {
        let mut id = [0u8; 1];
        i2c.write_read(ADDR, &[0x00], &mut id)?;
        Ok(id[0])
    }

    #[test]
    fn test_requires_initialized_bus() {
        let mut handler = I2cHandler::new(SimController::new());
        assert!(matches!(
            BusDevice::new(&mut handler, BusId::I2C1),
            Err(Error::DeviceNotInitialized)
        ));
        assert!(matches!(
            BusDevice::new(&mut handler, BusId::I2C3),
            Err(Error::InvalidModule)
        ));
    }

    #[test]
    fn test_generic_driver_write_read() {
        let mut handler = handler();
        let mut i2c = BusDevice::new(&mut handler, BusId::I2C1).unwrap();

        assert_eq!(read_device_id(&mut i2c), Ok(0xE5));
        assert_eq!(
            handler.controller().events(),
            &[
                BusEvent::Start,
                BusEvent::Write { byte: 0x3A, acked: true },
                BusEvent::Write { byte: 0x00, acked: true },
                BusEvent::RepeatedStart,
                BusEvent::Write { byte: 0x3B, acked: true },
                BusEvent::Read(0xE5),
                BusEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_adjacent_operations_merge() {
        let mut handler = handler();
        let mut i2c = BusDevice::new(&mut handler, BusId::I2C1).unwrap();

        let mut first = [0u8; 1];
        let mut second = [0u8; 1];
        i2c.transaction(
            ADDR,
            &mut [
                Operation::Write(&[0x32]),
                Operation::Read(&mut first),
                Operation::Read(&mut second),
            ],
        )
        .unwrap();

        assert_eq!((first[0], second[0]), (0x11, 0x22));
        let addressed = handler
            .controller()
            .events()
            .iter()
            .filter(|e| matches!(e, BusEvent::Write { byte: 0x3B, .. }))
            .count();
        assert_eq!(addressed, 1);
    }

    #[test]
    fn test_nack_maps_to_error_kind_and_stops() {
        let mut handler = handler();
        let mut i2c = BusDevice::new(&mut handler, BusId::I2C1).unwrap();

        let err = i2c.write(0x50, &[0x01]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)
        );
        assert_eq!(handler.controller().events().last(), Some(&BusEvent::Stop));
    }

    #[test]
    fn test_empty_transaction_is_silent() {
        let mut handler = handler();
        let mut i2c = BusDevice::new(&mut handler, BusId::I2C1).unwrap();

        i2c.transaction(ADDR, &mut []).unwrap();
        assert!(handler.controller().events().is_empty());
    }
}
