//! Device-bound view of the handler

use pmodlink_hal::i2c::{BusId, Direction, I2cController};

use super::I2cHandler;
use crate::error::Error;
use crate::traits::DeviceEndpoint;

/// Exclusive access to one device on one bus
///
/// Obtained from [`I2cHandler::session`], which checks that the device is
/// initialized, or handed to [`PmodDevice::configure`](crate::PmodDevice::configure)
/// during initialization. Holding a session borrows the whole handler, so
/// nothing else can interleave with its transactions.
pub struct Session<'a, C> {
    handler: &'a mut I2cHandler<C>,
    bus: BusId,
    endpoint: DeviceEndpoint,
}

impl<'a, C: I2cController> Session<'a, C> {
    pub(crate) fn new(
        handler: &'a mut I2cHandler<C>,
        bus: BusId,
        endpoint: DeviceEndpoint,
    ) -> Self {
        Self {
            handler,
            bus,
            endpoint,
        }
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }

    pub fn endpoint(&self) -> DeviceEndpoint {
        self.endpoint
    }

    /// Read one register using the write-pointer / restart / read idiom
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error> {
        self.handler.read_register_unchecked(self.bus, self.endpoint.address, register)
    }

    /// Write one register
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error> {
        self.handler
            .write_register_unchecked(self.bus, self.endpoint.address, register, value)
    }

    /// Read a register, pass it through `f`, and write the result back
    ///
    /// Returns the value written.
    pub fn modify_register(&mut self, register: u8, f: impl FnOnce(u8) -> u8) -> Result<u8, Error> {
        let value = f(self.read_register(register)?);
        self.write_register(register, value)?;
        Ok(value)
    }

    /// Read a big-endian 16-bit value from a high and a low register
    ///
    /// The high register is read first; each byte is its own register
    /// transaction.
    pub fn read_register_pair(&mut self, high: u8, low: u8) -> Result<i16, Error> {
        let hi = self.read_register(high)?;
        let lo = self.read_register(low)?;
        Ok(i16::from_be_bytes([hi, lo]))
    }

    /// Send `chunks` back to back in one write transaction
    ///
    /// start, address+W, every byte of every chunk, stop.
    pub fn write_chunks(&mut self, chunks: &[&[u8]]) -> Result<(), Error> {
        self.transaction(|tx| {
            tx.transmit_address(Direction::Write)?;
            for chunk in chunks {
                tx.transmit(chunk)?;
            }
            Ok(())
        })
    }

    /// Fill `buf` from the device in one read transaction
    ///
    /// start, address+R, one receive per byte, stop. For devices that
    /// stream their data without a register pointer.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.transaction(|tx| {
            tx.transmit_address(Direction::Read)?;
            for byte in buf.iter_mut() {
                *byte = tx.receive()?;
            }
            Ok(())
        })
    }

    /// Run `body` between a start and a stop, see [`I2cHandler::transaction`]
    pub fn transaction<T>(
        &mut self,
        body: impl FnOnce(&mut Session<'_, C>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let bus = self.bus;
        let endpoint = self.endpoint;
        self.handler.transaction(bus, |handler| body(&mut Session::new(handler, bus, endpoint)))
    }

    /// Address the device with the given intent
    pub fn transmit_address(&mut self, direction: Direction) -> Result<(), Error> {
        self.handler.transmit_address(self.bus, self.endpoint.address, direction)
    }

    /// Transmit every byte of `bytes`
    pub fn transmit(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.handler.transmit_bytes(self.bus, bytes, bytes.len())
    }

    /// Receive one byte
    pub fn receive(&mut self) -> Result<u8, Error> {
        self.handler.receive_byte(self.bus)
    }

    /// Chain a repeated start
    pub fn restart(&mut self) -> Result<(), Error> {
        self.handler.restart(self.bus)
    }

    /// Issue a stop condition outside of [`Session::transaction`]
    pub fn stop(&mut self) -> Result<(), Error> {
        self.handler.stop(self.bus)
    }
}
