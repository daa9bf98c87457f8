//! Bus primitives
//!
//! Single bus conditions and single-byte transfers. None of these open or
//! close a transaction on their own; sequencing them correctly is up to
//! the register layer and the drivers.

use log::{trace, warn};
use pmodlink_hal::i2c::{BusId, I2cController};

use super::I2cHandler;
use crate::error::Error;

impl<C: I2cController> I2cHandler<C> {
    /// Issue a start condition, or a repeated start when `use_restart` is set
    ///
    /// A plain start first waits for the bus to go idle. A repeated start
    /// is only valid inside a transaction and skips that wait. Both then
    /// wait for the controller to report the condition. If that report
    /// never comes, a stop is requested before returning so the bus is
    /// not left held.
    pub fn start(&mut self, bus: BusId, use_restart: bool) -> Result<(), Error> {
        self.check(bus)?;

        let request = if use_restart {
            self.controller.repeat_start(bus)
        } else {
            self.wait_for(bus, "bus idle", |c, b| c.bus_is_idle(b))?;
            self.controller.start(bus)
        };

        if let Err(e) = request {
            trace!("I2C{}: start refused ({:?})", bus.index() + 1, e);
            return Err(Error::StartRejected);
        }

        let started = self.wait_for(bus, "start condition", |c, b| c.status(b).start_detected());
        if started.is_err() {
            self.controller.stop(bus);
        }
        started
    }

    /// Issue a stop condition and wait for it to complete
    pub fn stop(&mut self, bus: BusId) -> Result<(), Error> {
        self.check(bus)?;

        self.controller.stop(bus);
        self.wait_for(bus, "stop condition", |c, b| c.status(b).stop_detected())
    }

    /// Transmit one byte and check that it was acknowledged
    pub fn transmit_byte(&mut self, bus: BusId, byte: u8) -> Result<(), Error> {
        self.check(bus)?;

        self.wait_for(bus, "transmitter ready", |c, b| c.transmitter_is_ready(b))?;

        if let Err(e) = self.controller.send_byte(bus, byte) {
            warn!("I2C{}: send of 0x{:02X} refused ({:?})", bus.index() + 1, byte, e);
            return Err(Error::SendRejected);
        }

        self.wait_for(bus, "transmit complete", |c, b| {
            c.transmission_has_completed(b)
        })?;

        if !self.controller.byte_was_acknowledged(bus) {
            warn!("I2C{}: 0x{:02X} not acknowledged", bus.index() + 1, byte);
            return Err(Error::NotAcknowledged);
        }

        Ok(())
    }

    /// Receive one byte
    ///
    /// The device must already have been addressed with read intent in
    /// the current transaction, or no byte will ever arrive.
    pub fn receive_byte(&mut self, bus: BusId) -> Result<u8, Error> {
        self.check(bus)?;

        if self.controller.receiver_enable(bus, true).is_err() {
            warn!("I2C{}: receiver enable refused", bus.index() + 1);
            return Err(Error::ReceiverEnableFailed);
        }

        self.wait_for(bus, "received byte", |c, b| c.received_data_is_available(b))?;
        Ok(self.controller.get_byte(bus))
    }

    /// Transmit the first `count` bytes of `bytes`, in order
    ///
    /// Nothing is sent when `count` exceeds the buffer. The first byte
    /// that fails aborts the rest.
    pub fn transmit_bytes(&mut self, bus: BusId, bytes: &[u8], count: usize) -> Result<(), Error> {
        self.check(bus)?;

        let bytes = bytes.get(..count).ok_or(Error::InvalidLength)?;
        for &byte in bytes {
            self.transmit_byte(bus, byte)?;
        }

        Ok(())
    }
}
