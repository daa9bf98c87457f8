//! Transactions and register access
//!
//! A transaction is start, transfers, stop. The stop is issued on every
//! exit path once the start has gone out, so a failed transfer never
//! leaves the bus held.

use log::trace;
use pmodlink_hal::i2c::{address_byte, BusId, Direction, I2cController};

use super::I2cHandler;
use crate::error::Error;
use crate::traits::DeviceEndpoint;

impl<C: I2cController> I2cHandler<C> {
    /// Run `body` between a start and a stop condition
    ///
    /// The opening start is retried while the controller refuses it, up to
    /// [`HandlerConfig::start_retries`](crate::HandlerConfig::start_retries).
    /// If `body` fails the stop is still issued and `body`'s error is
    /// returned.
    pub fn transaction<T>(
        &mut self,
        bus: BusId,
        body: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.begin(bus, false)?;

        let result = body(self);
        let stopped = self.stop(bus);

        let value = result?;
        stopped?;
        Ok(value)
    }

    /// Chain a repeated start inside the current transaction
    pub fn restart(&mut self, bus: BusId) -> Result<(), Error> {
        self.begin(bus, true)
    }

    /// Transmit the address byte for `address` with the given intent
    pub fn transmit_address(
        &mut self,
        bus: BusId,
        address: u8,
        direction: Direction,
    ) -> Result<(), Error> {
        self.transmit_byte(bus, address_byte(address, direction))
    }

    /// Write one register of an initialized device
    ///
    /// start, address+W, register, value, stop.
    pub fn write_register(
        &mut self,
        bus: BusId,
        endpoint: DeviceEndpoint,
        register: u8,
        value: u8,
    ) -> Result<(), Error> {
        self.session(bus, endpoint)?.write_register(register, value)
    }

    /// Read one register of an initialized device
    ///
    /// start, address+W, register, restart, address+R, receive, stop.
    pub fn read_register(
        &mut self,
        bus: BusId,
        endpoint: DeviceEndpoint,
        register: u8,
    ) -> Result<u8, Error> {
        self.session(bus, endpoint)?.read_register(register)
    }

    pub(crate) fn write_register_unchecked(
        &mut self,
        bus: BusId,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Error> {
        self.transaction(bus, |h| {
            h.transmit_address(bus, address, Direction::Write)?;
            h.transmit_byte(bus, register)?;
            h.transmit_byte(bus, value)
        })
    }

    pub(crate) fn read_register_unchecked(
        &mut self,
        bus: BusId,
        address: u8,
        register: u8,
    ) -> Result<u8, Error> {
        self.transaction(bus, |h| {
            h.transmit_address(bus, address, Direction::Write)?;
            h.transmit_byte(bus, register)?;
            h.restart(bus)?;
            h.transmit_address(bus, address, Direction::Read)?;
            h.receive_byte(bus)
        })
    }

    fn begin(&mut self, bus: BusId, use_restart: bool) -> Result<(), Error> {
        let mut refusals: u32 = 0;

        loop {
            match self.start(bus, use_restart) {
                Err(Error::StartRejected) => {
                    refusals = refusals.saturating_add(1);
                    if self.config.start_retries.is_exhausted(refusals) {
                        return Err(Error::StartRejected);
                    }
                    trace!("I2C{}: retrying start ({})", bus.index() + 1, refusals);
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{HandlerConfig, PollLimit};
    use crate::error::Error;
    use crate::sim::{BusEvent, SimController, SimDevice};
    use crate::traits::{DeviceEndpoint, DeviceKind, PmodDevice};
    use crate::I2cHandler;
    use pmodlink_hal::i2c::BusId;

    const ADDR: u8 = 0x1D;

    struct Echo;

    impl PmodDevice for Echo {
        const ENDPOINT: DeviceEndpoint = DeviceEndpoint::new(DeviceKind::Accelerometer, ADDR);
    }

    fn handler(config: HandlerConfig) -> I2cHandler<SimController> {
        let mut sim = SimController::new();
        sim.attach(SimDevice::registers(BusId::I2C1, ADDR));
        let mut handler = I2cHandler::with_config(sim, config);
        handler.initialize_bus(BusId::I2C1, 40_000_000).unwrap();
        handler
    }

    fn initialized(config: HandlerConfig) -> I2cHandler<SimController> {
        let mut handler = handler(config);
        handler.init_device::<Echo>(BusId::I2C1).unwrap();
        handler.controller_mut().clear_events();
        handler
    }

    #[test]
    fn test_write_then_read_returns_value() {
        let mut handler = initialized(HandlerConfig::default());

        handler
            .write_register(BusId::I2C1, Echo::ENDPOINT, 0x2D, 0xA5)
            .unwrap();
        assert_eq!(
            handler.read_register(BusId::I2C1, Echo::ENDPOINT, 0x2D),
            Ok(0xA5)
        );
    }

    #[test]
    fn test_read_register_sequence() {
        let mut handler = initialized(HandlerConfig::default());
        handler
            .controller_mut()
            .device_mut(BusId::I2C1, ADDR)
            .unwrap()
            .set_register(0x32, 0x7E);

        handler.read_register(BusId::I2C1, Echo::ENDPOINT, 0x32).unwrap();

        assert_eq!(
            handler.controller().events(),
            &[
                BusEvent::Start,
                BusEvent::Write { byte: 0x3A, acked: true },
                BusEvent::Write { byte: 0x32, acked: true },
                BusEvent::RepeatedStart,
                BusEvent::Write { byte: 0x3B, acked: true },
                BusEvent::Read(0x7E),
                BusEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_write_register_sequence() {
        let mut handler = initialized(HandlerConfig::default());

        handler
            .write_register(BusId::I2C1, Echo::ENDPOINT, 0x2D, 0x08)
            .unwrap();

        assert_eq!(
            handler.controller().events(),
            &[
                BusEvent::Start,
                BusEvent::Write { byte: 0x3A, acked: true },
                BusEvent::Write { byte: 0x2D, acked: true },
                BusEvent::Write { byte: 0x08, acked: true },
                BusEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_register_access_before_init_makes_no_traffic() {
        let mut handler = handler(HandlerConfig::default());

        assert_eq!(
            handler.write_register(BusId::I2C1, Echo::ENDPOINT, 0x2D, 0x08),
            Err(Error::DeviceNotInitialized)
        );
        assert_eq!(
            handler.read_register(BusId::I2C1, Echo::ENDPOINT, 0x2D),
            Err(Error::DeviceNotInitialized)
        );
        assert!(handler.controller().events().is_empty());
    }

    #[test]
    fn test_register_access_on_invalid_bus() {
        let mut handler = initialized(HandlerConfig::default());
        assert_eq!(
            handler.read_register(BusId::I2C4, Echo::ENDPOINT, 0x2D),
            Err(Error::InvalidModule)
        );
    }

    #[test]
    fn test_stop_issued_when_device_missing() {
        let mut handler = initialized(HandlerConfig::default());
        handler.controller_mut().detach(BusId::I2C1, ADDR);

        assert_eq!(
            handler.read_register(BusId::I2C1, Echo::ENDPOINT, 0x2D),
            Err(Error::NotAcknowledged)
        );
        assert_eq!(
            handler.controller().events(),
            &[
                BusEvent::Start,
                BusEvent::Write { byte: 0x3A, acked: false },
                BusEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_stop_issued_when_receive_fails() {
        let mut handler = initialized(HandlerConfig::default());
        handler.controller_mut().refuse_receiver(true);

        assert_eq!(
            handler.read_register(BusId::I2C1, Echo::ENDPOINT, 0x2D),
            Err(Error::ReceiverEnableFailed)
        );
        assert_eq!(handler.controller().events().last(), Some(&BusEvent::Stop));
    }

    #[test]
    fn test_start_refusals_are_retried() {
        let mut handler = initialized(HandlerConfig::default());
        handler.controller_mut().reject_starts(3);

        handler
            .write_register(BusId::I2C1, Echo::ENDPOINT, 0x2D, 0x01)
            .unwrap();
        assert_eq!(handler.controller().rejected_starts(), 3);
    }

    #[test]
    fn test_start_retry_limit() {
        let config = HandlerConfig {
            start_retries: PollLimit::Iterations(2),
            ..HandlerConfig::default()
        };
        let mut handler = initialized(config);
        handler.controller_mut().reject_starts(5);

        assert_eq!(
            handler.write_register(BusId::I2C1, Echo::ENDPOINT, 0x2D, 0x01),
            Err(Error::StartRejected)
        );
        assert!(handler.controller().events().is_empty());
    }

    #[test]
    fn test_unreported_start_is_stopped() {
        let mut handler = initialized(HandlerConfig::bounded(8));
        handler.controller_mut().mask_start(true);

        assert_eq!(
            handler.write_register(BusId::I2C1, Echo::ENDPOINT, 0x2D, 0x01),
            Err(Error::Timeout)
        );
        assert_eq!(
            handler.controller().events(),
            &[BusEvent::Start, BusEvent::Stop]
        );

        // The bus is free again once the controller reports starts
        handler.controller_mut().mask_start(false);
        handler
            .write_register(BusId::I2C1, Echo::ENDPOINT, 0x2D, 0x01)
            .unwrap();
        assert_eq!(handler.controller().events().last(), Some(&BusEvent::Stop));
    }

    #[test]
    fn test_transaction_returns_body_error_after_stop() {
        let mut handler = initialized(HandlerConfig::default());

        let result: Result<(), Error> =
            handler.transaction(BusId::I2C1, |_| Err(Error::InvalidLength));

        assert_eq!(result, Err(Error::InvalidLength));
        assert_eq!(
            handler.controller().events(),
            &[BusEvent::Start, BusEvent::Stop]
        );
    }
}
