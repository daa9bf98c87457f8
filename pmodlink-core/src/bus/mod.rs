//! I2C transaction engine
//!
//! [`I2cHandler`] owns the chip's I2C controller and the initialization
//! records of every bus on it. Operations are layered:
//!
//! - `primitives`: start / restart / stop, byte transmit and receive
//! - `register`: transactions and register read/write
//! - [`Session`]: a view bound to one device on one bus
//!
//! Every wait on a controller status flag is a polling loop bounded by
//! [`HandlerConfig::poll_limit`]. The default limit is unbounded, so a
//! stalled bus blocks the caller until the hardware recovers.

mod primitives;
mod register;
mod session;

use log::{debug, info, warn};
use pmodlink_hal::i2c::{BusId, I2cController, MAX_CONTROLLERS};

use crate::config::HandlerConfig;
use crate::error::Error;
use crate::state::{ModuleState, ModuleTracker};
use crate::traits::{DeviceEndpoint, DeviceKind, PmodDevice};

pub use session::Session;

/// Owner of the I2C controllers and their initialization state
///
/// There is one handler per chip. It is built from the HAL controller
/// value, which is itself unique, so two handlers can never drive the same
/// physical controller.
pub struct I2cHandler<C> {
    controller: C,
    config: HandlerConfig,
    tracker: ModuleTracker,
}

impl<C: I2cController> I2cHandler<C> {
    /// Create a handler with the default configuration
    pub fn new(controller: C) -> Self {
        Self::with_config(controller, HandlerConfig::default())
    }

    /// Create a handler with an explicit configuration
    pub fn with_config(controller: C, config: HandlerConfig) -> Self {
        Self {
            controller,
            config,
            tracker: ModuleTracker::new(),
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Borrow the HAL controller
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Mutably borrow the HAL controller
    ///
    /// Requests issued this way bypass the engine's sequencing.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Give the controller back, dropping all initialization state
    pub fn release(self) -> C {
        self.controller
    }

    /// Whether `bus` names a controller present on this chip
    pub fn validate(&self, bus: BusId) -> bool {
        let present = (C::CONTROLLER_COUNT as usize).min(MAX_CONTROLLERS);
        bus.index() < present
    }

    pub(crate) fn check(&self, bus: BusId) -> Result<(), Error> {
        if self.validate(bus) {
            Ok(())
        } else {
            Err(Error::InvalidModule)
        }
    }

    /// Program the baud rate and enable the controller
    ///
    /// Only the first call for a bus touches the hardware; later calls
    /// return `Ok` without doing anything.
    ///
    /// # Arguments
    /// - `source_clock_hz`: Peripheral bus clock feeding the controller
    pub fn initialize_bus(&mut self, bus: BusId, source_clock_hz: u32) -> Result<(), Error> {
        self.check(bus)?;

        if self.tracker.is_bus_initialized(bus) {
            debug!("I2C{}: already initialized", bus.index() + 1);
            return Ok(());
        }

        let requested = self.config.i2c.frequency;
        let actual = self
            .controller
            .set_frequency(bus, source_clock_hz, requested);
        self.controller.enable(bus, true);
        self.tracker.mark_bus_initialized(bus, source_clock_hz, actual);

        if actual != requested {
            warn!(
                "I2C{}: requested {} Hz, controller runs at {} Hz",
                bus.index() + 1,
                requested,
                actual
            );
        }
        info!("I2C{}: enabled at {} Hz", bus.index() + 1, actual);

        Ok(())
    }

    pub fn is_bus_initialized(&self, bus: BusId) -> bool {
        self.tracker.is_bus_initialized(bus)
    }

    /// SCL frequency achieved at initialization
    pub fn bus_clock_hz(&self, bus: BusId) -> Option<u32> {
        self.tracker.module(bus).and_then(|m| m.bus_clock_hz())
    }

    pub fn is_device_initialized(&self, bus: BusId, kind: DeviceKind) -> bool {
        self.tracker.is_device_initialized(bus, kind)
    }

    /// Snapshot of a controller's initialization record
    pub fn module_state(&self, bus: BusId) -> Option<ModuleState> {
        if self.validate(bus) {
            self.tracker.module(bus)
        } else {
            None
        }
    }

    /// Initialize device `D` on `bus`
    ///
    /// Requires the bus to be initialized. The first call runs
    /// [`PmodDevice::configure`] and marks the device initialized only if
    /// configuration succeeded; later calls return `Ok` without bus traffic.
    pub fn init_device<D: PmodDevice>(&mut self, bus: BusId) -> Result<(), Error> {
        self.check(bus)?;

        if !self.tracker.is_bus_initialized(bus) {
            return Err(Error::DeviceNotInitialized);
        }

        let endpoint = D::ENDPOINT;
        if self.tracker.is_device_initialized(bus, endpoint.kind) {
            debug!(
                "I2C{}: {:?} already initialized",
                bus.index() + 1,
                endpoint.kind
            );
            return Ok(());
        }

        D::configure(&mut Session::new(self, bus, endpoint))?;
        self.tracker.mark_device_initialized(bus, endpoint.kind);

        info!(
            "I2C{}: {:?} at 0x{:02X} initialized",
            bus.index() + 1,
            endpoint.kind,
            endpoint.address
        );
        Ok(())
    }

    /// Open a session with an initialized device
    ///
    /// Fails before any bus traffic if the bus is invalid or the device
    /// has not been initialized on it.
    pub fn session(
        &mut self,
        bus: BusId,
        endpoint: DeviceEndpoint,
    ) -> Result<Session<'_, C>, Error> {
        self.check(bus)?;

        if !self.tracker.is_device_initialized(bus, endpoint.kind) {
            return Err(Error::DeviceNotInitialized);
        }

        Ok(Session::new(self, bus, endpoint))
    }

    /// Poll until `ready` reports true or the poll limit runs out
    fn wait_for(
        &mut self,
        bus: BusId,
        what: &'static str,
        mut ready: impl FnMut(&mut C, BusId) -> bool,
    ) -> Result<(), Error> {
        let mut failures: u32 = 0;

        while !ready(&mut self.controller, bus) {
            failures = failures.saturating_add(1);
            if self.config.poll_limit.is_exhausted(failures) {
                warn!(
                    "I2C{}: timed out waiting for {}",
                    bus.index() + 1,
                    what
                );
                return Err(Error::Timeout);
            }
            core::hint::spin_loop();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BusEvent, SimController, SimDevice};
    use proptest::prelude::*;

    const PB_CLOCK: u32 = 40_000_000;

    struct Echo;

    impl PmodDevice for Echo {
        const ENDPOINT: DeviceEndpoint = DeviceEndpoint::new(DeviceKind::Accelerometer, 0x1D);
    }

    /// Writes one configuration register
    struct Configured;

    impl PmodDevice for Configured {
        const ENDPOINT: DeviceEndpoint = DeviceEndpoint::new(DeviceKind::Gyroscope, 0x69);

        fn configure<C: I2cController>(session: &mut Session<'_, C>) -> Result<(), Error> {
            session.write_register(0x20, 0x0F)
        }
    }

    fn handler() -> I2cHandler<SimController> {
        let mut sim = SimController::new();
        sim.attach(SimDevice::registers(BusId::I2C1, 0x1D));
        I2cHandler::new(sim)
    }

    proptest! {
        #[test]
        fn validate_accepts_exactly_present_controllers(index in any::<u8>()) {
            let handler = handler();
            let bus = BusId::new(index);
            prop_assert_eq!(handler.validate(bus), index < SimController::CONTROLLERS);
        }
    }

    #[test]
    fn test_invalid_module_everywhere() {
        let mut handler = handler();
        let bogus = BusId::I2C5;

        assert_eq!(handler.initialize_bus(bogus, PB_CLOCK), Err(Error::InvalidModule));
        assert_eq!(handler.init_device::<Echo>(bogus), Err(Error::InvalidModule));
        assert_eq!(handler.start(bogus, false), Err(Error::InvalidModule));
        assert_eq!(handler.stop(bogus), Err(Error::InvalidModule));
        assert_eq!(handler.transmit_byte(bogus, 0), Err(Error::InvalidModule));
        assert_eq!(handler.receive_byte(bogus), Err(Error::InvalidModule));
        assert!(handler.module_state(bogus).is_none());
        assert!(handler.controller().events().is_empty());
    }

    #[test]
    fn test_initialize_bus_is_idempotent() {
        let mut handler = handler();

        assert_eq!(handler.initialize_bus(BusId::I2C1, PB_CLOCK), Ok(()));
        let after_first = handler.module_state(BusId::I2C1);
        assert_eq!(handler.controller().frequency_writes(), 1);

        assert_eq!(handler.initialize_bus(BusId::I2C1, 80_000_000), Ok(()));
        assert_eq!(handler.module_state(BusId::I2C1), after_first);
        assert_eq!(handler.controller().frequency_writes(), 1);

        assert!(handler.controller().is_enabled(BusId::I2C1));
        assert_eq!(handler.bus_clock_hz(BusId::I2C1), Some(100_000));
        assert!(!handler.is_bus_initialized(BusId::I2C2));
    }

    #[test]
    fn test_init_device_requires_bus() {
        let mut handler = handler();
        assert_eq!(
            handler.init_device::<Echo>(BusId::I2C1),
            Err(Error::DeviceNotInitialized)
        );
        assert!(!handler.is_device_initialized(BusId::I2C1, DeviceKind::Accelerometer));
    }

    #[test]
    fn test_init_device_is_idempotent() {
        let mut handler = handler();
        handler.initialize_bus(BusId::I2C1, PB_CLOCK).unwrap();

        assert_eq!(handler.init_device::<Echo>(BusId::I2C1), Ok(()));
        let after_first = handler.module_state(BusId::I2C1);
        assert_eq!(handler.init_device::<Echo>(BusId::I2C1), Ok(()));

        assert_eq!(handler.module_state(BusId::I2C1), after_first);
        assert!(handler.is_device_initialized(BusId::I2C1, DeviceKind::Accelerometer));
        assert!(!handler.is_device_initialized(BusId::I2C2, DeviceKind::Accelerometer));
    }

    #[test]
    fn test_failed_configuration_leaves_device_uninitialized() {
        // Nothing answers at the gyroscope address
        let mut handler = handler();
        handler.initialize_bus(BusId::I2C1, PB_CLOCK).unwrap();

        assert_eq!(
            handler.init_device::<Configured>(BusId::I2C1),
            Err(Error::NotAcknowledged)
        );
        assert!(!handler.is_device_initialized(BusId::I2C1, DeviceKind::Gyroscope));

        handler
            .controller_mut()
            .attach(SimDevice::registers(BusId::I2C1, 0x69));
        assert_eq!(handler.init_device::<Configured>(BusId::I2C1), Ok(()));
        assert!(handler.is_device_initialized(BusId::I2C1, DeviceKind::Gyroscope));
        assert_eq!(
            handler.controller().device(BusId::I2C1, 0x69).unwrap().register(0x20),
            0x0F
        );
    }

    #[test]
    fn test_session_requires_device_and_makes_no_traffic() {
        let mut handler = handler();
        handler.initialize_bus(BusId::I2C1, PB_CLOCK).unwrap();

        assert!(matches!(
            handler.session(BusId::I2C1, Echo::ENDPOINT),
            Err(Error::DeviceNotInitialized)
        ));
        assert!(!handler
            .controller()
            .events()
            .iter()
            .any(|e| matches!(e, BusEvent::Start)));
    }

    #[test]
    fn test_release_returns_controller() {
        let mut handler = handler();
        handler.initialize_bus(BusId::I2C1, PB_CLOCK).unwrap();
        let sim = handler.release();
        assert!(sim.is_enabled(BusId::I2C1));
    }
}
