//! I2C master controller abstractions
//!
//! The trait mirrors the request/status interface of a typical
//! microcontroller I2C master peripheral: every bus condition is requested
//! separately and its completion is observed by polling a status flag.
//! No method here blocks; waiting is the caller's job.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest number of I2C controllers any supported chip carries
pub const MAX_CONTROLLERS: usize = 5;

/// Identifies one physical I2C controller on the chip
///
/// A `BusId` is only an index; whether the controller exists is decided by
/// [`I2cController::CONTROLLER_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusId(u8);

impl BusId {
    pub const I2C1: Self = Self(0);
    pub const I2C2: Self = Self(1);
    pub const I2C3: Self = Self(2);
    pub const I2C4: Self = Self(3);
    pub const I2C5: Self = Self(4);

    /// Create a bus identifier from a zero-based controller index
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Zero-based controller index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Transfer direction encoded in the R/W bit of an address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Write,
    Read,
}

/// Format a 7-bit device address and direction into the first byte of a
/// transfer
pub const fn address_byte(address: u8, direction: Direction) -> u8 {
    let rw = match direction {
        Direction::Write => 0,
        Direction::Read => 1,
    };
    (address << 1) | rw
}

/// Reasons a controller refuses a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Another master or a glitch drove the bus while we owned it
    MasterBusCollision,
    /// The receive buffer still holds an unread byte
    ReceiveOverflow,
    /// The controller is in a state where the request is not allowed
    Rejected,
}

/// Snapshot of the controller's event flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStatus {
    bits: u8,
}

impl BusStatus {
    /// A start (or repeated start) condition was detected
    pub const START: u8 = 1 << 0;
    /// A stop condition was detected
    pub const STOP: u8 = 1 << 1;

    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    pub const fn bits(self) -> u8 {
        self.bits
    }

    pub const fn start_detected(self) -> bool {
        self.bits & Self::START != 0
    }

    pub const fn stop_detected(self) -> bool {
        self.bits & Self::STOP != 0
    }
}

/// I2C master controller
///
/// One implementation covers every I2C controller of a chip; each request
/// names the controller it targets. Implementations may assume `bus` has
/// already been validated against [`Self::CONTROLLER_COUNT`].
pub trait I2cController {
    /// Number of I2C controllers physically present (at most
    /// [`MAX_CONTROLLERS`])
    const CONTROLLER_COUNT: u8;

    /// Program the baud rate generator
    ///
    /// Returns the bus clock actually achieved, which may differ from the
    /// requested one because of divider rounding.
    fn set_frequency(&mut self, bus: BusId, source_clock_hz: u32, bus_clock_hz: u32) -> u32;

    /// Enable or disable the controller
    fn enable(&mut self, bus: BusId, enabled: bool);

    /// Whether no transfer is in progress on the bus
    fn bus_is_idle(&mut self, bus: BusId) -> bool;

    /// Request a start condition
    fn start(&mut self, bus: BusId) -> Result<(), RequestError>;

    /// Request a repeated start condition
    fn repeat_start(&mut self, bus: BusId) -> Result<(), RequestError>;

    /// Request a stop condition
    fn stop(&mut self, bus: BusId);

    /// Read the event flags
    fn status(&mut self, bus: BusId) -> BusStatus;

    /// Whether the transmit buffer can accept a byte
    fn transmitter_is_ready(&mut self, bus: BusId) -> bool;

    /// Load a byte into the transmit buffer
    fn send_byte(&mut self, bus: BusId, byte: u8) -> Result<(), RequestError>;

    /// Whether the last byte has been shifted out and the ACK slot sampled
    fn transmission_has_completed(&mut self, bus: BusId) -> bool;

    /// Whether the addressed device acknowledged the last byte
    fn byte_was_acknowledged(&mut self, bus: BusId) -> bool;

    /// Enable or disable the byte receiver
    fn receiver_enable(&mut self, bus: BusId, enabled: bool) -> Result<(), RequestError>;

    /// Whether a received byte is waiting in the receive buffer
    fn received_data_is_available(&mut self, bus: BusId) -> bool;

    /// Take the received byte
    fn get_byte(&mut self, bus: BusId) -> u8;
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };
}
