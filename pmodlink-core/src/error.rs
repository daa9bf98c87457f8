//! Error taxonomy for bus and device operations

use core::fmt;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

/// Errors reported by the transaction engine and the drivers built on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The bus identifier names a controller the chip does not have
    InvalidModule,
    /// The addressed device did not acknowledge a transmitted byte
    NotAcknowledged,
    /// The controller refused to enable its byte receiver
    ReceiverEnableFailed,
    /// A transmit length exceeds the source buffer
    InvalidLength,
    /// The bus or device has not completed its initialization step
    DeviceNotInitialized,
    /// A status flag did not come up within the configured poll limit
    Timeout,
    /// The controller refused a start or repeated start request
    StartRejected,
    /// The controller refused to load a byte for transmission
    SendRejected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidModule => "I2C controller not present on this chip",
            Error::NotAcknowledged => "device did not acknowledge",
            Error::ReceiverEnableFailed => "receiver enable refused",
            Error::InvalidLength => "transmit length exceeds buffer",
            Error::DeviceNotInitialized => "bus or device not initialized",
            Error::Timeout => "timed out waiting for controller",
            Error::StartRejected => "start condition request refused",
            Error::SendRejected => "transmit request refused",
        };
        f.write_str(msg)
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::NotAcknowledged => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            Error::StartRejected | Error::SendRejected => ErrorKind::ArbitrationLoss,
            Error::ReceiverEnableFailed => ErrorKind::Overrun,
            _ => ErrorKind::Other,
        }
    }
}
