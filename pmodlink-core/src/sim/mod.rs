//! In-memory I2C controller for host testing
//!
//! [`SimController`] implements [`I2cController`] with two controllers and
//! any number of attached [`SimDevice`]s (up to [`MAX_SIM_DEVICES`]). Every
//! bus condition and byte is recorded as a [`BusEvent`], so tests can
//! assert exact wire sequences. Faults (refused starts, a refused
//! receiver, a stalled bus) can be switched on to drive the error paths.
//!
//! Status flags complete immediately unless the bus is stalled.
//!
//! Requests on a bus the simulated chip does not have are refused, and
//! its status queries report nothing ready.

mod device;

use heapless::Vec;
use pmodlink_hal::i2c::{BusId, BusStatus, Direction, I2cController, RequestError};

pub use device::{SimDevice, SimMode, MAX_RECEIVED_LEN, MAX_STREAM_LEN};

/// Devices one simulator can hold across all buses
pub const MAX_SIM_DEVICES: usize = 8;

/// Events kept before further ones are dropped
pub const MAX_EVENTS: usize = 512;

const LINES: usize = 2;

/// Something that happened on a simulated bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    RepeatedStart,
    Stop,
    /// A byte went out and was (or was not) acknowledged
    Write { byte: u8, acked: bool },
    /// A byte was taken from the receive buffer
    Read(u8),
}

#[derive(Debug, Clone, Copy, Default)]
struct Line {
    enabled: bool,
    frequency_hz: u32,
    open: bool,
    expect_address: bool,
    selected: Option<(usize, Direction)>,
    status: BusStatus,
    acked: bool,
    pending: Option<u8>,
}

/// Simulated two-controller chip
#[derive(Debug)]
pub struct SimController {
    lines: [Line; LINES],
    devices: Vec<SimDevice, MAX_SIM_DEVICES>,
    events: Vec<BusEvent, MAX_EVENTS>,
    frequency_writes: u32,
    starts_to_reject: u32,
    rejected_starts: u32,
    receiver_refused: bool,
    stalled: bool,
    start_masked: bool,
}

impl Default for SimController {
    fn default() -> Self {
        Self::new()
    }
}

impl SimController {
    /// Controllers present on the simulated chip
    pub const CONTROLLERS: u8 = LINES as u8;

    pub fn new() -> Self {
        Self {
            lines: [Line::default(); LINES],
            devices: Vec::new(),
            events: Vec::new(),
            frequency_writes: 0,
            starts_to_reject: 0,
            rejected_starts: 0,
            receiver_refused: false,
            stalled: false,
            start_masked: false,
        }
    }

    /// Attach a device, replacing one already at the same bus and address
    ///
    /// Once [`MAX_SIM_DEVICES`] are attached, further devices are dropped.
    pub fn attach(&mut self, device: SimDevice) {
        match self.position(device.bus(), device.address()) {
            Some(i) => self.devices[i] = device,
            None => {
                let _ = self.devices.push(device);
            }
        }
    }

    /// Remove a device; later transfers to its address are not acknowledged
    pub fn detach(&mut self, bus: BusId, address: u8) -> Option<SimDevice> {
        let i = self.position(bus, address)?;
        for line in self.lines.iter_mut() {
            line.selected = None;
        }
        Some(self.devices.swap_remove(i))
    }

    pub fn device(&self, bus: BusId, address: u8) -> Option<&SimDevice> {
        self.devices
            .iter()
            .find(|d| d.bus() == bus && d.address() == address)
    }

    pub fn device_mut(&mut self, bus: BusId, address: u8) -> Option<&mut SimDevice> {
        self.devices
            .iter_mut()
            .find(|d| d.bus() == bus && d.address() == address)
    }

    /// Everything recorded since creation or the last [`Self::clear_events`]
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Number of baud rate generator writes
    pub fn frequency_writes(&self) -> u32 {
        self.frequency_writes
    }

    pub fn is_enabled(&self, bus: BusId) -> bool {
        self.lines.get(bus.index()).is_some_and(|l| l.enabled)
    }

    /// SCL frequency last programmed on `bus`
    pub fn frequency_hz(&self, bus: BusId) -> Option<u32> {
        self.lines.get(bus.index()).map(|l| l.frequency_hz)
    }

    /// Refuse the next `count` start and repeated start requests
    pub fn reject_starts(&mut self, count: u32) {
        self.starts_to_reject = count;
    }

    /// Start requests refused so far
    pub fn rejected_starts(&self) -> u32 {
        self.rejected_starts
    }

    /// Refuse every receiver enable request while set
    pub fn refuse_receiver(&mut self, refused: bool) {
        self.receiver_refused = refused;
    }

    /// While set, no status flag ever becomes ready
    pub fn stall(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    /// While set, status never reports a completed start condition
    pub fn mask_start(&mut self, masked: bool) {
        self.start_masked = masked;
    }

    fn position(&self, bus: BusId, address: u8) -> Option<usize> {
        self.devices
            .iter()
            .position(|d| d.bus() == bus && d.address() == address)
    }

    fn record(&mut self, event: BusEvent) {
        let _ = self.events.push(event);
    }

    fn take_rejection(&mut self) -> bool {
        if self.starts_to_reject == 0 {
            return false;
        }
        self.starts_to_reject -= 1;
        self.rejected_starts = self.rejected_starts.saturating_add(1);
        true
    }

    fn line(&self, bus: BusId) -> Option<&Line> {
        self.lines.get(bus.index())
    }

    fn begin(&mut self, bus: BusId, event: BusEvent) -> Result<(), RequestError> {
        let line = self
            .lines
            .get_mut(bus.index())
            .ok_or(RequestError::Rejected)?;
        line.open = true;
        line.expect_address = true;
        line.selected = None;
        line.pending = None;
        line.status = BusStatus::from_bits(BusStatus::START);
        self.record(event);
        Ok(())
    }

    fn address(&mut self, bus: BusId, byte: u8) -> bool {
        let direction = if byte & 1 == 0 {
            Direction::Write
        } else {
            Direction::Read
        };
        let selected = self.position(bus, byte >> 1);

        if let Some(i) = selected {
            match direction {
                Direction::Write => self.devices[i].begin_write(),
                Direction::Read => self.devices[i].begin_read(),
            }
        }

        if let Some(line) = self.lines.get_mut(bus.index()) {
            line.expect_address = false;
            line.selected = selected.map(|i| (i, direction));
        }
        selected.is_some()
    }
}

impl I2cController for SimController {
    const CONTROLLER_COUNT: u8 = Self::CONTROLLERS;

    fn set_frequency(&mut self, bus: BusId, source_clock_hz: u32, bus_clock_hz: u32) -> u32 {
        let Some(line) = self.lines.get_mut(bus.index()) else {
            return 0;
        };
        self.frequency_writes += 1;

        // BRG = Fpb / (2 * Fsck) - 2, then Fsck = Fpb / (2 * (BRG + 2))
        let actual = match bus_clock_hz {
            0 => 0,
            hz => {
                let brg = (source_clock_hz / (2 * hz)).saturating_sub(2);
                source_clock_hz / (2 * (brg + 2))
            }
        };
        line.frequency_hz = actual;
        actual
    }

    fn enable(&mut self, bus: BusId, enabled: bool) {
        if let Some(line) = self.lines.get_mut(bus.index()) {
            line.enabled = enabled;
        }
    }

    fn bus_is_idle(&mut self, bus: BusId) -> bool {
        !self.stalled && self.line(bus).is_some_and(|l| !l.open)
    }

    fn start(&mut self, bus: BusId) -> Result<(), RequestError> {
        if self.line(bus).is_none() {
            return Err(RequestError::Rejected);
        }
        if self.take_rejection() {
            return Err(RequestError::MasterBusCollision);
        }
        self.begin(bus, BusEvent::Start)
    }

    fn repeat_start(&mut self, bus: BusId) -> Result<(), RequestError> {
        if !self.line(bus).is_some_and(|l| l.open) {
            return Err(RequestError::Rejected);
        }
        if self.take_rejection() {
            return Err(RequestError::MasterBusCollision);
        }
        self.begin(bus, BusEvent::RepeatedStart)
    }

    fn stop(&mut self, bus: BusId) {
        if let Some(line) = self.lines.get_mut(bus.index()) {
            line.open = false;
            line.expect_address = false;
            line.selected = None;
            line.pending = None;
            line.status = BusStatus::from_bits(BusStatus::STOP);
            self.record(BusEvent::Stop);
        }
    }

    fn status(&mut self, bus: BusId) -> BusStatus {
        match self.line(bus) {
            Some(_) if self.stalled => BusStatus::default(),
            Some(line) if self.start_masked => {
                BusStatus::from_bits(line.status.bits() & !BusStatus::START)
            }
            Some(line) => line.status,
            None => BusStatus::default(),
        }
    }

    fn transmitter_is_ready(&mut self, bus: BusId) -> bool {
        !self.stalled && self.line(bus).is_some()
    }

    fn send_byte(&mut self, bus: BusId, byte: u8) -> Result<(), RequestError> {
        let line = match self.line(bus) {
            Some(line) if line.open => *line,
            _ => return Err(RequestError::Rejected),
        };

        let acked = if line.expect_address {
            self.address(bus, byte)
        } else {
            match line.selected {
                Some((i, Direction::Write)) => {
                    self.devices[i].write(byte);
                    true
                }
                _ => false,
            }
        };

        if let Some(line) = self.lines.get_mut(bus.index()) {
            line.acked = acked;
        }
        self.record(BusEvent::Write { byte, acked });
        Ok(())
    }

    fn transmission_has_completed(&mut self, bus: BusId) -> bool {
        !self.stalled && self.line(bus).is_some()
    }

    fn byte_was_acknowledged(&mut self, bus: BusId) -> bool {
        self.line(bus).is_some_and(|l| l.acked)
    }

    fn receiver_enable(&mut self, bus: BusId, enabled: bool) -> Result<(), RequestError> {
        if self.receiver_refused {
            return Err(RequestError::Rejected);
        }
        let line = *self.line(bus).ok_or(RequestError::Rejected)?;
        if !enabled {
            return Ok(());
        }
        if line.pending.is_some() {
            return Err(RequestError::ReceiveOverflow);
        }

        let byte = match line.selected {
            Some((i, Direction::Read)) => self.devices[i].read(),
            _ => 0xFF,
        };
        if let Some(line) = self.lines.get_mut(bus.index()) {
            line.pending = Some(byte);
        }
        Ok(())
    }

    fn received_data_is_available(&mut self, bus: BusId) -> bool {
        !self.stalled && self.line(bus).is_some_and(|l| l.pending.is_some())
    }

    fn get_byte(&mut self, bus: BusId) -> u8 {
        let byte = self
            .lines
            .get_mut(bus.index())
            .and_then(|l| l.pending.take())
            .unwrap_or(0xFF);
        self.record(BusEvent::Read(byte));
        byte
    }
}
