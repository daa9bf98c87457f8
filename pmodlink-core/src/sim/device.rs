//! Simulated bus devices

use heapless::Vec;
use pmodlink_hal::i2c::BusId;

/// Longest canned read sequence a stream device holds
pub const MAX_STREAM_LEN: usize = 16;

/// Number of written bytes a device remembers
pub const MAX_RECEIVED_LEN: usize = 256;

/// How a simulated device treats the bytes it is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    /// The first byte after address+W sets the register pointer; later
    /// bytes are stored at the pointer. Reads come from the pointer. The
    /// pointer auto-increments after every access.
    Registers,
    /// Reads replay a fixed byte sequence from the start of each read
    /// transaction; writes are only recorded.
    Stream,
}

/// A device attached to a [`SimController`](super::SimController)
#[derive(Debug, Clone)]
pub struct SimDevice {
    bus: BusId,
    address: u8,
    mode: SimMode,
    registers: [u8; 256],
    pointer: u8,
    pointer_pending: bool,
    stream: Vec<u8, MAX_STREAM_LEN>,
    cursor: usize,
    received: Vec<u8, MAX_RECEIVED_LEN>,
}

impl SimDevice {
    fn new(bus: BusId, address: u8, mode: SimMode) -> Self {
        Self {
            bus,
            address,
            mode,
            registers: [0; 256],
            pointer: 0,
            pointer_pending: false,
            stream: Vec::new(),
            cursor: 0,
            received: Vec::new(),
        }
    }

    /// A device with a 256-byte register file, all zero
    pub fn registers(bus: BusId, address: u8) -> Self {
        Self::new(bus, address, SimMode::Registers)
    }

    /// A device that answers reads with `bytes`
    ///
    /// Bytes beyond [`MAX_STREAM_LEN`] are dropped.
    pub fn stream(bus: BusId, address: u8, bytes: &[u8]) -> Self {
        let mut device = Self::new(bus, address, SimMode::Stream);
        device.set_stream(bytes);
        device
    }

    /// A write-only device that just records what it is sent
    pub fn sink(bus: BusId, address: u8) -> Self {
        Self::stream(bus, address, &[])
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    pub fn set_register(&mut self, register: u8, value: u8) {
        self.registers[register as usize] = value;
    }

    /// Replace the canned read sequence
    pub fn set_stream(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(MAX_STREAM_LEN);
        self.stream.clear();
        // Cannot fail: length was clamped to capacity
        let _ = self.stream.extend_from_slice(&bytes[..len]);
        self.cursor = 0;
    }

    /// Every data byte written to the device, in order
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    pub fn clear_received(&mut self) {
        self.received.clear();
    }

    pub(crate) fn begin_write(&mut self) {
        self.pointer_pending = true;
    }

    pub(crate) fn begin_read(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn write(&mut self, byte: u8) {
        let _ = self.received.push(byte);

        if self.mode == SimMode::Registers {
            if self.pointer_pending {
                self.pointer = byte;
                self.pointer_pending = false;
            } else {
                self.registers[self.pointer as usize] = byte;
                self.pointer = self.pointer.wrapping_add(1);
            }
        }
    }

    pub(crate) fn read(&mut self) -> u8 {
        match self.mode {
            SimMode::Registers => {
                let value = self.registers[self.pointer as usize];
                self.pointer = self.pointer.wrapping_add(1);
                value
            }
            SimMode::Stream => match self.stream.get(self.cursor) {
                Some(&byte) => {
                    self.cursor = (self.cursor + 1) % self.stream.len();
                    byte
                }
                // Nobody drives SDA, the pull-ups win
                None => 0xFF,
            },
        }
    }
}
