//! Per-controller initialization flags

use pmodlink_hal::i2c::{BusId, MAX_CONTROLLERS};

use crate::traits::DeviceKind;

/// Initialization record for one I2C controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleState {
    bus_initialized: bool,
    /// Peripheral clock the baud rate was derived from
    source_clock_hz: u32,
    /// SCL frequency the controller reported after programming
    bus_clock_hz: u32,
    devices: [bool; DeviceKind::COUNT],
}

impl ModuleState {
    pub fn is_bus_initialized(&self) -> bool {
        self.bus_initialized
    }

    pub fn is_device_initialized(&self, kind: DeviceKind) -> bool {
        self.devices[kind.slot()]
    }

    /// Source clock recorded at initialization, if any
    pub fn source_clock_hz(&self) -> Option<u32> {
        self.bus_initialized.then_some(self.source_clock_hz)
    }

    /// Achieved bus clock recorded at initialization, if any
    pub fn bus_clock_hz(&self) -> Option<u32> {
        self.bus_initialized.then_some(self.bus_clock_hz)
    }
}

/// Initialization records for every controller a chip may have
///
/// Lookups with an identifier beyond [`MAX_CONTROLLERS`] report
/// "not initialized" and updates to it are ignored; the handler validates
/// identifiers before it gets here.
#[derive(Debug, Clone, Default)]
pub struct ModuleTracker {
    modules: [ModuleState; MAX_CONTROLLERS],
}

impl ModuleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one controller's record
    pub fn module(&self, bus: BusId) -> Option<ModuleState> {
        self.modules.get(bus.index()).copied()
    }

    pub fn is_bus_initialized(&self, bus: BusId) -> bool {
        self.module(bus).is_some_and(|m| m.bus_initialized)
    }

    pub fn is_device_initialized(&self, bus: BusId, kind: DeviceKind) -> bool {
        self.module(bus).is_some_and(|m| m.is_device_initialized(kind))
    }

    pub fn mark_bus_initialized(&mut self, bus: BusId, source_clock_hz: u32, bus_clock_hz: u32) {
        if let Some(module) = self.modules.get_mut(bus.index()) {
            module.bus_initialized = true;
            module.source_clock_hz = source_clock_hz;
            module.bus_clock_hz = bus_clock_hz;
        }
    }

    pub fn mark_device_initialized(&mut self, bus: BusId, kind: DeviceKind) {
        if let Some(module) = self.modules.get_mut(bus.index()) {
            module.devices[kind.slot()] = true;
        }
    }
}
