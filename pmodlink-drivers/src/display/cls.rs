//! Digilent Pmod CLS character LCD
//!
//! The CLS takes a stream of bytes: printable characters are drawn at the
//! cursor, and ANSI-like escape sequences (ESC `[` ...) move the cursor and
//! change modes. Command reference: Pmod CLS reference manual, rev E,
//! pages 2-3.
//!
//! The display has no registers, so every operation is a single write
//! transaction: start, address+W, command bytes, text, stop.
//!
//! ```ignore
//! handler.initialize_bus(BusId::I2C2, PB_CLOCK)?;
//! PmodCls::init(&mut handler, BusId::I2C2)?;
//!
//! let line = format_line(format_args!("{:.1} F", temp));
//! PmodCls::write_line(&mut handler, BusId::I2C2, line.as_bytes(), 2)?;
//! ```

use core::fmt::{self, Write};

use heapless::String;
use log::debug;
use pmodlink_core::{BusId, DeviceEndpoint, DeviceKind, Error, I2cHandler, PmodDevice, Session};
use pmodlink_hal::i2c::I2cController;

/// 7-bit bus address of the CLS (jumpers JP1/JP2 set for I2C)
pub const CLS_ADDRESS: u8 = 0x48;

/// Visible characters per display line
pub const CLS_LINE_SIZE: usize = 16;

const ESC: u8 = 27;

/// Turn the display on with the backlight off
pub const ENABLE_DISPLAY: &[u8] = &[ESC, b'[', b'3', b'e'];
/// Show the cursor without blinking
pub const SET_CURSOR: &[u8] = &[ESC, b'[', b'1', b'c'];
/// Clear the display and move the cursor to row 0, column 0
pub const HOME_CURSOR: &[u8] = &[ESC, b'[', b'j'];
/// Wrap text at 16 characters
pub const WRAP_LINE: &[u8] = &[ESC, b'[', b'0', b'h'];
/// Move the cursor to row 1, column 0
pub const SET_LINE_TWO: &[u8] = &[ESC, b'[', b'1', b';', b'0', b'H'];

/// One display line of formatted text
pub type LineBuffer = String<CLS_LINE_SIZE>;

/// Pmod CLS on one bus
pub struct PmodCls;

impl PmodDevice for PmodCls {
    const ENDPOINT: DeviceEndpoint = DeviceEndpoint::new(DeviceKind::Display, CLS_ADDRESS);

    fn configure<C: I2cController>(session: &mut Session<'_, C>) -> Result<(), Error> {
        session.write_chunks(&[ENABLE_DISPLAY, SET_CURSOR, HOME_CURSOR, WRAP_LINE])
    }
}

impl PmodCls {
    /// Enable the display, clear it, and turn on line wrapping
    ///
    /// The bus must already be initialized. Only the first call per bus
    /// talks to the display.
    pub fn init<C: I2cController>(handler: &mut I2cHandler<C>, bus: BusId) -> Result<(), Error> {
        handler.init_device::<Self>(bus)
    }

    /// Write `text` at the start of a line
    ///
    /// `line` 2 selects the second row; any other value clears the display
    /// and starts at the first row. `text` is sent as-is, so anything past
    /// [`CLS_LINE_SIZE`] characters wraps onto the next row (see
    /// [`fit_line`]).
    pub fn write_line<C: I2cController>(
        handler: &mut I2cHandler<C>,
        bus: BusId,
        text: &[u8],
        line: u8,
    ) -> Result<(), Error> {
        let cursor = if line == 2 { SET_LINE_TWO } else { HOME_CURSOR };

        handler.session(bus, Self::ENDPOINT)?.write_chunks(&[cursor, text])?;
        debug!("CLS: {} bytes to line {}", text.len(), if line == 2 { 2 } else { 1 });
        Ok(())
    }

    /// Replace both lines, each cut to [`CLS_LINE_SIZE`]
    pub fn write_lines<C: I2cController>(
        handler: &mut I2cHandler<C>,
        bus: BusId,
        first: &[u8],
        second: &[u8],
    ) -> Result<(), Error> {
        Self::write_line(handler, bus, fit_line(first), 1)?;
        Self::write_line(handler, bus, fit_line(second), 2)
    }
}

/// The part of `text` that fits on one display line
pub fn fit_line(text: &[u8]) -> &[u8] {
    &text[..text.len().min(CLS_LINE_SIZE)]
}

/// Render `args` into one display line, dropping whatever does not fit
pub fn format_line(args: fmt::Arguments<'_>) -> LineBuffer {
    let mut line = LineBuffer::new();
    // The writer never fails, it stops accepting once the line is full
    let _ = Truncating(&mut line).write_fmt(args);
    line
}

struct Truncating<'a>(&'a mut LineBuffer);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
