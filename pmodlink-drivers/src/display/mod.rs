//! Character displays
//!
//! - Digilent Pmod CLS: 2x16 character LCD with an I2C command interface

pub mod cls;

pub use cls::{fit_line, format_line, LineBuffer, PmodCls, CLS_ADDRESS, CLS_LINE_SIZE};
