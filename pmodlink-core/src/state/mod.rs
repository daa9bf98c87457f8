//! Initialization state tracking
//!
//! One record per I2C controller: whether the controller itself is set up
//! and which device classes on it have been configured.

pub mod tracker;

pub use tracker::{ModuleState, ModuleTracker};
