//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware.

pub mod actuator;
pub mod pads;
pub mod ranger;
pub mod reader;
pub mod screen;

// Re-export commonly used types
pub use actuator::{MockGateActuator, MockGateActuatorHandle};
pub use pads::{MockPressurePads, MockPressurePadsHandle};
pub use ranger::{MockRangeSensor, MockRangeSensorHandle};
pub use reader::{MockCredentialReader, MockCredentialReaderHandle};
pub use screen::{DrawOp, MockStatusScreen, MockStatusScreenHandle};
