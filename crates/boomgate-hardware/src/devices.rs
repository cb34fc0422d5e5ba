//! Enum wrappers for peripheral device dispatch.
//!
//! This module provides enum wrappers that enable the use of native async traits
//! with concrete type dispatch, avoiding the object-safety limitations while
//! maintaining zero-cost abstractions.
//!
//! # Enum Dispatch Pattern
//!
//! The enum wrappers in this module solve a fundamental challenge: native `async fn`
//! in traits (RPITIT - Rust Edition 2024) are not object-safe, so we cannot use
//! `Box<dyn CredentialReader>`. Instead, we use enums to provide concrete type
//! dispatch at compile time.
//!
//! This approach provides:
//! - Zero-cost abstraction (monomorphization at compile-time)
//! - Type-safe extensibility
//! - Support for feature flags (conditional compilation)
//! - Clear evolution path to real hardware backends
//!
//! # Examples
//!
//! ```
//! use boomgate_hardware::devices::AnyCredentialReader;
//! use boomgate_hardware::mock::MockCredentialReader;
//!
//! let (reader, _handle) = MockCredentialReader::new();
//! let any_reader = AnyCredentialReader::Mock(reader);
//!
//! // Can now be used polymorphically through the CredentialReader trait
//! ```

use crate::Result;
use crate::mock::{
    MockCredentialReader, MockGateActuator, MockPressurePads, MockRangeSensor, MockStatusScreen,
};
use crate::traits::{
    CredentialReader, CredentialScan, GateActuator, PressurePads, RangeSensor, StatusScreen,
};
use boomgate_core::constants::SPOT_COUNT;
use boomgate_core::{DistanceSample, GateState};

/// Enum wrapper for credential reader dispatch.
///
/// This enum allows us to maintain the benefits of native async fn in traits
/// while providing concrete type dispatch for the control cycle.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::devices::AnyCredentialReader;
/// use boomgate_hardware::traits::CredentialReader;
/// use boomgate_hardware::mock::MockCredentialReader;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (reader, _handle) = MockCredentialReader::new();
///     let mut any_reader = AnyCredentialReader::Mock(reader);
///
///     // Use through trait interface
///     let scan = any_reader.poll_credential().await?;
///     assert!(scan.is_none());
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyCredentialReader {
    /// Mock credential reader for development and testing.
    Mock(MockCredentialReader),
    // An MFRC522 SPI backend is planned behind the hardware-gpio feature.
}

impl CredentialReader for AnyCredentialReader {
    async fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.initialize().await,
        }
    }

    async fn poll_credential(&mut self) -> Result<Option<CredentialScan>> {
        match self {
            Self::Mock(device) => device.poll_credential().await,
        }
    }
}

/// Enum wrapper for range sensor dispatch.
///
/// This enum allows us to maintain the benefits of native async fn in traits
/// while providing concrete type dispatch for the control cycle.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::devices::AnyRangeSensor;
/// use boomgate_hardware::traits::RangeSensor;
/// use boomgate_hardware::mock::MockRangeSensor;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (sensor, _handle) = MockRangeSensor::new();
///     let mut any_sensor = AnyRangeSensor::Mock(sensor);
///
///     // Use through trait interface
///     let sample = any_sensor.measure_distance().await?;
///     assert!(sample.is_no_echo());
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyRangeSensor {
    /// Mock range sensor for development and testing.
    Mock(MockRangeSensor),
    // An HC-SR04 trigger/echo backend is planned behind the hardware-gpio feature.
}

impl RangeSensor for AnyRangeSensor {
    async fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.initialize().await,
        }
    }

    async fn measure_distance(&mut self) -> Result<DistanceSample> {
        match self {
            Self::Mock(device) => device.measure_distance().await,
        }
    }
}

/// Enum wrapper for gate actuator dispatch.
///
/// This enum allows us to maintain the benefits of native async fn in traits
/// while providing concrete type dispatch for the control cycle.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::devices::AnyGateActuator;
/// use boomgate_hardware::traits::GateActuator;
/// use boomgate_hardware::mock::MockGateActuator;
/// use boomgate_core::GateState;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (actuator, _handle) = MockGateActuator::new();
///     let mut any_actuator = AnyGateActuator::Mock(actuator);
///
///     // Use through trait interface
///     any_actuator.set_gate(GateState::Closed).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyGateActuator {
    /// Mock gate actuator for development and testing.
    Mock(MockGateActuator),
    // A PWM servo backend is planned behind the hardware-gpio feature.
}

impl GateActuator for AnyGateActuator {
    async fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.initialize().await,
        }
    }

    async fn set_gate(&mut self, state: GateState) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_gate(state).await,
        }
    }
}

/// Enum wrapper for pressure pad array dispatch.
///
/// This enum allows us to maintain the benefits of native async fn in traits
/// while providing concrete type dispatch for the control cycle.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::devices::AnyPressurePads;
/// use boomgate_hardware::traits::PressurePads;
/// use boomgate_hardware::mock::MockPressurePads;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (pads, _handle) = MockPressurePads::new();
///     let mut any_pads = AnyPressurePads::Mock(pads);
///
///     // Use through trait interface
///     let raw = any_pads.read_raw().await?;
///     assert_eq!(raw.len(), 3);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyPressurePads {
    /// Mock pressure pad array for development and testing.
    Mock(MockPressurePads),
    // An ADC multiplexer backend is planned behind the hardware-gpio feature.
}

impl PressurePads for AnyPressurePads {
    async fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.initialize().await,
        }
    }

    async fn read_raw(&mut self) -> Result<[u16; SPOT_COUNT]> {
        match self {
            Self::Mock(device) => device.read_raw().await,
        }
    }
}

/// Enum wrapper for status screen dispatch.
///
/// This enum allows us to maintain the benefits of native async fn in traits
/// while providing concrete type dispatch for the control cycle.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::devices::AnyStatusScreen;
/// use boomgate_hardware::traits::StatusScreen;
/// use boomgate_hardware::mock::MockStatusScreen;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (screen, _handle) = MockStatusScreen::new();
///     let mut any_screen = AnyStatusScreen::Mock(screen);
///
///     // Use through trait interface
///     any_screen.clear().await?;
///     any_screen.draw_text(10, 5, "Insert ID").await?;
///     any_screen.flush().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyStatusScreen {
    /// Mock status screen for development and testing.
    Mock(MockStatusScreen),
    // An SSD1306 I2C backend is planned behind the hardware-i2c feature.
}

impl StatusScreen for AnyStatusScreen {
    async fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.initialize().await,
        }
    }

    async fn clear(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.clear().await,
        }
    }

    async fn draw_rect(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<()> {
        match self {
            Self::Mock(device) => device.draw_rect(x, y, width, height).await,
        }
    }

    async fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<()> {
        match self {
            Self::Mock(device) => device.fill_rect(x, y, width, height).await,
        }
    }

    async fn draw_text(&mut self, x: u32, y: u32, text: &str) -> Result<()> {
        match self {
            Self::Mock(device) => device.draw_text(x, y, text).await,
        }
    }

    async fn flush(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.flush().await,
        }
    }
}
