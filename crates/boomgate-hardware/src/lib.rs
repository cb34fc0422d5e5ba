//! Hardware device abstraction layer for the boomgate parking node.
//!
//! This crate provides trait-based abstractions for the peripherals of a
//! parking gate lane: the credential reader, the range sensor over the lane,
//! the barrier actuator, the pressure pad array under the parking spots, and
//! the status screen. These traits enable polymorphic behavior and easy
//! substitution between mock implementations (for development and testing) and
//! real hardware drivers.
//!
//! # Design Philosophy
//!
//! The hardware abstraction layer is designed with the following principles:
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Enum-dispatched**: Native async traits are not object-safe, so the
//!   [`devices`] module provides enum wrappers for concrete type dispatch.
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//!
//! # Device Traits
//!
//! The crate defines five peripheral trait families:
//!
//! ## Credential Readers
//!
//! The [`CredentialReader`] trait represents the proximity tag reader at the
//! gate lane. It is polled once per control cycle:
//!
//! ```no_run
//! use boomgate_hardware::traits::CredentialReader;
//! use boomgate_hardware::error::Result;
//! use boomgate_core::CredentialId;
//!
//! async fn scanned_tag<R: CredentialReader>(reader: &mut R) -> Result<Option<CredentialId>> {
//!     let scan = reader.poll_credential().await?;
//!     Ok(scan.map(|s| s.credential))
//! }
//! ```
//!
//! ## Range Sensors
//!
//! The [`RangeSensor`] trait represents the pulse-echo ranger watching the
//! lane under the barrier. A timed out pulse reports
//! [`DistanceSample::NoEcho`](boomgate_core::DistanceSample::NoEcho), never a
//! zero distance:
//!
//! ```no_run
//! use boomgate_hardware::traits::RangeSensor;
//! use boomgate_hardware::error::Result;
//!
//! async fn vehicle_in_lane<S: RangeSensor>(sensor: &mut S, threshold_cm: f32) -> Result<bool> {
//!     let sample = sensor.measure_distance().await?;
//!     Ok(sample.is_within(threshold_cm))
//! }
//! ```
//!
//! ## Gate Actuators
//!
//! The [`GateActuator`] trait drives the barrier arm between its discrete
//! open and closed positions. Commands are idempotent and fire-and-forget.
//!
//! ## Pressure Pads
//!
//! The [`PressurePads`] trait reads raw values for every monitored parking
//! spot. Classification into free and occupied happens above this layer.
//!
//! ## Status Screens
//!
//! The [`StatusScreen`] trait moves drawing primitives to the lane's pixel
//! panel:
//!
//! ```no_run
//! use boomgate_hardware::traits::StatusScreen;
//! use boomgate_hardware::error::Result;
//!
//! async fn splash<S: StatusScreen>(screen: &mut S) -> Result<()> {
//!     screen.clear().await?;
//!     screen.draw_text(10, 5, "Insert ID").await?;
//!     screen.flush().await
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`HardwareError`] error type. This provides detailed context about
//! peripheral failures including disconnections and bring-up failures.
//!
//! # Thread Safety
//!
//! All traits require `Send + Sync`, making them safe to use across thread
//! boundaries. This is essential for use with the Tokio async runtime where
//! tasks may migrate between threads.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides a controllable mock for every trait, each
//! paired with a handle for injecting events and observing commands without
//! physical hardware.
//!
//! [`CredentialReader`]: traits::CredentialReader
//! [`RangeSensor`]: traits::RangeSensor
//! [`GateActuator`]: traits::GateActuator
//! [`PressurePads`]: traits::PressurePads
//! [`StatusScreen`]: traits::StatusScreen

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{
    CredentialReader, CredentialScan, GateActuator, PressurePads, RangeSensor, StatusScreen,
};

// Re-export device dispatch wrappers
pub use devices::{
    AnyCredentialReader, AnyGateActuator, AnyPressurePads, AnyRangeSensor, AnyStatusScreen,
};
