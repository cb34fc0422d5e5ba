//! Peripheral trait definitions for the gate node.
//!
//! This module defines the capability contracts between the control loop and
//! the gate peripherals (credential reader, range sensor, gate actuator,
//! pressure pads, status screen), enabling substitution between mock and real
//! hardware implementations.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use boomgate_core::constants::SPOT_COUNT;
use boomgate_core::{CredentialId, DistanceSample, GateState};

/// A credential scan event.
///
/// Produced by a [`CredentialReader`] when a proximity tag is presented,
/// carrying the tag's identifier and the moment it was read.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::traits::CredentialScan;
/// use boomgate_core::CredentialId;
///
/// let scan = CredentialScan::new(CredentialId::new([0x03, 0x0C, 0x49, 0x16]));
/// assert_eq!(scan.credential.to_hex(), "030C4916");
/// ```
#[derive(Debug, Clone)]
pub struct CredentialScan {
    /// Identifier read from the tag.
    pub credential: CredentialId,

    /// Timestamp when the tag was read.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl CredentialScan {
    /// Create a scan event with the current timestamp.
    #[must_use]
    pub fn new(credential: CredentialId) -> Self {
        Self {
            credential,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create a scan event with a custom timestamp.
    ///
    /// Useful in tests that replay historical events.
    ///
    /// # Examples
    ///
    /// ```
    /// use boomgate_hardware::traits::CredentialScan;
    /// use boomgate_core::CredentialId;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let when = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
    /// let scan = CredentialScan::with_timestamp(
    ///     CredentialId::new([0x03, 0x0C, 0x49, 0x16]),
    ///     when,
    /// );
    /// assert_eq!(scan.timestamp, when);
    /// ```
    #[must_use]
    pub fn with_timestamp(
        credential: CredentialId,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            credential,
            timestamp,
        }
    }
}

/// Proximity credential reader abstraction.
///
/// Represents the tag reader at the gate lane. The reader is polled once per
/// control cycle and reports at most one scan per poll.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`, which is an opaque type that cannot be used in trait objects
/// (Edition 2024 RPITIT). You cannot use `Box<dyn CredentialReader>`.
///
/// For most use cases, use generic type parameters:
///
/// ```no_run
/// use boomgate_hardware::traits::{CredentialReader, CredentialScan};
/// use boomgate_hardware::error::Result;
///
/// async fn poll_once<R: CredentialReader>(reader: &mut R) -> Result<Option<CredentialScan>> {
///     reader.poll_credential().await
/// }
/// ```
///
/// For dynamic dispatch, use the enum wrapper pattern from the
/// [`devices`](crate::devices) module:
///
/// ```no_run
/// use boomgate_hardware::devices::AnyCredentialReader;
/// use boomgate_hardware::traits::CredentialReader;
/// use boomgate_hardware::mock::MockCredentialReader;
///
/// # async fn example() -> boomgate_hardware::Result<()> {
/// let (reader, _handle) = MockCredentialReader::new();
/// let mut any_reader = AnyCredentialReader::Mock(reader);
///
/// // Use through trait interface with zero-cost abstraction
/// let scan = any_reader.poll_credential().await?;
/// # Ok(())
/// # }
/// ```
pub trait CredentialReader: Send + Sync {
    /// Bring up the reader peripheral.
    ///
    /// Must be called once before polling. A failure here is fatal at node
    /// startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader does not respond to bring-up.
    async fn initialize(&mut self) -> Result<()>;

    /// Poll for the most recent credential scan.
    ///
    /// Non-blocking: returns `Ok(None)` when no tag has been presented since
    /// the last poll. At most one scan is reported per call; there is no
    /// buffering guarantee beyond "most recent scan this cycle".
    ///
    /// # Errors
    ///
    /// Returns an error if the reader is disconnected. Transient read
    /// failures are absorbed by the caller as "no scan this cycle".
    async fn poll_credential(&mut self) -> Result<Option<CredentialScan>>;
}

/// Pulse-echo range sensor abstraction.
///
/// Represents the ranger mounted over the gate lane, used to detect a vehicle
/// passing under the open gate.
///
/// # Object Safety and Dynamic Dispatch
///
/// Not object-safe; see [`CredentialReader`] documentation. For dynamic
/// dispatch, use [`AnyRangeSensor`](crate::devices::AnyRangeSensor).
pub trait RangeSensor: Send + Sync {
    /// Bring up the ranging peripheral.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor does not respond to bring-up.
    async fn initialize(&mut self) -> Result<()>;

    /// Trigger one pulse-echo measurement.
    ///
    /// Bounded by the hardware echo timeout (tens of milliseconds). A timed
    /// out pulse yields [`DistanceSample::NoEcho`] rather than hanging or
    /// reporting a zero distance.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor is disconnected.
    async fn measure_distance(&mut self) -> Result<DistanceSample>;
}

/// Gate barrier actuator abstraction.
///
/// Drives the barrier arm to the discrete open or closed position. The
/// physical angle for each state comes from the node's
/// [`GateAngles`](boomgate_core::GateAngles) configuration.
///
/// # Object Safety and Dynamic Dispatch
///
/// Not object-safe; see [`CredentialReader`] documentation. For dynamic
/// dispatch, use [`AnyGateActuator`](crate::devices::AnyGateActuator).
pub trait GateActuator: Send + Sync {
    /// Bring up the actuator.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator does not respond to bring-up.
    async fn initialize(&mut self) -> Result<()>;

    /// Drive the barrier to the position for `state`.
    ///
    /// Idempotent and fire-and-forget: re-commanding the current state is a
    /// no-op at the mechanism, and no position feedback is read back.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator is disconnected.
    async fn set_gate(&mut self, state: GateState) -> Result<()>;
}

/// Pressure pad array abstraction.
///
/// Reads the raw ADC value of every monitored parking spot's pad, in spot
/// order. Classification into free/occupied happens in the occupancy monitor,
/// not here.
///
/// # Object Safety and Dynamic Dispatch
///
/// Not object-safe; see [`CredentialReader`] documentation. For dynamic
/// dispatch, use [`AnyPressurePads`](crate::devices::AnyPressurePads).
pub trait PressurePads: Send + Sync {
    /// Bring up the pad array.
    ///
    /// # Errors
    ///
    /// Returns an error if the array does not respond to bring-up.
    async fn initialize(&mut self) -> Result<()>;

    /// Read the raw value of every pad.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is disconnected.
    async fn read_raw(&mut self) -> Result<[u16; SPOT_COUNT]>;
}

/// Status screen abstraction.
///
/// A monochrome pixel panel driven through simple drawing primitives. The
/// panel composition itself (border, captions, availability bar) lives in the
/// display crate; this trait only moves primitives to the glass.
///
/// # Object Safety and Dynamic Dispatch
///
/// Not object-safe; see [`CredentialReader`] documentation. For dynamic
/// dispatch, use [`AnyStatusScreen`](crate::devices::AnyStatusScreen).
///
/// # Examples
///
/// ```no_run
/// use boomgate_hardware::traits::StatusScreen;
/// use boomgate_hardware::error::Result;
///
/// async fn splash<S: StatusScreen>(screen: &mut S) -> Result<()> {
///     screen.clear().await?;
///     screen.draw_text(10, 5, "Insert ID").await?;
///     screen.flush().await
/// }
/// ```
pub trait StatusScreen: Send + Sync {
    /// Bring up the panel.
    ///
    /// A failure here halts the node: without the status screen the lane has
    /// no operator feedback at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel does not respond to bring-up.
    async fn initialize(&mut self) -> Result<()>;

    /// Clear the frame buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel is disconnected.
    async fn clear(&mut self) -> Result<()>;

    /// Draw a one-pixel rectangle outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the rectangle does not fit the panel.
    async fn draw_rect(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<()>;

    /// Draw a filled rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the rectangle does not fit the panel.
    async fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<()>;

    /// Draw a text string with its top-left corner at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin lies outside the panel.
    async fn draw_text(&mut self, x: u32, y: u32, text: &str) -> Result<()>;

    /// Push the frame buffer to the glass.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel is disconnected.
    async fn flush(&mut self) -> Result<()>;
}
