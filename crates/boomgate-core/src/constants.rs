//! Calibration and geometry constants for the boomgate parking node.
//!
//! This module centralizes the fixed values shared across the node: credential
//! format, actuator angle limits, range-measurement scaling, settle timing,
//! control-cycle pacing, occupancy calibration, and status-panel geometry.
//! Values that are site tunables (thresholds, delays, angles) also appear here
//! as the *defaults* behind the configuration file; the constants themselves
//! are the single source for those defaults.
//!
//! # Usage
//!
//! ```
//! use boomgate_core::constants::*;
//!
//! // Distance derivation from an echo round trip
//! let round_trip_us = 2941.0_f32;
//! let one_way_cm = round_trip_us * CM_PER_MICROSECOND / 2.0;
//! assert!((one_way_cm - 50.0).abs() < 0.01);
//!
//! // Control cycle validation
//! fn validate_period(period_ms: u64) -> bool {
//!     period_ms >= MIN_CYCLE_PERIOD_MS
//! }
//! assert!(validate_period(DEFAULT_CYCLE_PERIOD_MS));
//! ```

// ============================================================================
// Credential Format
// ============================================================================

/// Credential identifier length in bytes.
///
/// Proximity tags used at the gate carry a 4-byte unique identifier. Reads of
/// any other length are rejected before they can reach the authorization
/// check.
pub const CREDENTIAL_LENGTH: usize = 4;

/// Default authorized credential shipped in the lane configuration.
///
/// Single-tenant pilot installations run with exactly one issued tag; the
/// allow list in the configuration file replaces this for real deployments.
///
/// # Examples
///
/// ```
/// use boomgate_core::CredentialId;
/// use boomgate_core::constants::DEFAULT_AUTHORIZED_CREDENTIAL;
///
/// let id = CredentialId::new(DEFAULT_AUTHORIZED_CREDENTIAL);
/// assert_eq!(id.to_hex(), "030C4916");
/// ```
pub const DEFAULT_AUTHORIZED_CREDENTIAL: [u8; CREDENTIAL_LENGTH] = [0x03, 0x0C, 0x49, 0x16];

// ============================================================================
// Gate Actuation
// ============================================================================

/// Default actuator angle for the closed gate position (degrees).
///
/// # Value: 90°
pub const DEFAULT_CLOSED_ANGLE_DEG: u8 = 90;

/// Default actuator angle for the open gate position (degrees).
///
/// # Value: 0°
pub const DEFAULT_OPEN_ANGLE_DEG: u8 = 0;

/// Maximum commandable servo angle (degrees).
///
/// Standard hobby servo range is 0-180°. Configured angles outside this
/// range are rejected at startup.
pub const MAX_SERVO_ANGLE_DEG: u8 = 180;

// ============================================================================
// Range Measurement
// ============================================================================

/// Speed-of-sound scaling factor for pulse-echo ranging (cm per microsecond).
///
/// One-way distance is derived from the echo round-trip time as
/// `duration_us * CM_PER_MICROSECOND / 2.0`.
///
/// # Examples
///
/// ```
/// use boomgate_core::constants::CM_PER_MICROSECOND;
///
/// // A 588 microsecond round trip is roughly 10 cm away
/// let cm = 588.0 * CM_PER_MICROSECOND / 2.0;
/// assert!((cm - 10.0).abs() < 0.01);
/// ```
pub const CM_PER_MICROSECOND: f32 = 0.034;

/// Default vehicle-detection threshold for the auto-close decision (cm).
///
/// A valid distance sample at or below this value means a vehicle is passing
/// under the ranger and the close sequence may start. Deployed units have
/// been calibrated between 11.0 and 12.0 cm; 12.0 is the shipped default and
/// the value is a configuration parameter, not a hardcoded limit.
pub const DEFAULT_CLOSE_THRESHOLD_CM: f32 = 12.0;

// ============================================================================
// Settle Timing
// ============================================================================

/// Default settle window after commanding the gate open (milliseconds).
///
/// While this window runs, no range sample is evaluated for closing and
/// further credential scans are ignored. Models the barrier arm physically
/// reaching the open position.
///
/// # Value: 2000ms (2 seconds)
pub const DEFAULT_OPEN_SETTLE_MS: u64 = 2000;

/// Default delay between vehicle detection and the close command (milliseconds).
///
/// Models the vehicle clearing the gate after it has been detected under the
/// ranger. Deployed units have used 2500-5000ms; 5000 is the shipped default.
///
/// # Value: 5000ms (5 seconds)
pub const DEFAULT_CLOSE_DELAY_MS: u64 = 5000;

// ============================================================================
// Control Cycle
// ============================================================================

/// Default control cycle period (milliseconds).
///
/// One full pass of sampling inputs, updating the gate state machine, and
/// refreshing display/telemetry runs once per period.
///
/// # Value: 500ms
pub const DEFAULT_CYCLE_PERIOD_MS: u64 = 500;

/// Minimum allowed control cycle period (milliseconds).
///
/// Periods below this leave no headroom for the bounded range-sensor read
/// plus display refresh inside one cycle.
///
/// # Value: 100ms
pub const MIN_CYCLE_PERIOD_MS: u64 = 100;

// ============================================================================
// Occupancy Sensing
// ============================================================================

/// Number of monitored parking spots.
pub const SPOT_COUNT: usize = 3;

/// Default per-spot free thresholds in raw ADC units.
///
/// A pad reading strictly below its threshold means the spot is free. The
/// three pads sit at different depths in their mounting, so each carries its
/// own calibration value.
///
/// # Examples
///
/// ```
/// use boomgate_core::constants::DEFAULT_FREE_THRESHOLDS;
/// use boomgate_core::SpotStatus;
///
/// let raw = 120;
/// let status = SpotStatus::from_raw(raw, DEFAULT_FREE_THRESHOLDS[0]);
/// assert!(status.is_free());
/// ```
pub const DEFAULT_FREE_THRESHOLDS: [u16; SPOT_COUNT] = [500, 270, 400];

/// Maximum raw reading from the pad ADC (10-bit).
///
/// Calibration thresholds above this value could never classify a spot as
/// occupied and are rejected as configuration errors.
///
/// # Value: 1023
pub const ADC_MAX: u16 = 1023;

// ============================================================================
// Status Panel
// ============================================================================

/// Status panel width in pixels.
pub const PANEL_WIDTH: u32 = 128;

/// Status panel height in pixels.
///
/// # Examples
///
/// ```
/// use boomgate_core::constants::{PANEL_HEIGHT, PANEL_WIDTH};
///
/// // The availability bar spans the full panel width when every spot is free
/// assert_eq!(PANEL_WIDTH, 128);
/// assert_eq!(PANEL_HEIGHT, 64);
/// ```
pub const PANEL_HEIGHT: u32 = 64;
