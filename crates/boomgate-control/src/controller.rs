//! Gate access and auto-close state machine.
//!
//! This module provides the state machine for a single gate lane, from the
//! closed idle position through an authorized opening, the passage of a
//! vehicle under the range sensor, and the delayed automatic close.
//!
//! # Phases
//!
//! Externally the gate is either `Closed` or `Open`; internally the machine
//! tracks four phases:
//! - `Closed`: barrier down, waiting for an authorized credential
//! - `OpenSettling`: open command issued, barrier arm still travelling;
//!   every input is ignored until the settle window elapses
//! - `Open`: barrier up, range samples are evaluated for the close decision
//! - `Closing`: vehicle detected, close command pending until the clearance
//!   delay elapses; further samples and scans are ignored
//!
//! # Valid Transitions
//!
//! - Closed → OpenSettling (authorized scan; the open command fires here)
//! - OpenSettling → Open (settle window elapsed)
//! - Open → Closing (valid sample at or below the close threshold)
//! - Closing → Closed (clearance delay elapsed; the close command fires here)
//!
//! A missing echo never starts the close sequence: distance is unknown, not
//! zero, and the barrier must not drop onto a vehicle the sensor lost.
//!
//! # Examples
//!
//! ```
//! use boomgate_control::{GateController, ScanOutcome};
//! use boomgate_core::GateState;
//!
//! let mut gate = GateController::new();
//! assert_eq!(gate.state(), GateState::Closed);
//!
//! // An unauthorized scan never opens the gate
//! assert_eq!(gate.on_scan(false), ScanOutcome::Denied);
//! assert_eq!(gate.state(), GateState::Closed);
//!
//! // An authorized scan opens it exactly once
//! assert_eq!(gate.on_scan(true), ScanOutcome::Opened);
//! assert_eq!(gate.on_scan(true), ScanOutcome::Ignored);
//! assert_eq!(gate.state(), GateState::Open);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use boomgate_core::constants::{
    DEFAULT_CLOSE_DELAY_MS, DEFAULT_CLOSE_THRESHOLD_CM, DEFAULT_OPEN_SETTLE_MS,
};
use boomgate_core::{DistanceSample, GateState};

use crate::error::{Error, Result};

/// Maximum number of gate transitions to keep in history.
///
/// Each record is two state enums plus an `Instant`, so 100 records cost
/// about 3KB per controller. One vehicle entry produces two records (open
/// and close), so the window covers the last 50 entries, enough to
/// reconstruct recent lane activity when debugging a site report.
const MAX_HISTORY_SIZE: usize = 100;

/// Settle timing for the two gate movements.
///
/// `open_settle` models the barrier arm physically travelling to the open
/// position after the open command; `close_delay` models the detected
/// vehicle clearing the lane before the close command fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTimings {
    /// Window after the open command during which all input is ignored.
    pub open_settle: Duration,

    /// Delay between vehicle detection and the close command.
    pub close_delay: Duration,
}

impl Default for GateTimings {
    fn default() -> Self {
        Self {
            open_settle: Duration::from_millis(DEFAULT_OPEN_SETTLE_MS),
            close_delay: Duration::from_millis(DEFAULT_CLOSE_DELAY_MS),
        }
    }
}

/// Validated configuration for a [`GateController`].
///
/// # Examples
///
/// ```
/// use boomgate_control::{GateConfig, GateTimings};
/// use std::time::Duration;
///
/// let config = GateConfig::new(
///     11.0,
///     GateTimings {
///         open_settle: Duration::from_secs(2),
///         close_delay: Duration::from_millis(2500),
///     },
/// )
/// .unwrap();
///
/// assert_eq!(config.close_threshold_cm(), 11.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateConfig {
    close_threshold_cm: f32,
    timings: GateTimings,
}

impl GateConfig {
    /// Create a configuration with the given close threshold and timings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCloseThreshold`] if the threshold is not a
    /// positive finite distance.
    pub fn new(close_threshold_cm: f32, timings: GateTimings) -> Result<Self> {
        if !close_threshold_cm.is_finite() || close_threshold_cm <= 0.0 {
            return Err(Error::InvalidCloseThreshold {
                value: close_threshold_cm,
            });
        }
        Ok(Self {
            close_threshold_cm,
            timings,
        })
    }

    /// Vehicle-detection threshold for the auto-close decision (cm).
    #[must_use]
    pub fn close_threshold_cm(&self) -> f32 {
        self.close_threshold_cm
    }

    /// Settle timing for the two gate movements.
    #[must_use]
    pub fn timings(&self) -> GateTimings {
        self.timings
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            close_threshold_cm: DEFAULT_CLOSE_THRESHOLD_CM,
            timings: GateTimings::default(),
        }
    }
}

/// Internal control phase of the gate.
///
/// The two settle phases report [`GateState::Open`] externally; the phase
/// distinction only controls which inputs are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Closed,
    OpenSettling { until: Instant },
    Open,
    Closing { at: Instant },
}

/// Result of presenting a credential scan to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The scan was authorized and the gate is opening. The caller must
    /// issue exactly one open command to the actuator.
    Opened,

    /// The scan was not on the allow list; the gate stays closed.
    Denied,

    /// The gate is not in a phase that evaluates scans.
    Ignored,
}

/// Result of presenting a range sample to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// A vehicle was detected under the open gate; the close command will
    /// fire once the clearance delay elapses.
    CloseScheduled,

    /// The sample did not indicate a vehicle, had no echo, or arrived in a
    /// phase that does not evaluate samples.
    Ignored,
}

/// A single gate transition with timestamp.
///
/// # Serialization Note
///
/// The `timestamp` field is not serialized as `Instant` is process-specific.
/// When deserializing, the timestamp will be set to the current time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateTransition {
    /// The state transitioned from.
    pub from: GateState,

    /// The state transitioned to.
    pub to: GateState,

    /// When the transition occurred.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl GateTransition {
    /// Create a new transition record with the current timestamp.
    #[must_use]
    pub fn new(from: GateState, to: GateState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    /// Time elapsed since this transition occurred.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// State machine driving one gate lane.
///
/// The controller is pure logic: it consumes scan and range events, tracks
/// its settle deadlines, and tells the caller when to command the actuator.
/// It performs no I/O and never blocks; the settle windows are deadlines
/// checked by [`tick`](GateController::tick), not sleeps.
///
/// # Thread Safety
///
/// This struct is not thread-safe by design. In async contexts, protect
/// access using tokio::sync::Mutex or similar synchronization primitive.
///
/// # Examples
///
/// ```
/// use boomgate_control::{GateController, ScanOutcome};
///
/// let mut gate = GateController::new();
///
/// // Grant opens the gate; the settle window is still running, so no range
/// // sample is evaluated yet.
/// assert_eq!(gate.on_scan(true), ScanOutcome::Opened);
/// assert!(!gate.is_sampling());
/// ```
pub struct GateController {
    /// Validated lane configuration.
    config: GateConfig,

    /// Current control phase.
    phase: Phase,

    /// When the current phase was entered.
    phase_entered_at: Instant,

    /// History of gate transitions (limited to MAX_HISTORY_SIZE).
    history: VecDeque<GateTransition>,
}

impl GateController {
    /// Create a controller with the default configuration, starting closed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GateConfig::default())
    }

    /// Create a controller with the given configuration, starting closed.
    #[must_use]
    pub fn with_config(config: GateConfig) -> Self {
        Self {
            config,
            phase: Phase::Closed,
            phase_entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// The controller's configuration.
    #[must_use]
    pub fn config(&self) -> GateConfig {
        self.config
    }

    /// Current logical gate state.
    ///
    /// Reports [`GateState::Open`] through both settle windows: the barrier
    /// is physically up (or travelling) the whole time.
    #[must_use]
    pub fn state(&self) -> GateState {
        match self.phase {
            Phase::Closed => GateState::Closed,
            Phase::OpenSettling { .. } | Phase::Open | Phase::Closing { .. } => GateState::Open,
        }
    }

    /// Whether range samples are currently evaluated for the close decision.
    ///
    /// True only in the stable open phase: not while the arm is still
    /// travelling and not once a close is already pending.
    #[must_use]
    pub fn is_sampling(&self) -> bool {
        matches!(self.phase, Phase::Open)
    }

    /// Time since the current phase was entered.
    ///
    /// Internal phase boundaries (settle window elapsing) reset this clock
    /// even when the logical state does not change.
    #[must_use]
    pub fn time_in_phase(&self) -> Duration {
        self.phase_entered_at.elapsed()
    }

    /// Time remaining on the active settle deadline, if any.
    ///
    /// Returns `None` in the stable phases and once a deadline has passed.
    #[must_use]
    pub fn deadline_remaining(&self) -> Option<Duration> {
        let deadline = match self.phase {
            Phase::OpenSettling { until } => until,
            Phase::Closing { at } => at,
            Phase::Closed | Phase::Open => return None,
        };
        deadline.checked_duration_since(Instant::now())
    }

    /// Get a reference to the gate transition history.
    ///
    /// Ordered from oldest to newest, capped at the last 100 transitions.
    #[must_use]
    pub fn history(&self) -> &VecDeque<GateTransition> {
        &self.history
    }

    /// Feed one credential scan decision into the machine.
    ///
    /// Only evaluated while the gate is closed. Everywhere else the scan is
    /// ignored: re-scanning at an open gate is an idempotent no-op, and
    /// scans during the settle windows are dropped entirely.
    ///
    /// # Returns
    ///
    /// [`ScanOutcome::Opened`] obliges the caller to issue exactly one open
    /// command to the actuator.
    pub fn on_scan(&mut self, authorized: bool) -> ScanOutcome {
        if self.phase != Phase::Closed {
            return ScanOutcome::Ignored;
        }
        if !authorized {
            return ScanOutcome::Denied;
        }

        let transition = GateTransition::new(GateState::Closed, GateState::Open);
        self.enter_phase(Phase::OpenSettling {
            until: Instant::now() + self.config.timings.open_settle,
        });
        self.record(transition);
        ScanOutcome::Opened
    }

    /// Feed one range sample into the machine.
    ///
    /// Only evaluated in the stable open phase. A valid sample at or below
    /// the close threshold schedules the close; a sample above it, or a
    /// sample with no echo, changes nothing. No echo means the distance is
    /// unknown and the gate must stay where it is.
    pub fn on_distance(&mut self, sample: DistanceSample) -> RangeOutcome {
        if self.phase != Phase::Open {
            return RangeOutcome::Ignored;
        }
        if !sample.is_within(self.config.close_threshold_cm) {
            return RangeOutcome::Ignored;
        }

        self.enter_phase(Phase::Closing {
            at: Instant::now() + self.config.timings.close_delay,
        });
        RangeOutcome::CloseScheduled
    }

    /// Advance any elapsed settle deadline.
    ///
    /// Called once per control cycle before inputs are sampled. An elapsed
    /// open-settle window silently enters the stable open phase; an elapsed
    /// clearance delay closes the gate.
    ///
    /// # Returns
    ///
    /// `Some(transition)` when the gate just closed, obliging the caller to
    /// issue exactly one close command to the actuator. `None` otherwise.
    pub fn tick(&mut self) -> Option<GateTransition> {
        match self.phase {
            Phase::OpenSettling { until } if Instant::now() >= until => {
                self.enter_phase(Phase::Open);
                None
            }
            Phase::Closing { at } if Instant::now() >= at => {
                let transition = GateTransition::new(GateState::Open, GateState::Closed);
                self.enter_phase(Phase::Closed);
                self.record(transition.clone());
                Some(transition)
            }
            _ => None,
        }
    }

    /// Force the controller back to the closed phase.
    ///
    /// For error recovery: the caller is expected to also command the
    /// actuator closed. Records the forced transition.
    pub fn reset(&mut self) -> GateTransition {
        let transition = GateTransition::new(self.state(), GateState::Closed);
        self.enter_phase(Phase::Closed);
        self.record(transition.clone());
        transition
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.phase_entered_at = Instant::now();
    }

    fn record(&mut self, transition: GateTransition) {
        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for GateController {
    fn default() -> Self {
        Self::new()
    }
}
