use crate::{
    Result,
    constants::{
        CM_PER_MICROSECOND, CREDENTIAL_LENGTH, DEFAULT_CLOSED_ANGLE_DEG, DEFAULT_OPEN_ANGLE_DEG,
        MAX_SERVO_ANGLE_DEG, SPOT_COUNT,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Proximity credential identifier (4 bytes).
///
/// # Security
/// This type implements constant-time comparison to prevent timing attacks
/// when matching a scanned credential against the allow list.
#[derive(Debug, Clone, Copy, Eq)]
pub struct CredentialId([u8; CREDENTIAL_LENGTH]);

impl CredentialId {
    /// Create a credential identifier from exactly four bytes.
    #[must_use]
    pub const fn new(bytes: [u8; CREDENTIAL_LENGTH]) -> Self {
        CredentialId(bytes)
    }

    /// Create a credential identifier from a byte slice with length validation.
    ///
    /// Short or long reads from the tag peripheral must never be padded or
    /// truncated into a valid credential.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredentialLength` if the slice is not exactly
    /// 4 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != CREDENTIAL_LENGTH {
            return Err(Error::InvalidCredentialLength {
                actual: bytes.len(),
            });
        }
        let mut id = [0u8; CREDENTIAL_LENGTH];
        id.copy_from_slice(bytes);
        Ok(CredentialId(id))
    }

    /// Get the raw credential bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; CREDENTIAL_LENGTH] {
        &self.0
    }

    /// Format the credential as an uppercase hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join("")
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for CredentialId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.is_ascii() || s.len() != CREDENTIAL_LENGTH * 2 {
            return Err(Error::InvalidCredentialHex {
                value: s.to_string(),
            });
        }
        let mut bytes = [0u8; CREDENTIAL_LENGTH];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| {
                Error::InvalidCredentialHex {
                    value: s.to_string(),
                }
            })?;
        }
        Ok(CredentialId(bytes))
    }
}

/// Constant-time comparison implementation for CredentialId
///
/// This prevents timing attacks by ensuring comparison takes the same time
/// regardless of where the byte sequences differ.
impl PartialEq for CredentialId {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

/// Hash implementation for CredentialId
///
/// Implements standard hashing for use in hash-based collections.
impl std::hash::Hash for CredentialId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Logical gate state.
///
/// `Closed` is the initial and terminal-safe state. The physical actuator
/// angle is a pure function of this value through [`GateAngles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Barrier arm down, blocking the lane.
    Closed,

    /// Barrier arm up, lane clear.
    Open,
}

impl GateState {
    /// Returns `true` if the gate is closed.
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` if the gate is open.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Open => write!(f, "Open"),
        }
    }
}

/// Distance measurement from the pulse-echo ranger.
///
/// `NoEcho` means the echo pulse timed out and the distance is unknown. It is
/// deliberately distinct from a zero-centimeter echo so that missing data can
/// never satisfy a close decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceSample {
    /// Valid echo with a one-way distance in centimeters.
    Echo(f32),

    /// The echo pulse timed out; distance unknown.
    NoEcho,
}

impl DistanceSample {
    /// Create a sample from a measured one-way distance in centimeters.
    ///
    /// # Errors
    /// Returns `Error::InvalidDistance` if the value is negative, NaN, or
    /// infinite.
    pub fn from_cm(cm: f32) -> Result<Self> {
        if !cm.is_finite() || cm < 0.0 {
            return Err(Error::InvalidDistance { value: cm });
        }
        Ok(DistanceSample::Echo(cm))
    }

    /// Derive a sample from the echo round-trip time in microseconds.
    ///
    /// A round trip of zero microseconds is how the pulse-echo peripheral
    /// reports a timed-out pulse; it maps to `NoEcho`, never to zero
    /// centimeters.
    ///
    /// # Examples
    ///
    /// ```
    /// use boomgate_core::DistanceSample;
    ///
    /// assert_eq!(DistanceSample::from_round_trip_us(0), DistanceSample::NoEcho);
    ///
    /// let sample = DistanceSample::from_round_trip_us(2941);
    /// let cm = sample.cm().unwrap();
    /// assert!((cm - 50.0).abs() < 0.01);
    /// ```
    #[must_use]
    pub fn from_round_trip_us(duration_us: u32) -> Self {
        if duration_us == 0 {
            return DistanceSample::NoEcho;
        }
        DistanceSample::Echo(duration_us as f32 * CM_PER_MICROSECOND / 2.0)
    }

    /// Returns `true` if this sample carries a valid distance.
    #[must_use]
    pub fn is_echo(&self) -> bool {
        matches!(self, DistanceSample::Echo(_))
    }

    /// Returns `true` if the echo pulse timed out.
    #[must_use]
    pub fn is_no_echo(&self) -> bool {
        matches!(self, DistanceSample::NoEcho)
    }

    /// Get the measured distance in centimeters, if any.
    #[must_use]
    pub fn cm(&self) -> Option<f32> {
        match self {
            DistanceSample::Echo(cm) => Some(*cm),
            DistanceSample::NoEcho => None,
        }
    }

    /// Returns `true` if this is a valid echo at or below `threshold_cm`.
    ///
    /// `NoEcho` is never within any threshold.
    #[must_use]
    pub fn is_within(&self, threshold_cm: f32) -> bool {
        match self {
            DistanceSample::Echo(cm) => *cm <= threshold_cm,
            DistanceSample::NoEcho => false,
        }
    }
}

impl fmt::Display for DistanceSample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DistanceSample::Echo(cm) => write!(f, "{:.1} cm", cm),
            DistanceSample::NoEcho => write!(f, "no echo"),
        }
    }
}

/// Mapping from logical gate state to physical actuator angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateAngles {
    /// Angle commanded when the gate is closed (degrees).
    pub closed_deg: u8,

    /// Angle commanded when the gate is open (degrees).
    pub open_deg: u8,
}

impl GateAngles {
    /// Create an angle mapping with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidAngle` if either angle exceeds 180 degrees.
    pub fn new(closed_deg: u8, open_deg: u8) -> Result<Self> {
        for degrees in [closed_deg, open_deg] {
            if degrees > MAX_SERVO_ANGLE_DEG {
                return Err(Error::InvalidAngle { degrees });
            }
        }
        Ok(GateAngles {
            closed_deg,
            open_deg,
        })
    }

    /// Get the actuator angle for a logical gate state.
    #[must_use]
    pub fn angle_for(&self, state: GateState) -> u8 {
        match state {
            GateState::Closed => self.closed_deg,
            GateState::Open => self.open_deg,
        }
    }
}

impl Default for GateAngles {
    fn default() -> Self {
        GateAngles {
            closed_deg: DEFAULT_CLOSED_ANGLE_DEG,
            open_deg: DEFAULT_OPEN_ANGLE_DEG,
        }
    }
}

/// Free/occupied classification of a single parking spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotStatus {
    /// Nothing is pressing on the pad.
    Free,

    /// A vehicle is on the pad.
    Occupied,
}

impl SpotStatus {
    /// Classify a raw pad reading against a calibration threshold.
    ///
    /// A reading strictly below the threshold means the spot is free.
    #[must_use]
    pub fn from_raw(raw: u16, free_threshold: u16) -> Self {
        if raw < free_threshold {
            SpotStatus::Free
        } else {
            SpotStatus::Occupied
        }
    }

    /// Returns `true` if the spot is free.
    #[must_use]
    pub fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }

    /// Returns `true` if the spot is occupied.
    #[must_use]
    pub fn is_occupied(self) -> bool {
        matches!(self, Self::Occupied)
    }
}

/// Free/occupied status of all monitored spots at one instant.
///
/// Recomputed from raw pad readings every control cycle; no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    spots: [SpotStatus; SPOT_COUNT],
}

impl OccupancySnapshot {
    /// Create a snapshot from per-spot statuses.
    #[must_use]
    pub fn new(spots: [SpotStatus; SPOT_COUNT]) -> Self {
        OccupancySnapshot { spots }
    }

    /// Number of free spots.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.spots.iter().filter(|s| s.is_free()).count()
    }

    /// Total number of monitored spots.
    #[must_use]
    pub fn total(&self) -> usize {
        SPOT_COUNT
    }

    /// Per-spot statuses in spot order.
    #[must_use]
    pub fn spots(&self) -> &[SpotStatus; SPOT_COUNT] {
        &self.spots
    }
}
