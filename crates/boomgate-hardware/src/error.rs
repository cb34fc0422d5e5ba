//! Error types for peripheral operations.
//!
//! This module defines error types specific to gate peripheral operations,
//! covering device disconnection, failed bring-up, and invalid data moving
//! between the node and a peripheral.

/// Result type alias for peripheral operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during peripheral operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device bring-up failed.
    ///
    /// At startup this is fatal for the node: the control loop never starts
    /// on a peripheral that failed to initialize.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Invalid data moving to or from a device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}
