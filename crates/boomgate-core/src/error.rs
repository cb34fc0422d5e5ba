use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Credential must be 4 bytes, got {actual}")]
    InvalidCredentialLength { actual: usize },

    #[error("Invalid credential hex string: {value}")]
    InvalidCredentialHex { value: String },

    // Measurement errors
    #[error("Distance must be a non-negative finite value, got {value}")]
    InvalidDistance { value: f32 },

    // Actuation errors
    #[error("Servo angle must be 0-180 degrees, got {degrees}")]
    InvalidAngle { degrees: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;
