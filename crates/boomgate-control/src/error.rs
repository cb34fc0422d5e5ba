use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Authorization errors
    #[error("Allow list must contain at least one credential")]
    EmptyAllowList,

    // Gate configuration errors
    #[error("Close threshold must be a positive finite distance, got {value}")]
    InvalidCloseThreshold { value: f32 },

    // Occupancy calibration errors
    #[error("Free threshold for spot {spot} must be 1-1023, got {value}")]
    InvalidFreeThreshold { spot: usize, value: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;
