//! Mock pressure pad array implementation for testing and development.

use crate::{Result, traits::PressurePads};
use boomgate_core::constants::{ADC_MAX, SPOT_COUNT};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// A single pad update: (spot index, raw reading).
type PadUpdate = (usize, u16);

/// Mock pressure pad array.
///
/// Holds a raw reading per monitored spot and returns them on every read
/// until the paired [`MockPressurePadsHandle`] changes them. All pads start
/// at zero, which classifies every spot as free.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::mock::MockPressurePads;
/// use boomgate_hardware::traits::PressurePads;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (mut pads, handle) = MockPressurePads::new();
///
///     handle.set_raw(1, 800).await?;
///     assert_eq!(pads.read_raw().await?, [0, 800, 0]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockPressurePads {
    /// Channel receiver for pad updates
    update_rx: mpsc::Receiver<PadUpdate>,

    /// Current raw reading per spot
    current: [u16; SPOT_COUNT],

    /// Device name
    name: String,
}

impl MockPressurePads {
    /// Create a new mock pad array with the default name.
    pub fn new() -> (Self, MockPressurePadsHandle) {
        Self::with_name("Mock Pressure Pads".to_string())
    }

    /// Create a new mock pad array with a custom name.
    pub fn with_name(name: String) -> (Self, MockPressurePadsHandle) {
        let (update_tx, update_rx) = mpsc::channel(32);

        let pads = Self {
            update_rx,
            current: [0; SPOT_COUNT],
            name: name.clone(),
        };

        let handle = MockPressurePadsHandle { update_tx, name };

        (pads, handle)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for MockPressurePads {
    fn default() -> Self {
        Self::new().0
    }
}

impl PressurePads for MockPressurePads {
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    async fn read_raw(&mut self) -> Result<[u16; SPOT_COUNT]> {
        loop {
            match self.update_rx.try_recv() {
                Ok((spot, raw)) => self.current[spot] = raw,
                Err(TryRecvError::Empty) => return Ok(self.current),
                Err(TryRecvError::Disconnected) => {
                    return Err(crate::HardwareError::disconnected(
                        "pad update channel closed",
                    ));
                }
            }
        }
    }
}

/// Handle for controlling a mock pressure pad array.
#[derive(Debug, Clone)]
pub struct MockPressurePadsHandle {
    /// Channel sender for pad updates
    update_tx: mpsc::Sender<PadUpdate>,

    /// Device name
    name: String,
}

impl MockPressurePadsHandle {
    /// Set the raw reading of one pad.
    ///
    /// # Errors
    ///
    /// Returns an error if the spot index is out of range, the reading
    /// exceeds the 10-bit ADC range, or the pad array has been dropped.
    pub async fn set_raw(&self, spot: usize, raw: u16) -> Result<()> {
        if spot >= SPOT_COUNT {
            return Err(crate::HardwareError::invalid_data(format!(
                "Spot index must be 0-{}, got {}",
                SPOT_COUNT - 1,
                spot
            )));
        }
        if raw > ADC_MAX {
            return Err(crate::HardwareError::invalid_data(format!(
                "Raw reading must be 0-{}, got {}",
                ADC_MAX, raw
            )));
        }

        self.update_tx
            .send((spot, raw))
            .await
            .map_err(|_| crate::HardwareError::disconnected("pad update channel closed"))
    }

    /// Set the raw reading of every pad at once.
    ///
    /// # Errors
    ///
    /// Returns an error if any reading exceeds the ADC range or the pad
    /// array has been dropped.
    pub async fn set_all(&self, raw: [u16; SPOT_COUNT]) -> Result<()> {
        for (spot, value) in raw.iter().enumerate() {
            self.set_raw(spot, *value).await?;
        }
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
