//! Mock range sensor implementation for testing and development.

use crate::{Result, traits::RangeSensor};
use boomgate_core::DistanceSample;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Mock pulse-echo range sensor.
///
/// The sensor holds a current ambient sample and returns it on every
/// measurement until the paired [`MockRangeSensorHandle`] changes it. The
/// initial sample is [`DistanceSample::NoEcho`]: a freshly powered sensor has
/// not seen an echo yet.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::mock::MockRangeSensor;
/// use boomgate_hardware::traits::RangeSensor;
/// use boomgate_core::DistanceSample;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (mut sensor, handle) = MockRangeSensor::new();
///
///     assert_eq!(sensor.measure_distance().await?, DistanceSample::NoEcho);
///
///     handle.set_distance(50.0).await?;
///     assert_eq!(sensor.measure_distance().await?.cm(), Some(50.0));
///
///     // The sample is sticky until changed
///     assert_eq!(sensor.measure_distance().await?.cm(), Some(50.0));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRangeSensor {
    /// Channel receiver for sample updates
    sample_rx: mpsc::Receiver<DistanceSample>,

    /// Most recently applied sample
    current: DistanceSample,

    /// Device name
    name: String,
}

impl MockRangeSensor {
    /// Create a new mock sensor with the default name.
    pub fn new() -> (Self, MockRangeSensorHandle) {
        Self::with_name("Mock Range Sensor".to_string())
    }

    /// Create a new mock sensor with a custom name.
    pub fn with_name(name: String) -> (Self, MockRangeSensorHandle) {
        let (sample_tx, sample_rx) = mpsc::channel(32);

        let sensor = Self {
            sample_rx,
            current: DistanceSample::NoEcho,
            name: name.clone(),
        };

        let handle = MockRangeSensorHandle { sample_tx, name };

        (sensor, handle)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for MockRangeSensor {
    fn default() -> Self {
        Self::new().0
    }
}

impl RangeSensor for MockRangeSensor {
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    async fn measure_distance(&mut self) -> Result<DistanceSample> {
        // Drain pending updates so the newest setting wins, then report it.
        loop {
            match self.sample_rx.try_recv() {
                Ok(sample) => self.current = sample,
                Err(TryRecvError::Empty) => return Ok(self.current),
                Err(TryRecvError::Disconnected) => {
                    return Err(crate::HardwareError::disconnected(
                        "range sample channel closed",
                    ));
                }
            }
        }
    }
}

/// Handle for controlling a mock range sensor.
#[derive(Debug, Clone)]
pub struct MockRangeSensorHandle {
    /// Channel sender for sample updates
    sample_tx: mpsc::Sender<DistanceSample>,

    /// Device name
    name: String,
}

impl MockRangeSensorHandle {
    /// Set the ambient distance in centimeters.
    ///
    /// # Errors
    ///
    /// Returns an error if the distance is negative or not finite, or if the
    /// sensor has been dropped.
    pub async fn set_distance(&self, cm: f32) -> Result<()> {
        let sample = DistanceSample::from_cm(cm)
            .map_err(|e| crate::HardwareError::invalid_data(format!("{e}")))?;
        self.set_sample(sample).await
    }

    /// Make the sensor report a timed-out echo until further notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor has been dropped.
    pub async fn set_no_echo(&self) -> Result<()> {
        self.set_sample(DistanceSample::NoEcho).await
    }

    /// Set the next reported sample directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor has been dropped.
    pub async fn set_sample(&self, sample: DistanceSample) -> Result<()> {
        self.sample_tx
            .send(sample)
            .await
            .map_err(|_| crate::HardwareError::disconnected("range sample channel closed"))
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
