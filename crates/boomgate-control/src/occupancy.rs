//! Parking spot occupancy classification.
//!
//! Each monitored spot has a pressure pad whose raw reading rises with the
//! load on it. A reading strictly below the spot's calibrated threshold
//! means the spot is free. The pads sit at different depths in their
//! mountings, so every spot carries its own threshold.

use boomgate_core::constants::{ADC_MAX, DEFAULT_FREE_THRESHOLDS, SPOT_COUNT};
use boomgate_core::{OccupancySnapshot, SpotStatus};

use crate::error::{Error, Result};

/// Classifier turning raw pad readings into an occupancy snapshot.
///
/// # Examples
///
/// ```
/// use boomgate_control::OccupancyMonitor;
///
/// let monitor = OccupancyMonitor::default();
/// let snapshot = monitor.classify([120, 300, 350]);
///
/// // Thresholds 500/270/400: spot 1 reads at or above its threshold
/// assert_eq!(snapshot.free_count(), 2);
/// assert!(snapshot.spots()[1].is_occupied());
/// ```
#[derive(Debug, Clone)]
pub struct OccupancyMonitor {
    free_thresholds: [u16; SPOT_COUNT],
}

impl OccupancyMonitor {
    /// Create a monitor with the given per-spot free thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFreeThreshold`] for a threshold of zero (the
    /// spot could never read as free) or above the pad ADC range (the spot
    /// could never read as occupied).
    pub fn new(free_thresholds: [u16; SPOT_COUNT]) -> Result<Self> {
        for (spot, &value) in free_thresholds.iter().enumerate() {
            if value == 0 || value > ADC_MAX {
                return Err(Error::InvalidFreeThreshold { spot, value });
            }
        }
        Ok(Self { free_thresholds })
    }

    /// Classify one pass of raw pad readings.
    #[must_use]
    pub fn classify(&self, raw: [u16; SPOT_COUNT]) -> OccupancySnapshot {
        OccupancySnapshot::new(std::array::from_fn(|spot| {
            SpotStatus::from_raw(raw[spot], self.free_thresholds[spot])
        }))
    }

    /// The per-spot calibration thresholds.
    #[must_use]
    pub fn free_thresholds(&self) -> &[u16; SPOT_COUNT] {
        &self.free_thresholds
    }
}

impl Default for OccupancyMonitor {
    /// Monitor calibrated with the shipped thresholds.
    fn default() -> Self {
        Self {
            free_thresholds: DEFAULT_FREE_THRESHOLDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_thresholds() {
        let monitor = OccupancyMonitor::default();
        assert_eq!(monitor.free_thresholds(), &[500, 270, 400]);
    }

    #[rstest]
    #[case([0, 0, 0], 3)]
    #[case([499, 269, 399], 3)]
    #[case([500, 270, 400], 0)]
    #[case([1023, 1023, 1023], 0)]
    #[case([120, 300, 350], 2)]
    fn test_classification_free_count(#[case] raw: [u16; SPOT_COUNT], #[case] expected: usize) {
        let monitor = OccupancyMonitor::default();
        assert_eq!(monitor.classify(raw).free_count(), expected);
    }

    #[test]
    fn test_spots_classified_independently() {
        let monitor = OccupancyMonitor::new([500, 270, 400]).unwrap();

        // 300 is occupied for spot 1 but would be free for spots 0 and 2
        let snapshot = monitor.classify([300, 300, 300]);
        assert!(snapshot.spots()[0].is_free());
        assert!(snapshot.spots()[1].is_occupied());
        assert!(snapshot.spots()[2].is_free());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let result = OccupancyMonitor::new([500, 0, 400]);
        assert!(matches!(
            result,
            Err(Error::InvalidFreeThreshold { spot: 1, value: 0 })
        ));
    }

    #[test]
    fn test_threshold_above_adc_range_rejected() {
        let result = OccupancyMonitor::new([500, 270, 1024]);
        assert!(matches!(
            result,
            Err(Error::InvalidFreeThreshold {
                spot: 2,
                value: 1024
            })
        ));
    }

    #[test]
    fn test_threshold_at_adc_max_accepted() {
        let monitor = OccupancyMonitor::new([1023, 1023, 1023]).unwrap();
        assert_eq!(monitor.classify([1022, 1023, 0]).free_count(), 2);
    }
}
