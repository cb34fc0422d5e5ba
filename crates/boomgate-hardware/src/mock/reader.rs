//! Mock credential reader implementation for testing and development.
//!
//! This module provides a simulated proximity reader that can be controlled
//! programmatically for testing without requiring physical hardware.

use crate::{
    Result,
    traits::{CredentialReader, CredentialScan},
};
use boomgate_core::CredentialId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Mock credential reader for testing and development.
///
/// This device simulates the lane's proximity reader. Tags are presented
/// through the paired [`MockCredentialReaderHandle`]; each poll reports at
/// most one queued scan.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::mock::MockCredentialReader;
/// use boomgate_hardware::traits::CredentialReader;
/// use boomgate_core::CredentialId;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (mut reader, handle) = MockCredentialReader::new();
///
///     // Nothing presented yet
///     assert!(reader.poll_credential().await?.is_none());
///
///     // Present a tag, then poll again
///     handle.present_tag(CredentialId::new([0x03, 0x0C, 0x49, 0x16])).await?;
///     let scan = reader.poll_credential().await?.unwrap();
///     assert_eq!(scan.credential.to_hex(), "030C4916");
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockCredentialReader {
    /// Channel receiver for scan events
    scan_rx: mpsc::Receiver<CredentialScan>,

    /// Device name
    name: String,
}

impl MockCredentialReader {
    /// Create a new mock reader with the default name.
    ///
    /// Returns a tuple of (MockCredentialReader, MockCredentialReaderHandle)
    /// where the handle can be used to simulate tag presentations.
    pub fn new() -> (Self, MockCredentialReaderHandle) {
        Self::with_name("Mock Credential Reader".to_string())
    }

    /// Create a new mock reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockCredentialReaderHandle) {
        let (scan_tx, scan_rx) = mpsc::channel(32);

        let reader = Self {
            scan_rx,
            name: name.clone(),
        };

        let handle = MockCredentialReaderHandle { scan_tx, name };

        (reader, handle)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for MockCredentialReader {
    fn default() -> Self {
        Self::new().0
    }
}

impl CredentialReader for MockCredentialReader {
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    async fn poll_credential(&mut self) -> Result<Option<CredentialScan>> {
        match self.scan_rx.try_recv() {
            Ok(scan) => Ok(Some(scan)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(crate::HardwareError::disconnected(
                "credential scan channel closed",
            )),
        }
    }
}

/// Handle for controlling a mock credential reader.
///
/// This handle allows programmatic control of the mock reader by simulating
/// tag presentations. Presented tags queue in order; the reader reports one
/// per poll.
#[derive(Debug, Clone)]
pub struct MockCredentialReaderHandle {
    /// Channel sender for scan events
    scan_tx: mpsc::Sender<CredentialScan>,

    /// Device name
    name: String,
}

impl MockCredentialReaderHandle {
    /// Present a tag to the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped and the channel is
    /// closed.
    pub async fn present_tag(&self, credential: CredentialId) -> Result<()> {
        self.scan_tx
            .send(CredentialScan::new(credential))
            .await
            .map_err(|_| crate::HardwareError::disconnected("credential scan channel closed"))
    }

    /// Present a tag given as a hex string.
    ///
    /// Convenience wrapper over [`present_tag`](Self::present_tag).
    ///
    /// # Errors
    ///
    /// Returns an error if the hex string is not a valid credential or the
    /// reader has been dropped.
    pub async fn present_hex(&self, hex: &str) -> Result<()> {
        let credential: CredentialId = hex
            .parse()
            .map_err(|e| crate::HardwareError::invalid_data(format!("{e}")))?;
        self.present_tag(credential).await
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_poll_empty_returns_none() {
        let (mut reader, _handle) = MockCredentialReader::new();
        let polled = reader.poll_credential().await.unwrap();
        assert!(polled.is_none());
    }

    #[tokio::test]
    async fn test_present_and_poll() {
        let (mut reader, handle) = MockCredentialReader::new();

        handle
            .present_tag(CredentialId::new([0x03, 0x0C, 0x49, 0x16]))
            .await
            .unwrap();

        let scan = reader.poll_credential().await.unwrap().unwrap();
        assert_eq!(scan.credential, CredentialId::new([0x03, 0x0C, 0x49, 0x16]));

        // Queue is drained after one poll
        assert!(reader.poll_credential().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_one_scan_per_poll() {
        let (mut reader, handle) = MockCredentialReader::new();

        handle.present_hex("01020304").await.unwrap();
        handle.present_hex("05060708").await.unwrap();

        let first = reader.poll_credential().await.unwrap().unwrap();
        let second = reader.poll_credential().await.unwrap().unwrap();
        assert_eq!(first.credential.to_hex(), "01020304");
        assert_eq!(second.credential.to_hex(), "05060708");
    }

    #[tokio::test]
    async fn test_present_invalid_hex() {
        let (_reader, handle) = MockCredentialReader::new();

        let result = handle.present_hex("nope").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_poll_after_handle_dropped() {
        let (mut reader, handle) = MockCredentialReader::new();
        drop(handle);

        let result = reader.poll_credential().await;
        assert!(matches!(
            result,
            Err(crate::HardwareError::Disconnected { .. })
        ));
    }

    #[tokio::test]
    async fn test_initialize_succeeds() {
        let (mut reader, _handle) = MockCredentialReader::new();
        reader.initialize().await.unwrap();
    }
}
