//! TCP client pushing occupancy counts to the collection endpoint.
//!
//! The lane node reports its free-spot count once per control cycle. This
//! module provides the transport for that report: a thin TCP client that
//! frames each count with [`TelemetryCodec`] and writes it to a numbered
//! channel on the remote endpoint.
//!
//! # Design
//!
//! The client is deliberately a dumb pipe:
//!
//! - **No retry**: a failed publish is reported to the caller, who logs it
//!   and moves on. The next cycle carries a fresh count anyway, so replaying
//!   a stale one has no value.
//! - **No acknowledgements**: the endpoint never talks back; the link is
//!   written, never read.
//! - **No reconnection logic**: the caller decides when reconnecting is
//!   worth it.
//!
//! # Example Usage
//!
//! ```no_run
//! use boomgate_telemetry::{TelemetryClient, TelemetryClientConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TelemetryClientConfig {
//!     server_addr: "192.168.0.40:7878".parse()?,
//!     channel: 7,
//!     timeout: Duration::from_millis(3000),
//! };
//!
//! let mut client = TelemetryClient::new(config);
//! client.connect().await?;
//!
//! // Two free spots this cycle
//! client.publish(2).await?;
//!
//! client.close().await?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use futures::SinkExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, trace, warn};

use crate::codec::{ChannelUpdate, CodecError, TelemetryCodec};

/// Configuration for the telemetry client
///
/// # Example
///
/// ```
/// use boomgate_telemetry::TelemetryClientConfig;
/// use std::time::Duration;
///
/// let config = TelemetryClientConfig {
///     server_addr: "127.0.0.1:7878".parse().unwrap(),
///     channel: 7,
///     timeout: Duration::from_millis(3000),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct TelemetryClientConfig {
    /// Collection endpoint to connect to
    pub server_addr: SocketAddr,

    /// Channel number every count is published to
    pub channel: u8,

    /// Timeout for all I/O operations (connect, publish)
    pub timeout: Duration,
}

impl Default for TelemetryClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:7878".parse().unwrap(),
            channel: 1,
            timeout: Duration::from_millis(3000),
        }
    }
}

/// Errors that can occur during telemetry client operations
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Client is not connected to the endpoint
    #[error("Not connected to telemetry endpoint")]
    NotConnected,

    /// Connection attempt timed out
    #[error("Connection timeout after {0}ms")]
    ConnectionTimeout(u64),

    /// Publish operation timed out
    #[error("Publish timeout after {0}ms")]
    PublishTimeout(u64),

    /// Connection was lost during operation
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Framing error from the telemetry codec
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Low-level I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// TCP client for occupancy telemetry
///
/// `TelemetryClient` connects to the collection endpoint and publishes one
/// free-spot count per call, framed as a channel update line. It handles
/// connection management and timeout enforcement; retry policy belongs to
/// the caller.
///
/// # Connection Lifecycle
///
/// 1. Create client with `new()`
/// 2. Connect to the endpoint with `connect()`
/// 3. Publish counts with `publish()`
/// 4. Close connection with `close()`
///
/// # Example
///
/// ```no_run
/// use boomgate_telemetry::{TelemetryClient, TelemetryClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = TelemetryClient::new(TelemetryClientConfig::default());
/// client.connect().await?;
/// assert!(client.is_connected());
///
/// client.publish(3).await?;
///
/// client.close().await?;
/// assert!(!client.is_connected());
/// # Ok(())
/// # }
/// ```
pub struct TelemetryClient {
    /// Collection endpoint to connect to
    server_addr: SocketAddr,

    /// Channel number every count is published to
    channel: u8,

    /// Framed TCP stream with TelemetryCodec (None if not connected)
    framed: Option<Framed<TcpStream, TelemetryCodec>>,

    /// Timeout for all I/O operations
    timeout: Duration,
}

impl TelemetryClient {
    /// Create a new telemetry client with the given configuration
    ///
    /// The client is not connected after creation. Call `connect()` to
    /// establish a connection.
    ///
    /// # Example
    ///
    /// ```
    /// use boomgate_telemetry::{TelemetryClient, TelemetryClientConfig};
    ///
    /// let client = TelemetryClient::new(TelemetryClientConfig::default());
    /// assert!(!client.is_connected());
    /// ```
    pub fn new(config: TelemetryClientConfig) -> Self {
        debug!(
            "Creating telemetry client for endpoint {} channel {}",
            config.server_addr, config.channel
        );

        Self {
            server_addr: config.server_addr,
            channel: config.channel,
            framed: None,
            timeout: config.timeout,
        }
    }

    /// Connect to the collection endpoint
    ///
    /// Establishes a TCP connection to the configured address with timeout.
    /// The connection is configured with TCP_NODELAY so each cycle's count
    /// leaves the node immediately instead of waiting in the send buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Connection times out
    /// - Endpoint refuses connection
    /// - Network is unreachable
    pub async fn connect(&mut self) -> Result<(), TelemetryError> {
        info!("Connecting to telemetry endpoint at {}", self.server_addr);

        let stream =
            match tokio::time::timeout(self.timeout, TcpStream::connect(self.server_addr)).await {
                Ok(Ok(stream)) => {
                    info!("Connected to {}", self.server_addr);
                    stream
                }
                Ok(Err(e)) => {
                    error!("Connection failed: {}", e);
                    return Err(e.into());
                }
                Err(_) => {
                    warn!("Connection timeout after {}ms", self.timeout.as_millis());
                    return Err(TelemetryError::ConnectionTimeout(
                        self.timeout.as_millis() as u64
                    ));
                }
            };

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {} - reports may batch up", e);
        }

        self.framed = Some(Framed::new(stream, TelemetryCodec::new()));

        debug!("Telemetry client connected and ready");
        Ok(())
    }

    /// Publish a free-spot count to the configured channel
    ///
    /// Frames the count as a channel update line and writes it to the
    /// endpoint with timeout enforcement. There is no acknowledgement; a
    /// successful return means the line was handed to the socket.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Client is not connected
    /// - Publish operation times out
    /// - Connection is lost
    pub async fn publish(&mut self, count: u32) -> Result<(), TelemetryError> {
        trace!(
            channel = self.channel,
            count, "Publishing count to endpoint"
        );

        let channel = self.channel;
        let framed = self.framed.as_mut().ok_or(TelemetryError::NotConnected)?;

        match tokio::time::timeout(self.timeout, framed.send(ChannelUpdate::new(channel, count)))
            .await
        {
            Ok(Ok(())) => {
                trace!("Count published");
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Failed to publish count: {}", e);
                Err(e.into())
            }
            Err(_) => {
                warn!("Publish timeout after {}ms", self.timeout.as_millis());
                Err(TelemetryError::PublishTimeout(
                    self.timeout.as_millis() as u64
                ))
            }
        }
    }

    /// The channel number counts are published to
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Check if the client is connected to the endpoint
    pub fn is_connected(&self) -> bool {
        self.framed.is_some()
    }

    /// Close the connection gracefully
    ///
    /// Closes the TCP connection and cleans up resources. This method
    /// is idempotent - calling it multiple times is safe.
    ///
    /// Flush and shutdown operations have a 500ms timeout each to prevent
    /// hanging if the network is down or unresponsive.
    pub async fn close(&mut self) -> Result<(), TelemetryError> {
        if let Some(mut framed) = self.framed.take() {
            info!("Closing connection to {}", self.server_addr);

            let flush_timeout = Duration::from_millis(500);
            match tokio::time::timeout(flush_timeout, framed.flush()).await {
                Ok(Ok(())) => {
                    debug!("Flush completed");
                }
                Ok(Err(e)) => {
                    warn!("Error flushing during close: {}", e);
                }
                Err(_) => {
                    warn!(
                        "Flush timeout during close ({}ms)",
                        flush_timeout.as_millis()
                    );
                }
            }

            let mut stream = framed.into_inner();
            let shutdown_timeout = Duration::from_millis(500);
            match tokio::time::timeout(shutdown_timeout, stream.shutdown()).await {
                Ok(Ok(())) => {
                    debug!("Shutdown completed");
                }
                Ok(Err(e)) => {
                    warn!("Error during shutdown: {}", e);
                }
                Err(_) => {
                    warn!(
                        "Shutdown timeout during close ({}ms)",
                        shutdown_timeout.as_millis()
                    );
                }
            }

            debug!("Connection closed");
        }

        Ok(())
    }
}

impl Drop for TelemetryClient {
    fn drop(&mut self) {
        if self.framed.is_some() {
            debug!("TelemetryClient dropped while connected - connection will be closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TelemetryClientConfig::default();
        assert_eq!(config.server_addr.port(), 7878);
        assert_eq!(config.channel, 1);
        assert_eq!(config.timeout.as_millis(), 3000);
    }

    #[test]
    fn test_client_creation() {
        let client = TelemetryClient::new(TelemetryClientConfig::default());
        assert!(!client.is_connected());
        assert_eq!(client.channel(), 1);
    }

    #[tokio::test]
    async fn test_publish_without_connect() {
        let mut client = TelemetryClient::new(TelemetryClientConfig::default());

        let result = client.publish(2).await;
        assert!(matches!(result, Err(TelemetryError::NotConnected)));
    }

    #[tokio::test]
    async fn test_connection_timeout() {
        // Use a non-routable IP address (RFC 5737 TEST-NET-1)
        let config = TelemetryClientConfig {
            server_addr: "192.0.2.1:9999".parse().unwrap(),
            channel: 1,
            timeout: Duration::from_millis(100),
        };

        let mut client = TelemetryClient::new(config);
        let result = client.connect().await;

        assert!(matches!(result, Err(TelemetryError::ConnectionTimeout(_))));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_close_when_not_connected() {
        let mut client = TelemetryClient::new(TelemetryClientConfig::default());

        let result = client.close().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_multiple_close_calls() {
        let mut client = TelemetryClient::new(TelemetryClientConfig::default());

        client.close().await.unwrap();
        client.close().await.unwrap();
        client.close().await.unwrap();
    }
}
