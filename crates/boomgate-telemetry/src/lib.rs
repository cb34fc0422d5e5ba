//! Occupancy telemetry transport for the parking lane node
//!
//! This crate carries the node's free-spot count to a remote collection
//! endpoint over plain TCP. Each report is a single line addressing a
//! numbered channel, framed by [`TelemetryCodec`] and pushed through
//! [`TelemetryClient`] on a best-effort basis: no acknowledgements, no
//! retry, no buffering of missed reports.
//!
//! # Components
//!
//! - **TelemetryCodec**: line framing (`CH<channel>=<count>\n`) for Tokio's
//!   `Framed` streams
//! - **TelemetryClient**: connection lifecycle and timeout enforcement
//!
//! # Example
//!
//! ```no_run
//! use boomgate_telemetry::{TelemetryClient, TelemetryClientConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TelemetryClientConfig {
//!     server_addr: "127.0.0.1:7878".parse()?,
//!     channel: 7,
//!     timeout: Duration::from_millis(3000),
//! };
//!
//! let mut client = TelemetryClient::new(config);
//! client.connect().await?;
//! client.publish(2).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod codec;

pub use client::{TelemetryClient, TelemetryClientConfig, TelemetryError};
pub use codec::{ChannelUpdate, CodecError, TelemetryCodec};
