//! Tokio codec for the occupancy telemetry line protocol.
//!
//! The lane node reports its free-spot count to a collection endpoint over
//! plain TCP. Each report is one ASCII line addressing a numbered channel:
//!
//! ```text
//! CH<channel>=<count>\n
//! ```
//!
//! A node publishing 2 free spots on channel 7 sends `CH7=2\n`. The format
//! is line-oriented on purpose so an operator can watch the feed with
//! `nc -l` during commissioning; the decoder tolerates a trailing `\r` for
//! the same reason.
//!
//! # Usage with Tokio Framed
//!
//! ```rust,no_run
//! use tokio::net::TcpStream;
//! use tokio_util::codec::Framed;
//! use boomgate_telemetry::{ChannelUpdate, TelemetryCodec};
//! use futures::SinkExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = TcpStream::connect("127.0.0.1:7878").await?;
//! let mut framed = Framed::new(stream, TelemetryCodec::new());
//!
//! framed.send(ChannelUpdate::new(7, 2)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Buffer Protection
//!
//! The decoder rejects input once the pending buffer grows past the frame
//! size limit without a line terminator, so a peer streaming garbage cannot
//! grow the buffer without bound.

use bytes::BytesMut;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

/// Default maximum frame size in bytes.
///
/// The longest legal line is `CH255=4294967295\n` at 17 bytes; 64 leaves
/// headroom while still rejecting runaway input quickly.
const DEFAULT_MAX_FRAME_SIZE: usize = 64;

/// One free-spot count report addressed to a numbered channel.
///
/// # Example
///
/// ```
/// use boomgate_telemetry::ChannelUpdate;
///
/// let update = ChannelUpdate::new(7, 2);
/// assert_eq!(update.channel, 7);
/// assert_eq!(update.count, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelUpdate {
    /// Channel number on the collection endpoint.
    pub channel: u8,

    /// Free-spot count being reported.
    pub count: u32,
}

impl ChannelUpdate {
    /// Create an update for the given channel and count.
    pub fn new(channel: u8, count: u32) -> Self {
        Self { channel, count }
    }
}

/// Errors produced while framing or parsing telemetry lines.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Frame exceeds the configured size limit.
    #[error("Frame too large: {size} bytes exceeds maximum of {max_size} bytes")]
    FrameTooLarge { size: usize, max_size: usize },

    /// Line did not parse as `CH<channel>=<count>`.
    #[error("Malformed frame: {reason}")]
    MalformedFrame { reason: String },

    /// Low-level I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tokio codec for telemetry line framing.
///
/// Implements [`Encoder<ChannelUpdate>`] and [`Decoder`] so the update
/// stream can ride Tokio's `Framed` machinery on both ends of the link.
/// The node only ever encodes; the decoder exists for the collection
/// endpoint and for tests that stand one up.
#[derive(Debug)]
pub struct TelemetryCodec {
    /// Maximum allowed frame size in bytes.
    max_frame_size: usize,
}

impl TelemetryCodec {
    /// Create a codec with the default frame size limit.
    ///
    /// # Example
    ///
    /// ```
    /// use boomgate_telemetry::TelemetryCodec;
    ///
    /// let codec = TelemetryCodec::new();
    /// ```
    pub fn new() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Create a codec with a custom frame size limit.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    /// Get the current maximum frame size.
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl Default for TelemetryCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one line (without its terminator) as a channel update.
fn parse_line(line: &str) -> Result<ChannelUpdate, CodecError> {
    let body = line
        .strip_prefix("CH")
        .ok_or_else(|| CodecError::MalformedFrame {
            reason: format!("missing CH prefix in {line:?}"),
        })?;

    let (channel, count) = body.split_once('=').ok_or_else(|| {
        CodecError::MalformedFrame {
            reason: format!("missing '=' separator in {line:?}"),
        }
    })?;

    let channel = channel
        .parse::<u8>()
        .map_err(|_| CodecError::MalformedFrame {
            reason: format!("invalid channel number {channel:?}"),
        })?;

    let count = count
        .parse::<u32>()
        .map_err(|_| CodecError::MalformedFrame {
            reason: format!("invalid count {count:?}"),
        })?;

    Ok(ChannelUpdate::new(channel, count))
}

impl Decoder for TelemetryCodec {
    type Item = ChannelUpdate;
    type Error = CodecError;

    /// Decode one update from the byte stream.
    ///
    /// Returns `Ok(None)` until a full line has arrived. Bytes for the
    /// decoded line are consumed from `src`; any following partial line is
    /// left in place for the next call.
    ///
    /// # Errors
    ///
    /// Returns an error if the pending buffer exceeds the frame size limit
    /// without a terminator, or if a complete line fails to parse.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(newline) = src.iter().position(|&b| b == b'\n') else {
            if src.len() > self.max_frame_size {
                return Err(CodecError::FrameTooLarge {
                    size: src.len(),
                    max_size: self.max_frame_size,
                });
            }
            return Ok(None);
        };

        let frame = src.split_to(newline + 1);
        if frame.len() > self.max_frame_size {
            return Err(CodecError::FrameTooLarge {
                size: frame.len(),
                max_size: self.max_frame_size,
            });
        }

        let line = std::str::from_utf8(&frame[..newline]).map_err(|_| {
            CodecError::MalformedFrame {
                reason: "frame is not valid UTF-8".to_string(),
            }
        })?;

        // Accept CRLF so the feed survives Windows-side tooling
        let line = line.strip_suffix('\r').unwrap_or(line);

        parse_line(line).map(Some)
    }
}

impl Encoder<ChannelUpdate> for TelemetryCodec {
    type Error = CodecError;

    /// Encode one update as a terminated line.
    ///
    /// # Errors
    ///
    /// Returns an error if the rendered line exceeds the frame size limit.
    fn encode(&mut self, item: ChannelUpdate, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = format!("CH{}={}\n", item.channel, item.count);

        if line.len() > self.max_frame_size {
            return Err(CodecError::FrameTooLarge {
                size: line.len(),
                max_size: self.max_frame_size,
            });
        }

        dst.extend_from_slice(line.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_default_max_frame_size() {
        let codec = TelemetryCodec::new();
        assert_eq!(codec.max_frame_size(), DEFAULT_MAX_FRAME_SIZE);
    }

    #[test]
    fn test_codec_custom_max_frame_size() {
        let codec = TelemetryCodec::with_max_frame_size(128);
        assert_eq!(codec.max_frame_size(), 128);
    }

    #[test]
    fn test_encode_produces_terminated_line() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::new();

        codec.encode(ChannelUpdate::new(7, 2), &mut buffer).unwrap();

        assert_eq!(&buffer[..], b"CH7=2\n");
    }

    #[test]
    fn test_encode_rejects_line_over_limit() {
        let mut codec = TelemetryCodec::with_max_frame_size(4);
        let mut buffer = BytesMut::new();

        let result = codec.encode(ChannelUpdate::new(255, 4_294_967_295), &mut buffer);

        assert!(matches!(result, Err(CodecError::FrameTooLarge { .. })));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_decode_complete_line() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::from(&b"CH7=2\n"[..]);

        let update = codec.decode(&mut buffer).unwrap();

        assert_eq!(update, Some(ChannelUpdate::new(7, 2)));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_decode_partial_line_returns_none() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::from(&b"CH7="[..]);

        let update = codec.decode(&mut buffer).unwrap();

        assert_eq!(update, None);
        assert_eq!(&buffer[..], b"CH7=");
    }

    #[test]
    fn test_decode_keeps_trailing_partial_line() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::from(&b"CH1=3\nCH1="[..]);

        let first = codec.decode(&mut buffer).unwrap();
        assert_eq!(first, Some(ChannelUpdate::new(1, 3)));

        let second = codec.decode(&mut buffer).unwrap();
        assert_eq!(second, None);
        assert_eq!(&buffer[..], b"CH1=");
    }

    #[test]
    fn test_decode_tolerates_crlf() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::from(&b"CH3=0\r\n"[..]);

        let update = codec.decode(&mut buffer).unwrap();

        assert_eq!(update, Some(ChannelUpdate::new(3, 0)));
    }

    #[test]
    fn test_decode_rejects_missing_prefix() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::from(&b"7=2\n"[..]);

        let result = codec.decode(&mut buffer);

        assert!(matches!(result, Err(CodecError::MalformedFrame { .. })));
    }

    #[test]
    fn test_decode_rejects_missing_separator() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::from(&b"CH72\n"[..]);

        let result = codec.decode(&mut buffer);

        assert!(matches!(result, Err(CodecError::MalformedFrame { .. })));
    }

    #[test]
    fn test_decode_rejects_non_numeric_count() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::from(&b"CH7=full\n"[..]);

        let result = codec.decode(&mut buffer);

        assert!(matches!(result, Err(CodecError::MalformedFrame { .. })));
    }

    #[test]
    fn test_decode_rejects_channel_out_of_range() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::from(&b"CH300=2\n"[..]);

        let result = codec.decode(&mut buffer);

        assert!(matches!(result, Err(CodecError::MalformedFrame { .. })));
    }

    #[test]
    fn test_decode_rejects_unterminated_garbage_over_limit() {
        let mut codec = TelemetryCodec::with_max_frame_size(16);
        let mut buffer = BytesMut::from(&[b'x'; 32][..]);

        let result = codec.decode(&mut buffer);

        assert!(matches!(result, Err(CodecError::FrameTooLarge { .. })));
    }

    #[test]
    fn test_encode_decode_preserves_update() {
        let mut codec = TelemetryCodec::new();
        let mut buffer = BytesMut::new();
        let sent = ChannelUpdate::new(12, 3);

        codec.encode(sent, &mut buffer).unwrap();
        let received = codec.decode(&mut buffer).unwrap();

        assert_eq!(received, Some(sent));
    }
}
