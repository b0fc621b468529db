//! Frame struct with typed accessors.
//!
//! Represents a complete protocol frame: type tag plus payload.
//! Uses `bytes::Bytes` for cheap payload sharing.
//!
//! # Example
//!
//! ```
//! use xrelay::protocol::{build_frame, client_tag, Frame};
//!
//! let frame = Frame::from_parts(client_tag::AUTHENTICATE_START, b"\x0a\x05PLAIN");
//! assert_eq!(frame.tag(), client_tag::AUTHENTICATE_START);
//! assert_eq!(frame.payload().len(), 7);
//!
//! let wire = build_frame(frame.tag(), frame.payload());
//! assert_eq!(wire.len(), 4 + 1 + 7);
//! ```

use bytes::Bytes;

use super::wire_format::{Header, HEADER_SIZE};

/// A complete protocol frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Message type tag.
    pub tag: u8,
    /// Payload bytes (shared via `bytes::Bytes`).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame from tag and payload.
    pub fn new(tag: u8, payload: Bytes) -> Self {
        Self { tag, payload }
    }

    /// Create a frame from tag and raw bytes (copies data).
    pub fn from_parts(tag: u8, payload: &[u8]) -> Self {
        Self {
            tag,
            payload: Bytes::copy_from_slice(payload),
        }
    }

    /// Get the message type tag.
    #[inline]
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Total on-wire size of this frame, prefix included.
    #[inline]
    pub fn frame_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Build a complete frame as a single byte vector.
///
/// Encodes the length/tag prefix and appends the payload into a contiguous
/// buffer, ready to be handed to the transport.
pub fn build_frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let header = Header::for_payload(tag, payload.len());
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(payload);
    buf
}
