//! Error types for xrelay.

use thiserror::Error;

use crate::policy::Direction;

/// Main error type for all relay operations.
///
/// Every variant is fatal to the call that produced it; the caller is
/// expected to tear down the connection pair. The only retry performed
/// anywhere in the crate is the short-write completion loop, which is not
/// error recovery.
#[derive(Debug, Error)]
pub enum RelayError {
    /// I/O error reported by the transport.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The transport returned EOF mid-operation.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// A message payload does not match the schema for its declared tag.
    #[error("malformed payload for message tag {tag}: {reason}")]
    MalformedPayload { tag: u8, reason: &'static str },

    /// A message tag that is not allowed for this direction during the
    /// handshake phase.
    #[error("protocol violation: message tag {tag} not allowed in {direction} traffic during the handshake")]
    ProtocolViolation { direction: Direction, tag: u8 },

    /// A frame whose declared size can never fit in the network buffer.
    #[error("frame of {required} bytes exceeds buffer capacity of {capacity} bytes")]
    FrameTooLarge { required: usize, capacity: usize },
}

/// Result type alias using RelayError.
pub type Result<T> = std::result::Result<T, RelayError>;
