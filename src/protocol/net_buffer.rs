//! Fixed-capacity network buffer with incremental frame extraction.
//!
//! One `NetBuffer` backs one direction of a relayed connection. Each relay
//! invocation overwrites it from the transport and walks the filled extent
//! frame by frame:
//! - bytes in `[0, filled)` have been received and await forwarding;
//! - bytes in `[0, consumed)` have additionally been parsed as frames.
//!
//! The buffer never grows. A frame whose declared size cannot fit in the
//! capacity remaining from its start offset can never complete (the extent
//! is not compacted mid-call), so it is rejected with `FrameTooLarge`
//! instead of triggering a resize.

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::frame::Frame;
use super::wire_format::{Header, DEFAULT_NET_BUFFER_SIZE, HEADER_SIZE, LENGTH_FIELD_SIZE};
use crate::error::{RelayError, Result};

/// Fixed-capacity byte buffer for one relay direction.
pub struct NetBuffer {
    buf: Box<[u8]>,
    /// Bytes received from the transport, awaiting forwarding.
    filled: usize,
    /// Bytes already parsed as complete frames.
    consumed: usize,
}

impl NetBuffer {
    /// Create a buffer with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` cannot hold a single frame prefix.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= HEADER_SIZE, "capacity too small for a frame prefix");
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            filled: 0,
            consumed: 0,
        }
    }

    /// Create a buffer with the default 16 KiB capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_NET_BUFFER_SIZE)
    }

    /// Buffer capacity in bytes. Constant for the buffer's lifetime.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes received so far in the current call.
    #[inline]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// The filled extent: every byte received in the current call.
    #[inline]
    pub fn extent(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// True once every filled byte has been parsed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.consumed == self.filled
    }

    /// Discard the previous call's extent. Does not touch capacity.
    pub fn reset(&mut self) {
        self.filled = 0;
        self.consumed = 0;
    }

    /// Issue exactly one transport read at the fill offset.
    ///
    /// Returns the number of bytes read. `Ok(0)` from the transport means
    /// the peer closed the connection and surfaces as `ConnectionClosed`;
    /// a read error surfaces as `Transport`. Both are fatal to the call.
    pub async fn fill_once<R>(&mut self, source: &mut R) -> Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        debug_assert!(self.filled < self.buf.len());
        let n = source.read(&mut self.buf[self.filled..]).await?;
        if n == 0 {
            return Err(RelayError::ConnectionClosed);
        }
        self.filled += n;
        Ok(n)
    }

    /// Extract the next complete frame from the extent.
    ///
    /// Returns `Ok(None)` when the extent is exactly exhausted: the caller
    /// decides whether this readiness event is over. Otherwise reads from
    /// `source` as many times as needed (and no more) to complete first the
    /// 4-byte length field and then the frame body, and returns the frame.
    ///
    /// # Errors
    ///
    /// - `FrameTooLarge` if the declared frame size can never fit in the
    ///   capacity remaining from the frame's start offset;
    /// - `MalformedPayload` if the declared length is zero (the tag byte is
    ///   always counted);
    /// - `ConnectionClosed` / `Transport` from reads needed to complete the
    ///   frame.
    pub async fn next_frame<R>(&mut self, source: &mut R) -> Result<Option<Frame>>
    where
        R: AsyncRead + Unpin,
    {
        if self.is_exhausted() {
            return Ok(None);
        }

        let start = self.consumed;
        let available = self.buf.len() - start;

        // Complete the length field.
        if available < LENGTH_FIELD_SIZE {
            return Err(RelayError::FrameTooLarge {
                required: HEADER_SIZE,
                capacity: available,
            });
        }
        while self.filled - start < LENGTH_FIELD_SIZE {
            self.fill_once(source).await?;
        }

        let length = Header::decode_length(&self.buf[start..]).expect("length field is buffered");
        if length == 0 {
            return Err(RelayError::MalformedPayload {
                tag: 0,
                reason: "frame length must count the tag byte",
            });
        }

        // Complete the frame body, bounded by the remaining capacity.
        let frame_size = LENGTH_FIELD_SIZE + length as usize;
        if frame_size > available {
            return Err(RelayError::FrameTooLarge {
                required: frame_size,
                capacity: available,
            });
        }
        while self.filled - start < frame_size {
            self.fill_once(source).await?;
        }

        let tag = self.buf[start + LENGTH_FIELD_SIZE];
        let payload = Bytes::copy_from_slice(&self.buf[start + HEADER_SIZE..start + frame_size]);
        self.consumed = start + frame_size;

        Ok(Some(Frame::new(tag, payload)))
    }
}

impl std::fmt::Debug for NetBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetBuffer")
            .field("capacity", &self.buf.len())
            .field("filled", &self.filled)
            .field("consumed", &self.consumed)
            .finish()
    }
}
