//! Relay state machine.
//!
//! One [`relay`] call services one readiness event for one direction of a
//! client↔server pair: read what the transport offers, inspect it while the
//! handshake is pending, and forward every byte verbatim.
//!
//! Parsing is purely observational. It never rewrites, reorders or trims
//! bytes: everything accepted from the sender in a call is written to the
//! receiver in the same order. The one exception is a classification
//! failure, where nothing is written at all and the caller tears the pair
//! down.
//!
//! # Example
//!
//! ```ignore
//! use xrelay::{relay, ConnectionContext, Direction, Readiness};
//!
//! let mut ctx = ConnectionContext::new();
//! loop {
//!     let readiness = poller.wait(&client)?;
//!     let n = relay(
//!         &mut client,
//!         &mut server,
//!         readiness,
//!         Direction::ClientToServer,
//!         &mut ctx,
//!     )
//!     .await?;
//!     tracing::trace!(bytes = n, "forwarded");
//! }
//! ```

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

use crate::codec::validate_payload;
use crate::error::{RelayError, Result};
use crate::policy::{classify, tag_name, Direction, MessageClass};
use crate::protocol::NetBuffer;

/// Externally supplied signal that the sender socket has data available.
///
/// Supplied by the caller's poller per invocation; the relay never probes
/// readiness itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The sender can be read without blocking.
    Ready,
    /// Nothing to read; the call returns immediately.
    NotReady,
}

/// Progress of the handshake for one direction pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Still inspecting handshake messages.
    InProgress,
    /// Inspection is over; traffic is relayed opaquely from now on.
    Done,
}

impl HandshakeState {
    /// True once the handshake has completed.
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, HandshakeState::Done)
    }
}

/// Per-connection state that persists across relay invocations.
///
/// Owns the network buffer, the handshake state and the packet sequence
/// counter. Exclusively borrowed by each call; no locking is needed because
/// no two calls for the same direction run concurrently.
#[derive(Debug)]
pub struct ConnectionContext {
    buffer: NetBuffer,
    handshake: HandshakeState,
    packet_seq: u32,
}

impl ConnectionContext {
    /// Create a context with the default 16 KiB buffer.
    pub fn new() -> Self {
        Self::with_buffer(NetBuffer::with_default_capacity())
    }

    /// Create a context with a custom buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_buffer(NetBuffer::new(capacity))
    }

    fn with_buffer(buffer: NetBuffer) -> Self {
        Self {
            buffer,
            handshake: HandshakeState::InProgress,
            packet_seq: 0,
        }
    }

    /// Current handshake state.
    #[inline]
    pub fn handshake_state(&self) -> HandshakeState {
        self.handshake
    }

    /// Frames classified so far; diagnostic only.
    #[inline]
    pub fn packet_seq(&self) -> u32 {
        self.packet_seq
    }

    /// The network buffer, e.g. to inspect what was pending at teardown.
    #[inline]
    pub fn buffer(&self) -> &NetBuffer {
        &self.buffer
    }
}

impl Default for ConnectionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy one readiness event's worth of traffic from `source` to `sink`.
///
/// Returns the number of bytes transferred. While the handshake is in
/// progress the filled extent is scanned frame by frame and classified per
/// direction; once a terminal message is seen the state flips to
/// [`HandshakeState::Done`] and later calls relay bytes opaquely.
///
/// # Errors
///
/// Any error is fatal to the connection pair. On a classification or
/// decode error nothing is written; the buffered extent is left in the
/// context for the caller's disposal. The handshake-state transition is
/// not rolled back if the write itself fails.
pub async fn relay<R, W>(
    source: &mut R,
    sink: &mut W,
    readiness: Readiness,
    direction: Direction,
    ctx: &mut ConnectionContext,
) -> Result<usize>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if readiness == Readiness::NotReady {
        return Ok(0);
    }

    ctx.buffer.reset();
    ctx.buffer.fill_once(source).await?;

    if !ctx.handshake.is_done() {
        scan_handshake(source, direction, ctx).await?;
    }

    let extent = ctx.buffer.extent();
    sink.write_all(extent).await?;
    sink.flush().await?;
    trace!(%direction, bytes = extent.len(), "relayed");
    Ok(extent.len())
}

/// Walk the filled extent frame by frame until a terminal message, an
/// error, or the end of the extent.
async fn scan_handshake<R>(
    source: &mut R,
    direction: Direction,
    ctx: &mut ConnectionContext,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    while !ctx.handshake.is_done() {
        let frame = match ctx.buffer.next_frame(source).await? {
            Some(frame) => frame,
            None => break,
        };

        let class = classify(direction, frame.tag());
        if class == MessageClass::Reject {
            warn!(
                %direction,
                tag = frame.tag(),
                name = tag_name(direction, frame.tag()),
                "disallowed message during handshake"
            );
            return Err(RelayError::ProtocolViolation {
                direction,
                tag: frame.tag(),
            });
        }

        validate_payload(direction, frame.tag(), frame.payload())?;
        ctx.packet_seq = ctx.packet_seq.wrapping_add(1);
        debug!(
            %direction,
            name = tag_name(direction, frame.tag()),
            seq = ctx.packet_seq,
            "handshake frame"
        );

        if class == MessageClass::Terminal {
            ctx.handshake = HandshakeState::Done;
            debug!(%direction, "handshake inspection complete");
        }
    }
    Ok(())
}
