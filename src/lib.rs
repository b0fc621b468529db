//! # xrelay
//!
//! Handshake-aware relay core for the MySQL X protocol, as used by a
//! routing proxy sitting between a database client and a database server.
//!
//! For the bulk of a connection's life the proxy is a transparent
//! byte-stream splicer. During the initial handshake it understands just
//! enough of the wire format to know *when* the handshake has concluded,
//! *reject* malformed or out-of-sequence traffic, and occasionally
//! *synthesize* protocol-conformant frames on its own behalf.
//!
//! ## Architecture
//!
//! ```text
//! readiness event ─► relay() ─┬─ handshake done ──► single read ──► verbatim write
//!                             │
//!                             └─ in progress ──► NetBuffer::next_frame()
//!                                                  │
//!                                    policy::classify() + codec validation
//!                                                  │
//!                               Terminal / Continue / Reject ──► verbatim write
//! ```
//!
//! - [`protocol`] - frame prefix codec and the fixed-capacity network
//!   buffer with incremental frame extraction
//! - [`codec`] - protobuf payload schemas for the recognized message kinds
//! - [`policy`] - per-direction handshake allow-lists
//! - [`relay`] - the per-readiness-event state machine
//! - [`synth`] - proxy-originated Error and CapabilitiesGet frames
//!
//! ## Example
//!
//! ```ignore
//! use xrelay::{relay, ConnectionContext, Direction, Readiness};
//!
//! let mut ctx = ConnectionContext::new();
//! let n = relay(
//!     &mut client,
//!     &mut server,
//!     Readiness::Ready,
//!     Direction::ClientToServer,
//!     &mut ctx,
//! )
//! .await?;
//! ```

pub mod codec;
pub mod error;
pub mod policy;
pub mod protocol;
pub mod relay;
pub mod synth;

#[cfg(test)]
pub(crate) mod test_io;

pub use error::{RelayError, Result};
pub use policy::{classify, Direction, MessageClass};
pub use relay::{relay, ConnectionContext, HandshakeState, Readiness};
pub use synth::{notify_error, probe_capabilities};
