//! Protocol module - wire format, framing, and the network buffer.
//!
//! This module implements the frame layer of the X protocol:
//! - 4-byte Little Endian length prefix plus 1-byte type tag
//! - fixed-capacity network buffer with incremental frame extraction
//! - Frame struct with typed accessors

mod frame;
mod net_buffer;
mod wire_format;

pub use frame::{build_frame, Frame};
pub use net_buffer::NetBuffer;
pub use wire_format::{
    client_tag, server_tag, Header, DEFAULT_NET_BUFFER_SIZE, HEADER_SIZE, LENGTH_FIELD_SIZE,
};
