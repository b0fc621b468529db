//! Codec module - payload schema encoding and decoding.
//!
//! Frame payloads are protobuf messages. This module carries the wire-level
//! primitives ([`WireReader`], [`WireWriter`]) and the typed codecs for the
//! handful of message kinds the relay must recognize or emit:
//!
//! - client-originated: [`AuthenticateStart`], [`CapabilitiesGet`],
//!   [`CapabilitiesSet`], [`ConnectionClose`]
//! - server-originated: [`ServerError`], notices (wire-soundness only)
//! - synthesized by the proxy: [`ServerError`], [`CapabilitiesGet`]
//!
//! # Design
//!
//! Decoders validate structure and required fields; wire-sound unknown
//! fields are skipped. The relay never rewrites a payload: decoding is
//! purely observational, and the original bytes are what gets forwarded.

mod messages;
mod wire;

pub use messages::{
    validate_notice, validate_payload, AuthenticateStart, CapabilitiesGet, CapabilitiesSet,
    Capability, ConnectionClose, ServerError,
};
pub use wire::{scan_message, Field, FieldValue, WireReader, WireResult, WireWriter};
