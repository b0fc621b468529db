//! Typed payload codecs for the message kinds the relay recognizes or
//! emits.
//!
//! Each decoder validates that a payload matches the schema required for
//! its declared tag; a mismatch is a `MalformedPayload` and ends the
//! connection. Unknown fields that are sound at the wire level are skipped,
//! per protobuf semantics. Only the synthesized-only outputs (`ServerError`
//! and `CapabilitiesGet`) carry encoders.

use bytes::Bytes;

use super::wire::{scan_message, WireReader, WireWriter};
use crate::error::{RelayError, Result};
use crate::policy::Direction;
use crate::protocol::{client_tag, server_tag};

fn malformed(tag: u8, reason: &'static str) -> RelayError {
    RelayError::MalformedPayload { tag, reason }
}

fn utf8(tag: u8, bytes: &[u8], reason: &'static str) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| malformed(tag, reason))
}

/// Session::AuthenticateStart, the client's opening authentication
/// message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticateStart {
    /// Authentication mechanism, e.g. "PLAIN" or "MYSQL41".
    pub mech_name: String,
    /// Mechanism-specific initial data.
    pub auth_data: Option<Bytes>,
    /// Deprecated initial response blob, still seen on the wire.
    pub initial_response: Option<Bytes>,
}

impl AuthenticateStart {
    /// Decode and validate an AuthenticateStart payload.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        const TAG: u8 = client_tag::AUTHENTICATE_START;

        let mut mech_name = None;
        let mut auth_data = None;
        let mut initial_response = None;

        let mut reader = WireReader::new(payload);
        while let Some(field) = reader.next_field().map_err(|e| malformed(TAG, e))? {
            match field.number {
                1 => {
                    let bytes = field
                        .bytes()
                        .ok_or_else(|| malformed(TAG, "mech_name must be a string"))?;
                    mech_name = Some(utf8(TAG, bytes, "mech_name must be valid UTF-8")?);
                }
                2 => {
                    let bytes = field
                        .bytes()
                        .ok_or_else(|| malformed(TAG, "auth_data must be bytes"))?;
                    auth_data = Some(Bytes::copy_from_slice(bytes));
                }
                3 => {
                    let bytes = field
                        .bytes()
                        .ok_or_else(|| malformed(TAG, "initial_response must be bytes"))?;
                    initial_response = Some(Bytes::copy_from_slice(bytes));
                }
                _ => {}
            }
        }

        Ok(Self {
            mech_name: mech_name.ok_or_else(|| malformed(TAG, "mech_name is required"))?,
            auth_data,
            initial_response,
        })
    }
}

/// Error, the server's (or the proxy's) fatal diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable message.
    pub msg: String,
    /// Five-character SQL state.
    pub sql_state: String,
}

impl ServerError {
    /// Decode and validate an Error payload.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        const TAG: u8 = server_tag::ERROR;

        let mut code = None;
        let mut msg = None;
        let mut sql_state = None;

        let mut reader = WireReader::new(payload);
        while let Some(field) = reader.next_field().map_err(|e| malformed(TAG, e))? {
            match field.number {
                1 => {
                    field
                        .varint()
                        .ok_or_else(|| malformed(TAG, "severity must be a varint"))?;
                }
                2 => {
                    let value = field
                        .varint()
                        .ok_or_else(|| malformed(TAG, "code must be a varint"))?;
                    code = Some(
                        u32::try_from(value).map_err(|_| malformed(TAG, "code exceeds uint32"))?,
                    );
                }
                3 => {
                    let bytes = field
                        .bytes()
                        .ok_or_else(|| malformed(TAG, "msg must be a string"))?;
                    msg = Some(utf8(TAG, bytes, "msg must be valid UTF-8")?);
                }
                4 => {
                    let bytes = field
                        .bytes()
                        .ok_or_else(|| malformed(TAG, "sql_state must be a string"))?;
                    sql_state = Some(utf8(TAG, bytes, "sql_state must be valid UTF-8")?);
                }
                _ => {}
            }
        }

        Ok(Self {
            code: code.ok_or_else(|| malformed(TAG, "code is required"))?,
            msg: msg.ok_or_else(|| malformed(TAG, "msg is required"))?,
            sql_state: sql_state.ok_or_else(|| malformed(TAG, "sql_state is required"))?,
        })
    }

    /// Encode this error as a payload, ready for `build_frame`.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = WireWriter::new();
        writer.put_varint_field(2, u64::from(self.code));
        writer.put_str_field(3, &self.msg);
        writer.put_str_field(4, &self.sql_state);
        writer.into_bytes()
    }
}

/// Connection::CapabilitiesGet, an empty probe message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitiesGet;

impl CapabilitiesGet {
    /// Validate a CapabilitiesGet payload (no required fields).
    pub fn decode(payload: &[u8]) -> Result<Self> {
        scan_message(payload).map_err(|e| malformed(client_tag::CAPABILITIES_GET, e))?;
        Ok(Self)
    }

    /// Encode the (empty) payload.
    pub fn encode(&self) -> Vec<u8> {
        Vec::new()
    }
}

/// Connection::Close, an empty close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionClose;

impl ConnectionClose {
    /// Validate a Connection::Close payload (no required fields).
    pub fn decode(payload: &[u8]) -> Result<Self> {
        scan_message(payload).map_err(|e| malformed(client_tag::CONNECTION_CLOSE, e))?;
        Ok(Self)
    }
}

/// One capability inside a CapabilitiesSet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    /// Capability name, e.g. "tls".
    pub name: String,
}

/// Connection::CapabilitiesSet, the client's capability negotiation.
///
/// The relay validates the nested structure (capability name plus typed
/// Any value) but only retains the names; values are forwarded verbatim
/// like every other byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitiesSet {
    /// The capabilities being negotiated.
    pub capabilities: Vec<Capability>,
}

impl CapabilitiesSet {
    /// Decode and validate a CapabilitiesSet payload.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        const TAG: u8 = client_tag::CAPABILITIES_SET;

        let mut capabilities = None;

        let mut reader = WireReader::new(payload);
        while let Some(field) = reader.next_field().map_err(|e| malformed(TAG, e))? {
            if field.number == 1 {
                let body = field
                    .bytes()
                    .ok_or_else(|| malformed(TAG, "capabilities must be a message"))?;
                capabilities = Some(decode_capability_list(body)?);
            }
        }

        Ok(Self {
            capabilities: capabilities
                .ok_or_else(|| malformed(TAG, "capabilities is required"))?,
        })
    }
}

fn decode_capability_list(body: &[u8]) -> Result<Vec<Capability>> {
    const TAG: u8 = client_tag::CAPABILITIES_SET;

    let mut list = Vec::new();
    let mut reader = WireReader::new(body);
    while let Some(field) = reader.next_field().map_err(|e| malformed(TAG, e))? {
        if field.number == 1 {
            let body = field
                .bytes()
                .ok_or_else(|| malformed(TAG, "capability must be a message"))?;
            list.push(decode_capability(body)?);
        }
    }
    Ok(list)
}

fn decode_capability(body: &[u8]) -> Result<Capability> {
    const TAG: u8 = client_tag::CAPABILITIES_SET;

    let mut name = None;
    let mut value_seen = false;

    let mut reader = WireReader::new(body);
    while let Some(field) = reader.next_field().map_err(|e| malformed(TAG, e))? {
        match field.number {
            1 => {
                let bytes = field
                    .bytes()
                    .ok_or_else(|| malformed(TAG, "capability name must be a string"))?;
                name = Some(utf8(TAG, bytes, "capability name must be valid UTF-8")?);
            }
            2 => {
                let body = field
                    .bytes()
                    .ok_or_else(|| malformed(TAG, "capability value must be a message"))?;
                validate_any(body)?;
                value_seen = true;
            }
            _ => {}
        }
    }

    if !value_seen {
        return Err(malformed(TAG, "capability value is required"));
    }
    Ok(Capability {
        name: name.ok_or_else(|| malformed(TAG, "capability name is required"))?,
    })
}

/// Validate a Datatypes::Any value: a required type discriminant plus a
/// wire-sound scalar/object/array body.
fn validate_any(body: &[u8]) -> Result<()> {
    const TAG: u8 = client_tag::CAPABILITIES_SET;

    let mut type_seen = false;

    let mut reader = WireReader::new(body);
    while let Some(field) = reader.next_field().map_err(|e| malformed(TAG, e))? {
        match field.number {
            1 => {
                field
                    .varint()
                    .ok_or_else(|| malformed(TAG, "value type must be a varint"))?;
                type_seen = true;
            }
            2..=4 => {
                let nested = field
                    .bytes()
                    .ok_or_else(|| malformed(TAG, "value body must be a message"))?;
                scan_message(nested).map_err(|e| malformed(TAG, e))?;
            }
            _ => {}
        }
    }

    if !type_seen {
        return Err(malformed(TAG, "value type is required"));
    }
    Ok(())
}

/// Validate a Notice::Frame payload for wire soundness.
///
/// The relay never interprets notice contents; it only refuses byte
/// sequences that are not protobuf at all.
pub fn validate_notice(payload: &[u8]) -> Result<()> {
    scan_message(payload).map_err(|e| malformed(server_tag::NOTICE, e))
}

/// Validate the payload of a recognized handshake-phase message.
///
/// The caller has already classified `tag` as allowed for `direction`;
/// this checks the payload against the schema that tag declares.
pub fn validate_payload(direction: Direction, tag: u8, payload: &[u8]) -> Result<()> {
    match (direction, tag) {
        (Direction::ClientToServer, client_tag::AUTHENTICATE_START) => {
            AuthenticateStart::decode(payload).map(|_| ())
        }
        (Direction::ClientToServer, client_tag::CAPABILITIES_GET) => {
            CapabilitiesGet::decode(payload).map(|_| ())
        }
        (Direction::ClientToServer, client_tag::CAPABILITIES_SET) => {
            CapabilitiesSet::decode(payload).map(|_| ())
        }
        (Direction::ClientToServer, client_tag::CONNECTION_CLOSE) => {
            ConnectionClose::decode(payload).map(|_| ())
        }
        (Direction::ServerToClient, server_tag::ERROR) => {
            ServerError::decode(payload).map(|_| ())
        }
        (Direction::ServerToClient, server_tag::NOTICE) => validate_notice(payload),
        _ => Err(malformed(tag, "tag has no handshake schema")),
    }
}
