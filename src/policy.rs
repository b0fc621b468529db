//! Handshake policy table.
//!
//! During the handshake window the proxy only recognizes the small set of
//! messages that legitimately open or immediately close a session. Anything
//! else at this phase is a protocol violation worth terminating the
//! connection for, rather than guessing intent.

use std::fmt;

use crate::protocol::{client_tag, server_tag};

/// Which half of the relayed connection a call is copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Traffic flowing from the database client toward the server.
    ClientToServer,
    /// Traffic flowing from the database server toward the client.
    ServerToClient,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ClientToServer => f.write_str("client->server"),
            Direction::ServerToClient => f.write_str("server->client"),
        }
    }
}

/// Classification of one handshake-phase message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    /// Ends the inspection phase; the handshake is done after this frame.
    Terminal,
    /// Recognized; the handshake stays in progress, keep scanning.
    Continue,
    /// Not allowed for this direction during the handshake.
    Reject,
}

/// Look up the class of a message tag for the given direction.
///
/// Pure table lookup; payload validity is a separate concern.
pub fn classify(direction: Direction, tag: u8) -> MessageClass {
    match direction {
        Direction::ClientToServer => match tag {
            client_tag::CAPABILITIES_GET
            | client_tag::CAPABILITIES_SET
            | client_tag::CONNECTION_CLOSE
            | client_tag::AUTHENTICATE_START => MessageClass::Terminal,
            _ => MessageClass::Reject,
        },
        Direction::ServerToClient => match tag {
            server_tag::ERROR => MessageClass::Terminal,
            server_tag::NOTICE => MessageClass::Continue,
            _ => MessageClass::Reject,
        },
    }
}

/// Human-readable tag name for diagnostics.
pub fn tag_name(direction: Direction, tag: u8) -> &'static str {
    match direction {
        Direction::ClientToServer => match tag {
            client_tag::CAPABILITIES_GET => "Connection::CapabilitiesGet",
            client_tag::CAPABILITIES_SET => "Connection::CapabilitiesSet",
            client_tag::CONNECTION_CLOSE => "Connection::Close",
            client_tag::AUTHENTICATE_START => "Session::AuthenticateStart",
            client_tag::AUTHENTICATE_CONTINUE => "Session::AuthenticateContinue",
            client_tag::SESSION_RESET => "Session::Reset",
            client_tag::SESSION_CLOSE => "Session::Close",
            _ => "unknown client message",
        },
        Direction::ServerToClient => match tag {
            server_tag::OK => "Ok",
            server_tag::ERROR => "Error",
            server_tag::CAPABILITIES => "Connection::Capabilities",
            server_tag::NOTICE => "Notice::Frame",
            _ => "unknown server message",
        },
    }
}
