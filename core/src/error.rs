//! Error types for the social service client.
//!
//! # Design
//! `AccessDenied` gets a dedicated variant because 403 is part of the wire
//! contract: the server answers it whenever the token does not grant the
//! operation, and callers routinely branch on it. Every other non-2xx
//! status lands in `Service` with the raw status and body for debugging.
//! Decoding failures only surface as `Decode` under `DecodePolicy::Strict`;
//! the default lenient policy turns them into "not found" instead.

use std::fmt;

/// Errors returned by `SocialClient` and `SocialService`.
#[derive(Debug)]
pub enum SocialError {
    /// The server returned 403 — the token does not grant this operation.
    AccessDenied,

    /// The server returned a non-2xx status other than 403.
    Service { status: u16, detail: String },

    /// The response envelope carried a populated `errorCode`.
    Remote { code: String, message: String },

    /// Connection, timeout, or protocol-level failure before a status
    /// line was obtained.
    Transport(String),

    /// The response body could not be decoded into the expected shape
    /// (strict policy only).
    Decode(String),

    /// The request payload could not be serialized to JSON.
    Encode(String),

    /// A caller-supplied precondition was violated; no request was sent.
    InvalidArgument(String),
}

impl fmt::Display for SocialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocialError::AccessDenied => write!(f, "access denied"),
            SocialError::Service { status, detail } => {
                write!(f, "service error HTTP {status}: {detail}")
            }
            SocialError::Remote { code, message } => {
                write!(f, "remote error {code}: {message}")
            }
            SocialError::Transport(msg) => write!(f, "transport failed: {msg}"),
            SocialError::Decode(msg) => write!(f, "decoding failed: {msg}"),
            SocialError::Encode(msg) => write!(f, "serialization failed: {msg}"),
            SocialError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for SocialError {}
