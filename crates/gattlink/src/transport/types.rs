//! Type definitions for the GATT transport
//!
//! This module contains the error type and the result of feeding one
//! fragment into reassembly.

use super::buffer::PacketBuf;
use super::config::Role;
use thiserror::Error;

/// Connection handle assigned by the link layer
pub type ConnHandle = u16;

/// Error types specific to the GATT transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Buffer header allocation failed")]
    ResourceExhausted,

    #[error("Usable MTU of {0} bytes is too small to carry data")]
    MtuTooSmall(usize),

    #[error("Operation not supported in {0:?} role")]
    UnsupportedRole(Role),

    #[error("Buffer is bound to connection {bound}, not {requested}")]
    EndpointMismatch {
        bound: ConnHandle,
        requested: ConnHandle,
    },

    #[error("Link error: {0}")]
    Link(String),
}

/// Result type for transport operations
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Result of handing one inbound fragment to reassembly
#[derive(Debug)]
pub enum Outcome {
    /// A whole message is available; ownership passes to the caller
    Complete(PacketBuf),
    /// The fragment was buffered and more are expected
    Incomplete,
    /// The fragment was dropped
    Failed(TransportError),
}

impl Outcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete(_))
    }

    /// Take the completed message, if any
    pub fn into_message(self) -> Option<PacketBuf> {
        match self {
            Outcome::Complete(message) => Some(message),
            _ => None,
        }
    }
}
