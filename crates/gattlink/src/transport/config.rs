//! Transport configuration

use super::constants::NOTIFY_ENVELOPE_OVERHEAD;
use crate::att::{Pdu, PduOrigin};

/// GATT role the transport runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Hosts the service; receives requests and notifies responses
    Server,
    /// Talks to a remote service
    Client,
}

impl Role {
    /// Whether an inbound PDU belongs to this role's capability set.
    ///
    /// A server handles what clients send and vice versa.
    pub fn accepts(&self, pdu: &Pdu) -> bool {
        match self {
            Role::Server => pdu.origin() == PduOrigin::Client,
            Role::Client => pdu.origin() == PduOrigin::Server,
        }
    }
}

/// GATT transport configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Role selected at start-up
    pub role: Role,
    /// Bytes of each notification reserved for the ATT envelope
    pub envelope_overhead: u16,
    /// Value handle of the request characteristic; 0 until registered
    pub request_handle: u16,
    /// Value handle of the response characteristic; 0 until registered
    pub response_handle: u16,
    /// Number of buffer headers available, `None` for no limit
    pub header_pool_size: Option<usize>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            role: Role::Server,
            envelope_overhead: NOTIFY_ENVELOPE_OVERHEAD,
            request_handle: 0,
            response_handle: 0,
            header_pool_size: None,
        }
    }
}
