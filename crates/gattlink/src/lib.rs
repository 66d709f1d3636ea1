//! GattLink - ATT PDU codec and GATT message transport
//!
//! This library provides the Bluetooth Low Energy Attribute Protocol (ATT)
//! wire codec for the discovery, read and write PDU family, together with a
//! transport that carries length-framed application messages over a GATT
//! connection: per-connection reassembly of inbound writes and fragmentation
//! of outbound messages into MTU-sized notifications.

pub mod att;
pub mod transport;

// Re-export common types for convenience
pub use att::{AttError, AttErrorCode, AttPacket, AttResult, Pdu, PduOrigin};
pub use transport::{
    fragment, GattLink, GattTransport, HeaderPool, Outcome, PacketBuf, ReassemblyQueue, Role,
    TransportConfig, TransportError, TransportResult,
};
