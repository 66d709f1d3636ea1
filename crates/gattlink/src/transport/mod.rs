//! Transport of length-framed messages over a GATT connection
//!
//! This module provides:
//! - Per-connection reassembly of inbound characteristic writes
//! - Fragmentation of outbound messages into MTU-sized notifications
//! - Packet buffers with endpoint metadata and a bounded header pool

pub mod buffer;
pub mod config;
pub mod constants;
pub mod fragment;
pub mod framing;
pub mod gatt;
pub mod reassembly;
pub mod service;
pub mod stats;
pub mod types;

// Re-export the public API
pub use self::buffer::{Endpoint, EndpointFlags, HeaderLease, HeaderPool, PacketBuf};
pub use self::config::{Role, TransportConfig};
pub use self::fragment::{fragment, FragmentChain};
pub use self::framing::{CoapTcpFraming, FrameLength};
pub use self::gatt::{GattLink, GattTransport};
pub use self::reassembly::ReassemblyQueue;
pub use self::service::{CharacteristicDef, CharacteristicFlags, ServiceDef, OC_GATT_SERVICE};
pub use self::stats::{StatsSnapshot, TransportStats};
pub use self::types::*;
