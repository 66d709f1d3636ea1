//! Attribute Protocol (ATT) PDU codec
//!
//! This module translates between the fixed-layout ATT wire PDUs and typed
//! field structs. It checks wire size and opcode only; field values such as
//! handle ranges are left to the exchange engine that consumes them.

pub mod constants;
pub mod error;
pub mod pdu;
pub mod types;
#[cfg(test)]
mod tests;

// Re-export the public API
pub use self::constants::*;
pub use self::error::{AttError, AttErrorCode, AttResult};
pub use self::pdu::{Pdu, PduOrigin};
pub use self::types::*;
