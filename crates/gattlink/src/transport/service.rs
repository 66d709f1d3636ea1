//! GATT service carrying the transport
//!
//! Clients write requests to the request characteristic; the server answers
//! with notifications on the response characteristic.

use super::constants::*;
use bitflags::bitflags;

bitflags! {
    /// Characteristic properties as advertised in the declaration
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharacteristicFlags: u8 {
        const READ = 0x02;
        const WRITE_NO_RSP = 0x04;
        const WRITE = 0x08;
        const NOTIFY = 0x10;
    }
}

/// One characteristic of the transport service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacteristicDef {
    pub uuid: [u8; 16],
    pub flags: CharacteristicFlags,
}

/// Primary service definition handed to the GATT server for registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDef {
    pub uuid: [u8; 16],
    pub request: CharacteristicDef,
    pub response: CharacteristicDef,
}

/// The transport service with its request and response characteristics
pub const OC_GATT_SERVICE: ServiceDef = ServiceDef {
    uuid: OC_GATT_SERVICE_UUID,
    request: CharacteristicDef {
        uuid: OC_GATT_REQ_CHR_UUID,
        flags: CharacteristicFlags::WRITE
            .union(CharacteristicFlags::WRITE_NO_RSP)
            .union(CharacteristicFlags::NOTIFY),
    },
    response: CharacteristicDef {
        uuid: OC_GATT_RSP_CHR_UUID,
        flags: CharacteristicFlags::NOTIFY,
    },
};
