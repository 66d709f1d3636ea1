//! Type definitions for the ATT PDUs
//!
//! Each PDU is a plain struct holding the fixed fields of its wire layout.
//! Offsets are fixed by the Bluetooth Core specification and are written
//! explicitly; nothing here depends on in-memory layout. PDUs that carry a
//! variable trailing region (attribute values, UUIDs, handle lists) only
//! describe their fixed header; [`AttPacket::trailing`] hands back the rest.
use super::constants::*;
use super::error::{AttError, AttErrorCode, AttResult};
use byteorder::{ByteOrder, LittleEndian};

/// ATT packet formats
pub trait AttPacket: Sized {
    /// Opcodes accepted by [`AttPacket::parse`]
    const OPCODES: &'static [u8];

    /// Size of the fixed part of the PDU, opcode included
    const SIZE: usize;

    /// Decode the fixed fields. `data` is at least [`Self::SIZE`] long and
    /// carries one of [`Self::OPCODES`].
    fn decode_fields(data: &[u8]) -> Self;

    /// Encode opcode and fixed fields. `buf` is at least [`Self::SIZE`] long.
    fn encode_fields(&self, buf: &mut [u8]);

    /// Parse packet from bytes
    fn parse(data: &[u8]) -> AttResult<Self> {
        check_size(data.len(), Self::SIZE)?;

        let opcode = data[0];
        if !Self::OPCODES.contains(&opcode) {
            return Err(AttError::OpcodeMismatch {
                found: opcode,
                expected: Self::OPCODES,
            });
        }

        Ok(Self::decode_fields(data))
    }

    /// Write the packet into the front of `buf`
    fn write(&self, buf: &mut [u8]) -> AttResult<()> {
        check_size(buf.len(), Self::SIZE)?;
        self.encode_fields(buf);
        Ok(())
    }

    /// Serialize packet to a freshly allocated buffer
    fn serialize(&self) -> Vec<u8> {
        let mut packet = vec![0u8; Self::SIZE];
        self.encode_fields(&mut packet);
        packet
    }

    /// The variable region following the fixed fields
    fn trailing(data: &[u8]) -> &[u8] {
        data.get(Self::SIZE..).unwrap_or(&[])
    }
}

fn check_size(actual: usize, required: usize) -> AttResult<()> {
    if actual < required {
        return Err(AttError::Size { required, actual });
    }
    Ok(())
}

/// Error response packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Request opcode in error
    pub request_opcode: u8,
    /// Attribute handle in error
    pub handle: u16,
    /// Raw error code
    pub error_code: u8,
}

impl AttPacket for ErrorResponse {
    const OPCODES: &'static [u8] = &[ATT_ERROR_RSP];
    const SIZE: usize = ATT_ERROR_RSP_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            request_opcode: data[1],
            handle: LittleEndian::read_u16(&data[2..4]),
            error_code: data[4],
        }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_ERROR_RSP;
        buf[1] = self.request_opcode;
        LittleEndian::write_u16(&mut buf[2..4], self.handle);
        buf[4] = self.error_code;
    }
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(request_opcode: u8, handle: u16, error_code: AttErrorCode) -> Self {
        Self {
            request_opcode,
            handle,
            error_code: error_code.into(),
        }
    }

    /// Build the response for a request that failed to decode
    pub fn from_error(request_opcode: u8, handle: u16, error: &AttError) -> Self {
        Self::new(request_opcode, handle, error.to_error_code())
    }

    /// The error code as a typed value
    pub fn kind(&self) -> AttErrorCode {
        AttErrorCode::from(self.error_code)
    }
}

/// Direction of an Exchange MTU PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtuKind {
    /// Client Rx MTU, sent by the client
    Request,
    /// Server Rx MTU, sent by the server
    Response,
}

/// Exchange MTU Request or Response.
///
/// Both directions share one layout; only the opcode tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeMtu {
    /// Which opcode this PDU carries
    pub kind: MtuKind,
    /// Rx MTU of the sender
    pub mtu: u16,
}

impl ExchangeMtu {
    pub fn request(mtu: u16) -> Self {
        Self {
            kind: MtuKind::Request,
            mtu,
        }
    }

    pub fn response(mtu: u16) -> Self {
        Self {
            kind: MtuKind::Response,
            mtu,
        }
    }

    /// Opcode matching [`ExchangeMtu::kind`]
    pub fn opcode(&self) -> u8 {
        match self.kind {
            MtuKind::Request => ATT_EXCHANGE_MTU_REQ,
            MtuKind::Response => ATT_EXCHANGE_MTU_RSP,
        }
    }
}

impl AttPacket for ExchangeMtu {
    const OPCODES: &'static [u8] = &[ATT_EXCHANGE_MTU_REQ, ATT_EXCHANGE_MTU_RSP];
    const SIZE: usize = ATT_MTU_CMD_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        let kind = if data[0] == ATT_EXCHANGE_MTU_REQ {
            MtuKind::Request
        } else {
            MtuKind::Response
        };

        Self {
            kind,
            mtu: LittleEndian::read_u16(&data[1..3]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = self.opcode();
        LittleEndian::write_u16(&mut buf[1..3], self.mtu);
    }
}

/// Find Information Request packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindInformationRequest {
    /// First requested handle
    pub start_handle: u16,
    /// Last requested handle
    pub end_handle: u16,
}

impl AttPacket for FindInformationRequest {
    const OPCODES: &'static [u8] = &[ATT_FIND_INFO_REQ];
    const SIZE: usize = ATT_FIND_INFO_REQ_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            start_handle: LittleEndian::read_u16(&data[1..3]),
            end_handle: LittleEndian::read_u16(&data[3..5]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_FIND_INFO_REQ;
        LittleEndian::write_u16(&mut buf[1..3], self.start_handle);
        LittleEndian::write_u16(&mut buf[3..5], self.end_handle);
    }
}

/// Find Information Response header.
///
/// The handle/UUID pairs follow in the trailing region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindInformationResponse {
    /// Format of information data
    pub format: u8,
}

impl FindInformationResponse {
    /// Length of one handle/UUID pair for the declared format
    pub fn entry_len(&self) -> Option<usize> {
        match self.format {
            ATT_FIND_INFO_RSP_FORMAT_16BIT => Some(2 + 2),
            ATT_FIND_INFO_RSP_FORMAT_128BIT => Some(2 + 16),
            _ => None,
        }
    }
}

impl AttPacket for FindInformationResponse {
    const OPCODES: &'static [u8] = &[ATT_FIND_INFO_RSP];
    const SIZE: usize = ATT_FIND_INFO_RSP_BASE_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self { format: data[1] }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_FIND_INFO_RSP;
        buf[1] = self.format;
    }
}

/// Find By Type Value Request header; the attribute value trails it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindByTypeValueRequest {
    /// First requested handle
    pub start_handle: u16,
    /// Last requested handle
    pub end_handle: u16,
    /// 16-bit attribute type
    pub attribute_type: u16,
}

impl AttPacket for FindByTypeValueRequest {
    const OPCODES: &'static [u8] = &[ATT_FIND_BY_TYPE_VALUE_REQ];
    const SIZE: usize = ATT_FIND_BY_TYPE_VALUE_REQ_MIN_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            start_handle: LittleEndian::read_u16(&data[1..3]),
            end_handle: LittleEndian::read_u16(&data[3..5]),
            attribute_type: LittleEndian::read_u16(&data[5..7]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_FIND_BY_TYPE_VALUE_REQ;
        LittleEndian::write_u16(&mut buf[1..3], self.start_handle);
        LittleEndian::write_u16(&mut buf[3..5], self.end_handle);
        LittleEndian::write_u16(&mut buf[5..7], self.attribute_type);
    }
}

/// Read By Type Request header; the 16- or 128-bit type UUID trails it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadByTypeRequest {
    /// First requested handle
    pub start_handle: u16,
    /// Last requested handle
    pub end_handle: u16,
}

impl AttPacket for ReadByTypeRequest {
    const OPCODES: &'static [u8] = &[ATT_READ_BY_TYPE_REQ];
    const SIZE: usize = ATT_READ_BY_TYPE_REQ_BASE_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            start_handle: LittleEndian::read_u16(&data[1..3]),
            end_handle: LittleEndian::read_u16(&data[3..5]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_READ_BY_TYPE_REQ;
        LittleEndian::write_u16(&mut buf[1..3], self.start_handle);
        LittleEndian::write_u16(&mut buf[3..5], self.end_handle);
    }
}

/// Read By Type Response header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadByTypeResponse {
    /// Length of each handle/value pair in the trailing region
    pub length: u8,
}

impl AttPacket for ReadByTypeResponse {
    const OPCODES: &'static [u8] = &[ATT_READ_BY_TYPE_RSP];
    const SIZE: usize = ATT_READ_BY_TYPE_RSP_MIN_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self { length: data[1] }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_READ_BY_TYPE_RSP;
        buf[1] = self.length;
    }
}

/// Read Request packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    /// Handle to read
    pub handle: u16,
}

impl AttPacket for ReadRequest {
    const OPCODES: &'static [u8] = &[ATT_READ_REQ];
    const SIZE: usize = ATT_READ_REQ_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            handle: LittleEndian::read_u16(&data[1..3]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_READ_REQ;
        LittleEndian::write_u16(&mut buf[1..3], self.handle);
    }
}

/// Read By Group Type Request header; the group type UUID trails it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadByGroupTypeRequest {
    /// First requested handle
    pub start_handle: u16,
    /// Last requested handle
    pub end_handle: u16,
}

impl AttPacket for ReadByGroupTypeRequest {
    const OPCODES: &'static [u8] = &[ATT_READ_BY_GROUP_TYPE_REQ];
    const SIZE: usize = ATT_READ_BY_GROUP_TYPE_REQ_BASE_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            start_handle: LittleEndian::read_u16(&data[1..3]),
            end_handle: LittleEndian::read_u16(&data[3..5]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_READ_BY_GROUP_TYPE_REQ;
        LittleEndian::write_u16(&mut buf[1..3], self.start_handle);
        LittleEndian::write_u16(&mut buf[3..5], self.end_handle);
    }
}

/// Read By Group Type Response header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadByGroupTypeResponse {
    /// Length of each attribute data entry in the trailing region
    pub length: u8,
}

impl AttPacket for ReadByGroupTypeResponse {
    const OPCODES: &'static [u8] = &[ATT_READ_BY_GROUP_TYPE_RSP];
    const SIZE: usize = ATT_READ_BY_GROUP_TYPE_RSP_BASE_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self { length: data[1] }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_READ_BY_GROUP_TYPE_RSP;
        buf[1] = self.length;
    }
}

/// Write Request header; the attribute value trails it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRequest {
    /// Handle to write
    pub handle: u16,
}

impl AttPacket for WriteRequest {
    const OPCODES: &'static [u8] = &[ATT_WRITE_REQ];
    const SIZE: usize = ATT_WRITE_REQ_MIN_SZ;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            handle: LittleEndian::read_u16(&data[1..3]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8]) {
        buf[0] = ATT_WRITE_REQ;
        LittleEndian::write_u16(&mut buf[1..3], self.handle);
    }
}
