//! Opcode-dispatched view over the ATT PDU family
use super::constants::*;
use super::error::{AttError, AttResult};
use super::types::*;

/// Which side of an ATT bearer sends a given PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduOrigin {
    Client,
    Server,
}

/// One decoded ATT PDU.
///
/// The variant is chosen once from the leading opcode; encoding goes back
/// through the matching [`AttPacket`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pdu {
    ErrorResponse(ErrorResponse),
    ExchangeMtu(ExchangeMtu),
    FindInformationRequest(FindInformationRequest),
    FindInformationResponse(FindInformationResponse),
    FindByTypeValueRequest(FindByTypeValueRequest),
    ReadByTypeRequest(ReadByTypeRequest),
    ReadByTypeResponse(ReadByTypeResponse),
    ReadRequest(ReadRequest),
    ReadByGroupTypeRequest(ReadByGroupTypeRequest),
    ReadByGroupTypeResponse(ReadByGroupTypeResponse),
    WriteRequest(WriteRequest),
}

impl Pdu {
    /// Parse any supported PDU, selecting the layout from the opcode
    pub fn parse(payload: &[u8]) -> AttResult<Self> {
        let opcode = *payload.first().ok_or(AttError::Size {
            required: 1,
            actual: 0,
        })?;

        match opcode {
            ATT_ERROR_RSP => ErrorResponse::parse(payload).map(Pdu::ErrorResponse),
            ATT_EXCHANGE_MTU_REQ | ATT_EXCHANGE_MTU_RSP => {
                ExchangeMtu::parse(payload).map(Pdu::ExchangeMtu)
            }
            ATT_FIND_INFO_REQ => {
                FindInformationRequest::parse(payload).map(Pdu::FindInformationRequest)
            }
            ATT_FIND_INFO_RSP => {
                FindInformationResponse::parse(payload).map(Pdu::FindInformationResponse)
            }
            ATT_FIND_BY_TYPE_VALUE_REQ => {
                FindByTypeValueRequest::parse(payload).map(Pdu::FindByTypeValueRequest)
            }
            ATT_READ_BY_TYPE_REQ => ReadByTypeRequest::parse(payload).map(Pdu::ReadByTypeRequest),
            ATT_READ_BY_TYPE_RSP => {
                ReadByTypeResponse::parse(payload).map(Pdu::ReadByTypeResponse)
            }
            ATT_READ_REQ => ReadRequest::parse(payload).map(Pdu::ReadRequest),
            ATT_READ_BY_GROUP_TYPE_REQ => {
                ReadByGroupTypeRequest::parse(payload).map(Pdu::ReadByGroupTypeRequest)
            }
            ATT_READ_BY_GROUP_TYPE_RSP => {
                ReadByGroupTypeResponse::parse(payload).map(Pdu::ReadByGroupTypeResponse)
            }
            ATT_WRITE_REQ => WriteRequest::parse(payload).map(Pdu::WriteRequest),
            other => Err(AttError::UnsupportedOpcode(other)),
        }
    }

    /// Opcode this PDU is written with
    pub fn opcode(&self) -> u8 {
        match self {
            Pdu::ErrorResponse(_) => ATT_ERROR_RSP,
            Pdu::ExchangeMtu(pdu) => pdu.opcode(),
            Pdu::FindInformationRequest(_) => ATT_FIND_INFO_REQ,
            Pdu::FindInformationResponse(_) => ATT_FIND_INFO_RSP,
            Pdu::FindByTypeValueRequest(_) => ATT_FIND_BY_TYPE_VALUE_REQ,
            Pdu::ReadByTypeRequest(_) => ATT_READ_BY_TYPE_REQ,
            Pdu::ReadByTypeResponse(_) => ATT_READ_BY_TYPE_RSP,
            Pdu::ReadRequest(_) => ATT_READ_REQ,
            Pdu::ReadByGroupTypeRequest(_) => ATT_READ_BY_GROUP_TYPE_REQ,
            Pdu::ReadByGroupTypeResponse(_) => ATT_READ_BY_GROUP_TYPE_RSP,
            Pdu::WriteRequest(_) => ATT_WRITE_REQ,
        }
    }

    /// Size of the fixed part on the wire
    pub fn wire_size(&self) -> usize {
        match self {
            Pdu::ErrorResponse(_) => ErrorResponse::SIZE,
            Pdu::ExchangeMtu(_) => ExchangeMtu::SIZE,
            Pdu::FindInformationRequest(_) => FindInformationRequest::SIZE,
            Pdu::FindInformationResponse(_) => FindInformationResponse::SIZE,
            Pdu::FindByTypeValueRequest(_) => FindByTypeValueRequest::SIZE,
            Pdu::ReadByTypeRequest(_) => ReadByTypeRequest::SIZE,
            Pdu::ReadByTypeResponse(_) => ReadByTypeResponse::SIZE,
            Pdu::ReadRequest(_) => ReadRequest::SIZE,
            Pdu::ReadByGroupTypeRequest(_) => ReadByGroupTypeRequest::SIZE,
            Pdu::ReadByGroupTypeResponse(_) => ReadByGroupTypeResponse::SIZE,
            Pdu::WriteRequest(_) => WriteRequest::SIZE,
        }
    }

    /// Write opcode and fixed fields into the front of `buf`
    pub fn write(&self, buf: &mut [u8]) -> AttResult<()> {
        match self {
            Pdu::ErrorResponse(pdu) => pdu.write(buf),
            Pdu::ExchangeMtu(pdu) => pdu.write(buf),
            Pdu::FindInformationRequest(pdu) => pdu.write(buf),
            Pdu::FindInformationResponse(pdu) => pdu.write(buf),
            Pdu::FindByTypeValueRequest(pdu) => pdu.write(buf),
            Pdu::ReadByTypeRequest(pdu) => pdu.write(buf),
            Pdu::ReadByTypeResponse(pdu) => pdu.write(buf),
            Pdu::ReadRequest(pdu) => pdu.write(buf),
            Pdu::ReadByGroupTypeRequest(pdu) => pdu.write(buf),
            Pdu::ReadByGroupTypeResponse(pdu) => pdu.write(buf),
            Pdu::WriteRequest(pdu) => pdu.write(buf),
        }
    }

    /// Serialize the fixed part to a new buffer
    pub fn serialize(&self) -> Vec<u8> {
        let mut packet = vec![0u8; self.wire_size()];
        // The buffer is sized from wire_size(), so the size check cannot trip.
        let _ = self.write(&mut packet);
        packet
    }

    /// Side of the bearer that originates this PDU
    pub fn origin(&self) -> PduOrigin {
        match self {
            Pdu::ExchangeMtu(pdu) if pdu.kind == MtuKind::Request => PduOrigin::Client,
            Pdu::ErrorResponse(_)
            | Pdu::ExchangeMtu(_)
            | Pdu::FindInformationResponse(_)
            | Pdu::ReadByTypeResponse(_)
            | Pdu::ReadByGroupTypeResponse(_) => PduOrigin::Server,
            Pdu::FindInformationRequest(_)
            | Pdu::FindByTypeValueRequest(_)
            | Pdu::ReadByTypeRequest(_)
            | Pdu::ReadRequest(_)
            | Pdu::ReadByGroupTypeRequest(_)
            | Pdu::WriteRequest(_) => PduOrigin::Client,
        }
    }
}
