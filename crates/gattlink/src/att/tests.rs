//! Unit tests for the ATT PDU codec

use super::*;
use rstest::rstest;
use std::fmt::Debug;

/// Every length below the fixed size must be refused by parse and write.
fn assert_rejects_short_buffers<P: AttPacket + Debug>() {
    for len in 0..P::SIZE {
        let mut data = vec![0u8; len];
        if let Some(first) = data.first_mut() {
            *first = P::OPCODES[0];
        }

        let err = P::parse(&data).unwrap_err();
        assert_eq!(
            err,
            AttError::Size {
                required: P::SIZE,
                actual: len
            }
        );
    }
}

fn assert_write_rejects_short_buffers<P: AttPacket + Debug>(pdu: &P) {
    for len in 0..P::SIZE {
        let mut buf = vec![0xAAu8; len];
        assert!(matches!(pdu.write(&mut buf), Err(AttError::Size { .. })));
        // Nothing may be written on failure
        assert!(buf.iter().all(|b| *b == 0xAA));
    }
}

fn round_trip<P: AttPacket + PartialEq + Debug>(pdu: P) {
    let mut buf = vec![0u8; P::SIZE];
    pdu.write(&mut buf).unwrap();
    assert_eq!(P::parse(&buf).unwrap(), pdu);
    assert_eq!(pdu.serialize(), buf);
}

#[test]
fn test_error_response_layout() {
    let rsp = ErrorResponse::new(ATT_READ_REQ, 0x1234, AttErrorCode::ReadNotPermitted);
    let bytes = rsp.serialize();
    assert_eq!(bytes, vec![0x01, 0x0A, 0x34, 0x12, 0x02]);

    let parsed = ErrorResponse::parse(&bytes).unwrap();
    assert_eq!(parsed.request_opcode, ATT_READ_REQ);
    assert_eq!(parsed.handle, 0x1234);
    assert_eq!(parsed.kind(), AttErrorCode::ReadNotPermitted);
}

#[test]
fn test_error_response_from_codec_error() {
    let err = ReadRequest::parse(&[ATT_READ_REQ, 0x01]).unwrap_err();
    let rsp = ErrorResponse::from_error(ATT_READ_REQ, 0, &err);
    assert_eq!(rsp.kind(), AttErrorCode::InvalidPdu);

    let rsp = ErrorResponse::from_error(0x3F, 0, &AttError::UnsupportedOpcode(0x3F));
    assert_eq!(rsp.kind(), AttErrorCode::RequestNotSupported);
}

#[test]
fn test_exchange_mtu_accepts_both_opcodes() {
    let req = ExchangeMtu::parse(&[ATT_EXCHANGE_MTU_REQ, 0x00, 0x02]).unwrap();
    assert_eq!(req, ExchangeMtu::request(512));

    let rsp = ExchangeMtu::parse(&[ATT_EXCHANGE_MTU_RSP, 0xF7, 0x00]).unwrap();
    assert_eq!(rsp, ExchangeMtu::response(247));

    assert_eq!(ExchangeMtu::request(23).serialize()[0], ATT_EXCHANGE_MTU_REQ);
    assert_eq!(ExchangeMtu::response(23).serialize()[0], ATT_EXCHANGE_MTU_RSP);
}

#[test]
fn test_handle_range_offsets() {
    let req = FindByTypeValueRequest {
        start_handle: 0x0001,
        end_handle: 0xFFFF,
        attribute_type: 0x2800,
    };
    let mut buf = vec![0u8; 9];
    req.write(&mut buf).unwrap();
    buf[7] = 0x0A;
    buf[8] = 0x18;

    assert_eq!(&buf[..7], &[0x06, 0x01, 0x00, 0xFF, 0xFF, 0x00, 0x28]);
    assert_eq!(FindByTypeValueRequest::parse(&buf).unwrap(), req);
    assert_eq!(FindByTypeValueRequest::trailing(&buf), &[0x0A, 0x18]);
}

#[test]
fn test_write_request_trailing_value() {
    let payload = [ATT_WRITE_REQ, 0x2A, 0x00, b'h', b'i'];
    let req = WriteRequest::parse(&payload).unwrap();
    assert_eq!(req.handle, 0x002A);
    assert_eq!(WriteRequest::trailing(&payload), b"hi");

    // Minimal write carries an empty value
    assert!(WriteRequest::trailing(&payload[..3]).is_empty());
}

#[test]
fn test_variable_responses_expose_declared_length() {
    let payload = [ATT_READ_BY_TYPE_RSP, 0x07, 0x01, 0x00, 0x02, 0x03, 0x00, 0x00, 0x2A];
    let rsp = ReadByTypeResponse::parse(&payload).unwrap();
    assert_eq!(rsp.length, 7);
    assert_eq!(ReadByTypeResponse::trailing(&payload).len(), 7);

    let info = FindInformationResponse::parse(&[ATT_FIND_INFO_RSP, 0x02]).unwrap();
    assert_eq!(info.entry_len(), Some(18));
    assert_eq!(FindInformationResponse { format: 0x07 }.entry_len(), None);
}

#[test]
fn test_round_trips() {
    round_trip(ErrorResponse {
        request_opcode: ATT_WRITE_REQ,
        handle: 0xBEEF,
        error_code: 0x80,
    });
    round_trip(ExchangeMtu::request(ATT_DEFAULT_MTU));
    round_trip(ExchangeMtu::response(ATT_MAX_MTU));
    round_trip(FindInformationRequest {
        start_handle: 0x0010,
        end_handle: 0x0020,
    });
    round_trip(FindInformationResponse {
        format: ATT_FIND_INFO_RSP_FORMAT_16BIT,
    });
    round_trip(FindByTypeValueRequest {
        start_handle: 1,
        end_handle: 0xFFFF,
        attribute_type: 0x2800,
    });
    round_trip(ReadByTypeRequest {
        start_handle: 0x0100,
        end_handle: 0x01FF,
    });
    round_trip(ReadByTypeResponse { length: 21 });
    round_trip(ReadRequest { handle: 0x0003 });
    round_trip(ReadByGroupTypeRequest {
        start_handle: 0x0001,
        end_handle: 0xFFFF,
    });
    round_trip(ReadByGroupTypeResponse { length: 6 });
    round_trip(WriteRequest { handle: 0xFFFE });
}

#[test]
fn test_short_payloads_rejected() {
    assert_rejects_short_buffers::<ErrorResponse>();
    assert_rejects_short_buffers::<ExchangeMtu>();
    assert_rejects_short_buffers::<FindInformationRequest>();
    assert_rejects_short_buffers::<FindInformationResponse>();
    assert_rejects_short_buffers::<FindByTypeValueRequest>();
    assert_rejects_short_buffers::<ReadByTypeRequest>();
    assert_rejects_short_buffers::<ReadByTypeResponse>();
    assert_rejects_short_buffers::<ReadRequest>();
    assert_rejects_short_buffers::<ReadByGroupTypeRequest>();
    assert_rejects_short_buffers::<ReadByGroupTypeResponse>();
    assert_rejects_short_buffers::<WriteRequest>();
}

#[test]
fn test_short_destinations_rejected() {
    assert_write_rejects_short_buffers(&ErrorResponse::new(1, 2, AttErrorCode::Unlikely));
    assert_write_rejects_short_buffers(&ExchangeMtu::request(100));
    assert_write_rejects_short_buffers(&FindInformationRequest {
        start_handle: 1,
        end_handle: 2,
    });
    assert_write_rejects_short_buffers(&FindInformationResponse { format: 1 });
    assert_write_rejects_short_buffers(&FindByTypeValueRequest {
        start_handle: 1,
        end_handle: 2,
        attribute_type: 3,
    });
    assert_write_rejects_short_buffers(&ReadByTypeRequest {
        start_handle: 1,
        end_handle: 2,
    });
    assert_write_rejects_short_buffers(&ReadByTypeResponse { length: 4 });
    assert_write_rejects_short_buffers(&ReadRequest { handle: 1 });
    assert_write_rejects_short_buffers(&ReadByGroupTypeRequest {
        start_handle: 1,
        end_handle: 2,
    });
    assert_write_rejects_short_buffers(&ReadByGroupTypeResponse { length: 4 });
    assert_write_rejects_short_buffers(&WriteRequest { handle: 1 });
}

#[rstest]
#[case(ATT_ERROR_RSP)]
#[case(ATT_EXCHANGE_MTU_RSP)]
#[case(ATT_FIND_INFO_RSP)]
#[case(ATT_WRITE_REQ)]
fn test_read_request_rejects_foreign_opcode(#[case] opcode: u8) {
    let err = ReadRequest::parse(&[opcode, 0x01, 0x00, 0x00, 0x00]).unwrap_err();
    assert_eq!(
        err,
        AttError::OpcodeMismatch {
            found: opcode,
            expected: &[ATT_READ_REQ],
        }
    );
}

#[rstest]
#[case(ATT_READ_REQ)]
#[case(ATT_FIND_INFO_REQ)]
#[case(ATT_READ_BY_GROUP_TYPE_RSP)]
fn test_exchange_mtu_rejects_foreign_opcode(#[case] opcode: u8) {
    assert!(matches!(
        ExchangeMtu::parse(&[opcode, 0x17, 0x00]),
        Err(AttError::OpcodeMismatch { found, .. }) if found == opcode
    ));
}

#[test]
fn test_responses_reject_request_opcodes() {
    let payload = [ATT_READ_BY_TYPE_REQ, 0x01, 0x00, 0xFF, 0xFF];
    assert!(matches!(
        ReadByTypeResponse::parse(&payload),
        Err(AttError::OpcodeMismatch { .. })
    ));
    assert!(matches!(
        ReadByGroupTypeResponse::parse(&payload),
        Err(AttError::OpcodeMismatch { .. })
    ));
    assert!(matches!(
        FindInformationResponse::parse(&payload),
        Err(AttError::OpcodeMismatch { .. })
    ));
}

#[test]
fn test_size_checked_before_opcode() {
    // A short buffer with a foreign opcode still reports the size problem
    assert!(matches!(
        FindInformationRequest::parse(&[ATT_WRITE_REQ, 0x00]),
        Err(AttError::Size { required: 5, actual: 2 })
    ));
}

#[test]
fn test_pdu_dispatch() {
    let read = Pdu::parse(&[ATT_READ_REQ, 0x05, 0x00]).unwrap();
    assert_eq!(read, Pdu::ReadRequest(ReadRequest { handle: 5 }));
    assert_eq!(read.opcode(), ATT_READ_REQ);
    assert_eq!(read.origin(), PduOrigin::Client);

    let mtu = Pdu::parse(&[ATT_EXCHANGE_MTU_RSP, 0x00, 0x01]).unwrap();
    assert_eq!(mtu, Pdu::ExchangeMtu(ExchangeMtu::response(256)));
    assert_eq!(mtu.origin(), PduOrigin::Server);

    let write = Pdu::parse(&[ATT_WRITE_REQ, 0x10, 0x00, 0xAB]).unwrap();
    assert_eq!(write.serialize(), vec![ATT_WRITE_REQ, 0x10, 0x00]);
}

#[test]
fn test_pdu_dispatch_errors() {
    assert_eq!(
        Pdu::parse(&[]).unwrap_err(),
        AttError::Size {
            required: 1,
            actual: 0
        }
    );
    assert_eq!(
        Pdu::parse(&[0x0C, 0x00, 0x00, 0x00, 0x00]).unwrap_err(),
        AttError::UnsupportedOpcode(0x0C)
    );
    assert!(matches!(
        Pdu::parse(&[ATT_FIND_BY_TYPE_VALUE_REQ, 0x01, 0x00, 0xFF, 0xFF]),
        Err(AttError::Size { required: 7, .. })
    ));
}

#[test]
fn test_pdu_round_trip_through_union() {
    let pdus = [
        Pdu::ErrorResponse(ErrorResponse::new(ATT_READ_REQ, 7, AttErrorCode::InvalidHandle)),
        Pdu::ExchangeMtu(ExchangeMtu::request(185)),
        Pdu::FindInformationRequest(FindInformationRequest {
            start_handle: 1,
            end_handle: 0xFFFF,
        }),
        Pdu::FindInformationResponse(FindInformationResponse { format: 2 }),
        Pdu::FindByTypeValueRequest(FindByTypeValueRequest {
            start_handle: 1,
            end_handle: 0xFFFF,
            attribute_type: 0x2800,
        }),
        Pdu::ReadByTypeRequest(ReadByTypeRequest {
            start_handle: 1,
            end_handle: 9,
        }),
        Pdu::ReadByTypeResponse(ReadByTypeResponse { length: 7 }),
        Pdu::ReadRequest(ReadRequest { handle: 3 }),
        Pdu::ReadByGroupTypeRequest(ReadByGroupTypeRequest {
            start_handle: 1,
            end_handle: 0xFFFF,
        }),
        Pdu::ReadByGroupTypeResponse(ReadByGroupTypeResponse { length: 20 }),
        Pdu::WriteRequest(WriteRequest { handle: 0x0042 }),
    ];

    for pdu in pdus {
        let bytes = pdu.serialize();
        assert_eq!(bytes.len(), pdu.wire_size());
        assert_eq!(Pdu::parse(&bytes).unwrap(), pdu);

        let mut short = vec![0u8; pdu.wire_size() - 1];
        assert!(matches!(pdu.write(&mut short), Err(AttError::Size { .. })));
    }
}

#[test]
fn test_error_code_conversion() {
    assert_eq!(AttErrorCode::from(0x11), AttErrorCode::InsufficientResources);
    assert_eq!(AttErrorCode::from(0x85), AttErrorCode::ApplicationError(0x85));
    assert_eq!(AttErrorCode::from(0x60), AttErrorCode::Unknown(0x60));
    assert_eq!(u8::from(AttErrorCode::InvalidPdu), ATT_ERROR_INVALID_PDU);
    assert_eq!(u8::from(AttErrorCode::Unknown(0x60)), 0x60);
}
