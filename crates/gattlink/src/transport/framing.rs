//! Message length decoding for the framed application protocol
//!
//! Reassembly only needs one thing from the application framing: the total
//! length a message declares at its start. [`FrameLength`] abstracts that so
//! the engines never look further into the message.

use super::constants::FRAME_HEADER_MAX_LEN;
use byteorder::{BigEndian, ByteOrder};

/// Decodes the total message length from the start of a message
pub trait FrameLength: Send + Sync {
    /// Total declared length, or `None` while `prefix` is too short to tell
    fn message_len(&self, prefix: &[u8]) -> Option<usize>;
}

/// CoAP over reliable transports (RFC 8323) length framing.
///
/// The first byte holds a 4-bit length nibble and the token length. Nibble
/// values 13, 14 and 15 announce 1, 2 or 4 extended length bytes in network
/// order, offset by 13, 269 and 65805. The code byte and the token follow.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoapTcpFraming;

const COAP_TCP_EXT8: u8 = 13;
const COAP_TCP_EXT16: u8 = 14;
const COAP_TCP_EXT32: u8 = 15;

const COAP_TCP_EXT8_OFFSET: usize = 13;
const COAP_TCP_EXT16_OFFSET: usize = 269;
const COAP_TCP_EXT32_OFFSET: usize = 65805;

impl FrameLength for CoapTcpFraming {
    fn message_len(&self, prefix: &[u8]) -> Option<usize> {
        let first = *prefix.first()?;
        let len_nibble = first >> 4;
        let token_len = (first & 0x0f) as usize;

        let (ext_len, body_len) = match len_nibble {
            COAP_TCP_EXT8 => (1, COAP_TCP_EXT8_OFFSET + *prefix.get(1)? as usize),
            COAP_TCP_EXT16 => {
                let ext = prefix.get(1..3)?;
                (2, COAP_TCP_EXT16_OFFSET + BigEndian::read_u16(ext) as usize)
            }
            COAP_TCP_EXT32 => {
                let ext = prefix.get(1..5)?;
                (4, COAP_TCP_EXT32_OFFSET.saturating_add(BigEndian::read_u32(ext) as usize))
            }
            short => (0, short as usize),
        };

        // length byte, extended length, code byte
        let header_len = 1 + ext_len + 1;
        debug_assert!(header_len <= FRAME_HEADER_MAX_LEN);

        Some(header_len.saturating_add(token_len).saturating_add(body_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_length_form() {
        // len 4, token 2, code, token, 4 bytes of options/payload
        let msg = [0x42, 0x45, 0xAA, 0xBB, 1, 2, 3, 4];
        assert_eq!(CoapTcpFraming.message_len(&msg), Some(8));
        assert_eq!(CoapTcpFraming.message_len(&msg[..1]), Some(8));
        assert_eq!(CoapTcpFraming.message_len(&[]), None);
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(CoapTcpFraming.message_len(&[0x00, 0x01]), Some(2));
    }

    #[test]
    fn test_extended_8bit_length() {
        // 13 + 27 = 40 bytes body, 1 byte token, 3 byte header
        assert_eq!(CoapTcpFraming.message_len(&[0xD1, 27, 0x45]), Some(44));
        assert_eq!(CoapTcpFraming.message_len(&[0xD1]), None);
    }

    #[test]
    fn test_extended_16bit_length() {
        assert_eq!(CoapTcpFraming.message_len(&[0xE0, 0x01, 0x00, 0x45]), Some(4 + 269 + 256));
        assert_eq!(CoapTcpFraming.message_len(&[0xE0, 0x01]), None);
    }

    #[test]
    fn test_extended_32bit_length() {
        let hdr = [0xF8, 0x00, 0x00, 0x00, 0x10, 0x45];
        assert_eq!(CoapTcpFraming.message_len(&hdr), Some(6 + 8 + 65805 + 16));
        assert_eq!(CoapTcpFraming.message_len(&hdr[..4]), None);
    }
}
