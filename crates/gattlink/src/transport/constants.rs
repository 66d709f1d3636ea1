//! GATT transport constants

/// Bytes of every notification taken by the ATT envelope (opcode + handle)
pub const NOTIFY_ENVELOPE_OVERHEAD: u16 = 3;

/// Longest framing prefix that carries the message length
pub const FRAME_HEADER_MAX_LEN: usize = 6;

/// Header room a buffer needs to carry endpoint metadata in place
pub const ENDPOINT_HEADER_LEN: usize = 4;

// Service and characteristic UUIDs, least significant byte first as on air.

/// ADE3D529-C784-4F63-A987-EB69F70EE816
pub const OC_GATT_SERVICE_UUID: [u8; 16] = [
    0x16, 0xe8, 0x0e, 0xf7, 0x69, 0xeb, 0x87, 0xa9, 0x63, 0x4f, 0x84, 0xc7, 0x29, 0xd5, 0xe3, 0xad,
];

/// AD7B334F-4637-4B86-90B6-9D787F03D218
pub const OC_GATT_REQ_CHR_UUID: [u8; 16] = [
    0x18, 0xd2, 0x03, 0x7f, 0x78, 0x9d, 0xb6, 0x90, 0x86, 0x4b, 0x37, 0x46, 0x4f, 0x33, 0x7b, 0xad,
];

/// E9241982-4580-42C4-8831-95048216B256
pub const OC_GATT_RSP_CHR_UUID: [u8; 16] = [
    0x56, 0xb2, 0x16, 0x82, 0x04, 0x95, 0x31, 0x88, 0xc4, 0x42, 0x80, 0x45, 0x82, 0x19, 0x24, 0xe9,
];
