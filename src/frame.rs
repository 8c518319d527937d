//! RTCM3 transport frame layout.
//!
//! ```text
//! +----------+------------+-----------+-----------------+--------------+
//! | preamble | reserved   | length    | payload         | CRC-24Q      |
//! | 8 bits   | 6 bits     | 10 bits   | length bytes    | 24 bits      |
//! +----------+------------+-----------+-----------------+--------------+
//! ```
//!
//! The CRC covers everything before it. The first 12 bits of the payload are the
//! message number.
use crate::crc::{crc24q, crc24q_bytes};
use crate::error::{EncodeError, Error};
use crate::MessageType;

/// Byte marking the start of every frame.
pub const PREAMBLE: u8 = 0xd3;
/// Preamble plus the reserved/length bytes.
pub const HEADER_LEN: usize = 3;
pub const CRC_LEN: usize = 3;
/// Largest payload the 10-bit length field can describe.
pub const MAX_PAYLOAD_LEN: usize = 1023;

/// Decoded 3-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// The 6 reserved bits; carried along but otherwise ignored.
    pub reserved: u8,
    /// Payload length in bytes.
    pub length: u16,
}

impl FrameHeader {
    /// Decode from the first [HEADER_LEN] bytes of `dat`, or `None` if there are not
    /// enough bytes or `dat` does not start with the [PREAMBLE].
    #[must_use]
    pub fn decode(dat: &[u8]) -> Option<Self> {
        if dat.len() < HEADER_LEN || dat[0] != PREAMBLE {
            return None;
        }
        let x = u16::from_be_bytes([dat[1], dat[2]]);
        Some(FrameHeader {
            reserved: (dat[1] >> 2) & 0x3f,
            length: x & 0x3ff,
        })
    }

    /// Total frame size described by this header, including header and CRC.
    #[must_use]
    pub fn frame_len(&self) -> usize {
        HEADER_LEN + self.length as usize + CRC_LEN
    }
}

/// Check the CRC of a complete frame, i.e., exactly `header + payload + crc` bytes.
///
/// # Errors
/// [Error::ShortFrame] if `frame` cannot hold a header and CRC, and
/// [Error::CrcMismatch] if the computed CRC differs from the trailing 3 bytes.
pub fn verify(frame: &[u8]) -> Result<(), Error> {
    if frame.len() < HEADER_LEN + CRC_LEN {
        return Err(Error::ShortFrame(frame.len()));
    }
    let (body, tail) = frame.split_at(frame.len() - CRC_LEN);
    let expected = u32::from_be_bytes([0, tail[0], tail[1], tail[2]]);
    let computed = crc24q(body);
    if expected != computed {
        return Err(Error::CrcMismatch { expected, computed });
    }
    Ok(())
}

/// Wrap `payload` in a frame: preamble, zero reserved bits, length and CRC.
///
/// # Errors
/// [EncodeError::PayloadTooLong] if the payload exceeds [MAX_PAYLOAD_LEN].
pub fn encode(payload: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(EncodeError::PayloadTooLong(payload.len()));
    }
    let len = payload.len() as u16;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + CRC_LEN);
    frame.push(PREAMBLE);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(payload);
    let crc = crc24q_bytes(&frame);
    frame.extend_from_slice(&crc);
    Ok(frame)
}

/// The message number carried in the first 12 bits of `payload`, or `None` if the
/// payload is shorter than 2 bytes.
#[must_use]
pub fn message_type(payload: &[u8]) -> Option<MessageType> {
    if payload.len() < 2 {
        return None;
    }
    Some(MessageType::new(
        u16::from_be_bytes([payload[0], payload[1]]) >> 4,
    ))
}
