use crate::MessageType;

/// Bit-level failure while reading a message payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PayloadError {
    #[error("out of bits: wanted {wanted} at bit {position}, {available} available")]
    OutOfBits {
        /// Bit offset of the failed read
        position: usize,
        /// Number of bits requested
        wanted: u32,
        /// Number of bits left in the payload
        available: usize,
    },

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Failure turning a frame payload into a [Message](crate::Message).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// No decoder is registered for the message number.
    #[error("message type {0} has no registered decoder")]
    UnknownType(MessageType),

    /// The message number is registered, but decoding is not implemented.
    #[error("message type {0} is not implemented")]
    NotImplemented(MessageType),

    /// Message number in the payload does not match the dispatch type.
    #[error("message type mismatch: dispatched as {expected}, payload carries {actual}")]
    TypeMismatch {
        expected: MessageType,
        actual: MessageType,
    },

    #[error("malformed {message_type} payload: {source}")]
    MalformedPayload {
        message_type: MessageType,
        #[source]
        source: PayloadError,
    },

    /// Payload too short to carry a 12-bit message number.
    #[error("payload of {len} bytes is too short to carry a message number")]
    ShortPayload { len: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("message type {0} does not support encoding")]
    Unsupported(MessageType),

    #[error("value {value} does not fit in a {bits} bit field")]
    FieldOverflow { bits: u32, value: i128 },

    #[error("payload of {0} bytes exceeds the maximum frame payload")]
    PayloadTooLong(usize),

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failure reading from the byte source
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("crc mismatch: frame carries {expected:#08x}, computed {computed:#08x}")]
    CrcMismatch { expected: u32, computed: u32 },

    /// Input too short to hold a header and CRC.
    #[error("frame of {0} bytes is too short to carry a crc")]
    ShortFrame(usize),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
