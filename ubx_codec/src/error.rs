use thiserror::Error;

/// Reasons a byte buffer is not a valid UBX frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameError {
    /// The buffer does not start with `0xB5 0x62`
    #[error("bad sync chars, expect b5 62, got {found0:02x} {found1:02x}")]
    BadSync { found0: u8, found1: u8 },

    /// The declared payload length exceeds the configured cap
    #[error("payload length {len} is outside of accepted range 0..={max}")]
    LengthOutOfRange { len: usize, max: usize },

    /// The buffer size disagrees with the declared payload length
    #[error("frame size mismatch, expect {expect} bytes, got {got}")]
    Truncated { expect: usize, got: usize },

    /// Trailing checksum bytes do not match the recomputed ones
    #[error("not valid frame checksum, expect {expect:x}, got {got:x}")]
    BadChecksum { expect: u16, got: u16 },
}

/// Errors reported by payload accessors and message builders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field does not fit into the payload, usually because it only
    /// exists in longer variants of the message
    #[error("field at offset {offset} with width {width} does not fit into {payload_len} byte payload")]
    OutOfBounds {
        offset: usize,
        width: usize,
        payload_len: usize,
    },

    /// A builder parameter or record index is outside of its documented range
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },

    /// Fixed width text field is not valid UTF-8
    #[error("text field at offset {offset} is not valid UTF-8")]
    InvalidText { offset: usize },
}

impl FieldError {
    pub(crate) const fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { field, reason }
    }
}

/// NAV-PVT date/time fields that do not form a valid instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateTimeError {
    #[error("invalid date")]
    InvalidDate,
    #[error("invalid time")]
    InvalidTime,
    #[error("invalid nanoseconds")]
    InvalidNanoseconds,
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Failure of [`crate::FrameDecoder::decode_stream`]
#[derive(Debug, Error)]
pub enum StreamError<E> {
    /// The byte source could not provide enough bytes
    #[error("byte source error: {0}")]
    Source(E),

    /// The bytes at the head of the source are not a valid frame.
    /// Nothing was consumed, the caller decides how to resynchronize.
    #[error(transparent)]
    Frame(#[from] FrameError),
}
