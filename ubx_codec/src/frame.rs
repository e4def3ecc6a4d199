//! Frame codec: sync chars, class/id, little-endian length, payload, checksum.
//!
//! ```text
//! offset  size  field
//! 0       1     sync0 = 0xB5
//! 1       1     sync1 = 0x62
//! 2       1     class
//! 3       1     id
//! 4       2     length (u16, little-endian)
//! 6       N     payload
//! 6+N     2     checksum A, checksum B over bytes [2 .. 6+N)
//! ```

use alloc::vec::Vec;
use tracing::debug;

use crate::{
    checksum::{self, UbxChecksumCalc},
    constants::{
        DEFAULT_MAX_PAYLOAD_LEN, UBX_CHECKSUM_LEN, UBX_CLASS_OFFSET, UBX_FRAME_OVERHEAD,
        UBX_HEADER_LEN, UBX_LENGTH_OFFSET, UBX_MSG_ID_OFFSET, UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2,
    },
    error::FrameError,
    registry::{Message, Registry},
};

/// A validated frame borrowed from the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub class: u8,
    pub id: u8,
    pub payload: &'a [u8],
}

impl Frame<'_> {
    /// Serialize the frame back to wire bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, FrameError> {
        encode(self.class, self.id, self.payload)
    }

    pub fn to_owned_frame(&self) -> OwnedFrame {
        OwnedFrame {
            class: self.class,
            id: self.id,
            payload: self.payload.to_vec(),
        }
    }

    /// Dispatch through `registry`, copying the payload into the message
    pub fn to_message(&self, registry: &Registry) -> Message {
        registry.construct(self.class, self.id, self.payload.to_vec())
    }
}

/// A validated frame that owns its payload, as produced by stream decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedFrame {
    pub class: u8,
    pub id: u8,
    pub payload: Vec<u8>,
}

impl OwnedFrame {
    pub fn as_frame(&self) -> Frame<'_> {
        Frame {
            class: self.class,
            id: self.id,
            payload: &self.payload,
        }
    }

    pub fn into_message(self, registry: &Registry) -> Message {
        registry.construct(self.class, self.id, self.payload)
    }
}

/// Decoder policy knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    /// Largest declared payload length accepted by the decoder.
    ///
    /// Newer firmware may legally send bigger payloads, so this is a safety
    /// cap rather than a protocol limit.
    pub max_payload_len: u16,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }
}

/// Fluent construction of a [`FrameDecoder`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderBuilder {
    config: DecoderConfig,
}

impl DecoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_payload_len(mut self, max_payload_len: u16) -> Self {
        self.config.max_payload_len = max_payload_len;
        self
    }

    pub fn build(self) -> FrameDecoder {
        FrameDecoder::new(self.config)
    }
}

/// Validates frames against a [`DecoderConfig`]. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder {
    config: DecoderConfig,
}

impl FrameDecoder {
    pub const fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::new()
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Validate one complete frame. `bytes` must hold exactly one frame:
    /// `length + 8` bytes, no more, no less.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Frame<'a>, FrameError> {
        self.decode_frame(bytes)
            .inspect_err(|err| debug!(%err, len = bytes.len(), "rejected UBX frame"))
    }

    fn decode_frame<'a>(&self, bytes: &'a [u8]) -> Result<Frame<'a>, FrameError> {
        check_sync(bytes)?;
        let pack_len = self.payload_len(bytes)?;

        let expect = pack_len + UBX_FRAME_OVERHEAD;
        if bytes.len() != expect {
            return Err(FrameError::Truncated {
                expect,
                got: bytes.len(),
            });
        }

        let checksum_start = UBX_CLASS_OFFSET;
        let checksum_end = bytes.len() - UBX_CHECKSUM_LEN;
        let mut calc = UbxChecksumCalc::new();
        calc.update(&bytes[checksum_start..checksum_end]);
        let (expect_ck_a, expect_ck_b) = (bytes[checksum_end], bytes[checksum_end + 1]);
        if !calc.is_valid(expect_ck_a, expect_ck_b) {
            return Err(FrameError::BadChecksum {
                expect: checksum::as_wire_u16((expect_ck_a, expect_ck_b)),
                got: checksum::as_wire_u16(calc.result()),
            });
        }

        Ok(Frame {
            class: bytes[UBX_CLASS_OFFSET],
            id: bytes[UBX_MSG_ID_OFFSET],
            payload: &bytes[UBX_HEADER_LEN..UBX_HEADER_LEN + pack_len],
        })
    }

    /// Read the declared payload length from a buffer holding at least the
    /// six header bytes and check it against the cap
    pub(crate) fn payload_len(&self, header: &[u8]) -> Result<usize, FrameError> {
        if header.len() < UBX_HEADER_LEN {
            return Err(FrameError::Truncated {
                expect: UBX_FRAME_OVERHEAD,
                got: header.len(),
            });
        }
        let pack_len = usize::from(u16::from_le_bytes([
            header[UBX_LENGTH_OFFSET],
            header[UBX_LENGTH_OFFSET + 1],
        ]));
        let max = usize::from(self.config.max_payload_len);
        if pack_len > max {
            return Err(FrameError::LengthOutOfRange { len: pack_len, max });
        }
        Ok(pack_len)
    }

    /// Decode a frame and dispatch it through the standard registry
    pub fn decode_message(&self, bytes: &[u8]) -> Result<Message, FrameError> {
        let frame = self.decode(bytes)?;
        Ok(frame.to_message(&Registry::standard()))
    }
}

/// Both sync chars must lead `bytes`. Missing bytes are reported as 0.
pub(crate) fn check_sync(bytes: &[u8]) -> Result<(), FrameError> {
    match *bytes {
        [UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2, ..] => Ok(()),
        [] => Err(FrameError::BadSync {
            found0: 0,
            found1: 0,
        }),
        [found0] => Err(FrameError::BadSync { found0, found1: 0 }),
        [found0, found1, ..] => Err(FrameError::BadSync { found0, found1 }),
    }
}

/// Decode one frame with the default [`DecoderConfig`]
pub fn decode(bytes: &[u8]) -> Result<Frame<'_>, FrameError> {
    FrameDecoder::default().decode(bytes)
}

/// Decode one frame with the default config and dispatch it to a typed message
pub fn decode_message(bytes: &[u8]) -> Result<Message, FrameError> {
    FrameDecoder::default().decode_message(bytes)
}

/// Wrap `payload` into a frame. Fails only when the payload cannot be
/// described by the 16-bit length field.
pub fn encode(class: u8, id: u8, payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    let len = u16::try_from(payload.len()).map_err(|_| FrameError::LengthOutOfRange {
        len: payload.len(),
        max: usize::from(u16::MAX),
    })?;

    let mut out = Vec::with_capacity(payload.len() + UBX_FRAME_OVERHEAD);
    out.extend_from_slice(&[UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2, class, id]);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(payload);
    let (ck_a, ck_b) = checksum::compute(&out[UBX_CLASS_OFFSET..]);
    out.push(ck_a);
    out.push(ck_b);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const ACK_FOR_CFG_ANT: [u8; 10] = [0xb5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x13, 0x21, 0x4a];

    #[test]
    fn encode_ack_for_cfg_ant() {
        assert_eq!(
            encode(0x05, 0x01, &[0x06, 0x13]).unwrap(),
            ACK_FOR_CFG_ANT.to_vec()
        );
    }

    #[test]
    fn decode_ack_for_cfg_ant() {
        let frame = decode(&ACK_FOR_CFG_ANT).unwrap();
        assert_eq!(frame.class, 0x05);
        assert_eq!(frame.id, 0x01);
        assert_eq!(frame.payload, &[0x06, 0x13]);
        assert_eq!(frame.to_bytes().unwrap(), ACK_FOR_CFG_ANT.to_vec());
    }

    #[test]
    fn corrupted_class_is_bad_checksum() {
        let mut bytes = ACK_FOR_CFG_ANT;
        bytes[2] = 0x06;
        assert!(matches!(
            decode(&bytes),
            Err(FrameError::BadChecksum { expect: 0x4a21, .. })
        ));
    }

    #[test]
    fn bad_sync() {
        let mut bytes = ACK_FOR_CFG_ANT;
        bytes[1] = 0x63;
        assert_eq!(
            decode(&bytes),
            Err(FrameError::BadSync {
                found0: 0xb5,
                found1: 0x63
            })
        );
        assert_eq!(
            decode(&[0x24]),
            Err(FrameError::BadSync {
                found0: 0x24,
                found1: 0
            })
        );
    }

    #[test]
    fn short_header_is_truncated() {
        assert_eq!(
            decode(&ACK_FOR_CFG_ANT[..5]),
            Err(FrameError::Truncated { expect: 8, got: 5 })
        );
        assert_eq!(
            decode(&ACK_FOR_CFG_ANT[..2]),
            Err(FrameError::Truncated { expect: 8, got: 2 })
        );
    }

    #[test]
    fn missing_sync_chars_are_bad_sync() {
        assert_eq!(
            decode(&[]),
            Err(FrameError::BadSync {
                found0: 0,
                found1: 0
            })
        );
        assert_eq!(
            decode(&[0xb5]),
            Err(FrameError::BadSync {
                found0: 0xb5,
                found1: 0
            })
        );
    }

    #[test]
    fn size_must_match_exactly() {
        assert_eq!(
            decode(&ACK_FOR_CFG_ANT[..9]),
            Err(FrameError::Truncated { expect: 10, got: 9 })
        );
        let mut longer = ACK_FOR_CFG_ANT.to_vec();
        longer.push(0);
        assert_eq!(
            decode(&longer),
            Err(FrameError::Truncated { expect: 10, got: 11 })
        );
    }

    #[test]
    fn length_cap_is_configurable() {
        let payload = vec![0u8; 3000];
        let bytes = encode(0x02, 0x13, &payload).unwrap();
        assert_eq!(
            decode(&bytes),
            Err(FrameError::LengthOutOfRange {
                len: 3000,
                max: 2048
            })
        );

        let decoder = FrameDecoder::builder().max_payload_len(4096).build();
        assert_eq!(decoder.config().max_payload_len, 4096);
        let frame = decoder.decode(&bytes).unwrap();
        assert_eq!(frame.payload.len(), 3000);
    }

    #[test]
    fn empty_payload() {
        let bytes = encode(0x0a, 0x04, &[]).unwrap();
        assert_eq!(bytes.len(), 8);
        let frame = decode(&bytes).unwrap();
        assert!(frame.payload.is_empty());
        assert_eq!(frame.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn payload_may_contain_sync_chars() {
        let payload = [0xb5, 0x62, 0xb5, 0x62, 0x00];
        let bytes = encode(0x01, 0x02, &payload).unwrap();
        assert_eq!(decode(&bytes).unwrap().payload, &payload);
    }

    #[test]
    fn oversized_payload_cannot_be_encoded() {
        let payload = vec![0u8; usize::from(u16::MAX) + 1];
        assert!(matches!(
            encode(0x01, 0x02, &payload),
            Err(FrameError::LengthOutOfRange { .. })
        ));
    }

    #[test]
    fn decode_message_dispatches() {
        let msg = decode_message(&ACK_FOR_CFG_ANT).unwrap();
        match msg {
            Message::AckAck(ack) => {
                assert_eq!(ack.class().unwrap(), 0x06);
                assert_eq!(ack.msg_id().unwrap(), 0x13);
            },
            other => panic!("unexpected {other:?}"),
        }
    }
}
