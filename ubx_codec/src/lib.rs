//! # ubx_codec
//!
//! Frame codec, message registry and typed payload accessors for the u-blox
//! UBX binary protocol.
//!
//! Constructing Packets
//! ====================
//!
//! Commands are built through the `Builder` of the message, which validates
//! its parameters before laying out the payload:
//! ```
//! use ubx_codec::{CfgPrtUartBuilder, DataBits, InProtoMask, OutProtoMask, Parity, StopBits, UartMode};
//!
//! let frame: Vec<u8> = CfgPrtUartBuilder {
//!     port_id: 1,
//!     mode: UartMode::new(DataBits::Eight, Parity::None, StopBits::One),
//!     baud_rate: 115_200,
//!     in_proto_mask: InProtoMask::UBLOX,
//!     out_proto_mask: OutProtoMask::UBLOX,
//!     ..Default::default()
//! }
//! .build()
//! .unwrap()
//! .into_frame()
//! .unwrap();
//! assert_eq!(frame.len(), 28);
//! ```
//! A message can be polled with an empty payload request:
//! ```
//! use ubx_codec::{MonVer, PollRequest};
//!
//! let poll = PollRequest::request_for::<MonVer>().into_packet_bytes();
//! assert_eq!(poll, [0xb5, 0x62, 0x0a, 0x04, 0x00, 0x00, 0x0e, 0x34]);
//! ```
//!
//! Parsing Packets
//! ===============
//!
//! [`FrameDecoder`] validates one complete frame and the [`Registry`]
//! dispatches it to a typed message. Unknown class/id pairs come back as
//! [`Message::Unknown`], never as an error:
//! ```
//! use ubx_codec::{FrameDecoder, Message};
//!
//! let bytes = [0xb5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x01, 0x0f, 0x38];
//! match FrameDecoder::default().decode_message(&bytes) {
//!     Ok(Message::AckAck(ack)) => assert_eq!(ack.class(), Ok(0x06)),
//!     Ok(other) => panic!("unexpected {other:?}"),
//!     Err(err) => panic!("bad frame: {err}"),
//! }
//! ```
//! Reading from a serial port or any other byte stream goes through
//! [`FrameDecoder::decode_stream`] and a [`ByteSource`].
//!
//! Fields
//! ======
//!
//! Getters return `Result`: a field that lies beyond the end of a short
//! payload yields [`FieldError::OutOfBounds`] rather than a bogus value.
//!
//! no_std Support
//! ==============
//!
//! Without the default `std` feature the crate only needs `alloc`.
//! [`IoSource`] is the only `std` specific item.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use crate::{
    checksum::UbxChecksumCalc,
    constants::{
        DEFAULT_MAX_PAYLOAD_LEN, UBX_CHECKSUM_LEN, UBX_FRAME_OVERHEAD, UBX_HEADER_LEN,
        UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2,
    },
    error::{DateTimeError, FieldError, FrameError, StreamError},
    field::{BitField, Field, FieldDescriptor, Records, Scalar, Scaled, Text},
    frame::{
        decode, decode_message, encode, DecoderBuilder, DecoderConfig, Frame, FrameDecoder,
        OwnedFrame,
    },
    message::{GenericMessage, PollRequest, ProtocolVersions, UbxPacketMeta},
    registry::{Message, Registry, RegistryEntry},
    stream::{ByteSource, SliceSource, SourceExhausted},
    ubx_packets::*,
};

#[cfg(feature = "std")]
pub use crate::stream::IoSource;

pub mod checksum;
mod constants;
mod error;
pub mod field;
mod frame;
mod message;
mod registry;
mod stream;
mod ubx_packets;
