use alloc::vec::Vec;

use crate::{error::FrameError, frame::encode};

/// Range of protocol versions a message layout is documented for.
///
/// Informational only, the codec never checks it. `max == None` means no
/// known upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersions {
    pub min: Option<&'static str>,
    pub max: Option<&'static str>,
}

impl ProtocolVersions {
    pub const ANY: Self = Self {
        min: None,
        max: None,
    };

    pub const fn since(min: &'static str) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn up_to(max: &'static str) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn has_upper_bound(&self) -> bool {
        self.max.is_some()
    }
}

/// Static information about a UBX message type
pub trait UbxPacketMeta {
    const CLASS: u8;
    const ID: u8;
    /// Name as printed in the receiver documentation, e.g. `NAV-SAT`
    const NAME: &'static str;
    /// `None` for messages with variable or version dependent length
    const FIXED_PAYLOAD_LEN: Option<u16>;
    const PROTOCOL: ProtocolVersions = ProtocolVersions::ANY;
}

/// Declare a message type: a newtype over its owned payload plus metadata.
macro_rules! ubx_message {
    (
        $(#[$attr:meta])*
        $name:ident {
            class: $class:expr,
            id: $id:expr,
            name: $ubx_name:literal,
            fixed_payload_len: $fixed_len:expr,
            protocol: $protocol:expr $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            payload: ::alloc::vec::Vec<u8>,
        }

        impl $crate::message::UbxPacketMeta for $name {
            const CLASS: u8 = $class;
            const ID: u8 = $id;
            const NAME: &'static str = $ubx_name;
            const FIXED_PAYLOAD_LEN: Option<u16> = $fixed_len;
            const PROTOCOL: $crate::message::ProtocolVersions = $protocol;
        }

        impl $name {
            /// Wrap a payload as received. Nothing is copied or validated,
            /// every getter checks its own bounds.
            pub fn from_payload(payload: ::alloc::vec::Vec<u8>) -> Self {
                Self { payload }
            }

            pub fn payload(&self) -> &[u8] {
                &self.payload
            }

            pub fn into_payload(self) -> ::alloc::vec::Vec<u8> {
                self.payload
            }

            /// Serialize as a complete frame
            pub fn into_frame(self) -> Result<::alloc::vec::Vec<u8>, $crate::error::FrameError> {
                $crate::frame::encode(
                    <Self as $crate::message::UbxPacketMeta>::CLASS,
                    <Self as $crate::message::UbxPacketMeta>::ID,
                    &self.payload,
                )
            }
        }
    };
}

pub(crate) use ubx_message;

/// Any message, typed or not, as a `(class, id, payload)` triple.
/// The registry returns it for pairs it has no decoder for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericMessage {
    pub class: u8,
    pub id: u8,
    pub payload: Vec<u8>,
}

impl GenericMessage {
    pub fn into_frame(self) -> Result<Vec<u8>, FrameError> {
        encode(self.class, self.id, &self.payload)
    }
}

/// Empty-payload frame asking the receiver to send one message of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollRequest {
    class: u8,
    id: u8,
}

impl PollRequest {
    pub const fn request_for<T: UbxPacketMeta>() -> Self {
        Self {
            class: T::CLASS,
            id: T::ID,
        }
    }

    pub const fn request_for_unknown(class: u8, id: u8) -> Self {
        Self { class, id }
    }

    pub const fn class(&self) -> u8 {
        self.class
    }

    pub const fn id(&self) -> u8 {
        self.id
    }

    /// The 8 wire bytes of the poll
    pub fn into_packet_bytes(self) -> [u8; 8] {
        let (ck_a, ck_b) = crate::checksum::compute(&[self.class, self.id, 0, 0]);
        [
            crate::constants::UBX_SYNC_CHAR_1,
            crate::constants::UBX_SYNC_CHAR_2,
            self.class,
            self.id,
            0,
            0,
            ck_a,
            ck_b,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::decode;

    ubx_message! {
        /// Test message
        MonVerStub {
            class: 0x0a,
            id: 0x04,
            name: "MON-VER",
            fixed_payload_len: None,
            protocol: ProtocolVersions::up_to("23.01"),
        }
    }

    #[test]
    fn declared_metadata() {
        assert_eq!(MonVerStub::CLASS, 0x0a);
        assert_eq!(MonVerStub::ID, 0x04);
        assert_eq!(MonVerStub::NAME, "MON-VER");
        assert!(MonVerStub::PROTOCOL.has_upper_bound());
        assert!(!ProtocolVersions::since("15.00").has_upper_bound());
        assert_eq!(ProtocolVersions::ANY.min, None);
    }

    #[test]
    fn message_frame_round_trip() {
        let stub = MonVerStub::from_payload(alloc::vec![1, 2, 3]);
        let bytes = stub.clone().into_frame().unwrap();
        let frame = decode(&bytes).unwrap();
        assert_eq!((frame.class, frame.id), (0x0a, 0x04));
        assert_eq!(MonVerStub::from_payload(frame.payload.to_vec()), stub);
    }

    #[test]
    fn poll_request_bytes() {
        let bytes = PollRequest::request_for::<MonVerStub>().into_packet_bytes();
        assert_eq!(bytes, [0xb5, 0x62, 0x0a, 0x04, 0x00, 0x00, 0x0e, 0x34]);
        let frame = decode(&bytes).unwrap();
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn generic_message_frame() {
        let msg = GenericMessage {
            class: 0x05,
            id: 0x01,
            payload: alloc::vec![0x06, 0x13],
        };
        assert_eq!(
            msg.into_frame().unwrap(),
            [0xb5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x13, 0x21, 0x4a]
        );
    }
}
