use alloc::vec;

use crate::{
    error::FieldError,
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions, UbxPacketMeta},
};

mod layout {
    use crate::field::Field;

    pub const MSG_CLASS: Field<u8> = Field::at(0);
    pub const MSG_ID: Field<u8> = Field::at(1);
    pub const LEN: usize = MSG_ID.end();
}

ubx_message! {
    /// Message acknowledged.
    /// Sent in response to a CFG message that was received, decoded and processed.
    AckAck {
        class: 0x05,
        id: 0x01,
        name: "ACK-ACK",
        fixed_payload_len: Some(2),
        protocol: ProtocolVersions::ANY,
    }
}

ubx_message! {
    /// Message not acknowledged
    AckNak {
        class: 0x05,
        id: 0x00,
        name: "ACK-NAK",
        fixed_payload_len: Some(2),
        protocol: ProtocolVersions::ANY,
    }
}

impl AckAck {
    ubx_getters! {
        /// Class of the acknowledged message
        class: u8 = layout::MSG_CLASS;
        /// Id of the acknowledged message
        msg_id: u8 = layout::MSG_ID;
    }

    pub fn is_ack_for<T: UbxPacketMeta>(&self) -> bool {
        self.class() == Ok(T::CLASS) && self.msg_id() == Ok(T::ID)
    }
}

impl AckNak {
    ubx_getters! {
        /// Class of the rejected message
        class: u8 = layout::MSG_CLASS;
        /// Id of the rejected message
        msg_id: u8 = layout::MSG_ID;
    }

    pub fn is_nak_for<T: UbxPacketMeta>(&self) -> bool {
        self.class() == Ok(T::CLASS) && self.msg_id() == Ok(T::ID)
    }
}

/// Payload shared by [`AckAck`] and [`AckNak`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AckBuilder {
    pub msg_class: u8,
    pub msg_id: u8,
}

impl AckBuilder {
    pub const fn for_packet<T: UbxPacketMeta>() -> Self {
        Self {
            msg_class: T::CLASS,
            msg_id: T::ID,
        }
    }

    fn payload(&self) -> Result<alloc::vec::Vec<u8>, FieldError> {
        let mut payload = vec![0u8; layout::LEN];
        layout::MSG_CLASS.write(&mut payload, self.msg_class)?;
        layout::MSG_ID.write(&mut payload, self.msg_id)?;
        Ok(payload)
    }

    pub fn build_ack(&self) -> Result<AckAck, FieldError> {
        self.payload().map(AckAck::from_payload)
    }

    pub fn build_nak(&self) -> Result<AckNak, FieldError> {
        self.payload().map(AckNak::from_payload)
    }
}
