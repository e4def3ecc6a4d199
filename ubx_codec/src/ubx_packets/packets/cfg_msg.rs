use alloc::vec::Vec;

use crate::{
    error::FieldError,
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions, UbxPacketMeta},
};

/// Number of I/O ports in the all-ports form
pub const NUM_PORTS: usize = 6;

mod layout {
    use super::NUM_PORTS;
    use crate::field::Field;

    pub const MSG_CLASS: Field<u8> = Field::at(0);
    pub const MSG_ID: Field<u8> = Field::at(1);
    pub const RATES_OFFSET: usize = MSG_ID.end();
    pub const CURRENT_PORT_LEN: usize = RATES_OFFSET + 1;
    pub const ALL_PORTS_LEN: usize = RATES_OFFSET + NUM_PORTS;
}

ubx_message! {
    /// Set Message Rate(s).
    ///
    /// The send rate is relative to the event a message is registered on.
    /// For example, if the rate of a navigation message is set to 2, the
    /// message is sent every second navigation solution.
    CfgMsg {
        class: 0x06,
        id: 0x01,
        name: "CFG-MSG",
        fixed_payload_len: None,
        protocol: ProtocolVersions::ANY,
    }
}

/// The two payload forms of [`CfgMsg`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CfgMsgRates {
    /// Rate on the port the command is received on (3 byte payload)
    CurrentPort(u8),
    /// Rate on each of the six I/O ports (8 byte payload)
    AllPorts([u8; NUM_PORTS]),
}

impl Default for CfgMsgRates {
    fn default() -> Self {
        Self::CurrentPort(1)
    }
}

impl CfgMsg {
    ubx_getters! {
        msg_class: u8 = layout::MSG_CLASS;
        msg_id: u8 = layout::MSG_ID;
    }

    /// Rates in whichever form the payload carries
    pub fn rates(&self) -> Result<CfgMsgRates, FieldError> {
        let payload = self.payload();
        match payload.get(layout::RATES_OFFSET..) {
            Some(rates) if rates.len() >= NUM_PORTS => {
                let mut all = [0u8; NUM_PORTS];
                all.copy_from_slice(&rates[..NUM_PORTS]);
                Ok(CfgMsgRates::AllPorts(all))
            },
            Some([rate, ..]) => Ok(CfgMsgRates::CurrentPort(*rate)),
            _ => Err(FieldError::OutOfBounds {
                offset: layout::RATES_OFFSET,
                width: 1,
                payload_len: payload.len(),
            }),
        }
    }

    pub fn is_for<T: UbxPacketMeta>(&self) -> bool {
        self.msg_class() == Ok(T::CLASS) && self.msg_id() == Ok(T::ID)
    }
}

/// Parameters of [`CfgMsg`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CfgMsgBuilder {
    pub msg_class: u8,
    pub msg_id: u8,
    pub rates: CfgMsgRates,
}

impl CfgMsgBuilder {
    /// Output `T` every `rate` solutions on the current port, 0 disables it
    pub const fn set_rate_for<T: UbxPacketMeta>(rate: u8) -> Self {
        Self {
            msg_class: T::CLASS,
            msg_id: T::ID,
            rates: CfgMsgRates::CurrentPort(rate),
        }
    }

    pub const fn set_rates_for<T: UbxPacketMeta>(rates: [u8; NUM_PORTS]) -> Self {
        Self {
            msg_class: T::CLASS,
            msg_id: T::ID,
            rates: CfgMsgRates::AllPorts(rates),
        }
    }

    pub fn build(&self) -> Result<CfgMsg, FieldError> {
        let len = match self.rates {
            CfgMsgRates::CurrentPort(_) => layout::CURRENT_PORT_LEN,
            CfgMsgRates::AllPorts(_) => layout::ALL_PORTS_LEN,
        };
        let mut payload = Vec::with_capacity(len);
        payload.resize(layout::RATES_OFFSET, 0);
        layout::MSG_CLASS.write(&mut payload, self.msg_class)?;
        layout::MSG_ID.write(&mut payload, self.msg_id)?;
        match self.rates {
            CfgMsgRates::CurrentPort(rate) => payload.push(rate),
            CfgMsgRates::AllPorts(rates) => payload.extend_from_slice(&rates),
        }
        Ok(CfgMsg::from_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ubx_packets::packets::{nav_pvt::NavPvt, nav_sat::NavSat};
    use alloc::vec;

    #[test]
    fn current_port_form() {
        let msg = CfgMsgBuilder::set_rate_for::<NavPvt>(1).build().unwrap();
        assert_eq!(msg.payload(), &[0x01, 0x07, 0x01]);
        assert_eq!(msg.rates(), Ok(CfgMsgRates::CurrentPort(1)));
        assert!(msg.is_for::<NavPvt>());
        assert!(!msg.is_for::<NavSat>());
    }

    #[test]
    fn all_ports_form() {
        let msg = CfgMsgBuilder::set_rates_for::<NavSat>([0, 1, 0, 5, 0, 0])
            .build()
            .unwrap();
        assert_eq!(msg.payload(), &[0x01, 0x35, 0, 1, 0, 5, 0, 0]);
        assert_eq!(msg.rates(), Ok(CfgMsgRates::AllPorts([0, 1, 0, 5, 0, 0])));
    }

    #[test]
    fn poll_form_has_no_rates() {
        let msg = CfgMsg::from_payload(vec![0x01, 0x07]);
        assert_eq!(msg.msg_id(), Ok(0x07));
        assert!(matches!(
            msg.rates(),
            Err(FieldError::OutOfBounds { offset: 2, .. })
        ));
    }
}
