use alloc::vec;
use bitflags::bitflags;

use crate::{
    error::FieldError,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::{BitField, Field};

    pub const FLAGS: Field<u16> = Field::at(0);
    pub const PIN_SWITCH: BitField<u16> = BitField::new(2, 0x001f);
    pub const PIN_SCD: BitField<u16> = BitField::new(2, 0x03e0);
    pub const PIN_OCD: BitField<u16> = BitField::new(2, 0x7c00);
    pub const RECONFIG: BitField<u16> = BitField::new(2, 0x8000);
    pub const LEN: usize = 4;
}

/// Highest PIO number a pin field can hold
pub const MAX_ANT_PIN: u8 = 31;

ubx_message! {
    /// Antenna Control Settings
    CfgAnt {
        class: 0x06,
        id: 0x13,
        name: "CFG-ANT",
        fixed_payload_len: Some(4),
        protocol: ProtocolVersions::ANY,
    }
}

impl CfgAnt {
    pub fn flags(&self) -> Result<AntFlags, FieldError> {
        layout::FLAGS
            .read(self.payload())
            .map(AntFlags::from_bits_retain)
    }

    pub fn pins(&self) -> Result<AntPins, FieldError> {
        let payload = self.payload();
        // each pin field is five bits wide, the casts cannot truncate
        Ok(AntPins {
            switch: layout::PIN_SWITCH.read(payload)? as u8,
            short_circuit: layout::PIN_SCD.read(payload)? as u8,
            open_circuit: layout::PIN_OCD.read(payload)? as u8,
            reconfigure: layout::RECONFIG.read(payload)? != 0,
        })
    }
}

/// Antenna pin configuration, PIO numbers `0..=31`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntPins {
    /// PIO used for the antenna supply switch signal
    pub switch: u8,
    /// PIO used for the short circuit detection signal
    pub short_circuit: u8,
    /// PIO used for the open circuit detection signal
    pub open_circuit: u8,
    /// Apply the pin settings, otherwise only the flags are updated
    pub reconfigure: bool,
}

/// Parameters of [`CfgAnt`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgAntBuilder {
    pub flags: AntFlags,
    pub pins: AntPins,
}

impl Default for CfgAntBuilder {
    /// Supply voltage control with short circuit detection, pins untouched
    fn default() -> Self {
        Self {
            flags: AntFlags::SVCS | AntFlags::SCD,
            pins: AntPins::default(),
        }
    }
}

impl CfgAntBuilder {
    pub fn build(&self) -> Result<CfgAnt, FieldError> {
        let pins = [
            ("switch", self.pins.switch),
            ("short_circuit", self.pins.short_circuit),
            ("open_circuit", self.pins.open_circuit),
        ];
        if let Some(&(field, _)) = pins.iter().find(|(_, pin)| *pin > MAX_ANT_PIN) {
            return Err(FieldError::invalid(field, "antenna pin must be in 0..=31"));
        }

        let mut payload = vec![0u8; layout::LEN];
        layout::FLAGS.write(&mut payload, self.flags.bits())?;
        layout::PIN_SWITCH.write(&mut payload, self.pins.switch.into())?;
        layout::PIN_SCD.write(&mut payload, self.pins.short_circuit.into())?;
        layout::PIN_OCD.write(&mut payload, self.pins.open_circuit.into())?;
        layout::RECONFIG.write(&mut payload, self.pins.reconfigure.into())?;
        Ok(CfgAnt::from_payload(payload))
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AntFlags: u16 {
        /// Enable supply voltage control signal
        const SVCS = 0x01;
        /// Enable short circuit detection
        const SCD = 0x02;
        /// Enable open circuit detection
        const OCD = 0x04;
        /// Power down on short circuit detection
        const PDWN_ON_SCD = 0x08;
        /// Enable automatic recovery from short circuit state
        const RECOVERY = 0x10;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_only() {
        let msg = CfgAntBuilder::default().build().unwrap();
        assert_eq!(msg.payload(), &[0x03, 0x00, 0x00, 0x00]);
        assert_eq!(msg.flags(), Ok(AntFlags::SVCS | AntFlags::SCD));
        assert_eq!(msg.pins(), Ok(AntPins::default()));
    }

    #[test]
    fn pin_configuration() {
        let pins = AntPins {
            switch: 16,
            short_circuit: 15,
            open_circuit: 14,
            reconfigure: true,
        };
        let msg = CfgAntBuilder {
            flags: AntFlags::all(),
            pins,
        }
        .build()
        .unwrap();
        // 16 | 15 << 5 | 14 << 10 | 1 << 15
        assert_eq!(msg.payload(), &[0x1f, 0x00, 0xf0, 0xb9]);
        assert_eq!(msg.pins(), Ok(pins));
        assert_eq!(msg.flags(), Ok(AntFlags::all()));
    }

    #[test]
    fn rejects_pin_out_of_range() {
        let builder = CfgAntBuilder {
            pins: AntPins {
                open_circuit: 32,
                ..AntPins::default()
            },
            ..Default::default()
        };
        assert_eq!(
            builder.build(),
            Err(FieldError::invalid("open_circuit", "antenna pin must be in 0..=31"))
        );
    }
}
