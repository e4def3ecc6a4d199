use alloc::vec;
use bitflags::bitflags;

use crate::{
    error::FieldError,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::Field;

    pub const NAV_BBR_MASK: Field<u16> = Field::at(0);
    pub const RESET_MODE: Field<u8> = Field::at(2);
    // 1 reserved byte
    pub const LEN: usize = 4;
}

ubx_message! {
    /// Reset Receiver / Clear Backup Data Structures
    CfgRst {
        class: 0x06,
        id: 0x04,
        name: "CFG-RST",
        fixed_payload_len: Some(4),
        protocol: ProtocolVersions::ANY,
    }
}

impl CfgRst {
    /// Battery backed RAM sections to clear
    pub fn nav_bbr_mask(&self) -> Result<NavBbrMask, FieldError> {
        layout::NAV_BBR_MASK
            .read(self.payload())
            .map(NavBbrMask::from_bits_retain)
    }

    pub fn reset_mode(&self) -> Result<ResetMode, FieldError> {
        ResetMode::try_from(layout::RESET_MODE.read(self.payload())?)
    }
}

/// Parameters of [`CfgRst`]. The default is a cold start with a controlled
/// software reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgRstBuilder {
    pub nav_bbr_mask: NavBbrMask,
    pub reset_mode: ResetMode,
}

impl Default for CfgRstBuilder {
    fn default() -> Self {
        Self {
            nav_bbr_mask: NavBbrPredefinedMask::COLD_START.into(),
            reset_mode: ResetMode::ControlledSoftwareReset,
        }
    }
}

impl CfgRstBuilder {
    pub fn hot_start() -> Self {
        Self {
            nav_bbr_mask: NavBbrPredefinedMask::HOT_START.into(),
            ..Self::default()
        }
    }

    pub fn warm_start() -> Self {
        Self {
            nav_bbr_mask: NavBbrPredefinedMask::WARM_START.into(),
            ..Self::default()
        }
    }

    pub fn cold_start() -> Self {
        Self::default()
    }

    pub fn build(&self) -> Result<CfgRst, FieldError> {
        let mut payload = vec![0u8; layout::LEN];
        layout::NAV_BBR_MASK.write(&mut payload, self.nav_bbr_mask.bits())?;
        layout::RESET_MODE.write(&mut payload, self.reset_mode.into_raw())?;
        Ok(CfgRst::from_payload(payload))
    }
}

bitflags! {
    /// Battery backed RAM sections to clear
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NavBbrMask: u16 {
        const EPHEMERIS = 1;
        const ALMANACH = 2;
        const HEALTH = 4;
        const KLOBUCHARD = 8;
        const POSITION = 16;
        const CLOCK_DRIFT = 32;
        const OSCILATOR_PARAMETER = 64;
        const UTC_CORRECTION_PARAMETERS = 0x80;
        const RTC = 0x100;
        const SFDR_PARAMETERS = 0x800;
        const SFDR_VEHICLE_MONITORING_PARAMETERS = 0x1000;
        const TCT_PARAMETERS = 0x2000;
        const AUTONOMOUS_ORBIT_PARAMETERS = 0x8000;
    }
}

/// Predefined values for `NavBbrMask`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct NavBbrPredefinedMask(u16);

impl From<NavBbrPredefinedMask> for NavBbrMask {
    fn from(x: NavBbrPredefinedMask) -> Self {
        // Cold start sets every bit, reserved ones included
        Self::from_bits_retain(x.0)
    }
}

impl NavBbrPredefinedMask {
    pub const HOT_START: NavBbrPredefinedMask = NavBbrPredefinedMask(0);
    pub const WARM_START: NavBbrPredefinedMask = NavBbrPredefinedMask(1);
    pub const COLD_START: NavBbrPredefinedMask = NavBbrPredefinedMask(0xFFFF);
}

/// Reset Type
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResetMode {
    /// Hardware reset (Watchdog) immediately
    HardwareResetImmediately = 0,
    ControlledSoftwareReset = 0x1,
    ControlledSoftwareResetGpsOnly = 0x02,
    /// Hardware reset (Watchdog) after shutdown (>=FW6.0)
    HardwareResetAfterShutdown = 0x04,
    ControlledGpsStop = 0x08,
    ControlledGpsStart = 0x09,
}

impl ResetMode {
    const fn into_raw(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ResetMode {
    type Error = FieldError;

    fn try_from(raw: u8) -> Result<Self, FieldError> {
        match raw {
            0x00 => Ok(Self::HardwareResetImmediately),
            0x01 => Ok(Self::ControlledSoftwareReset),
            0x02 => Ok(Self::ControlledSoftwareResetGpsOnly),
            0x04 => Ok(Self::HardwareResetAfterShutdown),
            0x08 => Ok(Self::ControlledGpsStop),
            0x09 => Ok(Self::ControlledGpsStart),
            _ => Err(FieldError::invalid("reset_mode", "unknown reset type")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_controlled_cold_start() {
        let rst = CfgRstBuilder::default().build().unwrap();
        assert_eq!(rst.payload(), &[0xff, 0xff, 0x01, 0x00]);
        assert_eq!(rst.nav_bbr_mask().unwrap().bits(), 0xffff);
        assert_eq!(rst.reset_mode(), Ok(ResetMode::ControlledSoftwareReset));
        assert_eq!(
            rst.into_frame().unwrap(),
            [0xb5, 0x62, 0x06, 0x04, 0x04, 0x00, 0xff, 0xff, 0x01, 0x00, 0x0d, 0x5f]
        );
    }

    #[test]
    fn hot_and_warm_start() {
        let hot = CfgRstBuilder {
            reset_mode: ResetMode::HardwareResetImmediately,
            ..CfgRstBuilder::hot_start()
        }
        .build()
        .unwrap();
        assert_eq!(hot.payload(), &[0x00, 0x00, 0x00, 0x00]);
        assert!(hot.nav_bbr_mask().unwrap().is_empty());

        let warm = CfgRstBuilder::warm_start().build().unwrap();
        assert_eq!(warm.nav_bbr_mask(), Ok(NavBbrMask::EPHEMERIS));
    }

    #[test]
    fn custom_mask() {
        let rst = CfgRstBuilder {
            nav_bbr_mask: NavBbrMask::POSITION | NavBbrMask::RTC,
            reset_mode: ResetMode::ControlledGpsStart,
        }
        .build()
        .unwrap();
        assert_eq!(rst.payload(), &[0x10, 0x01, 0x09, 0x00]);
    }

    #[test]
    fn unknown_reset_mode() {
        let rst = CfgRst::from_payload(vec![0, 0, 0x03, 0]);
        assert!(rst.reset_mode().is_err());
    }
}
