use bitflags::bitflags;

use crate::{
    error::FieldError,
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::{BitField, Field};

    pub const ITOW: Field<u32> = Field::at(0);
    pub const GPS_FIX: Field<u8> = Field::at(4);
    pub const FLAGS: Field<u8> = Field::at(5);
    pub const FIX_STAT_DIFF_CORR: BitField<u8> = BitField::new(6, 0x01);
    pub const FIX_STAT_CARR_SOLN_VALID: BitField<u8> = BitField::new(6, 0x02);
    pub const FIX_STAT_MAP_MATCHING: BitField<u8> = BitField::new(6, 0xc0);
    pub const FLAGS2_PSM_STATE: BitField<u8> = BitField::new(7, 0x03);
    pub const FLAGS2_SPOOF_DET_STATE: BitField<u8> = BitField::new(7, 0x18);
    pub const FLAGS2_CARR_SOLN: BitField<u8> = BitField::new(7, 0xc0);
    pub const TTFF: Field<u32> = Field::at(8);
    pub const MSSS: Field<u32> = Field::at(12);
}

ubx_message! {
    /// Receiver Navigation Status
    NavStatus {
        class: 0x01,
        id: 0x03,
        name: "NAV-STATUS",
        fixed_payload_len: Some(16),
        protocol: ProtocolVersions::ANY,
    }
}

impl NavStatus {
    ubx_getters! {
        /// GPS Millisecond Time of Week
        itow: u32 = layout::ITOW;
        /// Time to first fix (millisecond time tag)
        time_to_first_fix: u32 = layout::TTFF;
        /// Milliseconds since startup or reset
        uptime_ms: u32 = layout::MSSS;
        /// Map matching status, see [`MapMatchingStatus`]
        map_matching_raw: u8 = layout::FIX_STAT_MAP_MATCHING;
        /// Power save mode state: 0 acquisition, 1 tracking,
        /// 2 power optimized tracking, 3 inactive
        power_save_mode: u8 = layout::FLAGS2_PSM_STATE;
        /// Spoofing detection state: 0 unknown, 1 no spoofing,
        /// 2 spoofing indicated, 3 multiple spoofing indications
        spoof_detection_state: u8 = layout::FLAGS2_SPOOF_DET_STATE;
        /// Carrier phase range solution status: 0 none, 1 float, 2 fixed
        carrier_solution: u8 = layout::FLAGS2_CARR_SOLN;
    }

    /// GPS fix Type
    pub fn fix_type(&self) -> Result<GpsFix, FieldError> {
        layout::GPS_FIX.read(self.payload()).map(GpsFix::from)
    }

    /// Navigation status flags
    pub fn flags(&self) -> Result<NavStatusFlags, FieldError> {
        layout::FLAGS
            .read(self.payload())
            .map(NavStatusFlags::from_bits_retain)
    }

    /// Differential corrections available
    pub fn has_differential_corrections(&self) -> Result<bool, FieldError> {
        layout::FIX_STAT_DIFF_CORR
            .read(self.payload())
            .map(|bit| bit != 0)
    }

    /// Carrier solution valid
    pub fn carrier_solution_valid(&self) -> Result<bool, FieldError> {
        layout::FIX_STAT_CARR_SOLN_VALID
            .read(self.payload())
            .map(|bit| bit != 0)
    }

    pub fn map_matching(&self) -> Result<MapMatchingStatus, FieldError> {
        self.map_matching_raw().map(MapMatchingStatus::from)
    }
}

/// GPS fix Type
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GpsFix {
    NoFix,
    DeadReckoningOnly,
    Fix2D,
    Fix3D,
    GPSPlusDeadReckoning,
    TimeOnlyFix,
    Reserved(u8),
}

impl From<u8> for GpsFix {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::NoFix,
            1 => Self::DeadReckoningOnly,
            2 => Self::Fix2D,
            3 => Self::Fix3D,
            4 => Self::GPSPlusDeadReckoning,
            5 => Self::TimeOnlyFix,
            x => Self::Reserved(x),
        }
    }
}

bitflags! {
    /// Navigation Status Flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NavStatusFlags: u8 {
        /// position and velocity valid and within DOP and ACC Masks
        const GPS_FIX_OK = 1;
        /// DGPS used
        const DIFF_SOLN = 2;
        /// Week Number valid
        const WKN_SET = 4;
        /// Time of Week valid
        const TOW_SET = 8;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapMatchingStatus {
    None,
    /// valid, i.e. map matching data was received, but was too old
    Valid,
    /// used, map matching data was applied
    Used,
    /// map matching was the reason to enable the dead reckoning
    /// gpsFix type instead of publishing no fix
    Dr,
}

impl From<u8> for MapMatchingStatus {
    fn from(raw: u8) -> Self {
        match raw & 0x3 {
            0 => Self::None,
            1 => Self::Valid,
            2 => Self::Used,
            _ => Self::Dr,
        }
    }
}
