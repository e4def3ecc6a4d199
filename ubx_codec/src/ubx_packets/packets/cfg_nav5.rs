use alloc::vec;
use bitflags::bitflags;

use crate::{
    error::FieldError,
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::{Field, Scaled};

    pub const MASK: Field<u16> = Field::at(0);
    pub const DYN_MODEL: Field<u8> = Field::at(2);
    pub const FIX_MODE: Field<u8> = Field::at(3);
    pub const FIXED_ALT: Scaled<i32> = Scaled::new(4, 1e2);
    pub const FIXED_ALT_VAR: Scaled<u32> = Scaled::new(8, 1e4);
    pub const MIN_ELEV: Field<i8> = Field::at(12);
    pub const DR_LIMIT: Field<u8> = Field::at(13);
    pub const PDOP: Scaled<u16> = Scaled::new(14, 1e1);
    pub const TDOP: Scaled<u16> = Scaled::new(16, 1e1);
    pub const PACC: Field<u16> = Field::at(18);
    pub const TACC: Field<u16> = Field::at(20);
    pub const STATIC_HOLD_THRESH: Scaled<u8> = Scaled::new(22, 1e2);
    pub const DGNSS_TIMEOUT: Field<u8> = Field::at(23);
    pub const CNO_THRESH_NUM_SVS: Field<u8> = Field::at(24);
    pub const CNO_THRESH: Field<u8> = Field::at(25);
    // 2 reserved bytes
    pub const STATIC_HOLD_MAX_DIST: Field<u16> = Field::at(28);
    pub const UTC_STANDARD: Field<u8> = Field::at(30);
    // 5 reserved bytes
    pub const LEN: usize = 36;
}

ubx_message! {
    /// Navigation Engine Settings
    CfgNav5 {
        class: 0x06,
        id: 0x24,
        name: "CFG-NAV5",
        fixed_payload_len: Some(36),
        protocol: ProtocolVersions::ANY,
    }
}

impl CfgNav5 {
    ubx_getters! {
        /// Fixed altitude (mean sea level) for 2D fix mode [m]
        fixed_alt: f64 = layout::FIXED_ALT;
        /// Fixed altitude variance for 2D mode [m^2]
        fixed_alt_var: f64 = layout::FIXED_ALT_VAR;
        /// Minimum elevation for a GNSS satellite to be used in NAV [deg]
        min_elev_degrees: i8 = layout::MIN_ELEV;
        /// Reserved
        dr_limit: u8 = layout::DR_LIMIT;
        /// Position DOP mask to use
        pdop: f64 = layout::PDOP;
        /// Time DOP mask to use
        tdop: f64 = layout::TDOP;
        /// Position accuracy mask [m]
        pacc: u16 = layout::PACC;
        /// Time accuracy mask [m]
        tacc: u16 = layout::TACC;
        /// Static hold threshold [m/s]
        static_hold_thresh: f64 = layout::STATIC_HOLD_THRESH;
        /// DGNSS timeout [s]
        dgnss_timeout: u8 = layout::DGNSS_TIMEOUT;
        /// Number of satellites required to have C/N0 above `cno_thresh`
        /// for a fix to be attempted
        cno_thresh_num_svs: u8 = layout::CNO_THRESH_NUM_SVS;
        /// C/N0 threshold for deciding whether to attempt a fix [dBHz]
        cno_thresh: u8 = layout::CNO_THRESH;
        /// Static hold distance threshold before quitting static hold [m]
        static_hold_max_dist: u16 = layout::STATIC_HOLD_MAX_DIST;
    }

    /// Only the masked parameters are applied
    pub fn mask(&self) -> Result<CfgNav5Params, FieldError> {
        layout::MASK
            .read(self.payload())
            .map(CfgNav5Params::from_bits_retain)
    }

    pub fn dyn_model(&self) -> Result<NavDynamicModel, FieldError> {
        NavDynamicModel::try_from(layout::DYN_MODEL.read(self.payload())?)
    }

    pub fn fix_mode(&self) -> Result<NavFixMode, FieldError> {
        NavFixMode::try_from(layout::FIX_MODE.read(self.payload())?)
    }

    pub fn utc_standard(&self) -> Result<UtcStandardIdentifier, FieldError> {
        layout::UTC_STANDARD
            .read(self.payload())
            .map(UtcStandardIdentifier::from)
    }
}

/// Parameters of [`CfgNav5`].
///
/// Every parameter left at `None` keeps the receiver's current setting, its
/// bit in the apply mask stays clear.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CfgNav5Builder {
    pub dyn_model: Option<NavDynamicModel>,
    pub min_elev_degrees: Option<i8>,
    /// Fix mode, fixed altitude [m] and fixed altitude variance [m^2]
    pub fix_mode: Option<(NavFixMode, f64, f64)>,
    pub dr_limit: Option<u8>,
    /// Position DOP mask, applied with the position mask
    pub pdop: Option<f64>,
    /// Position accuracy mask [m]
    pub pacc: Option<u16>,
    /// Time DOP mask, applied with the time mask
    pub tdop: Option<f64>,
    /// Time accuracy mask [m]
    pub tacc: Option<u16>,
    /// Static hold threshold [m/s] and maximum distance [m]
    pub static_hold: Option<(f64, u16)>,
    /// DGNSS timeout [s]
    pub dgnss_timeout: Option<u8>,
    /// Number of satellites and C/N0 threshold [dBHz]
    pub cno_threshold: Option<(u8, u8)>,
    pub utc_standard: Option<UtcStandardIdentifier>,
}

impl CfgNav5Builder {
    pub fn build(&self) -> Result<CfgNav5, FieldError> {
        let mut payload = vec![0u8; layout::LEN];
        let mut mask = CfgNav5Params::empty();

        if let Some(model) = self.dyn_model {
            mask |= CfgNav5Params::DYN;
            layout::DYN_MODEL.write(&mut payload, model as u8)?;
        }
        if let Some(min_elev) = self.min_elev_degrees {
            mask |= CfgNav5Params::MIN_EL;
            layout::MIN_ELEV.write(&mut payload, min_elev)?;
        }
        if let Some((fix_mode, fixed_alt, fixed_alt_var)) = self.fix_mode {
            if fixed_alt_var < 0.0 {
                return Err(FieldError::invalid("fixed_alt_var", "variance must not be negative"));
            }
            mask |= CfgNav5Params::POS_FIX_MODE;
            layout::FIX_MODE.write(&mut payload, fix_mode as u8)?;
            layout::FIXED_ALT.write(&mut payload, fixed_alt)?;
            layout::FIXED_ALT_VAR.write(&mut payload, fixed_alt_var)?;
        }
        if let Some(dr_limit) = self.dr_limit {
            mask |= CfgNav5Params::DR_LIM;
            layout::DR_LIMIT.write(&mut payload, dr_limit)?;
        }
        if let Some(pdop) = self.pdop {
            mask |= CfgNav5Params::POS_MASK_APPLY;
            layout::PDOP.write(&mut payload, pdop)?;
        }
        if let Some(pacc) = self.pacc {
            mask |= CfgNav5Params::POS_MASK_APPLY;
            layout::PACC.write(&mut payload, pacc)?;
        }
        if let Some(tdop) = self.tdop {
            mask |= CfgNav5Params::TIME_MASK;
            layout::TDOP.write(&mut payload, tdop)?;
        }
        if let Some(tacc) = self.tacc {
            mask |= CfgNav5Params::TIME_MASK;
            layout::TACC.write(&mut payload, tacc)?;
        }
        if let Some((thresh, max_dist)) = self.static_hold {
            mask |= CfgNav5Params::STATIC_HOLD_MASK;
            layout::STATIC_HOLD_THRESH.write(&mut payload, thresh)?;
            layout::STATIC_HOLD_MAX_DIST.write(&mut payload, max_dist)?;
        }
        if let Some(timeout) = self.dgnss_timeout {
            mask |= CfgNav5Params::DGPS_MASK;
            layout::DGNSS_TIMEOUT.write(&mut payload, timeout)?;
        }
        if let Some((num_svs, cno)) = self.cno_threshold {
            mask |= CfgNav5Params::CNO_THRESHOLD;
            layout::CNO_THRESH_NUM_SVS.write(&mut payload, num_svs)?;
            layout::CNO_THRESH.write(&mut payload, cno)?;
        }
        if let Some(utc) = self.utc_standard {
            mask |= CfgNav5Params::UTC;
            layout::UTC_STANDARD.write(&mut payload, utc.into_raw())?;
        }

        layout::MASK.write(&mut payload, mask.bits())?;
        Ok(CfgNav5::from_payload(payload))
    }
}

bitflags! {
    /// `CfgNav5` parameters bitmask
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CfgNav5Params: u16 {
        /// Apply dynamic model settings
        const DYN = 1;
        /// Apply minimum elevation settings
        const MIN_EL = 2;
        /// Apply fix mode settings
        const POS_FIX_MODE = 4;
        /// Reserved
        const DR_LIM = 8;
        /// Apply position mask settings
        const POS_MASK_APPLY = 0x10;
        /// Apply time mask settings
        const TIME_MASK = 0x20;
        /// Apply static hold settings
        const STATIC_HOLD_MASK = 0x40;
        /// Apply DGPS settings
        const DGPS_MASK = 0x80;
        /// Apply CNO threshold settings (cnoThresh, cnoThreshNumSVs)
        const CNO_THRESHOLD = 0x100;
        /// Apply UTC settings (not supported in protocol versions less than 16)
        const UTC = 0x400;
    }
}

/// Dynamic platform model
#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavDynamicModel {
    #[default]
    Portable = 0,
    Stationary = 2,
    Pedestrian = 3,
    Automotive = 4,
    Sea = 5,
    AirborneWithLess1gAcceleration = 6,
    AirborneWithLess2gAcceleration = 7,
    AirborneWithLess4gAcceleration = 8,
    /// not supported in protocol versions less than 18
    WristWornWatch = 9,
    /// supported in protocol versions 19.2
    Bike = 10,
}

impl TryFrom<u8> for NavDynamicModel {
    type Error = FieldError;

    fn try_from(raw: u8) -> Result<Self, FieldError> {
        Ok(match raw {
            0 => Self::Portable,
            2 => Self::Stationary,
            3 => Self::Pedestrian,
            4 => Self::Automotive,
            5 => Self::Sea,
            6 => Self::AirborneWithLess1gAcceleration,
            7 => Self::AirborneWithLess2gAcceleration,
            8 => Self::AirborneWithLess4gAcceleration,
            9 => Self::WristWornWatch,
            10 => Self::Bike,
            _ => return Err(FieldError::invalid("dyn_model", "unknown dynamic platform model")),
        })
    }
}

/// Position Fixing Mode
#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavFixMode {
    /// 2D only
    Only2D = 1,
    /// 3D only
    Only3D = 2,
    /// Auto 2D/3D
    #[default]
    Auto2D3D = 3,
}

impl TryFrom<u8> for NavFixMode {
    type Error = FieldError;

    fn try_from(raw: u8) -> Result<Self, FieldError> {
        match raw {
            1 => Ok(Self::Only2D),
            2 => Ok(Self::Only3D),
            3 => Ok(Self::Auto2D3D),
            _ => Err(FieldError::invalid("fix_mode", "unknown position fixing mode")),
        }
    }
}

/// UTC standard the receiver derives its UTC time from
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UtcStandardIdentifier {
    /// Receiver selects based on GNSS configuration
    #[default]
    Automatic,
    /// UTC as operated by the U.S. Naval Observatory (GPS)
    UtcUsno,
    /// UTC as combined from multiple European laboratories (Galileo)
    UtcEu,
    /// UTC as operated by the former Soviet Union (GLONASS)
    UtcSu,
    /// UTC as operated by the National Time Service Center, China (BeiDou)
    UtcChina,
    /// UTC as operated by the National Physical Laboratory India (NavIC)
    UtcNpli,
    Unknown(u8),
}

impl UtcStandardIdentifier {
    const fn into_raw(self) -> u8 {
        match self {
            Self::Automatic => 0,
            Self::UtcUsno => 3,
            Self::UtcEu => 5,
            Self::UtcSu => 6,
            Self::UtcChina => 7,
            Self::UtcNpli => 8,
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<u8> for UtcStandardIdentifier {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Automatic,
            3 => Self::UtcUsno,
            5 => Self::UtcEu,
            6 => Self::UtcSu,
            7 => Self::UtcChina,
            8 => Self::UtcNpli,
            x => Self::Unknown(x),
        }
    }
}
