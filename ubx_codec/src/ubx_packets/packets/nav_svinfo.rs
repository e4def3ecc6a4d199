use super::satellite::{self, SatelliteData, SatelliteIter, SatelliteSource};
use crate::{
    error::FieldError,
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::{BitField, Field};

    pub const ITOW: Field<u32> = Field::at(0);
    pub const NUM_CH: Field<u8> = Field::at(4);
    pub const CHIP_GEN: BitField<u8> = BitField::new(5, 0x07);
    // 2 reserved bytes, then num_ch records of 12 bytes
}

ubx_message! {
    /// Space Vehicle Information, superseded by NAV-SAT on newer receivers
    NavSvInfo {
        class: 0x01,
        id: 0x30,
        name: "NAV-SVINFO",
        fixed_payload_len: None,
        protocol: ProtocolVersions::up_to("23.01"),
    }
}

impl NavSvInfo {
    ubx_getters! {
        /// GPS time of week in ms
        itow: u32 = layout::ITOW;
        /// Number of channels, one record each
        num_svs: u8 = layout::NUM_CH;
    }

    pub fn chip_generation(&self) -> Result<ChipGeneration, FieldError> {
        layout::CHIP_GEN
            .read(self.payload())
            .map(ChipGeneration::from)
    }

    /// Satellite record `index`, rejecting indices at or past `num_svs`
    pub fn sv(&self, index: usize) -> Result<SatelliteData<'_>, FieldError> {
        satellite::record_at(self.payload(), self.num_svs()?, index, SatelliteSource::NavSvInfo)
    }

    pub fn svs(&self) -> Result<SatelliteIter<'_>, FieldError> {
        satellite::records(self.payload(), self.num_svs()?, SatelliteSource::NavSvInfo)
    }
}

/// Chip generation reported in the NAV-SVINFO global flags
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChipGeneration {
    Antaris,
    Ublox5,
    Ublox6,
    Ublox7,
    Ublox8,
    Other(u8),
}

impl From<u8> for ChipGeneration {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Antaris,
            1 => Self::Ublox5,
            2 => Self::Ublox6,
            3 => Self::Ublox7,
            4 => Self::Ublox8,
            x => Self::Other(x),
        }
    }
}
