use super::satellite::{self, SatelliteData, SatelliteIter, SatelliteSource};
use crate::{
    error::FieldError,
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::Field;

    pub const ITOW: Field<u32> = Field::at(0);
    pub const VERSION: Field<u8> = Field::at(4);
    pub const NUM_SVS: Field<u8> = Field::at(5);
    // 2 reserved bytes, then num_svs records of 12 bytes
}

ubx_message! {
    /// Satellite Information
    NavSat {
        class: 0x01,
        id: 0x35,
        name: "NAV-SAT",
        fixed_payload_len: None,
        protocol: ProtocolVersions::since("15.00"),
    }
}

impl NavSat {
    ubx_getters! {
        /// GPS time of week in ms
        itow: u32 = layout::ITOW;
        /// Message version, should be 1
        version: u8 = layout::VERSION;
        /// Number of satellite records that follow the header
        num_svs: u8 = layout::NUM_SVS;
    }

    /// Satellite record `index`, rejecting indices at or past `num_svs`
    pub fn sv(&self, index: usize) -> Result<SatelliteData<'_>, FieldError> {
        satellite::record_at(self.payload(), self.num_svs()?, index, SatelliteSource::NavSat)
    }

    /// All `num_svs` records. Fails when the payload is shorter than the
    /// declared count requires.
    pub fn svs(&self) -> Result<SatelliteIter<'_>, FieldError> {
        satellite::records(self.payload(), self.num_svs()?, SatelliteSource::NavSat)
    }
}
