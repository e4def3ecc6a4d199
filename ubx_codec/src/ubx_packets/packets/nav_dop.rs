use crate::{
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::{Field, Scaled};

    /// DOP values are sent in hundredths
    const DOP_SCALE: f64 = 100.0;

    pub const ITOW: Field<u32> = Field::at(0);
    pub const GDOP: Scaled<u16> = Scaled::new(4, DOP_SCALE);
    pub const PDOP: Scaled<u16> = Scaled::new(6, DOP_SCALE);
    pub const TDOP: Scaled<u16> = Scaled::new(8, DOP_SCALE);
    pub const VDOP: Scaled<u16> = Scaled::new(10, DOP_SCALE);
    pub const HDOP: Scaled<u16> = Scaled::new(12, DOP_SCALE);
    pub const NDOP: Scaled<u16> = Scaled::new(14, DOP_SCALE);
    pub const EDOP: Scaled<u16> = Scaled::new(16, DOP_SCALE);
}

ubx_message! {
    /// Dilution of precision
    NavDop {
        class: 0x01,
        id: 0x04,
        name: "NAV-DOP",
        fixed_payload_len: Some(18),
        protocol: ProtocolVersions::ANY,
    }
}

impl NavDop {
    ubx_getters! {
        /// GPS Millisecond Time of Week
        itow: u32 = layout::ITOW;
        geometric_dop: f64 = layout::GDOP;
        position_dop: f64 = layout::PDOP;
        time_dop: f64 = layout::TDOP;
        vertical_dop: f64 = layout::VDOP;
        horizontal_dop: f64 = layout::HDOP;
        northing_dop: f64 = layout::NDOP;
        easting_dop: f64 = layout::EDOP;
    }
}
