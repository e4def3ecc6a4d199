use crate::{
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::{Field, Scaled};

    pub const ITOW: Field<u32> = Field::at(0);
    pub const LON: Scaled<i32> = Scaled::new(4, 1e7);
    pub const LAT: Scaled<i32> = Scaled::new(8, 1e7);
    pub const HEIGHT: Scaled<i32> = Scaled::new(12, 1e3);
    pub const HEIGHT_MSL: Scaled<i32> = Scaled::new(16, 1e3);
    pub const H_ACC: Scaled<u32> = Scaled::new(20, 1e3);
    pub const V_ACC: Scaled<u32> = Scaled::new(24, 1e3);
}

ubx_message! {
    /// Geodetic Position Solution
    NavPosLlh {
        class: 0x01,
        id: 0x02,
        name: "NAV-POSLLH",
        fixed_payload_len: Some(28),
        protocol: ProtocolVersions::ANY,
    }
}

impl NavPosLlh {
    ubx_getters! {
        /// GPS Millisecond Time of Week
        itow: u32 = layout::ITOW;
        /// Longitude in degrees
        lon_degrees: f64 = layout::LON;
        /// Latitude in degrees
        lat_degrees: f64 = layout::LAT;
        /// Height above ellipsoid in meters
        height_meters: f64 = layout::HEIGHT;
        /// Height above mean sea level in meters
        height_msl: f64 = layout::HEIGHT_MSL;
        /// Horizontal accuracy estimate in meters
        horizontal_accuracy: f64 = layout::H_ACC;
        /// Vertical accuracy estimate in meters
        vertical_accuracy: f64 = layout::V_ACC;
    }
}
