use bitflags::bitflags;

use super::nav_status::GpsFix;
use crate::{
    error::FieldError,
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::{BitField, Field, Scaled};

    pub const ITOW: Field<u32> = Field::at(0);
    pub const YEAR: Field<u16> = Field::at(4);
    pub const MONTH: Field<u8> = Field::at(6);
    pub const DAY: Field<u8> = Field::at(7);
    pub const HOUR: Field<u8> = Field::at(8);
    pub const MIN: Field<u8> = Field::at(9);
    pub const SEC: Field<u8> = Field::at(10);
    pub const VALID: Field<u8> = Field::at(11);
    pub const T_ACC: Field<u32> = Field::at(12);
    pub const NANO: Field<i32> = Field::at(16);
    pub const FIX_TYPE: Field<u8> = Field::at(20);
    pub const FLAGS: Field<u8> = Field::at(21);
    pub const FLAGS_PSM_STATE: BitField<u8> = BitField::new(21, 0x1c);
    pub const FLAGS_CARR_SOLN: BitField<u8> = BitField::new(21, 0xc0);
    pub const FLAGS2: Field<u8> = Field::at(22);
    pub const NUM_SV: Field<u8> = Field::at(23);
    pub const LON: Scaled<i32> = Scaled::new(24, 1e7);
    pub const LAT: Scaled<i32> = Scaled::new(28, 1e7);
    pub const HEIGHT: Scaled<i32> = Scaled::new(32, 1e3);
    pub const HEIGHT_MSL: Scaled<i32> = Scaled::new(36, 1e3);
    pub const H_ACC: Scaled<u32> = Scaled::new(40, 1e3);
    pub const V_ACC: Scaled<u32> = Scaled::new(44, 1e3);
    pub const VEL_N: Scaled<i32> = Scaled::new(48, 1e3);
    pub const VEL_E: Scaled<i32> = Scaled::new(52, 1e3);
    pub const VEL_D: Scaled<i32> = Scaled::new(56, 1e3);
    pub const G_SPEED: Scaled<i32> = Scaled::new(60, 1e3);
    pub const HEAD_MOT: Scaled<i32> = Scaled::new(64, 1e5);
    pub const S_ACC: Scaled<u32> = Scaled::new(68, 1e3);
    pub const HEAD_ACC: Scaled<u32> = Scaled::new(72, 1e5);
    pub const PDOP: Scaled<u16> = Scaled::new(76, 1e2);
    pub const FLAGS3_INVALID_LLH: BitField<u16> = BitField::new(78, 0x0001);
    pub const FLAGS3_LAST_CORRECTION_AGE: BitField<u16> = BitField::new(78, 0x001e);
    // 4 reserved bytes at 80
    pub const HEAD_VEH: Scaled<i32> = Scaled::new(84, 1e5);
    pub const MAG_DEC: Scaled<i16> = Scaled::new(88, 1e2);
    pub const MAG_ACC: Scaled<u16> = Scaled::new(90, 1e2);
}

ubx_message! {
    /// Navigation Position Velocity Time Solution.
    ///
    /// Older firmware sends an 84 byte payload without the vehicle heading
    /// and magnetic declination fields; their getters fail with
    /// [`FieldError::OutOfBounds`] on such payloads.
    NavPvt {
        class: 0x01,
        id: 0x07,
        name: "NAV-PVT",
        fixed_payload_len: None,
        protocol: ProtocolVersions::since("14.00"),
    }
}

impl NavPvt {
    ubx_getters! {
        /// GPS Millisecond time of week of the navigation epoch.
        ///
        /// Messages with the same iTOW value can be assumed to have come
        /// from the same navigation solution.
        itow: u32 = layout::ITOW;
        /// Year (UTC)
        year: u16 = layout::YEAR;
        /// Month, range 1..12 (UTC)
        month: u8 = layout::MONTH;
        /// Day of month, range 1..31 (UTC)
        day: u8 = layout::DAY;
        /// Hour of day, range 0..23 (UTC)
        hour: u8 = layout::HOUR;
        /// Minute of hour, range 0..59 (UTC)
        min: u8 = layout::MIN;
        /// Seconds of minute, range 0..60 (UTC)
        sec: u8 = layout::SEC;
        /// Time accuracy estimate in nanoseconds (UTC)
        time_accuracy: u32 = layout::T_ACC;
        /// Fraction of second, range -1e9 .. 1e9 (UTC)
        nanosecond: i32 = layout::NANO;
        /// Power save mode state
        power_save_mode: u8 = layout::FLAGS_PSM_STATE;
        /// Carrier phase range solution status: 0 none, 1 float, 2 fixed
        carrier_solution: u8 = layout::FLAGS_CARR_SOLN;
        /// Number of satellites used in Nav Solution
        num_satellites: u8 = layout::NUM_SV;
        /// Longitude in \[deg\]
        longitude: f64 = layout::LON;
        /// Latitude in \[deg\]
        latitude: f64 = layout::LAT;
        /// Height above reference ellipsoid in \[m\]
        height_above_ellipsoid: f64 = layout::HEIGHT;
        /// Height above Mean Sea Level in \[m\]
        height_msl: f64 = layout::HEIGHT_MSL;
        /// Horizontal accuracy in \[m\]
        horizontal_accuracy: f64 = layout::H_ACC;
        /// Vertical accuracy in \[m\]
        vertical_accuracy: f64 = layout::V_ACC;
        /// Velocity North component \[m/s\]
        vel_north: f64 = layout::VEL_N;
        /// Velocity East component \[m/s\]
        vel_east: f64 = layout::VEL_E;
        /// Velocity Down component \[m/s\]
        vel_down: f64 = layout::VEL_D;
        /// Ground speed \[m/s\]
        ground_speed_2d: f64 = layout::G_SPEED;
        /// Heading of motion 2-D \[deg\]
        heading_motion: f64 = layout::HEAD_MOT;
        /// Speed Accuracy Estimate \[m/s\]
        speed_accuracy: f64 = layout::S_ACC;
        /// Heading accuracy estimate (for both vehicle and motion) \[deg\]
        heading_accuracy: f64 = layout::HEAD_ACC;
        /// Position DOP
        pdop: f64 = layout::PDOP;
        /// Age of the most recent differential correction as a bucket index,
        /// 0 meaning not available
        last_correction_age: u16 = layout::FLAGS3_LAST_CORRECTION_AGE;
        /// Heading of vehicle (2-D), valid when
        /// [`NavPvtFlags::HEAD_VEH_VALID`] is set
        heading_vehicle: f64 = layout::HEAD_VEH;
        /// Magnetic declination \[deg\]
        magnetic_declination: f64 = layout::MAG_DEC;
        /// Magnetic declination accuracy \[deg\]
        magnetic_declination_accuracy: f64 = layout::MAG_ACC;
    }

    /// GNSS fix type
    pub fn fix_type(&self) -> Result<GpsFix, FieldError> {
        layout::FIX_TYPE.read(self.payload()).map(GpsFix::from)
    }

    pub fn valid(&self) -> Result<NavPvtValidFlags, FieldError> {
        layout::VALID
            .read(self.payload())
            .map(NavPvtValidFlags::from_bits_retain)
    }

    pub fn flags(&self) -> Result<NavPvtFlags, FieldError> {
        layout::FLAGS
            .read(self.payload())
            .map(NavPvtFlags::from_bits_retain)
    }

    pub fn flags2(&self) -> Result<NavPvtFlags2, FieldError> {
        layout::FLAGS2
            .read(self.payload())
            .map(NavPvtFlags2::from_bits_retain)
    }

    /// Longitude, latitude, height and hMSL are invalid
    pub fn invalid_llh(&self) -> Result<bool, FieldError> {
        layout::FLAGS3_INVALID_LLH
            .read(self.payload())
            .map(|bit| bit != 0)
    }
}

bitflags! {
    /// Validity flags of `NavPvt`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NavPvtValidFlags: u8 {
        /// Valid UTC date
        const VALID_DATE = 0x01;
        /// Valid UTC time of day
        const VALID_TIME = 0x02;
        /// UTC time of day has been fully resolved
        const FULLY_RESOLVED = 0x04;
        /// Valid magnetic declination
        const VALID_MAG = 0x08;
    }
}

bitflags! {
    /// Fix status flags of `NavPvt`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NavPvtFlags: u8 {
        /// position and velocity valid and within DOP and ACC Masks
        const GPS_FIX_OK = 0x01;
        /// DGPS used
        const DIFF_SOLN = 0x02;
        /// 1 = heading of vehicle is valid
        const HEAD_VEH_VALID = 0x20;
        const CARR_SOLN_FLOAT = 0x40;
        const CARR_SOLN_FIXED = 0x80;
    }
}

bitflags! {
    /// Additional flags of `NavPvt`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NavPvtFlags2: u8 {
        /// Information about UTC Date and Time of Day validity confirmation is available
        const CONFIRMED_AVAI = 0x20;
        /// UTC Date validity could be confirmed
        const CONFIRMED_DATE = 0x40;
        /// UTC Time of Day could be confirmed
        const CONFIRMED_TIME = 0x80;
    }
}
