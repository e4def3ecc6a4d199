use super::packets::{nav_pos_llh::NavPosLlh, nav_pvt::NavPvt};
use crate::error::{DateTimeError, FieldError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

/// Represents a world position, can be constructed from NavPosLlh and NavPvt packets.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Longitude in degrees
    pub lon: f64,

    /// Latitude in degrees
    pub lat: f64,

    /// Altitude above mean sea level in meters
    pub alt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    /// m/s over the ground
    pub speed: f64,

    /// Heading in degrees
    pub heading: f64,
}

impl TryFrom<&NavPosLlh> for Position {
    type Error = FieldError;

    fn try_from(packet: &NavPosLlh) -> Result<Self, FieldError> {
        Ok(Position {
            lon: packet.lon_degrees()?,
            lat: packet.lat_degrees()?,
            alt: packet.height_msl()?,
        })
    }
}

impl TryFrom<&NavPvt> for Position {
    type Error = FieldError;

    fn try_from(packet: &NavPvt) -> Result<Self, FieldError> {
        Ok(Position {
            lon: packet.longitude()?,
            lat: packet.latitude()?,
            alt: packet.height_msl()?,
        })
    }
}

impl TryFrom<&NavPvt> for Velocity {
    type Error = FieldError;

    fn try_from(packet: &NavPvt) -> Result<Self, FieldError> {
        Ok(Velocity {
            speed: packet.ground_speed_2d()?,
            heading: packet.heading_motion()?,
        })
    }
}

impl TryFrom<&NavPvt> for DateTime<Utc> {
    type Error = DateTimeError;

    fn try_from(sol: &NavPvt) -> Result<Self, Self::Error> {
        const NANOS_LIM: u32 = 1_000_000_000;

        let date = NaiveDate::from_ymd_opt(
            i32::from(sol.year()?),
            u32::from(sol.month()?),
            u32::from(sol.day()?),
        )
        .ok_or(DateTimeError::InvalidDate)?;
        let (hour, min, sec) = (
            u32::from(sol.hour()?),
            u32::from(sol.min()?),
            u32::from(sol.sec()?),
        );

        // nano may be negative, the receiver rounds the seconds up
        let nano = sol.nanosecond()?;
        if nano.unsigned_abs() >= NANOS_LIM {
            return Err(DateTimeError::InvalidNanoseconds);
        }

        let dt = if sec == 60 {
            // Leap second: chrono keeps it as second 59 with nanos >= 1e9
            let leap_nano = NANOS_LIM
                .checked_add_signed(nano)
                .ok_or(DateTimeError::InvalidNanoseconds)?;
            let time = NaiveTime::from_hms_nano_opt(hour, min, 59, leap_nano)
                .ok_or(DateTimeError::InvalidTime)?;
            NaiveDateTime::new(date, time)
        } else {
            let time =
                NaiveTime::from_hms_opt(hour, min, sec).ok_or(DateTimeError::InvalidTime)?;
            NaiveDateTime::new(date, time)
                .checked_add_signed(TimeDelta::nanoseconds(i64::from(nano)))
                .ok_or(DateTimeError::InvalidNanoseconds)?
        };

        Ok(DateTime::from_naive_utc_and_offset(dt, Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ubx_packets::packets::nav_pvt::tests::sample_payload;
    use alloc::vec;
    use chrono::{Datelike, Timelike};

    #[test]
    fn position_from_pos_llh() {
        let mut payload = vec![0u8; 28];
        payload[4..8].copy_from_slice(&85_000_000i32.to_le_bytes());
        payload[8..12].copy_from_slice(&(-330_000_000i32).to_le_bytes());
        payload[16..20].copy_from_slice(&12_500i32.to_le_bytes());
        let pos = Position::try_from(&NavPosLlh::from_payload(payload)).unwrap();
        assert_eq!(
            pos,
            Position {
                lon: 8.5,
                lat: -33.0,
                alt: 12.5
            }
        );
    }

    #[test]
    fn position_and_velocity_from_pvt() {
        let pvt = NavPvt::from_payload(sample_payload());
        let pos = Position::try_from(&pvt).unwrap();
        assert_eq!((pos.lon, pos.lat, pos.alt), (-122.5, 47.4, 73.25));
        let vel = Velocity::try_from(&pvt).unwrap();
        assert_eq!(vel.speed, 2.236);
        assert_eq!(vel.heading, 296.56);
    }

    #[test]
    fn short_packet_is_an_error() {
        let llh = NavPosLlh::from_payload(vec![0u8; 12]);
        assert!(matches!(
            Position::try_from(&llh),
            Err(FieldError::OutOfBounds { offset: 16, .. })
        ));
    }

    #[test]
    fn pvt_datetime() {
        let pvt = NavPvt::from_payload(sample_payload());
        let dt = DateTime::<Utc>::try_from(&pvt).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 15));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (12, 34, 56));
        assert_eq!(dt.nanosecond(), 250_000_000);
    }

    #[test]
    fn negative_nanoseconds_borrow_from_the_second() {
        let mut payload = sample_payload();
        payload[16..20].copy_from_slice(&(-1_000i32).to_le_bytes());
        let dt = DateTime::<Utc>::try_from(&NavPvt::from_payload(payload)).unwrap();
        assert_eq!((dt.minute(), dt.second()), (34, 55));
        assert_eq!(dt.nanosecond(), 999_999_000);
    }

    #[test]
    fn leap_second() {
        let mut payload = sample_payload();
        payload[8..11].copy_from_slice(&[23, 59, 60]);
        let dt = DateTime::<Utc>::try_from(&NavPvt::from_payload(payload.clone())).unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (23, 59, 59));
        assert_eq!(dt.nanosecond(), 1_250_000_000);

        // rounded up into the leap second, actually still in second 59
        payload[16..20].copy_from_slice(&(-1_000i32).to_le_bytes());
        let dt = DateTime::<Utc>::try_from(&NavPvt::from_payload(payload.clone())).unwrap();
        assert_eq!(dt.second(), 59);
        assert_eq!(dt.nanosecond(), 999_999_000);

        payload[10] = 61;
        assert_eq!(
            DateTime::<Utc>::try_from(&NavPvt::from_payload(payload)),
            Err(DateTimeError::InvalidTime)
        );
    }

    #[test]
    fn invalid_datetime_fields() {
        let mut bad_date = sample_payload();
        bad_date[6] = 13;
        assert_eq!(
            DateTime::<Utc>::try_from(&NavPvt::from_payload(bad_date)),
            Err(DateTimeError::InvalidDate)
        );

        let mut bad_time = sample_payload();
        bad_time[8] = 24;
        assert_eq!(
            DateTime::<Utc>::try_from(&NavPvt::from_payload(bad_time)),
            Err(DateTimeError::InvalidTime)
        );

        let mut bad_nano = sample_payload();
        bad_nano[16..20].copy_from_slice(&1_000_000_000i32.to_le_bytes());
        assert_eq!(
            DateTime::<Utc>::try_from(&NavPvt::from_payload(bad_nano)),
            Err(DateTimeError::InvalidNanoseconds)
        );

        let truncated = NavPvt::from_payload(vec![0u8; 5]);
        assert!(matches!(
            DateTime::<Utc>::try_from(&truncated),
            Err(DateTimeError::Field(FieldError::OutOfBounds { .. }))
        ));
    }
}
