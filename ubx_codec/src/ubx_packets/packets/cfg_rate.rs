use alloc::vec;

use crate::{
    error::FieldError,
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::Field;

    pub const MEAS_RATE: Field<u16> = Field::at(0);
    pub const NAV_RATE: Field<u16> = Field::at(2);
    pub const TIME_REF: Field<u16> = Field::at(4);
    pub const LEN: usize = TIME_REF.end();
}

/// Fastest measurement period the receivers accept
pub const MIN_MEASURE_RATE_MS: u16 = 25;
/// Largest number of measurement cycles per navigation solution
pub const MAX_NAV_RATE: u16 = 127;

ubx_message! {
    /// Navigation/Measurement Rate Settings
    CfgRate {
        class: 0x06,
        id: 0x08,
        name: "CFG-RATE",
        fixed_payload_len: Some(6),
        protocol: ProtocolVersions::ANY,
    }
}

impl CfgRate {
    ubx_getters! {
        /// Measurement Rate, GPS measurements are taken every `measure_rate_ms` milliseconds
        measure_rate_ms: u16 = layout::MEAS_RATE;
        /// Navigation Rate, in number of measurement cycles
        nav_rate: u16 = layout::NAV_RATE;
    }

    /// Alignment to reference time
    pub fn time_ref(&self) -> Result<AlignmentToReferenceTime, FieldError> {
        AlignmentToReferenceTime::try_from(layout::TIME_REF.read(self.payload())?)
    }
}

/// Parameters of [`CfgRate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgRateBuilder {
    /// Measurement period, at least [`MIN_MEASURE_RATE_MS`]
    pub measure_rate_ms: u16,
    /// Measurement cycles per navigation solution, `1..=127`.
    ///
    /// On u-blox 5 and u-blox 6 this parameter cannot be changed and is always 1.
    pub nav_rate: u16,
    pub time_ref: AlignmentToReferenceTime,
}

impl Default for CfgRateBuilder {
    /// 1 Hz navigation aligned to GPS time
    fn default() -> Self {
        Self {
            measure_rate_ms: 1000,
            nav_rate: 1,
            time_ref: AlignmentToReferenceTime::Gps,
        }
    }
}

impl CfgRateBuilder {
    pub fn build(&self) -> Result<CfgRate, FieldError> {
        if self.measure_rate_ms < MIN_MEASURE_RATE_MS {
            return Err(FieldError::invalid("measure_rate_ms", "must be at least 25 ms"));
        }
        if !(1..=MAX_NAV_RATE).contains(&self.nav_rate) {
            return Err(FieldError::invalid("nav_rate", "must be in 1..=127"));
        }

        let mut payload = vec![0u8; layout::LEN];
        layout::MEAS_RATE.write(&mut payload, self.measure_rate_ms)?;
        layout::NAV_RATE.write(&mut payload, self.nav_rate)?;
        layout::TIME_REF.write(&mut payload, self.time_ref.into_raw())?;
        Ok(CfgRate::from_payload(payload))
    }
}

/// Alignment to reference time
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignmentToReferenceTime {
    Utc = 0,
    Gps = 1,
    Glonass = 2,
    Beidou = 3,
    Galileo = 4,
}

impl AlignmentToReferenceTime {
    const fn into_raw(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for AlignmentToReferenceTime {
    type Error = FieldError;

    fn try_from(raw: u16) -> Result<Self, FieldError> {
        match raw {
            0 => Ok(Self::Utc),
            1 => Ok(Self::Gps),
            2 => Ok(Self::Glonass),
            3 => Ok(Self::Beidou),
            4 => Ok(Self::Galileo),
            _ => Err(FieldError::invalid("time_ref", "unknown time reference")),
        }
    }
}
