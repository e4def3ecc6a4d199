//! Per-satellite records shared by NAV-SAT and NAV-SVINFO.
//!
//! Both messages carry an array of 12 byte records describing the same
//! logical data, but at different offsets and with different flag bits. The
//! layout is chosen by an explicit [`SatelliteSource`], never guessed from
//! the bytes.

use core::fmt;

use crate::{error::FieldError, field::Records};

/// Size of one satellite record in both layouts
pub const SATELLITE_RECORD_LEN: usize = 12;

/// Both reports put their record array right after an 8 byte header
const RECORDS: Records = Records::new(8, SATELLITE_RECORD_LEN);

/// Record `index` of a report declaring `count` records
pub(crate) fn record_at(
    payload: &[u8],
    count: u8,
    index: usize,
    source: SatelliteSource,
) -> Result<SatelliteData<'_>, FieldError> {
    RECORDS
        .get(payload, usize::from(count), index)
        .map(|record| SatelliteData::new(record, source))
}

/// All `count` records of a report
pub(crate) fn records(
    payload: &[u8],
    count: u8,
    source: SatelliteSource,
) -> Result<SatelliteIter<'_>, FieldError> {
    RECORDS
        .all(payload, usize::from(count))
        .map(|records| SatelliteIter::new(records, source))
}

/// Message a satellite record was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SatelliteSource {
    /// Current layout, UBX-NAV-SAT
    NavSat,
    /// Legacy layout, UBX-NAV-SVINFO
    NavSvInfo,
}

mod nav_sat {
    use crate::field::{BitField, Field, Scaled};

    pub const GNSS_ID: Field<u8> = Field::at(0);
    pub const SV_ID: Field<u8> = Field::at(1);
    pub const CNO: Field<u8> = Field::at(2);
    pub const ELEV: Field<i8> = Field::at(3);
    pub const AZIM: Field<i16> = Field::at(4);
    pub const PR_RES: Scaled<i16> = Scaled::new(6, 10.0);
    pub const QUALITY: BitField<u32> = BitField::new(8, 0x0000_0007);
    pub const SV_USED: BitField<u32> = BitField::new(8, 0x0000_0008);
    pub const HEALTH: BitField<u32> = BitField::new(8, 0x0000_0030);
    pub const DIFF_CORR: BitField<u32> = BitField::new(8, 0x0000_0040);
    pub const SMOOTHED: BitField<u32> = BitField::new(8, 0x0000_0080);
    pub const ORBIT_SOURCE: BitField<u32> = BitField::new(8, 0x0000_0700);
    pub const EPH_AVAIL: BitField<u32> = BitField::new(8, 0x0000_0800);
    pub const ALM_AVAIL: BitField<u32> = BitField::new(8, 0x0000_1000);
    pub const ANO_AVAIL: BitField<u32> = BitField::new(8, 0x0000_2000);
    pub const AOP_AVAIL: BitField<u32> = BitField::new(8, 0x0000_4000);
}

mod nav_svinfo {
    use crate::field::{BitField, Field, Scaled};

    pub const CHN: Field<u8> = Field::at(0);
    pub const SV_ID: Field<u8> = Field::at(1);
    pub const SV_USED: BitField<u8> = BitField::new(2, 0x01);
    pub const DIFF_CORR: BitField<u8> = BitField::new(2, 0x02);
    pub const ORBIT_AVAIL: BitField<u8> = BitField::new(2, 0x04);
    pub const ORBIT_EPH: BitField<u8> = BitField::new(2, 0x08);
    pub const UNHEALTHY: BitField<u8> = BitField::new(2, 0x10);
    pub const ORBIT_ALM: BitField<u8> = BitField::new(2, 0x20);
    pub const ORBIT_AOP: BitField<u8> = BitField::new(2, 0x40);
    pub const SMOOTHED: BitField<u8> = BitField::new(2, 0x80);
    pub const QUALITY: BitField<u8> = BitField::new(3, 0x0f);
    pub const CNO: Field<u8> = Field::at(4);
    pub const ELEV: Field<i8> = Field::at(5);
    pub const AZIM: Field<i16> = Field::at(6);
    pub const PR_RES: Scaled<i32> = Scaled::new(8, 100.0);
}

fn is_set<W>(bit: Result<W, FieldError>) -> Result<bool, FieldError>
where
    W: num_traits::PrimInt,
{
    bit.map(|bit| !bit.is_zero())
}

/// View of one satellite record, borrowed from the parent payload and
/// decoded on every access
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SatelliteData<'a> {
    record: &'a [u8],
    source: SatelliteSource,
}

impl<'a> SatelliteData<'a> {
    pub fn new(record: &'a [u8], source: SatelliteSource) -> Self {
        Self { record, source }
    }

    pub fn source(&self) -> SatelliteSource {
        self.source
    }

    pub fn record(&self) -> &'a [u8] {
        self.record
    }

    /// GNSS identifier, only carried by the current layout
    pub fn gnss_id(&self) -> Result<Option<u8>, FieldError> {
        match self.source {
            SatelliteSource::NavSat => nav_sat::GNSS_ID.read(self.record).map(Some),
            SatelliteSource::NavSvInfo => Ok(None),
        }
    }

    /// Receiver channel number, only carried by the legacy layout
    pub fn channel(&self) -> Result<Option<u8>, FieldError> {
        match self.source {
            SatelliteSource::NavSat => Ok(None),
            SatelliteSource::NavSvInfo => nav_svinfo::CHN.read(self.record).map(Some),
        }
    }

    pub fn sv_id(&self) -> Result<u8, FieldError> {
        match self.source {
            SatelliteSource::NavSat => nav_sat::SV_ID.read(self.record),
            SatelliteSource::NavSvInfo => nav_svinfo::SV_ID.read(self.record),
        }
    }

    /// Carrier to noise ratio in dBHz
    pub fn cno(&self) -> Result<u8, FieldError> {
        match self.source {
            SatelliteSource::NavSat => nav_sat::CNO.read(self.record),
            SatelliteSource::NavSvInfo => nav_svinfo::CNO.read(self.record),
        }
    }

    pub fn elevation_degrees(&self) -> Result<i8, FieldError> {
        match self.source {
            SatelliteSource::NavSat => nav_sat::ELEV.read(self.record),
            SatelliteSource::NavSvInfo => nav_svinfo::ELEV.read(self.record),
        }
    }

    pub fn azimuth_degrees(&self) -> Result<i16, FieldError> {
        match self.source {
            SatelliteSource::NavSat => nav_sat::AZIM.read(self.record),
            SatelliteSource::NavSvInfo => nav_svinfo::AZIM.read(self.record),
        }
    }

    /// Pseudorange residual in meters. NAV-SAT sends decimeters,
    /// NAV-SVINFO centimeters.
    pub fn pseudorange_residual(&self) -> Result<f64, FieldError> {
        match self.source {
            SatelliteSource::NavSat => nav_sat::PR_RES.read(self.record),
            SatelliteSource::NavSvInfo => nav_svinfo::PR_RES.read(self.record),
        }
    }

    pub fn quality(&self) -> Result<SignalQuality, FieldError> {
        let raw = match self.source {
            SatelliteSource::NavSat => nav_sat::QUALITY.read(self.record)? as u8,
            SatelliteSource::NavSvInfo => nav_svinfo::QUALITY.read(self.record)?,
        };
        Ok(SignalQuality::from(raw))
    }

    /// Satellite is used for navigation
    pub fn sv_used(&self) -> Result<bool, FieldError> {
        match self.source {
            SatelliteSource::NavSat => is_set(nav_sat::SV_USED.read(self.record)),
            SatelliteSource::NavSvInfo => is_set(nav_svinfo::SV_USED.read(self.record)),
        }
    }

    pub fn health(&self) -> Result<SvHealth, FieldError> {
        match self.source {
            SatelliteSource::NavSat => {
                let bits = nav_sat::HEALTH.read(self.record)?;
                Ok(match bits {
                    1 => SvHealth::Healthy,
                    2 => SvHealth::Unhealthy,
                    x => SvHealth::Unknown(x as u8),
                })
            },
            // The legacy flag is set for an unhealthy satellite
            SatelliteSource::NavSvInfo => {
                let unhealthy = is_set(nav_svinfo::UNHEALTHY.read(self.record))?;
                Ok(if unhealthy {
                    SvHealth::Unhealthy
                } else {
                    SvHealth::Healthy
                })
            },
        }
    }

    /// Differential correction data is available for this satellite
    pub fn differential_correction_available(&self) -> Result<bool, FieldError> {
        match self.source {
            SatelliteSource::NavSat => is_set(nav_sat::DIFF_CORR.read(self.record)),
            SatelliteSource::NavSvInfo => is_set(nav_svinfo::DIFF_CORR.read(self.record)),
        }
    }

    /// Carrier smoothed pseudorange used
    pub fn smoothed(&self) -> Result<bool, FieldError> {
        match self.source {
            SatelliteSource::NavSat => is_set(nav_sat::SMOOTHED.read(self.record)),
            SatelliteSource::NavSvInfo => is_set(nav_svinfo::SMOOTHED.read(self.record)),
        }
    }

    pub fn orbit_source(&self) -> Result<OrbitSource, FieldError> {
        match self.source {
            SatelliteSource::NavSat => {
                let bits = nav_sat::ORBIT_SOURCE.read(self.record)?;
                Ok(match bits {
                    0 => OrbitSource::NoInfoAvailable,
                    1 => OrbitSource::Ephemeris,
                    2 => OrbitSource::Almanac,
                    3 => OrbitSource::AssistNowOffline,
                    4 => OrbitSource::AssistNowAutonomous,
                    x => OrbitSource::Other(x as u8),
                })
            },
            SatelliteSource::NavSvInfo => {
                if !is_set(nav_svinfo::ORBIT_AVAIL.read(self.record))? {
                    Ok(OrbitSource::NoInfoAvailable)
                } else if is_set(nav_svinfo::ORBIT_EPH.read(self.record))? {
                    Ok(OrbitSource::Ephemeris)
                } else if is_set(nav_svinfo::ORBIT_ALM.read(self.record))? {
                    Ok(OrbitSource::Almanac)
                } else if is_set(nav_svinfo::ORBIT_AOP.read(self.record))? {
                    Ok(OrbitSource::AssistNowAutonomous)
                } else {
                    Ok(OrbitSource::Other(0))
                }
            },
        }
    }

    /// Orbit information of any kind is available
    pub fn orbit_available(&self) -> Result<bool, FieldError> {
        match self.source {
            SatelliteSource::NavSat => Ok(self.orbit_source()? != OrbitSource::NoInfoAvailable),
            SatelliteSource::NavSvInfo => is_set(nav_svinfo::ORBIT_AVAIL.read(self.record)),
        }
    }

    pub fn ephemeris_available(&self) -> Result<bool, FieldError> {
        match self.source {
            SatelliteSource::NavSat => is_set(nav_sat::EPH_AVAIL.read(self.record)),
            SatelliteSource::NavSvInfo => is_set(nav_svinfo::ORBIT_EPH.read(self.record)),
        }
    }

    pub fn almanac_available(&self) -> Result<bool, FieldError> {
        match self.source {
            SatelliteSource::NavSat => is_set(nav_sat::ALM_AVAIL.read(self.record)),
            SatelliteSource::NavSvInfo => is_set(nav_svinfo::ORBIT_ALM.read(self.record)),
        }
    }

    /// AssistNow Offline data, only reported by the current layout
    pub fn assist_now_offline_available(&self) -> Result<Option<bool>, FieldError> {
        match self.source {
            SatelliteSource::NavSat => is_set(nav_sat::ANO_AVAIL.read(self.record)).map(Some),
            SatelliteSource::NavSvInfo => Ok(None),
        }
    }

    /// AssistNow Autonomous data
    pub fn assist_now_autonomous_available(&self) -> Result<bool, FieldError> {
        match self.source {
            SatelliteSource::NavSat => is_set(nav_sat::AOP_AVAIL.read(self.record)),
            SatelliteSource::NavSvInfo => is_set(nav_svinfo::ORBIT_AOP.read(self.record)),
        }
    }
}

impl fmt::Debug for SatelliteData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SatelliteData")
            .field("source", &self.source)
            .field("gnss_id", &self.gnss_id().ok().flatten())
            .field("channel", &self.channel().ok().flatten())
            .field("sv_id", &self.sv_id().ok())
            .field("cno", &self.cno().ok())
            .field("elevation_degrees", &self.elevation_degrees().ok())
            .field("azimuth_degrees", &self.azimuth_degrees().ok())
            .field("pseudorange_residual", &self.pseudorange_residual().ok())
            .field("quality", &self.quality().ok())
            .field("sv_used", &self.sv_used().ok())
            .field("health", &self.health().ok())
            .field("orbit_source", &self.orbit_source().ok())
            .finish()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalQuality {
    NoSignal,
    Searching,
    SignalAcquired,
    /// Signal detected but unusable
    SignalDetected,
    CodeLock,
    /// Code and carrier locked, time synchronized
    CarrierLock,
    Invalid(u8),
}

impl From<u8> for SignalQuality {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::NoSignal,
            1 => Self::Searching,
            2 => Self::SignalAcquired,
            3 => Self::SignalDetected,
            4 => Self::CodeLock,
            5..=7 => Self::CarrierLock,
            x => Self::Invalid(x),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SvHealth {
    Healthy,
    Unhealthy,
    Unknown(u8),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrbitSource {
    NoInfoAvailable,
    Ephemeris,
    Almanac,
    AssistNowOffline,
    AssistNowAutonomous,
    Other(u8),
}

/// Iterator over the records of a satellite report
#[derive(Debug, Clone)]
pub struct SatelliteIter<'a> {
    chunks: core::slice::ChunksExact<'a, u8>,
    source: SatelliteSource,
}

impl<'a> SatelliteIter<'a> {
    /// `records` holds the record array, already cut to the declared count
    fn new(records: &'a [u8], source: SatelliteSource) -> Self {
        Self {
            chunks: records.chunks_exact(SATELLITE_RECORD_LEN),
            source,
        }
    }
}

impl<'a> Iterator for SatelliteIter<'a> {
    type Item = SatelliteData<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks
            .next()
            .map(|record| SatelliteData::new(record, self.source))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for SatelliteIter<'_> {}
