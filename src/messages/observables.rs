//! GPS RTK observables (1001-1004).
//!
//! All four messages share [GpsRtkHeader] and differ only in which per-satellite
//! fields follow it:
//!
//! | type | L1 | L1 ambiguity + CNR | L2 | L2 CNR |
//! |------|----|--------------------|----|--------|
//! | 1001 | x  |                    |    |        |
//! | 1002 | x  | x                  |    |        |
//! | 1003 | x  |                    | x  |        |
//! | 1004 | x  | x                  | x  | x      |
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{decode_with, to_raw, writer_for, Message, MessageType, CLIGHT};
use crate::bits::{BitReader, BitWriter};
use crate::error::{DecodeError, EncodeError, PayloadError};

/// Pseudorange modulus carried by the ambiguity field, m.
const PRUNIT_GPS: f64 = CLIGHT * 0.001;
const PSEUDORANGE_SCALE: f64 = 0.02;
const PHASE_SCALE: f64 = 0.0005;
const CNR_SCALE: f64 = 0.25;

const INVALID_PHASE: i64 = -524_288;
const INVALID_L2_PSEUDORANGE: i64 = -8192;

/// Header common to messages 1001-1004.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsRtkHeader {
    pub station_id: u16,
    /// GPS time of week, ms
    pub epoch: u32,
    /// More messages for the same epoch follow.
    pub synchronous_gnss: bool,
    pub num_satellites: u8,
    pub divergence_free_smoothing: bool,
    pub smoothing_interval: u8,
}

impl GpsRtkHeader {
    fn read(r: &mut BitReader<'_>) -> Result<Self, PayloadError> {
        Ok(GpsRtkHeader {
            station_id: r.read_uint(12)? as u16,
            epoch: r.read_uint(30)? as u32,
            synchronous_gnss: r.read_bool()?,
            num_satellites: r.read_uint(5)? as u8,
            divergence_free_smoothing: r.read_bool()?,
            smoothing_interval: r.read_uint(3)? as u8,
        })
    }

    fn write(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_uint(12, u64::from(self.station_id))?;
        w.write_uint(30, u64::from(self.epoch))?;
        w.write_bool(self.synchronous_gnss);
        w.write_uint(5, u64::from(self.num_satellites))?;
        w.write_bool(self.divergence_free_smoothing);
        w.write_uint(3, u64::from(self.smoothing_interval))
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsL1Observation {
    /// Set for P(Y) code, clear for C/A.
    pub code_indicator: bool,
    /// Pseudorange, m. Includes the modulus ambiguity for the extended messages.
    pub pseudorange: f64,
    /// Carrier phase expressed in meters, or `None` when the receiver flags it
    /// invalid.
    pub phaserange: Option<f64>,
    pub lock_time_indicator: u8,
    /// dB-Hz; only carried by the extended messages.
    pub cnr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsL2Observation {
    pub code_indicator: u8,
    /// Pseudorange, m, or `None` when the L2-L1 difference is flagged invalid.
    pub pseudorange: Option<f64>,
    pub phaserange: Option<f64>,
    pub lock_time_indicator: u8,
    /// dB-Hz; only carried by 1004.
    pub cnr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsSatellite {
    pub satellite_id: u8,
    pub l1: GpsL1Observation,
    /// Present for 1003 and 1004.
    pub l2: Option<GpsL2Observation>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsObservables {
    pub header: GpsRtkHeader,
    pub satellites: Vec<GpsSatellite>,
}

#[derive(Clone, Copy)]
struct Layout {
    extended: bool,
    dual: bool,
}

impl Layout {
    fn of(message_type: MessageType) -> Self {
        Layout {
            extended: matches!(
                message_type,
                MessageType::GPS_EXTENDED_L1 | MessageType::GPS_EXTENDED_L1_L2
            ),
            dual: matches!(
                message_type,
                MessageType::GPS_L1_L2 | MessageType::GPS_EXTENDED_L1_L2
            ),
        }
    }
}

fn read_satellite(r: &mut BitReader<'_>, layout: Layout) -> Result<GpsSatellite, PayloadError> {
    let satellite_id = r.read_uint(6)? as u8;
    let code_indicator = r.read_bool()?;
    let mut pseudorange = r.read_uint(24)? as f64 * PSEUDORANGE_SCALE;
    let phase_diff = r.read_int(20)?;
    let lock_time_indicator = r.read_uint(7)? as u8;
    let mut cnr = None;
    if layout.extended {
        pseudorange += r.read_uint(8)? as f64 * PRUNIT_GPS;
        cnr = Some(r.read_uint(8)? as f64 * CNR_SCALE);
    }
    let l1 = GpsL1Observation {
        code_indicator,
        pseudorange,
        phaserange: (phase_diff != INVALID_PHASE)
            .then(|| pseudorange + phase_diff as f64 * PHASE_SCALE),
        lock_time_indicator,
        cnr,
    };

    let mut l2 = None;
    if layout.dual {
        let code_indicator = r.read_uint(2)? as u8;
        let pr_diff = r.read_int(14)?;
        let phase_diff = r.read_int(20)?;
        let lock_time_indicator = r.read_uint(7)? as u8;
        let cnr = if layout.extended {
            Some(r.read_uint(8)? as f64 * CNR_SCALE)
        } else {
            None
        };
        l2 = Some(GpsL2Observation {
            code_indicator,
            pseudorange: (pr_diff != INVALID_L2_PSEUDORANGE)
                .then(|| pseudorange + pr_diff as f64 * PSEUDORANGE_SCALE),
            phaserange: (phase_diff != INVALID_PHASE)
                .then(|| pseudorange + phase_diff as f64 * PHASE_SCALE),
            lock_time_indicator,
            cnr,
        });
    }

    Ok(GpsSatellite {
        satellite_id,
        l1,
        l2,
    })
}

fn write_satellite(
    w: &mut BitWriter,
    sat: &GpsSatellite,
    layout: Layout,
) -> Result<(), EncodeError> {
    let l1 = &sat.l1;
    let ambiguity = if layout.extended {
        (l1.pseudorange / PRUNIT_GPS).floor()
    } else {
        0.0
    };
    let modulo = l1.pseudorange - ambiguity * PRUNIT_GPS;

    w.write_uint(6, u64::from(sat.satellite_id))?;
    w.write_bool(l1.code_indicator);
    write_unsigned(w, 24, to_raw("l1_pseudorange", modulo, PSEUDORANGE_SCALE)?)?;
    w.write_int(20, phase_diff("l1_phaserange", l1.phaserange, l1.pseudorange)?)?;
    w.write_uint(7, u64::from(l1.lock_time_indicator))?;
    if layout.extended {
        write_unsigned(w, 8, ambiguity as i64)?;
        let cnr = to_raw("l1_cnr", l1.cnr.unwrap_or_default(), CNR_SCALE)?;
        write_unsigned(w, 8, cnr)?;
    }

    if layout.dual {
        let Some(l2) = &sat.l2 else {
            return Err(EncodeError::InvalidField {
                field: "l2",
                reason: format!("satellite {} has no L2 observation", sat.satellite_id),
            });
        };
        let pr_diff = match l2.pseudorange {
            Some(pr) => to_raw("l2_pseudorange", pr - l1.pseudorange, PSEUDORANGE_SCALE)?,
            None => INVALID_L2_PSEUDORANGE,
        };
        w.write_uint(2, u64::from(l2.code_indicator))?;
        w.write_int(14, pr_diff)?;
        w.write_int(20, phase_diff("l2_phaserange", l2.phaserange, l1.pseudorange)?)?;
        w.write_uint(7, u64::from(l2.lock_time_indicator))?;
        if layout.extended {
            let cnr = to_raw("l2_cnr", l2.cnr.unwrap_or_default(), CNR_SCALE)?;
            write_unsigned(w, 8, cnr)?;
        }
    }
    Ok(())
}

fn phase_diff(
    field: &'static str,
    phaserange: Option<f64>,
    pseudorange: f64,
) -> Result<i64, EncodeError> {
    match phaserange {
        Some(cp) => to_raw(field, cp - pseudorange, PHASE_SCALE),
        None => Ok(INVALID_PHASE),
    }
}

fn write_unsigned(w: &mut BitWriter, bits: u32, raw: i64) -> Result<(), EncodeError> {
    let value = u64::try_from(raw).map_err(|_| EncodeError::FieldOverflow {
        bits,
        value: i128::from(raw),
    })?;
    w.write_uint(bits, value)
}

pub(crate) fn decode_gps_observables(
    message_type: MessageType,
    payload: &[u8],
) -> Result<Message, DecodeError> {
    let layout = Layout::of(message_type);
    decode_with(message_type, payload, |r| {
        let header = GpsRtkHeader::read(r)?;
        let satellites = (0..header.num_satellites)
            .map(|_| read_satellite(r, layout))
            .collect::<Result<Vec<_>, _>>()?;
        let obs = GpsObservables { header, satellites };
        Ok(match message_type {
            MessageType::GPS_EXTENDED_L1 => Message::ExtendedL1Gps(obs),
            MessageType::GPS_L1_L2 => Message::L1L2Gps(obs),
            MessageType::GPS_EXTENDED_L1_L2 => Message::ExtendedL1L2Gps(obs),
            _ => Message::L1Gps(obs),
        })
    })
}

pub(crate) fn encode_gps_observables(message: &Message) -> Result<Vec<u8>, EncodeError> {
    let obs = match message {
        Message::L1Gps(obs)
        | Message::ExtendedL1Gps(obs)
        | Message::L1L2Gps(obs)
        | Message::ExtendedL1L2Gps(obs) => obs,
        _ => return Err(EncodeError::Unsupported(message.message_type())),
    };
    if usize::from(obs.header.num_satellites) != obs.satellites.len() {
        return Err(EncodeError::InvalidField {
            field: "num_satellites",
            reason: format!(
                "header declares {} satellites, message carries {}",
                obs.header.num_satellites,
                obs.satellites.len()
            ),
        });
    }

    let layout = Layout::of(message.message_type());
    let mut w = writer_for(message.message_type());
    obs.header.write(&mut w)?;
    for sat in &obs.satellites {
        write_satellite(&mut w, sat, layout)?;
    }
    Ok(w.into_bytes())
}
