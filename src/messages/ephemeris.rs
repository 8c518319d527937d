//! GPS satellite ephemeris (1019).
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{decode_with, Message, MessageType};
use crate::bits::BitReader;
use crate::error::{DecodeError, PayloadError};

/// Broadcast ephemeris for one GPS satellite. Angles are in semicircles, times in
/// seconds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsEphemeris {
    pub satellite_id: u8,
    /// GPS week number modulo 1024
    pub week: u16,
    pub sv_accuracy: u8,
    pub code_on_l2: u8,
    pub idot: f64,
    pub iode: u8,
    pub toc: f64,
    pub af2: f64,
    pub af1: f64,
    pub af0: f64,
    pub iodc: u16,
    pub crs: f64,
    pub delta_n: f64,
    pub m0: f64,
    pub cuc: f64,
    pub eccentricity: f64,
    pub cus: f64,
    pub sqrt_a: f64,
    pub toe: f64,
    pub cic: f64,
    pub omega0: f64,
    pub cis: f64,
    pub i0: f64,
    pub crc: f64,
    pub omega: f64,
    pub omega_dot: f64,
    pub tgd: f64,
    pub sv_health: u8,
    pub l2p_data_flag: bool,
    pub fit_interval: bool,
}

fn scaled_int(r: &mut BitReader<'_>, bits: u32, exp: i32) -> Result<f64, PayloadError> {
    Ok(r.read_int(bits)? as f64 * 2f64.powi(exp))
}

fn scaled_uint(r: &mut BitReader<'_>, bits: u32, exp: i32) -> Result<f64, PayloadError> {
    Ok(r.read_uint(bits)? as f64 * 2f64.powi(exp))
}

pub(crate) fn decode_gps_ephemeris(
    message_type: MessageType,
    payload: &[u8],
) -> Result<Message, DecodeError> {
    decode_with(message_type, payload, |r| {
        let eph = GpsEphemeris {
            satellite_id: r.read_uint(6)? as u8,
            week: r.read_uint(10)? as u16,
            sv_accuracy: r.read_uint(4)? as u8,
            code_on_l2: r.read_uint(2)? as u8,
            idot: scaled_int(r, 14, -43)?,
            iode: r.read_uint(8)? as u8,
            toc: scaled_uint(r, 16, 4)?,
            af2: scaled_int(r, 8, -55)?,
            af1: scaled_int(r, 16, -43)?,
            af0: scaled_int(r, 22, -31)?,
            iodc: r.read_uint(10)? as u16,
            crs: scaled_int(r, 16, -5)?,
            delta_n: scaled_int(r, 16, -43)?,
            m0: scaled_int(r, 32, -31)?,
            cuc: scaled_int(r, 16, -29)?,
            eccentricity: scaled_uint(r, 32, -33)?,
            cus: scaled_int(r, 16, -29)?,
            sqrt_a: scaled_uint(r, 32, -19)?,
            toe: scaled_uint(r, 16, 4)?,
            cic: scaled_int(r, 16, -29)?,
            omega0: scaled_int(r, 32, -31)?,
            cis: scaled_int(r, 16, -29)?,
            i0: scaled_int(r, 32, -31)?,
            crc: scaled_int(r, 16, -5)?,
            omega: scaled_int(r, 32, -31)?,
            omega_dot: scaled_int(r, 24, -43)?,
            tgd: scaled_int(r, 8, -31)?,
            sv_health: r.read_uint(6)? as u8,
            l2p_data_flag: r.read_bool()?,
            fit_interval: r.read_bool()?,
        };
        Ok(Message::GpsEphemeris(eph))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::writer_for;

    fn payload() -> Vec<u8> {
        let mut w = writer_for(MessageType::GPS_EPHEMERIS);
        w.write_uint(6, 24).unwrap(); // sat
        w.write_uint(10, 199).unwrap(); // week
        w.write_uint(4, 2).unwrap();
        w.write_uint(2, 1).unwrap();
        w.write_int(14, -100).unwrap(); // idot
        w.write_uint(8, 77).unwrap(); // iode
        w.write_uint(16, 22_500).unwrap(); // toc
        w.write_int(8, 0).unwrap();
        w.write_int(16, -3).unwrap(); // af1
        w.write_int(22, 1_000_000).unwrap(); // af0
        w.write_uint(10, 589).unwrap(); // iodc
        w.write_int(16, -1_520).unwrap(); // crs
        w.write_int(16, 12_000).unwrap();
        w.write_int(32, -1_073_741_824).unwrap(); // m0
        w.write_int(16, -700).unwrap();
        w.write_uint(32, 85_899_345).unwrap(); // e
        w.write_int(16, 3_000).unwrap();
        w.write_uint(32, 2_702_180_352).unwrap(); // sqrt_a
        w.write_uint(16, 22_500).unwrap(); // toe
        w.write_int(16, 10).unwrap();
        w.write_int(32, 536_870_912).unwrap(); // omega0
        w.write_int(16, -10).unwrap();
        w.write_int(32, 644_245_094).unwrap(); // i0
        w.write_int(16, 6_400).unwrap(); // crc
        w.write_int(32, -2_147_483_648).unwrap(); // omega
        w.write_int(24, -20_000).unwrap();
        w.write_int(8, -9).unwrap(); // tgd
        w.write_uint(6, 0).unwrap();
        w.write_bool(false);
        w.write_bool(true);
        assert_eq!(w.len(), 488);
        w.into_bytes()
    }

    #[test]
    fn decode() {
        let dat = payload();
        assert_eq!(dat.len(), 61);
        let msg = decode_gps_ephemeris(MessageType::GPS_EPHEMERIS, &dat).unwrap();
        let Message::GpsEphemeris(eph) = &msg else {
            panic!("expected 1019, got {msg:?}");
        };

        assert_eq!(eph.satellite_id, 24);
        assert_eq!(eph.week, 199);
        assert_eq!(eph.sv_accuracy, 2);
        assert_eq!(eph.code_on_l2, 1);
        assert_eq!(eph.iode, 77);
        assert_eq!(eph.iodc, 589);
        assert_eq!(eph.toc, 360_000.0);
        assert_eq!(eph.toe, 360_000.0);
        assert_eq!(eph.af2, 0.0);
        assert_eq!(eph.af0, 1_000_000.0 * 2f64.powi(-31));
        assert_eq!(eph.crs, -47.5);
        assert_eq!(eph.crc, 200.0);
        assert_eq!(eph.m0, -0.5);
        assert_eq!(eph.omega0, 0.25);
        assert_eq!(eph.omega, -1.0);
        assert_eq!(eph.sqrt_a, 5154.0);
        assert!((eph.eccentricity - 0.01).abs() < 1e-9);
        assert!((eph.i0 - 0.3).abs() < 1e-9);
        assert_eq!(eph.tgd, -9.0 * 2f64.powi(-31));
        assert_eq!(eph.sv_health, 0);
        assert!(!eph.l2p_data_flag);
        assert!(eph.fit_interval);
    }

    #[test]
    fn truncated_is_malformed() {
        let dat = payload();
        let zult = decode_gps_ephemeris(MessageType::GPS_EPHEMERIS, &dat[..40]);
        assert!(matches!(
            zult,
            Err(DecodeError::MalformedPayload {
                message_type: MessageType::GPS_EPHEMERIS,
                source: PayloadError::OutOfBits { .. },
            })
        ));
    }

    #[test]
    fn station_id_is_zero() {
        let msg = decode_gps_ephemeris(MessageType::GPS_EPHEMERIS, &payload()).unwrap();
        assert_eq!(msg.station_id(), 0);
    }
}
