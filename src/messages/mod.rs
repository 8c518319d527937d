//! RTCM3 message types and their payload codecs.
//!
//! References:
//! * RTCM Standard 10403.3, Differential GNSS Services - Version 3
//!
mod bias;
mod ephemeris;
mod msm;
mod observables;
mod station;

use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bits::{BitReader, BitWriter};
use crate::error::{DecodeError, EncodeError, PayloadError};

pub use bias::GlonassCodePhaseBias;
pub use ephemeris::GpsEphemeris;
pub use msm::{Gnss, Msm, MsmHeader, MsmLevel, MsmSatellite, MsmSignal};
pub use observables::{GpsL1Observation, GpsL2Observation, GpsObservables, GpsRtkHeader, GpsSatellite};
pub use station::{
    AntennaDescriptor, AntennaDescriptorSerial, ReceiverAntennaDescriptor, ReferenceStationAntenna,
    ReferenceStationAntennaHeight,
};

/// Speed of light, m/s.
pub(crate) const CLIGHT: f64 = 299_792_458.0;
/// Distance light travels in one millisecond, m.
pub(crate) const RANGE_MS: f64 = CLIGHT * 0.001;

/// 12-bit RTCM3 message number.
///
/// Any value in 0..=4095 can be represented so frames carrying numbers without a
/// registered decoder can still be identified. The associated constants name the
/// message numbers this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageType(u16);

impl MessageType {
    /// Largest value a 12-bit message number can hold.
    pub const MAX: u16 = 0x0fff;

    pub const GPS_L1: Self = Self(1001);
    pub const GPS_EXTENDED_L1: Self = Self(1002);
    pub const GPS_L1_L2: Self = Self(1003);
    pub const GPS_EXTENDED_L1_L2: Self = Self(1004);
    pub const REFERENCE_STATION_ANTENNA: Self = Self(1005);
    pub const REFERENCE_STATION_ANTENNA_HEIGHT: Self = Self(1006);
    pub const ANTENNA_DESCRIPTOR: Self = Self(1007);
    pub const ANTENNA_DESCRIPTOR_SERIAL: Self = Self(1008);
    pub const GLONASS_L1: Self = Self(1009);
    pub const GLONASS_EXTENDED_L1: Self = Self(1010);
    pub const GLONASS_L1_L2: Self = Self(1011);
    pub const GLONASS_EXTENDED_L1_L2: Self = Self(1012);
    pub const SYSTEM_PARAMETERS: Self = Self(1013);
    pub const GPS_IONOSPHERIC: Self = Self(1015);
    pub const GPS_GEOMETRIC: Self = Self(1016);
    pub const GPS_COMBINED_GEOMETRIC_IONOSPHERIC: Self = Self(1017);
    pub const GPS_EPHEMERIS: Self = Self(1019);
    pub const GLONASS_EPHEMERIS: Self = Self(1020);
    pub const UNICODE_TEXT: Self = Self(1029);
    pub const RECEIVER_ANTENNA_DESCRIPTOR: Self = Self(1033);
    pub const SSR_GPS_ORBIT: Self = Self(1057);
    pub const SSR_GPS_CLOCK: Self = Self(1058);
    pub const SSR_GPS_CODE_BIAS: Self = Self(1059);
    pub const SSR_GPS_ORBIT_CLOCK: Self = Self(1060);
    pub const SSR_GPS_URA: Self = Self(1061);
    pub const SSR_GPS_HIGH_RATE_CLOCK: Self = Self(1062);
    pub const SSR_GLONASS_ORBIT: Self = Self(1063);
    pub const SSR_GLONASS_CLOCK: Self = Self(1064);
    pub const SSR_GLONASS_CODE_BIAS: Self = Self(1065);
    pub const SSR_GLONASS_ORBIT_CLOCK: Self = Self(1066);
    pub const SSR_GLONASS_URA: Self = Self(1067);
    pub const SSR_GLONASS_HIGH_RATE_CLOCK: Self = Self(1068);
    pub const GLONASS_CODE_PHASE_BIASES: Self = Self(1230);

    /// Create from the low 12 bits of `value`.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value & Self::MAX)
    }

    /// The MSM message number for `gnss` at `level` (1 through 7).
    #[must_use]
    pub const fn msm(gnss: Gnss, level: u8) -> Self {
        Self(gnss.msm_base() + level as u16)
    }

    #[must_use]
    pub const fn number(self) -> u16 {
        self.0
    }
}

impl Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MessageType> for u16 {
    fn from(value: MessageType) -> Self {
        value.0
    }
}

/// A decoded RTCM3 message.
///
/// Variants sharing a layout (e.g., the four GPS RTK observable messages) carry the
/// same struct; the variant is what determines the message number.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Message {
    /// 1001
    L1Gps(GpsObservables),
    /// 1002
    ExtendedL1Gps(GpsObservables),
    /// 1003
    L1L2Gps(GpsObservables),
    /// 1004
    ExtendedL1L2Gps(GpsObservables),
    /// 1005
    ReferenceStationAntenna(ReferenceStationAntenna),
    /// 1006
    ReferenceStationAntennaHeight(ReferenceStationAntennaHeight),
    /// 1007
    AntennaDescriptor(AntennaDescriptor),
    /// 1008
    AntennaDescriptorSerial(AntennaDescriptorSerial),
    /// 1019
    GpsEphemeris(GpsEphemeris),
    /// 1033
    ReceiverAntennaDescriptor(ReceiverAntennaDescriptor),
    /// 1074, 1084, 1094, 1114, 1124
    Msm4(Msm),
    /// 1075, 1085, 1095, 1115, 1125
    Msm5(Msm),
    /// 1076, 1086, 1096, 1116, 1126
    Msm6(Msm),
    /// 1077, 1087, 1097, 1117, 1127
    Msm7(Msm),
    /// 1230
    GlonassCodePhaseBias(GlonassCodePhaseBias),
}

impl Message {
    /// The message number this message is encoded with.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::L1Gps(_) => MessageType::GPS_L1,
            Message::ExtendedL1Gps(_) => MessageType::GPS_EXTENDED_L1,
            Message::L1L2Gps(_) => MessageType::GPS_L1_L2,
            Message::ExtendedL1L2Gps(_) => MessageType::GPS_EXTENDED_L1_L2,
            Message::ReferenceStationAntenna(_) => MessageType::REFERENCE_STATION_ANTENNA,
            Message::ReferenceStationAntennaHeight(_) => {
                MessageType::REFERENCE_STATION_ANTENNA_HEIGHT
            }
            Message::AntennaDescriptor(_) => MessageType::ANTENNA_DESCRIPTOR,
            Message::AntennaDescriptorSerial(_) => MessageType::ANTENNA_DESCRIPTOR_SERIAL,
            Message::GpsEphemeris(_) => MessageType::GPS_EPHEMERIS,
            Message::ReceiverAntennaDescriptor(_) => MessageType::RECEIVER_ANTENNA_DESCRIPTOR,
            Message::Msm4(msm) | Message::Msm5(msm) | Message::Msm6(msm) | Message::Msm7(msm) => {
                msm.message_type()
            }
            Message::GlonassCodePhaseBias(_) => MessageType::GLONASS_CODE_PHASE_BIASES,
        }
    }

    /// Reference station id, common to every message type.
    #[must_use]
    pub fn station_id(&self) -> u16 {
        match self {
            Message::L1Gps(m)
            | Message::ExtendedL1Gps(m)
            | Message::L1L2Gps(m)
            | Message::ExtendedL1L2Gps(m) => m.header.station_id,
            Message::ReferenceStationAntenna(m) => m.station_id,
            Message::ReferenceStationAntennaHeight(m) => m.antenna.station_id,
            Message::AntennaDescriptor(m) => m.station_id,
            Message::AntennaDescriptorSerial(m) => m.descriptor.station_id,
            // ephemerides are not tied to a station
            Message::GpsEphemeris(_) => 0,
            Message::ReceiverAntennaDescriptor(m) => m.station_id,
            Message::Msm4(m) | Message::Msm5(m) | Message::Msm6(m) | Message::Msm7(m) => {
                m.header.station_id
            }
            Message::GlonassCodePhaseBias(m) => m.station_id,
        }
    }
}

/// Read the leading message number and check it is the type the payload was
/// dispatched as.
pub(crate) fn check_type(
    r: &mut BitReader<'_>,
    expected: MessageType,
) -> Result<(), DecodeError> {
    let actual = r
        .read_uint(12)
        .map_err(|source| DecodeError::MalformedPayload {
            message_type: expected,
            source,
        })?;
    let actual = MessageType::new(actual as u16);
    if actual != expected {
        return Err(DecodeError::TypeMismatch { expected, actual });
    }
    Ok(())
}

/// Run a codec body after the message number check, attributing any bit-level
/// failure to `message_type`.
pub(crate) fn decode_with<F>(
    message_type: MessageType,
    payload: &[u8],
    body: F,
) -> Result<Message, DecodeError>
where
    F: FnOnce(&mut BitReader<'_>) -> Result<Message, PayloadError>,
{
    let mut r = BitReader::new(payload);
    check_type(&mut r, message_type)?;
    body(&mut r).map_err(|source| DecodeError::MalformedPayload {
        message_type,
        source,
    })
}

/// Start a payload by writing the message number.
pub(crate) fn writer_for(message_type: MessageType) -> BitWriter {
    let mut w = BitWriter::new();
    // 12 bit message numbers always fit
    let _ = w.write_uint(12, u64::from(message_type.number()));
    w
}

/// Read a counter-prefixed character field. Characters are ISO 8859-1.
pub(crate) fn read_string(r: &mut BitReader<'_>) -> Result<String, PayloadError> {
    let len = r.read_uint(8)? as usize;
    let bytes = r.read_bytes(len)?;
    Ok(bytes.into_iter().map(char::from).collect())
}

/// Write a counter-prefixed ISO 8859-1 character field.
pub(crate) fn write_string(
    w: &mut BitWriter,
    field: &'static str,
    value: &str,
) -> Result<(), EncodeError> {
    let bytes = value
        .chars()
        .map(u8::try_from)
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| EncodeError::InvalidField {
            field,
            reason: format!("{value:?} has characters outside ISO 8859-1"),
        })?;
    let len = u8::try_from(bytes.len()).map_err(|_| EncodeError::InvalidField {
        field,
        reason: format!("{} characters exceeds the 255 character counter", bytes.len()),
    })?;
    w.write_uint(8, u64::from(len))?;
    w.write_bytes(&bytes);
    Ok(())
}

/// Convert a scaled value back to its integer field representation.
pub(crate) fn to_raw(field: &'static str, value: f64, scale: f64) -> Result<i64, EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::InvalidField {
            field,
            reason: format!("{value} is not finite"),
        });
    }
    Ok((value / scale).round() as i64)
}

/// Decoder for registered message numbers whose payload is not interpreted.
pub(crate) fn decode_not_implemented(
    message_type: MessageType,
    payload: &[u8],
) -> Result<Message, DecodeError> {
    let mut r = BitReader::new(payload);
    check_type(&mut r, message_type)?;
    Err(DecodeError::NotImplemented(message_type))
}

pub(crate) use bias::{decode_glonass_biases, encode_glonass_biases};
pub(crate) use ephemeris::decode_gps_ephemeris;
pub(crate) use msm::decode_msm;
pub(crate) use observables::{decode_gps_observables, encode_gps_observables};
pub(crate) use station::{
    decode_antenna_descriptor, decode_receiver_antenna_descriptor, decode_station_antenna,
    encode_antenna_descriptor, encode_receiver_antenna_descriptor, encode_station_antenna,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_masks_to_12_bits() {
        assert_eq!(MessageType::new(9999).number(), 9999 & 0x0fff);
        assert_eq!(MessageType::new(4095).number(), 4095);
        assert_eq!(MessageType::new(1005), MessageType::REFERENCE_STATION_ANTENNA);
    }

    #[test]
    fn msm_message_numbers() {
        assert_eq!(MessageType::msm(Gnss::Gps, 7).number(), 1077);
        assert_eq!(MessageType::msm(Gnss::Glonass, 4).number(), 1084);
        assert_eq!(MessageType::msm(Gnss::Beidou, 5).number(), 1125);
    }

    #[test]
    fn check_type_mismatch() {
        let mut r = BitReader::new(&[0x3e, 0xe0]);
        let err = check_type(&mut r, MessageType::REFERENCE_STATION_ANTENNA).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                expected: MessageType::REFERENCE_STATION_ANTENNA,
                actual: MessageType::REFERENCE_STATION_ANTENNA_HEIGHT,
            }
        );
    }

    #[test]
    fn not_implemented_still_checks_type() {
        let zult = decode_not_implemented(MessageType::GPS_IONOSPHERIC, &[0x3f, 0x70, 0x00]);
        assert_eq!(
            zult,
            Err(DecodeError::NotImplemented(MessageType::GPS_IONOSPHERIC))
        );

        let zult = decode_not_implemented(MessageType::GPS_IONOSPHERIC, &[0x3f, 0x80, 0x00]);
        assert!(matches!(zult, Err(DecodeError::TypeMismatch { .. })));
    }

    #[test]
    fn strings_round_trip() {
        let mut w = BitWriter::new();
        w.write_uint(3, 0).unwrap();
        write_string(&mut w, "descriptor", "TRM55971.00").unwrap();
        let dat = w.into_bytes();

        let mut r = BitReader::new(&dat);
        r.skip(3).unwrap();
        assert_eq!(read_string(&mut r).unwrap(), "TRM55971.00");
    }

    #[test]
    fn non_finite_values_are_encode_err() {
        assert_eq!(to_raw("ecef_x", 1.25, 0.25), Ok(5));
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                to_raw("ecef_x", value, 0.25),
                Err(EncodeError::InvalidField { field: "ecef_x", .. })
            ));
        }
    }

    #[test]
    fn strings_are_latin1() {
        let mut w = BitWriter::new();
        w.write_uint(8, 3).unwrap();
        w.write_bytes(&[b'9', 0xb0, 0xe9]);
        let dat = w.into_bytes();
        assert_eq!(read_string(&mut BitReader::new(&dat)).unwrap(), "9°é");

        let mut w = BitWriter::new();
        write_string(&mut w, "descriptor", "9°é").unwrap();
        assert_eq!(w.into_bytes(), dat);

        let mut w = BitWriter::new();
        assert!(matches!(
            write_string(&mut w, "descriptor", "€"),
            Err(EncodeError::InvalidField { field: "descriptor", .. })
        ));
    }

    #[test]
    fn string_too_long_is_encode_err() {
        let mut w = BitWriter::new();
        let long = "x".repeat(256);
        assert!(matches!(
            write_string(&mut w, "descriptor", &long),
            Err(EncodeError::InvalidField { field: "descriptor", .. })
        ));
    }
}
