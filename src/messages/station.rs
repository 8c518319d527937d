//! Reference station and antenna description messages (1005-1008, 1033).
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{decode_with, read_string, to_raw, write_string, writer_for, Message, MessageType};
use crate::bits::{BitReader, BitWriter};
use crate::error::{DecodeError, EncodeError, PayloadError};

/// ECEF coordinates are carried in units of 0.1 mm.
const ECEF_SCALE: f64 = 0.0001;
/// Antenna height is carried in units of 0.1 mm.
const HEIGHT_SCALE: f64 = 0.0001;

/// Stationary RTK reference station ARP (1005).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceStationAntenna {
    pub station_id: u16,
    /// ITRF realization year, reserved in older revisions of the standard.
    pub itrf_year: u8,
    pub gps_indicator: bool,
    pub glonass_indicator: bool,
    pub galileo_indicator: bool,
    /// Set if this is a physical reference station rather than a non-physical or
    /// computed one.
    pub reference_station_indicator: bool,
    /// Antenna reference point ECEF-X, m
    pub ecef_x: f64,
    pub single_receiver_oscillator_indicator: bool,
    /// Antenna reference point ECEF-Y, m
    pub ecef_y: f64,
    pub quarter_cycle_indicator: u8,
    /// Antenna reference point ECEF-Z, m
    pub ecef_z: f64,
}

impl ReferenceStationAntenna {
    /// Read the fields following the message number.
    fn read(r: &mut BitReader<'_>) -> Result<Self, PayloadError> {
        let station_id = r.read_uint(12)? as u16;
        let itrf_year = r.read_uint(6)? as u8;
        let gps_indicator = r.read_bool()?;
        let glonass_indicator = r.read_bool()?;
        let galileo_indicator = r.read_bool()?;
        let reference_station_indicator = r.read_bool()?;
        let ecef_x = r.read_int(38)? as f64 * ECEF_SCALE;
        let single_receiver_oscillator_indicator = r.read_bool()?;
        r.skip(1)?;
        let ecef_y = r.read_int(38)? as f64 * ECEF_SCALE;
        let quarter_cycle_indicator = r.read_uint(2)? as u8;
        let ecef_z = r.read_int(38)? as f64 * ECEF_SCALE;

        Ok(ReferenceStationAntenna {
            station_id,
            itrf_year,
            gps_indicator,
            glonass_indicator,
            galileo_indicator,
            reference_station_indicator,
            ecef_x,
            single_receiver_oscillator_indicator,
            ecef_y,
            quarter_cycle_indicator,
            ecef_z,
        })
    }

    fn write(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_uint(12, u64::from(self.station_id))?;
        w.write_uint(6, u64::from(self.itrf_year))?;
        w.write_bool(self.gps_indicator);
        w.write_bool(self.glonass_indicator);
        w.write_bool(self.galileo_indicator);
        w.write_bool(self.reference_station_indicator);
        w.write_int(38, to_raw("ecef_x", self.ecef_x, ECEF_SCALE)?)?;
        w.write_bool(self.single_receiver_oscillator_indicator);
        w.write_bool(false);
        w.write_int(38, to_raw("ecef_y", self.ecef_y, ECEF_SCALE)?)?;
        w.write_uint(2, u64::from(self.quarter_cycle_indicator))?;
        w.write_int(38, to_raw("ecef_z", self.ecef_z, ECEF_SCALE)?)?;
        Ok(())
    }
}

/// Stationary RTK reference station ARP with antenna height (1006).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceStationAntennaHeight {
    pub antenna: ReferenceStationAntenna,
    /// Antenna height above the marker, in units of 0.1 mm.
    pub height: u16,
}

impl ReferenceStationAntennaHeight {
    /// Antenna height in meters.
    #[must_use]
    pub fn height_m(&self) -> f64 {
        f64::from(self.height) * HEIGHT_SCALE
    }
}

/// Antenna descriptor (1007).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AntennaDescriptor {
    pub station_id: u16,
    /// IGS antenna type name
    pub descriptor: String,
    pub setup_id: u8,
}

impl AntennaDescriptor {
    fn read(r: &mut BitReader<'_>) -> Result<Self, PayloadError> {
        let station_id = r.read_uint(12)? as u16;
        let descriptor = read_string(r)?;
        let setup_id = r.read_uint(8)? as u8;
        Ok(AntennaDescriptor {
            station_id,
            descriptor,
            setup_id,
        })
    }

    fn write(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_uint(12, u64::from(self.station_id))?;
        write_string(w, "antenna_descriptor", &self.descriptor)?;
        w.write_uint(8, u64::from(self.setup_id))
    }
}

/// Antenna descriptor and serial number (1008).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AntennaDescriptorSerial {
    pub descriptor: AntennaDescriptor,
    pub serial_number: String,
}

/// Receiver and antenna descriptors (1033).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReceiverAntennaDescriptor {
    pub station_id: u16,
    pub antenna_descriptor: String,
    pub antenna_setup_id: u8,
    pub antenna_serial_number: String,
    pub receiver_type: String,
    pub receiver_firmware_version: String,
    pub receiver_serial_number: String,
}

pub(crate) fn decode_station_antenna(
    message_type: MessageType,
    payload: &[u8],
) -> Result<Message, DecodeError> {
    decode_with(message_type, payload, |r| {
        let antenna = ReferenceStationAntenna::read(r)?;
        if message_type == MessageType::REFERENCE_STATION_ANTENNA_HEIGHT {
            let height = r.read_uint(16)? as u16;
            Ok(Message::ReferenceStationAntennaHeight(
                ReferenceStationAntennaHeight { antenna, height },
            ))
        } else {
            Ok(Message::ReferenceStationAntenna(antenna))
        }
    })
}

pub(crate) fn encode_station_antenna(message: &Message) -> Result<Vec<u8>, EncodeError> {
    let mut w = writer_for(message.message_type());
    match message {
        Message::ReferenceStationAntenna(antenna) => antenna.write(&mut w)?,
        Message::ReferenceStationAntennaHeight(m) => {
            m.antenna.write(&mut w)?;
            w.write_uint(16, u64::from(m.height))?;
        }
        _ => return Err(EncodeError::Unsupported(message.message_type())),
    }
    Ok(w.into_bytes())
}

pub(crate) fn decode_antenna_descriptor(
    message_type: MessageType,
    payload: &[u8],
) -> Result<Message, DecodeError> {
    decode_with(message_type, payload, |r| {
        let descriptor = AntennaDescriptor::read(r)?;
        if message_type == MessageType::ANTENNA_DESCRIPTOR_SERIAL {
            let serial_number = read_string(r)?;
            Ok(Message::AntennaDescriptorSerial(AntennaDescriptorSerial {
                descriptor,
                serial_number,
            }))
        } else {
            Ok(Message::AntennaDescriptor(descriptor))
        }
    })
}

pub(crate) fn encode_antenna_descriptor(message: &Message) -> Result<Vec<u8>, EncodeError> {
    let mut w = writer_for(message.message_type());
    match message {
        Message::AntennaDescriptor(m) => m.write(&mut w)?,
        Message::AntennaDescriptorSerial(m) => {
            m.descriptor.write(&mut w)?;
            write_string(&mut w, "antenna_serial_number", &m.serial_number)?;
        }
        _ => return Err(EncodeError::Unsupported(message.message_type())),
    }
    Ok(w.into_bytes())
}

pub(crate) fn decode_receiver_antenna_descriptor(
    message_type: MessageType,
    payload: &[u8],
) -> Result<Message, DecodeError> {
    decode_with(message_type, payload, |r| {
        Ok(Message::ReceiverAntennaDescriptor(ReceiverAntennaDescriptor {
            station_id: r.read_uint(12)? as u16,
            antenna_descriptor: read_string(r)?,
            antenna_setup_id: r.read_uint(8)? as u8,
            antenna_serial_number: read_string(r)?,
            receiver_type: read_string(r)?,
            receiver_firmware_version: read_string(r)?,
            receiver_serial_number: read_string(r)?,
        }))
    })
}

pub(crate) fn encode_receiver_antenna_descriptor(
    message: &Message,
) -> Result<Vec<u8>, EncodeError> {
    let Message::ReceiverAntennaDescriptor(m) = message else {
        return Err(EncodeError::Unsupported(message.message_type()));
    };
    let mut w = writer_for(message.message_type());
    w.write_uint(12, u64::from(m.station_id))?;
    write_string(&mut w, "antenna_descriptor", &m.antenna_descriptor)?;
    w.write_uint(8, u64::from(m.antenna_setup_id))?;
    write_string(&mut w, "antenna_serial_number", &m.antenna_serial_number)?;
    write_string(&mut w, "receiver_type", &m.receiver_type)?;
    write_string(&mut w, "receiver_firmware_version", &m.receiver_firmware_version)?;
    write_string(&mut w, "receiver_serial_number", &m.receiver_serial_number)?;
    Ok(w.into_bytes())
}
