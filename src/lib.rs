#![doc = include_str!("../README.md")]

mod bits;
mod bytes;
mod crc;
mod error;
mod messages;
mod parser;
mod registry;

pub mod frame;

pub use crate::bits::{BitReader, BitWriter};
pub use crate::crc::{crc24q, crc24q_bytes};
pub use crate::error::{DecodeError, EncodeError, Error, PayloadError, Result};
pub use crate::messages::{
    AntennaDescriptor, AntennaDescriptorSerial, Gnss, GlonassCodePhaseBias, GpsEphemeris,
    GpsL1Observation, GpsL2Observation, GpsObservables, GpsRtkHeader, GpsSatellite, Message,
    MessageType, Msm, MsmHeader, MsmLevel, MsmSatellite, MsmSignal, ReceiverAntennaDescriptor,
    ReferenceStationAntenna, ReferenceStationAntennaHeight,
};
pub use crate::parser::{IntoMessages, Messages, Parser, ParserOptions, Step};
pub use crate::registry::{Codec, DecodeFn, EncodeFn, Registry};
