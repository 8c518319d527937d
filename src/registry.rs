use std::collections::HashMap;

use tracing::trace;

use crate::error::{DecodeError, EncodeError};
use crate::frame;
use crate::messages::{self, Gnss, Message, MessageType};

/// Turns a payload dispatched as the given type into a [Message].
pub type DecodeFn = fn(MessageType, &[u8]) -> Result<Message, DecodeError>;
/// Turns a [Message] back into payload bytes.
pub type EncodeFn = fn(&Message) -> Result<Vec<u8>, EncodeError>;

/// Codec table entry for one message number.
#[derive(Clone, Copy)]
pub struct Codec {
    /// Display name, used as the key of parser message counts.
    pub name: &'static str,
    pub decode: DecodeFn,
    pub encode: Option<EncodeFn>,
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("name", &self.name)
            .field("encode", &self.encode.is_some())
            .finish_non_exhaustive()
    }
}

/// Mapping from message number to codec.
///
/// The table is built once at startup and then shared read-only, typically
/// behind an [Arc](std::sync::Arc), by any number of parsers.
#[derive(Debug, Clone)]
pub struct Registry {
    codecs: HashMap<MessageType, Codec>,
}

impl Default for Registry {
    /// The standard table of message numbers this crate understands.
    fn default() -> Self {
        let mut reg = Registry::empty();

        reg.register(
            MessageType::GPS_L1,
            "L1Gps",
            messages::decode_gps_observables,
            Some(messages::encode_gps_observables),
        );
        reg.register(
            MessageType::GPS_EXTENDED_L1,
            "ExtendedL1Gps",
            messages::decode_gps_observables,
            Some(messages::encode_gps_observables),
        );
        reg.register(
            MessageType::GPS_L1_L2,
            "L1L2Gps",
            messages::decode_gps_observables,
            Some(messages::encode_gps_observables),
        );
        reg.register(
            MessageType::GPS_EXTENDED_L1_L2,
            "ExtendedL1L2Gps",
            messages::decode_gps_observables,
            Some(messages::encode_gps_observables),
        );
        reg.register(
            MessageType::REFERENCE_STATION_ANTENNA,
            "ReferenceStationAntenna",
            messages::decode_station_antenna,
            Some(messages::encode_station_antenna),
        );
        reg.register(
            MessageType::REFERENCE_STATION_ANTENNA_HEIGHT,
            "ReferenceStationAntennaHeight",
            messages::decode_station_antenna,
            Some(messages::encode_station_antenna),
        );
        reg.register(
            MessageType::ANTENNA_DESCRIPTOR,
            "AntennaDescriptor",
            messages::decode_antenna_descriptor,
            Some(messages::encode_antenna_descriptor),
        );
        reg.register(
            MessageType::ANTENNA_DESCRIPTOR_SERIAL,
            "AntennaDescriptorSerial",
            messages::decode_antenna_descriptor,
            Some(messages::encode_antenna_descriptor),
        );
        reg.register(
            MessageType::GPS_EPHEMERIS,
            "GpsEphemeris",
            messages::decode_gps_ephemeris,
            None,
        );
        reg.register(
            MessageType::RECEIVER_ANTENNA_DESCRIPTOR,
            "ReceiverAntennaDescriptor",
            messages::decode_receiver_antenna_descriptor,
            Some(messages::encode_receiver_antenna_descriptor),
        );
        reg.register(
            MessageType::GLONASS_CODE_PHASE_BIASES,
            "GlonassCodePhaseBias",
            messages::decode_glonass_biases,
            Some(messages::encode_glonass_biases),
        );

        for gnss in Gnss::ALL {
            for level in 1..=7 {
                let decode: DecodeFn = if level >= 4 {
                    messages::decode_msm
                } else {
                    messages::decode_not_implemented
                };
                reg.register(
                    MessageType::msm(gnss, level),
                    msm_name(gnss, level),
                    decode,
                    None,
                );
            }
        }

        let stubs = [
            (MessageType::GLONASS_L1, "L1Glonass"),
            (MessageType::GLONASS_EXTENDED_L1, "ExtendedL1Glonass"),
            (MessageType::GLONASS_L1_L2, "L1L2Glonass"),
            (MessageType::GLONASS_EXTENDED_L1_L2, "ExtendedL1L2Glonass"),
            (MessageType::SYSTEM_PARAMETERS, "SystemParameters"),
            (MessageType::GPS_IONOSPHERIC, "GpsIonosphericCorrection"),
            (MessageType::GPS_GEOMETRIC, "GpsGeometricCorrection"),
            (MessageType::GPS_COMBINED_GEOMETRIC_IONOSPHERIC, "GpsCombinedCorrection"),
            (MessageType::GLONASS_EPHEMERIS, "GlonassEphemeris"),
            (MessageType::UNICODE_TEXT, "UnicodeText"),
            (MessageType::SSR_GPS_ORBIT, "SsrGpsOrbit"),
            (MessageType::SSR_GPS_CLOCK, "SsrGpsClock"),
            (MessageType::SSR_GPS_CODE_BIAS, "SsrGpsCodeBias"),
            (MessageType::SSR_GPS_ORBIT_CLOCK, "SsrGpsOrbitClock"),
            (MessageType::SSR_GPS_URA, "SsrGpsUra"),
            (MessageType::SSR_GPS_HIGH_RATE_CLOCK, "SsrGpsHighRateClock"),
            (MessageType::SSR_GLONASS_ORBIT, "SsrGlonassOrbit"),
            (MessageType::SSR_GLONASS_CLOCK, "SsrGlonassClock"),
            (MessageType::SSR_GLONASS_CODE_BIAS, "SsrGlonassCodeBias"),
            (MessageType::SSR_GLONASS_ORBIT_CLOCK, "SsrGlonassOrbitClock"),
            (MessageType::SSR_GLONASS_URA, "SsrGlonassUra"),
            (MessageType::SSR_GLONASS_HIGH_RATE_CLOCK, "SsrGlonassHighRateClock"),
        ];
        for (message_type, name) in stubs {
            reg.register(message_type, name, messages::decode_not_implemented, None);
        }

        reg
    }
}

fn msm_name(gnss: Gnss, level: u8) -> &'static str {
    const NAMES: [[&str; 7]; 5] = [
        [
            "GpsMsm1",
            "GpsMsm2",
            "GpsMsm3",
            "GpsMsm4",
            "GpsMsm5",
            "GpsMsm6",
            "GpsMsm7",
        ],
        [
            "GlonassMsm1",
            "GlonassMsm2",
            "GlonassMsm3",
            "GlonassMsm4",
            "GlonassMsm5",
            "GlonassMsm6",
            "GlonassMsm7",
        ],
        [
            "GalileoMsm1",
            "GalileoMsm2",
            "GalileoMsm3",
            "GalileoMsm4",
            "GalileoMsm5",
            "GalileoMsm6",
            "GalileoMsm7",
        ],
        [
            "QzssMsm1",
            "QzssMsm2",
            "QzssMsm3",
            "QzssMsm4",
            "QzssMsm5",
            "QzssMsm6",
            "QzssMsm7",
        ],
        [
            "BeidouMsm1",
            "BeidouMsm2",
            "BeidouMsm3",
            "BeidouMsm4",
            "BeidouMsm5",
            "BeidouMsm6",
            "BeidouMsm7",
        ],
    ];
    let row = match gnss {
        Gnss::Gps => 0,
        Gnss::Glonass => 1,
        Gnss::Galileo => 2,
        Gnss::Qzss => 3,
        Gnss::Beidou => 4,
    };
    NAMES[row][usize::from(level.clamp(1, 7)) - 1]
}

impl Registry {
    /// A registry with no codecs.
    #[must_use]
    pub fn empty() -> Self {
        Registry {
            codecs: HashMap::default(),
        }
    }

    /// Add a codec for `message_type`, replacing any existing entry.
    ///
    /// Registration is a setup step; a registry shared with running parsers cannot
    /// be changed.
    pub fn register(
        &mut self,
        message_type: MessageType,
        name: &'static str,
        decode: DecodeFn,
        encode: Option<EncodeFn>,
    ) {
        trace!(%message_type, codec = name, "registering codec");
        self.codecs.insert(
            message_type,
            Codec {
                name,
                decode,
                encode,
            },
        );
    }

    #[must_use]
    pub fn get(&self, message_type: MessageType) -> Option<&Codec> {
        self.codecs.get(&message_type)
    }

    #[must_use]
    pub fn contains(&self, message_type: MessageType) -> bool {
        self.codecs.contains_key(&message_type)
    }

    /// Display name registered for `message_type`.
    #[must_use]
    pub fn name(&self, message_type: MessageType) -> Option<&'static str> {
        self.codecs.get(&message_type).map(|c| c.name)
    }

    /// All registered display names, ordered by message number.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.types()
            .into_iter()
            .filter_map(|t| self.name(t))
            .collect()
    }

    /// All registered message numbers, ascending.
    #[must_use]
    pub fn types(&self) -> Vec<MessageType> {
        let mut types: Vec<MessageType> = self.codecs.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Decode `payload` as `message_type`.
    ///
    /// # Errors
    /// [DecodeError::UnknownType] if nothing is registered for `message_type`,
    /// [DecodeError::TypeMismatch] if the codec produces a message of another
    /// type, otherwise whatever the codec reports.
    pub fn decode(&self, message_type: MessageType, payload: &[u8]) -> Result<Message, DecodeError> {
        self.dispatch(message_type, payload).map(|(_, message)| message)
    }

    /// Decode `payload` as the type carried in its first 12 bits.
    ///
    /// # Errors
    /// [DecodeError::ShortPayload] if `payload` cannot hold a message number,
    /// otherwise as [Registry::decode].
    pub fn decode_payload(&self, payload: &[u8]) -> Result<Message, DecodeError> {
        self.decode_named(payload).map(|(_, message)| message)
    }

    /// As [Registry::decode_payload], also returning the codec's display name.
    pub(crate) fn decode_named(
        &self,
        payload: &[u8],
    ) -> Result<(&'static str, Message), DecodeError> {
        let message_type = frame::message_type(payload)
            .ok_or(DecodeError::ShortPayload { len: payload.len() })?;
        self.dispatch(message_type, payload)
    }

    fn dispatch(
        &self,
        message_type: MessageType,
        payload: &[u8],
    ) -> Result<(&'static str, Message), DecodeError> {
        let codec = self
            .codecs
            .get(&message_type)
            .ok_or(DecodeError::UnknownType(message_type))?;
        let message = (codec.decode)(message_type, payload)?;
        let actual = message.message_type();
        if actual != message_type {
            return Err(DecodeError::TypeMismatch {
                expected: message_type,
                actual,
            });
        }
        Ok((codec.name, message))
    }

    /// Encode `message` into payload bytes.
    ///
    /// # Errors
    /// [EncodeError::Unsupported] if the message type is unregistered or has no
    /// encoder, otherwise whatever the codec reports.
    pub fn encode(&self, message: &Message) -> Result<Vec<u8>, EncodeError> {
        let message_type = message.message_type();
        let encode = self
            .codecs
            .get(&message_type)
            .and_then(|c| c.encode)
            .ok_or(EncodeError::Unsupported(message_type))?;
        encode(message)
    }

    /// Encode `message` into a complete frame ready for transmission.
    ///
    /// # Errors
    /// As [Registry::encode], and [EncodeError::PayloadTooLong] if the payload
    /// does not fit in a frame.
    pub fn to_buffer(&self, message: &Message) -> Result<Vec<u8>, EncodeError> {
        let payload = self.encode(message)?;
        frame::encode(&payload)
    }
}
