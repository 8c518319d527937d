//! GLONASS L1 and L2 code-phase biases (1230).
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{decode_with, to_raw, writer_for, Message, MessageType};
use crate::error::{DecodeError, EncodeError};

const BIAS_SCALE: f64 = 0.02;

/// Code-phase biases, m. A bias is `None` when its signal mask bit is clear.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlonassCodePhaseBias {
    pub station_id: u16,
    /// Set if the biases have already been aligned to zero by the station.
    pub bias_indicator: bool,
    pub l1_ca: Option<f64>,
    pub l1_p: Option<f64>,
    pub l2_ca: Option<f64>,
    pub l2_p: Option<f64>,
}

impl GlonassCodePhaseBias {
    fn biases(&self) -> [Option<f64>; 4] {
        [self.l1_ca, self.l1_p, self.l2_ca, self.l2_p]
    }
}

pub(crate) fn decode_glonass_biases(
    message_type: MessageType,
    payload: &[u8],
) -> Result<Message, DecodeError> {
    decode_with(message_type, payload, |r| {
        let station_id = r.read_uint(12)? as u16;
        let bias_indicator = r.read_bool()?;
        r.skip(3)?;
        let mask = r.read_uint(4)?;

        let mut biases = [None; 4];
        for (i, bias) in biases.iter_mut().enumerate() {
            if mask & (0b1000 >> i) != 0 {
                *bias = Some(r.read_int(16)? as f64 * BIAS_SCALE);
            }
        }
        let [l1_ca, l1_p, l2_ca, l2_p] = biases;

        Ok(Message::GlonassCodePhaseBias(GlonassCodePhaseBias {
            station_id,
            bias_indicator,
            l1_ca,
            l1_p,
            l2_ca,
            l2_p,
        }))
    })
}

pub(crate) fn encode_glonass_biases(message: &Message) -> Result<Vec<u8>, EncodeError> {
    let Message::GlonassCodePhaseBias(m) = message else {
        return Err(EncodeError::Unsupported(message.message_type()));
    };
    let biases = m.biases();
    let mask = biases
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_some())
        .fold(0u64, |mask, (i, _)| mask | (0b1000 >> i));

    let mut w = writer_for(message.message_type());
    w.write_uint(12, u64::from(m.station_id))?;
    w.write_bool(m.bias_indicator);
    w.write_uint(3, 0)?;
    w.write_uint(4, mask)?;
    for bias in biases.into_iter().flatten() {
        w.write_int(16, to_raw("bias", bias, BIAS_SCALE)?)?;
    }
    Ok(w.into_bytes())
}
