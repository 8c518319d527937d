//! CRC-24Q frame checksum.
//!
//! Polynomial 0x1864CFB, initial value 0, no reflection and no final xor. The
//! `crc` catalog publishes the same parameters as `CRC_24_LTE_A`.
use ::crc::{Crc, CRC_24_LTE_A};

const CRC24Q: Crc<u32> = Crc::<u32>::new(&CRC_24_LTE_A);

/// Compute the CRC-24Q of `dat`. Only the low 24 bits are ever set.
#[must_use]
pub fn crc24q(dat: &[u8]) -> u32 {
    CRC24Q.checksum(dat)
}

/// Compute the CRC-24Q of `dat` as the 3 big-endian bytes carried on the wire.
#[must_use]
pub fn crc24q_bytes(dat: &[u8]) -> [u8; 3] {
    let [_, a, b, c] = crc24q(dat).to_be_bytes();
    [a, b, c]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    // Bit-at-a-time reference definition.
    fn reference(dat: &[u8]) -> u32 {
        let mut crc: u32 = 0;
        for b in dat {
            crc ^= u32::from(*b) << 16;
            for _ in 0..8 {
                crc <<= 1;
                if crc & 0x100_0000 != 0 {
                    crc ^= 0x186_4cfb;
                }
            }
        }
        crc & 0xff_ffff
    }

    #[test]
    fn check_value() {
        assert_eq!(crc24q(b"123456789"), 0xcd_e703);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(crc24q(&[]), 0);
    }

    #[test]
    fn station_antenna_frame() {
        let frame = hex::decode("d300133ed7d30202980edeef34b4bd62ac0941986f33").unwrap();
        assert_eq!(crc24q(&frame), 0x36_0b98);
        assert_eq!(crc24q_bytes(&frame), [0x36, 0x0b, 0x98]);
    }

    #[test]
    fn matches_reference_on_random_input() {
        let mut rng = rand::thread_rng();
        for len in [1usize, 3, 22, 255, 1029] {
            let dat: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            assert_eq!(crc24q(&dat), reference(&dat), "input len {len}");
        }
    }
}
