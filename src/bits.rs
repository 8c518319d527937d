//! MSB-first bit field access used by the message codecs.
use crate::error::{EncodeError, PayloadError};

/// Reads fixed-width fields from a byte slice, most significant bit first.
///
/// Fields need not be byte aligned. A read that would go past the end of the
/// slice fails with [PayloadError::OutOfBits] and leaves the position untouched.
///
/// # Example
/// ```
/// use rtcm3::BitReader;
///
/// let mut r = BitReader::new(&[0x3e, 0xd7, 0xd3]);
/// assert_eq!(r.read_uint(12).unwrap(), 1005);
/// assert_eq!(r.read_uint(12).unwrap(), 2003);
/// assert!(r.read_uint(1).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        BitReader { data, pos: 0 }
    }

    /// Current offset in bits from the start of the data.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bits not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    fn ensure(&self, bits: u32) -> Result<(), PayloadError> {
        if bits as usize > self.remaining() {
            return Err(PayloadError::OutOfBits {
                position: self.pos,
                wanted: bits,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read an unsigned field of `bits` width.
    ///
    /// # Errors
    /// [PayloadError::OutOfBits] if fewer than `bits` bits remain.
    ///
    /// # Panics
    /// If `bits` is greater than 64.
    pub fn read_uint(&mut self, bits: u32) -> Result<u64, PayloadError> {
        assert!(bits <= 64, "cannot read more than 64 bits into an integer");
        self.ensure(bits)?;

        let mut value: u64 = 0;
        let mut left = bits as usize;
        while left > 0 {
            let byte = self.data[self.pos / 8];
            let avail = 8 - self.pos % 8;
            let take = avail.min(left);
            let chunk = (byte >> (avail - take)) & (((1u16 << take) - 1) as u8);
            value = (value << take) | u64::from(chunk);
            self.pos += take;
            left -= take;
        }
        Ok(value)
    }

    /// Read a two's-complement signed field of `bits` width.
    ///
    /// # Errors
    /// [PayloadError::OutOfBits] if fewer than `bits` bits remain.
    pub fn read_int(&mut self, bits: u32) -> Result<i64, PayloadError> {
        if bits == 0 {
            return Ok(0);
        }
        let raw = self.read_uint(bits)?;
        let shift = 64 - bits;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Read a single bit as a flag.
    ///
    /// # Errors
    /// [PayloadError::OutOfBits] at the end of the data.
    pub fn read_bool(&mut self) -> Result<bool, PayloadError> {
        Ok(self.read_uint(1)? == 1)
    }

    /// Discard `bits` bits.
    ///
    /// # Errors
    /// [PayloadError::OutOfBits] if fewer than `bits` bits remain.
    pub fn skip(&mut self, bits: u32) -> Result<(), PayloadError> {
        self.ensure(bits)?;
        self.pos += bits as usize;
        Ok(())
    }

    /// Read `count` whole bytes, which need not be byte aligned.
    ///
    /// # Errors
    /// [PayloadError::OutOfBits] if fewer than `count * 8` bits remain.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, PayloadError> {
        self.ensure(u32::try_from(count * 8).unwrap_or(u32::MAX))?;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.read_uint(8)? as u8);
        }
        Ok(out)
    }
}

/// Packs fixed-width fields MSB-first; the inverse of [BitReader].
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    data: Vec<u8>,
    len: usize,
}

impl BitWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push_bit(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let idx = self.len / 8;
            self.data[idx] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }

    /// Write `value` into an unsigned field of `bits` width.
    ///
    /// # Errors
    /// [EncodeError::FieldOverflow] if `value` needs more than `bits` bits.
    pub fn write_uint(&mut self, bits: u32, value: u64) -> Result<(), EncodeError> {
        assert!(bits <= 64, "cannot write more than 64 bits from an integer");
        if bits < 64 && value >> bits != 0 {
            return Err(EncodeError::FieldOverflow {
                bits,
                value: i128::from(value),
            });
        }
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(())
    }

    /// Write `value` into a two's-complement field of `bits` width.
    ///
    /// # Errors
    /// [EncodeError::FieldOverflow] if `value` is outside the field's range.
    pub fn write_int(&mut self, bits: u32, value: i64) -> Result<(), EncodeError> {
        assert!(
            (1..=64).contains(&bits),
            "signed fields are 1 to 64 bits wide"
        );
        let min = -(1i128 << (bits - 1));
        let max = (1i128 << (bits - 1)) - 1;
        if !(min..=max).contains(&i128::from(value)) {
            return Err(EncodeError::FieldOverflow {
                bits,
                value: i128::from(value),
            });
        }
        let mask = if bits == 64 {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        };
        self.write_uint(bits, value as u64 & mask)
    }

    pub fn write_bool(&mut self, value: bool) {
        self.push_bit(value);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for b in bytes {
            for i in (0..8).rev() {
                self.push_bit((b >> i) & 1 == 1);
            }
        }
    }

    /// Finish writing, returning the bytes. A partial final byte is zero padded.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
