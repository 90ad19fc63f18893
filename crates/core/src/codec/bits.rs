//! Bit-level input for variable-width LZW codes.
//!
//! PDF packs LZW codes most-significant-bit first across byte
//! boundaries; the reader below unpacks 9-12 bit codes from any
//! `std::io::Read` one byte of lookahead at a time.

use std::io::{self, Read};

use crate::error::Result;

/// Source of fixed-width codes for the LZW decoder.
pub trait BitSource {
    /// Read one `width`-bit code (width 9-12).
    ///
    /// Returns `Ok(None)` once the underlying stream cannot supply a
    /// full code; trailing partial bytes are padding and are dropped.
    fn read_bits(&mut self, width: u8) -> Result<Option<u16>>;

    /// True once end-of-stream has been observed on the underlying
    /// reader, or the source has been closed.
    fn at_end(&self) -> bool;

    /// Release the underlying reader. Idempotent; reads after close
    /// fail with an I/O error.
    fn close(&mut self);
}

/// MSB-first bit reader over any `Read`.
pub struct BitReader<R: Read> {
    inner: Option<R>,
    /// Accumulated bits, right-aligned; only the low `acc_bits` are valid.
    acc: u32,
    acc_bits: u8,
    eof: bool,
}

impl<R: Read> BitReader<R> {
    /// Create a reader positioned at the first bit of `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner: Some(inner),
            acc: 0,
            acc_bits: 0,
            eof: false,
        }
    }

    /// Pull one byte into the accumulator. Returns false at EOF.
    fn refill(&mut self) -> Result<bool> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(io::Error::other("bit source closed").into());
        };
        let mut byte = [0u8; 1];
        loop {
            match inner.read(&mut byte) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(_) => {
                    self.acc = (self.acc << 8) | u32::from(byte[0]);
                    self.acc_bits += 8;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> BitSource for BitReader<R> {
    fn read_bits(&mut self, width: u8) -> Result<Option<u16>> {
        debug_assert!((9..=12).contains(&width));
        while self.acc_bits < width {
            if !self.refill()? {
                return Ok(None);
            }
        }
        self.acc_bits -= width;
        let code = (self.acc >> self.acc_bits) as u16 & ((1 << width) - 1);
        self.acc &= (1 << self.acc_bits) - 1;
        Ok(Some(code))
    }

    fn at_end(&self) -> bool {
        self.eof || self.inner.is_none()
    }

    fn close(&mut self) {
        self.inner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_msb_first_across_byte_boundaries() {
        // 100000000 000000001 + 6 bits padding = codes 256, 1 at 9 bits
        let data: &[u8] = &[0b1000_0000, 0b0000_0000, 0b1000_0000];
        let mut reader = BitReader::new(data);
        assert_eq!(reader.read_bits(9).unwrap(), Some(256));
        assert_eq!(reader.read_bits(9).unwrap(), Some(1));
        // 6 bits remain: not a full code
        assert_eq!(reader.read_bits(9).unwrap(), None);
        assert!(reader.at_end());
    }

    #[test]
    fn twelve_bit_codes() {
        let data: &[u8] = &[0xFF, 0xFF, 0xFF];
        let mut reader = BitReader::new(data);
        assert_eq!(reader.read_bits(12).unwrap(), Some(0xFFF));
        assert_eq!(reader.read_bits(12).unwrap(), Some(0xFFF));
        assert_eq!(reader.read_bits(12).unwrap(), None);
    }

    #[test]
    fn close_is_idempotent_and_poisons_reads() {
        let data: &[u8] = &[0xAA, 0xBB];
        let mut reader = BitReader::new(data);
        reader.close();
        reader.close();
        assert!(reader.at_end());
        assert!(reader.read_bits(9).is_err());
    }
}
