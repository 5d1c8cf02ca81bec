// Signed order-zero exponential-Golomb codewords.
//
//   0  = 1
//   1  = 010{s}        s: 0 = positive, 1 = negative
//   2  = 011{s}
//   3  = 00100{s}
//   ...
//
// For a nonzero value the magnitude is biased by one so that the lone `1`
// stays reserved for zero.  The biased magnitude is written with its
// leading one acting as the separator, preceded by as many zeros as it
// has bits after that leading one, and followed by the sign bit.

use std::fmt;
use std::io::{self, Write};

use super::bits::BitWriter;

/// `(pattern, bit count)` for zero.
pub const ZERO: (u64, u32) = (0b1, 1);
/// `(pattern, bit count)` for +1.
pub const PLUS_ONE: (u64, u32) = (0b0100, 4);
/// `(pattern, bit count)` for -1.
pub const MINUS_ONE: (u64, u32) = (0b0101, 4);

/// Longest codeword, produced by `i64::MIN` (biased magnitude 2^63 + 1).
pub const MAX_CODEWORD_BITS: u32 = 128;

/// Number of bits needed to represent `x`; `bit_length(0) == 0`.
#[inline]
pub fn bit_length(x: u64) -> u32 {
    u64::BITS - x.leading_zeros()
}

/// Codeword length in bits for `item`.
#[inline]
pub fn codeword_len(item: i64) -> u32 {
    Codeword::of(item).bit_len()
}

/// The bit pattern of one encoded integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeword {
    /// Leading zero bits.
    prefix: u32,
    /// Biased magnitude; its `prefix + 1` bits start with the separator.
    body: u64,
    /// `None` only for zero.
    sign: Option<u8>,
}

impl Codeword {
    /// Build the codeword for `item`. Every `i64` is representable.
    pub fn of(item: i64) -> Self {
        if item == 0 {
            return Self {
                prefix: 0,
                body: 1,
                sign: None,
            };
        }
        // |i64::MIN| + 1 = 2^63 + 1 still fits in u64.
        let body = item.unsigned_abs() + 1;
        Self {
            prefix: bit_length(body) - 1,
            body,
            sign: Some(u8::from(item < 0)),
        }
    }

    pub fn prefix_len(&self) -> u32 {
        self.prefix
    }

    /// Separator plus magnitude bits.
    pub fn body(&self) -> u64 {
        self.body
    }

    pub fn sign(&self) -> Option<u8> {
        self.sign
    }

    /// Total length in bits: 1 for zero, `2 * prefix + 2` otherwise.
    pub fn bit_len(&self) -> u32 {
        2 * self.prefix + 1 + u32::from(self.sign.is_some())
    }

    /// Append this codeword to `out`.
    pub fn write_to<W: Write>(&self, out: &mut BitWriter<W>) -> io::Result<()> {
        out.write_zeros(self.prefix)?;
        match self.sign {
            None => out.write_bits(self.body, self.prefix + 1),
            // Body and sign fit one chunk unless the body is a full 64 bits.
            Some(sign) if self.prefix < 63 => {
                out.write_bits((self.body << 1) | u64::from(sign), self.prefix + 2)
            }
            Some(sign) => {
                out.write_bits(self.body, self.prefix + 1)?;
                out.write_bits(u64::from(sign), 1)
            }
        }
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.prefix {
            f.write_str("0")?;
        }
        write!(f, "{:b}", self.body)?;
        if let Some(sign) = self.sign {
            write!(f, "{sign}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
