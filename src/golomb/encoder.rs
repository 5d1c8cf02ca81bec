// Exp-Golomb stream encoder.
//
// Maps each signed integer to its codeword and appends it to a BitWriter.
// Bytes reach the sink as they fill; `finish` pads and flushes the last one.

use std::io::{self, Write};

use log::debug;

use super::bits::BitWriter;
use super::codeword::{Codeword, MINUS_ONE, PLUS_ONE, ZERO};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Streaming Exp-Golomb encoder.
///
/// The output is a raw, unterminated bitstream: no length prefix and no
/// end marker. Readers must know how many values to expect.
///
/// A codeword can span several sink writes, so after a write error the
/// stream may end mid-codeword and should be discarded.
///
/// # Example
/// ```
/// use golombdelta::golomb::Encoder;
/// let mut enc = Encoder::new(Vec::new());
/// enc.write(&[6, 12]).unwrap();
/// assert_eq!(enc.finish().unwrap(), vec![0x38, 0x68]);
/// ```
pub struct Encoder<W: Write> {
    bits: BitWriter<W>,
    values_written: u64,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            bits: BitWriter::new(writer),
            values_written: 0,
        }
    }

    /// Encode every value in `values`, in order.
    pub fn write(&mut self, values: &[i64]) -> Result<(), EncodeError> {
        for &item in values {
            self.add(item)?;
        }
        Ok(())
    }

    /// Encode a single value.
    pub fn write_int(&mut self, item: i64) -> Result<(), EncodeError> {
        self.add(item)?;
        Ok(())
    }

    /// Encode values pulled from an iterator.
    pub fn extend_from<I>(&mut self, values: I) -> Result<(), EncodeError>
    where
        I: IntoIterator<Item = i64>,
    {
        for item in values {
            self.add(item)?;
        }
        Ok(())
    }

    pub fn values_written(&self) -> u64 {
        self.values_written
    }

    /// Bits emitted so far, not counting final padding.
    pub fn bits_written(&self) -> u64 {
        self.bits.bits_written()
    }

    pub fn get_ref(&self) -> &W {
        self.bits.get_ref()
    }

    /// Flush the zero-padded partial byte and the sink, returning the sink.
    pub fn finish(self) -> Result<W, EncodeError> {
        debug!(
            "exp-golomb encoder: {} values, {} bits, {} padding bits",
            self.values_written,
            self.bits.bits_written(),
            self.bits.padding_bits()
        );
        Ok(self.bits.finish()?)
    }

    fn add(&mut self, item: i64) -> io::Result<()> {
        // The three most common values skip codeword construction.
        let (pattern, count) = match item {
            0 => ZERO,
            1 => PLUS_ONE,
            -1 => MINUS_ONE,
            _ => {
                Codeword::of(item).write_to(&mut self.bits)?;
                self.values_written += 1;
                return Ok(());
            }
        };
        self.bits.write_bits(pattern, count)?;
        self.values_written += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Encode `values` into `writer` and finish the stream.
pub fn encode_to<W: Write>(writer: W, values: &[i64]) -> Result<W, EncodeError> {
    let mut enc = Encoder::new(writer);
    enc.write(values)?;
    enc.finish()
}

/// Encode `values` into a fresh byte vector.
pub fn encode(values: &[i64]) -> Vec<u8> {
    // Most slowly-varying inputs need well under a byte per value.
    let out = Vec::with_capacity(values.len() / 2 + 1);
    match encode_to(out, values) {
        Ok(out) => out,
        Err(e) => unreachable!("writing to a Vec cannot fail: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
