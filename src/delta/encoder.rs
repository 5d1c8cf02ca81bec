// Streaming delta encoder.
//
// Each value is replaced by its difference from the previous one (the
// first from `start`) before Exp-Golomb coding.  Differences wrap in i64,
// which the decoder's wrapping running sum undoes exactly.

use std::io::Write;

use crate::golomb::encoder::{EncodeError, Encoder};

/// Delta + Exp-Golomb encoder.
///
/// # Example
/// ```
/// use golombdelta::delta::DeltaEncoder;
/// let mut enc = DeltaEncoder::new(Vec::new(), 1000);
/// enc.write(&[1000, 1001, 1003]).unwrap();
/// let bytes = enc.finish().unwrap();
/// assert_eq!(golombdelta::golomb::decode_all(&bytes), vec![0, 1, 2]);
/// ```
pub struct DeltaEncoder<W: Write> {
    inner: Encoder<W>,
    prev: i64,
}

impl<W: Write> DeltaEncoder<W> {
    /// Create an encoder whose first difference is taken against `start`.
    pub fn new(writer: W, start: i64) -> Self {
        Self {
            inner: Encoder::new(writer),
            prev: start,
        }
    }

    pub fn write(&mut self, values: &[i64]) -> Result<(), EncodeError> {
        for &value in values {
            self.write_int(value)?;
        }
        Ok(())
    }

    pub fn write_int(&mut self, value: i64) -> Result<(), EncodeError> {
        let delta = value.wrapping_sub(self.prev);
        self.inner.write_int(delta)?;
        self.prev = value;
        Ok(())
    }

    /// Last value written, or `start` if nothing was.
    pub fn last_value(&self) -> i64 {
        self.prev
    }

    pub fn values_written(&self) -> u64 {
        self.inner.values_written()
    }

    pub fn bits_written(&self) -> u64 {
        self.inner.bits_written()
    }

    pub fn finish(self) -> Result<W, EncodeError> {
        self.inner.finish()
    }
}

/// Delta-encode `values` against `start` into `writer` and finish the stream.
pub fn delta_encode_to<W: Write>(writer: W, start: i64, values: &[i64]) -> Result<W, EncodeError> {
    let mut enc = DeltaEncoder::new(writer, start);
    enc.write(values)?;
    enc.finish()
}

/// Delta-encode `values` against `start` into a fresh byte vector.
pub fn delta_encode(start: i64, values: &[i64]) -> Vec<u8> {
    match delta_encode_to(Vec::new(), start, values) {
        Ok(out) => out,
        Err(e) => unreachable!("writing to a Vec cannot fail: {e}"),
    }
}
