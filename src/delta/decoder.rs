// Streaming delta decoder: Exp-Golomb residuals -> running sum.

use std::io::Read;

use crate::golomb::decoder::{DecodeError, Decoder};

/// Rebuilds absolute values from a delta-coded Exp-Golomb stream.
///
/// Like [`Decoder`], running out of input ends decoding without an error,
/// and the running sum carries over between calls.
pub struct DeltaDecoder<R: Read> {
    inner: Decoder<R>,
    value: i64,
}

impl<R: Read> DeltaDecoder<R> {
    /// Create a decoder whose first residual is added to `base`.
    pub fn new(reader: R, base: i64) -> Self {
        Self {
            inner: Decoder::new(reader),
            value: base,
        }
    }

    /// Decode up to `out.len()` absolute values into `out`.
    ///
    /// Values completed before a source error are returned and folded into
    /// the running sum; the error follows on the next call.
    pub fn read(&mut self, out: &mut [i64]) -> Result<usize, DecodeError> {
        let n = self.inner.read(out)?;
        for slot in &mut out[..n] {
            self.value = self.value.wrapping_add(*slot);
            *slot = self.value;
        }
        Ok(n)
    }

    /// Most recent value produced, or `base` if none yet.
    pub fn current_value(&self) -> i64 {
        self.value
    }

    pub fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }

    pub fn has_partial_codeword(&self) -> bool {
        self.inner.has_partial_codeword()
    }

    pub fn values_decoded(&self) -> u64 {
        self.inner.values_decoded()
    }

    pub fn bytes_read(&self) -> u64 {
        self.inner.bytes_read()
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: Read> Iterator for DeltaDecoder<R> {
    type Item = Result<i64, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut slot = [0i64; 1];
        match self.read(&mut slot) {
            Ok(1) => Some(Ok(slot[0])),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Decode a delta-coded stream against `base`.
///
/// Stops at the end of `bytes` and returns every value completed so far.
pub fn delta_decode(base: i64, bytes: &[u8]) -> Vec<i64> {
    let mut out = crate::golomb::decode_all(bytes);
    let mut value = base;
    for slot in &mut out {
        value = value.wrapping_add(*slot);
        *slot = value;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::encoder::delta_encode;
    use crate::golomb::encode;

    #[test]
    fn running_sum_from_base() {
        let bytes = encode(&[3, 0, -4, 21]);
        assert_eq!(delta_decode(100, &bytes), vec![103, 103, 99, 120]);
    }

    #[test]
    fn empty_stream() {
        assert!(delta_decode(42, &[]).is_empty());
    }

    #[test]
    fn truncated_stream_returns_prefix() {
        let values = [1_000, 1_005, 1_100_000];
        let bytes = delta_encode(1_000, &values);
        let got = delta_decode(1_000, &bytes[..bytes.len() - 1]);
        assert_eq!(got, vec![1_000, 1_005]);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let values: Vec<i64> = (0..200).map(|i| 50_000 + i * i - 3 * i).collect();
        let bytes = delta_encode(50_000, &values);

        let mut dec = DeltaDecoder::new(&bytes[..], 50_000);
        let mut got = Vec::new();
        let mut chunk = [0i64; 7];
        loop {
            let n = dec.read(&mut chunk).unwrap();
            got.extend_from_slice(&chunk[..n]);
            if n < chunk.len() {
                break;
            }
        }
        assert!(dec.is_exhausted());
        assert_eq!(dec.current_value(), *values.last().unwrap());
        assert_eq!(got, values);
        assert_eq!(got, delta_decode(50_000, &bytes));
    }

    #[test]
    fn iterator_collects() {
        let bytes = delta_encode(-5, &[-5, -6, -8]);
        let got: Result<Vec<_>, _> = DeltaDecoder::new(&bytes[..], -5).collect();
        assert_eq!(got.unwrap(), vec![-5, -6, -8]);
    }

    #[test]
    fn source_error_keeps_running_sum() {
        use std::io;

        /// Serves its bytes, fails once, then serves the rest.
        struct FailsOnce {
            head: Vec<u8>,
            failed: bool,
            tail: Vec<u8>,
        }

        impl Read for FailsOnce {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let src = if !self.head.is_empty() {
                    &mut self.head
                } else if !self.failed {
                    self.failed = true;
                    return Err(io::Error::new(io::ErrorKind::WouldBlock, "later"));
                } else {
                    &mut self.tail
                };
                if src.is_empty() || buf.is_empty() {
                    return Ok(0);
                }
                buf[0] = src.remove(0);
                Ok(1)
            }
        }

        let values = [1_000, 1_001, 1_003, 1_010, 990];
        let bytes = delta_encode(1_000, &values);
        // Residuals 0, 1, 2 take 1 + 4 + 4 bits, so the first byte ends
        // inside the third codeword.
        let (head, tail) = bytes.split_at(1);
        let mut dec = DeltaDecoder::new(
            FailsOnce {
                head: head.to_vec(),
                failed: false,
                tail: tail.to_vec(),
            },
            1_000,
        );

        let mut out = [0i64; 8];
        let n = dec.read(&mut out).unwrap();
        assert_eq!(&out[..n], &values[..n]);
        assert!(n > 0);
        assert_eq!(dec.current_value(), values[n - 1]);
        assert!(dec.read(&mut out).is_err());

        let m = dec.read(&mut out).unwrap();
        assert_eq!(&out[..m], &values[n..]);
        assert_eq!(dec.current_value(), 990);
    }
}
