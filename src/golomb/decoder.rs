// Exp-Golomb stream decoder.
//
// A bit-at-a-time state machine.  The state and the partially consumed
// input byte live in the Decoder between calls, so decoding can stop and
// resume anywhere: mid-codeword, mid-byte, or after the source ran dry.
//
// Running out of input is not an error.  `read` returns the values that
// were completed, and whatever codeword was in flight (including the
// encoder's zero padding) is simply never emitted.  A source error that
// interrupts a call after some values were completed is held back until
// the next call, so those values still reach the caller.

use std::io::{self, Read};

use log::debug;

use super::bits::BitReader;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Decoding can only fail when the byte source does.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Decoder position within the current codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Reading the zero prefix.
    CountingZeros { zeros: u32 },
    /// Reading magnitude bits after the separator.
    ShiftingBits { acc: u64, remaining: u32 },
    /// Magnitude complete; the next bit is the sign.
    ReadingSign { magnitude: u64 },
}

impl Default for State {
    fn default() -> Self {
        State::CountingZeros { zeros: 0 }
    }
}

impl State {
    /// Consume one bit. Returns the next state and, when a codeword
    /// completes, its value.
    ///
    /// Streams whose zero prefix exceeds 63 bits lie outside what the
    /// encoder produces; the accumulator wraps for them instead of
    /// panicking, so they decode to unspecified values.
    #[inline]
    pub fn advance(self, bit: u8) -> (State, Option<i64>) {
        match self {
            State::CountingZeros { zeros } if bit == 0 => (
                State::CountingZeros {
                    zeros: zeros.saturating_add(1),
                },
                None,
            ),
            State::CountingZeros { zeros: 0 } => (State::default(), Some(0)),
            State::CountingZeros { zeros } => (
                State::ShiftingBits {
                    acc: 1,
                    remaining: zeros,
                },
                None,
            ),
            State::ShiftingBits { acc, remaining } => {
                let acc = (acc << 1) | u64::from(bit);
                if remaining > 1 {
                    (
                        State::ShiftingBits {
                            acc,
                            remaining: remaining - 1,
                        },
                        None,
                    )
                } else {
                    // Undo the bias that reserved the lone `1` for zero.
                    (
                        State::ReadingSign {
                            magnitude: acc.wrapping_sub(1),
                        },
                        None,
                    )
                }
            }
            State::ReadingSign { magnitude } => {
                // A magnitude of 2^63 only comes from i64::MIN and maps
                // back onto it through the wrap.
                let value = magnitude as i64;
                let value = if bit == 1 { value.wrapping_neg() } else { value };
                (State::default(), Some(value))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Streaming Exp-Golomb decoder.
///
/// `Decoder` is also an iterator over decoded values; iteration ends when
/// the source is exhausted.
pub struct Decoder<R: Read> {
    bits: BitReader<R>,
    state: State,
    values_decoded: u64,
    exhausted: bool,
    /// Source error raised after values were already completed this call.
    deferred: Option<io::Error>,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bits: BitReader::new(reader),
            state: State::default(),
            values_decoded: 0,
            exhausted: false,
            deferred: None,
        }
    }

    /// Decode up to `out.len()` values into `out`.
    ///
    /// Returns the number of values written. A count below `out.len()`
    /// means the source ran out; calling again asks the source for more
    /// bytes and reports the same condition if there are none.
    ///
    /// If the source fails after some values were completed, those values
    /// are returned and the error is reported by the next call. The
    /// decoder state is intact either way, so decoding may be retried once
    /// the source recovers.
    pub fn read(&mut self, out: &mut [i64]) -> Result<usize, DecodeError> {
        if let Some(err) = self.deferred.take() {
            return Err(err.into());
        }
        let mut count = 0;
        while count < out.len() {
            let bit = match self.bits.next_bit() {
                Ok(bit) => bit,
                Err(err) if count > 0 => {
                    debug!(
                        "exp-golomb decoder: source error after {count} values this call, deferring: {err}"
                    );
                    self.exhausted = false;
                    self.deferred = Some(err);
                    return Ok(count);
                }
                Err(err) => return Err(err.into()),
            };
            let Some(bit) = bit else {
                self.exhausted = true;
                debug!(
                    "exp-golomb decoder: source exhausted after {} values ({} this call), state {:?}",
                    self.values_decoded, count, self.state
                );
                return Ok(count);
            };
            self.exhausted = false;

            let (next, value) = self.state.advance(bit);
            self.state = next;
            if let Some(value) = value {
                out[count] = value;
                count += 1;
                self.values_decoded += 1;
            }
        }
        Ok(count)
    }

    /// Whether the last `read` stopped because the source had no more bytes.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether bits of an incomplete codeword (or padding) are pending.
    pub fn has_partial_codeword(&self) -> bool {
        self.state != State::default()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn values_decoded(&self) -> u64 {
        self.values_decoded
    }

    pub fn bytes_read(&self) -> u64 {
        self.bits.bytes_read()
    }

    pub fn into_inner(self) -> R {
        self.bits.into_inner()
    }
}

impl<R: Read> Iterator for Decoder<R> {
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

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Decode at most `max_count` values from `bytes`.
///
/// The returned vector is shorter than `max_count` when the input runs
/// out first; a truncated trailing codeword contributes nothing.
pub fn decode(bytes: &[u8], max_count: usize) -> Vec<i64> {
    // Each codeword is at least one bit long.
    let cap = max_count.min(bytes.len().saturating_mul(8));
    let mut out = vec![0i64; cap];
    let mut dec = Decoder::new(bytes);
    match dec.read(&mut out) {
        Ok(n) => out.truncate(n),
        Err(e) => unreachable!("reading from a slice cannot fail: {e}"),
    }
    out
}

/// Decode every complete codeword in `bytes`.
///
/// Encoder padding is all zeros and never completes a codeword, so this
/// recovers exactly the values of a finished stream.
pub fn decode_all(bytes: &[u8]) -> Vec<i64> {
    decode(bytes, usize::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
