// Byte-oriented bit accumulators.
//
// Bits are packed MSB-first.  The writer keeps exactly one partial byte
// and hands full bytes to the sink as soon as they fill; the reader
// buffers exactly one source byte and never reads ahead.

use std::io::{self, Read, Write};

use log::trace;

const ZERO_BYTES: [u8; 64] = [0; 64];

// ---------------------------------------------------------------------------
// BitWriter
// ---------------------------------------------------------------------------

/// Appends bit patterns MSB-first to a byte sink.
///
/// Nothing beyond the current partial byte is buffered here. Callers that
/// write to a slow sink should wrap it in a `BufWriter`.
///
/// A sink error leaves the pending byte in place. Bytes the sink accepted
/// before failing stay accepted, so after a partial write (or a failure
/// part way through a multi-chunk codeword) the stream should be
/// abandoned rather than resumed.
pub struct BitWriter<W: Write> {
    inner: W,
    /// Partially filled byte; unused low bits are zero.
    pending: u8,
    /// Number of bits used in `pending`, always in `0..8`.
    bit_pos: u32,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: 0,
            bit_pos: 0,
            bytes_written: 0,
        }
    }

    /// Append a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.write_bits(u64::from(bit), 1)
    }

    /// Append the low `count` bits of `pattern`, most significant first.
    ///
    /// The pending bits and the chunk are packed into whole bytes and
    /// handed to the sink in one `write_all`. Writer state only advances
    /// once the sink accepts them, so a call that fails before anything
    /// reached the sink can be retried as is.
    pub fn write_bits(&mut self, pattern: u64, count: u32) -> io::Result<()> {
        debug_assert!(count <= 64, "write_bits: count {count} exceeds 64");
        if count == 0 {
            return Ok(());
        }
        let pattern = if count < 64 {
            pattern & ((1u64 << count) - 1)
        } else {
            pattern
        };

        let total = self.bit_pos + count;
        if total < 8 {
            self.pending |= (pattern << (8 - total)) as u8;
            self.bit_pos = total;
            return Ok(());
        }

        // At most 7 pending bits plus 64 new ones.
        let acc = ((u128::from(self.pending) >> (8 - self.bit_pos)) << count) | u128::from(pattern);
        let whole = (total / 8) as usize;
        let tail = total % 8;
        let mut buf = [0u8; 9];
        for (i, byte) in buf[..whole].iter_mut().enumerate() {
            *byte = (acc >> (total - 8 * (i as u32 + 1))) as u8;
        }
        self.inner.write_all(&buf[..whole])?;

        self.bytes_written += whole as u64;
        self.pending = ((acc << (8 - tail)) & 0xFF) as u8;
        self.bit_pos = tail;
        Ok(())
    }

    /// Append `count` zero bits. `count` is not limited to 64.
    pub fn write_zeros(&mut self, count: u32) -> io::Result<()> {
        let total = u64::from(self.bit_pos) + u64::from(count);
        if total < 8 {
            self.bit_pos = total as u32;
            return Ok(());
        }

        self.emit_pending()?;
        let mut whole = total / 8 - 1;
        while whole > 0 {
            let n = whole.min(ZERO_BYTES.len() as u64) as usize;
            self.inner.write_all(&ZERO_BYTES[..n])?;
            self.bytes_written += n as u64;
            whole -= n as u64;
        }
        self.bit_pos = (total % 8) as u32;
        Ok(())
    }

    /// Total bits appended so far, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.bytes_written * 8 + u64::from(self.bit_pos)
    }

    /// Full bytes handed to the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Zero bits that `finish` will add to complete the last byte.
    pub fn padding_bits(&self) -> u32 {
        (8 - self.bit_pos) % 8
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flush the partial byte (zero-padded on the low end) and the sink,
    /// then return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.bit_pos > 0 {
            self.emit_pending()?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn emit_pending(&mut self) -> io::Result<()> {
        self.inner.write_all(&[self.pending])?;
        self.pending = 0;
        self.bit_pos = 0;
        self.bytes_written += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BitReader
// ---------------------------------------------------------------------------

/// Pulls bits MSB-first from a byte source, one byte at a time.
///
/// Running out of bytes is reported as `Ok(None)` rather than an error.
/// The source is asked again on every later call, so a source that grows
/// after reporting end-of-input (a pipe, a buffer still being written)
/// resumes where it left off.
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    /// Unconsumed bits left in `current`.
    remaining: u32,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            remaining: 0,
            bytes_read: 0,
        }
    }

    /// Next bit (0 or 1), or `None` once the source has no more bytes.
    #[inline]
    pub fn next_bit(&mut self) -> io::Result<Option<u8>> {
        if self.remaining == 0 {
            match self.pull_byte()? {
                Some(byte) => {
                    self.current = byte;
                    self.remaining = 8;
                }
                None => return Ok(None),
            }
        }
        self.remaining -= 1;
        Ok(Some((self.current >> self.remaining) & 1))
    }

    /// Bits of the loaded byte not yet handed out.
    pub fn bits_remaining_in_byte(&self) -> u32 {
        self.remaining
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn pull_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    trace!("bit source exhausted after {} bytes", self.bytes_read);
                    return Ok(None);
                }
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
