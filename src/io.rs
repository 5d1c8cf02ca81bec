// File-level helpers around the codec.
//
// Integer lists travel as text: decimal i64 tokens separated by
// whitespace and/or commas.  Encoding streams the text line by line into
// a raw Exp-Golomb bitstream; decoding writes one value per line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::delta::{DeltaDecoder, DeltaEncoder};
use crate::golomb::decoder::{DecodeError, Decoder};
use crate::golomb::encoder::{EncodeError, Encoder};

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

/// Values decoded per `read` call when streaming.
const DECODE_CHUNK: usize = 4096;

// ---------------------------------------------------------------------------
// Options and stats
// ---------------------------------------------------------------------------

/// How a stream is coded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecOptions {
    /// Delta-code against this start/base value; plain coding when `None`.
    pub delta_base: Option<i64>,
    /// Stop decoding after this many values. Ignored when encoding.
    pub max_count: Option<usize>,
}

/// Statistics returned by `encode_file()` / `encode_stream()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    /// Number of integers encoded.
    pub values: u64,
    /// Bits of codewords, excluding final padding.
    pub bits: u64,
    /// Output size in bytes.
    pub output_size: u64,
}

/// Statistics returned by `decode_file()` / `decode_stream()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Number of integers decoded.
    pub values: u64,
    /// Bitstream bytes consumed.
    pub input_size: u64,
    /// Whether unconsumed bits (padding or a truncated codeword) were left.
    pub partial_tail: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Encoding error.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    /// Decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// A token in the text input is not an i64.
    #[error("line {line}: invalid integer '{token}'")]
    Parse { line: usize, token: String },
}

// ---------------------------------------------------------------------------
// Text format
// ---------------------------------------------------------------------------

fn parse_line(line: &str, line_no: usize, out: &mut Vec<i64>) -> Result<(), IoError> {
    for token in line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let value = token.parse::<i64>().map_err(|_| IoError::Parse {
            line: line_no,
            token: token.to_string(),
        })?;
        out.push(value);
    }
    Ok(())
}

/// Parse whitespace- and/or comma-separated integers.
pub fn parse_values(text: &str) -> Result<Vec<i64>, IoError> {
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        parse_line(line, i + 1, &mut out)?;
    }
    Ok(out)
}

/// Write `values` one per line.
pub fn write_values<W: Write>(w: &mut W, values: &[i64]) -> io::Result<()> {
    for value in values {
        writeln!(w, "{value}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Streaming encode / decode
// ---------------------------------------------------------------------------

enum ValueSink<W: Write> {
    Plain(Encoder<W>),
    Delta(DeltaEncoder<W>),
}

impl<W: Write> ValueSink<W> {
    fn new(writer: W, opts: &CodecOptions) -> Self {
        match opts.delta_base {
            Some(start) => Self::Delta(DeltaEncoder::new(writer, start)),
            None => Self::Plain(Encoder::new(writer)),
        }
    }

    fn write(&mut self, values: &[i64]) -> Result<(), EncodeError> {
        match self {
            Self::Plain(enc) => enc.write(values),
            Self::Delta(enc) => enc.write(values),
        }
    }

    fn finish(self) -> Result<(W, u64, u64), EncodeError> {
        let (values, bits, writer) = match self {
            Self::Plain(enc) => (enc.values_written(), enc.bits_written(), enc.finish()?),
            Self::Delta(enc) => (enc.values_written(), enc.bits_written(), enc.finish()?),
        };
        Ok((writer, values, bits))
    }
}

enum ValueSource<R: Read> {
    Plain(Decoder<R>),
    Delta(DeltaDecoder<R>),
}

impl<R: Read> ValueSource<R> {
    fn new(reader: R, opts: &CodecOptions) -> Self {
        match opts.delta_base {
            Some(base) => Self::Delta(DeltaDecoder::new(reader, base)),
            None => Self::Plain(Decoder::new(reader)),
        }
    }

    fn read(&mut self, out: &mut [i64]) -> Result<usize, DecodeError> {
        match self {
            Self::Plain(dec) => dec.read(out),
            Self::Delta(dec) => dec.read(out),
        }
    }

    fn stats(&self) -> DecodeStats {
        let (values, input_size, partial_tail) = match self {
            Self::Plain(dec) => (dec.values_decoded(), dec.bytes_read(), dec.has_partial_codeword()),
            Self::Delta(dec) => (dec.values_decoded(), dec.bytes_read(), dec.has_partial_codeword()),
        };
        DecodeStats {
            values,
            input_size,
            partial_tail,
        }
    }
}

/// Encode the integer text read from `reader` as a bitstream on `writer`.
///
/// Returns the writer (flushed) together with the stats.
pub fn encode_stream<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    opts: &CodecOptions,
) -> Result<(W, EncodeStats), IoError> {
    let mut sink = ValueSink::new(writer, opts);
    let mut line_values = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        line_values.clear();
        parse_line(&line?, i + 1, &mut line_values)?;
        sink.write(&line_values)?;
    }

    let (writer, values, bits) = sink.finish()?;
    let stats = EncodeStats {
        values,
        bits,
        output_size: bits.div_ceil(8),
    };
    info!(
        "encoded {} values into {} bytes ({} bits)",
        stats.values, stats.output_size, stats.bits
    );
    Ok((writer, stats))
}

/// Decode the bitstream read from `reader`, writing one value per line.
///
/// Stops at `opts.max_count` values or when the input runs out.
pub fn decode_stream<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    opts: &CodecOptions,
) -> Result<(W, DecodeStats), IoError> {
    let mut source = ValueSource::new(reader, opts);
    let mut remaining = opts.max_count.unwrap_or(usize::MAX);
    let mut chunk = vec![0i64; DECODE_CHUNK];

    while remaining > 0 {
        let want = remaining.min(DECODE_CHUNK);
        let n = source.read(&mut chunk[..want])?;
        write_values(&mut writer, &chunk[..n])?;
        remaining -= n;
        if n < want {
            break;
        }
    }
    writer.flush()?;

    let stats = source.stats();
    if let Some(limit) = opts.max_count
        && stats.values < limit as u64
    {
        debug!("input ended after {} of {limit} requested values", stats.values);
    }
    info!(
        "decoded {} values from {} bytes",
        stats.values, stats.input_size
    );
    Ok((writer, stats))
}

// ---------------------------------------------------------------------------
// encode_file / decode_file
// ---------------------------------------------------------------------------

/// Delete an output file left incomplete by a failed run.
///
/// Only call this for a file the failed run created itself.
pub fn discard_output(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("removed incomplete output {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove incomplete output {}: {e}", path.display()),
    }
}

/// Encode the integer text file at `input_path` into `output_path`.
///
/// If encoding fails (a bad token, an I/O error), `output_path` is
/// removed rather than left holding a partial stream.
pub fn encode_file(
    input_path: &Path,
    output_path: &Path,
    opts: &CodecOptions,
) -> Result<EncodeStats, IoError> {
    let reader = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    let result = encode_stream(reader, writer, opts).and_then(|(writer, stats)| {
        writer.into_inner().map_err(|e| e.into_error())?;
        Ok(stats)
    });
    if result.is_err() {
        discard_output(output_path);
    }
    result
}

/// Decode the bitstream at `input_path` into integer text at `output_path`.
///
/// On failure `output_path` is removed, as with [`encode_file`].
pub fn decode_file(
    input_path: &Path,
    output_path: &Path,
    opts: &CodecOptions,
) -> Result<DecodeStats, IoError> {
    let reader = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    let result = decode_stream(reader, writer, opts).and_then(|(writer, stats)| {
        writer.into_inner().map_err(|e| e.into_error())?;
        Ok(stats)
    });
    if result.is_err() {
        discard_output(output_path);
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::delta_encode;
    use crate::golomb::encode;

    #[test]
    fn parse_mixed_separators() {
        let values = parse_values("1, 2,3\n  -4\t5\n\n,6,").unwrap();
        assert_eq!(values, vec![1, 2, 3, -4, 5, 6]);
    }

    #[test]
    fn parse_reports_line_and_token() {
        let err = parse_values("1 2\n3 x4\n").unwrap_err();
        match err {
            IoError::Parse { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_rejects_overflow() {
        assert!(parse_values("9223372036854775808").is_err());
        assert_eq!(
            parse_values("-9223372036854775808").unwrap(),
            vec![i64::MIN]
        );
    }

    #[test]
    fn encode_stream_plain() {
        let (out, stats) =
            encode_stream("6\n12\n".as_bytes(), Vec::new(), &CodecOptions::default()).unwrap();
        assert_eq!(out, vec![0x38, 0x68]);
        assert_eq!(
            stats,
            EncodeStats {
                values: 2,
                bits: 14,
                output_size: 2,
            }
        );
    }

    #[test]
    fn encode_stream_delta() {
        let opts = CodecOptions {
            delta_base: Some(10),
            ..Default::default()
        };
        let (out, stats) = encode_stream("10 11 13".as_bytes(), Vec::new(), &opts).unwrap();
        assert_eq!(out, delta_encode(10, &[10, 11, 13]));
        assert_eq!(stats.values, 3);
    }

    #[test]
    fn decode_stream_respects_max_count() {
        let bytes = encode(&[1, 2, 3, 4]);
        let opts = CodecOptions {
            max_count: Some(2),
            ..Default::default()
        };
        let (out, stats) = decode_stream(&bytes[..], Vec::new(), &opts).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n2\n");
        assert_eq!(stats.values, 2);
    }

    #[test]
    fn decode_stream_reports_tail() {
        let bytes = encode(&[1]);
        let (out, stats) = decode_stream(&bytes[..], Vec::new(), &CodecOptions::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n");
        assert_eq!(
            stats,
            DecodeStats {
                values: 1,
                input_size: 1,
                partial_tail: true,
            }
        );
    }

    #[test]
    fn decode_stream_spans_chunks() {
        let values: Vec<i64> = (0..(DECODE_CHUNK as i64 * 2 + 17)).collect();
        let bytes = delta_encode(0, &values);
        let opts = CodecOptions {
            delta_base: Some(0),
            ..Default::default()
        };
        let (out, stats) = decode_stream(&bytes[..], Vec::new(), &opts).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(parse_values(&text).unwrap(), values);
        assert_eq!(stats.values, values.len() as u64);
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("values.txt");
        let encoded = dir.path().join("values.egc");
        let decoded = dir.path().join("decoded.txt");
        std::fs::write(&input, "1700000000\n1700000003\n1700000004\n1699999990\n").unwrap();

        let opts = CodecOptions {
            delta_base: Some(1_700_000_000),
            ..Default::default()
        };
        let enc = encode_file(&input, &encoded, &opts).unwrap();
        assert_eq!(enc.values, 4);
        assert_eq!(std::fs::metadata(&encoded).unwrap().len(), enc.output_size);

        let dec = decode_file(&encoded, &decoded, &opts).unwrap();
        assert_eq!(dec.values, 4);
        assert_eq!(
            std::fs::read_to_string(&decoded).unwrap(),
            "1700000000\n1700000003\n1700000004\n1699999990\n"
        );
    }

    #[test]
    fn encode_file_removes_output_on_bad_token() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("values.txt");
        let encoded = dir.path().join("values.egc");
        // Enough good lines to push bytes through the buffer first.
        let mut text: String = (0..20_000).map(|v| format!("{v}\n")).collect();
        text.push_str("12 oops\n");
        std::fs::write(&input, text).unwrap();

        let err = encode_file(&input, &encoded, &CodecOptions::default()).unwrap_err();
        match err {
            IoError::Parse { line, token } => {
                assert_eq!(line, 20_001);
                assert_eq!(token, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!encoded.exists());
    }

    #[test]
    fn encode_file_missing_input_leaves_output_alone() {
        let dir = tempfile::tempdir().unwrap();
        let encoded = dir.path().join("keep.egc");
        std::fs::write(&encoded, b"keep").unwrap();
        let missing = dir.path().join("missing.txt");
        assert!(encode_file(&missing, &encoded, &CodecOptions::default()).is_err());
        assert_eq!(std::fs::read(&encoded).unwrap(), b"keep");
    }
}
