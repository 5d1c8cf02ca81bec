// Integration tests for the delta module.

use golombdelta::delta::{self, DeltaDecoder, DeltaEncoder};
use golombdelta::golomb;

fn generate_walk(len: usize, seed: u64, step: i64) -> Vec<i64> {
    let mut state = seed;
    let mut value = 1_700_000_000i64;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        value += ((state >> 33) as i64 % (2 * step + 1)) - step;
        out.push(value);
    }
    out
}

#[test]
fn arithmetic_sequences_for_many_strides() {
    let base = 6329;
    for stride in 0..257 {
        let seq: Vec<i64> = (0..25).map(|i| base + i * stride).collect();
        let bytes = delta::delta_encode(base, &seq);
        let decoded = delta::delta_decode(base, &bytes);
        assert_eq!(decoded, seq, "stride {stride}");
    }
}

#[test]
fn slowly_varying_walk_compresses() {
    let seq = generate_walk(10_000, 9, 3);
    let start = seq[0];
    let bytes = delta::delta_encode(start, &seq);
    assert_eq!(delta::delta_decode(start, &bytes), seq);
    // Residuals in -3..=3 never take more than 6 bits.
    assert!(bytes.len() * 8 <= seq.len() * 6 + 7);
    assert!(bytes.len() < golomb::encode(&seq).len() / 4);
}

#[test]
fn extreme_jumps_wrap_and_recover() {
    let seq = [i64::MAX, i64::MIN, 0, i64::MIN, i64::MAX, -1];
    let bytes = delta::delta_encode(0, &seq);
    assert_eq!(delta::delta_decode(0, &bytes), seq);
}

#[test]
fn mismatched_base_shifts_every_value() {
    let seq = [10, 12, 11, 15];
    let bytes = delta::delta_encode(10, &seq);
    assert_eq!(delta::delta_decode(20, &bytes), vec![20, 22, 21, 25]);
}

#[test]
fn streaming_encoder_matches_one_shot() {
    let seq = generate_walk(3_000, 17, 50);
    let mut enc = DeltaEncoder::new(Vec::new(), 0);
    for chunk in seq.chunks(97) {
        enc.write(chunk).unwrap();
    }
    assert_eq!(enc.values_written(), seq.len() as u64);
    assert_eq!(enc.last_value(), *seq.last().unwrap());
    let bytes = enc.finish().unwrap();
    assert_eq!(bytes, delta::delta_encode(0, &seq));
}

#[test]
fn streaming_decoder_reports_partial_tail() {
    let seq = [5, 6, 7, 1_000_000];
    let bytes = delta::delta_encode(5, &seq);
    let cut = &bytes[..bytes.len() - 1];

    let mut dec = DeltaDecoder::new(cut, 5);
    let mut out = [0i64; 8];
    let n = dec.read(&mut out).unwrap();
    assert_eq!(&out[..n], &[5, 6, 7]);
    assert!(dec.is_exhausted());
    assert!(dec.has_partial_codeword());
    assert_eq!(dec.current_value(), 7);
    assert_eq!(dec.read(&mut out).unwrap(), 0);
}
