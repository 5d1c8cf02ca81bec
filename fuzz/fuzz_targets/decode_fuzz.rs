#![no_main]
use golombdelta::{delta, golomb};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any byte string is a legal (possibly truncated) stream: decoding
    // must never panic and never yield more values than input bits.
    let values = golomb::decode_all(data);
    assert!(values.len() <= data.len() * 8);

    // Decoding in small pieces must agree with the one-shot decode.
    let mut dec = golomb::Decoder::new(data);
    let mut chunked = Vec::new();
    let mut slot = [0i64; 3];
    loop {
        let n = dec.read(&mut slot).unwrap();
        chunked.extend_from_slice(&slot[..n]);
        if n < slot.len() {
            break;
        }
    }
    assert_eq!(chunked, values);

    let _ = delta::delta_decode(i64::MAX, data);
});
