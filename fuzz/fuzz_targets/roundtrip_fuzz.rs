#![no_main]
use golombdelta::{delta, golomb};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    // First eight bytes pick the delta start; the rest are the values.
    let (head, body) = data.split_at(8);
    let start = i64::from_le_bytes(head.try_into().unwrap());
    let values: Vec<i64> = body
        .chunks_exact(8)
        .map(|c| i64::from_le_bytes(c.try_into().unwrap()))
        .collect();

    let bytes = golomb::encode(&values);
    assert_eq!(golomb::decode(&bytes, values.len()), values);
    assert_eq!(golomb::decode_all(&bytes), values);

    let bytes = delta::delta_encode(start, &values);
    assert_eq!(delta::delta_decode(start, &bytes), values);
});
