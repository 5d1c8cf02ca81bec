use golombdelta::delta;
use golombdelta::golomb;

#[derive(Debug)]
struct Vector {
    name: String,
    delta_start: Option<i64>,
    values: Vec<i64>,
    bytes: Vec<u8>,
}

fn hex_to_bytes(s: &str) -> Vec<u8> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }
    assert!(
        s.len().is_multiple_of(2),
        "hex string must have even length"
    );
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn parse_list(s: &str) -> Vec<i64> {
    s.split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.trim().parse().unwrap())
        .collect()
}

fn load_vectors() -> Vec<Vector> {
    let manifest = include_str!("vectors/manifest.tsv");
    manifest
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| {
            let parts: Vec<_> = line.split('|').collect();
            assert_eq!(parts.len(), 4, "invalid vector row: {line}");
            let start = parts[1].trim();
            Vector {
                name: parts[0].to_string(),
                delta_start: (!start.is_empty()).then(|| start.parse().unwrap()),
                values: parse_list(parts[2]),
                bytes: hex_to_bytes(parts[3]),
            }
        })
        .collect()
}

#[test]
fn vector_database_is_non_empty() {
    let vectors = load_vectors();
    assert!(vectors.len() > 10);
    assert!(vectors.iter().any(|v| v.delta_start.is_some()));
}

#[test]
fn encode_matches_all_vectors() {
    for v in load_vectors() {
        let encoded = match v.delta_start {
            Some(start) => delta::delta_encode(start, &v.values),
            None => golomb::encode(&v.values),
        };
        assert_eq!(encoded, v.bytes, "vector {}", v.name);
    }
}

#[test]
fn decode_matches_all_vectors() {
    for v in load_vectors() {
        let decoded = match v.delta_start {
            Some(base) => delta::delta_decode(base, &v.bytes),
            None => golomb::decode(&v.bytes, v.values.len()),
        };
        assert_eq!(decoded, v.values, "vector {}", v.name);
    }
}

#[test]
fn plain_vectors_decode_without_count() {
    // Padding never completes a codeword, so an unbounded decode of a
    // finished stream yields exactly the encoded values.
    for v in load_vectors().into_iter().filter(|v| v.delta_start.is_none()) {
        assert_eq!(golomb::decode_all(&v.bytes), v.values, "vector {}", v.name);
    }
}
