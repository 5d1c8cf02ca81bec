//! golombdelta: signed exponential-Golomb integer coding in Rust.
//!
//! The crate provides:
//! - A bit-level order-zero Exp-Golomb codec (`golomb`)
//! - A delta transform for slowly-varying sequences (`delta`)
//! - Text/file helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! The output is a raw bitstream, MSB-first, with the last byte
//! zero-padded. It carries no length or terminator, so callers must know
//! how many values to read back.
//!
//! # Quick Start
//!
//! ```
//! use golombdelta::{delta, golomb};
//!
//! assert_eq!(golomb::encode(&[6, 12]), vec![0x38, 0x68]);
//! assert_eq!(golomb::decode(&[0x38, 0x68], 2), vec![6, 12]);
//!
//! let timestamps = [1_700_000_000, 1_700_000_002, 1_700_000_003, 1_700_000_007];
//! let bytes = delta::delta_encode(1_700_000_000, &timestamps);
//! assert_eq!(bytes.len(), 2);
//! assert_eq!(delta::delta_decode(1_700_000_000, &bytes), timestamps);
//! ```

pub mod delta;
pub mod golomb;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;

pub use delta::{delta_decode, delta_encode};
pub use golomb::{decode, encode};
